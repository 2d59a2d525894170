use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use contract_terminal::api::{self, ApiClient};
use contract_terminal::config::{AppConfig, DEFAULT_LOG_FILTER};
use contract_terminal::engine::ListControls;
use contract_terminal::fake_backend::FakeBackend;
use contract_terminal::forms::FieldEdit;
use contract_terminal::state::{AppState, Delta, Focus, ProviderCommand, View, apply_delta};
use contract_terminal::worker;

mod ui;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(state: AppState, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn flush_commands(&mut self) {
        for cmd in self.state.take_commands() {
            if self.cmd_tx.send(cmd).is_err() {
                self.state.push_log("[WARN] Provider thread stopped");
                break;
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        match self.state.focus {
            Focus::Search => self.on_search_key(key),
            Focus::Form => self.on_form_key(key),
            Focus::List => self.on_list_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.end_search(),
            KeyCode::Backspace => self.state.search_edit(FieldEdit::Backspace),
            KeyCode::Char(ch) => self.state.search_edit(FieldEdit::Char(ch)),
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let suggesting = self
            .state
            .panel
            .as_ref()
            .is_some_and(|panel| !panel.form.suggestions().is_empty());
        match key.code {
            KeyCode::Esc if suggesting => self.state.form_dismiss_suggestions(),
            KeyCode::Esc => self.state.close_form(),
            KeyCode::Down if suggesting => self.state.form_move_suggestion(true),
            KeyCode::Up if suggesting => self.state.form_move_suggestion(false),
            KeyCode::Enter if suggesting => {
                self.state.form_pick_suggestion();
            }
            KeyCode::Enter => self.state.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.state.form_next_field(true),
            KeyCode::BackTab | KeyCode::Up => self.state.form_next_field(false),
            KeyCode::Left => self.state.form_input(FieldEdit::Cycle(false)),
            KeyCode::Right => self.state.form_input(FieldEdit::Cycle(true)),
            KeyCode::Backspace => self.state.form_input(FieldEdit::Backspace),
            KeyCode::Char(ch) => self.state.form_input(FieldEdit::Char(ch)),
            _ => {}
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        if self.state.staged_delete_name().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.state.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.cancel_delete()
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_view(View::Players),
            KeyCode::Char('2') => self.state.set_view(View::Teams),
            KeyCode::Char('3') => self.state.set_view(View::Transfers),
            KeyCode::Char('4') => self.state.set_view(View::Statistics),
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.active_list_mut().select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.active_list_mut().select_prev(),
            KeyCode::Char('n') | KeyCode::Right => self.state.active_list_mut().next_page(),
            KeyCode::Char('p') | KeyCode::Left => self.state.active_list_mut().prev_page(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.state.active_list_mut().step_page_size(true)
            }
            KeyCode::Char('-') => self.state.active_list_mut().step_page_size(false),
            KeyCode::Char('/') => self.state.begin_search(),
            KeyCode::Char('f') => self.state.cycle_filter(0),
            KeyCode::Char('t') => self.state.cycle_filter(1),
            KeyCode::Char('x') => self.state.clear_filters(),
            KeyCode::Char('c') | KeyCode::Tab => self.state.move_sort_cursor(true),
            KeyCode::Char('C') | KeyCode::BackTab => self.state.move_sort_cursor(false),
            KeyCode::Char('s') => self.state.sort_current_column(),
            KeyCode::Char('a') => self.state.open_add_form(),
            KeyCode::Char('e') | KeyCode::Enter => self.state.open_edit_form(),
            KeyCode::Char('d') => {
                self.state.request_delete();
            }
            KeyCode::Char('r') => self.state.refresh(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut config = AppConfig::from_env();
    if std::env::args().skip(1).any(|arg| arg == "--demo") {
        config.demo = true;
    }
    init_tracing(&config)?;

    let (backend, label): (Arc<dyn api::Backend>, String) = if config.demo {
        (Arc::new(FakeBackend::seeded()), "demo data".to_string())
    } else {
        let client = ApiClient::new(&config.api_base_url, config.http_timeout)
            .context("failed to build api client")?;
        let label = client.base_url().to_string();
        (Arc::new(client), label)
    };
    info!(backend = %label, page_size = config.page_size, "starting");

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    worker::spawn_provider(backend, tx, cmd_rx);

    let mut state = AppState::new(config.page_size);
    state.backend_label = label;
    state.start();
    let mut app = App::new(state, cmd_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// File-only diagnostics; the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.flush_commands();

        terminal.draw(|f| ui::draw(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
            app.flush_commands();
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
