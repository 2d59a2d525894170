use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use contract_terminal::engine::{ListControls, ListStatus, SortDirection};
use contract_terminal::forms::{FieldKind, FormMessage, FormPhase};
use contract_terminal::model::{format_currency, position_label, transfer_direction, window_label};
use contract_terminal::state::{AppState, Focus, FormPanel, View, filter_label, view_label};
use contract_terminal::statistics::NO_STATISTICS;

pub fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_line(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    frame.render_widget(Paragraph::new(controls_line(state)), chunks[1]);

    let body = chunks[2];
    match &state.panel {
        Some(panel) => {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(body);
            render_view(frame, split[0], state);
            render_form(frame, split[1], panel, state.focus == Focus::Form);
        }
        None => render_view(frame, body, state),
    }

    let console = Paragraph::new(console_text(state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[3]);

    frame.render_widget(
        Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );

    if let Some(name) = state.staged_delete_name() {
        render_delete_confirm(frame, frame.size(), &name);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "CONTRACT TERMINAL ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (idx, view) in View::ALL.into_iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, view_label(view));
        let style = if view == state.view {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::styled(
        format!("  @ {}", state.backend_label),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn controls_line(state: &AppState) -> String {
    let list = state.active_list();
    let search = list.filter_value(contract_terminal::engine::FilterKey::Search);
    let mut parts = Vec::new();
    let cursor = if state.focus == Focus::Search { "_" } else { "" };
    parts.push(format!("Search: {search}{cursor}"));
    for key in state.filter_keys() {
        parts.push(format!("{}: {}", filter_label(*key), list.filter_value(*key)));
    }
    let sort = match list.sorted_column() {
        Some((idx, dir)) => format!("{} {}", list.column_label(idx), arrow(dir)),
        None => "none".to_string(),
    };
    parts.push(format!("Sort: {sort}"));
    parts.push(format!(
        "Page {}/{} ({} per page, {} rows)",
        list.page() + 1,
        list.page_count(),
        list.page_size(),
        list.filtered_len()
    ));
    parts.join(" | ")
}

fn arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

fn render_view(frame: &mut Frame, area: Rect, state: &AppState) {
    let list = state.active_list();
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let notice = list.notice().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(notice.to_string()).style(Style::default().fg(Color::Yellow)),
        sections[0],
    );

    let area = sections[1];
    match list.status() {
        ListStatus::Loading => {
            let text = format!("Loading {}...", view_label(state.view).to_lowercase());
            frame.render_widget(dim(text), area);
            return;
        }
        ListStatus::Failed(msg) => {
            let error = Paragraph::new(format!("{msg}\nPress r to retry."))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
            return;
        }
        ListStatus::Ready => {}
    }

    if state.view == View::Statistics {
        render_statistics(frame, area, state);
        return;
    }

    let (widths, rows) = table_rows(state);
    render_table(frame, area, state, &widths, rows);
}

fn table_rows(state: &AppState) -> (Vec<Constraint>, Vec<Vec<String>>) {
    match state.view {
        View::Players | View::Statistics => {
            let rows = state
                .players
                .visible()
                .into_iter()
                .map(|p| {
                    let team = match state.directory.resolve(&p.team) {
                        Some(team) => match team.league.as_deref() {
                            Some(league) => format!("{} · {league}", p.team),
                            None => p.team.clone(),
                        },
                        // unresolved only means something once teams loaded
                        None if state.directory.is_empty() => p.team.clone(),
                        None => format!("{} (?)", p.team),
                    };
                    let team = if p.on_loan {
                        format!("{team} [loan: {}]", p.loan_team.as_deref().unwrap_or("-"))
                    } else {
                        team
                    };
                    vec![
                        p.name.clone(),
                        position_label(p.position).to_string(),
                        team,
                        p.nationality.clone().unwrap_or_default(),
                        format_currency(p.price),
                        format!("{}y", p.contract_duration),
                        p.years_left.to_string(),
                    ]
                })
                .collect();
            let widths = vec![
                Constraint::Percentage(20),
                Constraint::Percentage(12),
                Constraint::Percentage(20),
                Constraint::Percentage(12),
                Constraint::Percentage(16),
                Constraint::Percentage(10),
                Constraint::Percentage(10),
            ];
            (widths, rows)
        }
        View::Teams => {
            let rows = state
                .teams
                .visible()
                .into_iter()
                .map(|t| {
                    vec![
                        t.name.clone(),
                        t.league.clone().unwrap_or_default(),
                        t.home_stadium.clone().unwrap_or_default(),
                        t.founded_year.map(|y| y.to_string()).unwrap_or_default(),
                    ]
                })
                .collect();
            let widths = vec![
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Percentage(30),
                Constraint::Percentage(15),
            ];
            (widths, rows)
        }
        View::Transfers => {
            let rows = state
                .transfers
                .visible()
                .into_iter()
                .map(|row| {
                    let t = &row.transfer;
                    vec![
                        row.player_name
                            .clone()
                            .unwrap_or_else(|| format!("Unknown #{}", t.player_id)),
                        format!(
                            "{} → {} ({})",
                            t.from_team,
                            t.to_team,
                            transfer_direction(t)
                        ),
                        t.fee.map(format_currency).unwrap_or_else(|| "-".to_string()),
                        window_label(t.transfer_window).to_string(),
                        t.transfer_date.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();
            let widths = vec![
                Constraint::Percentage(22),
                Constraint::Percentage(38),
                Constraint::Percentage(16),
                Constraint::Percentage(10),
                Constraint::Percentage(14),
            ];
            (widths, rows)
        }
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    widths: &[Constraint],
    rows: Vec<Vec<String>>,
) {
    let list = state.active_list();
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let sorted = list.sorted_column();
    for idx in 0..list.column_count().min(cols.len()) {
        let mut label = list.column_label(idx).to_string();
        if let Some((sorted_idx, dir)) = sorted
            && sorted_idx == idx
        {
            label = format!("{label} {}", arrow(dir));
        }
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if idx == state.sort_cursor() {
            style = style.add_modifier(Modifier::UNDERLINED).fg(Color::Cyan);
        }
        render_cell_text(frame, cols[idx], &label, style);
    }

    let list_area = sections[1];
    if rows.is_empty() {
        let text = if list.filtered_len() == 0 && has_active_filter(state) {
            "No rows match the current filters (x clears them)".to_string()
        } else {
            format!("No {} yet (a adds one)", view_label(state.view).to_lowercase())
        };
        frame.render_widget(dim(text), list_area);
        return;
    }

    for (i, row) in rows.iter().enumerate().take(list_area.height as usize) {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = i == list.cursor();
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(style), row_area);
        }
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        for (cell, text) in cells.iter().zip(row) {
            render_cell_text(frame, *cell, text, style);
        }
    }
}

fn has_active_filter(state: &AppState) -> bool {
    let list = state.active_list();
    !list
        .filter_value(contract_terminal::engine::FilterKey::Search)
        .is_empty()
        || state
            .filter_keys()
            .iter()
            .any(|key| list.filter_value(*key) != contract_terminal::engine::ALL)
}

fn render_statistics(frame: &mut Frame, area: Rect, state: &AppState) {
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let names: Vec<String> = state
        .players
        .visible()
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let marker = if i == state.players.cursor() { ">" } else { " " };
            format!("{marker} {} ({})", p.name, p.team)
        })
        .collect();
    let list = Paragraph::new(names.join("\n"))
        .block(Block::default().title("Players").borders(Borders::RIGHT));
    frame.render_widget(list, split[0]);

    let Some(player) = state.selected_player() else {
        frame.render_widget(dim("Select a player".to_string()), split[1]);
        return;
    };
    let block = Block::default().title(format!(" {} ", player.name));
    if player.statistics.is_empty() {
        frame.render_widget(dim(NO_STATISTICS.to_string()).block(block), split[1]);
        return;
    }

    let bars: Vec<Bar> = player
        .statistics
        .iter()
        .map(|(name, value)| {
            Bar::default()
                .label(Line::from(name.to_string()))
                .value(value.max(0.0).round() as u64)
                .text_value(format_stat(value))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2);
    frame.render_widget(chart, split[1]);
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn render_form(frame: &mut Frame, area: Rect, panel: &FormPanel, focused: bool) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {} ", panel.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    match panel.form.phase() {
        FormPhase::Loading => {
            lines.push(Line::styled("Loading...", Style::default().fg(Color::Gray)));
        }
        FormPhase::LoadError(msg) => {
            lines.push(Line::styled(msg.clone(), Style::default().fg(Color::Red)));
        }
        phase => {
            for (idx, field) in panel.form.fields().into_iter().enumerate() {
                let hint = match field.kind {
                    FieldKind::Text => "",
                    FieldKind::Toggle | FieldKind::Choice => " ◂▸",
                };
                let mut style = Style::default();
                if !field.enabled {
                    style = style.fg(Color::DarkGray);
                }
                if idx == panel.field {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                lines.push(Line::styled(
                    format!("{:<26} {}{hint}", field.label, field.value),
                    style,
                ));
                if idx == panel.field {
                    for (i, suggestion) in panel.form.suggestions().into_iter().enumerate() {
                        let marker = if i == panel.suggestion { "›" } else { " " };
                        lines.push(Line::styled(
                            format!("    {marker} {suggestion}"),
                            Style::default().fg(Color::Yellow),
                        ));
                    }
                }
            }
            lines.push(Line::from(""));
            if *phase == FormPhase::Submitting {
                lines.push(Line::styled("Saving...", Style::default().fg(Color::Gray)));
            }
        }
    }
    match panel.form.message() {
        Some(FormMessage::Success(msg)) => {
            lines.push(Line::styled(msg.clone(), Style::default().fg(Color::Green)));
        }
        Some(FormMessage::Error(msg)) => {
            lines.push(Line::styled(msg.clone(), Style::default().fg(Color::Red)));
        }
        None => {}
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    frame.render_widget(Paragraph::new(text.to_string()).style(style), area);
}

fn dim(text: String) -> Paragraph<'static> {
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> &'static str {
    match state.focus {
        Focus::Search => "Type to search | Enter/Esc Done",
        Focus::Form => "Tab/↑/↓ Field | ←/→ Toggle | Enter Submit/Pick | Esc Close",
        Focus::List => {
            "1-4 View | j/k Move | n/p Page | +/- Size | / Search | f/t Filter | c Column | s Sort | a Add | e Edit | d Delete | r Refresh | ? Help | q Quit"
        }
    }
}

fn render_delete_confirm(frame: &mut Frame, area: Rect, name: &str) {
    let popup = centered_rect(40, 20, area);
    frame.render_widget(Clear, popup);
    let text = format!("Delete {name}?\n\nThis cannot be undone.\n\ny Confirm | n Cancel");
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(dialog, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Contract Terminal - Help",
        "",
        "Views:",
        "  1 Players  2 Teams  3 Transfers  4 Statistics",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  n/p or →/←   Next/previous page",
        "  + / -        Page size (5, 10, 25, 50)",
        "  /            Search by name",
        "  f / t        Cycle first/second filter",
        "  x            Clear filters",
        "  c / C        Move column cursor",
        "  s            Sort by column (again to flip)",
        "  a / e / d    Add / edit / delete",
        "  r            Refresh",
        "",
        "Forms:",
        "  Tab          Next field",
        "  ←/→ Space    Toggle or choose",
        "  Enter        Submit, or pick a suggestion",
        "  Esc          Close",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
