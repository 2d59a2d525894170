use std::collections::{BTreeSet, VecDeque};

use crate::engine::{ALL, FilterKey, ListControls, ListEngine};
use crate::error::{ApiError, FormError};
use crate::forms::player::{PlayerForm, PlayerSubmission};
use crate::forms::team::TeamForm;
use crate::forms::transfer::TransferForm;
use crate::forms::{
    FieldEdit, FieldView, FormDraft, FormMessage, FormMode, FormPhase, SearchRequest,
    SearchResults,
};
use crate::listing::{TeamDirectory, TransferRow};
use crate::model::{
    Player, Position, Team, TeamPayload, Transfer, TransferPayload, TransferWindow, position_label,
    window_label,
};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Players,
    Teams,
    Transfers,
    Statistics,
}

impl View {
    pub const ALL: [View; 4] = [View::Players, View::Teams, View::Transfers, View::Statistics];

    fn index(self) -> usize {
        match self {
            View::Players => 0,
            View::Teams => 1,
            View::Transfers => 2,
            View::Statistics => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Team,
    Transfer,
}

#[derive(Debug, Clone)]
pub enum PanelForm {
    Player(PlayerForm),
    Team(TeamForm),
    Transfer(TransferForm),
}

impl PanelForm {
    pub fn kind(&self) -> EntityKind {
        match self {
            PanelForm::Player(_) => EntityKind::Player,
            PanelForm::Team(_) => EntityKind::Team,
            PanelForm::Transfer(_) => EntityKind::Transfer,
        }
    }

    pub fn mode(&self) -> FormMode {
        match self {
            PanelForm::Player(form) => form.mode(),
            PanelForm::Team(form) => form.mode(),
            PanelForm::Transfer(form) => form.mode(),
        }
    }

    pub fn phase(&self) -> &FormPhase {
        match self {
            PanelForm::Player(form) => form.phase(),
            PanelForm::Team(form) => form.phase(),
            PanelForm::Transfer(form) => form.phase(),
        }
    }

    pub fn message(&self) -> Option<&FormMessage> {
        match self {
            PanelForm::Player(form) => form.message(),
            PanelForm::Team(form) => form.message(),
            PanelForm::Transfer(form) => form.message(),
        }
    }

    pub fn fields(&self) -> Vec<FieldView> {
        fn collect<D: FormDraft>(draft: &D) -> Vec<FieldView> {
            (0..draft.field_count())
                .filter_map(|idx| draft.field(idx))
                .collect()
        }
        match self {
            PanelForm::Player(form) => collect(form.draft()),
            PanelForm::Team(form) => collect(form.draft()),
            PanelForm::Transfer(form) => collect(form.draft()),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            PanelForm::Transfer(form) => form.draft().suggestion_labels(),
            _ => Vec::new(),
        }
    }

    fn field_count(&self) -> usize {
        match self {
            PanelForm::Player(form) => form.draft().field_count(),
            PanelForm::Team(form) => form.draft().field_count(),
            PanelForm::Transfer(form) => form.draft().field_count(),
        }
    }

    fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest> {
        match self {
            PanelForm::Player(form) => form.apply(idx, edit),
            PanelForm::Team(form) => form.apply(idx, edit),
            PanelForm::Transfer(form) => form.apply(idx, edit),
        }
    }

    fn complete(
        &mut self,
        outcome: Result<(), ApiError>,
        on_success: impl FnOnce(),
    ) -> Result<(), FormError> {
        match self {
            PanelForm::Player(form) => form.complete_submit(outcome, on_success),
            PanelForm::Team(form) => form.complete_submit(outcome, on_success),
            PanelForm::Transfer(form) => form.complete_submit(outcome, on_success),
        }
    }
}

/// An open form plus the ticket its in-flight requests carry.
///
/// Replies whose ticket does not match the open panel belong to a form that
/// was closed or replaced and are dropped.
#[derive(Debug, Clone)]
pub struct FormPanel {
    pub ticket: u64,
    pub field: usize,
    pub suggestion: usize,
    pub form: PanelForm,
}

impl FormPanel {
    pub fn title(&self) -> String {
        let noun = match self.form.kind() {
            EntityKind::Player => "Player",
            EntityKind::Team => "Team",
            EntityKind::Transfer => "Transfer",
        };
        match self.form.mode() {
            FormMode::Add => format!("Add {noun}"),
            FormMode::Edit { id } => format!("Edit {noun} #{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    /// Players and teams, fetched in parallel.
    LoadPlayers,
    LoadTeams,
    /// Transfers and players, fetched in parallel.
    LoadTransfers,
    FetchPlayer {
        ticket: u64,
        id: u32,
    },
    FetchTeam {
        ticket: u64,
        id: u32,
    },
    SavePlayer {
        ticket: u64,
        id: Option<u32>,
        submission: PlayerSubmission,
    },
    SaveTeam {
        ticket: u64,
        id: Option<u32>,
        payload: TeamPayload,
    },
    SaveTransfer {
        ticket: u64,
        payload: TransferPayload,
    },
    DeletePlayer {
        id: u32,
    },
    DeleteTeam {
        id: u32,
    },
    Search {
        ticket: u64,
        request: SearchRequest,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    PlayersLoaded {
        players: Result<Vec<Player>, ApiError>,
        teams: Result<Vec<Team>, ApiError>,
    },
    TeamsLoaded(Result<Vec<Team>, ApiError>),
    TransfersLoaded {
        transfers: Result<Vec<Transfer>, ApiError>,
        players: Result<Vec<Player>, ApiError>,
    },
    PlayerFetched {
        ticket: u64,
        result: Result<Player, ApiError>,
    },
    TeamFetched {
        ticket: u64,
        result: Result<Team, ApiError>,
    },
    Saved {
        ticket: u64,
        kind: EntityKind,
        result: Result<u32, ApiError>,
    },
    Deleted {
        kind: EntityKind,
        id: u32,
        result: Result<(), ApiError>,
    },
    SearchResults {
        ticket: u64,
        seq: u64,
        result: Result<SearchResults, ApiError>,
    },
    Log(String),
}

pub struct AppState {
    pub view: View,
    pub focus: Focus,
    pub players: ListEngine<Player>,
    pub teams: ListEngine<Team>,
    pub transfers: ListEngine<TransferRow>,
    pub directory: TeamDirectory,
    pub panel: Option<FormPanel>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub backend_label: String,
    sort_cursor: [usize; 4],
    next_ticket: u64,
    outbox: Vec<ProviderCommand>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::engine::DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            view: View::Players,
            focus: Focus::List,
            players: ListEngine::new(page_size),
            teams: ListEngine::new(page_size),
            transfers: ListEngine::new(page_size),
            directory: TeamDirectory::default(),
            panel: None,
            logs: VecDeque::new(),
            help_overlay: false,
            backend_label: String::new(),
            sort_cursor: [0; 4],
            next_ticket: 0,
            outbox: Vec::new(),
        }
    }

    /// Queue the fetch for the view shown at startup.
    pub fn start(&mut self) {
        self.queue_view_load();
    }

    pub fn take_commands(&mut self) -> Vec<ProviderCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    // ---- views ----

    /// Switch views. The new view re-fetches; an open form is discarded.
    pub fn set_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.focus = Focus::List;
        self.panel = None;
        self.queue_view_load();
    }

    pub fn refresh(&mut self) {
        self.push_log(format!("[INFO] Refreshing {}", view_label(self.view)));
        self.queue_view_load();
    }

    fn view_load_command(&self) -> ProviderCommand {
        match self.view {
            View::Players | View::Statistics => ProviderCommand::LoadPlayers,
            View::Teams => ProviderCommand::LoadTeams,
            View::Transfers => ProviderCommand::LoadTransfers,
        }
    }

    fn queue_view_load(&mut self) {
        let cmd = self.view_load_command();
        self.queue_load(cmd);
    }

    fn queue_load(&mut self, cmd: ProviderCommand) {
        // Rows already on screen stay visible until the refetch lands.
        match cmd {
            ProviderCommand::LoadPlayers => {
                if !self.players.is_ready() {
                    self.players.begin_load();
                }
            }
            ProviderCommand::LoadTeams => {
                if !self.teams.is_ready() {
                    self.teams.begin_load();
                }
            }
            ProviderCommand::LoadTransfers => {
                if !self.transfers.is_ready() {
                    self.transfers.begin_load();
                }
            }
            _ => {}
        }
        if !self.outbox.contains(&cmd) {
            self.outbox.push(cmd);
        }
    }

    fn refresh_after_mutation(&mut self, kind: EntityKind) {
        let cmd = match kind {
            EntityKind::Player => ProviderCommand::LoadPlayers,
            EntityKind::Team => ProviderCommand::LoadTeams,
            EntityKind::Transfer => ProviderCommand::LoadTransfers,
        };
        self.queue_load(cmd);
        self.queue_view_load();
    }

    // ---- list controls ----

    pub fn active_list(&self) -> &dyn ListControls {
        match self.view {
            View::Players | View::Statistics => &self.players,
            View::Teams => &self.teams,
            View::Transfers => &self.transfers,
        }
    }

    pub fn active_list_mut(&mut self) -> &mut dyn ListControls {
        match self.view {
            View::Players | View::Statistics => &mut self.players,
            View::Teams => &mut self.teams,
            View::Transfers => &mut self.transfers,
        }
    }

    pub fn filter_keys(&self) -> &'static [FilterKey] {
        match self.view {
            View::Players | View::Statistics => &[FilterKey::Position, FilterKey::Team],
            View::Teams => &[FilterKey::League],
            View::Transfers => &[FilterKey::Team, FilterKey::Window],
        }
    }

    /// Choices for a categorical filter, `All` first.
    pub fn filter_options(&self, key: FilterKey) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        match key {
            FilterKey::Search => return Vec::new(),
            FilterKey::Position => {
                options.extend(Position::ALL.map(|p| position_label(p).to_string()));
            }
            FilterKey::Window => {
                options.extend(
                    [TransferWindow::Summer, TransferWindow::Winter]
                        .map(|w| window_label(w).to_string()),
                );
            }
            FilterKey::Team => {
                let names: BTreeSet<String> = match self.view {
                    View::Transfers => self
                        .transfers
                        .items()
                        .iter()
                        .map(|row| row.transfer.to_team.clone())
                        .collect(),
                    _ => self
                        .directory
                        .names()
                        .into_iter()
                        .chain(self.players.items().iter().map(|p| p.team.clone()))
                        .filter(|name| !name.is_empty())
                        .collect(),
                };
                let mut names: Vec<String> = names.into_iter().collect();
                names.sort_by(|a, b| crate::engine::compare_text(a, b));
                options.extend(names);
            }
            FilterKey::League => {
                let leagues: BTreeSet<String> = self
                    .teams
                    .items()
                    .iter()
                    .filter_map(|t| t.league.clone())
                    .filter(|league| !league.is_empty())
                    .collect();
                options.extend(leagues);
            }
        }
        options
    }

    /// Advance the `slot`-th filter of the current view to its next option.
    pub fn cycle_filter(&mut self, slot: usize) {
        let Some(key) = self.filter_keys().get(slot).copied() else {
            return;
        };
        let options = self.filter_options(key);
        let current = self.active_list().filter_value(key).to_string();
        let next = options
            .iter()
            .position(|opt| *opt == current)
            .map_or(0, |idx| (idx + 1) % options.len());
        let value = options.get(next).cloned().unwrap_or_else(|| ALL.to_string());
        self.active_list_mut().set_filter_value(key, value);
    }

    pub fn clear_filters(&mut self) {
        self.active_list_mut().clear_filters();
    }

    pub fn begin_search(&mut self) {
        self.focus = Focus::Search;
    }

    pub fn end_search(&mut self) {
        self.focus = Focus::List;
    }

    pub fn search_edit(&mut self, edit: FieldEdit) {
        let mut text = self.active_list().filter_value(FilterKey::Search).to_string();
        crate::forms::edit_text(&mut text, edit);
        self.active_list_mut().set_filter_value(FilterKey::Search, text);
    }

    pub fn sort_cursor(&self) -> usize {
        self.sort_cursor[self.view.index()]
    }

    pub fn move_sort_cursor(&mut self, forward: bool) {
        let count = self.active_list().column_count().max(1);
        let slot = &mut self.sort_cursor[self.view.index()];
        *slot = if forward {
            (*slot + 1) % count
        } else {
            (*slot + count - 1) % count
        };
    }

    /// Header click on the column under the sort cursor.
    pub fn sort_current_column(&mut self) {
        let idx = self.sort_cursor();
        self.active_list_mut().sort_by_column(idx);
    }

    // ---- delete ----

    pub fn request_delete(&mut self) -> bool {
        if !matches!(self.view, View::Players | View::Teams) {
            self.push_log("[INFO] Transfers cannot be deleted");
            return false;
        }
        let Some(id) = self.active_list().selected_id() else {
            return false;
        };
        self.active_list_mut().stage_delete(id)
    }

    pub fn staged_delete_name(&self) -> Option<String> {
        self.active_list().staged_delete_name()
    }

    pub fn cancel_delete(&mut self) {
        self.active_list_mut().cancel_delete();
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.active_list_mut().confirm_delete() else {
            return;
        };
        let cmd = match self.view {
            View::Players => ProviderCommand::DeletePlayer { id },
            View::Teams => ProviderCommand::DeleteTeam { id },
            _ => return,
        };
        self.push_log(format!("[INFO] Deleting #{id}"));
        self.outbox.push(cmd);
    }

    // ---- forms ----

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    pub fn open_add_form(&mut self) {
        let form = match self.view {
            View::Players | View::Statistics => PanelForm::Player(PlayerForm::new_add()),
            View::Teams => PanelForm::Team(TeamForm::new_add()),
            View::Transfers => PanelForm::Transfer(TransferForm::new_add()),
        };
        self.open_panel(form);
    }

    /// Open the edit form for the selected row and fetch its current state.
    pub fn open_edit_form(&mut self) {
        let Some(id) = self.active_list().selected_id() else {
            return;
        };
        let ticket = self.issue_ticket();
        let (form, cmd) = match self.view {
            View::Players | View::Statistics => (
                PanelForm::Player(PlayerForm::new_edit(id)),
                ProviderCommand::FetchPlayer { ticket, id },
            ),
            View::Teams => (
                PanelForm::Team(TeamForm::new_edit(id)),
                ProviderCommand::FetchTeam { ticket, id },
            ),
            View::Transfers => {
                self.push_log("[INFO] Transfers are read-only once recorded");
                return;
            }
        };
        self.panel = Some(FormPanel {
            ticket,
            field: 0,
            suggestion: 0,
            form,
        });
        self.focus = Focus::Form;
        self.outbox.push(cmd);
    }

    fn open_panel(&mut self, form: PanelForm) {
        let ticket = self.issue_ticket();
        self.panel = Some(FormPanel {
            ticket,
            field: 0,
            suggestion: 0,
            form,
        });
        self.focus = Focus::Form;
    }

    pub fn close_form(&mut self) {
        self.panel = None;
        self.focus = Focus::List;
    }

    pub fn form_next_field(&mut self, forward: bool) {
        if let Some(panel) = self.panel.as_mut() {
            let count = panel.form.field_count().max(1);
            panel.field = if forward {
                (panel.field + 1) % count
            } else {
                (panel.field + count - 1) % count
            };
        }
    }

    pub fn form_input(&mut self, edit: FieldEdit) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if let Some(request) = panel.form.apply(panel.field, edit) {
            panel.suggestion = 0;
            let ticket = panel.ticket;
            self.outbox.push(ProviderCommand::Search { ticket, request });
        }
    }

    pub fn form_move_suggestion(&mut self, forward: bool) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let count = panel.form.suggestions().len();
        if count == 0 {
            return;
        }
        panel.suggestion = if forward {
            (panel.suggestion + 1) % count
        } else {
            (panel.suggestion + count - 1) % count
        };
    }

    /// Pick the highlighted type-ahead suggestion, if one is shown.
    pub fn form_pick_suggestion(&mut self) -> bool {
        let Some(panel) = self.panel.as_mut() else {
            return false;
        };
        let idx = panel.suggestion;
        match &mut panel.form {
            PanelForm::Transfer(form) => {
                panel.suggestion = 0;
                form.select_suggestion(idx)
            }
            _ => false,
        }
    }

    pub fn form_dismiss_suggestions(&mut self) {
        if let Some(FormPanel {
            form: PanelForm::Transfer(form),
            ..
        }) = self.panel.as_mut()
        {
            form.dismiss_suggestions();
        }
    }

    pub fn submit_form(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let ticket = panel.ticket;
        let result = match &mut panel.form {
            PanelForm::Player(form) => {
                let id = form.editing_id();
                form.begin_submit()
                    .map(|submission| ProviderCommand::SavePlayer {
                        ticket,
                        id,
                        submission,
                    })
            }
            PanelForm::Team(form) => {
                let id = form.editing_id();
                form.begin_submit()
                    .map(|payload| ProviderCommand::SaveTeam {
                        ticket,
                        id,
                        payload,
                    })
            }
            PanelForm::Transfer(form) => form
                .begin_submit()
                .map(|payload| ProviderCommand::SaveTransfer { ticket, payload }),
        };
        match result {
            Ok(cmd) => self.outbox.push(cmd),
            Err(FormError::Busy) => self.push_log("[INFO] Submission already in progress"),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    /// The statistics view charts the player under the players cursor.
    pub fn selected_player(&self) -> Option<&Player> {
        self.players.selected()
    }

    fn panel_for(&mut self, ticket: u64) -> Option<&mut FormPanel> {
        self.panel.as_mut().filter(|panel| panel.ticket == ticket)
    }
}

pub fn view_label(view: View) -> &'static str {
    match view {
        View::Players => "Players",
        View::Teams => "Teams",
        View::Transfers => "Transfers",
        View::Statistics => "Statistics",
    }
}

pub fn entity_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Player => "player",
        EntityKind::Team => "team",
        EntityKind::Transfer => "transfer",
    }
}

pub fn filter_label(key: FilterKey) -> &'static str {
    match key {
        FilterKey::Search => "Search",
        FilterKey::Position => "Position",
        FilterKey::Team => "Team",
        FilterKey::League => "League",
        FilterKey::Window => "Window",
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::PlayersLoaded { players, teams } => {
            // Both halves or nothing: rows are never shown without their teams.
            let loaded = players
                .map_err(|err| format!("Failed to load players: {err}"))
                .and_then(|players| {
                    teams
                        .map(|teams| (players, teams))
                        .map_err(|err| format!("Failed to load teams: {err}"))
                });
            match loaded {
                Ok((players, teams)) => {
                    state.directory = TeamDirectory::from_teams(&teams);
                    state.players.set_notice(None);
                    state.players.replace_items(players);
                    let dangling = state.directory.dangling(state.players.items()).len();
                    if dangling > 0 {
                        state.push_log(format!(
                            "[INFO] {dangling} player(s) reference a team that no longer exists"
                        ));
                    }
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] {msg}"));
                    state.directory = TeamDirectory::default();
                    state.players.fail_load(msg);
                }
            }
        }
        Delta::TeamsLoaded(result) => match result {
            Ok(teams) => {
                state.directory = TeamDirectory::from_teams(&teams);
                state.teams.replace_items(teams);
            }
            Err(err) => {
                let msg = format!("Failed to load teams: {err}");
                state.push_log(format!("[WARN] {msg}"));
                state.teams.fail_load(msg);
            }
        },
        Delta::TransfersLoaded { transfers, players } => {
            let loaded = transfers
                .map_err(|err| format!("Failed to load transfers: {err}"))
                .and_then(|transfers| {
                    players
                        .map(|players| TransferRow::resolve(transfers, &players))
                        .map_err(|err| format!("Failed to load players: {err}"))
                });
            match loaded {
                Ok(rows) => {
                    state.transfers.set_notice(None);
                    state.transfers.replace_items(rows);
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] {msg}"));
                    state.transfers.fail_load(msg);
                }
            }
        }
        Delta::PlayerFetched { ticket, result } => {
            let Some(FormPanel {
                form: PanelForm::Player(form),
                ..
            }) = state.panel_for(ticket)
            else {
                return;
            };
            match result {
                Ok(player) => form.load(&player),
                Err(err) => form.load_failed(&err),
            }
        }
        Delta::TeamFetched { ticket, result } => {
            let Some(FormPanel {
                form: PanelForm::Team(form),
                ..
            }) = state.panel_for(ticket)
            else {
                return;
            };
            match result {
                Ok(team) => form.load(&team),
                Err(err) => form.load_failed(&err),
            }
        }
        Delta::Saved {
            ticket,
            kind,
            result,
        } => {
            let mut close = false;
            let mut stray = None;
            if let Some(panel) = state.panel_for(ticket) {
                let mut succeeded = false;
                let outcome = result.clone().map(|_| ());
                match panel.form.complete(outcome, || succeeded = true) {
                    Ok(()) if succeeded => {
                        close = matches!(panel.form.mode(), FormMode::Edit { .. });
                        panel.field = 0;
                        panel.suggestion = 0;
                    }
                    // the form already settled; a repeated reply changes nothing
                    Ok(()) => {}
                    // shown inline on the form and logged from `result` below
                    Err(FormError::Api(_)) => {}
                    Err(err) => stray = Some(err),
                }
            }
            if let Some(err) = stray {
                state.push_log(format!("[WARN] Unexpected save reply: {err}"));
            }
            if close {
                state.close_form();
            }
            // The server state changed even if the form has since closed.
            match result {
                Ok(id) => {
                    state.push_log(format!("[INFO] Saved {} #{id}", entity_label(kind)));
                    state.refresh_after_mutation(kind);
                }
                Err(err) => {
                    state.push_log(format!(
                        "[WARN] Failed to save {}: {err}",
                        entity_label(kind)
                    ));
                }
            }
        }
        Delta::Deleted { kind, id, result } => match result {
            Ok(()) => {
                state.push_log(format!("[INFO] Deleted {} #{id}", entity_label(kind)));
                state.refresh_after_mutation(kind);
            }
            Err(err) => {
                let msg = format!("Failed to delete {}: {err}", entity_label(kind));
                state.push_log(format!("[WARN] {msg}"));
                match kind {
                    EntityKind::Player => state.players.set_notice(Some(msg)),
                    EntityKind::Team => state.teams.set_notice(Some(msg)),
                    EntityKind::Transfer => state.transfers.set_notice(Some(msg)),
                }
            }
        },
        Delta::SearchResults {
            ticket,
            seq,
            result,
        } => match result {
            Ok(results) => {
                if let Some(FormPanel {
                    form: PanelForm::Transfer(form),
                    suggestion,
                    ..
                }) = state.panel_for(ticket)
                    && form.accept_results(seq, results)
                {
                    *suggestion = 0;
                }
            }
            Err(err) => state.push_log(format!("[WARN] Search failed: {err}")),
        },
        Delta::Log(msg) => state.push_log(msg),
    }
}
