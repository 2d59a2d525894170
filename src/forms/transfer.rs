use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ValidationError;
use crate::model::{PlayerSuggestion, Team, Transfer, TransferPayload, TransferWindow, window_label};

use super::{
    FieldEdit, FieldKind, FieldView, FormController, FormDraft, SearchRequest, SearchResults,
    SearchTarget, edit_text, format_date, format_number, optional_number, optional_text,
    required_date, required_text, text_field,
};

pub type TransferForm = FormController<TransferDraft>;

// Process-wide so a reset draft never reuses a number still in flight.
static NEXT_SEARCH: AtomicU64 = AtomicU64::new(1);

const LABELS: [&str; 6] = [
    "Player",
    "From team",
    "To team",
    "Transfer date (YYYY-MM-DD)",
    "Window",
    "Fee",
];

#[derive(Debug, Clone, Default, PartialEq)]
struct Typeahead {
    pending: Option<(u64, SearchTarget)>,
    shown: Option<(SearchTarget, SearchResults)>,
}

impl Typeahead {
    fn request(&mut self, target: SearchTarget, query: &str) -> SearchRequest {
        let seq = NEXT_SEARCH.fetch_add(1, Ordering::Relaxed);
        self.pending = Some((seq, target));
        SearchRequest {
            seq,
            target,
            query: query.to_string(),
        }
    }

    fn accept(&mut self, seq: u64, results: SearchResults) -> bool {
        match self.pending {
            Some((pending, target)) if pending == seq => {
                self.pending = None;
                self.shown = Some((target, results));
                true
            }
            _ => false,
        }
    }

    fn clear(&mut self) {
        self.pending = None;
        self.shown = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferDraft {
    pub player_name: String,
    /// Set only by picking a suggestion; typing in the player field clears it.
    pub player_id: Option<u32>,
    pub nationality: Option<String>,
    pub nationality_flag: Option<String>,
    pub from_team: String,
    pub to_team: String,
    pub transfer_date: String,
    pub transfer_window: TransferWindow,
    pub fee: String,
    typeahead: Typeahead,
}

impl Default for TransferDraft {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            player_id: None,
            nationality: None,
            nationality_flag: None,
            from_team: String::new(),
            to_team: String::new(),
            transfer_date: String::new(),
            transfer_window: TransferWindow::Summer,
            fee: String::new(),
            typeahead: Typeahead::default(),
        }
    }
}

impl TransferDraft {
    pub fn suggestions(&self) -> Option<(SearchTarget, &SearchResults)> {
        self.typeahead
            .shown
            .as_ref()
            .map(|(target, results)| (*target, results))
    }

    pub fn suggestion_labels(&self) -> Vec<String> {
        match self.suggestions() {
            Some((_, SearchResults::Players(players))) => players
                .iter()
                .map(|p| {
                    if p.team.is_empty() {
                        p.name.clone()
                    } else {
                        format!("{} ({})", p.name, p.team)
                    }
                })
                .collect(),
            Some((_, SearchResults::Teams(teams))) => teams.iter().map(|t| t.name.clone()).collect(),
            None => Vec::new(),
        }
    }

    /// Apply search results; anything but the latest request is dropped.
    pub fn accept_results(&mut self, seq: u64, results: SearchResults) -> bool {
        self.typeahead.accept(seq, results)
    }

    pub fn select_player(&mut self, player: &PlayerSuggestion) {
        self.player_id = Some(player.id);
        self.player_name = player.name.clone();
        self.nationality = player.nationality.clone();
        self.nationality_flag = player.nationality_flag.clone();
        self.typeahead.clear();
    }

    pub fn select_team(&mut self, target: SearchTarget, team: &Team) {
        match target {
            SearchTarget::FromTeam => self.from_team = team.name.clone(),
            SearchTarget::ToTeam => self.to_team = team.name.clone(),
            SearchTarget::Player => return,
        }
        self.typeahead.clear();
    }

    /// Pick the `idx`-th shown suggestion.
    pub fn select_suggestion(&mut self, idx: usize) -> bool {
        let Some((target, results)) = self.typeahead.shown.clone() else {
            return false;
        };
        match results {
            SearchResults::Players(players) => match players.get(idx) {
                Some(player) => self.select_player(player),
                None => return false,
            },
            SearchResults::Teams(teams) => match teams.get(idx) {
                Some(team) => self.select_team(target, team),
                None => return false,
            },
        }
        true
    }

    pub fn dismiss_suggestions(&mut self) {
        self.typeahead.clear();
    }
}

impl FormDraft for TransferDraft {
    type Entity = Transfer;
    type Payload = TransferPayload;

    const NOUN: &'static str = "transfer";

    /// Prefill from an existing transfer (used to record a follow-up move).
    fn from_entity(transfer: &Transfer) -> Self {
        Self {
            player_name: transfer.player_name.clone().unwrap_or_default(),
            player_id: Some(transfer.player_id),
            nationality: transfer.nationality.clone(),
            nationality_flag: transfer.nationality_flag.clone(),
            from_team: transfer.to_team.clone(),
            to_team: String::new(),
            transfer_date: format_date(Some(transfer.transfer_date)),
            transfer_window: transfer.transfer_window,
            fee: transfer.fee.map(format_number).unwrap_or_default(),
            typeahead: Typeahead::default(),
        }
    }

    fn validate(&self) -> Result<TransferPayload, ValidationError> {
        let player_id = self.player_id.ok_or(ValidationError::MissingField("player"))?;
        let player_name = required_text("player", &self.player_name)?;
        let from_team = required_text("from team", &self.from_team)?;
        let to_team = required_text("to team", &self.to_team)?;
        let transfer_date = required_date("transfer date", &self.transfer_date)?;
        let fee = optional_number("fee", &self.fee)?;
        Ok(TransferPayload {
            player_id,
            player_name,
            nationality: self.nationality.as_deref().and_then(optional_text),
            nationality_flag: self.nationality_flag.as_deref().and_then(optional_text),
            from_team,
            to_team,
            transfer_date,
            transfer_window: self.transfer_window,
            fee,
        })
    }

    fn field_count(&self) -> usize {
        LABELS.len()
    }

    fn field(&self, idx: usize) -> Option<FieldView> {
        let label = *LABELS.get(idx)?;
        Some(match idx {
            0 => text_field(label, &self.player_name),
            1 => text_field(label, &self.from_team),
            2 => text_field(label, &self.to_team),
            3 => text_field(label, &self.transfer_date),
            4 => FieldView {
                label,
                value: window_label(self.transfer_window).to_string(),
                kind: FieldKind::Choice,
                enabled: true,
            },
            _ => text_field(label, &self.fee),
        })
    }

    fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest> {
        let (slot, target) = match idx {
            0 => (&mut self.player_name, SearchTarget::Player),
            1 => (&mut self.from_team, SearchTarget::FromTeam),
            2 => (&mut self.to_team, SearchTarget::ToTeam),
            3 => {
                edit_text(&mut self.transfer_date, edit);
                return None;
            }
            4 => {
                if let FieldEdit::Cycle(_) | FieldEdit::Char(' ') = edit {
                    self.transfer_window = match self.transfer_window {
                        TransferWindow::Summer => TransferWindow::Winter,
                        TransferWindow::Winter => TransferWindow::Summer,
                    };
                }
                return None;
            }
            5 => {
                edit_text(&mut self.fee, edit);
                return None;
            }
            _ => return None,
        };
        if matches!(edit, FieldEdit::Cycle(_)) {
            return None;
        }
        edit_text(slot, edit);
        let query = slot.clone();
        if target == SearchTarget::Player {
            self.player_id = None;
            self.nationality = None;
            self.nationality_flag = None;
        }
        Some(self.typeahead.request(target, &query))
    }
}

impl FormController<TransferDraft> {
    /// Deliver type-ahead results. Returns whether they were shown.
    pub fn accept_results(&mut self, seq: u64, results: SearchResults) -> bool {
        match self.phase {
            super::FormPhase::Idle | super::FormPhase::Editing => {
                self.draft.accept_results(seq, results)
            }
            _ => false,
        }
    }

    pub fn select_suggestion(&mut self, idx: usize) -> bool {
        self.edit(|draft| draft.select_suggestion(idx))
            .unwrap_or(false)
    }

    pub fn dismiss_suggestions(&mut self) {
        self.draft.dismiss_suggestions();
    }
}
