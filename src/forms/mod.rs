//! Form controllers.
//!
//! Every form runs the same machine:
//!
//! ```text
//! Idle -> Editing -> Submitting -> Idle      (success)
//!                              \-> Editing   (failure)
//! Loading -> Editing                          (edit forms)
//! Loading -> LoadError                        (terminal until reopened)
//! ```
//!
//! The draft holds raw text exactly as typed; it becomes a typed payload only
//! through [`FormDraft::validate`], which runs before any network call.

pub mod player;
pub mod team;
pub mod transfer;

use chrono::NaiveDate;

use crate::error::{ApiError, FormError, ValidationError};
use crate::model::{PlayerSuggestion, Team};

#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Idle,
    Loading,
    Editing,
    Submitting,
    LoadError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { id: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Toggle,
    Choice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    /// Conditional fields stay visible but are ignored while disabled.
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Char(char),
    Backspace,
    /// Flip a toggle or step a choice (`true` = forward).
    Cycle(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Player,
    FromTeam,
    ToTeam,
}

/// A type-ahead lookup the host must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub target: SearchTarget,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Players(Vec<PlayerSuggestion>),
    Teams(Vec<Team>),
}

pub trait FormDraft: Clone + Default {
    type Entity;
    type Payload;

    /// Noun used in user-facing messages ("player", "team").
    const NOUN: &'static str;

    fn from_entity(entity: &Self::Entity) -> Self;
    fn validate(&self) -> Result<Self::Payload, ValidationError>;

    fn field_count(&self) -> usize;
    fn field(&self, idx: usize) -> Option<FieldView>;
    fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest>;
}

#[derive(Debug, Clone)]
pub struct FormController<D: FormDraft> {
    mode: FormMode,
    phase: FormPhase,
    draft: D,
    message: Option<FormMessage>,
}

impl<D: FormDraft> FormController<D> {
    pub fn new_add() -> Self {
        Self {
            mode: FormMode::Add,
            phase: FormPhase::Idle,
            draft: D::default(),
            message: None,
        }
    }

    /// Starts in `Loading`; feed the fetched entity to [`Self::load`].
    pub fn new_edit(id: u32) -> Self {
        Self {
            mode: FormMode::Edit { id },
            phase: FormPhase::Loading,
            draft: D::default(),
            message: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn editing_id(&self) -> Option<u32> {
        match self.mode {
            FormMode::Edit { id } => Some(id),
            FormMode::Add => None,
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn load(&mut self, entity: &D::Entity) {
        if self.phase != FormPhase::Loading {
            return;
        }
        self.draft = D::from_entity(entity);
        self.phase = FormPhase::Editing;
        self.message = None;
    }

    pub fn load_failed(&mut self, err: &ApiError) {
        if self.phase != FormPhase::Loading {
            return;
        }
        self.phase = FormPhase::LoadError(format!(
            "Failed to load {} data: {err}. Close and reopen to retry.",
            D::NOUN
        ));
    }

    /// Mutate the draft. Refused while loading, submitting, or after a load error.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut D) -> R) -> Option<R> {
        match self.phase {
            FormPhase::Idle | FormPhase::Editing => {
                self.phase = FormPhase::Editing;
                Some(f(&mut self.draft))
            }
            _ => None,
        }
    }

    pub fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest> {
        self.edit(|draft| draft.apply(idx, edit)).flatten()
    }

    /// Validate and move to `Submitting`. The returned payload is what the
    /// host sends; the form stays locked until [`Self::complete_submit`].
    pub fn begin_submit(&mut self) -> Result<D::Payload, FormError> {
        match self.phase {
            FormPhase::Submitting => return Err(FormError::Busy),
            FormPhase::Loading | FormPhase::LoadError(_) => return Err(FormError::NotEditable),
            FormPhase::Idle | FormPhase::Editing => {}
        }
        match self.draft.validate() {
            Ok(payload) => {
                self.phase = FormPhase::Submitting;
                self.message = None;
                Ok(payload)
            }
            Err(err) => {
                self.phase = FormPhase::Editing;
                self.message = Some(FormMessage::Error(err.to_string()));
                Err(FormError::Validation(err))
            }
        }
    }

    /// Finish an in-flight submission. `on_success` runs once on success;
    /// add forms also reset to a blank draft. Outcomes arriving when nothing
    /// is in flight are ignored.
    pub fn complete_submit(
        &mut self,
        outcome: Result<(), ApiError>,
        on_success: impl FnOnce(),
    ) -> Result<(), FormError> {
        if self.phase != FormPhase::Submitting {
            return Ok(());
        }
        match outcome {
            Ok(()) => {
                if self.mode == FormMode::Add {
                    self.draft = D::default();
                }
                self.phase = FormPhase::Idle;
                let verb = match self.mode {
                    FormMode::Add => "added",
                    FormMode::Edit { .. } => "updated",
                };
                self.message = Some(FormMessage::Success(format!(
                    "{} {verb} successfully",
                    capitalize(D::NOUN)
                )));
                on_success();
                Ok(())
            }
            Err(err) => {
                self.phase = FormPhase::Editing;
                self.message = Some(FormMessage::Error(format!(
                    "Failed to save {}: {err}",
                    D::NOUN
                )));
                Err(FormError::Api(err))
            }
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---- shared field helpers ----

pub(crate) fn edit_text(target: &mut String, edit: FieldEdit) {
    match edit {
        FieldEdit::Char(ch) => target.push(ch),
        FieldEdit::Backspace => {
            target.pop();
        }
        FieldEdit::Cycle(_) => {}
    }
}

pub(crate) fn text_field(label: &'static str, value: &str) -> FieldView {
    FieldView {
        label,
        value: value.to_string(),
        kind: FieldKind::Text,
        enabled: true,
    }
}

pub(crate) fn required_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn required_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    optional_number(field, raw)?.ok_or(ValidationError::MissingField(field))
}

pub(crate) fn optional_number(field: &'static str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

pub(crate) fn required_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    optional_count(field, raw)?.ok_or(ValidationError::MissingField(field))
}

pub(crate) fn optional_count(field: &'static str, raw: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}

pub(crate) fn required_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    optional_date(field, raw)?.ok_or(ValidationError::MissingField(field))
}

pub(crate) fn optional_date(
    field: &'static str,
    raw: &str,
) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Render a stored number back into editable text (`12` not `12.0`).
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub(crate) fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
