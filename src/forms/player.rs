use std::path::PathBuf;

use crate::error::ValidationError;
use crate::model::{Player, PlayerPayload, Position, PreferredFoot, foot_label, position_label};
use crate::statistics::parse_statistics;

use super::{
    FieldEdit, FieldKind, FieldView, FormController, FormDraft, SearchRequest, edit_text,
    format_date, format_number, optional_count, optional_number, optional_text,
    required_count, required_date, required_number, required_text, text_field, yes_no,
};

pub type PlayerForm = FormController<PlayerDraft>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Position,
    Team,
    Nationality,
    NationalityFlag,
    Price,
    ContractDuration,
    YearsLeft,
    ContractStartDate,
    SigningDate,
    OnLoan,
    LoanTeam,
    SellOnClause,
    SellOnPercentage,
    Statistics,
    PlayerImage,
    ImagePath,
    JerseyNumber,
    Age,
    Height,
    Weight,
    PreferredFoot,
}

impl PlayerField {
    pub const ALL: [PlayerField; 22] = [
        PlayerField::Name,
        PlayerField::Position,
        PlayerField::Team,
        PlayerField::Nationality,
        PlayerField::NationalityFlag,
        PlayerField::Price,
        PlayerField::ContractDuration,
        PlayerField::YearsLeft,
        PlayerField::ContractStartDate,
        PlayerField::SigningDate,
        PlayerField::OnLoan,
        PlayerField::LoanTeam,
        PlayerField::SellOnClause,
        PlayerField::SellOnPercentage,
        PlayerField::Statistics,
        PlayerField::PlayerImage,
        PlayerField::ImagePath,
        PlayerField::JerseyNumber,
        PlayerField::Age,
        PlayerField::Height,
        PlayerField::Weight,
        PlayerField::PreferredFoot,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// Raw player form input. Text stays as typed until [`FormDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDraft {
    pub name: String,
    pub position: Option<Position>,
    pub team: String,
    pub nationality: String,
    pub nationality_flag: String,
    pub price: String,
    pub contract_duration: String,
    pub years_left: String,
    pub contract_start_date: String,
    pub signing_date: String,
    pub on_loan: bool,
    pub loan_team: String,
    pub sell_on_clause: bool,
    pub sell_on_percentage: String,
    pub statistics: String,
    pub player_image: String,
    /// Local file uploaded before the player is saved.
    pub image_path: String,
    pub jersey_number: String,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub preferred_foot: Option<PreferredFoot>,
}

impl Default for PlayerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: None,
            team: String::new(),
            nationality: String::new(),
            nationality_flag: String::new(),
            price: String::new(),
            contract_duration: String::new(),
            years_left: String::new(),
            contract_start_date: String::new(),
            signing_date: String::new(),
            on_loan: false,
            loan_team: String::new(),
            sell_on_clause: false,
            sell_on_percentage: String::new(),
            statistics: "{}".to_string(),
            player_image: String::new(),
            image_path: String::new(),
            jersey_number: String::new(),
            age: String::new(),
            height: String::new(),
            weight: String::new(),
            preferred_foot: None,
        }
    }
}

/// A validated player plus the image that still has to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSubmission {
    pub payload: PlayerPayload,
    pub image_path: Option<PathBuf>,
}

impl PlayerDraft {
    pub fn set_text(&mut self, field: PlayerField, value: &str) {
        if let Some(slot) = self.text_slot(field) {
            *slot = value.to_string();
        }
    }

    fn text_slot(&mut self, field: PlayerField) -> Option<&mut String> {
        Some(match field {
            PlayerField::Name => &mut self.name,
            PlayerField::Team => &mut self.team,
            PlayerField::Nationality => &mut self.nationality,
            PlayerField::NationalityFlag => &mut self.nationality_flag,
            PlayerField::Price => &mut self.price,
            PlayerField::ContractDuration => &mut self.contract_duration,
            PlayerField::YearsLeft => &mut self.years_left,
            PlayerField::ContractStartDate => &mut self.contract_start_date,
            PlayerField::SigningDate => &mut self.signing_date,
            PlayerField::LoanTeam => &mut self.loan_team,
            PlayerField::SellOnPercentage => &mut self.sell_on_percentage,
            PlayerField::Statistics => &mut self.statistics,
            PlayerField::PlayerImage => &mut self.player_image,
            PlayerField::ImagePath => &mut self.image_path,
            PlayerField::JerseyNumber => &mut self.jersey_number,
            PlayerField::Age => &mut self.age,
            PlayerField::Height => &mut self.height,
            PlayerField::Weight => &mut self.weight,
            PlayerField::Position
            | PlayerField::OnLoan
            | PlayerField::SellOnClause
            | PlayerField::PreferredFoot => return None,
        })
    }
}

impl FormDraft for PlayerDraft {
    type Entity = Player;
    type Payload = PlayerSubmission;

    const NOUN: &'static str = "player";

    fn from_entity(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            position: Some(player.position),
            team: player.team.clone(),
            nationality: player.nationality.clone().unwrap_or_default(),
            nationality_flag: player.nationality_flag.clone().unwrap_or_default(),
            price: format_number(player.price),
            contract_duration: player.contract_duration.to_string(),
            years_left: player.years_left.to_string(),
            contract_start_date: format_date(player.contract_start_date),
            signing_date: format_date(player.signing_date),
            on_loan: player.on_loan,
            loan_team: player.loan_team.clone().unwrap_or_default(),
            sell_on_clause: player.sell_on_clause,
            sell_on_percentage: player
                .sell_on_percentage
                .map(format_number)
                .unwrap_or_default(),
            statistics: player.statistics.to_text(),
            player_image: player.player_image.clone().unwrap_or_default(),
            image_path: String::new(),
            jersey_number: player
                .jersey_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            age: player.age.map(|n| n.to_string()).unwrap_or_default(),
            height: player.height.map(format_number).unwrap_or_default(),
            weight: player.weight.map(format_number).unwrap_or_default(),
            preferred_foot: player.preferred_foot,
        }
    }

    fn validate(&self) -> Result<PlayerSubmission, ValidationError> {
        let name = required_text("name", &self.name)?;
        let position = self
            .position
            .ok_or(ValidationError::MissingField("position"))?;
        let team = required_text("team", &self.team)?;
        let price = required_number("price", &self.price)?;
        let contract_duration = required_count("contract duration", &self.contract_duration)?;
        let years_left = required_count("years left", &self.years_left)?;
        let contract_start_date = required_date("contract start date", &self.contract_start_date)?;
        let signing_date = required_date("signing date", &self.signing_date)?;

        // Disabled conditional fields keep their text in the draft but are
        // never sent.
        let loan_team = if self.on_loan {
            optional_text(&self.loan_team)
        } else {
            None
        };
        let sell_on_percentage = if self.sell_on_clause {
            let pct = required_number("sell-on percentage", &self.sell_on_percentage)?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(ValidationError::PercentageOutOfRange(pct));
            }
            Some(pct)
        } else {
            None
        };

        let statistics = parse_statistics(&self.statistics)?;

        let payload = PlayerPayload {
            name,
            position,
            team,
            price,
            contract_duration,
            years_left,
            on_loan: self.on_loan,
            loan_team,
            statistics,
            contract_start_date,
            signing_date,
            sell_on_clause: self.sell_on_clause,
            sell_on_percentage,
            nationality: optional_text(&self.nationality),
            nationality_flag: optional_text(&self.nationality_flag),
            player_image: optional_text(&self.player_image),
            jersey_number: optional_count("jersey number", &self.jersey_number)?,
            age: optional_count("age", &self.age)?,
            height: optional_number("height", &self.height)?,
            weight: optional_number("weight", &self.weight)?,
            preferred_foot: self.preferred_foot,
        };
        Ok(PlayerSubmission {
            payload,
            image_path: optional_text(&self.image_path).map(PathBuf::from),
        })
    }

    fn field_count(&self) -> usize {
        PlayerField::ALL.len()
    }

    fn field(&self, idx: usize) -> Option<FieldView> {
        let field = *PlayerField::ALL.get(idx)?;
        let view = match field {
            PlayerField::Name => text_field("Name", &self.name),
            PlayerField::Position => FieldView {
                label: "Position",
                value: self
                    .position
                    .map(position_label)
                    .unwrap_or("Select position")
                    .to_string(),
                kind: FieldKind::Choice,
                enabled: true,
            },
            PlayerField::Team => text_field("Team", &self.team),
            PlayerField::Nationality => text_field("Nationality", &self.nationality),
            PlayerField::NationalityFlag => text_field("Flag URL", &self.nationality_flag),
            PlayerField::Price => text_field("Price", &self.price),
            PlayerField::ContractDuration => {
                text_field("Contract duration (years)", &self.contract_duration)
            }
            PlayerField::YearsLeft => text_field("Years left", &self.years_left),
            PlayerField::ContractStartDate => {
                text_field("Contract start (YYYY-MM-DD)", &self.contract_start_date)
            }
            PlayerField::SigningDate => text_field("Signing date (YYYY-MM-DD)", &self.signing_date),
            PlayerField::OnLoan => FieldView {
                label: "On loan",
                value: yes_no(self.on_loan),
                kind: FieldKind::Toggle,
                enabled: true,
            },
            PlayerField::LoanTeam => FieldView {
                enabled: self.on_loan,
                ..text_field("Loan team", &self.loan_team)
            },
            PlayerField::SellOnClause => FieldView {
                label: "Sell-on clause",
                value: yes_no(self.sell_on_clause),
                kind: FieldKind::Toggle,
                enabled: true,
            },
            PlayerField::SellOnPercentage => FieldView {
                enabled: self.sell_on_clause,
                ..text_field("Sell-on %", &self.sell_on_percentage)
            },
            PlayerField::Statistics => text_field("Statistics (JSON)", &self.statistics),
            PlayerField::PlayerImage => text_field("Image URL", &self.player_image),
            PlayerField::ImagePath => text_field("Upload image (path)", &self.image_path),
            PlayerField::JerseyNumber => text_field("Jersey number", &self.jersey_number),
            PlayerField::Age => text_field("Age", &self.age),
            PlayerField::Height => text_field("Height (cm)", &self.height),
            PlayerField::Weight => text_field("Weight (kg)", &self.weight),
            PlayerField::PreferredFoot => FieldView {
                label: "Preferred foot",
                value: self.preferred_foot.map(foot_label).unwrap_or("-").to_string(),
                kind: FieldKind::Choice,
                enabled: true,
            },
        };
        Some(view)
    }

    fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest> {
        let field = *PlayerField::ALL.get(idx)?;
        match (field, edit) {
            (PlayerField::Position, FieldEdit::Cycle(forward)) => {
                self.position = cycle(&Position::ALL, self.position, forward);
            }
            (PlayerField::PreferredFoot, FieldEdit::Cycle(forward)) => {
                const FEET: [PreferredFoot; 3] =
                    [PreferredFoot::Left, PreferredFoot::Right, PreferredFoot::Both];
                self.preferred_foot = cycle(&FEET, self.preferred_foot, forward);
            }
            (PlayerField::OnLoan, FieldEdit::Cycle(_) | FieldEdit::Char(' ')) => {
                self.on_loan = !self.on_loan;
            }
            (PlayerField::SellOnClause, FieldEdit::Cycle(_) | FieldEdit::Char(' ')) => {
                self.sell_on_clause = !self.sell_on_clause;
            }
            _ => {
                if let Some(slot) = self.text_slot(field) {
                    edit_text(slot, edit);
                }
            }
        }
        None
    }
}

/// Step through `None, options[0], .., options[n-1], None`.
fn cycle<T: Copy + PartialEq>(options: &[T], current: Option<T>, forward: bool) -> Option<T> {
    let pos = current.and_then(|c| options.iter().position(|o| *o == c));
    let len = options.len() + 1;
    let slot = pos.map_or(0, |p| p + 1);
    let next = if forward {
        (slot + 1) % len
    } else {
        (slot + len - 1) % len
    };
    next.checked_sub(1).map(|i| options[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PlayerDraft {
        PlayerDraft {
            name: "Ada Striker".into(),
            position: Some(Position::Forward),
            team: "Rovers".into(),
            price: "1500000".into(),
            contract_duration: "4".into(),
            years_left: "2".into(),
            contract_start_date: "2023-07-01".into(),
            signing_date: "2023-06-20".into(),
            ..PlayerDraft::default()
        }
    }

    #[test]
    fn cycle_wraps_through_none() {
        let all = Position::ALL;
        assert_eq!(cycle(&all, None, true), Some(Position::Goalkeeper));
        assert_eq!(cycle(&all, Some(Position::Forward), true), None);
        assert_eq!(cycle(&all, None, false), Some(Position::Forward));
    }

    #[test]
    fn stale_loan_team_is_not_sent() {
        let mut draft = valid_draft();
        draft.loan_team = "Wanderers".into();
        let sub = draft.validate().unwrap();
        assert_eq!(sub.payload.loan_team, None);
        assert_eq!(draft.loan_team, "Wanderers");

        draft.on_loan = true;
        let sub = draft.validate().unwrap();
        assert_eq!(sub.payload.loan_team.as_deref(), Some("Wanderers"));
    }

    #[test]
    fn sell_on_percentage_only_checked_when_clause_enabled() {
        let mut draft = valid_draft();
        draft.sell_on_percentage = "250".into();
        assert!(draft.validate().is_ok());

        draft.sell_on_clause = true;
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::PercentageOutOfRange(250.0)
        );
        draft.sell_on_percentage = "15".into();
        assert_eq!(draft.validate().unwrap().payload.sell_on_percentage, Some(15.0));
    }
}
