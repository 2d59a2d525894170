use crate::error::ValidationError;
use crate::model::{Team, TeamPayload};

use super::{
    FieldEdit, FieldView, FormController, FormDraft, SearchRequest, edit_text, optional_text,
    required_text, text_field,
};

pub type TeamForm = FormController<TeamDraft>;

const LABELS: [&str; 6] = [
    "Name",
    "Logo URL",
    "Description",
    "Founded year",
    "Home stadium",
    "League",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDraft {
    pub name: String,
    pub team_logo: String,
    pub description: String,
    pub founded_year: String,
    pub home_stadium: String,
    pub league: String,
}

impl TeamDraft {
    fn slot(&mut self, idx: usize) -> Option<&mut String> {
        Some(match idx {
            0 => &mut self.name,
            1 => &mut self.team_logo,
            2 => &mut self.description,
            3 => &mut self.founded_year,
            4 => &mut self.home_stadium,
            5 => &mut self.league,
            _ => return None,
        })
    }

    fn value(&self, idx: usize) -> Option<&str> {
        Some(match idx {
            0 => &self.name,
            1 => &self.team_logo,
            2 => &self.description,
            3 => &self.founded_year,
            4 => &self.home_stadium,
            5 => &self.league,
            _ => return None,
        })
    }
}

impl FormDraft for TeamDraft {
    type Entity = Team;
    type Payload = TeamPayload;

    const NOUN: &'static str = "team";

    fn from_entity(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            team_logo: team.team_logo.clone().unwrap_or_default(),
            description: team.description.clone().unwrap_or_default(),
            founded_year: team
                .founded_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            home_stadium: team.home_stadium.clone().unwrap_or_default(),
            league: team.league.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<TeamPayload, ValidationError> {
        let name = required_text("name", &self.name)?;
        let founded_year = match optional_text(&self.founded_year) {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                ValidationError::InvalidNumber {
                    field: "founded year",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };
        Ok(TeamPayload {
            name,
            team_logo: optional_text(&self.team_logo),
            description: optional_text(&self.description),
            founded_year,
            home_stadium: optional_text(&self.home_stadium),
            league: optional_text(&self.league),
        })
    }

    fn field_count(&self) -> usize {
        LABELS.len()
    }

    fn field(&self, idx: usize) -> Option<FieldView> {
        Some(text_field(LABELS.get(idx)?, self.value(idx)?))
    }

    fn apply(&mut self, idx: usize, edit: FieldEdit) -> Option<SearchRequest> {
        if let Some(slot) = self.slot(idx) {
            edit_text(slot, edit);
        }
        None
    }
}
