use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(alias = "goalkeeper")]
    Goalkeeper,
    #[serde(alias = "defender")]
    Defender,
    #[serde(alias = "midfielder")]
    Midfielder,
    #[serde(alias = "forward")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|pos| position_label(*pos).eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferWindow {
    #[serde(alias = "Summer")]
    Summer,
    #[serde(alias = "Winter")]
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFoot {
    #[serde(alias = "Left")]
    Left,
    #[serde(alias = "Right")]
    Right,
    #[serde(alias = "Both")]
    Both,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Position,
    // Team name, joined to `Team.name` by string equality.
    #[serde(default, deserialize_with = "team_name")]
    pub team: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub contract_duration: u32,
    #[serde(default)]
    pub years_left: u32,
    #[serde(default)]
    pub on_loan: bool,
    #[serde(default)]
    pub loan_team: Option<String>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub contract_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub signing_date: Option<NaiveDate>,
    #[serde(default)]
    pub sell_on_clause: bool,
    #[serde(default)]
    pub sell_on_percentage: Option<f64>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub nationality_flag: Option<String>,
    #[serde(default)]
    pub player_image: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub preferred_foot: Option<PreferredFoot>,
}

/// Full-replace body for `POST /players` and `PUT /players/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerPayload {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub price: f64,
    pub contract_duration: u32,
    pub years_left: u32,
    pub on_loan: bool,
    pub loan_team: Option<String>,
    pub statistics: Statistics,
    pub contract_start_date: NaiveDate,
    pub signing_date: NaiveDate,
    pub sell_on_clause: bool,
    pub sell_on_percentage: Option<f64>,
    pub nationality: Option<String>,
    pub nationality_flag: Option<String>,
    pub player_image: Option<String>,
    pub jersey_number: Option<u32>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub preferred_foot: Option<PreferredFoot>,
}

impl PlayerPayload {
    pub fn into_player(self, id: u32) -> Player {
        Player {
            id,
            name: self.name,
            position: self.position,
            team: self.team,
            price: self.price,
            contract_duration: self.contract_duration,
            years_left: self.years_left,
            on_loan: self.on_loan,
            loan_team: self.loan_team,
            statistics: self.statistics,
            contract_start_date: Some(self.contract_start_date),
            signing_date: Some(self.signing_date),
            sell_on_clause: self.sell_on_clause,
            sell_on_percentage: self.sell_on_percentage,
            nationality: self.nationality,
            nationality_flag: self.nationality_flag,
            player_image: self.player_image,
            jersey_number: self.jersey_number,
            age: self.age,
            height: self.height,
            weight: self.weight,
            preferred_foot: self.preferred_foot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub team_logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub home_stadium: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPayload {
    pub name: String,
    pub team_logo: Option<String>,
    pub description: Option<String>,
    pub founded_year: Option<i32>,
    pub home_stadium: Option<String>,
    pub league: Option<String>,
}

impl TeamPayload {
    pub fn into_team(self, id: u32) -> Team {
        Team {
            id,
            name: self.name,
            team_logo: self.team_logo,
            description: self.description,
            founded_year: self.founded_year,
            home_stadium: self.home_stadium,
            league: self.league,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transfer {
    pub id: u32,
    pub player_id: u32,
    // Denormalized at transfer time; older rows may not carry them.
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub nationality_flag: Option<String>,
    #[serde(default)]
    pub from_team: String,
    #[serde(default)]
    pub to_team: String,
    pub transfer_date: NaiveDate,
    pub transfer_window: TransferWindow,
    #[serde(default)]
    pub fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPayload {
    pub player_id: u32,
    pub player_name: String,
    pub nationality: Option<String>,
    pub nationality_flag: Option<String>,
    pub from_team: String,
    pub to_team: String,
    pub transfer_date: NaiveDate,
    pub transfer_window: TransferWindow,
    pub fee: Option<f64>,
}

impl TransferPayload {
    pub fn into_transfer(self, id: u32) -> Transfer {
        Transfer {
            id,
            player_id: self.player_id,
            player_name: Some(self.player_name),
            nationality: self.nationality,
            nationality_flag: self.nationality_flag,
            from_team: self.from_team,
            to_team: self.to_team,
            transfer_date: self.transfer_date,
            transfer_window: self.transfer_window,
            fee: self.fee,
        }
    }
}

/// Row returned by `GET /players/search`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerSuggestion {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "team_name")]
    pub team: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub nationality_flag: Option<String>,
}

impl From<&Player> for PlayerSuggestion {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            team: player.team.clone(),
            nationality: player.nationality.clone(),
            nationality_flag: player.nationality_flag.clone(),
        }
    }
}

/// Body of a successful create call.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// The backend sometimes embeds the team object instead of its name.
fn team_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(name) => name,
        Value::Object(map) => map
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

pub fn position_label(position: Position) -> &'static str {
    match position {
        Position::Goalkeeper => "Goalkeeper",
        Position::Defender => "Defender",
        Position::Midfielder => "Midfielder",
        Position::Forward => "Forward",
    }
}

pub fn window_label(window: TransferWindow) -> &'static str {
    match window {
        TransferWindow::Summer => "summer",
        TransferWindow::Winter => "winter",
    }
}

pub fn foot_label(foot: PreferredFoot) -> &'static str {
    match foot {
        PreferredFoot::Left => "left",
        PreferredFoot::Right => "right",
        PreferredFoot::Both => "both",
    }
}

/// `1234567.5` -> `$1,234,567.50`
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Direction tag shown under a transfer's `from -> to` pair.
pub fn transfer_direction(transfer: &Transfer) -> &'static str {
    if transfer.from_team == transfer.to_team {
        "N/A"
    } else if transfer.from_team.is_empty() {
        "Incoming"
    } else {
        "Outgoing"
    }
}
