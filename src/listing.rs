use std::collections::HashMap;

use crate::engine::{FilterKey, Listable, SortValue};
use crate::model::{Player, Team, Transfer, position_label, window_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSortKey {
    Name,
    Position,
    Team,
    Price,
    YearsLeft,
    ContractDuration,
    Nationality,
}

impl PlayerSortKey {
    pub const COLUMNS: [PlayerSortKey; 7] = [
        PlayerSortKey::Name,
        PlayerSortKey::Position,
        PlayerSortKey::Team,
        PlayerSortKey::Nationality,
        PlayerSortKey::Price,
        PlayerSortKey::ContractDuration,
        PlayerSortKey::YearsLeft,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlayerSortKey::Name => "Name",
            PlayerSortKey::Position => "Position",
            PlayerSortKey::Team => "Team",
            PlayerSortKey::Price => "Price",
            PlayerSortKey::YearsLeft => "Years left",
            PlayerSortKey::ContractDuration => "Contract",
            PlayerSortKey::Nationality => "Nationality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSortKey {
    Name,
    League,
    Stadium,
    FoundedYear,
}

impl TeamSortKey {
    pub const COLUMNS: [TeamSortKey; 4] = [
        TeamSortKey::Name,
        TeamSortKey::League,
        TeamSortKey::Stadium,
        TeamSortKey::FoundedYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TeamSortKey::Name => "Name",
            TeamSortKey::League => "League",
            TeamSortKey::Stadium => "Stadium",
            TeamSortKey::FoundedYear => "Founded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSortKey {
    PlayerName,
    Team,
    Fee,
    Season,
    Date,
}

impl TransferSortKey {
    pub const COLUMNS: [TransferSortKey; 5] = [
        TransferSortKey::PlayerName,
        TransferSortKey::Team,
        TransferSortKey::Fee,
        TransferSortKey::Season,
        TransferSortKey::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransferSortKey::PlayerName => "Player",
            TransferSortKey::Team => "To team",
            TransferSortKey::Fee => "Fee",
            TransferSortKey::Season => "Window",
            TransferSortKey::Date => "Date",
        }
    }
}

impl Listable for Player {
    type SortKey = PlayerSortKey;

    fn sort_columns() -> &'static [PlayerSortKey] {
        &PlayerSortKey::COLUMNS
    }

    fn sort_label(key: PlayerSortKey) -> &'static str {
        key.label()
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn category(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Position => Some(position_label(self.position)),
            FilterKey::Team => Some(&self.team),
            _ => None,
        }
    }

    fn sort_value(&self, key: PlayerSortKey) -> SortValue {
        match key {
            PlayerSortKey::Name => SortValue::text(&self.name),
            PlayerSortKey::Position => SortValue::text(position_label(self.position)),
            PlayerSortKey::Team => SortValue::text(&self.team),
            PlayerSortKey::Price => SortValue::Number(self.price),
            PlayerSortKey::YearsLeft => SortValue::Number(f64::from(self.years_left)),
            PlayerSortKey::ContractDuration => {
                SortValue::Number(f64::from(self.contract_duration))
            }
            PlayerSortKey::Nationality => SortValue::opt_text(self.nationality.as_deref()),
        }
    }
}

impl Listable for Team {
    type SortKey = TeamSortKey;

    fn sort_columns() -> &'static [TeamSortKey] {
        &TeamSortKey::COLUMNS
    }

    fn sort_label(key: TeamSortKey) -> &'static str {
        key.label()
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn category(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::League => self.league.as_deref(),
            _ => None,
        }
    }

    fn sort_value(&self, key: TeamSortKey) -> SortValue {
        match key {
            TeamSortKey::Name => SortValue::text(&self.name),
            TeamSortKey::League => SortValue::opt_text(self.league.as_deref()),
            TeamSortKey::Stadium => SortValue::opt_text(self.home_stadium.as_deref()),
            TeamSortKey::FoundedYear => SortValue::opt_number(self.founded_year.map(f64::from)),
        }
    }
}

/// A transfer joined with the player it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRow {
    pub transfer: Transfer,
    /// Current player name, else the name captured at transfer time.
    pub player_name: Option<String>,
}

impl TransferRow {
    /// Join on `player_id`; the player may have been deleted since.
    pub fn resolve(transfers: Vec<Transfer>, players: &[Player]) -> Vec<TransferRow> {
        let by_id: HashMap<u32, &Player> = players.iter().map(|p| (p.id, p)).collect();
        transfers
            .into_iter()
            .map(|transfer| {
                let player_name = by_id
                    .get(&transfer.player_id)
                    .map(|p| p.name.clone())
                    .or_else(|| transfer.player_name.clone())
                    .filter(|name| !name.is_empty());
                TransferRow {
                    transfer,
                    player_name,
                }
            })
            .collect()
    }
}

impl Listable for TransferRow {
    type SortKey = TransferSortKey;

    fn sort_columns() -> &'static [TransferSortKey] {
        &TransferSortKey::COLUMNS
    }

    fn sort_label(key: TransferSortKey) -> &'static str {
        key.label()
    }

    fn id(&self) -> u32 {
        self.transfer.id
    }

    fn display_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or_default()
    }

    fn category(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Team => Some(&self.transfer.to_team),
            FilterKey::Window => Some(window_label(self.transfer.transfer_window)),
            _ => None,
        }
    }

    fn sort_value(&self, key: TransferSortKey) -> SortValue {
        match key {
            TransferSortKey::PlayerName => SortValue::opt_text(self.player_name.as_deref()),
            TransferSortKey::Team => SortValue::text(&self.transfer.to_team),
            TransferSortKey::Fee => SortValue::opt_number(self.transfer.fee),
            TransferSortKey::Season => SortValue::text(window_label(self.transfer.transfer_window)),
            TransferSortKey::Date => {
                SortValue::text(self.transfer.transfer_date.format("%Y-%m-%d").to_string())
            }
        }
    }
}

/// Name -> team index used to resolve `Player.team` at render time.
///
/// References are by name and nothing cascades on rename, so a player can
/// point at a team that no longer exists; `resolve` then returns `None`.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    by_name: HashMap<String, Team>,
}

impl TeamDirectory {
    pub fn from_teams(teams: &[Team]) -> Self {
        Self {
            by_name: teams.iter().map(|t| (t.name.clone(), t.clone())).collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&Team> {
        self.by_name.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Sorted names, for the team filter options.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort_by(|a, b| crate::engine::compare_text(a, b));
        names
    }

    /// Players whose team name does not resolve.
    pub fn dangling<'a>(&self, players: &'a [Player]) -> Vec<&'a Player> {
        players
            .iter()
            .filter(|p| !p.team.is_empty() && self.resolve(&p.team).is_none())
            .collect()
    }
}
