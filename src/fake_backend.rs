use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::api::Backend;
use crate::error::ApiError;
use crate::model::{
    Player, PlayerPayload, PlayerSuggestion, Position, PreferredFoot, Team, TeamPayload, Transfer,
    TransferPayload, TransferWindow,
};
use crate::statistics::Statistics;

/// In-memory backend used by `--demo` and the scenario tests.
///
/// Mirrors the server's observable behavior: sequential ids, case-insensitive
/// substring search, teams auto-created by name when a player or transfer
/// references one that does not exist yet.
#[derive(Debug, Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
}

#[derive(Debug, Default)]
struct Store {
    players: Vec<Player>,
    teams: Vec<Team>,
    transfers: Vec<Transfer>,
    next_id: u32,
    uploads: u32,
    outage: Option<ApiError>,
}

impl Store {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.outage {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn ensure_team(&mut self, name: &str) {
        if name.is_empty() || self.teams.iter().any(|t| t.name == name) {
            return;
        }
        let id = self.next_id();
        self.teams.push(Team {
            id,
            name: name.to_string(),
            team_logo: None,
            description: None,
            founded_year: None,
            home_stadium: None,
            league: None,
        });
    }
}

fn not_found(kind: &str) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("{kind} not found"),
    }
}

fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.trim().to_lowercase())
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small league's worth of teams, players and transfers.
    pub fn seeded() -> Self {
        let backend = Self::new();
        if let Ok(mut store) = backend.store.lock() {
            seed(&mut store);
        }
        backend
    }

    /// Make every call fail with `err` until cleared with `None`.
    pub fn set_outage(&self, err: Option<ApiError>) {
        if let Ok(mut store) = self.store.lock() {
            store.outage = err;
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, ApiError> {
        let store = self
            .store
            .lock()
            .map_err(|_| ApiError::Network("fake backend lock poisoned".to_string()))?;
        store.check()?;
        Ok(store)
    }
}

impl Backend for FakeBackend {
    fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        Ok(self.store()?.players.clone())
    }

    fn get_player(&self, id: u32) -> Result<Player, ApiError> {
        self.store()?
            .players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("player"))
    }

    fn create_player(&self, payload: &PlayerPayload) -> Result<u32, ApiError> {
        let mut store = self.store()?;
        store.ensure_team(&payload.team);
        let id = store.next_id();
        store.players.push(payload.clone().into_player(id));
        Ok(id)
    }

    fn update_player(&self, id: u32, payload: &PlayerPayload) -> Result<(), ApiError> {
        let mut store = self.store()?;
        store.ensure_team(&payload.team);
        let slot = store
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("player"))?;
        *slot = payload.clone().into_player(id);
        Ok(())
    }

    fn delete_player(&self, id: u32) -> Result<(), ApiError> {
        let mut store = self.store()?;
        let before = store.players.len();
        store.players.retain(|p| p.id != id);
        if store.players.len() == before {
            return Err(not_found("player"));
        }
        Ok(())
    }

    fn search_players(&self, query: &str) -> Result<Vec<PlayerSuggestion>, ApiError> {
        Ok(self
            .store()?
            .players
            .iter()
            .filter(|p| name_matches(&p.name, query))
            .map(PlayerSuggestion::from)
            .collect())
    }

    fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        Ok(self.store()?.teams.clone())
    }

    fn get_team(&self, id: u32) -> Result<Team, ApiError> {
        self.store()?
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("team"))
    }

    fn create_team(&self, payload: &TeamPayload) -> Result<u32, ApiError> {
        let mut store = self.store()?;
        let id = store.next_id();
        store.teams.push(payload.clone().into_team(id));
        Ok(id)
    }

    // Renames do not cascade to players referencing the old name.
    fn update_team(&self, id: u32, payload: &TeamPayload) -> Result<(), ApiError> {
        let mut store = self.store()?;
        let slot = store
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("team"))?;
        *slot = payload.clone().into_team(id);
        Ok(())
    }

    fn delete_team(&self, id: u32) -> Result<(), ApiError> {
        let mut store = self.store()?;
        let before = store.teams.len();
        store.teams.retain(|t| t.id != id);
        if store.teams.len() == before {
            return Err(not_found("team"));
        }
        Ok(())
    }

    fn search_teams(&self, query: &str) -> Result<Vec<Team>, ApiError> {
        Ok(self
            .store()?
            .teams
            .iter()
            .filter(|t| name_matches(&t.name, query))
            .cloned()
            .collect())
    }

    fn list_transfers(&self) -> Result<Vec<Transfer>, ApiError> {
        Ok(self.store()?.transfers.clone())
    }

    fn create_transfer(&self, payload: &TransferPayload) -> Result<u32, ApiError> {
        let mut store = self.store()?;
        store.ensure_team(&payload.from_team);
        store.ensure_team(&payload.to_team);
        let id = store.next_id();
        store.transfers.push(payload.clone().into_transfer(id));
        Ok(id)
    }

    fn upload_player_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::Upload("empty file".to_string()));
        }
        let mut store = self.store()?;
        store.uploads += 1;
        Ok(format!("/uploads/{}-{file_name}", store.uploads))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seed(store: &mut Store) {
    let teams = [
        ("Rovers", "Northern League", "Riverside Park", 1888),
        ("Athletic", "Northern League", "The Foundry", 1902),
        ("Wanderers", "Southern League", "Harbour Road", 1875),
        ("United", "Southern League", "Civic Stadium", 1910),
    ];
    for (name, league, stadium, founded) in teams {
        let id = store.next_id();
        store.teams.push(Team {
            id,
            name: name.to_string(),
            team_logo: None,
            description: Some(format!("{name} of the {league}")),
            founded_year: Some(founded),
            home_stadium: Some(stadium.to_string()),
            league: Some(league.to_string()),
        });
    }

    let players: [(&str, Position, &str, f64, u32, u32, &str, &[(&str, f64)]); 8] = [
        ("Marco Keeper", Position::Goalkeeper, "Rovers", 2_500_000.0, 4, 2, "Italy", &[("clean_sheets", 11.0), ("saves", 94.0)]),
        ("Jonas Wall", Position::Defender, "Rovers", 4_000_000.0, 5, 3, "Germany", &[("tackles", 61.0), ("interceptions", 40.0)]),
        ("Luis Motor", Position::Midfielder, "Rovers", 9_750_000.0, 3, 1, "Spain", &[("assists", 9.0), ("goals", 4.0)]),
        ("Sam Finisher", Position::Forward, "Athletic", 12_000_000.0, 5, 4, "England", &[("goals", 21.0), ("assists", 6.0)]),
        ("Aiko Playmaker", Position::Midfielder, "Athletic", 7_200_000.0, 4, 2, "Japan", &[("assists", 14.0)]),
        ("Pierre Anchor", Position::Defender, "Wanderers", 3_100_000.0, 2, 1, "France", &[]),
        ("Tomas Glove", Position::Goalkeeper, "United", 1_800_000.0, 3, 3, "Czechia", &[("saves", 71.0)]),
        ("Kofi Pace", Position::Forward, "Old Town", 5_500_000.0, 4, 4, "Ghana", &[("goals", 13.0)]),
    ];
    for (name, position, team, price, duration, left, nationality, stats) in players {
        let id = store.next_id();
        store.players.push(Player {
            id,
            name: name.to_string(),
            position,
            team: team.to_string(),
            price,
            contract_duration: duration,
            years_left: left,
            on_loan: false,
            loan_team: None,
            statistics: stats
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<Statistics>(),
            contract_start_date: Some(date(2026 - (duration - left) as i32, 7, 1)),
            signing_date: Some(date(2026 - (duration - left) as i32, 6, 20)),
            sell_on_clause: false,
            sell_on_percentage: None,
            nationality: Some(nationality.to_string()),
            nationality_flag: None,
            player_image: None,
            jersey_number: None,
            age: None,
            height: None,
            weight: None,
            preferred_foot: Some(PreferredFoot::Right),
        });
    }

    let transfers = [
        (7, "Athletic", "Rovers", date(2024, 7, 15), TransferWindow::Summer, Some(8_000_000.0)),
        (6, "Wanderers", "Rovers", date(2025, 1, 20), TransferWindow::Winter, Some(3_500_000.0)),
        (8, "United", "Athletic", date(2023, 8, 1), TransferWindow::Summer, None),
        (12, "Rovers", "Old Town", date(2025, 1, 31), TransferWindow::Winter, Some(1_250_000.0)),
    ];
    for (player_id, from, to, when, window, fee) in transfers {
        let id = store.next_id();
        let player = store.players.iter().find(|p| p.id == player_id);
        store.transfers.push(Transfer {
            id,
            player_id,
            player_name: player.map(|p| p.name.clone()),
            nationality: player.and_then(|p| p.nationality.clone()),
            nationality_flag: None,
            from_team: from.to_string(),
            to_team: to.to_string(),
            transfer_date: when,
            transfer_window: window,
            fee,
        });
    }
}
