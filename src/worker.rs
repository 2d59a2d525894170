use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::error::ApiError;
use crate::forms::player::PlayerSubmission;
use crate::forms::{SearchResults, SearchTarget};
use crate::state::{Delta, EntityKind, ProviderCommand};

/// Run backend calls off the UI thread. Exits when the command sender drops.
pub fn spawn_provider(
    backend: Arc<dyn Backend>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for cmd in cmd_rx {
            for delta in execute(backend.as_ref(), cmd) {
                if tx.send(delta).is_err() {
                    debug!("ui receiver gone, stopping provider");
                    return;
                }
            }
        }
    })
}

/// Perform one command and report what happened.
pub fn execute(backend: &dyn Backend, cmd: ProviderCommand) -> Vec<Delta> {
    match cmd {
        ProviderCommand::LoadPlayers => {
            let (players, teams) = thread::scope(|s| {
                let teams = s.spawn(|| backend.list_teams());
                let players = backend.list_players();
                (players, join_or_network(teams.join()))
            });
            log_result("players", &players);
            vec![Delta::PlayersLoaded { players, teams }]
        }
        ProviderCommand::LoadTeams => {
            let teams = backend.list_teams();
            log_result("teams", &teams);
            vec![Delta::TeamsLoaded(teams)]
        }
        ProviderCommand::LoadTransfers => {
            let (transfers, players) = thread::scope(|s| {
                let players = s.spawn(|| backend.list_players());
                let transfers = backend.list_transfers();
                (transfers, join_or_network(players.join()))
            });
            log_result("transfers", &transfers);
            vec![Delta::TransfersLoaded { transfers, players }]
        }
        ProviderCommand::FetchPlayer { ticket, id } => {
            let result = backend.get_player(id);
            if let Err(err) = &result {
                warn!(id, error = %err, "player fetch failed");
            }
            vec![Delta::PlayerFetched { ticket, result }]
        }
        ProviderCommand::FetchTeam { ticket, id } => {
            let result = backend.get_team(id);
            if let Err(err) = &result {
                warn!(id, error = %err, "team fetch failed");
            }
            vec![Delta::TeamFetched { ticket, result }]
        }
        ProviderCommand::SavePlayer {
            ticket,
            id,
            submission,
        } => {
            let mut deltas = Vec::new();
            let result = save_player(backend, id, submission, &mut deltas);
            deltas.push(Delta::Saved {
                ticket,
                kind: EntityKind::Player,
                result,
            });
            deltas
        }
        ProviderCommand::SaveTeam {
            ticket,
            id,
            payload,
        } => {
            let result = match id {
                Some(id) => backend.update_team(id, &payload).map(|()| id),
                None => backend.create_team(&payload),
            };
            log_save("team", &result);
            vec![Delta::Saved {
                ticket,
                kind: EntityKind::Team,
                result,
            }]
        }
        ProviderCommand::SaveTransfer { ticket, payload } => {
            let result = backend.create_transfer(&payload);
            log_save("transfer", &result);
            vec![Delta::Saved {
                ticket,
                kind: EntityKind::Transfer,
                result,
            }]
        }
        ProviderCommand::DeletePlayer { id } => {
            let result = backend.delete_player(id);
            log_delete("player", id, &result);
            vec![Delta::Deleted {
                kind: EntityKind::Player,
                id,
                result,
            }]
        }
        ProviderCommand::DeleteTeam { id } => {
            let result = backend.delete_team(id);
            log_delete("team", id, &result);
            vec![Delta::Deleted {
                kind: EntityKind::Team,
                id,
                result,
            }]
        }
        ProviderCommand::Search { ticket, request } => {
            let result = match request.target {
                SearchTarget::Player => backend
                    .search_players(&request.query)
                    .map(SearchResults::Players),
                SearchTarget::FromTeam | SearchTarget::ToTeam => backend
                    .search_teams(&request.query)
                    .map(SearchResults::Teams),
            };
            vec![Delta::SearchResults {
                ticket,
                seq: request.seq,
                result,
            }]
        }
    }
}

/// Upload the image first, if one was picked, then create or update.
fn save_player(
    backend: &dyn Backend,
    id: Option<u32>,
    submission: PlayerSubmission,
    deltas: &mut Vec<Delta>,
) -> Result<u32, ApiError> {
    let PlayerSubmission {
        mut payload,
        image_path,
    } = submission;
    if let Some(path) = image_path {
        let url = upload_image(backend, &path)?;
        deltas.push(Delta::Log(format!("[INFO] Image uploaded: {url}")));
        payload.player_image = Some(url);
    }
    let result = match id {
        Some(id) => backend.update_player(id, &payload).map(|()| id),
        None => backend.create_player(&payload),
    };
    log_save("player", &result);
    result
}

fn upload_image(backend: &dyn Backend, path: &Path) -> Result<String, ApiError> {
    let bytes = std::fs::read(path)
        .map_err(|err| ApiError::Upload(format!("could not read {}: {err}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    backend.upload_player_image(&file_name, bytes).inspect_err(|err| {
        warn!(path = %path.display(), error = %err, "image upload failed");
    })
}

fn join_or_network<T>(joined: thread::Result<Result<T, ApiError>>) -> Result<T, ApiError> {
    joined.unwrap_or_else(|_| Err(ApiError::Network("fetch thread panicked".to_string())))
}

fn log_result<T>(what: &str, result: &Result<Vec<T>, ApiError>) {
    match result {
        Ok(rows) => debug!(rows = rows.len(), "loaded {what}"),
        Err(err) => warn!(error = %err, "failed to load {what}"),
    }
}

fn log_save(what: &str, result: &Result<u32, ApiError>) {
    match result {
        Ok(id) => info!(id, "saved {what}"),
        Err(err) => warn!(error = %err, "failed to save {what}"),
    }
}

fn log_delete(what: &str, id: u32, result: &Result<(), ApiError>) {
    match result {
        Ok(()) => info!(id, "deleted {what}"),
        Err(err) => warn!(id, error = %err, "failed to delete {what}"),
    }
}
