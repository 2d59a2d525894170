use chrono::NaiveDate;

use contract_terminal::api::Backend;
use contract_terminal::engine::{FilterKey, ListControls, ListStatus, SortDirection};
use contract_terminal::error::ApiError;
use contract_terminal::fake_backend::FakeBackend;
use contract_terminal::forms::player::{PlayerDraft, PlayerField};
use contract_terminal::forms::{FieldEdit, FormDraft, FormMessage, FormPhase};
use contract_terminal::model::{Position, TransferPayload, TransferWindow};
use contract_terminal::state::{
    AppState, Focus, FormPanel, PanelForm, ProviderCommand, View, apply_delta,
};
use contract_terminal::worker;

/// Run queued commands against the backend until the state stops asking.
fn pump(state: &mut AppState, backend: &FakeBackend) {
    loop {
        let commands = state.take_commands();
        if commands.is_empty() {
            return;
        }
        for cmd in commands {
            for delta in worker::execute(backend, cmd) {
                apply_delta(state, delta);
            }
        }
    }
}

fn started(backend: &FakeBackend) -> AppState {
    let mut state = AppState::new(10);
    state.start();
    pump(&mut state, backend);
    state
}

fn type_text(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        state.form_input(FieldEdit::Char(ch));
    }
}

fn goto_field(state: &mut AppState, idx: usize) {
    if let Some(panel) = state.panel.as_mut() {
        panel.field = idx;
    }
}

fn player_names(state: &AppState) -> Vec<String> {
    state
        .players
        .filtered()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

#[test]
fn startup_loads_players_and_team_directory() {
    let backend = FakeBackend::seeded();
    let state = started(&backend);
    assert_eq!(state.players.status(), &ListStatus::Ready);
    assert_eq!(state.players.items().len(), 8);
    assert!(state.directory.resolve("Rovers").is_some());
    // Kofi Pace plays for a team that is not in the directory
    assert!(state.directory.resolve("Old Town").is_none());
    assert!(state.logs.iter().any(|line| line.contains("1 player(s)")));
}

#[test]
fn added_player_shows_up_after_refresh() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);

    state.open_add_form();
    assert_eq!(state.focus, Focus::Form);
    type_text(&mut state, "Nico Engine");
    goto_field(&mut state, PlayerField::Position.index());
    state.form_input(FieldEdit::Cycle(true));
    state.form_input(FieldEdit::Cycle(true));
    for (field, text) in [
        (PlayerField::Team, "Harbour FC"),
        (PlayerField::Price, "2750000"),
        (PlayerField::ContractDuration, "3"),
        (PlayerField::YearsLeft, "3"),
        (PlayerField::ContractStartDate, "2026-07-01"),
        (PlayerField::SigningDate, "2026-06-15"),
    ] {
        goto_field(&mut state, field.index());
        type_text(&mut state, text);
    }
    // the statistics box starts as "{}"
    goto_field(&mut state, PlayerField::Statistics.index());
    state.form_input(FieldEdit::Backspace);
    state.form_input(FieldEdit::Backspace);
    type_text(&mut state, r#"{"goals": 2}"#);

    state.submit_form();
    pump(&mut state, &backend);

    let added = state
        .players
        .items()
        .iter()
        .find(|p| p.name == "Nico Engine")
        .expect("new player listed");
    assert_eq!(added.position, Position::Defender);
    assert_eq!(added.team, "Harbour FC");
    assert_eq!(added.price, 2_750_000.0);
    assert_eq!((added.contract_duration, added.years_left), (3, 3));
    assert_eq!(
        added.contract_start_date.map(|d| d.to_string()).as_deref(),
        Some("2026-07-01")
    );
    assert_eq!(
        added.signing_date.map(|d| d.to_string()).as_deref(),
        Some("2026-06-15")
    );
    assert_eq!(added.statistics.get("goals"), Some(2.0));
    assert!(!added.on_loan);
    assert_eq!(added.loan_team, None);
    assert!(state.directory.resolve("Harbour FC").is_some());

    // the add form stays open, blank, with a success message
    let panel = state.panel.as_ref().expect("add form still open");
    assert_eq!(panel.field, 0);
    assert_eq!(panel.form.phase(), &FormPhase::Idle);
    assert_eq!(
        panel.form.message(),
        Some(&FormMessage::Success("Player added successfully".to_string()))
    );
    assert_eq!(panel.form.fields()[0].value, "");
}

#[test]
fn invalid_form_never_reaches_the_backend() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.open_add_form();
    type_text(&mut state, "No Position");
    state.submit_form();
    assert!(state.take_commands().is_empty());
    let panel = state.panel.as_ref().expect("form open");
    assert!(matches!(panel.form.message(), Some(FormMessage::Error(msg)) if msg.contains("position")));
    assert_eq!(backend.list_players().expect("players").len(), 8);
}

#[test]
fn editing_a_player_closes_the_form_and_refreshes() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);

    state.open_edit_form();
    let panel = state.panel.as_ref().expect("edit form");
    assert_eq!(panel.title(), "Edit Player #5");
    assert_eq!(panel.form.phase(), &FormPhase::Loading);
    pump(&mut state, &backend);

    let panel = state.panel.as_ref().expect("edit form");
    assert_eq!(panel.form.phase(), &FormPhase::Editing);
    assert_eq!(panel.form.fields()[0].value, "Marco Keeper");

    state.form_input(FieldEdit::Backspace);
    state.form_input(FieldEdit::Char('s'));
    state.submit_form();
    pump(&mut state, &backend);

    assert!(state.panel.is_none());
    assert_eq!(state.focus, Focus::List);
    assert_eq!(state.players.find(5).map(|p| p.name.as_str()), Some("Marco Keepes"));
}

#[test]
fn rovers_arrivals_sorted_by_fee_descending() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.set_view(View::Transfers);
    pump(&mut state, &backend);

    // All -> Athletic -> Old Town -> Rovers
    for _ in 0..3 {
        state.cycle_filter(0);
    }
    assert_eq!(state.active_list().filter_value(FilterKey::Team), "Rovers");

    state.move_sort_cursor(true);
    state.move_sort_cursor(true);
    assert_eq!(state.active_list().column_label(state.sort_cursor()), "Fee");
    state.sort_current_column();
    state.sort_current_column();
    assert_eq!(
        state.active_list().sorted_column(),
        Some((2, SortDirection::Descending))
    );

    let rows: Vec<(String, Option<f64>)> = state
        .transfers
        .visible()
        .iter()
        .map(|row| (row.player_name.clone().unwrap_or_default(), row.transfer.fee))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Luis Motor".to_string(), Some(8_000_000.0)),
            ("Jonas Wall".to_string(), Some(3_500_000.0)),
        ]
    );
}

#[test]
fn confirmed_delete_keeps_the_order_of_the_rest() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.players.sort_by(contract_terminal::listing::PlayerSortKey::Name);
    let mut expected = player_names(&state);
    let doomed = expected.remove(0);

    assert!(state.request_delete());
    assert_eq!(state.staged_delete_name(), Some(doomed.clone()));
    assert!(state.take_commands().is_empty());

    state.confirm_delete();
    pump(&mut state, &backend);
    assert_eq!(player_names(&state), expected);
    assert!(state.staged_delete_name().is_none());
}

#[test]
fn cancelled_delete_leaves_everything_alone() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    assert!(state.request_delete());
    state.cancel_delete();
    state.confirm_delete();
    assert!(state.take_commands().is_empty());
    assert_eq!(backend.list_players().expect("players").len(), 8);
}

#[test]
fn failed_delete_is_reported_and_rows_stay() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    assert!(state.request_delete());
    backend.set_outage(Some(ApiError::Network("connection refused".to_string())));
    state.confirm_delete();
    pump(&mut state, &backend);

    assert_eq!(state.players.items().len(), 8);
    assert!(
        state
            .players
            .notice()
            .is_some_and(|msg| msg.starts_with("Failed to delete player"))
    );
}

#[test]
fn outage_shows_an_error_instead_of_stale_rows() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    backend.set_outage(Some(ApiError::Network("connection refused".to_string())));
    state.refresh();
    pump(&mut state, &backend);

    assert!(matches!(
        state.players.status(),
        ListStatus::Failed(msg) if msg.contains("connection refused")
    ));
    assert!(state.players.visible().is_empty());

    backend.set_outage(None);
    state.refresh();
    pump(&mut state, &backend);
    assert_eq!(state.players.items().len(), 8);
}

#[test]
fn transfer_recorded_through_type_ahead() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.set_view(View::Transfers);
    pump(&mut state, &backend);
    state.open_add_form();

    type_text(&mut state, "pace");
    let searches = state
        .take_commands()
        .into_iter()
        .filter(|cmd| matches!(cmd, ProviderCommand::Search { .. }))
        .collect::<Vec<_>>();
    assert_eq!(searches.len(), 4);
    // answer in reverse so the newest request lands first
    for cmd in searches.into_iter().rev() {
        for delta in worker::execute(&backend, cmd) {
            apply_delta(&mut state, delta);
        }
    }
    let panel = state.panel.as_ref().expect("transfer form");
    assert_eq!(panel.form.suggestions(), vec!["Kofi Pace (Old Town)"]);
    assert!(state.form_pick_suggestion());

    for (field, text) in [(1, "Old Town"), (2, "Rovers"), (3, "2026-08-15"), (5, "900000")] {
        goto_field(&mut state, field);
        type_text(&mut state, text);
    }
    pump(&mut state, &backend);
    state.form_dismiss_suggestions();
    state.submit_form();
    pump(&mut state, &backend);

    let recorded = backend.list_transfers().expect("transfers");
    assert_eq!(recorded.len(), 5);
    let last = recorded.last().expect("new transfer");
    assert_eq!(last.player_id, 12);
    assert_eq!(last.from_team, "Old Town");
    assert_eq!(last.to_team, "Rovers");
    assert_eq!(state.transfers.items().len(), 5);

    let Some(FormPanel {
        form: PanelForm::Transfer(form),
        ..
    }) = state.panel.as_ref()
    else {
        panic!("transfer form should stay open");
    };
    assert_eq!(form.draft().player_id, None);
}

#[test]
fn transfers_are_read_only() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.set_view(View::Transfers);
    pump(&mut state, &backend);

    state.open_edit_form();
    assert!(state.panel.is_none());
    assert!(!state.request_delete());
    assert!(state.take_commands().is_empty());
}

#[test]
fn statistics_view_follows_the_players_cursor() {
    let backend = FakeBackend::seeded();
    let mut state = started(&backend);
    state.set_view(View::Statistics);
    pump(&mut state, &backend);
    state.active_list_mut().select_next();
    let player = state.selected_player().expect("selected player");
    assert_eq!(player.name, "Jonas Wall");
    assert_eq!(player.statistics.get("tackles"), Some(61.0));
}

#[test]
fn new_club_transfer_tops_the_fee_ranking() {
    let backend = FakeBackend::new();
    let mut state = AppState::new(10);
    state.set_view(View::Teams);
    pump(&mut state, &backend);
    assert_eq!(state.teams.status(), &ListStatus::Ready);
    assert!(state.teams.items().is_empty());

    state.open_add_form();
    type_text(&mut state, "Rovers");
    state.submit_form();
    pump(&mut state, &backend);
    assert_eq!(state.teams.items().len(), 1);

    let player_id = seed_player(&backend, "Ada Striker");
    for (fee, day) in [(250_000.0, 1), (500_000.0, 2)] {
        backend
            .create_transfer(&TransferPayload {
                player_id,
                player_name: "Ada Striker".to_string(),
                nationality: None,
                nationality_flag: None,
                from_team: "Wanderers".to_string(),
                to_team: "Rovers".to_string(),
                transfer_date: NaiveDate::from_ymd_opt(2025, 7, day).expect("date"),
                transfer_window: TransferWindow::Summer,
                fee: Some(fee),
            })
            .expect("transfer");
    }

    state.set_view(View::Transfers);
    pump(&mut state, &backend);
    state.open_add_form();
    type_text(&mut state, "Ada");
    pump(&mut state, &backend);
    assert!(state.form_pick_suggestion());
    for (field, text) in [(1, "Rovers"), (2, "United"), (3, "2026-07-01"), (5, "1000000")] {
        goto_field(&mut state, field);
        type_text(&mut state, text);
    }
    state.submit_form();
    pump(&mut state, &backend);

    state.move_sort_cursor(true);
    state.move_sort_cursor(true);
    state.sort_current_column();
    state.sort_current_column();
    let rows: Vec<(String, String, Option<f64>)> = state
        .transfers
        .visible()
        .iter()
        .map(|row| {
            (
                row.transfer.from_team.clone(),
                row.transfer.to_team.clone(),
                row.transfer.fee,
            )
        })
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        ("Rovers".to_string(), "United".to_string(), Some(1_000_000.0))
    );
    assert_eq!(rows[1].2, Some(500_000.0));
    assert_eq!(rows[2].2, Some(250_000.0));
    assert_eq!(
        state.transfers.visible()[0].transfer.transfer_window,
        TransferWindow::Summer
    );
}

fn seed_player(backend: &FakeBackend, name: &str) -> u32 {
    let mut draft = PlayerDraft::default();
    draft.position = Some(Position::Forward);
    for (field, text) in [
        (PlayerField::Name, name),
        (PlayerField::Team, "Wanderers"),
        (PlayerField::Price, "900000"),
        (PlayerField::ContractDuration, "2"),
        (PlayerField::YearsLeft, "2"),
        (PlayerField::ContractStartDate, "2025-07-01"),
        (PlayerField::SigningDate, "2025-06-20"),
    ] {
        draft.set_text(field, text);
    }
    let submission = draft.validate().expect("valid player");
    backend.create_player(&submission.payload).expect("player")
}
