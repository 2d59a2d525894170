use std::cell::Cell;

use contract_terminal::api::Backend;
use contract_terminal::error::{ApiError, FormError, ValidationError};
use contract_terminal::fake_backend::FakeBackend;
use contract_terminal::forms::player::{PlayerDraft, PlayerField, PlayerForm};
use contract_terminal::forms::team::TeamForm;
use contract_terminal::forms::{FieldEdit, FormDraft, FormMessage, FormMode, FormPhase};
use contract_terminal::model::Position;

fn type_text(form: &mut TeamForm, idx: usize, text: &str) {
    for ch in text.chars() {
        form.apply(idx, FieldEdit::Char(ch));
    }
}

fn fill_player(draft: &mut PlayerDraft) {
    draft.position = Some(Position::Midfielder);
    draft.set_text(PlayerField::Name, "Nico Engine");
    draft.set_text(PlayerField::Team, "Rovers");
    draft.set_text(PlayerField::Price, "2750000");
    draft.set_text(PlayerField::ContractDuration, "3");
    draft.set_text(PlayerField::YearsLeft, "3");
    draft.set_text(PlayerField::ContractStartDate, "2026-07-01");
    draft.set_text(PlayerField::SigningDate, "2026-06-15");
}

fn server_down() -> ApiError {
    ApiError::Network("connection refused".to_string())
}

#[test]
fn add_form_starts_idle_and_moves_to_editing() {
    let mut form = TeamForm::new_add();
    assert_eq!(form.mode(), FormMode::Add);
    assert_eq!(form.phase(), &FormPhase::Idle);
    assert_eq!(form.editing_id(), None);

    type_text(&mut form, 0, "Harbour FC");
    assert_eq!(form.phase(), &FormPhase::Editing);
    assert_eq!(form.draft().name, "Harbour FC");

    form.apply(0, FieldEdit::Backspace);
    assert_eq!(form.draft().name, "Harbour F");
}

#[test]
fn validation_runs_before_submit() {
    let mut form = TeamForm::new_add();
    type_text(&mut form, 3, "nineteen");
    let err = form.begin_submit().unwrap_err();
    assert_eq!(
        err,
        FormError::Validation(ValidationError::MissingField("name"))
    );
    assert_eq!(form.phase(), &FormPhase::Editing);
    assert!(matches!(form.message(), Some(FormMessage::Error(msg)) if msg.contains("name")));

    type_text(&mut form, 0, "Harbour FC");
    assert!(matches!(
        form.begin_submit(),
        Err(FormError::Validation(ValidationError::InvalidNumber { field: "founded year", .. }))
    ));
}

#[test]
fn second_submit_while_in_flight_is_busy() {
    let mut form = TeamForm::new_add();
    type_text(&mut form, 0, "Harbour FC");
    let payload = form.begin_submit().expect("valid team");
    assert_eq!(payload.name, "Harbour FC");
    assert!(form.is_submitting());

    assert_eq!(form.begin_submit().unwrap_err(), FormError::Busy);
    // edits are refused while the request is out
    assert_eq!(form.apply(0, FieldEdit::Char('!')), None);
    assert_eq!(form.draft().name, "Harbour FC");
}

#[test]
fn add_success_resets_and_notifies_once() {
    let mut form = TeamForm::new_add();
    type_text(&mut form, 0, "Harbour FC");
    type_text(&mut form, 5, "Coastal League");
    form.begin_submit().expect("valid team");

    let calls = Cell::new(0);
    form.complete_submit(Ok(()), || calls.set(calls.get() + 1))
        .expect("saved");
    assert_eq!(calls.get(), 1);
    assert_eq!(form.phase(), &FormPhase::Idle);
    assert_eq!(form.draft().name, "");
    assert_eq!(form.draft().league, "");
    assert_eq!(
        form.message(),
        Some(&FormMessage::Success("Team added successfully".to_string()))
    );

    // a duplicate completion is ignored
    form.complete_submit(Ok(()), || calls.set(calls.get() + 1))
        .expect("ignored");
    assert_eq!(calls.get(), 1);
}

#[test]
fn failed_submit_returns_to_editing_with_input_kept() {
    let mut form = TeamForm::new_add();
    type_text(&mut form, 0, "Harbour FC");
    form.begin_submit().expect("valid team");

    let calls = Cell::new(0);
    let err = form
        .complete_submit(Err(server_down()), || calls.set(calls.get() + 1))
        .unwrap_err();
    assert_eq!(err, FormError::Api(server_down()));
    assert_eq!(calls.get(), 0);
    assert_eq!(form.phase(), &FormPhase::Editing);
    assert_eq!(form.draft().name, "Harbour FC");
    assert!(matches!(
        form.message(),
        Some(FormMessage::Error(msg)) if msg.starts_with("Failed to save team") && msg.contains("refused")
    ));

    // and can be retried
    assert!(form.begin_submit().is_ok());
}

#[test]
fn edit_form_loads_then_updates() {
    let backend = FakeBackend::seeded();
    let team = backend.get_team(1).expect("seeded team");

    let mut form = TeamForm::new_edit(1);
    assert_eq!(form.phase(), &FormPhase::Loading);
    assert_eq!(form.begin_submit().unwrap_err(), FormError::NotEditable);
    assert_eq!(form.apply(0, FieldEdit::Char('x')), None);

    form.load(&team);
    assert_eq!(form.phase(), &FormPhase::Editing);
    assert_eq!(form.draft().name, "Rovers");
    assert_eq!(form.draft().founded_year, "1888");

    // a second load (late reply) does not clobber edits
    form.apply(0, FieldEdit::Char('!'));
    form.load(&team);
    assert_eq!(form.draft().name, "Rovers!");

    let payload = form.begin_submit().expect("valid");
    backend.update_team(1, &payload).expect("update");
    form.complete_submit(Ok(()), || {}).expect("saved");
    assert_eq!(
        form.message(),
        Some(&FormMessage::Success("Team updated successfully".to_string()))
    );
    // edit forms keep their values
    assert_eq!(form.draft().name, "Rovers!");
    assert_eq!(backend.get_team(1).expect("team").name, "Rovers!");
}

#[test]
fn load_failure_is_terminal() {
    let mut form = PlayerForm::new_edit(404);
    form.load_failed(&ApiError::Api {
        status: 404,
        message: "player not found".to_string(),
    });
    match form.phase() {
        FormPhase::LoadError(msg) => {
            assert!(msg.starts_with("Failed to load player data"));
            assert!(msg.ends_with("Close and reopen to retry."));
        }
        other => panic!("unexpected phase {other:?}"),
    }
    assert_eq!(form.begin_submit().unwrap_err(), FormError::NotEditable);
    assert_eq!(form.edit(|draft| draft.name.push('x')), None);
}

#[test]
fn malformed_statistics_block_submit() {
    let mut form = PlayerForm::new_add();
    form.edit(|draft| {
        fill_player(draft);
        draft.set_text(PlayerField::Statistics, "{goals: 3");
    });
    assert!(matches!(
        form.begin_submit(),
        Err(FormError::Validation(ValidationError::Statistics(_)))
    ));

    form.edit(|draft| draft.set_text(PlayerField::Statistics, r#"{"goals": 3, "assists": 1}"#));
    let submission = form.begin_submit().expect("valid player");
    assert_eq!(submission.payload.statistics.get("goals"), Some(3.0));
    assert_eq!(submission.image_path, None);
}

#[test]
fn player_required_fields_are_reported_in_order() {
    let mut draft = PlayerDraft::default();
    assert_eq!(draft.validate().unwrap_err(), ValidationError::MissingField("name"));
    draft.set_text(PlayerField::Name, "Nico");
    assert_eq!(
        draft.validate().unwrap_err(),
        ValidationError::MissingField("position")
    );
    fill_player(&mut draft);
    draft.set_text(PlayerField::Price, "-5");
    assert!(matches!(
        draft.validate().unwrap_err(),
        ValidationError::InvalidNumber { field: "price", .. }
    ));
    draft.set_text(PlayerField::Price, "5");
    draft.set_text(PlayerField::ContractStartDate, "01/07/2026");
    assert!(matches!(
        draft.validate().unwrap_err(),
        ValidationError::InvalidDate { field: "contract start date", .. }
    ));
}

#[test]
fn blank_signing_date_is_rejected_before_submit() {
    let mut form = PlayerForm::new_add();
    form.edit(|draft| {
        fill_player(draft);
        draft.set_text(PlayerField::SigningDate, "");
    });
    assert_eq!(
        form.begin_submit().unwrap_err(),
        FormError::Validation(ValidationError::MissingField("signing date"))
    );
    assert!(!form.is_submitting());
    assert!(matches!(form.message(), Some(FormMessage::Error(msg)) if msg.contains("signing date")));

    form.edit(|draft| draft.set_text(PlayerField::SigningDate, "2026-06-15"));
    let submission = form.begin_submit().expect("valid player");
    assert_eq!(submission.payload.signing_date.to_string(), "2026-06-15");
}

#[test]
fn statistics_start_as_an_empty_object() {
    let mut draft = PlayerDraft::default();
    assert_eq!(draft.statistics, "{}");
    fill_player(&mut draft);
    assert!(draft.validate().expect("valid player").payload.statistics.is_empty());

    draft.set_text(PlayerField::Statistics, "  ");
    assert!(matches!(
        draft.validate().unwrap_err(),
        ValidationError::Statistics(_)
    ));
}

#[test]
fn toggles_and_choices_cycle() {
    let mut form = PlayerForm::new_add();
    let on_loan = PlayerField::OnLoan.index();
    let loan_team = PlayerField::LoanTeam.index();
    assert!(!form.draft().field(loan_team).expect("loan team").enabled);

    form.apply(on_loan, FieldEdit::Cycle(true));
    assert!(form.draft().on_loan);
    assert!(form.draft().field(loan_team).expect("loan team").enabled);

    let position = PlayerField::Position.index();
    form.apply(position, FieldEdit::Cycle(true));
    assert_eq!(form.draft().position, Some(Position::Goalkeeper));
    form.apply(position, FieldEdit::Cycle(false));
    assert_eq!(form.draft().position, None);
    assert_eq!(
        form.draft().field(position).expect("position").value,
        "Select position"
    );
}

#[test]
fn edit_form_round_trips_stored_player() {
    let backend = FakeBackend::seeded();
    let player = backend.get_player(5).expect("seeded player");
    let mut form = PlayerForm::new_edit(player.id);
    form.load(&player);

    let submission = form.begin_submit().expect("stored player is valid");
    assert_eq!(submission.payload.clone().into_player(player.id), player);
}
