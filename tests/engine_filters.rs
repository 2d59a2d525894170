use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use contract_terminal::engine::{ALL, FilterKey, ListEngine, ListStatus};
use contract_terminal::model::{Player, Position, position_label};
use contract_terminal::statistics::Statistics;

const NAMES: [&str; 6] = ["Ana", "anatoli", "Bruno", "Carla", "Dario", "Bianca"];
const TEAMS: [&str; 3] = ["Rovers", "Athletic", "Wanderers"];

fn player(id: u32, name: &str, position: Position, team: &str) -> Player {
    Player {
        id,
        name: name.to_string(),
        position,
        team: team.to_string(),
        price: f64::from(id) * 1_000.0,
        contract_duration: 3,
        years_left: 1,
        on_loan: false,
        loan_team: None,
        statistics: Statistics::new(),
        contract_start_date: None,
        signing_date: None,
        sell_on_clause: false,
        sell_on_percentage: None,
        nationality: None,
        nationality_flag: None,
        player_image: None,
        jersey_number: None,
        age: None,
        height: None,
        weight: None,
        preferred_foot: None,
    }
}

fn random_squad(rng: &mut StdRng, size: u32) -> Vec<Player> {
    (1..=size)
        .map(|id| {
            let name = NAMES[rng.gen_range(0..NAMES.len())];
            let position = Position::ALL[rng.gen_range(0..Position::ALL.len())];
            let team = TEAMS[rng.gen_range(0..TEAMS.len())];
            player(id, &format!("{name} {id}"), position, team)
        })
        .collect()
}

fn loaded(players: Vec<Player>) -> ListEngine<Player> {
    let mut engine = ListEngine::new(50);
    engine.replace_items(players);
    engine
}

#[test]
fn filtered_rows_are_the_intersection_of_each_predicate() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..40 {
        let size = rng.gen_range(0..60);
        let squad = random_squad(&mut rng, size);
        let search = ["an", "BR", "", "zz", "1"][rng.gen_range(0..5)];
        let position = position_label(Position::ALL[rng.gen_range(0..4)]);
        let team = [ALL, "Rovers", "Athletic"][rng.gen_range(0..3)];

        let mut engine = loaded(squad.clone());
        engine.set_filter(FilterKey::Search, search);
        engine.set_filter(FilterKey::Position, position);
        engine.set_filter(FilterKey::Team, team);

        let expected: Vec<u32> = squad
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&search.to_lowercase()))
            .filter(|p| position_label(p.position) == position)
            .filter(|p| team == ALL || p.team == team)
            .map(|p| p.id)
            .collect();
        let actual: Vec<u32> = engine.filtered().iter().map(|p| p.id).collect();
        assert_eq!(actual, expected, "search={search:?} position={position} team={team}");
    }
}

#[test]
fn all_disables_a_categorical_filter() {
    let mut engine = loaded(vec![
        player(1, "Ana", Position::Forward, "Rovers"),
        player(2, "Bruno", Position::Defender, "Athletic"),
    ]);
    engine.set_filter(FilterKey::Team, "Rovers");
    assert_eq!(engine.filtered().len(), 1);
    assert_eq!(engine.filter(FilterKey::Team), "Rovers");

    engine.set_filter(FilterKey::Team, ALL);
    assert_eq!(engine.filtered().len(), 2);
    assert_eq!(engine.filter(FilterKey::Team), ALL);
    assert_eq!(engine.active_filters().count(), 0);
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut engine = loaded(vec![
        player(1, "Ana Lopes", Position::Forward, "Rovers"),
        player(2, "anatoli", Position::Midfielder, "Rovers"),
        player(3, "Bruno Diana", Position::Defender, "Athletic"),
        player(4, "Carla", Position::Goalkeeper, "Athletic"),
    ]);
    engine.set_filter(FilterKey::Search, "ANA");
    let ids: Vec<u32> = engine.filtered().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    engine.set_filter(FilterKey::Search, "");
    assert_eq!(engine.filter(FilterKey::Search), "");
    assert_eq!(engine.filtered().len(), 4);
}

#[test]
fn filter_with_no_matches_is_empty_not_failed() {
    let mut engine = loaded(vec![player(1, "Ana", Position::Forward, "Rovers")]);
    engine.set_filter(FilterKey::Team, "Nobody");
    assert!(engine.filtered().is_empty());
    assert!(engine.visible().is_empty());
    assert_eq!(engine.status(), &ListStatus::Ready);
    assert_eq!(engine.page_count(), 1);
}

#[test]
fn clearing_filters_restores_every_row() {
    let mut rng = StdRng::seed_from_u64(11);
    let squad = random_squad(&mut rng, 30);
    let mut engine = loaded(squad.clone());
    engine.set_filter(FilterKey::Search, "a");
    engine.set_filter(FilterKey::Position, "Forward");
    engine.clear_filters();
    let ids: Vec<u32> = engine.filtered().iter().map(|p| p.id).collect();
    let all: Vec<u32> = squad.iter().map(|p| p.id).collect();
    assert_eq!(ids, all);
}

#[test]
fn rows_hidden_while_loading_or_failed() {
    let mut engine: ListEngine<Player> = ListEngine::new(10);
    assert_eq!(engine.status(), &ListStatus::Loading);
    assert!(engine.filtered().is_empty());

    engine.replace_items(vec![player(1, "Ana", Position::Forward, "Rovers")]);
    assert_eq!(engine.visible().len(), 1);

    engine.fail_load("network error: connection refused");
    assert!(engine.items().is_empty());
    assert!(matches!(engine.status(), ListStatus::Failed(msg) if msg.contains("refused")));
    assert!(engine.visible().is_empty());
}
