use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use contract_terminal::api::parse_list;
use contract_terminal::engine::{FilterKey, ListEngine};
use contract_terminal::listing::PlayerSortKey;
use contract_terminal::model::{Player, Position};
use contract_terminal::statistics::{Statistics, parse_statistics};

const TEAMS: [&str; 6] = ["Rovers", "Athletic", "Wanderers", "United", "Old Town", "Harbour FC"];

fn squad(size: u32) -> Vec<Player> {
    let mut rng = StdRng::seed_from_u64(42);
    (1..=size)
        .map(|id| Player {
            id,
            name: format!("Player {id:05}"),
            position: Position::ALL[rng.gen_range(0..Position::ALL.len())],
            team: TEAMS[rng.gen_range(0..TEAMS.len())].to_string(),
            price: rng.gen_range(100_000.0..50_000_000.0),
            contract_duration: rng.gen_range(1..6),
            years_left: rng.gen_range(0..5),
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
        })
        .collect()
}

fn bench_visible_page(c: &mut Criterion) {
    let mut engine = ListEngine::new(25);
    engine.replace_items(squad(5_000));
    engine.set_filter(FilterKey::Team, "Rovers");
    engine.set_filter(FilterKey::Search, "1");
    engine.sort_by(PlayerSortKey::Price);

    c.bench_function("visible_page_5k", |b| {
        b.iter(|| {
            let rows = engine.visible();
            black_box(rows.len());
        })
    });
}

fn bench_sort_by_name(c: &mut Criterion) {
    let mut engine = ListEngine::new(50);
    engine.replace_items(squad(5_000));
    engine.sort_by(PlayerSortKey::Name);

    c.bench_function("sort_by_name_5k", |b| {
        b.iter(|| {
            let rows = engine.filtered();
            black_box(rows.first().map(|p| p.id));
        })
    });
}

fn bench_players_parse(c: &mut Criterion) {
    let body = serde_json::to_string(
        &(1..=500)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "name": format!("Player {id}"),
                    "position": "Midfielder",
                    "team": {"id": 1, "name": "Rovers"},
                    "price": 1_500_000.0,
                    "contract_duration": 4,
                    "years_left": 2,
                    "statistics": "{\"goals\": 4, \"assists\": 7}",
                    "contract_start_date": "2024-07-01"
                })
            })
            .collect::<Vec<_>>(),
    )
    .expect("serializable fixture");

    c.bench_function("players_parse_500", |b| {
        b.iter(|| {
            let players: Vec<Player> = parse_list(black_box(&body)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_statistics_parse(c: &mut Criterion) {
    let text = r#"{"goals": 21, "assists": 6, "minutes": 2710, "xg": 17.4, "shots": 88}"#;
    c.bench_function("statistics_parse", |b| {
        b.iter(|| {
            let stats = parse_statistics(black_box(text)).unwrap();
            black_box(stats.len());
        })
    });
}

criterion_group!(
    perf,
    bench_visible_page,
    bench_sort_by_name,
    bench_players_parse,
    bench_statistics_parse
);
criterion_main!(perf);
