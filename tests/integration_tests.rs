//! Integration tests for level loading, autoplay and the serialized views

use std::collections::HashSet;

use rowmatch::core::{
    EngineConfig, GameSnapshot, GroupDefinition, Level, LevelBook, LevelDefinition, LevelError,
    LevelSource, Rank, RankLadder, Resolver, SimpleRng, WidthPolicy,
};
use rowmatch::sim::{autoplay, SimEnd, DEMO_LEVEL};
use rowmatch::types::{GameEvent, RANDOM_LEVEL_GROUPS};

fn disjoint_catalog(groups: usize) -> Vec<GroupDefinition> {
    (0..groups)
        .map(|g| {
            let items: Vec<String> = (0..3).map(|i| format!("g{}-item{}", g, i)).collect();
            let refs: Vec<&str> = items.iter().map(String::as_str).collect();
            GroupDefinition::new(&format!("group{}", g), &refs)
        })
        .collect()
}

#[test]
fn test_level_book_plays_predefined_then_random() {
    let book = LevelBook {
        levels: vec![LevelDefinition {
            groups: vec![
                GroupDefinition::new("fruit", &["apple", "pear", "plum"]),
                GroupDefinition::new("tools", &["saw", "drill", "file"]),
            ],
        }],
        catalog: disjoint_catalog(9),
    };
    let config = EngineConfig::default();
    let mut rng = SimpleRng::new(21);

    let first = book.select(0, &config, &mut rng).unwrap();
    assert_eq!(first.source, LevelSource::Predefined(0));
    assert!(first.tutorial);
    assert_eq!(first.level.group_count(), 2);

    let second = book.select(1, &config, &mut rng).unwrap();
    assert_eq!(second.source, LevelSource::Random);
    assert!(!second.tutorial);
    assert!(second.diagnostics.is_empty());
    assert_eq!(second.level.group_count(), RANDOM_LEVEL_GROUPS);

    let keys: HashSet<&str> = second
        .level
        .groups()
        .iter()
        .map(|g| g.key.as_str())
        .collect();
    assert_eq!(keys.len(), RANDOM_LEVEL_GROUPS);
}

#[test]
fn test_level_book_without_content_is_an_error() {
    let book = LevelBook::default();
    let result = book.select(0, &EngineConfig::default(), &mut SimpleRng::new(1));
    assert!(matches!(result, Err(LevelError::EmptyBook)));
}

#[test]
fn test_level_book_parses_from_json() {
    let json = r#"{
        "levels": [{"groups": [{"key": "birds", "items": ["owl", "crow"]}]}],
        "catalog": [{"key": "cats", "items": ["lion", "lynx"]}]
    }"#;
    let book = LevelBook::from_json(json).unwrap();
    assert_eq!(book.levels.len(), 1);
    assert_eq!(book.catalog[0].key, "cats");

    assert!(matches!(LevelBook::from_json("{ nope"), Err(LevelError::Parse(_))));
}

#[test]
fn test_missing_level_file_reports_path() {
    let err = Level::load(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
    match err {
        LevelError::Io { path, .. } => assert!(path.ends_with("here.json")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_autoplay_completes_demo_level() {
    let level = Level::from_json(DEMO_LEVEL).unwrap();
    for seed in 1..=10 {
        let config = EngineConfig {
            seed,
            ..EngineConfig::default()
        };
        let mut resolver = Resolver::new(&level, &config, false);
        let mut events: Vec<GameEvent> = Vec::new();
        let report = autoplay(&mut resolver, 100, |step, _| {
            if let rowmatch::sim::Step::Events(batch) = step {
                events.extend_from_slice(batch);
            }
        });

        assert_eq!(report.end, SimEnd::LevelComplete, "seed {}", seed);
        assert_eq!(report.rows_cleared, 4);
        assert_eq!(resolver.collected_count(), 4);
        for slot in 0..4 {
            assert_eq!(resolver.indicator_fill(slot), Some(4), "seed {} slot {}", seed, slot);
        }
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::LevelComplete).count(),
            1
        );

        let snapshot = GameSnapshot::capture(&resolver);
        assert!(snapshot.level_complete);
        assert_eq!(snapshot.occupied(), 0);
        assert_eq!(snapshot.queue_remaining, 0);
        assert_eq!(snapshot.seed, seed);
    }
}

#[test]
fn test_snapshot_serializes_cells_in_scan_order() {
    let level = Level::from_json(DEMO_LEVEL).unwrap();
    let config = EngineConfig {
        width_policy: WidthPolicy::Fixed(4),
        seed: 3,
        ..EngineConfig::default()
    };
    let resolver = Resolver::new(&level, &config, false);
    let value = serde_json::to_value(resolver.snapshot()).unwrap();

    assert_eq!(value["width"], 4);
    assert_eq!(value["height"], 4);
    assert_eq!(value["phase"], "idle");
    assert_eq!(value["cells"].as_array().map(Vec::len), Some(16));
    assert!(value["cells"][0].is_null());
    assert_eq!(value["queue_remaining"], 16);
}

#[test]
fn test_rank_ladder_from_json() {
    let ladder: RankLadder = serde_json::from_str(
        r#"{"ranks": [{"key": "novice", "levels_required": 2}, {"key": "expert"}]}"#,
    )
    .unwrap();
    assert_eq!(ladder.ranks[1], Rank::new("expert", 0));

    assert_eq!(ladder.rank_for(0), (0, 0.0));
    assert_eq!(ladder.rank_for(1), (0, 0.5));
    assert_eq!(ladder.rank_for(2).0, 1);
    assert!(ladder.is_max_rank(ladder.rank_for(50).0));
}

#[test]
fn test_config_lookup_overrides_defaults() {
    let config = EngineConfig::from_lookup(|key| match key {
        "ROWMATCH_WIDTH" => Some("largest".to_string()),
        "ROWMATCH_SEED" => Some(" 99 ".to_string()),
        "ROWMATCH_MAX_HEIGHT" => Some("junk".to_string()),
        _ => None,
    });
    assert_eq!(config.width_policy, WidthPolicy::LargestGroup);
    assert_eq!(config.seed, 99);
    assert_eq!(config.max_height, EngineConfig::default().max_height);

    let level = Level::from_json(DEMO_LEVEL).unwrap();
    let resolver = Resolver::new(&level, &config, false);
    assert_eq!(
        resolver.board().width() as usize,
        level.largest_group_size()
    );
}
