//! Aggregate store tests: initialisation, updates, reload round-trip, merge.

use penney_core::{
    aggregate::{AggregateRow, AggregateStore},
    batch::process,
    deck::DeckGenerator,
    error::PenneyError,
    pattern::Pattern,
    playthrough::PlaythroughResult,
    rng::DeckRng,
};

fn pat(s: &str) -> Pattern {
    s.parse().expect("valid pattern")
}

fn sample_result() -> PlaythroughResult {
    PlaythroughResult {
        p1_cards: 30,
        p1_tricks: 7,
        p2_cards: 18,
        p2_tricks: 7,
        draw_cards: 0,
        draw_tricks: 7,
    }
}

#[test]
fn fresh_store_has_every_ordered_pair_zeroed() {
    let store = AggregateStore::initialize(3, None).unwrap();
    assert_eq!(store.len(), 56);

    let rows = store.export();
    assert_eq!(rows.len(), 56);
    assert!(rows.iter().all(|r| r.p1 != r.p2));
    assert!(rows.iter().all(|r| *r == AggregateRow { p1: r.p1.clone(), p2: r.p2.clone(), ..zero() }));

    // Sorted by (p1, p2).
    let keys: Vec<(String, String)> = rows.iter().map(|r| (r.p1.clone(), r.p2.clone())).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys[0], ("000".to_string(), "001".to_string()));
}

fn zero() -> AggregateRow {
    AggregateRow {
        p1: String::new(),
        p2: String::new(),
        p1_cards: 0,
        p1_tricks: 0,
        p2_cards: 0,
        p2_tricks: 0,
        draw_cards: 0,
        draw_tricks: 0,
        games_count: 0,
    }
}

#[test]
fn update_adds_fields_and_counts_games() {
    let mut store = AggregateStore::initialize(3, None).unwrap();
    store.update(&pat("110"), &pat("011"), &sample_result()).unwrap();
    store.update(&pat("110"), &pat("011"), &sample_result()).unwrap();

    let row = store.row(&pat("110"), &pat("011")).unwrap();
    assert_eq!(row.p1_cards, 60);
    assert_eq!(row.p1_tricks, 14);
    assert_eq!(row.p2_cards, 36);
    assert_eq!(row.draw_tricks, 14);
    assert_eq!(row.games_count, 2);

    // The mirrored pair is a separate row.
    assert_eq!(store.row(&pat("011"), &pat("110")).unwrap().games_count, 0);
}

#[test]
fn update_rejects_self_pair_and_unknown_pair() {
    let mut store = AggregateStore::initialize(3, None).unwrap();

    let err = store.update(&pat("101"), &pat("101"), &sample_result()).unwrap_err();
    assert!(matches!(err, PenneyError::InvalidPattern { .. }), "got {err:?}");

    let err = store.update(&pat("1010"), &pat("0101"), &sample_result()).unwrap_err();
    assert!(matches!(err, PenneyError::StoreKeyMissing { .. }), "got {err:?}");
}

#[test]
fn export_reload_export_is_identity() {
    let generator = DeckGenerator::default();
    let mut rng = DeckRng::from_seed(11);
    let decks = generator.generate_batch(25, &mut rng).unwrap();

    let mut store = AggregateStore::initialize(3, None).unwrap();
    process(&decks, &mut store, 3).unwrap();
    let first = store.export();

    let reloaded = AggregateStore::initialize(3, Some(&first)).unwrap();
    assert_eq!(reloaded.export(), first);
    assert_eq!(reloaded, store);
}

#[test]
fn partial_prior_export_is_completed_with_zeroed_pairs() {
    let prior = vec![AggregateRow {
        p1: "000".into(),
        p2: "111".into(),
        p1_cards: 100,
        p1_tricks: 10,
        p2_cards: 120,
        p2_tricks: 12,
        draw_cards: 0,
        draw_tricks: 0,
        games_count: 5,
    }];
    let store = AggregateStore::initialize(3, Some(&prior)).unwrap();
    assert_eq!(store.len(), 56);
    assert_eq!(store.row(&pat("000"), &pat("111")).unwrap(), prior[0]);
    assert_eq!(store.row(&pat("111"), &pat("000")).unwrap().games_count, 0);
}

#[test]
fn rows_for_another_pattern_length_are_preserved() {
    let two = AggregateStore::initialize(2, None).unwrap().export();
    let store = AggregateStore::initialize(3, Some(&two)).unwrap();
    assert_eq!(store.len(), 12 + 56);
}

#[test]
fn malformed_prior_rows_fail_fast() {
    let mut bad = zero();
    bad.p1 = "01x".into();
    bad.p2 = "010".into();
    assert!(AggregateStore::initialize(3, Some(&[bad])).is_err());

    let mut selfpair = zero();
    selfpair.p1 = "010".into();
    selfpair.p2 = "010".into();
    assert!(AggregateStore::initialize(3, Some(&[selfpair])).is_err());
}

#[test]
fn merge_sums_field_wise_and_reset_zeroes() {
    let mut a = AggregateStore::initialize(3, None).unwrap();
    let mut b = a.empty_like();
    a.update(&pat("001"), &pat("100"), &sample_result()).unwrap();
    b.update(&pat("001"), &pat("100"), &sample_result()).unwrap();
    b.update(&pat("010"), &pat("100"), &sample_result()).unwrap();

    a.merge(&b);
    assert_eq!(a.row(&pat("001"), &pat("100")).unwrap().games_count, 2);
    assert_eq!(a.row(&pat("001"), &pat("100")).unwrap().p1_cards, 60);
    assert_eq!(a.row(&pat("010"), &pat("100")).unwrap().games_count, 1);
    assert_eq!(a.sample_size(), 2);

    a.reset();
    assert_eq!(a.sample_size(), 0);
    assert_eq!(a.len(), 56);
}
