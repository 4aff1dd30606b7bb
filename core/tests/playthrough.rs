//! Playthrough engine tests: hand-traced decks, tie-breaking, failures.

use penney_core::{
    deck::Deck,
    error::PenneyError,
    pattern::Pattern,
    playthrough::{play_through, Outcome, PlaythroughEngine, PlaythroughResult, Side},
};

fn pat(s: &str) -> Pattern {
    s.parse().expect("valid pattern")
}

/// RRRBRBBBRB = 1110100010.
/// 111 takes cards 0..3, then 000 (offset 5) takes cards 3..8, "RB" is discarded.
#[test]
fn hand_traced_deck_scores_both_tricks() {
    let deck = Deck::from_cards("RRRBRBBBRB").unwrap();
    let trace = PlaythroughEngine::trace(&deck, &pat("111"), &pat("000")).unwrap();

    assert_eq!(trace.tricks.len(), 2);
    assert_eq!(trace.tricks[0].winner, Side::P1);
    assert_eq!(trace.tricks[0].offset, 0);
    assert_eq!(trace.tricks[0].cards, 3);
    assert_eq!(trace.tricks[1].winner, Side::P2);
    assert_eq!(trace.tricks[1].offset, 5);
    assert_eq!(trace.tricks[1].cards, 5);
    assert_eq!(trace.discarded, 2);

    let result = PlaythroughResult::from(&trace);
    assert_eq!(
        result,
        PlaythroughResult {
            p1_cards: 3,
            p1_tricks: 1,
            p2_cards: 5,
            p2_tricks: 1,
            draw_cards: 0,
            draw_tricks: 1,
        }
    );
    assert_eq!(result.card_outcome(), Outcome::P2);
    assert_eq!(result.trick_outcome(), Outcome::Draw);
}

/// Length-1 patterns still race mechanically: "1" is seen at offset 0
/// before "0", then "0" takes the last card.
#[test]
fn single_symbol_patterns_race_mechanically() {
    let deck = Deck::from_cards("RB").unwrap();
    let trace = PlaythroughEngine::trace(&deck, &pat("1"), &pat("0")).unwrap();

    assert_eq!(trace.tricks[0].winner, Side::P1);
    assert_eq!(trace.tricks[0].offset, 0);
    assert_eq!(trace.tricks[0].cards, 1);

    let result = play_through(&deck, &pat("1"), &pat("0")).unwrap();
    assert_eq!(result.p1_tricks, 1);
    assert_eq!(result.p1_cards, 1);
    assert_eq!(result.p2_tricks, 1);
    assert_eq!(result.p2_cards, 1);
    assert_eq!(result.draw_cards, 1, "equal card totals are a draw");
    assert_eq!(result.draw_tricks, 1);
}

#[test]
fn shorter_pattern_wins_same_offset_tie() {
    let deck = Deck::from_cards("RB").unwrap();

    let forward = play_through(&deck, &pat("1"), &pat("10")).unwrap();
    assert_eq!((forward.p1_tricks, forward.p1_cards), (1, 1));
    assert_eq!((forward.p2_tricks, forward.p2_cards), (0, 0));

    let reverse = play_through(&deck, &pat("10"), &pat("1")).unwrap();
    assert_eq!((reverse.p1_tricks, reverse.p1_cards), (0, 0));
    assert_eq!((reverse.p2_tricks, reverse.p2_cards), (1, 1));
}

#[test]
fn no_match_anywhere_scores_nothing() {
    let deck = Deck::from_cards("RBRBRB").unwrap();
    let trace = PlaythroughEngine::trace(&deck, &pat("111"), &pat("000")).unwrap();
    assert!(trace.tricks.is_empty());
    assert_eq!(trace.discarded, 6);

    // Zero-zero totals are still a (zero-sized) draw.
    let result = PlaythroughResult::from(&trace);
    assert_eq!(result, PlaythroughResult::default());
    assert_eq!(result.card_outcome(), Outcome::Draw);
}

#[test]
fn overlapping_occurrences_are_not_double_counted() {
    // 11111: "11" matches at 0, then again at 2; the last card is discarded.
    let deck = Deck::from_cards("RRRRR").unwrap();
    let trace = PlaythroughEngine::trace(&deck, &pat("11"), &pat("00")).unwrap();
    assert_eq!(trace.tricks.len(), 2);
    assert_eq!(trace.tricks[1].offset, 2);
    assert_eq!(trace.discarded, 1);
}

#[test]
fn identical_patterns_are_rejected() {
    let deck = Deck::from_cards("RRBB").unwrap();
    let err = play_through(&deck, &pat("101"), &pat("101")).unwrap_err();
    assert!(matches!(err, PenneyError::InvalidPattern { .. }), "got {err:?}");
}

#[test]
fn pattern_longer_than_deck_is_rejected() {
    let deck = Deck::from_cards("RBR").unwrap();
    let err = play_through(&deck, &pat("1010"), &pat("0101")).unwrap_err();
    assert!(matches!(err, PenneyError::InvalidDeck { .. }), "got {err:?}");
}

#[test]
fn empty_pattern_cannot_be_built() {
    assert!(matches!("".parse::<Pattern>(), Err(PenneyError::InvalidPattern { .. })));
    assert!(Pattern::from_bit_slice(&[]).is_err());
}
