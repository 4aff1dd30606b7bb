//! Property tests over random decks and pattern pairs.

use penney_core::{
    aggregate::AggregateStore,
    deck::{Composition, DeckGenerator},
    pattern::{all_patterns, from_bits, to_bits, Pattern},
    playthrough::{Outcome, PlaythroughEngine},
    rng::DeckRng,
    types::DECK_LEN,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn pattern_pair(len: usize) -> impl Strategy<Value = (Pattern, Pattern)> {
    let count = 1usize << len;
    (0..count, 1..count).prop_map(move |(a, offset)| {
        let patterns = all_patterns(len).unwrap();
        let b = (a + offset) % count;
        (patterns[a].clone(), patterns[b].clone())
    })
}

proptest! {
    #[test]
    fn generated_decks_keep_their_composition(seed in any::<u64>(), red in 1usize..40, black in 1usize..40) {
        let composition = Composition::binary(red, black).unwrap();
        let deck = DeckGenerator::new(composition.clone())
            .unwrap()
            .generate(&mut DeckRng::from_seed(seed))
            .unwrap();
        prop_assert_eq!(deck.len(), red + black);
        prop_assert_eq!(deck.count(1), red);
        prop_assert_eq!(deck.count(0), black);
        prop_assert!(deck.check_composition(&composition).is_ok());
    }

    #[test]
    fn pattern_space_is_complete_and_distinct(len in 1usize..=8) {
        let patterns = all_patterns(len).unwrap();
        prop_assert_eq!(patterns.len(), 1 << len);
        let distinct: BTreeSet<String> = patterns.iter().map(|p| p.to_string()).collect();
        prop_assert_eq!(distinct.len(), patterns.len());
        for p in &patterns {
            let text = p.to_string();
            prop_assert_eq!(from_bits(&to_bits(&text).unwrap()).unwrap(), text);
        }
    }

    #[test]
    fn cards_are_conserved(seed in any::<u64>(), (p1, p2) in pattern_pair(3)) {
        let deck = DeckGenerator::default().generate(&mut DeckRng::from_seed(seed)).unwrap();
        let trace = PlaythroughEngine::trace(&deck, &p1, &p2).unwrap();
        let taken: usize = trace.tricks.iter().map(|t| t.cards).sum();
        prop_assert_eq!(taken + trace.discarded, DECK_LEN);
        prop_assert!(trace.discarded < DECK_LEN);
    }

    #[test]
    fn draw_columns_mirror_equal_totals(seed in any::<u64>(), (p1, p2) in pattern_pair(3)) {
        let deck = DeckGenerator::default().generate(&mut DeckRng::from_seed(seed)).unwrap();
        let r = PlaythroughEngine::play(&deck, &p1, &p2).unwrap();
        if r.p1_cards == r.p2_cards {
            prop_assert_eq!(r.draw_cards, r.p1_cards);
            prop_assert_eq!(r.card_outcome(), Outcome::Draw);
        } else {
            prop_assert_eq!(r.draw_cards, 0);
        }
        if r.p1_tricks == r.p2_tricks {
            prop_assert_eq!(r.draw_tricks, r.p1_tricks);
            prop_assert_eq!(r.trick_outcome(), Outcome::Draw);
        } else {
            prop_assert_eq!(r.draw_tricks, 0);
        }
    }

    #[test]
    fn updates_commute(seed_a in any::<u64>(), seed_b in any::<u64>(), (p1, p2) in pattern_pair(3)) {
        let gen = DeckGenerator::default();
        let ra = PlaythroughEngine::play(&gen.generate(&mut DeckRng::from_seed(seed_a)).unwrap(), &p1, &p2).unwrap();
        let rb = PlaythroughEngine::play(&gen.generate(&mut DeckRng::from_seed(seed_b)).unwrap(), &p1, &p2).unwrap();

        let mut ab = AggregateStore::initialize(3, None).unwrap();
        ab.update(&p1, &p2, &ra).unwrap();
        ab.update(&p1, &p2, &rb).unwrap();
        let mut ba = AggregateStore::initialize(3, None).unwrap();
        ba.update(&p1, &p2, &rb).unwrap();
        ba.update(&p1, &p2, &ra).unwrap();
        prop_assert_eq!(ab, ba);
    }
}
