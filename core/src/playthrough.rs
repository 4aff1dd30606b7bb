//! Single-deck playthrough: the trick race between two patterns.
//!
//! RULES (one canonical scoring rule, no variants):
//!   - Scan from the cursor for the first occurrence of each pattern.
//!   - The earlier occurrence wins the trick and every card from the
//!     cursor through the end of the matched pattern.
//!   - On a same-offset tie the shorter pattern wins. Two distinct
//!     patterns of equal length can never tie; if they do, fail fast.
//!   - When neither pattern occurs again the tail is discarded.
//!   - Draws are decided once, on whole-deck totals, never per trick.

use crate::{
    deck::Deck,
    error::{PenneyError, PenneyResult},
    pattern::Pattern,
    types::Bit,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which player took a trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The chooser, holding p1.
    P1,
    /// The opponent, holding p2.
    P2,
}

/// Whole-deck outcome for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    P1,
    P2,
    Draw,
}

/// One awarded trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trick {
    pub winner: Side,
    /// Absolute deck offset where the winning pattern starts.
    pub offset: usize,
    /// Cards consumed since the previous trick boundary.
    pub cards: usize,
}

/// Every trick of one playthrough plus the unscored tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaythroughTrace {
    pub tricks: Vec<Trick>,
    pub discarded: usize,
}

impl PlaythroughTrace {
    pub fn cards_for(&self, side: Side) -> u64 {
        self.tricks.iter().filter(|t| t.winner == side).map(|t| t.cards as u64).sum()
    }

    pub fn tricks_for(&self, side: Side) -> u64 {
        self.tricks.iter().filter(|t| t.winner == side).count() as u64
    }
}

/// Outcome of one (deck, p1, p2) evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaythroughResult {
    pub p1_cards:    u64,
    pub p1_tricks:   u64,
    pub p2_cards:    u64,
    pub p2_tricks:   u64,
    /// Equal to both card totals when they tie, else 0.
    pub draw_cards:  u64,
    /// Equal to both trick totals when they tie, else 0.
    pub draw_tricks: u64,
}

impl PlaythroughResult {
    pub fn card_outcome(&self) -> Outcome {
        outcome(self.p1_cards, self.p2_cards)
    }

    pub fn trick_outcome(&self) -> Outcome {
        outcome(self.p1_tricks, self.p2_tricks)
    }
}

impl From<&PlaythroughTrace> for PlaythroughResult {
    fn from(trace: &PlaythroughTrace) -> Self {
        let p1_cards = trace.cards_for(Side::P1);
        let p2_cards = trace.cards_for(Side::P2);
        let p1_tricks = trace.tricks_for(Side::P1);
        let p2_tricks = trace.tricks_for(Side::P2);
        Self {
            p1_cards,
            p1_tricks,
            p2_cards,
            p2_tricks,
            draw_cards: if p1_cards == p2_cards { p1_cards } else { 0 },
            draw_tricks: if p1_tricks == p2_tricks { p1_tricks } else { 0 },
        }
    }
}

fn outcome(p1: u64, p2: u64) -> Outcome {
    match p1.cmp(&p2) {
        Ordering::Greater => Outcome::P1,
        Ordering::Less => Outcome::P2,
        Ordering::Equal => Outcome::Draw,
    }
}

/// Offset of the first occurrence of `pattern` in `cards`, if any.
fn find(cards: &[Bit], pattern: &[Bit]) -> Option<usize> {
    if pattern.len() > cards.len() {
        return None;
    }
    cards.windows(pattern.len()).position(|w| w == pattern)
}

/// Stateless scoring engine.
pub struct PlaythroughEngine;

impl PlaythroughEngine {
    /// Reject inputs that cannot describe a game.
    pub fn validate(deck: &Deck, p1: &Pattern, p2: &Pattern) -> PenneyResult<()> {
        if p1 == p2 {
            return Err(PenneyError::invalid_pattern(
                p1.to_string(),
                "both players chose the same pattern",
            ));
        }
        for p in [p1, p2] {
            if p.len() > deck.len() {
                return Err(PenneyError::invalid_deck(format!(
                    "pattern '{p}' ({} cards) is longer than the deck ({} cards)",
                    p.len(),
                    deck.len()
                )));
            }
        }
        Ok(())
    }

    /// Play the deck through and record every trick.
    pub fn trace(deck: &Deck, p1: &Pattern, p2: &Pattern) -> PenneyResult<PlaythroughTrace> {
        Self::validate(deck, p1, p2)?;

        let cards = deck.bits();
        let mut cursor = 0;
        let mut trace = PlaythroughTrace::default();

        while cursor < cards.len() {
            let rest = &cards[cursor..];
            let hit1 = find(rest, p1.bits());
            let hit2 = find(rest, p2.bits());

            let (winner, rel, len) = match (hit1, hit2) {
                (None, None) => break,
                (Some(a), None) => (Side::P1, a, p1.len()),
                (None, Some(b)) => (Side::P2, b, p2.len()),
                (Some(a), Some(b)) => match a.cmp(&b) {
                    Ordering::Less => (Side::P1, a, p1.len()),
                    Ordering::Greater => (Side::P2, b, p2.len()),
                    Ordering::Equal => match p1.len().cmp(&p2.len()) {
                        Ordering::Less => (Side::P1, a, p1.len()),
                        Ordering::Greater => (Side::P2, b, p2.len()),
                        Ordering::Equal => {
                            return Err(PenneyError::UnreachableTie {
                                p1: p1.to_string(),
                                p2: p2.to_string(),
                                offset: cursor + a,
                            });
                        }
                    },
                },
            };

            let end = cursor + rel + len;
            let trick = Trick { winner, offset: cursor + rel, cards: end - cursor };
            log::trace!("{p1} vs {p2}: {winner:?} takes {} cards at {}", trick.cards, trick.offset);
            trace.tricks.push(trick);
            cursor = end;
        }

        trace.discarded = cards.len() - cursor;
        Ok(trace)
    }

    /// Score one deck for the pair (p1, p2).
    pub fn play(deck: &Deck, p1: &Pattern, p2: &Pattern) -> PenneyResult<PlaythroughResult> {
        Self::trace(deck, p1, p2).map(|t| PlaythroughResult::from(&t))
    }
}

/// Free-function form of [`PlaythroughEngine::play`].
pub fn play_through(deck: &Deck, p1: &Pattern, p2: &Pattern) -> PenneyResult<PlaythroughResult> {
    PlaythroughEngine::play(deck, p1, p2)
}
