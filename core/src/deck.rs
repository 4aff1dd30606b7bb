//! Deck generation: immutable binary decks of a fixed composition.

use crate::{
    error::{PenneyError, PenneyResult},
    rng::DeckRng,
    types::{bit_to_card, card_to_bit, Bit, CARDS_PER_COLOR},
};
use std::collections::BTreeMap;

/// Required count of each symbol in a generated deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    counts: BTreeMap<Bit, usize>,
}

impl Composition {
    pub fn new(counts: BTreeMap<Bit, usize>) -> PenneyResult<Self> {
        let composition = Self { counts };
        composition.validate()?;
        Ok(composition)
    }

    /// `red` cards of symbol 1 and `black` cards of symbol 0.
    pub fn binary(red: usize, black: usize) -> PenneyResult<Self> {
        Self::new(BTreeMap::from([(1, red), (0, black)]))
    }

    /// 26 red, 26 black.
    pub fn standard() -> Self {
        Self {
            counts: BTreeMap::from([(1, CARDS_PER_COLOR), (0, CARDS_PER_COLOR)]),
        }
    }

    /// Both symbols must be present. A single-colour deck has no race.
    pub fn validate(&self) -> PenneyResult<()> {
        if let Some(bad) = self.counts.keys().find(|s| **s > 1) {
            return Err(PenneyError::invalid_deck(format!(
                "composition names non-binary symbol {bad}"
            )));
        }
        for symbol in [0, 1] {
            if self.count(symbol) == 0 {
                return Err(PenneyError::invalid_deck(format!(
                    "composition has no cards of symbol {symbol} ({})",
                    bit_to_card(symbol)
                )));
            }
        }
        Ok(())
    }

    pub fn count(&self, symbol: Bit) -> usize {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::standard()
    }
}

/// An ordered, immutable sequence of binary cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: Box<[Bit]>,
}

impl Deck {
    pub fn from_bits(cards: Vec<Bit>) -> PenneyResult<Self> {
        if cards.is_empty() {
            return Err(PenneyError::invalid_deck("deck is empty"));
        }
        if let Some(pos) = cards.iter().position(|c| *c > 1) {
            return Err(PenneyError::invalid_deck(format!(
                "non-binary card {} at position {pos}",
                cards[pos]
            )));
        }
        Ok(Self { cards: cards.into_boxed_slice() })
    }

    /// Parse card notation, e.g. "RRBRB..." (R = 1, B = 0).
    pub fn from_cards(sequence: &str) -> PenneyResult<Self> {
        let cards = sequence
            .chars()
            .enumerate()
            .map(|(i, c)| {
                card_to_bit(c).ok_or_else(|| {
                    PenneyError::invalid_deck(format!("unknown card '{c}' at position {i}"))
                })
            })
            .collect::<PenneyResult<Vec<_>>>()?;
        Self::from_bits(cards)
    }

    pub fn bits(&self) -> &[Bit] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, symbol: Bit) -> usize {
        self.cards.iter().filter(|c| **c == symbol).count()
    }

    pub fn to_cards(&self) -> String {
        self.cards.iter().map(|c| bit_to_card(*c)).collect()
    }

    /// Used for externally supplied decks before they are scored.
    pub fn check_composition(&self, composition: &Composition) -> PenneyResult<()> {
        if self.len() != composition.len() {
            return Err(PenneyError::invalid_deck(format!(
                "expected {} cards, found {}",
                composition.len(),
                self.len()
            )));
        }
        for symbol in [0, 1] {
            let (want, got) = (composition.count(symbol), self.count(symbol));
            if want != got {
                return Err(PenneyError::invalid_deck(format!(
                    "expected {want} cards of symbol {symbol}, found {got}"
                )));
            }
        }
        Ok(())
    }
}

/// Produce one shuffled deck from `composition`, drawing only from `rng`.
pub fn generate(composition: &Composition, rng: &mut DeckRng) -> PenneyResult<Deck> {
    composition.validate()?;
    let mut cards = Vec::with_capacity(composition.len());
    for (symbol, count) in &composition.counts {
        cards.extend(std::iter::repeat(*symbol).take(*count));
    }
    rng.shuffle(&mut cards);
    Deck::from_bits(cards)
}

/// Generator bound to one validated composition.
#[derive(Debug, Clone)]
pub struct DeckGenerator {
    composition: Composition,
}

impl DeckGenerator {
    pub fn new(composition: Composition) -> PenneyResult<Self> {
        composition.validate()?;
        Ok(Self { composition })
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn generate(&self, rng: &mut DeckRng) -> PenneyResult<Deck> {
        generate(&self.composition, rng)
    }

    pub fn generate_batch(&self, n: usize, rng: &mut DeckRng) -> PenneyResult<Vec<Deck>> {
        (0..n).map(|_| self.generate(rng)).collect()
    }
}

impl Default for DeckGenerator {
    fn default() -> Self {
        Self { composition: Composition::standard() }
    }
}
