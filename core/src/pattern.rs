//! Pattern space: binary patterns, their string and bit forms, and the
//! canonical enumeration order used for store keys and matrix axes.

use crate::{
    error::{PenneyError, PenneyResult},
    types::{bit_to_card, card_to_bit, Bit},
};
use std::fmt;
use std::str::FromStr;

/// Enumerating 2^L patterns past this length is never what a caller wants.
pub const MAX_PATTERN_LEN: usize = 16;

/// A non-empty binary pattern a player commits to before the deck is revealed.
///
/// Ordering is lexicographic over bits, which for equal lengths matches
/// the string order of the '0'/'1' form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern {
    bits: Box<[Bit]>,
}

impl Pattern {
    pub fn from_bit_slice(bits: &[Bit]) -> PenneyResult<Self> {
        if bits.is_empty() {
            return Err(PenneyError::invalid_pattern("", "pattern is empty"));
        }
        if let Some(bad) = bits.iter().find(|b| **b > 1) {
            return Err(PenneyError::invalid_pattern(
                format!("{bits:?}"),
                format!("non-binary symbol {bad}"),
            ));
        }
        Ok(Self { bits: bits.into() })
    }

    /// Parse card notation, e.g. "RRB" (R = 1, B = 0).
    pub fn from_cards(cards: &str) -> PenneyResult<Self> {
        let bits = cards
            .chars()
            .map(|c| {
                card_to_bit(c).ok_or_else(|| {
                    PenneyError::invalid_pattern(cards, format!("unknown card '{c}'"))
                })
            })
            .collect::<PenneyResult<Vec<_>>>()?;
        Self::from_bit_slice(&bits)
    }

    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Card notation, used for human-readable axis labels.
    pub fn to_cards(&self) -> String {
        self.bits.iter().map(|b| bit_to_card(*b)).collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = PenneyError;

    fn from_str(s: &str) -> PenneyResult<Self> {
        let bits = to_bits(s)?;
        Self::from_bit_slice(&bits)
    }
}

/// Every pattern of `length` in binary counting order ("000", "001", ...).
pub fn all_patterns(length: usize) -> PenneyResult<Vec<Pattern>> {
    if length == 0 || length > MAX_PATTERN_LEN {
        return Err(PenneyError::invalid_pattern(
            format!("<length {length}>"),
            format!("pattern length must be in 1..={MAX_PATTERN_LEN}"),
        ));
    }
    let patterns = (0..1usize << length)
        .map(|n| {
            let bits: Box<[Bit]> = (0..length)
                .rev()
                .map(|shift| ((n >> shift) & 1) as Bit)
                .collect();
            Pattern { bits }
        })
        .collect();
    Ok(patterns)
}

/// Every ordered pair of distinct patterns of `length`, in (p1, p2) order.
pub fn all_pairs(length: usize) -> PenneyResult<Vec<(Pattern, Pattern)>> {
    let patterns = all_patterns(length)?;
    let mut pairs = Vec::with_capacity(patterns.len() * (patterns.len() - 1));
    for p1 in &patterns {
        for p2 in &patterns {
            if p1 != p2 {
                pairs.push((p1.clone(), p2.clone()));
            }
        }
    }
    Ok(pairs)
}

/// "101" -> [1, 0, 1]. Rejects anything but '0' and '1'.
pub fn to_bits(pattern: &str) -> PenneyResult<Vec<Bit>> {
    if pattern.is_empty() {
        return Err(PenneyError::invalid_pattern(pattern, "pattern is empty"));
    }
    pattern
        .chars()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(PenneyError::invalid_pattern(
                pattern,
                format!("non-binary symbol '{other}'"),
            )),
        })
        .collect()
}

/// [1, 0, 1] -> "101". Inverse of `to_bits`.
pub fn from_bits(bits: &[Bit]) -> PenneyResult<String> {
    Ok(Pattern::from_bit_slice(bits)?.to_string())
}
