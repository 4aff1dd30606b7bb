//! Shared primitive types used across the crate.

/// One binary card. 1 = red, 0 = black.
pub type Bit = u8;

/// Card-notation letter for a red card (bit 1).
pub const RED: char = 'R';

/// Card-notation letter for a black card (bit 0).
pub const BLACK: char = 'B';

/// Default cards of each colour in a standard deck.
pub const CARDS_PER_COLOR: usize = 26;

/// Default deck length.
pub const DECK_LEN: usize = 2 * CARDS_PER_COLOR;

/// Default pattern length for a comparison set.
pub const PATTERN_LEN: usize = 3;

/// The canonical run identifier.
pub type RunId = String;

/// Convert one bit to card notation.
pub fn bit_to_card(bit: Bit) -> char {
    if bit == 1 { RED } else { BLACK }
}

/// Convert one card-notation letter to a bit. Case-insensitive.
pub fn card_to_bit(card: char) -> Option<Bit> {
    match card.to_ascii_uppercase() {
        RED => Some(1),
        BLACK => Some(0),
        _ => None,
    }
}

/// Fresh run identifier for the run ledger.
pub fn new_run_id() -> RunId {
    format!("run-{}", uuid::Uuid::new_v4())
}
