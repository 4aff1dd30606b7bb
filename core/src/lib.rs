//! Penney's Game deck-scoring engine.
//!
//! Generates shuffled binary decks, races every ordered pair of patterns
//! through each deck, and folds the outcomes into a persistent aggregate
//! table that reduces to win%/draw% matrices.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod deck;
pub mod error;
pub mod export;
pub mod matrix;
pub mod pattern;
pub mod pipeline;
pub mod playthrough;
pub mod rng;
pub mod sink;
pub mod store;
pub mod types;
