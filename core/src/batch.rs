//! Batch processing: scores decks against every ordered pattern pair.
//!
//! EVALUATION ORDER (fixed):
//!   for each deck, in input order
//!     for each p1 in pattern order
//!       for each p2 in pattern order, p2 != p1
//!
//! RULES:
//!   - The sequential paths apply updates as they go. If a playthrough
//!     fails, updates already applied stay in the store.
//!   - The parallel path scores into per-worker scratch stores and merges
//!     into the caller's store only after every playthrough succeeded.
//!   - Decks are never deduplicated. Feed each deck once per pass.

use crate::{
    aggregate::AggregateStore,
    deck::Deck,
    error::{PenneyError, PenneyResult},
    pattern::{all_pairs, Pattern},
    playthrough::PlaythroughEngine,
};
use rayon::prelude::*;
use std::ops::Range;

/// Decks scored between aggregate persists during a chunked pass.
pub const CHECKPOINT_INTERVAL: usize = 1_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub decks_processed: usize,
    pub playthroughs:    usize,
}

impl BatchStats {
    fn absorb(&mut self, other: BatchStats) {
        self.decks_processed += other.decks_processed;
        self.playthroughs += other.playthroughs;
    }
}

pub struct BatchProcessor {
    pattern_length: usize,
    pairs:          Vec<(Pattern, Pattern)>,
}

impl BatchProcessor {
    pub fn new(pattern_length: usize) -> PenneyResult<Self> {
        Ok(Self {
            pattern_length,
            pairs: all_pairs(pattern_length)?,
        })
    }

    pub fn pattern_length(&self) -> usize {
        self.pattern_length
    }

    /// Ordered pairs evaluated per deck.
    pub fn pairs(&self) -> &[(Pattern, Pattern)] {
        &self.pairs
    }

    fn score_deck(&self, deck: &Deck, store: &mut AggregateStore) -> PenneyResult<usize> {
        for (p1, p2) in &self.pairs {
            let result = PlaythroughEngine::play(deck, p1, p2)?;
            store.update(p1, p2, &result)?;
        }
        Ok(self.pairs.len())
    }

    /// Score every deck into `store`, aborting on the first failure.
    pub fn process(&self, decks: &[Deck], store: &mut AggregateStore) -> PenneyResult<BatchStats> {
        let mut stats = BatchStats::default();
        for deck in decks {
            stats.playthroughs += self.score_deck(deck, store)?;
            stats.decks_processed += 1;
        }
        log::debug!(
            "Scored {} decks ({} playthroughs) at pattern length {}",
            stats.decks_processed,
            stats.playthroughs,
            self.pattern_length
        );
        Ok(stats)
    }

    /// Score decks on the rayon pool. All-or-nothing.
    pub fn process_parallel(&self, decks: &[Deck], store: &mut AggregateStore) -> PenneyResult<BatchStats> {
        let scratch = store.empty_like();
        let partial = decks
            .par_iter()
            .try_fold(
                || scratch.clone(),
                |mut acc, deck| {
                    self.score_deck(deck, &mut acc)?;
                    Ok::<_, PenneyError>(acc)
                },
            )
            .try_reduce(
                || scratch.clone(),
                |mut a, b| {
                    a.merge(&b);
                    Ok(a)
                },
            )?;
        store.merge(&partial);

        let stats = BatchStats {
            decks_processed: decks.len(),
            playthroughs:    decks.len() * self.pairs.len(),
        };
        log::debug!("Scored {} decks in parallel", stats.decks_processed);
        Ok(stats)
    }

    /// Score in chunks of `chunk_size`, calling `on_checkpoint` with the
    /// store and the deck range just folded in after every chunk.
    pub fn process_chunked<F>(
        &self,
        decks: &[Deck],
        store: &mut AggregateStore,
        chunk_size: usize,
        parallel: bool,
        mut on_checkpoint: F,
    ) -> PenneyResult<BatchStats>
    where
        F: FnMut(&AggregateStore, Range<usize>) -> PenneyResult<()>,
    {
        let chunk_size = chunk_size.max(1);
        let mut stats = BatchStats::default();
        for (i, chunk) in decks.chunks(chunk_size).enumerate() {
            let chunk_stats = if parallel {
                self.process_parallel(chunk, store)?
            } else {
                self.process(chunk, store)?
            };
            stats.absorb(chunk_stats);
            let start = i * chunk_size;
            on_checkpoint(store, start..start + chunk.len())?;
            log::info!("Checkpoint: {}/{} decks scored", stats.decks_processed, decks.len());
        }
        Ok(stats)
    }
}

/// One-shot form: score `decks` for every pair of `pattern_length`.
pub fn process(decks: &[Deck], store: &mut AggregateStore, pattern_length: usize) -> PenneyResult<BatchStats> {
    BatchProcessor::new(pattern_length)?.process(decks, store)
}
