//! Cumulative per-pair statistics across every processed deck.
//!
//! RULE: one row per ordered pair of distinct patterns. Rows are created at
//! initialisation and only ever grow; nothing deletes a row except reset().
//! The store does not deduplicate: folding the same deck twice counts twice.

use crate::{
    error::{PenneyError, PenneyResult},
    pattern::{all_patterns, Pattern},
    playthrough::PlaythroughResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat export row. Column order is the persistence contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub p1:          String,
    pub p2:          String,
    pub p1_cards:    u64,
    pub p1_tricks:   u64,
    pub p2_cards:    u64,
    pub p2_tricks:   u64,
    pub draw_cards:  u64,
    pub draw_tricks: u64,
    pub games_count: u64,
}

impl AggregateRow {
    pub const COLUMNS: [&'static str; 9] = [
        "p1", "p2", "p1_cards", "p1_tricks", "p2_cards", "p2_tricks",
        "draw_cards", "draw_tricks", "games_count",
    ];

    pub fn zeroed(p1: &Pattern, p2: &Pattern) -> Self {
        Counters::default().to_row(p1, p2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    p1_cards:    u64,
    p1_tricks:   u64,
    p2_cards:    u64,
    p2_tricks:   u64,
    draw_cards:  u64,
    draw_tricks: u64,
    games_count: u64,
}

impl Counters {
    fn add_result(&mut self, r: &PlaythroughResult) {
        self.p1_cards += r.p1_cards;
        self.p1_tricks += r.p1_tricks;
        self.p2_cards += r.p2_cards;
        self.p2_tricks += r.p2_tricks;
        self.draw_cards += r.draw_cards;
        self.draw_tricks += r.draw_tricks;
        self.games_count += 1;
    }

    fn add(&mut self, other: &Counters) {
        self.p1_cards += other.p1_cards;
        self.p1_tricks += other.p1_tricks;
        self.p2_cards += other.p2_cards;
        self.p2_tricks += other.p2_tricks;
        self.draw_cards += other.draw_cards;
        self.draw_tricks += other.draw_tricks;
        self.games_count += other.games_count;
    }

    fn from_row(row: &AggregateRow) -> Self {
        Self {
            p1_cards:    row.p1_cards,
            p1_tricks:   row.p1_tricks,
            p2_cards:    row.p2_cards,
            p2_tricks:   row.p2_tricks,
            draw_cards:  row.draw_cards,
            draw_tricks: row.draw_tricks,
            games_count: row.games_count,
        }
    }

    fn to_row(self, p1: &Pattern, p2: &Pattern) -> AggregateRow {
        AggregateRow {
            p1:          p1.to_string(),
            p2:          p2.to_string(),
            p1_cards:    self.p1_cards,
            p1_tricks:   self.p1_tricks,
            p2_cards:    self.p2_cards,
            p2_tricks:   self.p2_tricks,
            draw_cards:  self.draw_cards,
            draw_tricks: self.draw_tricks,
            games_count: self.games_count,
        }
    }
}

/// In-memory aggregate keyed by (p1, p2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStore {
    pattern_length: usize,
    rows: BTreeMap<Pattern, BTreeMap<Pattern, Counters>>,
}

impl AggregateStore {
    /// Zeroed rows for every valid pair of `pattern_length`, overlaid with
    /// `prior` when given. Prior rows for other lengths are kept as-is.
    pub fn initialize(pattern_length: usize, prior: Option<&[AggregateRow]>) -> PenneyResult<Self> {
        let patterns = all_patterns(pattern_length)?;
        let mut store = Self { pattern_length, rows: BTreeMap::new() };

        if let Some(prior) = prior {
            for row in prior {
                store.load_row(row)?;
            }
            log::info!("Loaded {} aggregate rows from prior export", prior.len());
        }

        let mut added = 0;
        for p1 in &patterns {
            let inner = store.rows.entry(p1.clone()).or_default();
            for p2 in &patterns {
                if p1 != p2 && !inner.contains_key(p2) {
                    inner.insert(p2.clone(), Counters::default());
                    added += 1;
                }
            }
        }
        if added > 0 {
            log::info!("Registered {added} zeroed pairs for pattern length {pattern_length}");
        }
        Ok(store)
    }

    fn load_row(&mut self, row: &AggregateRow) -> PenneyResult<()> {
        let p1: Pattern = row.p1.parse()?;
        let p2: Pattern = row.p2.parse()?;
        if p1 == p2 {
            return Err(PenneyError::invalid_pattern(
                row.p1.clone(),
                "self-pair in prior export",
            ));
        }
        let inner = self.rows.entry(p1).or_default();
        if inner.insert(p2, Counters::from_row(row)).is_some() {
            return Err(anyhow::anyhow!("duplicate row ({}, {}) in prior export", row.p1, row.p2).into());
        }
        Ok(())
    }

    pub fn pattern_length(&self) -> usize {
        self.pattern_length
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold one playthrough into the (p1, p2) row.
    pub fn update(&mut self, p1: &Pattern, p2: &Pattern, result: &PlaythroughResult) -> PenneyResult<()> {
        if p1 == p2 {
            return Err(PenneyError::invalid_pattern(p1.to_string(), "p1 and p2 must differ"));
        }
        let counters = self
            .rows
            .get_mut(p1)
            .and_then(|inner| inner.get_mut(p2))
            .ok_or_else(|| PenneyError::StoreKeyMissing {
                p1: p1.to_string(),
                p2: p2.to_string(),
            })?;
        counters.add_result(result);
        Ok(())
    }

    /// Field-wise sum of `other` into this store. Pairs unknown here are added.
    pub fn merge(&mut self, other: &AggregateStore) {
        for (p1, inner) in &other.rows {
            let mine = self.rows.entry(p1.clone()).or_default();
            for (p2, counters) in inner {
                mine.entry(p2.clone()).or_default().add(counters);
            }
        }
    }

    /// Same pairs, all counters zero.
    pub fn empty_like(&self) -> Self {
        let mut fresh = self.clone();
        fresh.reset();
        fresh
    }

    pub fn reset(&mut self) {
        for inner in self.rows.values_mut() {
            for counters in inner.values_mut() {
                *counters = Counters::default();
            }
        }
    }

    pub fn row(&self, p1: &Pattern, p2: &Pattern) -> Option<AggregateRow> {
        self.rows.get(p1)?.get(p2).map(|c| c.to_row(p1, p2))
    }

    /// Largest games_count over all rows.
    pub fn sample_size(&self) -> u64 {
        self.rows
            .values()
            .flat_map(BTreeMap::values)
            .map(|c| c.games_count)
            .max()
            .unwrap_or(0)
    }

    /// Every row, sorted by (p1, p2).
    pub fn export(&self) -> Vec<AggregateRow> {
        self.rows
            .iter()
            .flat_map(|(p1, inner)| inner.iter().map(move |(p2, c)| c.to_row(p1, p2)))
            .collect()
    }
}
