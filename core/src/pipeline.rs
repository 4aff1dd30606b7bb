//! The pipeline: generate decks, score them, export the aggregate.
//!
//! STAGES (fixed order per run):
//!   1. Generate - seeded batches of decks into the `deck` table
//!   2. Score    - unscored decks folded into the aggregate, with a
//!                 checkpoint (scores + scored flags) after every chunk
//!   3. Export   - aggregate CSV plus the tricks/cards matrix bundle
//!
//! RULES:
//!   - Every batch draws from its own SeedBank stream. No global RNG.
//!   - The aggregate is loaded from the store, falling back to the CSV
//!     table when the store has no scores yet.
//!   - A deck is flagged scored in the same transaction that persists the
//!     aggregate containing it, so an interrupted pass resumes cleanly.

use crate::{
    aggregate::AggregateStore,
    batch::{BatchProcessor, BatchStats},
    config::PenneyConfig,
    deck::{Composition, Deck, DeckGenerator},
    error::PenneyResult,
    export::{write_matrix_json, CsvTable},
    matrix::MatrixBundle,
    pattern::all_patterns,
    rng::SeedBank,
    sink::{AggregateSink, AggregateSource},
    store::DeckStore,
    types::RunId,
};
use std::path::Path;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    pub decks_generated: u64,
    pub decks_scored:    u64,
    pub playthroughs:    u64,
}

pub struct Pipeline {
    pub run_id:  RunId,
    config:      PenneyConfig,
    composition: Composition,
    generator:   DeckGenerator,
    processor:   BatchProcessor,
    seed_bank:   SeedBank,
    next_batch:  u64,
    store:       DeckStore,
    aggregate:   Option<AggregateStore>,
    totals:      RunTotals,
}

impl Pipeline {
    pub fn new(run_id: RunId, seed: u64, config: PenneyConfig, store: DeckStore) -> PenneyResult<Self> {
        config.validate()?;
        let composition = config.composition()?;
        Ok(Self {
            generator: DeckGenerator::new(composition.clone())?,
            processor: BatchProcessor::new(config.pattern_length)?,
            seed_bank: SeedBank::new(seed),
            next_batch: 0,
            aggregate: None,
            totals: RunTotals::default(),
            composition,
            config,
            store,
            run_id,
        })
    }

    /// Migrate the store, pick a master seed (the next unused one when
    /// `seed` is None) and record the run in the ledger.
    pub fn start(run_id: RunId, seed: Option<u64>, config: PenneyConfig, store: DeckStore) -> PenneyResult<Self> {
        store.migrate()?;
        let seed = match seed {
            Some(s) => s,
            None => store.next_master_seed()?,
        };
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        log::info!("Run {run_id} started with master seed {seed}");
        Self::new(run_id, seed, config, store)
    }

    pub fn seed(&self) -> u64 {
        self.seed_bank.master_seed()
    }

    pub fn config(&self) -> &PenneyConfig {
        &self.config
    }

    pub fn store(&self) -> &DeckStore {
        &self.store
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Generate `n` decks in seeded batches and persist them.
    pub fn generate(&mut self, n: u64) -> PenneyResult<u64> {
        let batch_size = self.config.batch_size as u64;
        let mut remaining = n;
        let mut batches = 0u64;
        while remaining > 0 {
            let this_batch = remaining.min(batch_size);
            let batch_seed = self.seed_bank.batch_seed(self.next_batch);
            let mut rng = self.seed_bank.for_batch(self.next_batch);
            let decks = self.generator.generate_batch(this_batch as usize, &mut rng)?;
            self.store.insert_deck_batch(batch_seed, &decks)?;
            log::debug!("Batch {} ({this_batch} decks, seed {batch_seed}) stored", self.next_batch);

            self.next_batch += 1;
            batches += 1;
            remaining -= this_batch;
        }
        self.totals.decks_generated += n;
        log::info!("Generated {n} decks in {batches} batches");
        Ok(n)
    }

    /// Aggregate as persisted, loading it on first use.
    pub fn aggregate(&mut self) -> PenneyResult<&AggregateStore> {
        let aggregate = match self.aggregate.take() {
            Some(a) => a,
            None => self.load_aggregate()?,
        };
        Ok(self.aggregate.insert(aggregate))
    }

    fn load_aggregate(&self) -> PenneyResult<AggregateStore> {
        let mut prior = self.store.load_aggregate()?;
        let mut source = self.store.source_name();
        if prior.is_empty() {
            let csv = CsvTable::new(&self.config.results_csv);
            prior = csv.load_aggregate()?;
            source = csv.source_name();
        }
        if prior.is_empty() {
            log::info!("No prior aggregate found; starting from zero");
            AggregateStore::initialize(self.config.pattern_length, None)
        } else {
            log::info!("Resuming aggregate from {source} ({} rows)", prior.len());
            AggregateStore::initialize(self.config.pattern_length, Some(&prior))
        }
    }

    /// Score every unscored deck in the store.
    pub fn score(&mut self, parallel: bool) -> PenneyResult<BatchStats> {
        let mut aggregate = match self.aggregate.take() {
            Some(a) => a,
            None => self.load_aggregate()?,
        };

        let stored = self.store.unscored_decks()?;
        let decks: Vec<Deck> = stored.iter().map(|s| s.deck.clone()).collect();
        for d in &decks {
            d.check_composition(&self.composition)?;
        }
        log::info!("Scoring {} unscored decks", decks.len());

        let store = &self.store;
        let result = self.processor.process_chunked(
            &decks,
            &mut aggregate,
            self.config.checkpoint_interval,
            parallel,
            |agg, range| {
                let ids: Vec<i64> = stored[range].iter().map(|s| s.id).collect();
                store.commit_checkpoint(&agg.export(), &ids)
            },
        );
        // A failed chunk leaves uncommitted updates in memory; reload from
        // the last checkpoint on next use instead.
        let stats = match result {
            Ok(stats) => {
                self.aggregate = Some(aggregate);
                stats
            }
            Err(e) => {
                log::warn!("Scoring pass aborted; discarding uncommitted aggregate: {e}");
                self.aggregate = None;
                return Err(e);
            }
        };

        self.totals.decks_scored += stats.decks_processed as u64;
        self.totals.playthroughs += stats.playthroughs as u64;
        Ok(stats)
    }

    /// Write the aggregate CSV and the matrix bundle; return the bundle.
    pub fn export(&mut self) -> PenneyResult<MatrixBundle> {
        let rows = self.aggregate()?.export();
        let mut csv = CsvTable::new(&self.config.results_csv);
        csv.persist_aggregate(&rows)?;

        let order = all_patterns(self.config.pattern_length)?;
        let bundle = MatrixBundle::build(&rows, &order);
        write_matrix_json(Path::new(&self.config.matrix_json), &bundle)?;
        Ok(bundle)
    }

    /// Close the run ledger row.
    pub fn finish(&self) -> PenneyResult<()> {
        self.store
            .finish_run(&self.run_id, self.totals.decks_generated, self.totals.decks_scored)
    }
}
