//! Persistence boundary traits.
//!
//! RULE: the scoring core never knows where the aggregate table lives.
//! It loads through AggregateSource and persists through AggregateSink;
//! the SQLite store and the CSV table file both implement them.

use crate::{aggregate::AggregateRow, error::PenneyResult};

/// Where a previously persisted aggregate table is read from.
pub trait AggregateSource {
    /// Stable name for logs.
    fn source_name(&self) -> &'static str;

    /// The persisted table, or an empty vec when nothing was persisted yet.
    fn load_aggregate(&self) -> PenneyResult<Vec<AggregateRow>>;
}

/// Where the aggregate table is written at pass boundaries.
pub trait AggregateSink {
    fn sink_name(&self) -> &'static str;

    /// Replace the persisted table with `rows`, keyed by (p1, p2).
    fn persist_aggregate(&mut self, rows: &[AggregateRow]) -> PenneyResult<()>;
}
