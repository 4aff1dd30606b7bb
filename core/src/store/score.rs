//! Store methods for the aggregate `scores` table.

use crate::{
    aggregate::AggregateRow,
    error::PenneyResult,
    sink::{AggregateSink, AggregateSource},
};
use rusqlite::{params, Connection};

use super::DeckStore;

impl DeckStore {
    pub fn load_scores(&self) -> PenneyResult<Vec<AggregateRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p1, p2, p1_cards, p1_tricks, p2_cards, p2_tricks,
                    draw_cards, draw_tricks, games_count
             FROM scores ORDER BY p1, p2",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AggregateRow {
                    p1:          row.get(0)?,
                    p2:          row.get(1)?,
                    p1_cards:    row.get::<_, i64>(2)? as u64,
                    p1_tricks:   row.get::<_, i64>(3)? as u64,
                    p2_cards:    row.get::<_, i64>(4)? as u64,
                    p2_tricks:   row.get::<_, i64>(5)? as u64,
                    draw_cards:  row.get::<_, i64>(6)? as u64,
                    draw_tricks: row.get::<_, i64>(7)? as u64,
                    games_count: row.get::<_, i64>(8)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Replace the whole table with `rows` in one transaction.
    pub fn replace_scores(&self, rows: &[AggregateRow]) -> PenneyResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_scores(&tx, rows)?;
        tx.commit()?;
        log::debug!("Persisted {} score rows", rows.len());
        Ok(())
    }

    /// Persist the aggregate and flag the decks it now includes, atomically.
    /// A crash between checkpoints leaves both unchanged.
    pub fn commit_checkpoint(&self, rows: &[AggregateRow], scored_ids: &[i64]) -> PenneyResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_scores(&tx, rows)?;
        super::deck::flag_scored(&tx, scored_ids)?;
        tx.commit()?;
        log::debug!("Checkpoint committed: {} rows, {} decks flagged", rows.len(), scored_ids.len());
        Ok(())
    }
}

fn write_scores(conn: &Connection, rows: &[AggregateRow]) -> PenneyResult<()> {
    conn.execute("DELETE FROM scores", [])?;
    let mut stmt = conn.prepare(
        "INSERT INTO scores (p1, p2, p1_cards, p1_tricks, p2_cards, p2_tricks,
                             draw_cards, draw_tricks, games_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for r in rows {
        stmt.execute(params![
            r.p1,
            r.p2,
            r.p1_cards as i64,
            r.p1_tricks as i64,
            r.p2_cards as i64,
            r.p2_tricks as i64,
            r.draw_cards as i64,
            r.draw_tricks as i64,
            r.games_count as i64,
        ])?;
    }
    Ok(())
}

impl AggregateSource for DeckStore {
    fn source_name(&self) -> &'static str { "sqlite" }

    fn load_aggregate(&self) -> PenneyResult<Vec<AggregateRow>> {
        self.load_scores()
    }
}

impl AggregateSink for DeckStore {
    fn sink_name(&self) -> &'static str { "sqlite" }

    fn persist_aggregate(&mut self, rows: &[AggregateRow]) -> PenneyResult<()> {
        self.replace_scores(rows)
    }
}
