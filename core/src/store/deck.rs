//! Store methods for generated decks.

use crate::{deck::Deck, error::PenneyResult};
use rusqlite::{params, Connection};

use super::DeckStore;

/// A deck as persisted, with its row id and generation seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDeck {
    pub id:         i64,
    pub batch_seed: u64,
    pub deck:       Deck,
}

impl DeckStore {
    /// Persist one generated batch in a single transaction.
    pub fn insert_deck_batch(&self, batch_seed: u64, decks: &[Deck]) -> PenneyResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO deck (sequence, batch_seed, scored) VALUES (?1, ?2, 0)",
            )?;
            for deck in decks {
                stmt.execute(params![deck.to_cards(), batch_seed as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn deck_count(&self) -> PenneyResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM deck", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn unscored_count(&self) -> PenneyResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM deck WHERE scored = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Every deck not yet folded into the aggregate, in insertion order.
    pub fn unscored_decks(&self) -> PenneyResult<Vec<StoredDeck>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sequence, batch_seed FROM deck
             WHERE scored = 0 ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)? as u64,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(id, sequence, batch_seed)| {
                Ok(StoredDeck { id, batch_seed, deck: Deck::from_cards(&sequence)? })
            })
            .collect()
    }

    pub fn mark_scored(&self, ids: &[i64]) -> PenneyResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        flag_scored(&tx, ids)?;
        tx.commit()?;
        Ok(())
    }
}

pub(super) fn flag_scored(conn: &Connection, ids: &[i64]) -> PenneyResult<()> {
    let mut stmt = conn.prepare("UPDATE deck SET scored = 1 WHERE id = ?1")?;
    for id in ids {
        stmt.execute(params![id])?;
    }
    Ok(())
}
