//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! Generation and scoring call store methods; they never execute SQL directly.

use crate::{error::PenneyResult, types::RunId};
use rusqlite::{params, Connection, OptionalExtension};

mod deck;
mod score;

pub use deck::StoredDeck;

pub struct DeckStore {
    conn: Connection,
}

/// One row of the run ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub run_id:          RunId,
    pub seed:            u64,
    pub version:         String,
    pub started_at:      String,
    pub finished_at:     Option<String>,
    pub decks_generated: u64,
    pub decks_scored:    u64,
}

impl DeckStore {
    pub fn open(path: &str) -> PenneyResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PenneyResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to re-run.
    pub fn migrate(&self) -> PenneyResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_decks.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_scores.sql"))?;
        Ok(())
    }

    // ── Run ledger ─────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> PenneyResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn finish_run(&self, run_id: &str, decks_generated: u64, decks_scored: u64) -> PenneyResult<()> {
        self.conn.execute(
            "UPDATE run SET finished_at = ?2, decks_generated = ?3, decks_scored = ?4
             WHERE run_id = ?1",
            params![
                run_id,
                chrono::Utc::now().to_rfc3339(),
                decks_generated as i64,
                decks_scored as i64,
            ],
        )?;
        Ok(())
    }

    pub fn run(&self, run_id: &str) -> PenneyResult<Option<RunRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT run_id, seed, version, started_at, finished_at,
                        decks_generated, decks_scored
                 FROM run WHERE run_id = ?1",
                params![run_id],
                |row| {
                    Ok(RunRecord {
                        run_id:          row.get(0)?,
                        seed:            row.get::<_, i64>(1)? as u64,
                        version:         row.get(2)?,
                        started_at:      row.get(3)?,
                        finished_at:     row.get(4)?,
                        decks_generated: row.get::<_, i64>(5)? as u64,
                        decks_scored:    row.get::<_, i64>(6)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// One past the largest master seed any run has used; 1 for a fresh store.
    /// Seeds are stored as i64 bit patterns, so the max is taken as u64.
    pub fn next_master_seed(&self) -> PenneyResult<u64> {
        let mut stmt = self.conn.prepare("SELECT seed FROM run")?;
        let last = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .map(|seed| seed.map(|s| s as u64))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max();
        Ok(last.map(|s| s.wrapping_add(1)).unwrap_or(1))
    }
}
