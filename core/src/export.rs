//! Flat-file forms of the aggregate table and the matrix bundle.
//!
//! The CSV carries exactly AggregateRow::COLUMNS. Every field is either a
//! '0'/'1' string or a non-negative integer, so no quoting is ever needed.

use crate::{
    aggregate::AggregateRow,
    error::{PenneyError, PenneyResult},
    matrix::MatrixBundle,
    sink::{AggregateSink, AggregateSource},
};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn ensure_parent(path: &Path) -> PenneyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn write_csv(path: &Path, rows: &[AggregateRow]) -> PenneyResult<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", AggregateRow::COLUMNS.join(","))?;
    for r in rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.p1, r.p2, r.p1_cards, r.p1_tricks, r.p2_cards, r.p2_tricks,
            r.draw_cards, r.draw_tricks, r.games_count
        )?;
    }
    out.flush()?;
    log::info!("Wrote {} aggregate rows to {}", rows.len(), path.display());
    Ok(())
}

fn parse_line(line: &str, line_no: usize) -> PenneyResult<AggregateRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != AggregateRow::COLUMNS.len() {
        return Err(anyhow::anyhow!(
            "line {line_no}: expected {} fields, found {}",
            AggregateRow::COLUMNS.len(),
            fields.len()
        )
        .into());
    }
    let num = |i: usize| -> PenneyResult<u64> {
        fields[i].parse().map_err(|e| {
            PenneyError::from(anyhow::anyhow!(
                "line {line_no}: column {} = '{}': {e}",
                AggregateRow::COLUMNS[i],
                fields[i]
            ))
        })
    };
    Ok(AggregateRow {
        p1:          fields[0].to_string(),
        p2:          fields[1].to_string(),
        p1_cards:    num(2)?,
        p1_tricks:   num(3)?,
        p2_cards:    num(4)?,
        p2_tricks:   num(5)?,
        draw_cards:  num(6)?,
        draw_tricks: num(7)?,
        games_count: num(8)?,
    })
}

pub fn read_csv(path: &Path) -> PenneyResult<Vec<AggregateRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    let expected = AggregateRow::COLUMNS.join(",");
    if header.trim() != expected {
        return Err(anyhow::anyhow!(
            "{}: unexpected header '{}', expected '{expected}'",
            path.display(),
            header.trim()
        )
        .into());
    }

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_line(&line, i + 2)?);
    }
    Ok(rows)
}

pub fn write_matrix_json(path: &Path, bundle: &MatrixBundle) -> PenneyResult<()> {
    ensure_parent(path)?;
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, bundle)?;
    log::info!("Wrote matrices to {}", path.display());
    Ok(())
}

/// The aggregate table as a CSV file on disk.
pub struct CsvTable {
    path: PathBuf,
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AggregateSource for CsvTable {
    fn source_name(&self) -> &'static str { "csv" }

    fn load_aggregate(&self) -> PenneyResult<Vec<AggregateRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_csv(&self.path)
    }
}

impl AggregateSink for CsvTable {
    fn sink_name(&self) -> &'static str { "csv" }

    fn persist_aggregate(&mut self, rows: &[AggregateRow]) -> PenneyResult<()> {
        write_csv(&self.path, rows)
    }
}
