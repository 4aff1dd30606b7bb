//! Win% / draw% matrices derived from an exported aggregate table.
//!
//! Layout: row = opponent's pattern (p2), column = own pattern (p1).
//! The diagonal is never populated.

use crate::{
    aggregate::AggregateRow,
    error::{PenneyError, PenneyResult},
    pattern::Pattern,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Tricks,
    Cards,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tricks => "tricks",
            Self::Cards  => "cards",
        }
    }

    /// (p1, p2, draw) counts for this metric.
    fn counts(&self, row: &AggregateRow) -> (u64, u64, u64) {
        match self {
            Self::Tricks => (row.p1_tricks, row.p2_tricks, row.draw_tricks),
            Self::Cards  => (row.p1_cards, row.p2_cards, row.draw_cards),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = PenneyError;

    fn from_str(s: &str) -> PenneyResult<Self> {
        match s {
            "tricks" => Ok(Self::Tricks),
            "cards" => Ok(Self::Cards),
            other => Err(anyhow::anyhow!("metric must be \"tricks\" or \"cards\", got \"{other}\"").into()),
        }
    }
}

/// Integer percentages in [0, 100], square over `patterns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinDrawMatrix {
    pub metric:      Metric,
    /// Axis order, as '0'/'1' strings.
    pub patterns:    Vec<String>,
    pub win:         Vec<Vec<u8>>,
    pub draw:        Vec<Vec<u8>>,
    pub sample_size: u64,
}

fn percent(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round_ties_even() as u8
}

/// Reduce `rows` into a win/draw matrix over `order`. Rows naming a
/// pattern outside `order` are skipped.
pub fn build(rows: &[AggregateRow], order: &[Pattern], metric: Metric) -> WinDrawMatrix {
    let n = order.len();
    let names: Vec<String> = order.iter().map(|p| p.to_string()).collect();
    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, p)| (p.as_str(), i)).collect();

    let mut win = vec![vec![0u8; n]; n];
    let mut draw = vec![vec![0u8; n]; n];
    let mut sample_size = 0;

    for row in rows {
        let (Some(&col), Some(&r)) = (index.get(row.p1.as_str()), index.get(row.p2.as_str())) else {
            log::warn!("Skipping row ({}, {}): pattern not on matrix axis", row.p1, row.p2);
            continue;
        };
        if r == col {
            continue;
        }
        let (a, b, d) = metric.counts(row);
        let total = a + b + d;
        win[r][col] = percent(a, total);
        draw[r][col] = percent(d, total);
        sample_size = sample_size.max(row.games_count);
    }

    WinDrawMatrix { metric, patterns: names, win, draw, sample_size }
}

impl WinDrawMatrix {
    /// For each opponent row, the column with the highest win%.
    /// Ties go to the lowest column index.
    pub fn best_choice_per_row(&self) -> Vec<usize> {
        self.win
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, 0u8), |best, (j, &v)| if v > best.1 { (j, v) } else { best })
                    .0
            })
            .collect()
    }

    /// Axis labels in card notation ("BBB", "BBR", ...).
    pub fn card_labels(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|p| p.chars().map(|c| if c == '1' { 'R' } else { 'B' }).collect())
            .collect()
    }

    /// Plain-text "win(draw)" grid, opponent choice down, own choice across.
    pub fn render_text(&self) -> String {
        let labels = self.card_labels();
        let width = labels.iter().map(String::len).max().unwrap_or(0).max(8);
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Win% (Draw%) by {} - sample size {}",
            self.metric.name(),
            self.sample_size
        );
        let _ = write!(out, "{:>width$}", "opp\\me");
        for label in &labels {
            let _ = write!(out, " {label:>width$}");
        }
        out.push('\n');

        for (i, label) in labels.iter().enumerate() {
            let _ = write!(out, "{label:>width$}");
            for j in 0..labels.len() {
                let cell = if i == j {
                    "-".to_string()
                } else {
                    format!("{}({})", self.win[i][j], self.draw[i][j])
                };
                let _ = write!(out, " {cell:>width$}");
            }
            out.push('\n');
        }
        out
    }
}

/// Both metrics over the same axis, as handed to a rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixBundle {
    pub tricks: WinDrawMatrix,
    pub cards:  WinDrawMatrix,
}

impl MatrixBundle {
    pub fn build(rows: &[AggregateRow], order: &[Pattern]) -> Self {
        Self {
            tricks: build(rows, order, Metric::Tricks),
            cards:  build(rows, order, Metric::Cards),
        }
    }
}
