use serde::Serialize;
use std::cmp::Ordering;

use crate::schema::{BenchmarkRow, Metric};

/// Column a leaderboard is ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankColumn {
    TokensPerSec,
    ThroughputScore,
    TokensPerMb,
}

impl RankColumn {
    pub fn metric(&self, row: &BenchmarkRow) -> Metric {
        match self {
            RankColumn::TokensPerSec => row.tokens_per_sec,
            RankColumn::ThroughputScore => row.throughput_score,
            RankColumn::TokensPerMb => row.tokens_per_mb,
        }
    }
}

/// Numeric-descending order with `N/A` below every number.
fn compare(a: Metric, b: Metric) -> Ordering {
    match (a.value(), b.value()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Row with the largest value in `column`.
///
/// Ties keep the earliest row. Returns `None` for an empty slice, and also
/// when no row has a numeric value in the column.
pub fn top_by(rows: &[BenchmarkRow], column: RankColumn) -> Option<&BenchmarkRow> {
    let mut best: Option<&BenchmarkRow> = None;
    for row in rows {
        let replace = match best {
            None => true,
            Some(current) => {
                compare(column.metric(row), column.metric(current)) == Ordering::Greater
            }
        };
        if replace {
            best = Some(row);
        }
    }
    best.filter(|row| column.metric(row).is_available())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderEntry {
    pub model_name: String,
    pub value: f64,
}

impl LeaderEntry {
    fn pick(rows: &[BenchmarkRow], column: RankColumn) -> Option<Self> {
        let row = top_by(rows, column)?;
        Some(LeaderEntry {
            model_name: row.model_name.clone(),
            value: column.metric(row).value()?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    /// Highest tokens/sec.
    pub fastest: Option<LeaderEntry>,
    /// Highest throughput score.
    pub most_efficient: Option<LeaderEntry>,
    /// Highest tokens/MB.
    pub most_memory_efficient: Option<LeaderEntry>,
}

impl Leaderboard {
    pub fn from_rows(rows: &[BenchmarkRow]) -> Self {
        Self {
            fastest: LeaderEntry::pick(rows, RankColumn::TokensPerSec),
            most_efficient: LeaderEntry::pick(rows, RankColumn::ThroughputScore),
            most_memory_efficient: LeaderEntry::pick(rows, RankColumn::TokensPerMb),
        }
    }
}
