//! Threshold classification of summary rows.
//!
//! Every tier is a plain enum; the colour each one is shown in is attached
//! here but only applied by the renderer when styling is enabled.

use colored::Color;
use serde::Serialize;
use std::fmt;

use crate::schema::{BenchmarkRow, Metric};

/// Parameter-count bucket guessed from the model name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParamBucket {
    #[serde(rename = "70B")]
    B70,
    #[serde(rename = "72B")]
    B72,
    #[serde(rename = "8x7B")]
    B8x7,
    #[serde(rename = "7B")]
    B7,
    Unknown,
}

impl ParamBucket {
    /// Substring match in fixed precedence. `8x7b` has to be tested before
    /// `7b`, which it contains. Matching is case-sensitive.
    pub fn from_model_name(name: &str) -> Self {
        const PATTERNS: [(&str, ParamBucket); 4] = [
            ("70b", ParamBucket::B70),
            ("72b", ParamBucket::B72),
            ("8x7b", ParamBucket::B8x7),
            ("7b", ParamBucket::B7),
        ];

        PATTERNS
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map_or(ParamBucket::Unknown, |(_, bucket)| *bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParamBucket::B70 => "70B",
            ParamBucket::B72 => "72B",
            ParamBucket::B8x7 => "8x7B",
            ParamBucket::B7 => "7B",
            ParamBucket::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ParamBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Tokens generated per MB of resident memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EfficiencyTier {
    Excellent,
    Good,
    Average,
    Poor,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl EfficiencyTier {
    pub fn from_tokens_per_mb(tokens_per_mb: Metric) -> Self {
        match tokens_per_mb {
            Metric::Unavailable => EfficiencyTier::NotAvailable,
            Metric::Value(v) if v > 1.0 => EfficiencyTier::Excellent,
            Metric::Value(v) if v > 0.5 => EfficiencyTier::Good,
            Metric::Value(v) if v > 0.2 => EfficiencyTier::Average,
            Metric::Value(_) => EfficiencyTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EfficiencyTier::Excellent => "Excellent",
            EfficiencyTier::Good => "Good",
            EfficiencyTier::Average => "Average",
            EfficiencyTier::Poor => "Poor",
            EfficiencyTier::NotAvailable => "N/A",
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            EfficiencyTier::Excellent => Some(Color::Green),
            EfficiencyTier::Good => Some(Color::Cyan),
            EfficiencyTier::Average => Some(Color::Yellow),
            EfficiencyTier::Poor => Some(Color::Red),
            EfficiencyTier::NotAvailable => None,
        }
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Share of total system memory held by one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MemoryTier {
    Critical,
    High,
    Moderate,
    Nominal,
}

impl MemoryTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 75.0 {
            MemoryTier::Critical
        } else if percent > 50.0 {
            MemoryTier::High
        } else if percent > 25.0 {
            MemoryTier::Moderate
        } else {
            MemoryTier::Nominal
        }
    }

    pub fn color(&self) -> Color {
        match self {
            MemoryTier::Critical => Color::Red,
            MemoryTier::High => Color::Yellow,
            MemoryTier::Moderate => Color::Blue,
            MemoryTier::Nominal => Color::Green,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemoryShare {
    /// Rounded to one decimal place.
    pub percent: f64,
    pub tier: MemoryTier,
}

impl MemoryShare {
    /// `None` when the row's memory is unavailable or the total is unknown/zero.
    pub fn compute(memory_mb: Metric, total_memory_mb: Option<f64>) -> Option<Self> {
        let total = total_memory_mb.filter(|t| *t > 0.0 && t.is_finite())?;
        let used = memory_mb.value()?;
        let percent = (used / total * 1000.0).round() / 10.0;
        Some(MemoryShare {
            percent,
            tier: MemoryTier::from_percent(percent),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub param_bucket: ParamBucket,
    pub efficiency_tier: EfficiencyTier,
    pub memory_share: Option<MemoryShare>,
}

pub fn classify(row: &BenchmarkRow, total_memory_mb: Option<f64>) -> Classification {
    Classification {
        param_bucket: ParamBucket::from_model_name(&row.model_name),
        efficiency_tier: EfficiencyTier::from_tokens_per_mb(row.tokens_per_mb),
        memory_share: MemoryShare::compute(row.memory_mb, total_memory_mb),
    }
}

/// A row together with its derived labels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassifiedRow {
    #[serde(flatten)]
    pub row: BenchmarkRow,
    #[serde(flatten)]
    pub class: Classification,
}

pub fn classify_all(rows: &[BenchmarkRow], total_memory_mb: Option<f64>) -> Vec<ClassifiedRow> {
    rows.iter()
        .map(|row| ClassifiedRow {
            row: row.clone(),
            class: classify(row, total_memory_mb),
        })
        .collect()
}
