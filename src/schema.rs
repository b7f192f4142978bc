//! Summary table rows and the JSON report document.
//!
//! # Summary layout
//!
//! ```text
//! Model,Avg Memory (MB),Peak CPU (%),Avg CPU (%),Avg Tokens/sec,Avg Tokens/MB,Avg Throughput Score,Avg Time (s)
//! llama3-8b-q4,5120.4,98.1,71.3,42.7,0.61,0.60,14.2
//! ```
//!
//! Columns are positional; the header text is never inspected. `N/A` marks a
//! metric the runner could not measure.

use csv::ByteRecord;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::classify::ClassifiedRow;
use crate::hardware::HardwareInfo;
use crate::leaderboard::Leaderboard;

/// Literal the benchmark runner writes for a metric it could not measure.
pub const UNAVAILABLE: &str = "N/A";

/// Number of positional columns in a summary row.
pub const SUMMARY_COLUMNS: usize = 8;

/// A numeric metric cell, or the unavailable marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    Value(f64),
    #[default]
    Unavailable,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a number: {0:?}")]
pub struct InvalidMetric(pub String);

impl FromStr for Metric {
    type Err = InvalidMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == UNAVAILABLE {
            return Ok(Metric::Unavailable);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Metric::Value(v)),
            _ => Err(InvalidMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => fmt::Display::fmt(v, f),
            Metric::Unavailable => f.pad(UNAVAILABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::Unavailable => serializer.serialize_none(),
        }
    }
}

/// One model's averaged results from `summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub model_name: String,
    pub memory_mb: Metric,
    pub cpu_peak_pct: Metric,
    pub cpu_avg_pct: Metric,
    pub tokens_per_sec: Metric,
    pub tokens_per_mb: Metric,
    /// Tokens/sec divided by average CPU %.
    pub throughput_score: Metric,
    pub elapsed_time: Metric,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected {expected} columns, found {0}", expected = SUMMARY_COLUMNS)]
    ColumnCount(usize),
    #[error("empty model name")]
    EmptyModelName,
    #[error("column {column} is not valid UTF-8")]
    InvalidUtf8 { column: usize },
    #[error("malformed CSV: {0}")]
    Csv(String),
}

/// Summary reader shared by whole-file and single-line parsing.
///
/// Records may have any length so that a short row is reported and skipped
/// instead of failing the rest of the file.
fn summary_reader<R: io::Read>(rdr: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

impl BenchmarkRow {
    /// Build a row from one positional record. Numeric cells that are neither
    /// numbers nor `N/A` are logged and kept as unavailable.
    pub fn from_record(record: &ByteRecord) -> Result<Self, RowError> {
        if record.len() != SUMMARY_COLUMNS {
            return Err(RowError::ColumnCount(record.len()));
        }

        let mut fields = Vec::with_capacity(SUMMARY_COLUMNS);
        for (column, raw) in record.iter().enumerate() {
            let field = std::str::from_utf8(raw).map_err(|_| RowError::InvalidUtf8 { column })?;
            fields.push(field);
        }

        let model_name = fields[0];
        if model_name.is_empty() {
            return Err(RowError::EmptyModelName);
        }

        let metric = |idx: usize| -> Metric {
            fields[idx].parse().unwrap_or_else(|e: InvalidMetric| {
                warn!(model = model_name, column = idx, "{e}; treating as {UNAVAILABLE}");
                Metric::Unavailable
            })
        };

        Ok(BenchmarkRow {
            model_name: model_name.to_string(),
            memory_mb: metric(1),
            cpu_peak_pct: metric(2),
            cpu_avg_pct: metric(3),
            tokens_per_sec: metric(4),
            tokens_per_mb: metric(5),
            throughput_score: metric(6),
            elapsed_time: metric(7),
        })
    }
}

impl FromStr for BenchmarkRow {
    type Err = RowError;

    /// Parse one data line with no header.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut reader = summary_reader(line.as_bytes(), false);
        let mut record = ByteRecord::new();
        match reader.read_byte_record(&mut record) {
            Ok(true) => Self::from_record(&record),
            Ok(false) => Err(RowError::ColumnCount(0)),
            Err(e) => Err(RowError::Csv(e.to_string())),
        }
    }
}

/// All data rows of one summary file, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<BenchmarkRow>,
}

impl SummaryTable {
    /// Read every data record. The first record is always the header.
    ///
    /// Rows that cannot be used (wrong column count, empty model name, bytes
    /// that are not UTF-8) are skipped with a warning; the rest are kept.
    pub fn from_reader<R: io::Read>(rdr: R) -> Self {
        let mut reader = summary_reader(rdr, true);
        let mut record = ByteRecord::new();
        let mut rows = Vec::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("stopped reading summary: {e}");
                    break;
                }
            }
            let line = record.position().map_or(0, |p| p.line());
            match BenchmarkRow::from_record(&record) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(line, "skipping summary row: {e}"),
            }
        }
        Self { rows }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_reader(text.as_bytes())
    }

    /// Read the file as bytes; encoding problems only cost the affected rows.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::from_reader(bytes.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub report: String,
    pub session: String,
    pub summary_path: String,
    pub timestamp_utc: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HardwareSummary {
    pub total_memory_mb: Option<u64>,
    pub cpu: Vec<String>,
    pub gpu: Vec<String>,
}

impl From<&HardwareInfo> for HardwareSummary {
    fn from(hw: &HardwareInfo) -> Self {
        Self {
            total_memory_mb: hw.total_memory_mb,
            cpu: hw.cpu_lines.clone(),
            gpu: hw.gpu_lines.clone(),
        }
    }
}

/// Machine-readable counterpart of the console report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub run: RunMeta,
    pub rows: Vec<ClassifiedRow>,
    pub leaderboard: Leaderboard,
    pub hardware: Option<HardwareSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Model,Avg Memory (MB),Peak CPU (%),Avg CPU (%),Avg Tokens/sec,Avg Tokens/MB,Avg Throughput Score,Avg Time (s)
llama3-8b-q4,5120.4,98.1,71.3,42.7,0.61,0.60,14.2
modelA-70b-q4,1000,N/A,45.2,N/A,N/A,N/A,12.1
";

    #[test]
    fn test_metric_parse() {
        assert_eq!("12.5".parse::<Metric>(), Ok(Metric::Value(12.5)));
        assert_eq!(" 3 ".parse::<Metric>(), Ok(Metric::Value(3.0)));
        assert_eq!("N/A".parse::<Metric>(), Ok(Metric::Unavailable));
        assert_eq!("".parse::<Metric>(), Ok(Metric::Unavailable));
        assert!("fast".parse::<Metric>().is_err());
        assert!("NaN".parse::<Metric>().is_err());
        assert!("inf".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_display_pads_unavailable() {
        assert_eq!(format!("{:>6}", Metric::Unavailable), "   N/A");
        assert_eq!(format!("{:.1}", Metric::Value(45.26)), "45.3");
        assert_eq!(Metric::Value(10.5).to_string(), "10.5");
    }

    #[test]
    fn test_metric_serializes_unavailable_as_null() {
        let json = serde_json::to_string(&vec![Metric::Value(1.5), Metric::Unavailable]).unwrap();
        assert_eq!(json, "[1.5,null]");
    }

    #[test]
    fn test_parse_skips_header_and_keeps_order() {
        let table = SummaryTable::parse(SAMPLE);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].model_name, "llama3-8b-q4");
        assert_eq!(table.rows[0].tokens_per_sec, Metric::Value(42.7));
        assert_eq!(table.rows[1].model_name, "modelA-70b-q4");
    }

    #[test]
    fn test_parse_row_with_unavailable_cells() {
        let row: BenchmarkRow = "modelA-70b-q4,1000,N/A,45.2,N/A,N/A,N/A,12.1".parse().unwrap();
        assert_eq!(row.memory_mb, Metric::Value(1000.0));
        assert_eq!(row.cpu_peak_pct, Metric::Unavailable);
        assert_eq!(row.cpu_avg_pct, Metric::Value(45.2));
        assert_eq!(row.tokens_per_sec, Metric::Unavailable);
        assert_eq!(row.tokens_per_mb, Metric::Unavailable);
        assert_eq!(row.throughput_score, Metric::Unavailable);
        assert_eq!(row.elapsed_time, Metric::Value(12.1));
    }

    #[test]
    fn test_header_is_skipped_even_if_numeric() {
        let text = "a,1,2,3,4,5,6,7\nb,1,2,3,4,5,6,7\n";
        let table = SummaryTable::parse(text);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].model_name, "b");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "header\nshort,1,2\n\n,1,2,3,4,5,6,7\nok-7b,1,2,3,4,5,6,7\n";
        let table = SummaryTable::parse(text);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].model_name, "ok-7b");
    }

    #[test]
    fn test_row_errors() {
        assert_eq!("a,b".parse::<BenchmarkRow>(), Err(RowError::ColumnCount(2)));
        assert_eq!(
            " ,1,2,3,4,5,6,7".parse::<BenchmarkRow>(),
            Err(RowError::EmptyModelName)
        );
    }

    #[test]
    fn test_garbage_cell_becomes_unavailable() {
        let row: BenchmarkRow = "m,abc,2,3,4,5,6,7".parse().unwrap();
        assert_eq!(row.memory_mb, Metric::Unavailable);
        assert_eq!(row.cpu_peak_pct, Metric::Value(2.0));
    }

    #[test]
    fn test_column_count_message() {
        assert_eq!(
            RowError::ColumnCount(3).to_string(),
            "expected 8 columns, found 3"
        );
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let bytes = b"h\nm-7b,1,2,3,4,5,6,7\nq\xff-70b,1,1,1,1,1,1,1\nz-72b,1,2,3,4,5,6,7\n";
        let table = SummaryTable::from_reader(&bytes[..]);
        let names: Vec<&str> = table.rows.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(names, vec!["m-7b", "z-72b"]);
    }

    #[test]
    fn test_load_keeps_valid_rows_around_bad_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        fs::write(&path, b"h\nm-7b,1,2,3,4,5,6,7\nq\xff-70b,1,1,1,1,1,1,1\n").unwrap();
        let table = SummaryTable::load(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].model_name, "m-7b");
    }

    #[test]
    fn test_quoted_model_name() {
        let table = SummaryTable::parse("h\n\"mixtral-8x7b, instruct\",1,2,3,4,5,6,7\n");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].model_name, "mixtral-8x7b, instruct");
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = SummaryTable::parse("h\r\na-7b,1,2,3,4,5,6,7\r\nb-70b,N/A,2,3,4,5,6,7\r\n");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].memory_mb, Metric::Unavailable);
        assert_eq!(table.rows[1].elapsed_time, Metric::Value(7.0));
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        assert!(SummaryTable::parse("").is_empty());
        assert!(SummaryTable::parse("header only\n").is_empty());
    }
}
