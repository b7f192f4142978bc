//! Static analysis documents written beside each report.
//!
//! The text never depends on the benchmark data.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ReportKind;

pub const MEMORY_ANALYSIS: &str = include_str!("../templates/memory_analysis.txt");
pub const PERFORMANCE_ANALYSIS: &str = include_str!("../templates/performance_analysis.txt");

pub fn template(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Memory => MEMORY_ANALYSIS,
        ReportKind::Performance => PERFORMANCE_ANALYSIS,
    }
}

pub fn analysis_path(output_dir: &Path, kind: ReportKind) -> PathBuf {
    output_dir.join(kind.analysis_file_name())
}

/// Write the template for `kind` into `output_dir`, replacing any old copy.
pub fn write_analysis(output_dir: &Path, kind: ReportKind) -> io::Result<PathBuf> {
    let path = analysis_path(output_dir, kind);
    fs::write(&path, template(kind))?;
    Ok(path)
}
