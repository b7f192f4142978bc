//! `hardware_info.txt` written by the benchmark runner.
//!
//! The file is free text. Only three kinds of lines are consumed: the one
//! containing `Total System Memory` (reduced to its digits) and any line
//! mentioning `CPU` or `GPU` (kept verbatim for the report footer).

use std::fs;
use std::io;
use std::path::Path;

pub const TOTAL_MEMORY_KEY: &str = "Total System Memory";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareInfo {
    /// Digits of the total-memory line, in MB as written by the runner.
    pub total_memory_mb: Option<u64>,
    pub memory_line: Option<String>,
    pub cpu_lines: Vec<String>,
    pub gpu_lines: Vec<String>,
}

/// Keep only ASCII digits. `"Total System Memory: 32,768 MB"` becomes `32768`.
fn extract_digits(line: &str) -> Option<u64> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl HardwareInfo {
    pub fn parse(text: &str) -> Self {
        let mut info = HardwareInfo::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if info.memory_line.is_none() && line.contains(TOTAL_MEMORY_KEY) {
                info.total_memory_mb = extract_digits(line);
                info.memory_line = Some(line.to_string());
            }
            if line.contains("CPU") {
                info.cpu_lines.push(line.to_string());
            }
            if line.contains("GPU") {
                info.gpu_lines.push(line.to_string());
            }
        }

        info
    }

    /// Load the file if present. A missing file is not an error, and bytes
    /// that are not UTF-8 are replaced rather than rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Option<Self>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(Self::parse(&String::from_utf8_lossy(&bytes)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Total memory usable as a percentage denominator; zero counts as unknown.
    pub fn total_memory(&self) -> Option<f64> {
        self.total_memory_mb.filter(|&mb| mb > 0).map(|mb| mb as f64)
    }
}
