use clap::ValueEnum;

pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod hardware;
pub mod leaderboard;
pub mod render;
pub mod report;
pub mod schema;
pub mod session;

/// Which console report to generate.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ReportKind {
    /// Memory utilization, efficiency tiers and share of system RAM.
    Memory,
    /// Tokens/sec, CPU load and throughput score.
    Performance,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Memory => "memory",
            ReportKind::Performance => "performance",
        }
    }

    /// File name of the static analysis document written next to the report.
    pub fn analysis_file_name(&self) -> &'static str {
        match self {
            ReportKind::Memory => "memory_analysis.txt",
            ReportKind::Performance => "performance_analysis.txt",
        }
    }

    /// Flag passed to the chart visualizer suggested in the report footer.
    pub fn visualizer_flag(&self) -> &'static str {
        match self {
            ReportKind::Memory => "--memory",
            ReportKind::Performance => "--performance",
        }
    }
}
