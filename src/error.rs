//! Error types for report generation.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::session::SessionEntry;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    /// The resolved summary table does not exist.
    ///
    /// `candidates` is only populated when a named session was requested.
    #[error("summary file not found: {}", path.display())]
    MissingSummaryFile {
        path: PathBuf,
        candidates: Option<Vec<SessionEntry>>,
    },

    /// A session id that would resolve outside the reports directory.
    #[error("invalid session id {0:?}: must be a single directory name")]
    InvalidSession(String),

    #[error("failed to write analysis file {}: {source}", path.display())]
    AnalysisWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::MissingSummaryFile { .. } => 1,
            Self::InvalidSession(_) | Self::AnalysisWrite { .. } | Self::Io(_) | Self::Json(_) => 2,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_summary_message_names_path() {
        let err = ReportError::MissingSummaryFile {
            path: PathBuf::from("reports/2099-01-01_00:00:00/summary.csv"),
            candidates: Some(Vec::new()),
        };
        assert_eq!(
            err.to_string(),
            "summary file not found: reports/2099-01-01_00:00:00/summary.csv"
        );
    }

    #[test]
    fn test_exit_codes() {
        let missing = ReportError::MissingSummaryFile {
            path: PathBuf::from("x"),
            candidates: None,
        };
        assert_eq!(missing.exit_status(), 1);

        let io = ReportError::from(std::io::Error::other("disk full"));
        assert_eq!(io.exit_status(), 2);

        let invalid = ReportError::InvalidSession("../x".into());
        assert_eq!(invalid.exit_status(), 2);
    }
}
