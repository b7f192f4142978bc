//! Session lookup and input path resolution.
//!
//! ```text
//! benchmark-reports/
//!   sample/
//!     sample_summary.csv
//!     hardware_info.txt
//!   2025-03-14_09:26:53/
//!     summary.csv
//!     hardware_info.txt
//! ```

use regex::Regex;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ReportError, Result};

/// Identifier that selects the bundled sample dataset.
pub const SAMPLE_SESSION: &str = "sample";
pub const SAMPLE_SUMMARY_FILE: &str = "sample_summary.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const HARDWARE_INFO_FILE: &str = "hardware_info.txt";

static SESSION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{2}:\d{2}:\d{2}$").expect("session pattern is valid")
});

/// `YYYY-MM-DD_HH:MM:SS`, the directory name the runner gives each session.
pub fn is_session_name(name: &str) -> bool {
    SESSION_NAME.is_match(name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionId {
    Sample,
    Named(String),
}

impl SessionId {
    pub fn as_str(&self) -> &str {
        match self {
            SessionId::Sample => SAMPLE_SESSION,
            SessionId::Named(id) => id,
        }
    }

    /// A named session must be exactly one path component below the
    /// reports directory.
    pub fn validate(&self) -> Result<()> {
        let id = self.as_str();
        let single_component = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !Path::new(id).is_absolute();
        if single_component {
            Ok(())
        } else {
            Err(ReportError::InvalidSession(id.to_string()))
        }
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == SAMPLE_SESSION {
            SessionId::Sample
        } else {
            SessionId::Named(s.to_string())
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate session directory under the reports directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEntry {
    pub name: String,
    pub has_summary: bool,
}

/// Timestamped session directories, newest first.
///
/// A reports directory that does not exist has no sessions.
pub fn list_sessions(reports_dir: &Path) -> io::Result<Vec<SessionEntry>> {
    if !reports_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in WalkDir::new(reports_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if is_session_name(name) {
            sessions.push(SessionEntry {
                name: name.to_string(),
                has_summary: entry.path().join(SUMMARY_FILE).is_file(),
            });
        }
    }

    // Timestamp names sort lexically in chronological order.
    sessions.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(sessions)
}

pub fn latest_session(reports_dir: &Path) -> io::Result<Option<String>> {
    Ok(list_sessions(reports_dir)?.into_iter().next().map(|s| s.name))
}

/// Explicit paths that bypass session-based resolution.
#[derive(Clone, Debug, Default)]
pub struct PathOverrides {
    pub summary_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub hardware_info: PathBuf,
    pub output_dir: PathBuf,
}

impl ReportPaths {
    /// Paths for `session` without touching the filesystem.
    pub fn for_session(reports_dir: &Path, session: &SessionId, overrides: &PathOverrides) -> Self {
        let session_dir = reports_dir.join(session.as_str());
        let default_summary = match session {
            SessionId::Sample => session_dir.join(SAMPLE_SUMMARY_FILE),
            SessionId::Named(_) => session_dir.join(SUMMARY_FILE),
        };

        let summary = overrides.summary_path.clone().unwrap_or(default_summary);
        let hardware_info = summary
            .parent()
            .map_or_else(|| PathBuf::from(HARDWARE_INFO_FILE), |p| p.join(HARDWARE_INFO_FILE));
        let output_dir = overrides.output_dir.clone().unwrap_or(session_dir);

        Self {
            summary,
            hardware_info,
            output_dir,
        }
    }
}

/// Resolve and validate the inputs for one report.
///
/// The session id is checked before any path is built. The output directory
/// is created next. If the summary file is then
/// missing, a named session's error carries the sessions that do exist.
pub fn resolve(
    reports_dir: &Path,
    session: &SessionId,
    overrides: &PathOverrides,
) -> Result<ReportPaths> {
    session.validate()?;
    let paths = ReportPaths::for_session(reports_dir, session, overrides);
    fs::create_dir_all(&paths.output_dir)?;
    debug!(
        summary = %paths.summary.display(),
        output_dir = %paths.output_dir.display(),
        "resolved report paths"
    );

    if paths.summary.is_file() {
        return Ok(paths);
    }

    let candidates = match session {
        SessionId::Sample => None,
        SessionId::Named(_) => Some(list_sessions(reports_dir).unwrap_or_else(|e| {
            warn!("could not list sessions in {}: {e}", reports_dir.display());
            Vec::new()
        })),
    };

    Err(ReportError::MissingSummaryFile {
        path: paths.summary,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_session(root: &Path, name: &str, with_summary: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if with_summary {
            fs::write(dir.join(SUMMARY_FILE), "header\n").unwrap();
        }
    }

    #[test]
    fn test_session_name_pattern() {
        assert!(is_session_name("2025-03-14_09:26:53"));
        assert!(!is_session_name("2025-03-14"));
        assert!(!is_session_name("sample"));
        assert!(!is_session_name("2025-03-14_09:26:53-old"));
    }

    #[test]
    fn test_session_id_from_str() {
        assert_eq!(SessionId::from("sample"), SessionId::Sample);
        assert_eq!(SessionId::from(""), SessionId::Sample);
        assert_eq!(
            SessionId::from("2025-03-14_09:26:53"),
            SessionId::Named("2025-03-14_09:26:53".into())
        );
    }

    #[test]
    fn test_sample_paths() {
        let paths = ReportPaths::for_session(
            Path::new("reports"),
            &SessionId::Sample,
            &PathOverrides::default(),
        );
        assert_eq!(paths.summary, PathBuf::from("reports/sample/sample_summary.csv"));
        assert_eq!(paths.hardware_info, PathBuf::from("reports/sample/hardware_info.txt"));
        assert_eq!(paths.output_dir, PathBuf::from("reports/sample"));
    }

    #[test]
    fn test_named_paths_and_overrides() {
        let session = SessionId::from("2025-03-14_09:26:53");
        let paths = ReportPaths::for_session(Path::new("reports"), &session, &PathOverrides::default());
        assert_eq!(paths.summary, PathBuf::from("reports/2025-03-14_09:26:53/summary.csv"));

        let overrides = PathOverrides {
            summary_path: Some(PathBuf::from("/data/run/summary.csv")),
            output_dir: Some(PathBuf::from("/tmp/out")),
        };
        let paths = ReportPaths::for_session(Path::new("reports"), &session, &overrides);
        assert_eq!(paths.summary, PathBuf::from("/data/run/summary.csv"));
        assert_eq!(paths.hardware_info, PathBuf::from("/data/run/hardware_info.txt"));
        assert_eq!(paths.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_list_sessions_newest_first() {
        let dir = tempdir().unwrap();
        make_session(dir.path(), "2024-01-01_10:00:00", true);
        make_session(dir.path(), "2025-06-30_23:59:59", false);
        make_session(dir.path(), "sample", true);
        make_session(dir.path(), "notes", false);
        fs::write(dir.path().join("2023-01-01_00:00:00"), "a file").unwrap();

        let sessions = list_sessions(dir.path()).unwrap();
        assert_eq!(
            sessions,
            vec![
                SessionEntry {
                    name: "2025-06-30_23:59:59".into(),
                    has_summary: false
                },
                SessionEntry {
                    name: "2024-01-01_10:00:00".into(),
                    has_summary: true
                },
            ]
        );
        assert_eq!(
            latest_session(dir.path()).unwrap().as_deref(),
            Some("2025-06-30_23:59:59")
        );
    }

    #[test]
    fn test_missing_reports_dir_has_no_sessions() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_sessions(&missing).unwrap().is_empty());
        assert_eq!(latest_session(&missing).unwrap(), None);
    }

    #[test]
    fn test_resolve_existing_session() {
        let dir = tempdir().unwrap();
        make_session(dir.path(), "2024-01-01_10:00:00", true);
        let paths = resolve(
            dir.path(),
            &SessionId::from("2024-01-01_10:00:00"),
            &PathOverrides::default(),
        )
        .unwrap();
        assert!(paths.summary.is_file());
    }

    #[test]
    fn test_resolve_missing_named_session_lists_candidates() {
        let dir = tempdir().unwrap();
        make_session(dir.path(), "2024-01-01_10:00:00", true);

        let err = resolve(
            dir.path(),
            &SessionId::from("2099-01-01_00:00:00"),
            &PathOverrides::default(),
        )
        .unwrap_err();

        // The session directory is created, the summary is not.
        let created = dir.path().join("2099-01-01_00:00:00");
        assert!(created.is_dir());
        assert!(!created.join(SUMMARY_FILE).exists());

        match err {
            ReportError::MissingSummaryFile { path, candidates } => {
                assert_eq!(path, created.join(SUMMARY_FILE));
                let names: Vec<String> = candidates.unwrap().into_iter().map(|c| c.name).collect();
                assert!(names.contains(&"2024-01-01_10:00:00".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_missing_sample_has_no_candidates() {
        let dir = tempdir().unwrap();
        let err = resolve(dir.path(), &SessionId::Sample, &PathOverrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingSummaryFile {
                candidates: None,
                ..
            }
        ));
        assert!(dir.path().join(SAMPLE_SESSION).is_dir());
    }

    #[test]
    fn test_session_id_validation() {
        assert!(SessionId::Sample.validate().is_ok());
        assert!(SessionId::from("2025-03-14_09:26:53").validate().is_ok());
        for bad in ["../../x", "..", ".", "a/b", "a\\b", "/tmp/x"] {
            assert!(
                matches!(
                    SessionId::Named(bad.into()).validate(),
                    Err(ReportError::InvalidSession(_))
                ),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_escaping_session_without_creating_dirs() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("a").join("reports");
        fs::create_dir_all(&reports).unwrap();

        let err = resolve(
            &reports,
            &SessionId::Named("../../x".into()),
            &PathOverrides::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReportError::InvalidSession(ref id) if id == "../../x"));
        assert_eq!(err.exit_status(), 2);
        assert!(!dir.path().join("x").exists());
    }
}
