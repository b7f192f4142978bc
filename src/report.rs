//! One report run: resolve inputs, classify, rank, render, write analysis.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::analysis;
use crate::classify::{classify_all, ClassifiedRow};
use crate::config::{RenderOptions, ReportConfig};
use crate::error::{ReportError, Result};
use crate::hardware::HardwareInfo;
use crate::leaderboard::Leaderboard;
use crate::render::{self, ReportView};
use crate::schema::{HardwareSummary, ReportDocument, RunMeta, SummaryTable};
use crate::session::{self, PathOverrides, ReportPaths, SessionId};
use crate::ReportKind;

pub const SCHEMA_VERSION: u32 = 1;

/// Inputs loaded and classified, ready to render.
#[derive(Clone, Debug)]
pub struct PreparedReport {
    pub kind: ReportKind,
    pub session: SessionId,
    pub paths: ReportPaths,
    pub rows: Vec<ClassifiedRow>,
    pub leaderboard: Leaderboard,
    pub hardware: Option<HardwareInfo>,
}

impl PreparedReport {
    /// Fails with `MissingSummaryFile` before anything is rendered or written.
    pub fn prepare(
        config: &ReportConfig,
        kind: ReportKind,
        session: SessionId,
        overrides: &PathOverrides,
    ) -> Result<Self> {
        let paths = session::resolve(&config.reports_dir, &session, overrides)?;

        let table = SummaryTable::load(&paths.summary)?;
        if table.is_empty() {
            warn!("{} has no data rows", paths.summary.display());
        }

        let hardware = HardwareInfo::load(&paths.hardware_info)?;
        match &hardware {
            None => debug!(
                "no hardware info at {}; skipping memory share",
                paths.hardware_info.display()
            ),
            Some(hw) if hw.total_memory().is_none() => {
                warn!("hardware info has no usable total memory; skipping memory share")
            }
            Some(_) => {}
        }

        let total_memory = hardware.as_ref().and_then(HardwareInfo::total_memory);
        let rows = classify_all(&table.rows, total_memory);
        let leaderboard = Leaderboard::from_rows(&table.rows);
        debug!(rows = rows.len(), kind = kind.as_str(), "classified summary rows");

        Ok(Self {
            kind,
            session,
            paths,
            rows,
            leaderboard,
            hardware,
        })
    }

    pub fn view(&self) -> ReportView<'_> {
        ReportView {
            kind: self.kind,
            session: &self.session,
            rows: &self.rows,
            leaderboard: &self.leaderboard,
            hardware: self.hardware.as_ref(),
        }
    }

    pub fn render(&self, opts: RenderOptions) -> String {
        render::render(&self.view(), opts)
    }

    pub fn write_analysis(&self) -> Result<PathBuf> {
        let path = analysis::analysis_path(&self.paths.output_dir, self.kind);
        analysis::write_analysis(&self.paths.output_dir, self.kind)
            .map_err(|source| ReportError::AnalysisWrite {
                path: path.clone(),
                source,
            })?;
        info!("analysis written to {}", path.display());
        Ok(path)
    }

    pub fn document(&self, timestamp_utc: String) -> ReportDocument {
        ReportDocument {
            run: RunMeta {
                schema_version: SCHEMA_VERSION,
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                report: self.kind.as_str().to_string(),
                session: self.session.to_string(),
                summary_path: self.paths.summary.to_string_lossy().to_string(),
                timestamp_utc,
            },
            rows: self.rows.clone(),
            leaderboard: self.leaderboard.clone(),
            hardware: self.hardware.as_ref().map(HardwareSummary::from),
        }
    }
}
