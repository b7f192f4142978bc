use std::io::IsTerminal;
use std::path::PathBuf;

/// Directory holding `sample/` and one timestamped directory per session.
pub const DEFAULT_REPORTS_DIR: &str = "benchmark-reports";

/// Chart script suggested at the end of every report.
pub const VISUALIZER_SCRIPT: &str = "visualize_benchmarks.py";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colour only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(&self) -> bool {
        match self {
            ColorMode::Auto => std::io::stdout().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub reports_dir: PathBuf,
    pub color: ColorMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            color: ColorMode::Auto,
        }
    }
}

impl ReportConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            color: self.color.enabled(),
        }
    }
}

/// What the renderer needs to know about the output terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
}
