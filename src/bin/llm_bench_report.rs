use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use llm_bench_report::config::{ColorMode, ReportConfig, DEFAULT_REPORTS_DIR};
use llm_bench_report::error::{ReportError, Result};
use llm_bench_report::report::PreparedReport;
use llm_bench_report::session::{self, PathOverrides, SessionEntry, SessionId, SAMPLE_SESSION};
use llm_bench_report::ReportKind;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(v: ColorArg) -> Self {
        match v {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct ReportArgs {
    /// Session to report on (YYYY-MM-DD_HH:MM:SS), or "sample" for the bundled data.
    #[arg(value_name = "SESSION", default_value = SAMPLE_SESSION)]
    session: String,

    /// Use the most recent session instead of SESSION.
    #[arg(long, default_value_t = false)]
    latest: bool,

    /// Read this summary CSV instead of the session's.
    #[arg(long, value_name = "FILE")]
    summary_path: Option<PathBuf>,

    /// Write the analysis file here instead of the session directory.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Memory utilization: efficiency tiers and share of system memory.
    Memory(ReportArgs),

    /// Performance: tokens/sec, CPU load and throughput score.
    Performance(ReportArgs),

    /// List benchmark sessions found in the reports directory.
    Sessions,
}

#[derive(Parser, Debug)]
#[command(name = "llm-bench-report")]
#[command(about = "Console reports over LLM benchmark summary tables")]
struct Args {
    /// Directory holding sample/ and one directory per session.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_REPORTS_DIR, global = true)]
    reports_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ColorArg::Auto, global = true)]
    color: ColorArg,

    /// Also write the report as JSON to this file.
    #[arg(long, value_name = "FILE", global = true)]
    out: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, default_value_t = false, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, _) => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn now_utc() -> String {
    // Seconds since the epoch; enough to order reports without a date crate.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn print_sessions(sessions: &[SessionEntry]) {
    if sessions.is_empty() {
        println!("No benchmark sessions found.");
        return;
    }
    println!("Available benchmark sessions ({}):", sessions.len());
    for s in sessions {
        let mark = if s.has_summary {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {mark} {}", s.name);
    }
}

fn select_session(cfg: &ReportConfig, args: &ReportArgs) -> Result<SessionId> {
    if !args.latest {
        return Ok(SessionId::from(args.session.as_str()));
    }
    match session::latest_session(&cfg.reports_dir)? {
        Some(name) => {
            eprintln!("Using latest session: {name}");
            Ok(SessionId::Named(name))
        }
        None => {
            eprintln!("No sessions found. Using sample data.");
            Ok(SessionId::Sample)
        }
    }
}

fn run_report(
    cfg: &ReportConfig,
    kind: ReportKind,
    args: &ReportArgs,
    out: Option<&PathBuf>,
) -> Result<()> {
    let session = select_session(cfg, args)?;
    let overrides = PathOverrides {
        summary_path: args.summary_path.clone(),
        output_dir: args.output_dir.clone(),
    };

    let report = PreparedReport::prepare(cfg, kind, session, &overrides)?;
    print!("{}", report.render(cfg.render_options()));

    let path = report.write_analysis()?;
    println!("\nAnalysis saved to: {}", path.display());

    if let Some(out) = out {
        let json = serde_json::to_string_pretty(&report.document(now_utc()))?;
        fs::write(out, json)?;
    }
    Ok(())
}

fn report_error(err: &ReportError) {
    eprintln!("{} {err}", "Error:".red().bold());
    if let ReportError::MissingSummaryFile {
        candidates: Some(candidates),
        ..
    } = err
    {
        eprintln!();
        if candidates.is_empty() {
            eprintln!("No benchmark sessions found.");
        } else {
            eprintln!("Available sessions:");
            for c in candidates {
                eprintln!("  {}", c.name);
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let cfg = ReportConfig {
        reports_dir: args.reports_dir.clone(),
        color: args.color.into(),
    };
    colored::control::set_override(cfg.color.enabled());

    let result = match &args.cmd {
        Command::Memory(r) => run_report(&cfg, ReportKind::Memory, r, args.out.as_ref()),
        Command::Performance(r) => run_report(&cfg, ReportKind::Performance, r, args.out.as_ref()),
        Command::Sessions => session::list_sessions(&cfg.reports_dir)
            .map(|s| print_sessions(&s))
            .map_err(ReportError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            e.exit_code()
        }
    }
}
