//! Console rendering of the memory and performance reports.
//!
//! Cells are padded to width before any colour is applied so that ANSI codes
//! never disturb the alignment.

use colored::{Color, Colorize};
use std::fmt::Write;

use crate::classify::{ClassifiedRow, EfficiencyTier, MemoryShare};
use crate::config::{RenderOptions, VISUALIZER_SCRIPT};
use crate::hardware::HardwareInfo;
use crate::leaderboard::{LeaderEntry, Leaderboard};
use crate::schema::{Metric, UNAVAILABLE};
use crate::session::SessionId;
use crate::ReportKind;

const MIN_MODEL_WIDTH: usize = 24;

/// Everything a report needs, already classified.
#[derive(Clone, Copy, Debug)]
pub struct ReportView<'a> {
    pub kind: ReportKind,
    pub session: &'a SessionId,
    pub rows: &'a [ClassifiedRow],
    pub leaderboard: &'a Leaderboard,
    pub hardware: Option<&'a HardwareInfo>,
}

impl ReportView<'_> {
    fn has_memory_share(&self) -> bool {
        self.hardware.and_then(HardwareInfo::total_memory).is_some()
    }

    fn model_width(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.row.model_name.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_MODEL_WIDTH)
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    title: &'static str,
    width: usize,
    align: Align,
}

impl Column {
    fn left(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Left,
        }
    }

    fn right(title: &'static str, width: usize) -> Self {
        Self {
            title,
            width,
            align: Align::Right,
        }
    }

    fn pad(&self, text: &str) -> String {
        match self.align {
            Align::Left => format!("{text:<width$}", width = self.width),
            Align::Right => format!("{text:>width$}", width = self.width),
        }
    }
}

fn paint(text: String, color: Option<Color>, opts: RenderOptions) -> String {
    match color {
        Some(c) if opts.color => text.color(c).to_string(),
        _ => text,
    }
}

fn heading(text: &str, opts: RenderOptions) -> String {
    if opts.color {
        text.cyan().bold().to_string()
    } else {
        text.to_string()
    }
}

fn metric_cell(metric: Metric, precision: usize) -> String {
    match metric.value() {
        Some(v) => format!("{v:.precision$}"),
        None => UNAVAILABLE.to_string(),
    }
}

fn share_cell(share: Option<MemoryShare>) -> (String, Option<Color>) {
    match share {
        Some(s) => (format!("{:.1}%", s.percent), Some(s.tier.color())),
        None => (UNAVAILABLE.to_string(), None),
    }
}

fn join_cells(cells: Vec<String>) -> String {
    cells.join("  ").trim_end().to_string()
}

fn table_row(columns: &[Column], cells: Vec<(String, Option<Color>)>, opts: RenderOptions) -> String {
    join_cells(
        columns
            .iter()
            .zip(cells)
            .map(|(col, (text, color))| paint(col.pad(&text), color, opts))
            .collect(),
    )
}

fn table_header(out: &mut String, columns: &[Column], opts: RenderOptions) {
    let header = join_cells(columns.iter().map(|c| c.pad(c.title)).collect());
    let rule = "-".repeat(header.chars().count());
    let _ = writeln!(out, "{}", if opts.color { header.bold().to_string() } else { header });
    let _ = writeln!(out, "{rule}");
}

fn banner(out: &mut String, title: &str, session: &SessionId, opts: RenderOptions) {
    let line = "=".repeat(72);
    let _ = writeln!(out, "{}", heading(&line, opts));
    let _ = writeln!(out, "{}", heading(title, opts));
    let _ = writeln!(out, "{}", heading(&line, opts));
    let _ = writeln!(out, "Session: {session}");
    let _ = writeln!(out);
}

fn leader_line(label: &str, entry: Option<&LeaderEntry>, unit: impl Fn(f64) -> String) -> String {
    match entry {
        Some(e) => format!("{label}: {} ({})", e.model_name, unit(e.value)),
        None => format!("{label}: {UNAVAILABLE}"),
    }
}

fn fastest_line(board: &Leaderboard) -> String {
    leader_line("Fastest Model", board.fastest.as_ref(), |v| format!("{v}tokens/sec"))
}

fn most_efficient_line(board: &Leaderboard) -> String {
    leader_line("Most Efficient Model", board.most_efficient.as_ref(), |v| {
        format!("throughput score: {v}")
    })
}

fn hardware_section(out: &mut String, hardware: Option<&HardwareInfo>, opts: RenderOptions) {
    let Some(hw) = hardware else {
        return;
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Hardware Context:", opts));
    if let Some(line) = &hw.memory_line {
        let _ = writeln!(out, "  {line}");
    }
    for line in hw.cpu_lines.iter().chain(hw.gpu_lines.iter()) {
        let _ = writeln!(out, "  {line}");
    }
}

fn visualizer_hint(out: &mut String, view: &ReportView<'_>) {
    let session_arg = match view.session {
        SessionId::Sample => String::new(),
        SessionId::Named(id) => format!(" --session {id}"),
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "For charts, run: python3 {VISUALIZER_SCRIPT}{session_arg} {}",
        view.kind.visualizer_flag()
    );
}

pub fn render_memory_report(view: &ReportView<'_>, opts: RenderOptions) -> String {
    let mut out = String::new();
    banner(&mut out, "LLM Memory Utilization Report", view.session, opts);

    let with_share = view.has_memory_share();
    let mut columns = vec![
        Column::left("Model", view.model_width()),
        Column::left("Params", 7),
        Column::right("Memory (MB)", 11),
    ];
    if with_share {
        columns.push(Column::right("% of RAM", 8));
    }
    columns.push(Column::right("Tokens/MB", 9));
    columns.push(Column::left("Efficiency", 10));
    table_header(&mut out, &columns, opts);

    for r in view.rows {
        let mut cells = vec![
            (r.row.model_name.clone(), None),
            (r.class.param_bucket.label().to_string(), None),
            (metric_cell(r.row.memory_mb, 1), None),
        ];
        if with_share {
            cells.push(share_cell(r.class.memory_share));
        }
        cells.push((metric_cell(r.row.tokens_per_mb, 3), None));
        let tier = r.class.efficiency_tier;
        cells.push((tier.label().to_string(), tier.color()));
        let _ = writeln!(out, "{}", table_row(&columns, cells, opts));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", fastest_line(view.leaderboard));
    let _ = writeln!(out, "{}", most_efficient_line(view.leaderboard));
    let _ = writeln!(
        out,
        "{}",
        leader_line(
            "Most Memory-Efficient Model",
            view.leaderboard.most_memory_efficient.as_ref(),
            |v| format!("{v} tokens/MB"),
        )
    );

    hardware_section(&mut out, view.hardware, opts);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Efficiency Tiers (Tokens/MB):", opts));
    for (tier, rule) in [
        (EfficiencyTier::Excellent, "above 1.0"),
        (EfficiencyTier::Good, "above 0.5"),
        (EfficiencyTier::Average, "above 0.2"),
        (EfficiencyTier::Poor, "0.2 or below"),
    ] {
        let label = paint(format!("{:<10}", tier.label()), tier.color(), opts);
        let _ = writeln!(out, "  {label} {rule}");
    }
    if with_share {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading("% of RAM:", opts));
        let _ = writeln!(
            out,
            "  Share of total system memory held by the model. Above 75% is critical,"
        );
        let _ = writeln!(
            out,
            "  above 50% high, above 25% moderate. Leave headroom for the OS and KV cache."
        );
    }

    visualizer_hint(&mut out, view);
    out
}

pub fn render_performance_report(view: &ReportView<'_>, opts: RenderOptions) -> String {
    let mut out = String::new();
    banner(&mut out, "LLM Performance Report", view.session, opts);

    let columns = [
        Column::left("Model", view.model_width()),
        Column::left("Params", 7),
        Column::right("Tokens/sec", 10),
        Column::right("CPU Peak (%)", 12),
        Column::right("CPU Avg (%)", 11),
        Column::right("Throughput", 10),
        Column::right("Time (s)", 8),
    ];
    table_header(&mut out, &columns, opts);

    for r in view.rows {
        let cells = vec![
            (r.row.model_name.clone(), None),
            (r.class.param_bucket.label().to_string(), None),
            (metric_cell(r.row.tokens_per_sec, 2), None),
            (metric_cell(r.row.cpu_peak_pct, 1), None),
            (metric_cell(r.row.cpu_avg_pct, 1), None),
            (metric_cell(r.row.throughput_score, 3), None),
            (metric_cell(r.row.elapsed_time, 1), None),
        ];
        let _ = writeln!(out, "{}", table_row(&columns, cells, opts));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", paint(fastest_line(view.leaderboard), Some(Color::Green), opts));
    let _ = writeln!(
        out,
        "{}",
        paint(most_efficient_line(view.leaderboard), Some(Color::Green), opts)
    );

    hardware_section(&mut out, view.hardware, opts);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading("Understanding the metrics:", opts));
    let _ = writeln!(out, "  Tokens/sec   generation speed as seen by a user; higher is better.");
    let _ = writeln!(out, "  CPU Peak/Avg highest and mean CPU load while generating.");
    let _ = writeln!(out, "  Throughput   tokens/sec per CPU %; rewards speed without saturating cores.");
    let _ = writeln!(out, "  Time (s)     mean wall time per prompt.");

    visualizer_hint(&mut out, view);
    out
}

pub fn render(view: &ReportView<'_>, opts: RenderOptions) -> String {
    match view.kind {
        ReportKind::Memory => render_memory_report(view, opts),
        ReportKind::Performance => render_performance_report(view, opts),
    }
}
