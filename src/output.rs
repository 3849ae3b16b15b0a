//! Progress markers, colored output, and the elapsed-time summary.
//!
//! Markers and the summary go to stdout in program order. The spinner shown
//! while a tool runs draws on stderr and is cleared before the next marker.

use crate::config::Project;
use crate::constants::{FAILED_OUTPUT_TAIL_LINES, PROGRESS_TICK_MS};
use crate::error::RefreshError;
use crate::options::{Target, Verbosity};
use crate::pipeline::{Phase, RunCallbacks, RunSummary};
use crate::runner::CommandOutput;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::io::{Stderr, Stdout, Write};
use std::time::Duration;

/// Callbacks that print nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl RunCallbacks for NoOpCallbacks {
    fn on_phase_start(&self, _project: &Project, _phase: &Phase) {}
    fn on_phase_complete(&self, _project: &Project, _phase: &Phase, _success: bool) {}
}

/// Console reporter for a run.
///
/// Quiet mode drops the markers; tool stderr is mirrored in every mode.
/// Verbose mode also echoes tool stdout and never shows a spinner. When a
/// tool fails without writing to stderr, the tail of its stdout is shown.
pub struct ConsoleCallbacks<O: Write = Stdout, E: Write = Stderr> {
    verbosity: Verbosity,
    show_spinner: bool,
    out: RefCell<O>,
    err: RefCell<E>,
    spinner: RefCell<Option<ProgressBar>>,
}

impl ConsoleCallbacks {
    /// Reporter writing to the process's stdout and stderr.
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            show_spinner: verbosity == Verbosity::Normal,
            ..Self::with_writers(verbosity, std::io::stdout(), std::io::stderr())
        }
    }
}

impl<O: Write, E: Write> ConsoleCallbacks<O, E> {
    /// Reporter writing markers to `out` and mirrored tool errors to `err`.
    /// No spinner is drawn.
    pub fn with_writers(verbosity: Verbosity, out: O, err: E) -> Self {
        Self {
            verbosity,
            show_spinner: false,
            out: RefCell::new(out),
            err: RefCell::new(err),
            spinner: RefCell::new(None),
        }
    }

    /// Returns the writers.
    pub fn into_writers(self) -> (O, E) {
        (self.out.into_inner(), self.err.into_inner())
    }

    fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    fn start_spinner(&self, message: String) {
        if !self.show_spinner {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn write_out(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn write_err(&self, text: &str) {
        let mut err = self.err.borrow_mut();
        let _ = writeln!(err, "{}", text.trim_end_matches('\n'));
        let _ = err.flush();
    }
}

impl<O: Write, E: Write> RunCallbacks for ConsoleCallbacks<O, E> {
    fn on_run_start(&self, target: &Target, total: usize) {
        if self.is_quiet() {
            return;
        }
        self.write_out(&format_run_start(target, total).dimmed().to_string());
    }

    fn on_project_start(&self, project: &Project, index: usize, total: usize) {
        if self.is_quiet() {
            return;
        }
        let header = format!("[{}/{}] {}", index + 1, total, project.name);
        self.write_out(&format!("\n{}", header.white().bold()));
    }

    fn on_phase_start(&self, project: &Project, phase: &Phase) {
        if self.is_quiet() {
            return;
        }
        let message = format_phase_start(project, phase);
        self.write_out(&format!("  {} {}...", "→".cyan(), message));
        self.start_spinner(message);
    }

    fn on_phase_output(&self, _phase: &Phase, output: &CommandOutput) {
        self.clear_spinner();
        let has_stdout = !output.stdout.trim().is_empty();
        let has_stderr = !output.stderr.trim().is_empty();

        if self.verbosity == Verbosity::Verbose && has_stdout {
            self.write_out(output.stdout.trim_end_matches('\n'));
        } else if !output.success && !has_stderr && has_stdout {
            self.write_err(&tail_lines(&output.stdout, FAILED_OUTPUT_TAIL_LINES));
        }
        if has_stderr {
            self.write_err(&output.stderr);
        }
    }

    fn on_phase_complete(&self, project: &Project, phase: &Phase, success: bool) {
        self.clear_spinner();
        if self.is_quiet() {
            return;
        }
        if success {
            self.write_out(&format!("  {} {}", "✓".green(), format_phase_done(project, phase)));
        } else {
            self.write_out(&format!("  {} {} failed", "✗".red(), phase));
        }
    }
}

pub fn print_banner() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}

/// Writes the one-line elapsed-time summary.
pub fn print_summary<W: Write>(out: &mut W, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(
        out,
        "\n{} {}",
        "Done in".green().bold(),
        format_elapsed(summary.elapsed)
    )
}

/// Writes a run failure in the `Error: <message>` form.
pub fn print_error<W: Write>(out: &mut W, error: &dyn std::fmt::Display) -> std::io::Result<()> {
    writeln!(out, "Error: {}", error)
}

/// Writes the summary of a successful run or the error of a failed one, and
/// returns whether the run succeeded.
pub fn print_outcome<W: Write>(
    out: &mut W,
    result: &Result<RunSummary, RefreshError>,
) -> std::io::Result<bool> {
    match result {
        Ok(summary) => print_summary(out, summary).map(|()| true),
        Err(e) => print_error(out, e).map(|()| false),
    }
}

/// Last `count` lines of `text`.
fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

/// Formats a duration as whole minutes plus remaining seconds.
///
/// The total is rounded to whole seconds first, so 119.6s reads
/// "2 minutes and 0 seconds" rather than "1 minutes and 60 seconds".
#[must_use]
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    format!("{} minutes and {} seconds", total / 60, total % 60)
}

fn format_run_start(target: &Target, total: usize) -> String {
    match target {
        Target::Project(name) => format!("Refreshing project '{}'", name),
        Target::Workspace(name) => format!(
            "Refreshing workspace '{}' ({} project{})",
            name,
            total,
            if total == 1 { "" } else { "s" }
        ),
    }
}

fn format_phase_start(project: &Project, phase: &Phase) -> String {
    match phase {
        Phase::Update { program } => format!("Updating {} with {}", project.name, program),
        Phase::Restore { tool } => format!("Restoring packages for {} with {}", project.name, tool),
        Phase::Build { tool } => format!("Building {} with {}", project.name, tool),
    }
}

fn format_phase_done(project: &Project, phase: &Phase) -> String {
    match phase {
        Phase::Update { .. } => format!("{} updated", project.name),
        Phase::Restore { .. } => format!("{} packages restored", project.name),
        Phase::Build { .. } => format!("{} built", project.name),
    }
}
