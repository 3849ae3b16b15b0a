//! External command execution.
//!
//! Everything the pipeline runs goes through the [`CommandRunner`] trait so
//! that orchestration can be exercised without the real tools installed.

use crate::constants::MAX_CAPTURED_OUTPUT;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Callback invoked with every command line before it runs.
pub type CommandLogger = fn(program: &str, args: &[String], dir: Option<&Path>);

pub fn verbose_logger(program: &str, args: &[String], dir: Option<&Path>) {
    let line = format!("$ {} {}", program, args.join(" "));
    match dir {
        Some(dir) => eprintln!(
            "  {} {}",
            line.dimmed(),
            format!("({})", dir.display()).dimmed()
        ),
        None => eprintln!("  {}", line.dimmed()),
    }
}

pub fn no_op_logger(_program: &str, _args: &[String], _dir: Option<&Path>) {}

/// Result of a command that was started and ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Message describing a failed run: the tool's stderr, or its exit status
    /// when it printed nothing.
    #[must_use]
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an external program and waits for it to finish.
///
/// `Err` means the program could not be started at all. A program that ran
/// and failed comes back as `Ok` with `success == false`.
pub trait CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        dir: Option<&Path>,
    ) -> anyhow::Result<CommandOutput>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    logger: CommandLogger,
}

impl SystemRunner {
    #[must_use]
    pub fn new(logger: CommandLogger) -> Self {
        Self { logger }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(no_op_logger)
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        dir: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        (self.logger)(program, args, dir);
        tracing::debug!(program, ?args, dir = ?dir, "running command");

        let mut command = std::process::Command::new(program);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .with_context(|| format!("Failed to execute {}", program))?;

        tracing::debug!(program, status = %output.status, "command finished");

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: capture(&output.stdout),
            stderr: capture(&output.stderr),
        })
    }
}

/// Decodes captured output, keeping at most the last `MAX_CAPTURED_OUTPUT` bytes.
fn capture(bytes: &[u8]) -> String {
    let start = bytes.len().saturating_sub(MAX_CAPTURED_OUTPUT);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}
