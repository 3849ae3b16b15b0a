//! Runtime options derived from CLI arguments.

use crate::cli::Cli;
use crate::constants::DEFAULT_CONFIG_FILE;
use crate::error::{RefreshError, Result};
use crate::runner::{self, CommandLogger};
use std::path::PathBuf;

/// What a run refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Project(String),
    Workspace(String),
}

/// Validated options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub target: Target,
    pub config_path: PathBuf,
    pub build: bool,
    pub verbosity: Verbosity,
}

impl Options {
    /// Checks the flag combination. Runs before the configuration is touched.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let target = match (&cli.project, &cli.workspace) {
            (Some(_), Some(_)) => {
                return Err(RefreshError::Usage(
                    "--project and --workspace cannot be used together".to_string(),
                ));
            }
            (Some(project), None) => Target::Project(project.clone()),
            (None, Some(workspace)) => Target::Workspace(workspace.clone()),
            (None, None) => {
                return Err(RefreshError::Usage(
                    "one of --project or --workspace is required".to_string(),
                ));
            }
        };

        Ok(Self {
            target,
            config_path: cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            build: cli.build,
            verbosity: cli.verbosity(),
        })
    }

}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Returns the command logger matching this verbosity.
    ///
    /// Verbosity only picks which logger to use; the loggers themselves live
    /// next to the command runner.
    #[must_use]
    pub fn command_logger(self) -> CommandLogger {
        match self {
            Verbosity::Verbose => runner::verbose_logger,
            Verbosity::Quiet | Verbosity::Normal => runner::no_op_logger,
        }
    }

    /// Default tracing filter directive for this verbosity.
    #[must_use]
    pub fn log_directive(self) -> &'static str {
        match self {
            Verbosity::Verbose => "repo_refresh=debug",
            Verbosity::Quiet | Verbosity::Normal => "repo_refresh=warn",
        }
    }
}
