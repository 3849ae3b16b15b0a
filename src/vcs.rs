//! Working-copy updates.
//!
//! Updates always discard local modifications so the working copy ends up
//! matching its source.

use crate::config::{Configuration, Project, VcsKind};
use crate::constants::{GIT_PROGRAM, SVN_PROGRAM};
use crate::error::{RefreshError, Result};
use crate::pipeline::{Phase, RunCallbacks, run_phase};
use crate::runner::CommandRunner;
use std::path::{Path, PathBuf};

/// A single command of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    /// Directory to run in; `None` for tools that take the path as an argument.
    pub dir: Option<PathBuf>,
}

/// Commands that force-update the working copy at `path`.
#[must_use]
pub fn update_commands(vcs: VcsKind, path: &Path) -> Vec<UpdateCommand> {
    match vcs {
        VcsKind::Svn => vec![UpdateCommand {
            program: SVN_PROGRAM,
            args: vec![
                "update".to_string(),
                "--force".to_string(),
                "--accept".to_string(),
                "theirs-full".to_string(),
                "--non-interactive".to_string(),
                path.display().to_string(),
            ],
            dir: None,
        }],
        VcsKind::Git => vec![
            UpdateCommand {
                program: GIT_PROGRAM,
                args: vec!["fetch".to_string(), "--prune".to_string()],
                dir: Some(path.to_path_buf()),
            },
            UpdateCommand {
                program: GIT_PROGRAM,
                args: vec![
                    "reset".to_string(),
                    "--hard".to_string(),
                    "@{upstream}".to_string(),
                ],
                dir: Some(path.to_path_buf()),
            },
        ],
    }
}

/// Updates the project's working copy.
pub fn update(
    project: &Project,
    config: &Configuration,
    runner: &dyn CommandRunner,
    callbacks: &dyn RunCallbacks,
) -> Result<()> {
    let path = config.resolve_path(&project.path);
    tracing::debug!(project = %project.name, path = %path.display(), vcs = ?config.vcs, "updating");

    for command in update_commands(config.vcs, &path) {
        let phase = Phase::Update {
            program: command.program.to_string(),
        };
        run_phase(
            runner,
            callbacks,
            project,
            &phase,
            command.program,
            &command.args,
            command.dir.as_deref(),
        )
        .map_err(|message| RefreshError::UpdateFailed {
            project: project.name.clone(),
            message,
        })?;
    }

    Ok(())
}
