//! Target lookup within the loaded configuration.

use crate::config::{Configuration, Named, Project, Workspace};
use crate::error::{RefreshError, Result, TargetKind};
use crate::options::Target;

/// Returns the first entry whose name matches exactly.
pub fn find<'a, T: Named>(items: &'a [T], name: &str, kind: TargetKind) -> Result<&'a T> {
    items
        .iter()
        .find(|item| item.name() == name)
        .ok_or_else(|| RefreshError::TargetNotConfigured {
            kind,
            name: name.to_string(),
        })
}

pub fn find_project<'a>(config: &'a Configuration, name: &str) -> Result<&'a Project> {
    find(&config.projects, name, TargetKind::Project)
}

pub fn find_workspace<'a>(config: &'a Configuration, name: &str) -> Result<&'a Workspace> {
    find(&config.workspaces, name, TargetKind::Workspace)
}

/// Resolves every project a workspace references, in order.
///
/// Fails on the first unknown reference, before anything has run.
pub fn expand_workspace<'a>(
    config: &'a Configuration,
    workspace: &Workspace,
) -> Result<Vec<&'a Project>> {
    workspace
        .projects
        .iter()
        .map(|name| find_project(config, name))
        .collect()
}

/// Resolves a run target into the ordered list of projects to refresh.
pub fn resolve_target<'a>(config: &'a Configuration, target: &Target) -> Result<Vec<&'a Project>> {
    match target {
        Target::Project(name) => Ok(vec![find_project(config, name)?]),
        Target::Workspace(name) => {
            let workspace = find_workspace(config, name)?;
            expand_workspace(config, workspace)
        }
    }
}
