//! Configuration file types and loading.
//!
//! The configuration is a JSON document listing the known projects, the
//! workspaces grouping them, and one command template per build tool.
//! It is loaded once per run and never written back.

use crate::error::{RefreshError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Base directory for relative project and build paths.
    pub repos_root: Option<PathBuf>,
    /// Version-control client used for updates.
    pub vcs: VcsKind,
    /// Command templates keyed by build tool name.
    pub build_config: Option<HashMap<String, BuildCommand>>,
    pub projects: Vec<Project>,
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Svn,
    Git,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub build_tool: Option<String>,
    #[serde(default)]
    pub build_path: Option<PathBuf>,
    /// Solution file, only used by the msbuild tool.
    #[serde(default)]
    pub sln_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub name: String,
    /// Project names, in the order they are refreshed.
    #[serde(default)]
    pub projects: Vec<String>,
}

/// An executable plus its fixed arguments.
///
/// Templates are cloned before any argument is inserted, so the loaded
/// configuration stays untouched for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCommand {
    pub build_file: String,
    #[serde(default)]
    pub build_args: Vec<String>,
}

impl BuildCommand {
    /// Returns a copy with `arg` inserted at `index`, or appended when the
    /// template has fewer arguments than that.
    #[must_use]
    pub fn with_inserted(&self, index: usize, arg: &str) -> Self {
        let mut command = self.clone();
        let index = index.min(command.build_args.len());
        command.build_args.insert(index, arg.to_string());
        command
    }

    /// Returns a copy with `arg` appended.
    #[must_use]
    pub fn with_appended(&self, arg: &str) -> Self {
        let mut command = self.clone();
        command.build_args.push(arg.to_string());
        command
    }
}

/// Anything looked up by its `name` field.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Workspace {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Configuration {
    /// Reads and parses the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| RefreshError::ConfigNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_json(&content).map_err(|source| RefreshError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            projects = config.projects.len(),
            workspaces = config.workspaces.len(),
            "configuration loaded"
        );
        config.warn_duplicates();
        Ok(config)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Fails when a build was requested but no build templates exist.
    pub fn require_build_config(&self) -> Result<&HashMap<String, BuildCommand>> {
        self.build_config.as_ref().ok_or_else(|| {
            RefreshError::ConfigIncomplete(
                "a build was requested but no buildConfig is present".to_string(),
            )
        })
    }

    /// Resolves a configured path against `reposRoot` when it is relative.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.repos_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn warn_duplicates(&self) {
        for name in duplicate_names(&self.projects) {
            tracing::warn!(project = name, "duplicate project name, the first entry is used");
        }
        for name in duplicate_names(&self.workspaces) {
            tracing::warn!(workspace = name, "duplicate workspace name, the first entry is used");
        }
    }
}

fn duplicate_names<T: Named>(items: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(Named::name)
        .filter(|name| !seen.insert(*name))
        .collect()
}
