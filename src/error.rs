//! Error taxonomy for a refresh run.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure that ends a run. None of them are retried.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("{0}")]
    Usage(String),

    #[error("Could not read configuration file {}: {source}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration is incomplete: {0}")]
    ConfigIncomplete(String),

    #[error("{kind} '{name}' is not configured")]
    TargetNotConfigured { kind: TargetKind, name: String },

    #[error("Update of '{project}' failed: {message}")]
    UpdateFailed { project: String, message: String },

    #[error("Package restore of '{project}' failed: {message}")]
    RestoreFailed { project: String, message: String },

    #[error("Build of '{project}' failed: {message}")]
    BuildFailed { project: String, message: String },
}

/// What kind of configured entry a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Project,
    Workspace,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Project => write!(f, "Project"),
            TargetKind::Workspace => write!(f, "Workspace"),
        }
    }
}

pub type Result<T> = std::result::Result<T, RefreshError>;
