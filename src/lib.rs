//! Working-copy refresher library.
//!
//! This crate refreshes configured projects by:
//! - Loading the JSON configuration of projects, workspaces and build tools
//! - Resolving the requested project or workspace
//! - Force-updating each working copy in order
//! - Optionally building each project, restoring packages first for msbuild
//! - Reporting the elapsed time of the whole run

pub mod build;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod runner;
pub mod vcs;
