//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Build tool that gets the two-phase restore + build treatment.
pub const MSBUILD_TOOL: &str = "msbuild";

/// Key of the restore-tool template used before an msbuild build.
pub const RESTORE_TOOL: &str = "nuget";

/// Position at which the solution file is inserted into the restore arguments.
/// With a template like `["restore", "-NonInteractive"]` this yields
/// `restore <sln> -NonInteractive`.
pub const RESTORE_SOLUTION_ARG_INDEX: usize = 1;

/// Upper bound on captured tool output kept for echoing (1 MiB).
/// Larger outputs keep their tail, which is where build errors end up.
pub const MAX_CAPTURED_OUTPUT: usize = 1024 * 1024;

/// Lines of stdout shown when a tool fails without writing to stderr.
pub const FAILED_OUTPUT_TAIL_LINES: usize = 20;

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Program names of the supported version-control clients.
pub const SVN_PROGRAM: &str = "svn";
pub const GIT_PROGRAM: &str = "git";
