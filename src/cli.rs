use crate::options::Verbosity;
use clap::Parser;
use std::path::PathBuf;

/// Refresh local working copies and optionally build them
///
/// Updates a single project or every project of a workspace listed in the
/// JSON configuration, discarding local modifications, then runs the
/// configured build tool when `--build` is given.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project to refresh
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Workspace to refresh
    #[arg(short, long, value_name = "NAME")]
    pub workspace: Option<String>,

    /// Path to the configuration file [default: config.json]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build each project after updating it
    #[arg(short, long)]
    pub build: bool,

    /// Echo tool output and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Flags whose presence prints the banner.
const BANNER_FLAGS: [&str; 4] = ["--help", "-h", "--version", "-V"];

/// Returns true when a help or version flag is present, in which case the
/// name/version banner is printed before argument parsing.
#[must_use]
pub fn should_print_banner<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .skip(1)
        .any(|arg| BANNER_FLAGS.contains(&arg.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_only_with_help_or_version_flags() {
        assert!(!should_print_banner(&["repo-refresh", "-p", "core"]));
        assert!(!should_print_banner(&["repo-refresh"]));
        assert!(should_print_banner(&["repo-refresh", "--help"]));
        assert!(should_print_banner(&["repo-refresh", "-V"]));
        assert!(should_print_banner(&["repo-refresh", "-p", "core", "--version"]));
    }

    #[test]
    fn test_banner_ignores_program_name() {
        assert!(!should_print_banner(&["--help"]));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["repo-refresh", "-p", "a", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
