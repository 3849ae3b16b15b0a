use clap::Parser;
use repo_refresh::cli::{self, Cli};
use repo_refresh::output::{self, ConsoleCallbacks};
use repo_refresh::pipeline::Pipeline;
use repo_refresh::runner::SystemRunner;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if cli::should_print_banner(&args) {
        output::print_banner();
    }

    let cli = Cli::parse_from(&args);
    let verbosity = cli.verbosity();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let runner = SystemRunner::new(verbosity.command_logger());
    let callbacks = ConsoleCallbacks::new(verbosity);

    let result = Pipeline::new(&runner, &callbacks).run(&cli);

    match output::print_outcome(&mut std::io::stdout(), &result) {
        Ok(true) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
