//! Staged run pipeline.
//!
//! A run moves through `Init → Validated → ConfigLoaded → Resolved → Running`
//! and ends in `Done` or `Failed`. Each stage is a fallible step; the first
//! error short-circuits the rest.

use crate::build;
use crate::cli::Cli;
use crate::config::{Configuration, Project};
use crate::error::Result;
use crate::options::{Options, Target};
use crate::resolve;
use crate::runner::{CommandOutput, CommandRunner};
use crate::vcs;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Validated,
    ConfigLoaded,
    Resolved,
    Running,
    Done,
    Failed,
}

/// One external invocation within a project's refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Update { program: String },
    Restore { tool: String },
    Build { tool: String },
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Update { program } => write!(f, "{} update", program),
            Phase::Restore { tool } => write!(f, "{} restore", tool),
            Phase::Build { tool } => write!(f, "{} build", tool),
        }
    }
}

/// Progress notifications emitted while projects are refreshed.
pub trait RunCallbacks {
    fn on_run_start(&self, _target: &Target, _total: usize) {}

    fn on_project_start(&self, _project: &Project, _index: usize, _total: usize) {}

    fn on_phase_start(&self, project: &Project, phase: &Phase);

    /// Called with the tool's captured output, whether it succeeded or not.
    fn on_phase_output(&self, _phase: &Phase, _output: &CommandOutput) {}

    fn on_phase_complete(&self, project: &Project, phase: &Phase, success: bool);
}

/// Runs one phase and returns its output, or the failure message when the
/// tool could not start or exited unsuccessfully.
pub(crate) fn run_phase(
    runner: &dyn CommandRunner,
    callbacks: &dyn RunCallbacks,
    project: &Project,
    phase: &Phase,
    program: &str,
    args: &[String],
    dir: Option<&Path>,
) -> std::result::Result<CommandOutput, String> {
    callbacks.on_phase_start(project, phase);

    let output = match runner.run(program, args, dir) {
        Ok(output) => output,
        Err(e) => {
            callbacks.on_phase_complete(project, phase, false);
            return Err(format!("{:#}", e));
        }
    };

    callbacks.on_phase_output(phase, &output);
    callbacks.on_phase_complete(project, phase, output.success);

    if output.success {
        Ok(output)
    } else {
        Err(output.failure_message())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub projects: Vec<String>,
    pub elapsed: Duration,
}

/// Everything one invocation works with: validated options, the loaded
/// configuration, and the run's timestamps.
#[derive(Debug)]
pub struct RunContext {
    pub options: Options,
    pub config: Configuration,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl RunContext {
    /// Loads the configuration named by `options`.
    pub fn load(options: Options) -> Result<Self> {
        let config = Configuration::load(&options.config_path)?;
        if options.build {
            config.require_build_config()?;
        }
        Ok(Self::new(options, config))
    }

    #[must_use]
    pub fn new(options: Options, config: Configuration) -> Self {
        Self {
            options,
            config,
            started: None,
            finished: None,
        }
    }

    pub fn resolve(&self) -> Result<Vec<Project>> {
        let projects = resolve::resolve_target(&self.config, &self.options.target)?;
        Ok(projects.into_iter().cloned().collect())
    }

    /// Updates and optionally builds each project in order, stopping at the
    /// first failure.
    pub fn refresh(
        &mut self,
        projects: &[Project],
        runner: &dyn CommandRunner,
        callbacks: &dyn RunCallbacks,
    ) -> Result<RunSummary> {
        callbacks.on_run_start(&self.options.target, projects.len());
        self.started = Some(Instant::now());

        for (index, project) in projects.iter().enumerate() {
            tracing::debug!(project = %project.name, index, "refreshing project");
            callbacks.on_project_start(project, index, projects.len());

            vcs::update(project, &self.config, runner, callbacks)?;

            if self.options.build {
                build::build(project, &self.config, runner, callbacks)?;
            }
        }

        self.finished = Some(Instant::now());

        Ok(RunSummary {
            projects: projects.iter().map(|p| p.name.clone()).collect(),
            elapsed: self.elapsed().unwrap_or_default(),
        })
    }

    /// Time between the first update and the end of the last project.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.started, self.finished) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }
}

/// Drives a run through its stages.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    callbacks: &'a dyn RunCallbacks,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, callbacks: &'a dyn RunCallbacks) -> Self {
        Self {
            runner,
            callbacks,
            stage: Stage::Init,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(&mut self, cli: &Cli) -> Result<RunSummary> {
        let result = self.run_stages(cli);
        if let Err(e) = &result {
            tracing::debug!(stage = ?self.stage, error = %e, "run failed");
            self.advance(Stage::Failed);
        }
        result
    }

    fn run_stages(&mut self, cli: &Cli) -> Result<RunSummary> {
        let options = Options::from_cli(cli)?;
        self.advance(Stage::Validated);

        let mut context = RunContext::load(options)?;
        self.advance(Stage::ConfigLoaded);

        let projects = context.resolve()?;
        self.advance(Stage::Resolved);

        match &context.options.target {
            Target::Project(name) => tracing::debug!(project = %name, "target resolved"),
            Target::Workspace(name) => {
                tracing::debug!(workspace = %name, projects = projects.len(), "target resolved")
            }
        }

        self.advance(Stage::Running);
        let summary = context.refresh(&projects, self.runner, self.callbacks)?;
        self.advance(Stage::Done);

        Ok(summary)
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
    }
}
