//! Test infrastructure for repo-refresh integration tests.

#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;
use repo_refresh::cli::Cli;
use repo_refresh::runner::{CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A command the fake runner was asked to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
}

impl Invocation {
    /// Whether any argument or the working directory mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(needle))
            || self
                .dir
                .as_ref()
                .is_some_and(|dir| dir.to_string_lossy().contains(needle))
    }
}

/// How the fake runner answers an invocation.
#[derive(Debug, Clone)]
pub enum Answer {
    Succeed,
    Fail(&'static str),
    CannotStart,
}

type Rule = Box<dyn Fn(&Invocation) -> Option<Answer>>;

/// Records every invocation and succeeds unless a rule says otherwise.
#[derive(Default)]
pub struct FakeRunner {
    calls: RefCell<Vec<Invocation>>,
    rules: Vec<Rule>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `answer` for invocations of `program` mentioning `needle`.
    pub fn answer_when(
        mut self,
        program: &'static str,
        needle: &'static str,
        answer: Answer,
    ) -> Self {
        self.rules.push(Box::new(move |call: &Invocation| {
            (call.program == program && call.mentions(needle)).then(|| answer.clone())
        }));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String], dir: Option<&Path>) -> Result<CommandOutput> {
        let call = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            dir: dir.map(Path::to_path_buf),
        };
        self.calls.borrow_mut().push(call.clone());

        let answer = self
            .rules
            .iter()
            .find_map(|rule| rule(&call))
            .unwrap_or(Answer::Succeed);

        match answer {
            Answer::Succeed => Ok(CommandOutput {
                success: true,
                code: Some(0),
                stdout: format!("{} ok\n", program),
                stderr: String::new(),
            }),
            Answer::Fail(message) => Ok(CommandOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: message.to_string(),
            }),
            Answer::CannotStart => anyhow::bail!("Failed to execute {}", program),
        }
    }
}

/// A temporary directory holding a `config.json`.
pub struct TestConfig {
    _dir: TempDir,
    path: PathBuf,
}

impl TestConfig {
    pub fn new(content: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, content)?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().expect("temp path should be UTF-8")
    }
}

/// Configuration with three svn projects, one msbuild solution and a
/// workspace per interesting shape.
pub const SAMPLE_CONFIG: &str = r#"{
    "reposRoot": "/work",
    "buildConfig": {
        "msbuild": { "buildFile": "msbuild", "buildArgs": ["/m", "/p:Configuration=Release"] },
        "nuget": { "buildFile": "nuget", "buildArgs": ["restore", "-NonInteractive"] },
        "make": { "buildFile": "make", "buildArgs": ["all"] }
    },
    "projects": [
        { "name": "A", "path": "a", "buildTool": "make", "buildPath": "a" },
        { "name": "B", "path": "b", "buildTool": "make", "buildPath": "b" },
        { "name": "C", "path": "c", "buildTool": "make", "buildPath": "c" },
        { "name": "sln", "path": "sln", "buildTool": "msbuild", "buildPath": "sln/src", "slnFile": "App.sln" }
    ],
    "workspaces": [
        { "name": "abc", "projects": ["A", "B", "C"] },
        { "name": "broken", "projects": ["A", "X"] },
        { "name": "mixed", "projects": ["sln", "A"] }
    ]
}"#;

pub fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("repo-refresh").chain(args.iter().copied()))
        .expect("arguments should parse")
}
