//! Build invocation.
//!
//! Most tools run their configured template as-is in the project's build
//! directory. `msbuild` is special: the solution is restored with the
//! `nuget` template first, and only a successful restore is followed by the
//! build itself.

use crate::config::{BuildCommand, Configuration, Project};
use crate::constants::{MSBUILD_TOOL, RESTORE_SOLUTION_ARG_INDEX, RESTORE_TOOL};
use crate::error::{RefreshError, Result};
use crate::pipeline::{Phase, RunCallbacks, run_phase};
use crate::runner::CommandRunner;
use std::path::PathBuf;

/// One command of a build plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub phase: Phase,
    pub command: BuildCommand,
}

/// Ordered commands to build a project, and where to run them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub dir: PathBuf,
    pub steps: Vec<BuildStep>,
}

/// Works out the commands for a project from the configured templates.
/// Templates are cloned; the configuration is never modified.
pub fn plan(project: &Project, config: &Configuration) -> Result<BuildPlan> {
    let templates = config.require_build_config()?;

    let tool = project.build_tool.as_deref().ok_or_else(|| {
        RefreshError::ConfigIncomplete(format!("project '{}' has no buildTool", project.name))
    })?;
    let template = templates.get(tool).ok_or_else(|| {
        RefreshError::ConfigIncomplete(format!(
            "no buildConfig entry for tool '{}' used by project '{}'",
            tool, project.name
        ))
    })?;

    let dir = config.resolve_path(
        project
            .build_path
            .as_deref()
            .unwrap_or(project.path.as_path()),
    );

    let steps = if tool == MSBUILD_TOOL {
        let solution = project.sln_file.as_deref().ok_or_else(|| {
            RefreshError::ConfigIncomplete(format!(
                "project '{}' uses {} but has no slnFile",
                project.name, MSBUILD_TOOL
            ))
        })?;
        let restore = templates.get(RESTORE_TOOL).ok_or_else(|| {
            RefreshError::ConfigIncomplete(format!(
                "no buildConfig entry for restore tool '{}'",
                RESTORE_TOOL
            ))
        })?;

        vec![
            BuildStep {
                phase: Phase::Restore {
                    tool: RESTORE_TOOL.to_string(),
                },
                command: restore.with_inserted(RESTORE_SOLUTION_ARG_INDEX, solution),
            },
            BuildStep {
                phase: Phase::Build {
                    tool: tool.to_string(),
                },
                command: template.with_appended(solution),
            },
        ]
    } else {
        vec![BuildStep {
            phase: Phase::Build {
                tool: tool.to_string(),
            },
            command: template.clone(),
        }]
    };

    Ok(BuildPlan { dir, steps })
}

/// Builds the project, stopping at the first failed step.
pub fn build(
    project: &Project,
    config: &Configuration,
    runner: &dyn CommandRunner,
    callbacks: &dyn RunCallbacks,
) -> Result<()> {
    let plan = plan(project, config)?;
    tracing::debug!(
        project = %project.name,
        dir = %plan.dir.display(),
        steps = plan.steps.len(),
        "building"
    );

    for step in &plan.steps {
        run_phase(
            runner,
            callbacks,
            project,
            &step.phase,
            &step.command.build_file,
            &step.command.build_args,
            Some(&plan.dir),
        )
        .map_err(|message| match step.phase {
            Phase::Restore { .. } => RefreshError::RestoreFailed {
                project: project.name.clone(),
                message,
            },
            _ => RefreshError::BuildFailed {
                project: project.name.clone(),
                message,
            },
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Configuration {
        Configuration::from_json(
            r#"{
                "reposRoot": "/src",
                "buildConfig": {
                    "msbuild": { "buildFile": "msbuild.exe", "buildArgs": ["/m", "/v:minimal"] },
                    "nuget": { "buildFile": "nuget.exe", "buildArgs": ["restore", "-NonInteractive"] },
                    "make": { "buildFile": "make", "buildArgs": ["-j4", "all"] }
                },
                "projects": [
                    { "name": "core", "path": "core", "buildTool": "msbuild", "buildPath": "core/src", "slnFile": "Core.sln" },
                    { "name": "lib", "path": "lib", "buildTool": "make" },
                    { "name": "nosln", "path": "x", "buildTool": "msbuild" },
                    { "name": "notool", "path": "y" },
                    { "name": "unknown", "path": "z", "buildTool": "gradle" }
                ]
            }"#,
        )
        .unwrap()
    }

    fn project<'a>(config: &'a Configuration, name: &str) -> &'a Project {
        config.projects.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_msbuild_plan_restores_then_builds() {
        let config = config();
        let plan = plan(project(&config, "core"), &config).unwrap();

        assert_eq!(plan.dir, PathBuf::from("/src/core/src"));
        assert_eq!(plan.steps.len(), 2);

        let restore = &plan.steps[0];
        assert!(matches!(restore.phase, Phase::Restore { .. }));
        assert_eq!(restore.command.build_file, "nuget.exe");
        assert_eq!(
            restore.command.build_args,
            vec!["restore", "Core.sln", "-NonInteractive"]
        );

        let build = &plan.steps[1];
        assert!(matches!(build.phase, Phase::Build { .. }));
        assert_eq!(build.command.build_file, "msbuild.exe");
        assert_eq!(build.command.build_args, vec!["/m", "/v:minimal", "Core.sln"]);
    }

    #[test]
    fn test_plan_leaves_templates_untouched() {
        let config = config();
        plan(project(&config, "core"), &config).unwrap();

        let templates = config.build_config.as_ref().unwrap();
        assert_eq!(templates["nuget"].build_args, vec!["restore", "-NonInteractive"]);
        assert_eq!(templates["msbuild"].build_args, vec!["/m", "/v:minimal"]);
    }

    #[test]
    fn test_generic_plan_runs_template_as_is_in_project_path() {
        let config = config();
        let plan = plan(project(&config, "lib"), &config).unwrap();

        assert_eq!(plan.dir, PathBuf::from("/src/lib"));
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].command.build_file, "make");
        assert_eq!(plan.steps[0].command.build_args, vec!["-j4", "all"]);
    }

    #[test]
    fn test_incomplete_build_settings_are_reported() {
        let config = config();
        for name in ["nosln", "notool", "unknown"] {
            let err = plan(project(&config, name), &config).unwrap_err();
            assert!(
                matches!(err, RefreshError::ConfigIncomplete(ref msg) if msg.contains(name)),
                "unexpected error for {}: {}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_msbuild_without_restore_template_is_incomplete() {
        let config = Configuration::from_json(
            r#"{
                "buildConfig": { "msbuild": { "buildFile": "msbuild.exe", "buildArgs": [] } },
                "projects": [ { "name": "core", "path": "core", "buildTool": "msbuild", "slnFile": "Core.sln" } ]
            }"#,
        )
        .unwrap();
        let err = plan(&config.projects[0], &config).unwrap_err();
        assert!(matches!(err, RefreshError::ConfigIncomplete(ref msg) if msg.contains("nuget")));
    }
}
