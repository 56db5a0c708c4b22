//! Command handlers for `vpipe`.
//!
//! Every project command loads the stored snapshot into a fresh
//! `PipelineStore`, applies one or more operations, prints the outcome and
//! saves the result when autosave (or `--save`) is on.

use crate::cli::{BriefArgs, Cli, Command, SceneCommand, SceneFields};
use crate::output;
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use vp_core::config::{load_config, load_plan, AppConfig};
use vp_core::engine::{self, GenerationDispatcher};
use vp_core::init::{generate_structure, InitOptions};
use vp_core::persistence::{
    validate_project_id, FileSnapshotStore, SnapshotError, SnapshotStore,
};
use vp_core::renderers::{MockAssembler, MockRenderer};
use vp_core::state::PipelineStore;
use vp_protocol::brief_models::BriefPatch;
use vp_protocol::generation_models::GenerationResultPatch;
use vp_protocol::ipc::{Event, Op};
use vp_protocol::scene_models::{NewScene, ScenePatch};

const CURRENT_PROJECT_FILE: &str = "current";

/// Loaded configuration plus the snapshot store it points at.
struct Workspace {
    config: AppConfig,
    snapshots: FileSnapshotStore,
}

impl Workspace {
    async fn load(root: &Path) -> Result<Self> {
        let config = load_config(root)
            .await
            .wrap_err("Failed to load .video-pipeline/config.toml")?;
        let snapshots = FileSnapshotStore::new(config.projects_dir());
        Ok(Self { config, snapshots })
    }

    fn current_marker(&self) -> PathBuf {
        self.config.config_dir().join(CURRENT_PROJECT_FILE)
    }

    fn current_project(&self) -> Option<String> {
        std::fs::read_to_string(self.current_marker())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn set_current_project(&self, project_id: &str) -> Result<()> {
        let marker = self.current_marker();
        if let Some(parent) = marker.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&marker, project_id)
            .wrap_err_with(|| format!("Failed to write {}", marker.display()))
    }

    fn resolve_project(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.current_project())
            .ok_or_else(|| {
                eyre!("No project selected. Run `vpipe new <name>` or pass --project <id>.")
            })
    }

    async fn open(&self, project_id: &str) -> Result<PipelineStore> {
        let snapshot = self
            .snapshots
            .load(project_id)
            .await
            .wrap_err_with(|| format!("Failed to open project {project_id}"))?;
        Ok(PipelineStore::from_snapshot(snapshot))
    }

    async fn save(&self, store: &PipelineStore) -> Result<()> {
        self.snapshots
            .save(&store.snapshot())
            .await
            .wrap_err("Failed to save project")
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    if let Command::Init { force, minimal } = cli.command {
        return init(&cli.root, force, minimal).await;
    }

    let workspace = Workspace::load(&cli.root).await?;
    let persist = workspace.config.global.autosave || cli.save;

    match cli.command {
        Command::Init { .. } => unreachable!("handled above"),
        Command::New { name, id } => new_project(&workspace, name, id).await,
        Command::List => {
            let summaries = workspace.snapshots.list().await?;
            let current = workspace.current_project();
            print!(
                "{}",
                output::render_summaries(&summaries, current.as_deref())
            );
            Ok(())
        }
        Command::Delete { id } => {
            workspace.snapshots.delete(&id).await?;
            if workspace.current_project().as_deref() == Some(id.as_str()) {
                let marker = workspace.current_marker();
                if let Err(err) = std::fs::remove_file(&marker) {
                    warn!(
                        path = %marker.display(),
                        error = %err,
                        "Failed to clear current project"
                    );
                }
            }
            println!("{} project {id}", "Deleted".yellow());
            Ok(())
        }
        command => {
            let project_id = workspace.resolve_project(cli.project.as_deref())?;
            let mut store = workspace.open(&project_id).await?;
            let mutating = command.is_mutating();

            let result = project_command(&workspace, &mut store, command).await;

            if mutating && persist {
                workspace.save(&store).await?;
                debug!(%project_id, "Project saved");
            } else if mutating {
                eprintln!(
                    "{} autosave is off, changes were not saved (pass --save)",
                    "Note:".yellow()
                );
            }
            result
        }
    }
}

async fn init(root: &Path, force: bool, minimal: bool) -> Result<()> {
    let vp_dir = generate_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    })
    .await?;
    println!("{} {}", "Initialized".green(), vp_dir.display());
    Ok(())
}

async fn new_project(workspace: &Workspace, name: String, id: Option<String>) -> Result<()> {
    let project_id = match id {
        Some(id) => id,
        None => slugify(&name),
    };
    validate_project_id(&project_id).wrap_err("Choose a different project id with --id")?;
    match workspace.snapshots.load(&project_id).await {
        Err(SnapshotError::NotFound(_)) => {}
        Ok(_) => bail!("Project {project_id} already exists"),
        Err(err) => {
            return Err(err).wrap_err_with(|| {
                format!("Project {project_id} already exists but could not be read")
            })
        }
    }

    let mut store = PipelineStore::new();
    store.set_project_id(Some(project_id.clone()));
    store.set_project_name(name);
    store.set_brief(workspace.config.global.defaults.to_patch());

    workspace.save(&store).await?;
    workspace.set_current_project(&project_id)?;
    println!("{} project {}", "Created".green(), project_id.bold());
    Ok(())
}

/// Lowercase ASCII alphanumerics joined by single dashes.
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Apply `op`, print its outcome, and turn a rejection into an error.
fn apply(store: &mut PipelineStore, op: Op) -> Result<Event> {
    let event = store.apply(op);
    println!("{}", output::describe_event(&event));
    if let Event::Rejected { reason } = &event {
        bail!("{reason}");
    }
    Ok(event)
}

async fn project_command(
    workspace: &Workspace,
    store: &mut PipelineStore,
    command: Command,
) -> Result<()> {
    match command {
        Command::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            } else {
                print!("{}", output::render_project(store.project()));
            }
        }
        Command::Gate => print!("{}", output::render_gates(store.project())),
        Command::Brief(args) => {
            let patch = brief_patch(args);
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one brief option.");
            }
            apply(store, Op::SetBrief { patch })?;
        }
        Command::Plan { file } => {
            let plan = load_plan(&file)?;
            apply(store, Op::SetDecompositionPlan { plan: Some(plan) })?;
        }
        Command::Scene { command } => scene_command(store, command)?,
        Command::Avatar { id } => {
            apply(store, Op::SetAvatar { avatar_id: Some(id) })?;
        }
        Command::Voice { id } => {
            apply(store, Op::SetVoice { voice_id: Some(id) })?;
        }
        Command::Transition { style } => {
            apply(store, Op::SetTransitionType { transition: style })?;
        }
        Command::Result {
            scene_id,
            status,
            output,
            error,
        } => {
            let patch = GenerationResultPatch {
                status: Some(status.into()),
                output_url: output,
                error,
            };
            apply(store, Op::UpdateGenerationResult { scene_id, patch })?;
        }
        Command::FinalUrl { url } => {
            apply(store, Op::SetFinalVideoUrl { url: Some(url) })?;
        }
        Command::Advance => {
            apply(store, Op::AdvanceStep)?;
        }
        Command::Back => {
            apply(store, Op::GoBack)?;
        }
        Command::Goto { stage } => {
            apply(store, Op::SetCurrentStep { step: stage })?;
        }
        Command::Reset => {
            let project_id = store.project().project_id().map(str::to_string);
            let name = store.project().project_name().to_string();
            apply(store, Op::Reset)?;
            store.set_project_id(project_id);
            store.set_project_name(name);
        }
        Command::Generate { mock, concurrency } => {
            if !mock {
                bail!(
                    "No renderer is configured. Pass --mock to use the built-in mock renderer."
                );
            }
            let max_concurrency =
                concurrency.unwrap_or(workspace.config.global.generation.max_concurrency);
            let dispatcher =
                GenerationDispatcher::new(Arc::new(MockRenderer::success()), max_concurrency);
            let summary = engine::generate(store, &dispatcher)
                .await
                .map_err(|err| eyre!("Generation failed: {err:#}"))?;
            for result in store.project().generation_results().iter() {
                println!(
                    "{}",
                    output::describe_event(&Event::GenerationResultUpdated {
                        scene_id: result.scene_id.clone(),
                        status: result.status,
                    })
                );
            }
            println!(
                "{} {} completed, {} failed",
                "Generation finished:".green(),
                summary.completed,
                summary.failed
            );
        }
        Command::Assemble { mock } => {
            if !mock {
                bail!(
                    "No assembler is configured. Pass --mock to use the built-in mock assembler."
                );
            }
            let url = engine::assemble(store, &MockAssembler::success()).await?;
            println!("{} {url}", "Assembled".green());
        }
        Command::Init { .. }
        | Command::New { .. }
        | Command::List
        | Command::Delete { .. } => unreachable!("handled without a project"),
    }
    Ok(())
}

fn scene_command(store: &mut PipelineStore, command: SceneCommand) -> Result<()> {
    match command {
        SceneCommand::Add(fields) => {
            let scene = NewScene {
                script: fields.script.unwrap_or_default(),
                visual_direction: fields.visual.unwrap_or_default(),
                duration_secs: fields.duration.unwrap_or_default(),
                ..NewScene::default()
            };
            apply(store, Op::AddScene { scene })?;
        }
        SceneCommand::Update { id, fields } => {
            let patch = scene_patch(fields);
            if patch == ScenePatch::default() {
                bail!("Nothing to update. Pass --script, --visual or --duration.");
            }
            apply(
                store,
                Op::UpdateScene {
                    scene_id: id,
                    patch,
                },
            )?;
        }
        SceneCommand::Remove { id } => {
            apply(store, Op::RemoveScene { scene_id: id })?;
        }
        SceneCommand::Move { from, to } => {
            apply(
                store,
                Op::ReorderScenes {
                    from_index: from as usize - 1,
                    to_index: to as usize - 1,
                },
            )?;
        }
    }
    Ok(())
}

fn brief_patch(args: BriefArgs) -> BriefPatch {
    BriefPatch {
        description: args.description,
        video_type: args.video_type,
        platform: args.platform,
        duration_secs: args.duration,
        aspect_ratio: args.aspect_ratio,
        resolution: args.resolution,
    }
}

fn scene_patch(fields: SceneFields) -> ScenePatch {
    ScenePatch {
        script: fields.script,
        visual_direction: fields.visual,
        duration_secs: fields.duration,
        attributes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Launch Video"), "launch-video");
        assert_eq!(slugify("  Q3 -- recap!  "), "q3-recap");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_brief_patch_maps_every_flag() {
        let patch = brief_patch(BriefArgs {
            description: Some("demo".to_string()),
            duration: Some(30),
            ..BriefArgs::default()
        });
        assert_eq!(patch.description.as_deref(), Some("demo"));
        assert_eq!(patch.duration_secs, Some(30));
        assert!(patch.platform.is_none());
    }
}
