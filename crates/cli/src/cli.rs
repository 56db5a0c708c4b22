//! Command-line definitions for `vpipe`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vp_protocol::generation_models::GenerationStatus;
use vp_protocol::project_models::TransitionType;
use vp_protocol::stage_models::PipelineStage;

#[derive(Parser, Debug)]
#[command(
    name = "vpipe",
    version,
    about = "Drive video production projects through the seven-stage pipeline"
)]
pub struct Cli {
    /// Workspace root containing `.video-pipeline/`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Project to operate on (defaults to the current project)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Save after a mutating command even when autosave is off
    #[arg(long, global = true)]
    pub save: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create `.video-pipeline/` in the workspace root
    Init {
        /// Overwrite existing configuration templates
        #[arg(long)]
        force: bool,
        /// Skip the sample plan files
        #[arg(long)]
        minimal: bool,
    },
    /// Create a project and make it current
    New {
        /// Display name
        name: String,
        /// Project id (defaults to a slug of the name)
        #[arg(long)]
        id: Option<String>,
    },
    /// List stored projects
    List,
    /// Show the current project
    Show {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored project
    Delete {
        /// Project id
        id: String,
    },
    /// Update the brief
    Brief(BriefArgs),
    /// Record a decomposition plan from a JSON or YAML file
    Plan {
        /// Plan file (.json, .yaml or .yml)
        file: PathBuf,
    },
    /// Edit the storyboard
    Scene {
        #[command(subcommand)]
        command: SceneCommand,
    },
    /// Select the presenter avatar
    Avatar {
        /// Avatar reference
        id: String,
    },
    /// Select the voice
    Voice {
        /// Voice reference
        id: String,
    },
    /// Select the transition style used during assembly
    Transition {
        /// cut, fade, dissolve, wipe or slide
        style: TransitionType,
    },
    /// Record a render report for one scene
    Result {
        /// Scene id
        scene_id: String,
        /// New status
        #[arg(value_enum)]
        status: StatusArg,
        /// Output reference of the rendered clip
        #[arg(long)]
        output: Option<String>,
        /// Error message of a failed render
        #[arg(long)]
        error: Option<String>,
    },
    /// Record the assembled video reference
    FinalUrl {
        /// Final video reference
        url: String,
    },
    /// Show which stages the project may enter
    Gate,
    /// Move to the next stage if its gate allows it
    Advance,
    /// Move to the previous stage
    Back,
    /// Jump to any stage without gating
    Goto {
        /// Stage name, e.g. `pre-production`
        stage: PipelineStage,
    },
    /// Restore the project to its initial empty state, keeping its id
    Reset,
    /// Render every scene
    Generate {
        /// Use the built-in mock renderer
        #[arg(long)]
        mock: bool,
        /// Override the configured concurrency bound
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Join the rendered clips into the final video
    Assemble {
        /// Use the built-in mock assembler
        #[arg(long)]
        mock: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct BriefArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub video_type: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
    /// Target duration in seconds
    #[arg(long)]
    pub duration: Option<u32>,
    #[arg(long)]
    pub aspect_ratio: Option<String>,
    #[arg(long)]
    pub resolution: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct SceneFields {
    #[arg(long)]
    pub script: Option<String>,
    #[arg(long)]
    pub visual: Option<String>,
    /// Duration in seconds
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum SceneCommand {
    /// Append a scene
    Add(SceneFields),
    /// Change fields of a scene
    Update {
        /// Scene id
        id: String,
        #[command(flatten)]
        fields: SceneFields,
    },
    /// Remove a scene
    Remove {
        /// Scene id
        id: String,
    },
    /// Move the scene at one position to another (positions start at 1)
    Move {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        to: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl From<StatusArg> for GenerationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => GenerationStatus::Pending,
            StatusArg::Processing => GenerationStatus::Processing,
            StatusArg::Completed => GenerationStatus::Completed,
            StatusArg::Failed => GenerationStatus::Failed,
        }
    }
}

impl Command {
    /// Whether the command changes the project and should be persisted.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::Init { .. }
                | Command::New { .. }
                | Command::List
                | Command::Show { .. }
                | Command::Delete { .. }
                | Command::Gate
        )
    }
}
