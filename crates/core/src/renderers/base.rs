//! Renderer and assembler traits and supporting types.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;
use vp_protocol::brief_models::Brief;
use vp_protocol::project_models::TransitionType;
use vp_protocol::scene_models::Scene;

/// Everything a renderer needs to produce the clip for one scene.
#[derive(Debug, Clone)]
pub struct SceneRenderRequest {
    /// The scene to render, as it was when generation was dispatched.
    pub scene: Scene,

    /// Selected presenter avatar reference.
    pub avatar_id: Option<String>,

    /// Selected voice reference.
    pub voice_id: Option<String>,

    /// Aspect ratio requested by the brief, empty if unspecified.
    pub aspect_ratio: String,

    /// Output resolution requested by the brief, empty if unspecified.
    pub resolution: String,
}

impl SceneRenderRequest {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            avatar_id: None,
            voice_id: None,
            aspect_ratio: String::new(),
            resolution: String::new(),
        }
    }

    pub fn with_avatar(mut self, avatar_id: Option<String>) -> Self {
        self.avatar_id = avatar_id;
        self
    }

    pub fn with_voice(mut self, voice_id: Option<String>) -> Self {
        self.voice_id = voice_id;
        self
    }

    /// Copy output format hints from `brief`.
    pub fn with_brief(mut self, brief: &Brief) -> Self {
        self.aspect_ratio = brief.aspect_ratio.clone();
        self.resolution = brief.resolution.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// The renderer accepted the job and is working on it.
    Processing,
    /// The clip is ready.
    Completed { output_url: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Renderer not available: {0}")]
    NotAvailable(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Renderer finished without producing output")]
    NoOutput,
    #[error("Assembly failed: {0}")]
    AssemblyFailed(String),
}

pub type RenderStream = Pin<Box<dyn Stream<Item = Result<RenderEvent, RenderError>> + Send>>;

/// Produces the clip for a single scene.
#[async_trait]
pub trait SceneRenderer: Send + Sync {
    async fn check_availability(&self) -> bool;
    async fn render(&self, request: &SceneRenderRequest) -> Result<RenderStream, RenderError>;
}

/// One rendered clip handed to the assembler, in storyboard order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyClip {
    pub scene_id: String,
    pub output_url: String,
}

#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub project_id: Option<String>,
    pub clips: Vec<AssemblyClip>,
    pub transition: TransitionType,
}

/// Joins rendered clips into the final video and returns its reference.
#[async_trait]
pub trait VideoAssembler: Send + Sync {
    async fn assemble(&self, request: &AssemblyRequest) -> Result<String, RenderError>;
}
