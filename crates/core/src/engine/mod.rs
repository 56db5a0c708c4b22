//! Generation and assembly engine.
//!
//! The dispatcher fans scene renders out to concurrent tasks but never touches
//! the project itself. Every change is sent as an [`Op`] over a channel and
//! applied by whoever owns the [`PipelineStore`], usually through [`drive`].
//! Render reports therefore land one at a time, in whatever order the
//! renderer finishes them.

pub mod error;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use vp_protocol::config_models::GenerationConfig;
use vp_protocol::generation_models::{GenerationResult, GenerationResultPatch, GenerationStatus};
use vp_protocol::ipc::{Event, Op};

use crate::renderers::{
    AssemblyClip, AssemblyRequest, RenderError, RenderEvent, SceneRenderRequest, SceneRenderer,
    VideoAssembler,
};
use crate::state::{PipelineProject, PipelineStore};

pub use error::{DispatchError, DispatchResult};

const OPS_CHANNEL_CAPACITY: usize = 64;

/// The scenes to render, captured from a project at dispatch time.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub project_id: Option<String>,
    pub requests: Vec<SceneRenderRequest>,
}

impl GenerationJob {
    pub fn from_project(project: &PipelineProject) -> Self {
        let requests = project
            .scenes()
            .iter()
            .map(|scene| {
                SceneRenderRequest::new(scene.clone())
                    .with_avatar(project.selected_avatar().map(str::to_string))
                    .with_voice(project.selected_voice().map(str::to_string))
                    .with_brief(project.brief())
            })
            .collect();

        Self {
            project_id: project.project_id().map(str::to_string),
            requests,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Final tally of one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub completed: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.completed + self.failed
    }
}

/// Renders every scene of a job with bounded concurrency.
pub struct GenerationDispatcher {
    renderer: Arc<dyn SceneRenderer>,
    max_concurrency: usize,
}

impl GenerationDispatcher {
    /// Create a dispatcher. A concurrency bound of zero is treated as one.
    pub fn new(renderer: Arc<dyn SceneRenderer>, max_concurrency: usize) -> Self {
        Self {
            renderer,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_config(renderer: Arc<dyn SceneRenderer>, config: &GenerationConfig) -> Self {
        Self::new(renderer, config.max_concurrency)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Render every scene in `job`, reporting progress as operations on
    /// `ops_tx`.
    ///
    /// The sequence sent is:
    /// 1. `SetGenerating(true)` and a pending ledger entry for every scene
    /// 2. per scene, `processing` followed by `completed` or `failed`
    /// 3. `SetGenerating(false)` once every task has finished
    ///
    /// A failed scene is recorded in the ledger and does not stop the others.
    /// Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the job is empty, the renderer is unavailable, or
    /// the receiving end of `ops_tx` goes away.
    pub async fn dispatch(
        &self,
        job: GenerationJob,
        ops_tx: Sender<Op>,
    ) -> Result<DispatchSummary> {
        if job.is_empty() {
            return Err(DispatchError::NothingToGenerate.into());
        }
        if !self.renderer.check_availability().await {
            return Err(DispatchError::RendererUnavailable.into());
        }

        info!(
            project_id = ?job.project_id,
            scenes = job.len(),
            max_concurrency = self.max_concurrency,
            "Dispatching scene generation"
        );

        let pending = job
            .requests
            .iter()
            .map(|request| GenerationResult::pending(request.scene.id.clone()))
            .collect();
        send(&ops_tx, Op::SetGenerating { value: true }).await?;
        send(&ops_tx, Op::SetGenerationResults { results: pending }).await?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        for request in job.requests {
            let renderer = Arc::clone(&self.renderer);
            let semaphore = Arc::clone(&semaphore);
            let tx = ops_tx.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .context("Generation semaphore closed")?;
                render_scene(renderer.as_ref(), request, &tx).await
            });
        }

        let mut summary = DispatchSummary::default();
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined.context("Scene render task panicked") {
                Ok(Ok(GenerationStatus::Completed)) => summary.completed += 1,
                Ok(Ok(_)) => summary.failed += 1,
                Ok(Err(e)) | Err(e) => {
                    warn!(error = %e, "Scene render task aborted");
                    first_error.get_or_insert(e);
                }
            }
        }

        send(&ops_tx, Op::SetGenerating { value: false }).await?;

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            completed = summary.completed,
            failed = summary.failed,
            "Scene generation finished"
        );
        Ok(summary)
    }
}

/// Render one scene and report its progress. Returns the terminal status
/// recorded for it.
async fn render_scene(
    renderer: &dyn SceneRenderer,
    request: SceneRenderRequest,
    tx: &Sender<Op>,
) -> Result<GenerationStatus> {
    let scene_id = request.scene.id.clone();
    send(
        tx,
        Op::UpdateGenerationResult {
            scene_id: scene_id.clone(),
            patch: GenerationResultPatch::status(GenerationStatus::Processing),
        },
    )
    .await?;

    let patch = match run_renderer(renderer, &request).await {
        Ok(output_url) => {
            debug!(%scene_id, %output_url, "Scene rendered");
            GenerationResultPatch::completed(output_url)
        }
        Err(e) => {
            warn!(%scene_id, error = %e, "Scene render failed");
            GenerationResultPatch::failed(e.to_string())
        }
    };
    let status = patch.status.unwrap_or(GenerationStatus::Failed);

    send(tx, Op::UpdateGenerationResult { scene_id, patch }).await?;
    Ok(status)
}

async fn run_renderer(
    renderer: &dyn SceneRenderer,
    request: &SceneRenderRequest,
) -> Result<String, RenderError> {
    let mut stream = renderer.render(request).await?;
    while let Some(event) = stream.next().await {
        match event? {
            RenderEvent::Processing => {
                debug!(scene_id = %request.scene.id, "Renderer processing");
            }
            RenderEvent::Completed { output_url } => return Ok(output_url),
        }
    }
    Err(RenderError::NoOutput)
}

async fn send(tx: &Sender<Op>, op: Op) -> Result<()> {
    tx.send(op)
        .await
        .map_err(|_| DispatchError::ChannelClosed.into())
}

/// Apply every operation received on `ops_rx` until all senders are gone.
pub async fn drive(store: &mut PipelineStore, mut ops_rx: Receiver<Op>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(op) = ops_rx.recv().await {
        events.push(store.apply(op));
    }
    events
}

/// Dispatch generation for every scene of `store` and apply the resulting
/// operations to it.
pub async fn generate(
    store: &mut PipelineStore,
    dispatcher: &GenerationDispatcher,
) -> Result<DispatchSummary> {
    let job = GenerationJob::from_project(store.project());
    let (tx, rx) = mpsc::channel(OPS_CHANNEL_CAPACITY);
    let (summary, _events) = tokio::join!(dispatcher.dispatch(job, tx), drive(store, rx));
    summary
}

/// Join the completed clips of `store` into the final video.
///
/// The assembling flag is raised for the duration of the call. On success the
/// returned reference is recorded as the final video.
///
/// # Errors
///
/// Returns [`DispatchError::IncompleteGeneration`] unless every ledger entry
/// and every current scene has a completed clip, and
/// [`DispatchError::Render`] if the assembler fails.
pub async fn assemble(
    store: &mut PipelineStore,
    assembler: &dyn VideoAssembler,
) -> DispatchResult<String> {
    let request = assembly_request(store.project())?;

    info!(clips = request.clips.len(), transition = %request.transition, "Assembling video");
    store.set_assembling(true);
    let outcome = assembler.assemble(&request).await;
    store.set_assembling(false);

    let url = outcome?;
    store.set_final_video_url(Some(url.clone()));
    Ok(url)
}

fn assembly_request(project: &PipelineProject) -> DispatchResult<AssemblyRequest> {
    let ledger = project.generation_results();
    if !ledger.all_completed() {
        let incomplete = ledger.len() - ledger.count(GenerationStatus::Completed);
        return Err(DispatchError::IncompleteGeneration(incomplete.max(1)));
    }

    let mut clips = Vec::with_capacity(project.scenes().len());
    let mut missing = 0;
    for scene in project.scenes() {
        match ledger.get(&scene.id).and_then(|r| r.output_url.clone()) {
            Some(output_url) => clips.push(AssemblyClip {
                scene_id: scene.id.clone(),
                output_url,
            }),
            None => missing += 1,
        }
    }
    if missing > 0 || clips.is_empty() {
        return Err(DispatchError::IncompleteGeneration(missing.max(1)));
    }

    Ok(AssemblyRequest {
        project_id: project.project_id().map(str::to_string),
        clips,
        transition: project.transition_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::{MockAssembler, MockRenderer};
    use crate::state::SequentialIdGenerator;
    use vp_protocol::scene_models::NewScene;

    fn store_with_scenes(n: usize) -> PipelineStore {
        let mut store = PipelineStore::with_id_generator(Arc::new(SequentialIdGenerator::new("s")));
        for i in 0..n {
            store.add_scene(NewScene::with_script(format!("scene {i}")));
        }
        store
    }

    #[tokio::test]
    async fn test_generate_completes_every_scene() {
        let mut store = store_with_scenes(3);
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::success()), 2);

        let summary = generate(&mut store, &dispatcher).await.unwrap();

        assert_eq!(summary, DispatchSummary { completed: 3, failed: 0 });
        assert!(store.project().generation_results().all_completed());
        assert!(!store.project().is_generating());
    }

    #[tokio::test]
    async fn test_failed_scene_does_not_stop_others() {
        let mut store = store_with_scenes(3);
        let renderer = MockRenderer::success().failing_for(["s2"]);
        let dispatcher = GenerationDispatcher::new(Arc::new(renderer), 4);

        let summary = generate(&mut store, &dispatcher).await.unwrap();

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        let ledger = store.project().generation_results();
        assert_eq!(ledger.get("s2").unwrap().status, GenerationStatus::Failed);
        assert!(ledger.get("s2").unwrap().error.is_some());
        assert!(!store.can_advance_to(vp_protocol::stage_models::PipelineStage::Assembly));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_empty_job() {
        let mut store = store_with_scenes(0);
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::success()), 1);

        let err = generate(&mut store, &dispatcher).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::NothingToGenerate)
        ));
        assert!(store.project().generation_results().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unavailable_renderer() {
        let mut store = store_with_scenes(1);
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::unavailable()), 1);

        let err = generate(&mut store, &dispatcher).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::RendererUnavailable)
        ));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::success()), 0);
        assert_eq!(dispatcher.max_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_assemble_records_final_video() {
        let mut store = store_with_scenes(2);
        store.set_project_id(Some("p1".to_string()));
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::success()), 2);
        generate(&mut store, &dispatcher).await.unwrap();

        let url = assemble(&mut store, &MockAssembler::success()).await.unwrap();

        assert_eq!(url, "mock://final/p1-2-fade.mp4");
        assert_eq!(store.project().final_video_url(), Some(url.as_str()));
        assert!(!store.project().is_assembling());
    }

    #[tokio::test]
    async fn test_assemble_requires_completed_ledger() {
        let mut store = store_with_scenes(1);

        let err = assemble(&mut store, &MockAssembler::success())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::IncompleteGeneration(_)));
        assert_eq!(store.project().final_video_url(), None);
    }

    #[tokio::test]
    async fn test_assembler_failure_clears_flag() {
        let mut store = store_with_scenes(1);
        let dispatcher = GenerationDispatcher::new(Arc::new(MockRenderer::success()), 1);
        generate(&mut store, &dispatcher).await.unwrap();

        let err = assemble(&mut store, &MockAssembler::failing())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Render(_)));
        assert!(!store.project().is_assembling());
        assert_eq!(store.project().final_video_url(), None);
    }
}
