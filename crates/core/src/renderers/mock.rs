//! Mock renderer and assembler for tests and offline runs.

use crate::renderers::base::{
    AssemblyRequest, RenderError, RenderEvent, RenderStream, SceneRenderRequest, SceneRenderer,
    VideoAssembler,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    /// Complete every scene with `mock://scenes/<id>.mp4`.
    Succeed,
    /// Fail every scene after reporting progress.
    Fail,
    /// Replay a fixed event sequence for every scene.
    Script(Vec<Result<RenderEvent, RenderError>>),
}

#[derive(Debug, Clone)]
pub struct MockRenderer {
    available: bool,
    behavior: Behavior,
    fail_scenes: HashSet<String>,
    delay: Duration,
}

impl MockRenderer {
    pub fn new(available: bool, events: Vec<Result<RenderEvent, RenderError>>) -> Self {
        Self {
            available,
            behavior: Behavior::Script(events),
            fail_scenes: HashSet::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn success() -> Self {
        Self {
            available: true,
            behavior: Behavior::Succeed,
            fail_scenes: HashSet::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::success()
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::success()
        }
    }

    /// Fail only the listed scenes; every other scene follows the configured
    /// behavior.
    pub fn failing_for<I, S>(mut self, scene_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fail_scenes = scene_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sleep before each emitted event.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn events_for(&self, scene_id: &str) -> Vec<Result<RenderEvent, RenderError>> {
        let failure = || {
            vec![
                Ok(RenderEvent::Processing),
                Err(RenderError::RenderFailed(format!(
                    "mock failure for scene {scene_id}"
                ))),
            ]
        };

        if self.fail_scenes.contains(scene_id) {
            return failure();
        }

        match &self.behavior {
            Behavior::Succeed => vec![
                Ok(RenderEvent::Processing),
                Ok(RenderEvent::Completed {
                    output_url: format!("mock://scenes/{scene_id}.mp4"),
                }),
            ],
            Behavior::Fail => failure(),
            Behavior::Script(events) => events.clone(),
        }
    }
}

#[async_trait]
impl SceneRenderer for MockRenderer {
    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn render(&self, request: &SceneRenderRequest) -> Result<RenderStream, RenderError> {
        if !self.available {
            return Err(RenderError::NotAvailable(
                "Mock renderer not available".to_string(),
            ));
        }

        let events = self.events_for(&request.scene.id);
        let delay = self.delay;
        let stream = async_stream::stream! {
            for event in events {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield event;
            }
        };
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Clone)]
pub struct MockAssembler {
    fail: bool,
}

impl MockAssembler {
    pub fn success() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl VideoAssembler for MockAssembler {
    async fn assemble(&self, request: &AssemblyRequest) -> Result<String, RenderError> {
        if self.fail {
            return Err(RenderError::AssemblyFailed("Mock failure".to_string()));
        }
        let name = request.project_id.as_deref().unwrap_or("untitled");
        Ok(format!(
            "mock://final/{name}-{}-{}.mp4",
            request.clips.len(),
            request.transition
        ))
    }
}
