//! Error types for generation dispatch and assembly.

use thiserror::Error;

use crate::renderers::RenderError;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Project has no scenes to generate")]
    NothingToGenerate,

    #[error("Renderer not available")]
    RendererUnavailable,

    #[error("Operation channel closed before dispatch finished")]
    ChannelClosed,

    #[error("{0} scene(s) have no completed clip")]
    IncompleteGeneration(usize),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
