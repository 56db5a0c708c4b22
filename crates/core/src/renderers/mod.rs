//! Scene renderer and video assembler abstraction.
//!
//! Real rendering services plug in behind the `SceneRenderer` and
//! `VideoAssembler` traits. The mock implementations drive tests and the
//! CLI's offline mode.

pub mod base;
pub mod mock;

pub use base::{
    AssemblyClip, AssemblyRequest, RenderError, RenderEvent, RenderStream, SceneRenderRequest,
    SceneRenderer, VideoAssembler,
};
pub use mock::{MockAssembler, MockRenderer};
