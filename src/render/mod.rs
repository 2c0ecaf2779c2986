mod gpu;
mod headless;
mod shaders;
mod uniforms;

use anyhow::Result;

use crate::camera::Camera;
use crate::scene::SceneGraph;

pub use gpu::GpuRenderer;
pub use headless::{FrameSummary, HeadlessRenderer};
pub use uniforms::{
    helper_lines, pack_globals, pack_object, GlobalUniform, LineVertex, ObjectUniform,
};

/// Draws the scene as seen through a camera into some output surface.
pub trait RenderBackend {
    /// Resizes the output to `size` physical pixels.
    fn resize(&mut self, size: (u32, u32));

    /// Draws one frame. Errors are fatal for the caller.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()>;
}
