use anyhow::Result;
use glam::Mat4;

use super::uniforms::{helper_lines, visible_lights};
use super::RenderBackend;
use crate::camera::Camera;
use crate::scene::SceneGraph;

/// What the last headless frame would have drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub objects: usize,
    pub visible_lights: usize,
    pub helper_segments: usize,
    pub view_proj: Mat4,
}

/// Backend that records frames without touching a GPU.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    size: (u32, u32),
    last: Option<FrameSummary>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last.as_ref()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn resize(&mut self, size: (u32, u32)) {
        self.size = size;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()> {
        self.frames += 1;
        self.last = Some(FrameSummary {
            objects: scene.objects().len(),
            visible_lights: visible_lights(scene),
            helper_segments: helper_lines(scene).len() / 2,
            view_proj: camera.view_proj(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::install_lights;

    #[test]
    fn records_each_frame() {
        let mut scene = SceneGraph::with_default_solids();
        install_lights(&mut scene, true, true);
        let mut renderer = HeadlessRenderer::new();
        renderer.resize((320, 200));
        renderer.render(&scene, &Camera::default()).unwrap();
        renderer.render(&scene, &Camera::default()).unwrap();

        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.size(), (320, 200));
        let summary = renderer.last_frame().unwrap();
        assert_eq!(summary.objects, 4);
        assert_eq!(summary.visible_lights, 6);
        assert!(summary.helper_segments > 0);
    }
}
