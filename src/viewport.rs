use glam::Vec2;

use crate::camera::{Camera, OrbitControls};

/// Upper bound applied to the device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Owns the camera and its orbit controls and keeps them in step with the viewport.
#[derive(Debug, Clone)]
pub struct ViewportController {
    camera: Camera,
    controls: OrbitControls,
    size: (u32, u32),
    pixel_ratio: f64,
}

impl ViewportController {
    /// `width`/`height` are logical (CSS) pixels.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let mut controller = Self {
            camera: Camera::default(),
            controls: OrbitControls::new(),
            size: (1, 1),
            pixel_ratio: 1.0,
        };
        controller.on_resize(width, height, device_pixel_ratio);
        controller
    }

    /// Applies a new viewport size and returns the render target size in physical pixels.
    pub fn on_resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> (u32, u32) {
        self.size = (width.max(1), height.max(1));
        self.pixel_ratio = clamp_pixel_ratio(device_pixel_ratio);
        self.camera.aspect = self.size.0 as f32 / self.size.1 as f32;
        self.camera.update_projection();
        self.render_size()
    }

    /// Size of the render target in physical pixels.
    pub fn render_size(&self) -> (u32, u32) {
        let scale = |value: u32| ((f64::from(value) * self.pixel_ratio).round() as u32).max(1);
        (scale(self.size.0), scale(self.size.1))
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Forwards a pointer drag measured in logical pixels.
    pub fn drag(&mut self, delta: Vec2) {
        let height = self.size.1 as f32;
        self.controls.drag(delta, height);
    }

    pub fn zoom(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    /// Per-frame orbit update.
    pub fn update_controls(&mut self) {
        self.controls.update(&mut self.camera);
    }
}

fn clamp_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect_and_target_size() {
        let mut viewport = ViewportController::new(800, 600, 1.0);
        let size = viewport.on_resize(1280, 720, 1.5);
        assert_eq!(size, (1920, 1080));
        assert_eq!(viewport.camera().aspect, 1280.0 / 720.0);
    }

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        let mut viewport = ViewportController::new(100, 100, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.render_size(), (200, 200));
        viewport.on_resize(100, 100, f64::NAN);
        assert_eq!(viewport.pixel_ratio(), 1.0);
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let mut viewport = ViewportController::new(640, 480, 2.0);
        let first = viewport.on_resize(1024, 768, 2.0);
        let camera = viewport.camera().clone();
        let second = viewport.on_resize(1024, 768, 2.0);
        assert_eq!(first, second);
        assert_eq!(viewport.camera(), &camera);
    }

    #[test]
    fn zero_sized_viewports_are_clamped() {
        let mut viewport = ViewportController::new(0, 0, 1.0);
        assert_eq!(viewport.size(), (1, 1));
        assert_eq!(viewport.on_resize(300, 0, 1.0), (300, 1));
        assert_eq!(viewport.camera().aspect, 300.0);
    }
}
