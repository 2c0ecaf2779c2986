#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use anyhow::Result;
use log::{debug, trace};

use crate::render::RenderBackend;
use crate::scene::SceneGraph;
use crate::viewport::ViewportController;

/// Rotation speed of the animated solids around Y, in radians per second.
pub const SPIN_Y: f32 = 0.2;
/// Rotation speed of the animated solids around X, in radians per second.
pub const SPIN_X: f32 = 0.1;

/// Monotonic source of elapsed seconds since the clock started.
pub trait Clock {
    fn elapsed(&self) -> f32;
}

/// Wall clock started on construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
    #[cfg(target_arch = "wasm32")]
    start_ms: f64,
}

impl SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn start() -> Self {
        Self {
            start_ms: performance_now(),
        }
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed(&self) -> f32 {
        ((performance_now() - self.start_ms).max(0.0) / 1000.0) as f32
    }
}

#[cfg(target_arch = "wasm32")]
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}

/// Clock advanced explicitly. Used for fixed-step headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward; negative steps are ignored so time never runs backwards.
    pub fn advance(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds > 0.0 {
            self.now += seconds;
        }
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Sets the spin of every animated solid for elapsed time `t`.
pub fn animate_solids(scene: &mut SceneGraph, t: f32) {
    for object in scene.objects_mut().filter(|object| object.spins) {
        object.rotation.y = SPIN_Y * t;
        object.rotation.x = SPIN_X * t;
    }
}

/// Per-refresh callback driving animation, helpers, camera damping and rendering.
///
/// The loop does not schedule itself: the driver asks for another tick while
/// [`FrameLoop::is_running`] holds.
#[derive(Debug)]
pub struct FrameLoop<C> {
    clock: C,
    state: LoopState,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            debug!("frame loop started");
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            debug!("frame loop stopped after {} frames", self.frames);
            self.state = LoopState::Idle;
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Runs one frame. Does nothing while idle.
    ///
    /// Returns whether a frame was produced.
    pub fn tick(
        &mut self,
        scene: &mut SceneGraph,
        viewport: &mut ViewportController,
        renderer: &mut dyn RenderBackend,
    ) -> Result<bool> {
        if !self.is_running() {
            return Ok(false);
        }
        let t = self.clock.elapsed();
        animate_solids(scene, t);
        scene.refresh_helpers();
        viewport.update_controls();
        renderer.render(scene, viewport.camera())?;
        self.frames += 1;
        trace!("frame {} at t={t:.3}", self.frames);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{install_lights, LightKind};
    use crate::render::HeadlessRenderer;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn solids() -> SceneGraph {
        let mut scene = SceneGraph::with_default_solids();
        install_lights(&mut scene, true, true);
        scene
    }

    #[test]
    fn rotation_is_a_pure_function_of_time() {
        let mut scene = solids();
        for t in [0.0_f32, 0.5, 5.0, 123.25] {
            animate_solids(&mut scene, t);
            for name in ["sphere", "cube", "torus"] {
                let rotation = scene.object(name).unwrap().rotation;
                assert_eq!(rotation.y, 0.2 * t);
                assert_eq!(rotation.x, 0.1 * t);
            }
        }
        let plane = scene.object("plane").unwrap();
        assert_relative_eq!(plane.rotation.x, -std::f32::consts::FRAC_PI_2);
        assert_eq!(plane.rotation.y, 0.0);
    }

    #[test]
    fn idle_loop_does_not_tick() {
        let mut scene = solids();
        let mut viewport = ViewportController::new(640, 480, 1.0);
        let mut renderer = HeadlessRenderer::new();
        let mut frame_loop = FrameLoop::new(ManualClock::new());
        assert_eq!(frame_loop.state(), LoopState::Idle);
        assert!(!frame_loop
            .tick(&mut scene, &mut viewport, &mut renderer)
            .unwrap());
        assert_eq!(renderer.frames(), 0);

        frame_loop.start();
        frame_loop.start();
        assert!(frame_loop
            .tick(&mut scene, &mut viewport, &mut renderer)
            .unwrap());
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn scenario_from_start_to_five_seconds() {
        let mut scene = solids();
        let mut viewport = ViewportController::new(640, 480, 1.0);
        let mut renderer = HeadlessRenderer::new();
        let mut frame_loop = FrameLoop::new(ManualClock::new());
        frame_loop.start();

        frame_loop
            .tick(&mut scene, &mut viewport, &mut renderer)
            .unwrap();
        assert_eq!(scene.object("cube").unwrap().rotation, Vec3::ZERO);

        frame_loop.clock_mut().advance(5.0);
        frame_loop
            .tick(&mut scene, &mut viewport, &mut renderer)
            .unwrap();
        let cube = scene.object("cube").unwrap();
        assert_relative_eq!(cube.rotation.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(cube.rotation.x, 0.5, epsilon = 1e-6);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn tick_refreshes_the_spot_helper() {
        let mut scene = solids();
        let mut viewport = ViewportController::new(640, 480, 1.0);
        let mut renderer = HeadlessRenderer::new();
        let mut frame_loop = FrameLoop::new(ManualClock::new());
        frame_loop.start();

        let moved = Vec3::new(1.0, 4.0, -1.0);
        *scene
            .light_mut(LightKind::Spot)
            .unwrap()
            .position_mut()
            .unwrap() = moved;
        let spot = scene.light(LightKind::Spot).unwrap().clone();
        let stale = scene.helper(LightKind::Spot).unwrap().segments(&spot);
        assert!(!stale.iter().any(|s| s.start == moved));

        frame_loop
            .tick(&mut scene, &mut viewport, &mut renderer)
            .unwrap();
        let fresh = scene.helper(LightKind::Spot).unwrap().segments(&spot);
        assert!(fresh.iter().any(|s| s.start == moved));
    }

    #[test]
    fn manual_clock_never_runs_backwards() {
        let mut clock = ManualClock::new();
        clock.advance(1.5);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed(), 1.5);
    }
}
