use std::io::{self, Write};

use anyhow::{Context, Result};
use glam::Vec2;
use log::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::config::{Settings, WINDOW_TITLE};
use crate::frame::{FrameLoop, ManualClock, SystemClock};
use crate::input::{wheel_steps, KeyCode, MouseButton, NamedKey, PointerState};
use crate::keys::PanelKeys;
use crate::light::install_lights;
use crate::panel::ParameterPanel;
use crate::render::{GpuRenderer, HeadlessRenderer, RenderBackend};
use crate::scene::SceneGraph;
use crate::viewport::ViewportController;

/// Everything the gallery shows: the scene, its camera and the panel bound to its lights.
#[derive(Debug)]
pub struct Stage {
    pub scene: SceneGraph,
    pub viewport: ViewportController,
    pub panel: ParameterPanel,
}

impl Stage {
    /// Builds the solids, installs the lights and seeds the panel from them.
    pub fn new(settings: &Settings, device_pixel_ratio: f64) -> Result<Self> {
        let mut scene = SceneGraph::with_default_solids();
        install_lights(&mut scene, settings.helpers, settings.helpers_visible);
        let panel = ParameterPanel::for_scene(&scene);
        let viewport = ViewportController::new(settings.width, settings.height, device_pixel_ratio);
        let mut stage = Self {
            scene,
            viewport,
            panel,
        };
        for assignment in &settings.assignments {
            stage
                .panel
                .apply_assignment(assignment, &mut stage.scene)
                .with_context(|| format!("invalid panel edit `{assignment}`"))?;
        }
        Ok(stage)
    }
}

/// Runs `frames` ticks against a fixed-step clock, starting at t = 0.
pub fn run_headless(stage: &mut Stage, frames: u32, time_step: f32) -> Result<HeadlessRenderer> {
    let mut renderer = HeadlessRenderer::new();
    renderer.resize(stage.viewport.render_size());
    let mut frame_loop = FrameLoop::new(ManualClock::new());
    frame_loop.start();
    for frame in 0..frames {
        if frame > 0 {
            frame_loop.clock_mut().advance(time_step);
        }
        frame_loop.tick(&mut stage.scene, &mut stage.viewport, &mut renderer)?;
    }
    frame_loop.stop();
    Ok(renderer)
}

pub fn print_final_state(stage: &Stage, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Final object states:")?;
    for object in stage.scene.objects() {
        let p = object.position;
        let r = object.rotation;
        writeln!(
            out,
            " - {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3})",
            object.name, p.x, p.y, p.z, r.x, r.y, r.z
        )?;
    }
    writeln!(out, "Lights:")?;
    for light in stage.scene.lights() {
        writeln!(
            out,
            " - {} visible={} intensity={:.3}",
            light.kind(),
            light.visible,
            light.intensity
        )?;
    }
    writeln!(out, "Panel:")?;
    for control in stage.panel.controls() {
        writeln!(out, " {} = {}", control.name, control.value())?;
    }
    Ok(())
}

/// winit driver shared by the native window and the web canvas.
pub struct GalleryApp {
    stage: Stage,
    frame_loop: FrameLoop<SystemClock>,
    renderer: GpuRenderer,
    pointer: PointerState,
    keys: PanelKeys,
    error: Option<anyhow::Error>,
}

impl GalleryApp {
    pub fn new(stage: Stage, renderer: GpuRenderer) -> Self {
        let mut frame_loop = FrameLoop::new(SystemClock::start());
        frame_loop.start();
        let app = Self {
            stage,
            frame_loop,
            renderer,
            pointer: PointerState::new(),
            keys: PanelKeys::new(),
            error: None,
        };
        app.refresh_title();
        app
    }

    /// Fatal error that ended the loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    fn refresh_title(&self) {
        let status = self.keys.status(&self.stage.panel);
        self.renderer
            .window()
            .set_title(&format!("{WINDOW_TITLE} | {status}"));
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let scale = self.renderer.window().scale_factor();
        let logical = size.to_logical::<f64>(scale);
        let render_size = self.stage.viewport.on_resize(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale,
        );
        self.renderer.resize(render_size);
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        if key == KeyCode::Named(NamedKey::Escape) {
            self.shutdown(event_loop);
            return;
        }
        let Stage { scene, panel, .. } = &mut self.stage;
        if self.keys.handle(key, self.pointer.shift(), panel, scene) {
            self.refresh_title();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Stage {
            scene, viewport, ..
        } = &mut self.stage;
        if let Err(err) = self.frame_loop.tick(scene, viewport, &mut self.renderer) {
            error!("render failed: {err:?}");
            self.error = Some(err);
            self.shutdown(event_loop);
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.frame_loop.stop();
        event_loop.exit();
    }
}

impl ApplicationHandler for GalleryApp {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        info!("gallery running");
        self.renderer.window().request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if window_id != self.renderer.window_id() {
            return;
        }
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.pointer.set_shift(modifiers.state().shift_key());
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(key) = KeyCode::from_winit(&event.logical_key) {
                    self.handle_key(key, event_loop);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from_winit(button);
                match state {
                    ElementState::Pressed => self.pointer.press(button),
                    ElementState::Released => self.pointer.release(button),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.renderer.window().scale_factor();
                let logical = position.to_logical::<f32>(scale);
                if let Some(delta) = self.pointer.moved(Vec2::new(logical.x, logical.y)) {
                    self.stage.viewport.drag(delta);
                }
            }
            WindowEvent::CursorLeft { .. } => self.pointer.left(),
            WindowEvent::MouseWheel { delta, .. } => {
                self.stage.viewport.zoom(wheel_steps(delta));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.frame_loop.is_running() {
            self.renderer.window().request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightKind;
    use crate::panel::ControlValue;

    #[test]
    fn stage_applies_assignments_through_the_panel() {
        let settings = Settings {
            assignments: vec!["spotIntensity=10".into(), "ambientVisible=false".into()],
            ..Settings::default()
        };
        let stage = Stage::new(&settings, 1.0).unwrap();
        assert_eq!(stage.panel.number("spotIntensity"), Some(8.0));
        assert_eq!(stage.scene.light(LightKind::Spot).unwrap().intensity, 8.0);
        let ambient = stage.scene.light(LightKind::Ambient).unwrap();
        assert!(!ambient.visible);
        assert_eq!(ambient.intensity, 0.3);
    }

    #[test]
    fn bad_assignment_fails_startup() {
        let settings = Settings {
            assignments: vec!["sunIntensity=1".into()],
            ..Settings::default()
        };
        let err = Stage::new(&settings, 1.0).unwrap_err();
        assert!(format!("{err:#}").contains("unknown control `sunIntensity`"));
    }

    #[test]
    fn without_helpers_the_toggle_changes_nothing_else() {
        let settings = Settings {
            helpers: false,
            ..Settings::default()
        };
        let mut stage = Stage::new(&settings, 1.0).unwrap();
        assert!(stage.scene.helpers().is_empty());
        let Stage { scene, panel, .. } = &mut stage;
        panel
            .set("helpersVisible", ControlValue::Bool(true), scene)
            .unwrap();
        assert!(scene.helpers().is_empty());
    }

    #[test]
    fn headless_run_advances_a_fixed_step() {
        let mut stage = Stage::new(&Settings::default(), 2.0).unwrap();
        let renderer = run_headless(&mut stage, 3, 2.5).unwrap();
        assert_eq!(renderer.frames(), 3);
        assert_eq!(renderer.size(), (2560, 1440));
        let cube = stage.scene.object("cube").unwrap();
        assert_eq!(cube.rotation.y, 0.2 * 5.0);
        assert_eq!(cube.rotation.x, 0.1 * 5.0);
    }

    #[test]
    fn final_state_lists_objects_lights_and_controls() {
        let mut stage = Stage::new(&Settings::default(), 1.0).unwrap();
        run_headless(&mut stage, 2, 5.0).unwrap();
        let mut out = Vec::new();
        print_final_state(&stage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" - cube pos=(0.00, 0.00, 0.00) rot=(0.500, 1.000, 0.000)"));
        assert!(text.contains(" - spot visible=true intensity=0.700"));
        assert!(text.contains(" helpersVisible = off"));
    }
}
