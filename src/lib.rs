//! Interactive showcase of the six classic real-time light models.
//!
//! Four solids share one physically based material and are lit by ambient,
//! directional, hemisphere, point, rect-area and spot lights. A parameter
//! panel edits the lights in place while an orbit camera looks on. The scene,
//! panel and frame loop are plain data and run without a GPU; the wgpu
//! backend and winit driver sit behind [`render::RenderBackend`] and
//! [`app::GalleryApp`].

pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod helper;
pub mod input;
pub mod keys;
pub mod light;
pub mod panel;
pub mod render;
pub mod scene;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{print_final_state, run_headless, GalleryApp, Stage};
pub use camera::{Camera, OrbitControls};
pub use config::{Settings, WINDOW_TITLE};
pub use error::{InitError, PanelError};
pub use frame::{Clock, FrameLoop, LoopState, ManualClock, SystemClock};
pub use geometry::Mesh;
pub use helper::{Helper, LineSegment};
pub use input::{KeyCode, MouseButton, NamedKey, PointerState};
pub use keys::PanelKeys;
pub use light::{build_lights, install_lights, Light, LightKind, LightShape};
pub use panel::{Binding, ControlKind, ControlValue, LightField, ParameterPanel};
pub use render::{GpuRenderer, HeadlessRenderer, RenderBackend};
pub use scene::{Geometry, Material, SceneGraph, SceneObject, SharedMaterial};
pub use viewport::ViewportController;
