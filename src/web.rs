#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys};
use winit::window::Window;

use crate::app::{GalleryApp, Stage};
use crate::config::{Settings, WINDOW_TITLE};
use crate::error::InitError;
use crate::render::GpuRenderer;

/// Selector of the canvas the gallery draws into.
pub const CANVAS_SELECTOR: &str = "canvas.webgl";

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

/// Attaches the gallery to the page's `canvas.webgl` element and starts the frame loop.
#[wasm_bindgen]
pub async fn run(show_helpers: bool) -> Result<(), JsValue> {
    start(show_helpers).await.map_err(|err| {
        let message = format!("Error: {err:?}");
        log::error!("{message}");
        JsValue::from_str(&message)
    })
}

async fn start(show_helpers: bool) -> anyhow::Result<()> {
    let window = web_sys::window().ok_or_else(|| InitError::missing("window", "not in a browser"))?;
    let document = window
        .document()
        .ok_or_else(|| InitError::missing("document", "window has no document"))?;
    let canvas: web_sys::HtmlCanvasElement = document
        .query_selector(CANVAS_SELECTOR)
        .map_err(|_| InitError::missing(CANVAS_SELECTOR, "invalid selector"))?
        .ok_or_else(|| InitError::missing(CANVAS_SELECTOR, "no such element"))?
        .dyn_into()
        .map_err(|_| InitError::missing(CANVAS_SELECTOR, "element is not a canvas"))?;

    let settings = Settings {
        width: canvas.client_width().max(1) as u32,
        height: canvas.client_height().max(1) as u32,
        helpers_visible: show_helpers,
        ..Settings::default()
    };
    let pixel_ratio = window.device_pixel_ratio();

    let event_loop = EventLoop::new().map_err(|err| InitError::missing("event loop", err))?;
    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(
                Window::default_attributes()
                    .with_canvas(Some(canvas))
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(LogicalSize::new(settings.width, settings.height)),
            )
            .map_err(|err| InitError::missing("window", err))?,
    );

    let stage = Stage::new(&settings, pixel_ratio)?;
    let renderer = GpuRenderer::new(Arc::clone(&window), stage.viewport.render_size()).await?;
    log::info!(
        "gallery attached to {CANVAS_SELECTOR} at {}x{}",
        settings.width,
        settings.height
    );

    event_loop.spawn_app(GalleryApp::new(stage, renderer));
    Ok(())
}
