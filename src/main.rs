use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::Window;

use light_gallery::{
    print_final_state, run_headless, GalleryApp, GpuRenderer, InitError, Settings, Stage,
    WINDOW_TITLE,
};

/// Interactive showcase of six real-time light models.
#[derive(Parser, Debug)]
#[command(name = "light-gallery", version, about)]
struct Cli {
    /// Window width in logical pixels
    #[arg(long, default_value_t = light_gallery::config::DEFAULT_WIDTH)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = light_gallery::config::DEFAULT_HEIGHT)]
    height: u32,

    /// Do not build the light helpers
    #[arg(long)]
    no_helpers: bool,

    /// Start with the light helpers visible
    #[arg(long, conflicts_with = "no_helpers")]
    show_helpers: bool,

    /// Run without a window and print the final scene state
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 1, requires = "headless")]
    frames: u32,

    /// Seconds between headless frames
    #[arg(long, default_value_t = 1.0 / 60.0, requires = "headless")]
    time_step: f32,

    /// Panel edit applied at startup, e.g. `spotIntensity=2` (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            width: self.width,
            height: self.height,
            helpers: !self.no_helpers,
            helpers_visible: self.show_helpers,
            assignments: self.assignments.clone(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();

    if cli.headless {
        let mut stage = Stage::new(&settings, 1.0)?;
        let renderer = run_headless(&mut stage, cli.frames, cli.time_step)?;
        println!("Rendered {} headless frame(s)", renderer.frames());
        if let Some(frame) = renderer.last_frame() {
            println!(
                "Last frame: {} objects, {} lights, {} helper segments",
                frame.objects, frame.visible_lights, frame.helper_segments
            );
        }
        print_final_state(&stage, &mut std::io::stdout().lock())?;
        return Ok(());
    }

    run_interactive(&settings)
}

#[allow(deprecated)]
fn run_interactive(settings: &Settings) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| InitError::missing("event loop", panic_message(panic)))?
        .map_err(|err| InitError::missing("event loop", err))?;

    let attributes = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(settings.width, settings.height));
    let window = Arc::new(
        event_loop
            .create_window(attributes)
            .map_err(|err| InitError::missing("window", err))?,
    );

    let stage = Stage::new(settings, window.scale_factor())?;
    let renderer = block_on(GpuRenderer::new(
        Arc::clone(&window),
        stage.viewport.render_size(),
    ))?;

    let mut app = GalleryApp::new(stage, renderer);
    event_loop.run_app(&mut app)?;
    info!("rendered {} frames", app.frames());

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}
