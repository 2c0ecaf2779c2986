use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_TITLE: &str = "Light Gallery";

/// Startup options shared by the native, headless and web drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical window size.
    pub width: u32,
    pub height: u32,
    /// Whether helper gizmos are built at all.
    pub helpers: bool,
    /// Initial visibility of the helpers, when built.
    pub helpers_visible: bool,
    /// Panel edits (`name=value`) applied before the first frame.
    pub assignments: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            helpers: true,
            helpers_visible: false,
            assignments: Vec::new(),
        }
    }
}
