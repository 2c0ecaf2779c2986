use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, NamedKey as WinitKey};

/// Logical key the panel surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphanumeric() => {
                Some(Self::Character(ch.to_ascii_uppercase()))
            }
            _ => None,
        }
    }

    /// Maps a winit logical key; keys the gallery never reacts to map to `None`.
    pub fn from_winit(key: &Key) -> Option<Self> {
        match key {
            Key::Named(named) => {
                let key = match named {
                    WinitKey::Space => NamedKey::Space,
                    WinitKey::Enter => NamedKey::Enter,
                    WinitKey::ArrowLeft => NamedKey::Left,
                    WinitKey::ArrowRight => NamedKey::Right,
                    WinitKey::ArrowUp => NamedKey::Up,
                    WinitKey::ArrowDown => NamedKey::Down,
                    WinitKey::Escape => NamedKey::Escape,
                    _ => return None,
                };
                Some(Self::Named(key))
            }
            Key::Character(text) => Self::from_name(text.as_str()),
            _ => None,
        }
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" | " " => Space,
        "Enter" | "Return" => Enter,
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Up" | "ArrowUp" => Up,
        "Down" | "ArrowDown" => Down,
        "Escape" | "Esc" => Escape,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Escape,
}

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn from_winit(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::LEFT,
            winit::event::MouseButton::Right => Self(2),
            winit::event::MouseButton::Middle => Self(1),
            winit::event::MouseButton::Back => Self(3),
            winit::event::MouseButton::Forward => Self(4),
            winit::event::MouseButton::Other(index) => Self(index.min(u16::from(u8::MAX)) as u8),
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_LINE: f32 = 100.0;

/// Turns raw pointer events into orbit drags and zoom steps.
#[derive(Debug, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    dragging: bool,
    shift: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: MouseButton) {
        if button == MouseButton::LEFT {
            self.dragging = true;
        }
    }

    pub fn release(&mut self, button: MouseButton) {
        if button == MouseButton::LEFT {
            self.dragging = false;
        }
    }

    /// Records the cursor position; returns the drag delta while the left button is held.
    pub fn moved(&mut self, position: Vec2) -> Option<Vec2> {
        let previous = self.position.replace(position);
        match previous {
            Some(previous) if self.dragging => Some(position - previous),
            _ => None,
        }
    }

    /// Cursor left the surface; the next move starts a fresh drag.
    pub fn left(&mut self) {
        self.position = None;
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    pub fn shift(&self) -> bool {
        self.shift
    }
}

/// Converts a wheel event into zoom steps; positive zooms in.
pub fn wheel_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}
