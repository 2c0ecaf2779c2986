use log::{info, warn};

use crate::input::{KeyCode, NamedKey};
use crate::panel::{ControlKind, ParameterPanel, HELPERS_VISIBLE};
use crate::scene::SceneGraph;

/// Steps applied by one nudge while Shift is held.
const FAST_STEPS: i32 = 10;

/// Keyboard surface over the parameter panel.
///
/// Up/Down walk the controls, Left/Right nudge numbers, Space/Enter flip
/// toggles and `H` flips helper visibility from anywhere.
#[derive(Debug, Default)]
pub struct PanelKeys {
    selected: usize,
}

impl PanelKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the selected control, if the panel has any.
    pub fn selected<'a>(&self, panel: &'a ParameterPanel) -> Option<&'a str> {
        panel
            .controls()
            .get(self.selected)
            .map(|control| control.name.as_str())
    }

    /// One-line description of the selection, used for the window title.
    pub fn status(&self, panel: &ParameterPanel) -> String {
        match panel.controls().get(self.selected) {
            Some(control) => format!("{} = {}", control.name, control.value()),
            None => String::from("no controls"),
        }
    }

    /// Handles a key press. Returns true when the panel state or selection changed.
    pub fn handle(
        &mut self,
        key: KeyCode,
        shift: bool,
        panel: &mut ParameterPanel,
        scene: &mut SceneGraph,
    ) -> bool {
        let count = panel.len();
        if count == 0 {
            return false;
        }
        self.selected = self.selected.min(count - 1);
        let steps = if shift { FAST_STEPS } else { 1 };
        let Some(name) = self.selected(panel).map(str::to_owned) else {
            return false;
        };

        let outcome = match key {
            KeyCode::Named(NamedKey::Up) => {
                self.selected = (self.selected + count - 1) % count;
                info!("selected {}", self.status(panel));
                return true;
            }
            KeyCode::Named(NamedKey::Down) => {
                self.selected = (self.selected + 1) % count;
                info!("selected {}", self.status(panel));
                return true;
            }
            KeyCode::Named(NamedKey::Left) => panel.nudge(&name, -steps, scene),
            KeyCode::Named(NamedKey::Right) => panel.nudge(&name, steps, scene),
            KeyCode::Named(NamedKey::Space | NamedKey::Enter) => {
                match panel.control(&name).map(|control| control.kind) {
                    Some(ControlKind::Toggle) => panel.toggle(&name, scene),
                    _ => return false,
                }
            }
            KeyCode::Character('H') => panel.toggle(HELPERS_VISIBLE, scene),
            _ => return false,
        };

        match outcome {
            Ok(_) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }
}
