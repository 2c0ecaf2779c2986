//! Live parameter set bound to light and helper properties.
//!
//! Every control is an entry in an explicit binding table (light kind + field,
//! or the helper visibility toggle). Input is validated, quantized and clamped
//! here, so lights only ever see in-range values.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::PanelError;
use crate::light::{Light, LightKind, LightShape};
use crate::scene::SceneGraph;

pub const HELPERS_VISIBLE: &str = "helpersVisible";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Toggle,
    Range { min: f32, max: f32, step: f32 },
    Color,
}

impl ControlKind {
    fn expected(self) -> &'static str {
        match self {
            ControlKind::Toggle => "boolean",
            ControlKind::Range { .. } => "numeric",
            ControlKind::Color => "color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlValue {
    Bool(bool),
    Number(f32),
    /// Lowercase `#rrggbb`.
    Color(String),
}

impl ControlValue {
    /// Parses CLI style input (`true`, `0.5`, `#ff0000`) for a control of `kind`.
    pub fn parse(kind: ControlKind, text: &str) -> Option<Self> {
        match kind {
            ControlKind::Toggle => match text.trim() {
                "true" | "on" | "1" => Some(Self::Bool(true)),
                "false" | "off" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            ControlKind::Range { .. } => text.trim().parse().ok().map(Self::Number),
            ControlKind::Color => Some(Self::Color(text.trim().to_string())),
        }
    }
}

impl std::fmt::Display for ControlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlValue::Bool(value) => write!(f, "{}", if *value { "on" } else { "off" }),
            ControlValue::Number(value) => write!(f, "{value:.3}"),
            ControlValue::Color(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Light property a control writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    Visible,
    /// Light color; the sky color for hemisphere lights.
    Color,
    GroundColor,
    Intensity,
    Position(Axis),
    Target(Axis),
    Distance,
    Decay,
    Angle,
    Penumbra,
    Width,
    Height,
}

impl LightField {
    fn control_kind(self) -> ControlKind {
        match self {
            LightField::Visible => ControlKind::Toggle,
            LightField::Color | LightField::GroundColor => ControlKind::Color,
            LightField::Intensity => INTENSITY,
            LightField::Position(_) | LightField::Target(_) => POSITION,
            LightField::Distance => DISTANCE,
            LightField::Decay => DECAY,
            LightField::Angle => ANGLE,
            LightField::Penumbra => PENUMBRA,
            LightField::Width | LightField::Height => SIZE,
        }
    }

    /// Reads the field from `light`, or `None` when the light has no such field.
    fn read(self, light: &Light) -> Option<ControlValue> {
        let number = |value: f32| Some(ControlValue::Number(value));
        match (self, &light.shape) {
            (LightField::Visible, _) => Some(ControlValue::Bool(light.visible)),
            (LightField::Color, _) => Some(ControlValue::Color(color::to_hex(light.color))),
            (LightField::Intensity, _) => number(light.intensity),
            (LightField::GroundColor, LightShape::Hemisphere { ground_color, .. }) => {
                Some(ControlValue::Color(color::to_hex(*ground_color)))
            }
            (LightField::Position(axis), _) => {
                light.position().map(|p| axis.get(p)).and_then(number)
            }
            (LightField::Target(axis), _) => light.target().map(|t| axis.get(t)).and_then(number),
            (LightField::Distance, LightShape::Point { distance, .. })
            | (LightField::Distance, LightShape::Spot { distance, .. }) => number(*distance),
            (LightField::Decay, LightShape::Point { decay, .. })
            | (LightField::Decay, LightShape::Spot { decay, .. }) => number(*decay),
            (LightField::Angle, LightShape::Spot { angle, .. }) => number(*angle),
            (LightField::Penumbra, LightShape::Spot { penumbra, .. }) => number(*penumbra),
            (LightField::Width, LightShape::RectArea { width, .. }) => number(*width),
            (LightField::Height, LightShape::RectArea { height, .. }) => number(*height),
            _ => None,
        }
    }

    /// Writes a validated value into `light`. Returns false if the light has no such field.
    fn write(self, light: &mut Light, value: &Sanitized) -> bool {
        match (self, value) {
            (LightField::Visible, Sanitized::Bool(visible)) => {
                light.visible = *visible;
                true
            }
            (LightField::Color, Sanitized::Color(rgb)) => {
                light.color = *rgb;
                true
            }
            (LightField::Intensity, Sanitized::Number(value)) => {
                light.intensity = *value;
                true
            }
            (LightField::Position(axis), Sanitized::Number(value)) => light
                .position_mut()
                .map(|position| axis.set(position, *value))
                .is_some(),
            (LightField::Target(axis), Sanitized::Number(value)) => light
                .target_mut()
                .map(|target| axis.set(target, *value))
                .is_some(),
            (field, value) => write_shape_field(field, &mut light.shape, value),
        }
    }
}

fn write_shape_field(field: LightField, shape: &mut LightShape, value: &Sanitized) -> bool {
    match (field, shape, value) {
        (
            LightField::GroundColor,
            LightShape::Hemisphere { ground_color, .. },
            Sanitized::Color(rgb),
        ) => {
            *ground_color = *rgb;
        }
        (LightField::Distance, LightShape::Point { distance, .. }, Sanitized::Number(v))
        | (LightField::Distance, LightShape::Spot { distance, .. }, Sanitized::Number(v)) => {
            *distance = *v;
        }
        (LightField::Decay, LightShape::Point { decay, .. }, Sanitized::Number(v))
        | (LightField::Decay, LightShape::Spot { decay, .. }, Sanitized::Number(v)) => {
            *decay = *v;
        }
        (LightField::Angle, LightShape::Spot { angle, .. }, Sanitized::Number(v)) => *angle = *v,
        (LightField::Penumbra, LightShape::Spot { penumbra, .. }, Sanitized::Number(v)) => {
            *penumbra = *v;
        }
        (LightField::Width, LightShape::RectArea { width, .. }, Sanitized::Number(v)) => {
            *width = *v;
        }
        (LightField::Height, LightShape::RectArea { height, .. }, Sanitized::Number(v)) => {
            *height = *v;
        }
        _ => return false,
    }
    true
}

const INTENSITY: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 8.0,
    step: 0.01,
};
const POSITION: ControlKind = ControlKind::Range {
    min: -5.0,
    max: 5.0,
    step: 0.01,
};
const DISTANCE: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 20.0,
    step: 0.01,
};
const DECAY: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 4.0,
    step: 0.01,
};
const SIZE: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 5.0,
    step: 0.01,
};
const ANGLE: ControlKind = ControlKind::Range {
    min: 0.0,
    max: FRAC_PI_2,
    step: 0.001,
};
const PENUMBRA: ControlKind = ControlKind::Range {
    min: 0.0,
    max: 1.0,
    step: 0.001,
};

/// Standard control table per light: name suffix and the field it drives.
fn standard_fields(kind: LightKind) -> &'static [(&'static str, LightField)] {
    use Axis::{X, Y, Z};
    use LightField::*;
    match kind {
        LightKind::Ambient => &[("Visible", Visible), ("Color", Color), ("Intensity", Intensity)],
        LightKind::Directional => &[
            ("Visible", Visible),
            ("Color", Color),
            ("Intensity", Intensity),
            ("X", Position(X)),
            ("Y", Position(Y)),
            ("Z", Position(Z)),
        ],
        LightKind::Hemisphere => &[
            ("Visible", Visible),
            ("SkyColor", Color),
            ("GroundColor", GroundColor),
            ("Intensity", Intensity),
        ],
        LightKind::Point => &[
            ("Visible", Visible),
            ("Color", Color),
            ("Intensity", Intensity),
            ("Distance", Distance),
            ("Decay", Decay),
            ("X", Position(X)),
            ("Y", Position(Y)),
            ("Z", Position(Z)),
        ],
        LightKind::RectArea => &[
            ("Visible", Visible),
            ("Color", Color),
            ("Intensity", Intensity),
            ("Width", Width),
            ("Height", Height),
            ("X", Position(X)),
            ("Y", Position(Y)),
            ("Z", Position(Z)),
        ],
        LightKind::Spot => &[
            ("Visible", Visible),
            ("Color", Color),
            ("Intensity", Intensity),
            ("Distance", Distance),
            ("Angle", Angle),
            ("Penumbra", Penumbra),
            ("Decay", Decay),
            ("X", Position(X)),
            ("Y", Position(Y)),
            ("Z", Position(Z)),
            ("TargetX", Target(X)),
            ("TargetY", Target(Y)),
            ("TargetZ", Target(Z)),
        ],
    }
}

/// What a control writes to when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Light(LightKind, LightField),
    /// Fans out to the visibility flag of every helper.
    HelpersVisible,
}

impl Binding {
    fn control_kind(self) -> ControlKind {
        match self {
            Binding::Light(_, field) => field.control_kind(),
            Binding::HelpersVisible => ControlKind::Toggle,
        }
    }

    fn group(self) -> Option<LightKind> {
        match self {
            Binding::Light(kind, _) => Some(kind),
            Binding::HelpersVisible => None,
        }
    }

    fn apply(self, value: &Sanitized, scene: &mut SceneGraph) {
        match (self, value) {
            (Binding::HelpersVisible, Sanitized::Bool(visible)) => {
                for helper in scene.helpers_mut() {
                    helper.visible = *visible;
                }
            }
            (Binding::Light(kind, field), value) => match scene.light_mut(kind) {
                Some(light) => {
                    if !field.write(light, value) {
                        debug!("{kind} light has no {field:?} field");
                    }
                }
                None => debug!("no {kind} light in the scene; edit kept in the panel only"),
            },
            (Binding::HelpersVisible, _) => {}
        }
    }
}

/// Validated form of a control value, ready to be written into a light.
#[derive(Debug, Clone, PartialEq)]
enum Sanitized {
    Bool(bool),
    Number(f32),
    Color(Vec3),
}

impl Sanitized {
    fn stored(&self) -> ControlValue {
        match self {
            Sanitized::Bool(value) => ControlValue::Bool(*value),
            Sanitized::Number(value) => ControlValue::Number(*value),
            Sanitized::Color(rgb) => ControlValue::Color(color::to_hex(*rgb)),
        }
    }
}

/// Snaps `value` to the step grid anchored at `min`, then clamps it to `[min, max]`.
pub fn quantize(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let snapped = if step > 0.0 {
        let steps = ((f64::from(value) - f64::from(min)) / f64::from(step)).round();
        let grid = f64::from(min) + steps * f64::from(step);
        // Values already on the grid are kept bit-exact.
        if (grid - f64::from(value)).abs() <= f64::from(step) * 1e-4 {
            value
        } else {
            grid as f32
        }
    } else {
        value
    };
    snapped.clamp(min, max)
}

fn sanitize(name: &str, kind: ControlKind, value: &ControlValue) -> Result<Sanitized, PanelError> {
    let mismatch = || PanelError::KindMismatch {
        name: name.to_string(),
        expected: kind.expected(),
    };
    match (kind, value) {
        (ControlKind::Toggle, ControlValue::Bool(value)) => Ok(Sanitized::Bool(*value)),
        (ControlKind::Range { min, max, step }, ControlValue::Number(value)) => {
            if !value.is_finite() {
                return Err(PanelError::NotFinite(name.to_string()));
            }
            Ok(Sanitized::Number(quantize(*value, min, max, step)))
        }
        (ControlKind::Color, ControlValue::Color(text)) => {
            color::parse_hex(text).map(Sanitized::Color)
        }
        _ => Err(mismatch()),
    }
}

fn seed(name: &str, kind: ControlKind, value: &ControlValue) -> Result<ControlValue, PanelError> {
    match (kind, value) {
        (ControlKind::Range { min, max, .. }, ControlValue::Number(value)) if value.is_finite() => {
            Ok(ControlValue::Number(value.clamp(min, max)))
        }
        _ => sanitize(name, kind, value).map(|sanitized| sanitized.stored()),
    }
}

/// One declared control and its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub name: String,
    pub kind: ControlKind,
    pub binding: Binding,
    value: ControlValue,
}

impl Control {
    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// Light group the control belongs to; `None` for ungrouped controls.
    pub fn group(&self) -> Option<LightKind> {
        self.binding.group()
    }
}

/// Ordered, uniquely named set of controls.
#[derive(Debug, Default)]
pub struct ParameterPanel {
    controls: Vec<Control>,
    index: HashMap<String, usize>,
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard table, seeded from the live lights and helpers of `scene`.
    pub fn for_scene(scene: &SceneGraph) -> Self {
        let mut panel = Self::new();
        for kind in LightKind::ALL {
            let Some(light) = scene.light(kind) else {
                continue;
            };
            for (suffix, field) in standard_fields(kind) {
                let Some(initial) = field.read(light) else {
                    continue;
                };
                let name = format!("{}{}", kind.key(), suffix);
                if let Err(err) = panel.bind_control(&name, Binding::Light(kind, *field), initial) {
                    debug!("skipping control {name}: {err}");
                }
            }
        }
        let helpers_visible = scene.helpers().iter().any(|helper| helper.visible);
        if let Err(err) = panel.bind_control(
            HELPERS_VISIBLE,
            Binding::HelpersVisible,
            ControlValue::Bool(helpers_visible),
        ) {
            debug!("skipping control {HELPERS_VISIBLE}: {err}");
        }
        panel
    }

    /// Registers a control. The initial value is validated and clamped but not applied.
    ///
    /// Numeric seeds keep their exact value; only edits snap to the step grid.
    pub fn bind_control(
        &mut self,
        name: &str,
        binding: Binding,
        initial: ControlValue,
    ) -> Result<(), PanelError> {
        if self.index.contains_key(name) {
            return Err(PanelError::DuplicateControl(name.to_string()));
        }
        let kind = binding.control_kind();
        let value = seed(name, kind, &initial)?;
        self.index.insert(name.to_string(), self.controls.len());
        self.controls.push(Control {
            name: name.to_string(),
            kind,
            binding,
            value,
        });
        Ok(())
    }

    /// Validates `value`, applies it to the bound light or helpers and stores it.
    ///
    /// Returns the value actually stored, which may be clamped or quantized.
    pub fn set(
        &mut self,
        name: &str,
        value: ControlValue,
        scene: &mut SceneGraph,
    ) -> Result<ControlValue, PanelError> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| PanelError::UnknownControl(name.to_string()))?;
        let control = &mut self.controls[index];
        let sanitized = sanitize(name, control.kind, &value)?;
        control.binding.apply(&sanitized, scene);
        control.value = sanitized.stored();
        info!("{name} = {}", control.value);
        Ok(control.value.clone())
    }

    /// Moves a numeric control by whole steps. The result lands on the step grid.
    pub fn nudge(
        &mut self,
        name: &str,
        steps: i32,
        scene: &mut SceneGraph,
    ) -> Result<ControlValue, PanelError> {
        let control = self
            .control(name)
            .ok_or_else(|| PanelError::UnknownControl(name.to_string()))?;
        match (control.kind, control.value.clone()) {
            (ControlKind::Range { step, .. }, ControlValue::Number(current)) => {
                let next = current + step * steps as f32;
                self.set(name, ControlValue::Number(next), scene)
            }
            _ => Err(PanelError::KindMismatch {
                name: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Flips a boolean control.
    pub fn toggle(
        &mut self,
        name: &str,
        scene: &mut SceneGraph,
    ) -> Result<ControlValue, PanelError> {
        match self.value(name).cloned() {
            Some(ControlValue::Bool(current)) => {
                self.set(name, ControlValue::Bool(!current), scene)
            }
            Some(_) => Err(PanelError::KindMismatch {
                name: name.to_string(),
                expected: ControlKind::Toggle.expected(),
            }),
            None => Err(PanelError::UnknownControl(name.to_string())),
        }
    }

    /// Applies `name=value` text, as given on the command line.
    pub fn apply_assignment(
        &mut self,
        assignment: &str,
        scene: &mut SceneGraph,
    ) -> Result<ControlValue, PanelError> {
        let (name, text) = assignment
            .split_once('=')
            .ok_or_else(|| PanelError::UnknownControl(assignment.to_string()))?;
        let name = name.trim();
        let kind = self
            .control(name)
            .map(|control| control.kind)
            .ok_or_else(|| PanelError::UnknownControl(name.to_string()))?;
        let value = ControlValue::parse(kind, text).ok_or_else(|| PanelError::KindMismatch {
            name: name.to_string(),
            expected: kind.expected(),
        })?;
        self.set(name, value, scene)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.index.get(name).map(|&index| &self.controls[index])
    }

    pub fn value(&self, name: &str) -> Option<&ControlValue> {
        self.control(name).map(Control::value)
    }

    pub fn number(&self, name: &str) -> Option<f32> {
        match self.value(name)? {
            ControlValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Controls of one light group, in declaration order.
    pub fn group(&self, kind: LightKind) -> impl Iterator<Item = &Control> {
        self.controls
            .iter()
            .filter(move |control| control.group() == Some(kind))
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::install_lights;
    use approx::assert_relative_eq;

    fn stage() -> (SceneGraph, ParameterPanel) {
        let mut scene = SceneGraph::with_default_solids();
        install_lights(&mut scene, true, false);
        let panel = ParameterPanel::for_scene(&scene);
        (scene, panel)
    }

    #[test]
    fn table_is_seeded_from_live_lights() {
        let (_, panel) = stage();
        assert_eq!(panel.number("spotIntensity"), Some(0.7));
        assert_eq!(panel.number("pointDistance"), Some(5.0));
        assert_eq!(
            panel.value("hemisphereGroundColor"),
            Some(&ControlValue::Color("#ff8800".into()))
        );
        assert_eq!(
            panel.value("rectAreaColor"),
            Some(&ControlValue::Color("#4e00ff".into()))
        );
        assert_eq!(panel.value(HELPERS_VISIBLE), Some(&ControlValue::Bool(false)));
        assert_eq!(panel.group(LightKind::Spot).count(), 13);
        assert!(panel.controls().iter().filter(|c| c.group().is_none()).count() == 1);
    }

    #[test]
    fn seeds_hold_the_exact_light_values() {
        let (scene, panel) = stage();
        for control in panel.controls() {
            let Binding::Light(kind, field) = control.binding else {
                continue;
            };
            let light = scene.light(kind).unwrap();
            assert_eq!(field.read(light).as_ref(), Some(control.value()), "{}", control.name);
        }
        assert_eq!(panel.number("spotAngle"), Some(std::f32::consts::PI / 8.0));
    }

    #[test]
    fn seeds_are_clamped_but_not_snapped() {
        let mut panel = ParameterPanel::new();
        panel
            .bind_control(
                "spotIntensity",
                Binding::Light(LightKind::Spot, LightField::Intensity),
                ControlValue::Number(9.0),
            )
            .unwrap();
        panel
            .bind_control(
                "pointIntensity",
                Binding::Light(LightKind::Point, LightField::Intensity),
                ControlValue::Number(0.12345),
            )
            .unwrap();
        assert_eq!(panel.number("spotIntensity"), Some(8.0));
        assert_eq!(panel.number("pointIntensity"), Some(0.12345));
        assert_eq!(
            panel.bind_control(
                "pointDecay",
                Binding::Light(LightKind::Point, LightField::Decay),
                ControlValue::Number(f32::NAN),
            ),
            Err(PanelError::NotFinite("pointDecay".into()))
        );
    }

    #[test]
    fn first_nudge_from_an_off_grid_seed_lands_on_the_grid() {
        let (mut scene, mut panel) = stage();
        panel.nudge("spotAngle", 1, &mut scene).unwrap();
        let angle = panel.number("spotAngle").unwrap();
        assert_relative_eq!(angle, 0.394, epsilon = 1e-6);
        match scene.light(LightKind::Spot).unwrap().shape {
            LightShape::Spot { angle: live, .. } => assert_eq!(live, angle),
            _ => unreachable!(),
        }
    }

    #[test]
    fn out_of_range_numbers_are_clamped() {
        let (mut scene, mut panel) = stage();
        let stored = panel
            .set("spotIntensity", ControlValue::Number(10.0), &mut scene)
            .unwrap();
        assert_eq!(stored, ControlValue::Number(8.0));
        assert_eq!(scene.light(LightKind::Spot).unwrap().intensity, 8.0);

        panel
            .set("spotPenumbra", ControlValue::Number(-2.0), &mut scene)
            .unwrap();
        assert_eq!(panel.number("spotPenumbra"), Some(0.0));

        panel
            .set("spotAngle", ControlValue::Number(3.0), &mut scene)
            .unwrap();
        assert_eq!(panel.number("spotAngle"), Some(FRAC_PI_2));
    }

    #[test]
    fn numbers_snap_to_the_step_grid() {
        assert_relative_eq!(quantize(0.123, 0.0, 8.0, 0.01), 0.12, epsilon = 1e-6);
        assert_relative_eq!(quantize(-4.996, -5.0, 5.0, 0.01), -5.0, epsilon = 1e-6);
        assert_eq!(quantize(0.3333, 0.0, 1.0, 0.0), 0.3333);
    }

    #[test]
    fn rejected_input_never_reaches_the_light() {
        let (mut scene, mut panel) = stage();
        let before = scene.light(LightKind::Point).unwrap().clone();

        assert_eq!(
            panel.set("pointIntensity", ControlValue::Number(f32::NAN), &mut scene),
            Err(PanelError::NotFinite("pointIntensity".into()))
        );
        assert!(matches!(
            panel.set("pointColor", ControlValue::Color("blue".into()), &mut scene),
            Err(PanelError::InvalidColor(_))
        ));
        assert!(matches!(
            panel.set("pointVisible", ControlValue::Number(1.0), &mut scene),
            Err(PanelError::KindMismatch { .. })
        ));
        assert!(matches!(
            panel.set("pointWidth", ControlValue::Number(1.0), &mut scene),
            Err(PanelError::UnknownControl(_))
        ));
        assert_eq!(scene.light(LightKind::Point).unwrap(), &before);
    }

    #[test]
    fn visibility_toggle_restores_the_exact_state() {
        let (mut scene, mut panel) = stage();
        for kind in LightKind::ALL {
            let before = scene.light(kind).unwrap().clone();
            let name = format!("{}Visible", kind.key());
            panel.set(&name, ControlValue::Bool(false), &mut scene).unwrap();
            let hidden = scene.light(kind).unwrap();
            assert!(!hidden.visible);
            assert_eq!(hidden.intensity, before.intensity);
            assert_eq!(hidden.shape, before.shape);
            panel.set(&name, ControlValue::Bool(true), &mut scene).unwrap();
            assert_eq!(scene.light(kind).unwrap(), &before);
        }
    }

    #[test]
    fn helpers_toggle_touches_only_helpers() {
        let (mut scene, mut panel) = stage();
        let lights_before = scene.lights().to_vec();
        let rotations: Vec<_> = scene.objects().iter().map(|o| o.rotation).collect();

        for _ in 0..2 {
            panel
                .set(HELPERS_VISIBLE, ControlValue::Bool(true), &mut scene)
                .unwrap();
            assert_eq!(scene.helpers().len(), 5);
            assert!(scene.helpers().iter().all(|h| h.visible));
        }
        assert_eq!(scene.lights(), lights_before.as_slice());
        let after: Vec<_> = scene.objects().iter().map(|o| o.rotation).collect();
        assert_eq!(after, rotations);

        panel.toggle(HELPERS_VISIBLE, &mut scene).unwrap();
        assert!(scene.helpers().iter().all(|h| !h.visible));
    }

    #[test]
    fn color_controls_fan_out_to_all_channels() {
        let (mut scene, mut panel) = stage();
        panel
            .set("hemisphereGroundColor", ControlValue::Color("#102030".into()), &mut scene)
            .unwrap();
        panel
            .set("hemisphereSkyColor", ControlValue::Color("FFFFFF".into()), &mut scene)
            .unwrap();
        let hemi = scene.light(LightKind::Hemisphere).unwrap();
        assert_eq!(hemi.color, Vec3::ONE);
        match hemi.shape {
            LightShape::Hemisphere { ground_color, .. } => {
                assert_eq!(ground_color, color::from_hex(0x102030))
            }
            _ => unreachable!(),
        }
        assert_eq!(
            panel.value("hemisphereSkyColor"),
            Some(&ControlValue::Color("#ffffff".into()))
        );
    }

    #[test]
    fn position_controls_move_lights() {
        let (mut scene, mut panel) = stage();
        panel
            .set("spotTargetX", ControlValue::Number(1.25), &mut scene)
            .unwrap();
        panel.nudge("pointY", 10, &mut scene).unwrap();
        let spot = scene.light(LightKind::Spot).unwrap();
        assert_relative_eq!(spot.target().unwrap().x, 1.25, epsilon = 1e-6);
        let point = scene.light(LightKind::Point).unwrap();
        assert_relative_eq!(point.position().unwrap().y, 1.1, epsilon = 1e-5);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut panel = ParameterPanel::new();
        let binding = Binding::Light(LightKind::Ambient, LightField::Intensity);
        panel
            .bind_control("dim", binding, ControlValue::Number(0.5))
            .unwrap();
        assert_eq!(
            panel.bind_control("dim", binding, ControlValue::Number(0.1)),
            Err(PanelError::DuplicateControl("dim".into()))
        );
        assert_eq!(panel.len(), 1);
    }

    #[test]
    fn assignments_use_the_same_validation() {
        let (mut scene, mut panel) = stage();
        assert_eq!(
            panel.apply_assignment("spotIntensity=10", &mut scene),
            Ok(ControlValue::Number(8.0))
        );
        assert_eq!(
            panel.apply_assignment("ambientVisible=off", &mut scene),
            Ok(ControlValue::Bool(false))
        );
        assert!(panel.apply_assignment("ambientVisible", &mut scene).is_err());
        assert!(panel.apply_assignment("spotAngle=wide", &mut scene).is_err());
    }
}
