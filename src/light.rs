use std::f32::consts::PI;
use std::fmt;

use glam::{Mat3, Quat, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::from_hex;
use crate::helper::Helper;
use crate::scene::SceneGraph;

/// The six illumination models of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Directional,
    Hemisphere,
    Point,
    RectArea,
    Spot,
}

impl LightKind {
    pub const ALL: [LightKind; 6] = [
        LightKind::Ambient,
        LightKind::Directional,
        LightKind::Hemisphere,
        LightKind::Point,
        LightKind::RectArea,
        LightKind::Spot,
    ];

    /// Prefix used for parameter panel control names.
    pub fn key(self) -> &'static str {
        match self {
            LightKind::Ambient => "ambient",
            LightKind::Directional => "directional",
            LightKind::Hemisphere => "hemisphere",
            LightKind::Point => "point",
            LightKind::RectArea => "rectArea",
            LightKind::Spot => "spot",
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Variant-specific light geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightShape {
    Ambient,
    Directional {
        position: Vec3,
        target: Vec3,
    },
    /// The light color is the sky color; `ground_color` lights surfaces facing away
    /// from `position`.
    Hemisphere {
        ground_color: Vec3,
        position: Vec3,
    },
    Point {
        position: Vec3,
        /// Range cutoff, zero means unbounded.
        distance: f32,
        decay: f32,
    },
    /// Emits along its local -Z axis. `orientation` is fixed when the light is built.
    RectArea {
        position: Vec3,
        width: f32,
        height: f32,
        orientation: Quat,
    },
    Spot {
        position: Vec3,
        target: Vec3,
        distance: f32,
        /// Half-angle of the cone in radians.
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    /// Hidden lights contribute nothing on the next render; other fields are kept.
    pub visible: bool,
    pub shape: LightShape,
}

impl Light {
    fn new(color: u32, intensity: f32, shape: LightShape) -> Self {
        Self {
            color: from_hex(color),
            intensity,
            visible: true,
            shape,
        }
    }

    pub fn kind(&self) -> LightKind {
        match self.shape {
            LightShape::Ambient => LightKind::Ambient,
            LightShape::Directional { .. } => LightKind::Directional,
            LightShape::Hemisphere { .. } => LightKind::Hemisphere,
            LightShape::Point { .. } => LightKind::Point,
            LightShape::RectArea { .. } => LightKind::RectArea,
            LightShape::Spot { .. } => LightKind::Spot,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        match self.shape {
            LightShape::Ambient => None,
            LightShape::Directional { position, .. }
            | LightShape::Hemisphere { position, .. }
            | LightShape::Point { position, .. }
            | LightShape::RectArea { position, .. }
            | LightShape::Spot { position, .. } => Some(position),
        }
    }

    pub fn position_mut(&mut self) -> Option<&mut Vec3> {
        match &mut self.shape {
            LightShape::Ambient => None,
            LightShape::Directional { position, .. }
            | LightShape::Hemisphere { position, .. }
            | LightShape::Point { position, .. }
            | LightShape::RectArea { position, .. }
            | LightShape::Spot { position, .. } => Some(position),
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        match self.shape {
            LightShape::Directional { target, .. } | LightShape::Spot { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut Vec3> {
        match &mut self.shape {
            LightShape::Directional { target, .. } | LightShape::Spot { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }

    /// Unit vector the light travels along, for lights that have one.
    pub fn direction(&self) -> Option<Vec3> {
        match self.shape {
            LightShape::Directional { position, target }
            | LightShape::Spot {
                position, target, ..
            } => Some((target - position).normalize_or(Vec3::NEG_Y)),
            LightShape::Hemisphere { position, .. } => Some(-position.normalize_or(Vec3::Y)),
            LightShape::RectArea { orientation, .. } => Some(orientation * Vec3::NEG_Z),
            LightShape::Ambient | LightShape::Point { .. } => None,
        }
    }
}

/// Rotation that points an object's local -Z axis from `eye` toward `target`.
pub fn look_at_rotation(eye: Vec3, target: Vec3) -> Quat {
    let forward = (target - eye).normalize_or(Vec3::NEG_Z);
    let mut right = Vec3::Y.cross(-forward);
    if right.length_squared() < 1e-8 {
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = (-forward).cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
}

/// Builds the six gallery lights with their fixed defaults.
pub fn build_lights() -> Vec<Light> {
    let rect_position = Vec3::new(-1.5, 0.5, 1.5);
    vec![
        Light::new(0xffffff, 0.3, LightShape::Ambient),
        Light::new(
            0xffddaa,
            0.4,
            LightShape::Directional {
                position: Vec3::new(2.0, 2.0, 1.0),
                target: Vec3::ZERO,
            },
        ),
        Light::new(
            0x00aaff,
            0.3,
            LightShape::Hemisphere {
                ground_color: from_hex(0xff8800),
                position: Vec3::Y,
            },
        ),
        Light::new(
            0xffffff,
            0.8,
            LightShape::Point {
                position: Vec3::new(0.0, 1.0, 2.0),
                distance: 5.0,
                decay: 2.0,
            },
        ),
        Light::new(
            0x4e00ff,
            2.0,
            LightShape::RectArea {
                position: rect_position,
                width: 1.0,
                height: 1.0,
                orientation: look_at_rotation(rect_position, Vec3::ZERO),
            },
        ),
        Light::new(
            0x78ff00,
            0.7,
            LightShape::Spot {
                position: Vec3::new(0.0, 3.0, 3.0),
                target: Vec3::new(-0.5, 0.0, 0.0),
                distance: 10.0,
                angle: PI / 8.0,
                penumbra: 0.3,
                decay: 1.0,
            },
        ),
    ]
}

/// Registers the gallery lights, and optionally their helpers, into `scene`.
pub fn install_lights(scene: &mut SceneGraph, with_helpers: bool, helpers_visible: bool) {
    for light in build_lights() {
        if with_helpers {
            if let Some(mut helper) = Helper::for_light(&light) {
                helper.visible = helpers_visible;
                scene.add_helper(helper);
            }
        }
        debug!("installing {} light", light.kind());
        scene.add_light(light);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn builds_one_light_of_each_kind() {
        let lights = build_lights();
        let kinds: Vec<_> = lights.iter().map(Light::kind).collect();
        assert_eq!(kinds, LightKind::ALL);
        assert!(lights.iter().all(|light| light.visible));
    }

    #[test]
    fn spot_defaults_match_the_stage_layout() {
        let lights = build_lights();
        let spot = lights.iter().find(|l| l.kind() == LightKind::Spot).unwrap();
        assert_eq!(spot.color, from_hex(0x78ff00));
        assert_eq!(spot.intensity, 0.7);
        assert_eq!(spot.position(), Some(Vec3::new(0.0, 3.0, 3.0)));
        assert_eq!(spot.target(), Some(Vec3::new(-0.5, 0.0, 0.0)));
        match spot.shape {
            LightShape::Spot {
                distance,
                angle,
                penumbra,
                decay,
                ..
            } => {
                assert_eq!(distance, 10.0);
                assert_relative_eq!(angle, PI / 8.0);
                assert_eq!(penumbra, 0.3);
                assert_eq!(decay, 1.0);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn rect_area_faces_the_origin_once() {
        let mut lights = build_lights();
        let rect = lights
            .iter_mut()
            .find(|l| l.kind() == LightKind::RectArea)
            .unwrap();
        let expected = (Vec3::ZERO - Vec3::new(-1.5, 0.5, 1.5)).normalize();
        let facing = rect.direction().unwrap();
        assert_relative_eq!(facing.dot(expected), 1.0, epsilon = 1e-5);

        *rect.position_mut().unwrap() = Vec3::new(3.0, 3.0, 3.0);
        assert_relative_eq!(rect.direction().unwrap().dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn install_registers_lights_and_five_helpers() {
        let mut scene = SceneGraph::new();
        install_lights(&mut scene, true, false);
        assert_eq!(scene.lights().len(), 6);
        assert_eq!(scene.helpers().len(), 5);
        assert!(scene.helper(LightKind::Ambient).is_none());
        assert!(scene.helpers().iter().all(|h| !h.visible));

        let mut bare = SceneGraph::new();
        install_lights(&mut bare, false, false);
        assert!(bare.helpers().is_empty());
    }

    #[test]
    fn look_at_handles_straight_down() {
        let rotation = look_at_rotation(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        let facing = rotation * Vec3::NEG_Z;
        assert_relative_eq!(facing.y, -1.0, epsilon = 1e-5);
    }
}
