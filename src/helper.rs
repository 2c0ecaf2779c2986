//! Line gizmos that visualize where a light sits and where it points.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::light::{look_at_rotation, Light, LightKind, LightShape};

const CONE_SEGMENTS: usize = 32;
const UNBOUNDED_CONE_LENGTH: f32 = 1000.0;
const RECT_NORMAL_LENGTH: f32 = 0.25;

/// One line of a helper gizmo in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec3,
}

impl LineSegment {
    fn new(start: Vec3, end: Vec3, color: Vec3) -> Self {
        Self { start, end, color }
    }
}

/// Debug proxy bound to exactly one light.
///
/// Spot helpers cache their cone and only pick up changes on [`Helper::refresh`];
/// every other helper is rebuilt from its light whenever it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Helper {
    kind: LightKind,
    pub visible: bool,
    size: f32,
    cached: Vec<LineSegment>,
}

impl Helper {
    /// Creates the helper for `light`. Ambient lights have none.
    pub fn for_light(light: &Light) -> Option<Self> {
        let size = match light.kind() {
            LightKind::Ambient => return None,
            LightKind::Directional | LightKind::Hemisphere | LightKind::Point => 0.2,
            LightKind::RectArea | LightKind::Spot => 1.0,
        };
        let mut helper = Self {
            kind: light.kind(),
            visible: true,
            size,
            cached: Vec::new(),
        };
        helper.refresh(light);
        Some(helper)
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// True when the gizmo must be refreshed after its light moves or reshapes.
    pub fn needs_refresh(&self) -> bool {
        self.kind == LightKind::Spot
    }

    /// Rebuilds the cached geometry from the current state of `light`.
    pub fn refresh(&mut self, light: &Light) {
        if self.needs_refresh() {
            self.cached = self.build(light);
        }
    }

    /// Lines to draw this frame for the bound `light`.
    pub fn segments(&self, light: &Light) -> Vec<LineSegment> {
        if self.needs_refresh() {
            self.cached.clone()
        } else {
            self.build(light)
        }
    }

    fn build(&self, light: &Light) -> Vec<LineSegment> {
        let color = light.color;
        match light.shape {
            LightShape::Ambient => Vec::new(),
            LightShape::Directional { position, target } => {
                let rotation = look_at_rotation(position, target);
                let side = self.size * 2.0;
                let mut lines = rectangle(position, rotation, side, side, color);
                lines.push(LineSegment::new(position, target, color));
                lines
            }
            LightShape::Hemisphere {
                ground_color,
                position,
            } => octahedron(position, self.size)
                .into_iter()
                .map(|(start, end)| {
                    let upper = start.y > position.y + 1e-6 || end.y > position.y + 1e-6;
                    LineSegment::new(start, end, if upper { color } else { ground_color })
                })
                .collect(),
            LightShape::Point { position, .. } => octahedron(position, self.size)
                .into_iter()
                .map(|(start, end)| LineSegment::new(start, end, color))
                .collect(),
            LightShape::RectArea {
                position,
                width,
                height,
                orientation,
            } => {
                let mut lines = rectangle(position, orientation, width, height, color);
                let normal = orientation * Vec3::NEG_Z;
                lines.push(LineSegment::new(
                    position,
                    position + normal * RECT_NORMAL_LENGTH,
                    color,
                ));
                lines
            }
            LightShape::Spot {
                position,
                target,
                distance,
                angle,
                ..
            } => {
                let length = if distance > 0.0 {
                    distance
                } else {
                    UNBOUNDED_CONE_LENGTH
                };
                let radius = length * angle.tan();
                let rotation = look_at_rotation(position, target);
                let rim = |index: usize| {
                    let theta = TAU * index as f32 / CONE_SEGMENTS as f32;
                    position
                        + rotation
                            * Vec3::new(theta.cos() * radius, theta.sin() * radius, -length)
                };

                let mut lines: Vec<_> = (0..CONE_SEGMENTS)
                    .map(|index| LineSegment::new(rim(index), rim(index + 1), color))
                    .collect();
                for index in (0..CONE_SEGMENTS).step_by(CONE_SEGMENTS / 4) {
                    lines.push(LineSegment::new(position, rim(index), color));
                }
                lines.push(LineSegment::new(position, target, color));
                lines
            }
        }
    }
}

fn rectangle(
    center: Vec3,
    rotation: Quat,
    width: f32,
    height: f32,
    color: Vec3,
) -> Vec<LineSegment> {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let corners = [
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    ]
    .map(|corner| center + rotation * corner);
    (0..4)
        .map(|i| LineSegment::new(corners[i], corners[(i + 1) % 4], color))
        .collect()
}

fn octahedron(center: Vec3, size: f32) -> Vec<(Vec3, Vec3)> {
    let equator = [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z].map(|v| center + v * size);
    let top = center + Vec3::Y * size;
    let bottom = center - Vec3::Y * size;
    let mut edges = Vec::with_capacity(12);
    for i in 0..4 {
        let next = equator[(i + 1) % 4];
        edges.push((equator[i], next));
        edges.push((top, equator[i]));
        edges.push((bottom, equator[i]));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::build_lights;

    fn light(kind: LightKind) -> Light {
        build_lights()
            .into_iter()
            .find(|l| l.kind() == kind)
            .unwrap()
    }

    #[test]
    fn ambient_has_no_helper() {
        assert!(Helper::for_light(&light(LightKind::Ambient)).is_none());
    }

    #[test]
    fn point_helper_tracks_its_light() {
        let mut point = light(LightKind::Point);
        let helper = Helper::for_light(&point).unwrap();
        assert!(!helper.needs_refresh());

        *point.position_mut().unwrap() = Vec3::new(1.0, 1.0, 1.0);
        let segments = helper.segments(&point);
        assert_eq!(segments.len(), 12);
        let centroid = segments
            .iter()
            .fold(Vec3::ZERO, |acc, s| acc + s.start + s.end)
            / (segments.len() * 2) as f32;
        assert!(centroid.distance(Vec3::new(1.0, 1.0, 1.0)) < 0.1);
    }

    #[test]
    fn spot_helper_is_stale_until_refreshed() {
        let mut spot = light(LightKind::Spot);
        let mut helper = Helper::for_light(&spot).unwrap();
        assert!(helper.needs_refresh());
        let before = helper.segments(&spot);

        *spot.position_mut().unwrap() = Vec3::new(2.0, 4.0, 0.0);
        assert_eq!(helper.segments(&spot), before);

        helper.refresh(&spot);
        let after = helper.segments(&spot);
        assert_ne!(after, before);
        assert!(after.iter().any(|s| s.start == Vec3::new(2.0, 4.0, 0.0)));
    }

    #[test]
    fn spot_cone_radius_follows_angle() {
        let spot = light(LightKind::Spot);
        let helper = Helper::for_light(&spot).unwrap();
        let apex = spot.position().unwrap();
        let axis = spot.direction().unwrap();
        let rim = helper.segments(&spot)[0].start;
        let along = (rim - apex).dot(axis);
        let across = ((rim - apex) - axis * along).length();
        assert!((along - 10.0).abs() < 1e-3);
        assert!((across - 10.0 * (std::f32::consts::PI / 8.0).tan()).abs() < 1e-3);
    }

    #[test]
    fn hemisphere_helper_uses_both_colors() {
        let hemi = light(LightKind::Hemisphere);
        let helper = Helper::for_light(&hemi).unwrap();
        let colors: Vec<_> = helper.segments(&hemi).iter().map(|s| s.color).collect();
        assert!(colors.contains(&hemi.color));
        match hemi.shape {
            LightShape::Hemisphere { ground_color, .. } => assert!(colors.contains(&ground_color)),
            _ => unreachable!(),
        }
    }
}
