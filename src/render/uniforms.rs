use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3, Vec4};

use crate::camera::Camera;
use crate::color::srgb_to_linear;
use crate::light::{Light, LightKind, LightShape};
use crate::scene::{SceneGraph, SceneObject};

/// Camera and lighting state shared by every draw of a frame.
///
/// Radiance slots hold linear color premultiplied by intensity; hidden or
/// absent lights pack as zero.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],
    pub hemisphere_sky: [f32; 4],
    pub hemisphere_ground: [f32; 4],
    pub hemisphere_up: [f32; 4],
    pub directional_color: [f32; 4],
    /// Direction the light travels.
    pub directional_direction: [f32; 4],
    pub point_color: [f32; 4],
    /// `w` is the range cutoff.
    pub point_position: [f32; 4],
    /// `x` is the decay exponent.
    pub point_params: [f32; 4],
    pub spot_color: [f32; 4],
    /// `w` is the range cutoff.
    pub spot_position: [f32; 4],
    /// `w` is the decay exponent.
    pub spot_direction: [f32; 4],
    /// `x` is the cosine of the cone edge, `y` the cosine where the penumbra ends.
    pub spot_cone: [f32; 4],
    pub rect_color: [f32; 4],
    pub rect_position: [f32; 4],
    pub rect_normal: [f32; 4],
    /// `x` width, `y` height.
    pub rect_size: [f32; 4],
}

/// Per-object transform and surface parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
    /// `x` roughness, `y` metalness.
    pub surface: [f32; 4],
}

/// Vertex of the helper line list.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

fn radiance(light: &Light) -> Vec3 {
    if light.visible {
        srgb_to_linear(light.color) * light.intensity
    } else {
        Vec3::ZERO
    }
}

fn slot(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

pub fn pack_globals(scene: &SceneGraph, camera: &Camera) -> GlobalUniform {
    let mut uniform = GlobalUniform::zeroed();
    uniform.view_proj = camera.view_proj().to_cols_array_2d();
    uniform.camera_position = slot(camera.position, 1.0);
    uniform.hemisphere_up = slot(Vec3::Y, 0.0);
    uniform.directional_direction = slot(Vec3::NEG_Y, 0.0);
    uniform.spot_direction = slot(Vec3::NEG_Y, 1.0);
    uniform.spot_cone = [1.0, 1.0, 0.0, 0.0];
    uniform.rect_normal = slot(Vec3::NEG_Z, 0.0);

    for light in scene.lights() {
        let color = radiance(light);
        match light.shape {
            LightShape::Ambient => uniform.ambient = slot(color, 0.0),
            LightShape::Directional { .. } => {
                uniform.directional_color = slot(color, 0.0);
                uniform.directional_direction = slot(light.direction().unwrap_or(Vec3::NEG_Y), 0.0);
            }
            LightShape::Hemisphere {
                ground_color,
                position,
            } => {
                uniform.hemisphere_sky = slot(color, 0.0);
                let ground = if light.visible {
                    srgb_to_linear(ground_color) * light.intensity
                } else {
                    Vec3::ZERO
                };
                uniform.hemisphere_ground = slot(ground, 0.0);
                uniform.hemisphere_up = slot(position.normalize_or(Vec3::Y), 0.0);
            }
            LightShape::Point {
                position,
                distance,
                decay,
            } => {
                uniform.point_color = slot(color, 0.0);
                uniform.point_position = slot(position, distance);
                uniform.point_params = [decay, 0.0, 0.0, 0.0];
            }
            LightShape::RectArea {
                position,
                width,
                height,
                ..
            } => {
                uniform.rect_color = slot(color, 0.0);
                uniform.rect_position = slot(position, 1.0);
                uniform.rect_normal = slot(light.direction().unwrap_or(Vec3::NEG_Z), 0.0);
                uniform.rect_size = [width, height, 0.0, 0.0];
            }
            LightShape::Spot {
                position,
                distance,
                angle,
                penumbra,
                decay,
                ..
            } => {
                let outer = angle.cos();
                let inner = (angle * (1.0 - penumbra)).cos().max(outer + 1e-4);
                uniform.spot_color = slot(color, 0.0);
                uniform.spot_position = slot(position, distance);
                uniform.spot_direction = slot(light.direction().unwrap_or(Vec3::NEG_Y), decay);
                uniform.spot_cone = [outer, inner, 0.0, 0.0];
            }
        }
    }
    uniform
}

pub fn pack_object(object: &SceneObject) -> ObjectUniform {
    let model = object.model_matrix();
    let normal = Mat3::from_mat4(model).inverse().transpose();
    let material = object.material.get();
    ObjectUniform {
        model: model.to_cols_array_2d(),
        normal: [
            normal.x_axis.extend(0.0).to_array(),
            normal.y_axis.extend(0.0).to_array(),
            normal.z_axis.extend(0.0).to_array(),
        ],
        color: srgb_to_linear(material.color).extend(1.0).to_array(),
        surface: Vec4::new(material.roughness, material.metalness, 0.0, 0.0).to_array(),
    }
}

/// Line-list vertices for every visible helper, two per segment.
pub fn helper_lines(scene: &SceneGraph) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    for helper in scene.helpers().iter().filter(|helper| helper.visible) {
        let Some(light) = scene.light(helper.kind()) else {
            continue;
        };
        for segment in helper.segments(light) {
            let color = srgb_to_linear(segment.color).to_array();
            vertices.push(LineVertex {
                position: segment.start.to_array(),
                color,
            });
            vertices.push(LineVertex {
                position: segment.end.to_array(),
                color,
            });
        }
    }
    vertices
}

/// Number of lights that contribute to the next frame.
pub(crate) fn visible_lights(scene: &SceneGraph) -> usize {
    LightKind::ALL
        .iter()
        .filter_map(|&kind| scene.light(kind))
        .filter(|light| light.visible && light.intensity > 0.0)
        .count()
}
