use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::scene::Geometry;

/// Interleaved triangle mesh ready for upload.
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub const STRIDE: usize = 6;

    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Geometry::Cube { size } => cube(size),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments.max(3), tubular_segments.max(3)),
            Geometry::Plane { width, height } => plane(width, height),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Self::STRIDE
    }

    fn push(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
    }

    /// Appends two triangles for the quad `a b c d` (counter-clockwise).
    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push(normal * radius, normal);
        }
    }
    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut mesh = Mesh::default();
    for (normal, right, up) in faces {
        let base = mesh.vertex_count() as u32;
        for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.push((normal + right * sx + up * sy) * h, normal);
        }
        mesh.quad(base, base + 1, base + 2, base + 3);
    }
    mesh
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push(position, (position - center).normalize_or_zero());
        }
    }
    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Plane in the XY plane facing +Z.
fn plane(width: f32, height: f32) -> Mesh {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let mut mesh = Mesh::default();
    for (x, y) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
        mesh.push(Vec3::new(x, y, 0.0), Vec3::Z);
    }
    mesh.quad(0, 1, 2, 3);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mesh: &Mesh) -> impl Iterator<Item = Vec3> + '_ {
        mesh.vertices
            .chunks_exact(Mesh::STRIDE)
            .map(|chunk| Vec3::from_slice(&chunk[..3]))
    }

    fn assert_valid(mesh: &Mesh) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&index| index < count));
        for chunk in mesh.vertices.chunks_exact(Mesh::STRIDE) {
            let normal = Vec3::from_slice(&chunk[3..]);
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mesh = Mesh::from_geometry(&Geometry::Sphere {
            radius: 0.5,
            width_segments: 32,
            height_segments: 32,
        });
        assert_valid(&mesh);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert!(positions(&mesh).all(|p| (p.length() - 0.5).abs() < 1e-5));
    }

    #[test]
    fn cube_has_flat_faces() {
        let mesh = Mesh::from_geometry(&Geometry::Cube { size: 0.75 });
        assert_valid(&mesh);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(positions(&mesh).all(|p| p.abs().max_element() <= 0.375 + 1e-6));
    }

    #[test]
    fn cube_triangles_wind_outward() {
        let mesh = Mesh::from_geometry(&Geometry::Cube { size: 1.0 });
        let verts: Vec<_> = positions(&mesh).collect();
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [
                verts[tri[0] as usize],
                verts[tri[1] as usize],
                verts[tri[2] as usize],
            ];
            let face_normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(face_normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn torus_stays_within_its_tube() {
        let mesh = Mesh::from_geometry(&Geometry::Torus {
            radius: 0.3,
            tube: 0.2,
            radial_segments: 32,
            tubular_segments: 64,
        });
        assert_valid(&mesh);
        assert_eq!(mesh.indices.len(), (32 * 64 * 6) as usize);
        assert!(positions(&mesh).all(|p| p.length() <= 0.5 + 1e-5));
    }

    #[test]
    fn plane_is_a_single_quad() {
        let mesh = Mesh::from_geometry(&Geometry::Plane {
            width: 5.0,
            height: 5.0,
        });
        assert_valid(&mesh);
        assert_eq!(mesh.indices, vec![0, 1, 3, 1, 2, 3]);
    }
}
