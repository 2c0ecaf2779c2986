use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::helper::Helper;
use crate::light::{Light, LightKind};

/// Surface parameters evaluated by the physically based shading path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 0.4,
            metalness: 0.2,
        }
    }
}

/// Handle to the one material instance shared by every solid.
///
/// Cloning the handle aliases the material: a write through any clone is seen
/// by all objects that hold it on the next frame.
#[derive(Debug, Clone, Default)]
pub struct SharedMaterial(Arc<RwLock<Material>>);

impl SharedMaterial {
    pub fn new(material: Material) -> Self {
        Self(Arc::new(RwLock::new(material)))
    }

    /// Copies the current parameters out of the shared instance.
    pub fn get(&self) -> Material {
        *self.0.read()
    }

    pub fn update<R>(&self, updater: impl FnOnce(&mut Material) -> R) -> R {
        updater(&mut self.0.write())
    }

    pub fn same_instance(&self, other: &SharedMaterial) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Analytic mesh families the gallery knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cube {
        size: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

/// Renderable solid placed in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub geometry: Geometry,
    pub material: SharedMaterial,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Whether the frame loop animates this object.
    pub spins: bool,
}

impl SceneObject {
    pub fn new(name: &str, geometry: Geometry, material: &SharedMaterial) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material: material.clone(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            spins: false,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Owns every solid, light and helper. Traversed by the renderer each frame.
///
/// Holds at most one light and one helper per [`LightKind`].
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    helpers: Vec<Helper>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the four solids of the gallery around one shared material.
    pub fn with_default_solids() -> Self {
        let mut scene = Self::new();
        let material = SharedMaterial::new(Material::default());

        let mut sphere = SceneObject::new(
            "sphere",
            Geometry::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            &material,
        );
        sphere.position.x = -1.5;
        sphere.spins = true;

        let mut cube = SceneObject::new("cube", Geometry::Cube { size: 0.75 }, &material);
        cube.spins = true;

        let mut torus = SceneObject::new(
            "torus",
            Geometry::Torus {
                radius: 0.3,
                tube: 0.2,
                radial_segments: 32,
                tubular_segments: 64,
            },
            &material,
        );
        torus.position.x = 1.5;
        torus.spins = true;

        let mut plane = SceneObject::new(
            "plane",
            Geometry::Plane {
                width: 5.0,
                height: 5.0,
            },
            &material,
        );
        plane.rotation.x = -FRAC_PI_2;
        plane.position.y = -0.65;

        for object in [sphere, cube, torus, plane] {
            scene.add_object(object);
        }
        scene
    }

    /// Adds an object, replacing any existing object with the same name.
    pub fn add_object(&mut self, object: SceneObject) -> Option<SceneObject> {
        match self.objects.iter_mut().find(|o| o.name == object.name) {
            Some(existing) => Some(std::mem::replace(existing, object)),
            None => {
                self.objects.push(object);
                None
            }
        }
    }

    pub fn remove_object(&mut self, name: &str) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.name == name)?;
        Some(self.objects.remove(index))
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    /// Adds a light, replacing the previous light of the same kind.
    pub fn add_light(&mut self, light: Light) -> Option<Light> {
        match self.lights.iter_mut().find(|l| l.kind() == light.kind()) {
            Some(existing) => Some(std::mem::replace(existing, light)),
            None => {
                self.lights.push(light);
                None
            }
        }
    }

    pub fn remove_light(&mut self, kind: LightKind) -> Option<Light> {
        let index = self.lights.iter().position(|l| l.kind() == kind)?;
        Some(self.lights.remove(index))
    }

    pub fn light(&self, kind: LightKind) -> Option<&Light> {
        self.lights.iter().find(|l| l.kind() == kind)
    }

    pub fn light_mut(&mut self, kind: LightKind) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.kind() == kind)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Adds a helper, replacing the previous helper bound to the same light kind.
    pub fn add_helper(&mut self, helper: Helper) -> Option<Helper> {
        match self.helpers.iter_mut().find(|h| h.kind() == helper.kind()) {
            Some(existing) => Some(std::mem::replace(existing, helper)),
            None => {
                self.helpers.push(helper);
                None
            }
        }
    }

    pub fn remove_helper(&mut self, kind: LightKind) -> Option<Helper> {
        let index = self.helpers.iter().position(|h| h.kind() == kind)?;
        Some(self.helpers.remove(index))
    }

    pub fn helper(&self, kind: LightKind) -> Option<&Helper> {
        self.helpers.iter().find(|h| h.kind() == kind)
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn helpers_mut(&mut self) -> impl Iterator<Item = &mut Helper> {
        self.helpers.iter_mut()
    }

    /// Recomputes every helper that does not track its light on its own.
    pub fn refresh_helpers(&mut self) {
        let lights = &self.lights;
        for helper in self.helpers.iter_mut().filter(|h| h.needs_refresh()) {
            if let Some(light) = lights.iter().find(|l| l.kind() == helper.kind()) {
                helper.refresh(light);
            }
        }
    }
}
