//! The scene description: materials, planes, spheres and the fixed-capacity
//! `World` that holds them. Treated by the renderer as an immutable input
//! fixture — nothing here mutates once a render starts.

use crate::vecmath::Vec3;

pub const MAX_MATERIALS: usize = 4;
pub const MAX_PLANES: usize = 4;
pub const MAX_SPHERES: usize = 4;

/// Material index 0 is reserved for the sky sentinel: a ray that hits
/// nothing is treated as if it hit material 0, whose emissive colour ends
/// the bounce loop.
pub const SKY_MATERIAL_INDEX: usize = 0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Material {
    pub emissive: Vec3,
    pub reflective: Vec3,
    pub glossiness: f32,
}

impl Material {
    pub const fn sky(emissive: Vec3) -> Self {
        Material { emissive, reflective: Vec3::ZERO, glossiness: 0.0 }
    }

    pub const fn reflective(reflective: Vec3) -> Self {
        Material { emissive: Vec3::ZERO, reflective, glossiness: 0.0 }
    }

    pub const fn glossy(reflective: Vec3, glossiness: f32) -> Self {
        Material { emissive: Vec3::ZERO, reflective, glossiness }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
    pub material_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub field_of_view: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Small fixed-capacity world: at most `MAX_MATERIALS` materials,
/// `MAX_PLANES` planes and `MAX_SPHERES` spheres, plus counts. Fixed-capacity
/// arrays rather than growable storage, since the scene is a small input
/// fixture assembled once and never resized during a render.
#[derive(Debug, Clone, Copy)]
pub struct World {
    pub materials: [Material; MAX_MATERIALS],
    pub materials_count: usize,
    pub planes: [Plane; MAX_PLANES],
    pub planes_count: usize,
    pub spheres: [Sphere; MAX_SPHERES],
    pub spheres_count: usize,
}

impl World {
    pub fn builder() -> WorldBuilder {
        WorldBuilder::new()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials[..self.materials_count]
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes[..self.planes_count]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres[..self.spheres_count]
    }
}

/// Builds a `World` incrementally, panicking if capacity is exceeded — the
/// scene is an input fixture assembled once at startup, not a runtime data
/// structure that needs graceful overflow handling.
pub struct WorldBuilder {
    world: World,
}

impl WorldBuilder {
    pub fn new() -> Self {
        WorldBuilder {
            world: World {
                materials: [Material::default(); MAX_MATERIALS],
                materials_count: 0,
                planes: [Plane { normal: Vec3::UNIT_Z, d: 0.0, material_index: 0 }; MAX_PLANES],
                planes_count: 0,
                spheres: [Sphere { center: Vec3::ZERO, radius: 1.0, material_index: 0 }; MAX_SPHERES],
                spheres_count: 0,
            },
        }
    }

    /// Registers the sky material. Must be called first so it lands at
    /// index 0 (`SKY_MATERIAL_INDEX`).
    pub fn sky(mut self, material: Material) -> Self {
        assert_eq!(self.world.materials_count, 0, "sky material must be registered first");
        self.world.materials[SKY_MATERIAL_INDEX] = material;
        self.world.materials_count = 1;
        self
    }

    /// Registers a material, returning its index for use by planes/spheres.
    pub fn material(mut self, material: Material) -> (Self, usize) {
        let index = self.world.materials_count;
        assert!(index < MAX_MATERIALS, "too many materials for this World's fixed capacity");
        self.world.materials[index] = material;
        self.world.materials_count += 1;
        (self, index)
    }

    pub fn plane(mut self, plane: Plane) -> Self {
        let index = self.world.planes_count;
        assert!(index < MAX_PLANES, "too many planes for this World's fixed capacity");
        self.world.planes[index] = plane;
        self.world.planes_count += 1;
        self
    }

    pub fn sphere(mut self, sphere: Sphere) -> Self {
        let index = self.world.spheres_count;
        assert!(index < MAX_SPHERES, "too many spheres for this World's fixed capacity");
        self.world.spheres[index] = sphere;
        self.world.spheres_count += 1;
        self
    }

    pub fn build(self) -> World {
        self.world
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The hard-coded reference scene rendered by the CLI binary: a floor
/// plane and four spheres over a pale sky.
pub fn reference_scene() -> (Camera, World) {
    let camera = Camera {
        position: Vec3::new(0.0, -5.0, 1.0),
        target: Vec3::ZERO,
        field_of_view: std::f32::consts::FRAC_PI_4,
    };

    let (builder, red) = World::builder()
        .sky(Material::sky(Vec3::new(0.3, 0.4, 0.5)))
        .material(Material::reflective(Vec3::new(0.5, 0.5, 0.5)));
    let (builder, cyan) = builder.material(Material::reflective(Vec3::new(0.7, 0.5, 0.3)));
    let (builder, boyfriend) = builder.material(Material::glossy(Vec3::new(0.7, 0.5, 0.3), 0.7));

    let world = builder
        .plane(Plane { normal: Vec3::UNIT_Z, d: 0.0, material_index: red })
        .sphere(Sphere { center: Vec3::new(1.0, 0.0, 1.0), radius: 1.0, material_index: cyan })
        .sphere(Sphere { center: Vec3::new(-1.0, -2.0, 0.0), radius: 0.5, material_index: boyfriend })
        .sphere(Sphere { center: Vec3::new(-2.0, 3.0, 1.5), radius: 1.0, material_index: boyfriend })
        .sphere(Sphere { center: Vec3::new(1.0, -3.0, 0.5), radius: 0.6, material_index: boyfriend })
        .build();

    (camera, world)
}

/// A minimal single-sphere fixture used by `cast_ray`/tile-renderer tests: a
/// purely reflective unit sphere at `(0, 0, 1)` over the same sky used by
/// the reference scene.
pub fn single_sphere_scene() -> (Camera, World) {
    let camera = Camera {
        position: Vec3::new(0.0, -5.0, 1.0),
        target: Vec3::ZERO,
        field_of_view: std::f32::consts::FRAC_PI_4,
    };

    let (builder, red) = World::builder()
        .sky(Material::sky(Vec3::new(0.3, 0.4, 0.5)))
        .material(Material::reflective(Vec3::new(0.5, 0.5, 0.5)));

    let world = builder
        .sphere(Sphere { center: Vec3::new(0.0, 0.0, 1.0), radius: 1.0, material_index: red })
        .build();

    (camera, world)
}

/// A sky-only fixture: no planes or spheres, just an emissive background.
pub fn sky_only_scene(emissive: Vec3) -> (Camera, World) {
    let camera = Camera {
        position: Vec3::new(0.0, -5.0, 1.0),
        target: Vec3::ZERO,
        field_of_view: std::f32::consts::FRAC_PI_4,
    };

    let world = World::builder().sky(Material::sky(emissive)).build();

    (camera, world)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_has_expected_counts() {
        let (_, world) = reference_scene();
        assert_eq!(world.materials_count, 4);
        assert_eq!(world.planes_count, 1);
        assert_eq!(world.spheres_count, 4);
    }

    #[test]
    fn sky_material_lands_at_index_zero() {
        let (_, world) = reference_scene();
        assert_eq!(world.materials[SKY_MATERIAL_INDEX].emissive, Vec3::new(0.3, 0.4, 0.5));
    }
}
