//! Shading kernel: finds the nearest surface a ray hits, then walks a
//! bounded bounce path accumulating emissive light attenuated by each
//! surface's reflectivity.

use crate::intersect::{intersect_ray_plane, intersect_ray_sphere};
use crate::random::Prng;
use crate::scene::{Material, World, SKY_MATERIAL_INDEX};
use crate::vecmath::Vec3;

/// Bounce budget: the ray is allowed this many reflections before the loop
/// gives up and treats whatever it last hit as terminal.
pub const MAX_BOUNCES: u32 = 4;

struct Hit {
    distance: f32,
    normal: Vec3,
    material_index: usize,
}

fn closest_hit(world: &World, origin: Vec3, direction: Vec3) -> Option<Hit> {
    let mut closest: Option<Hit> = None;

    for plane in world.planes() {
        if let Some(t) = intersect_ray_plane(origin, direction, plane) {
            if closest.as_ref().map_or(true, |hit| t < hit.distance) {
                closest = Some(Hit { distance: t, normal: plane.normal, material_index: plane.material_index });
            }
        }
    }

    for sphere in world.spheres() {
        if let Some(t) = intersect_ray_sphere(origin, direction, sphere) {
            if closest.as_ref().map_or(true, |hit| t < hit.distance) {
                let point = origin + direction * t;
                let normal = (point - sphere.center).normalize();
                closest = Some(Hit { distance: t, normal, material_index: sphere.material_index });
            }
        }
    }

    closest
}

/// A random direction biased toward the cube's corners rather than a
/// spherically uniform hemisphere: each axis is drawn independently in
/// `[-1, 1]` and the result renormalized. Rejection-free by design — the
/// vanishingly rare near-zero draw is left to `normalize`'s own assertion
/// rather than silently retried.
pub fn get_random_direction(rng: &mut Prng) -> Vec3 {
    Vec3::new(rng.ranged_f32(-1.0, 1.0), rng.ranged_f32(-1.0, 1.0), rng.ranged_f32(-1.0, 1.0)).normalize()
}

/// A cosine-ish scatter direction: the surface normal nudged by a random
/// cube-biased direction, then renormalized. Never collapses to zero since
/// the normal itself has unit length.
fn scatter_direction(normal: Vec3, rng: &mut Prng) -> Vec3 {
    (normal + get_random_direction(rng)).normalize()
}

/// Casts a single primary ray through the scene, returning the accumulated
/// radiance after at most `MAX_BOUNCES` reflections.
pub fn cast_ray(world: &World, origin: Vec3, direction: Vec3, rng: &mut Prng) -> Vec3 {
    let mut ray_origin = origin;
    let mut ray_direction = direction;
    let mut color = Vec3::ZERO;
    let mut attenuation = Vec3::ONE;

    for _ in 0..MAX_BOUNCES {
        let next_origin;
        let next_direction;

        match closest_hit(world, ray_origin, ray_direction) {
            None => {
                let material: &Material = &world.materials()[SKY_MATERIAL_INDEX];
                color = color + attenuation.hadamard(material.emissive);
                break;
            }
            Some(hit) => {
                let material: &Material = &world.materials()[hit.material_index];
                color = color + attenuation.hadamard(material.emissive);
                attenuation = attenuation.hadamard(material.reflective);

                let point = ray_origin + ray_direction * hit.distance;
                let pure_bounce = ray_direction.reflect(hit.normal).normalize();
                let scatter_bounce = scatter_direction(hit.normal, rng);

                // glossiness 0 => full scatter, glossiness 1 => pure mirror bounce.
                next_direction = scatter_bounce.lerp(pure_bounce, material.glossiness).normalize();
                next_origin = point;
            }
        }

        ray_origin = next_origin;
        ray_direction = next_direction;
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{single_sphere_scene, sky_only_scene};
    use approx::assert_relative_eq;

    #[test]
    fn ray_that_hits_nothing_returns_sky_emissive() {
        let (_, world) = sky_only_scene(Vec3::new(0.3, 0.4, 0.5));
        let mut rng = Prng::new(1);
        let color = cast_ray(&world, Vec3::new(0.0, -5.0, 1.0), Vec3::UNIT_Y, &mut rng);
        assert_relative_eq!(color.x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(color.y, 0.4, epsilon = 1e-6);
        assert_relative_eq!(color.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn ray_that_hits_reflective_sphere_attenuates_toward_sky_colour() {
        let (_, world) = single_sphere_scene();
        let mut rng = Prng::new(7);
        let color = cast_ray(&world, Vec3::new(0.0, -5.0, 1.0), Vec3::UNIT_Y, &mut rng);
        // Fully reflective, non-glossy sphere: result is attenuated sky light,
        // never brighter than the sky itself in any channel.
        assert!(color.x <= 0.3 + 1e-5);
        assert!(color.y <= 0.4 + 1e-5);
        assert!(color.z <= 0.5 + 1e-5);
    }

    #[test]
    fn random_direction_is_always_unit_length() {
        let mut rng = Prng::new(99);
        for _ in 0..1_000 {
            let d = get_random_direction(&mut rng);
            assert_relative_eq!(d.length(), 1.0, epsilon = 1e-4);
        }
    }
}
