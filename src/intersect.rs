//! Ray/plane and ray/sphere intersection. Both return the nearest positive
//! hit distance along the ray, or `None` if the ray misses or the only hits
//! are behind the origin.

use crate::scene::{Plane, Sphere};
use crate::vecmath::Vec3;

/// Smallest distance counted as a hit, guarding against self-intersection at
/// a ray's own origin (e.g. a bounce ray starting exactly on a surface).
const MIN_HIT_DISTANCE: f32 = 1e-4;

/// Below this angle between the ray and the plane, the ray is treated as
/// parallel rather than solving for an unstable near-infinite `t`.
const PARALLEL_EPSILON: f32 = 1e-6;

pub fn intersect_ray_plane(origin: Vec3, direction: Vec3, plane: &Plane) -> Option<f32> {
    let denom = direction.dot(plane.normal);
    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = -(origin.dot(plane.normal) + plane.d) / denom;
    if t > MIN_HIT_DISTANCE {
        Some(t)
    } else {
        None
    }
}

/// `tca`/perpendicular-distance sphere test: project the origin-to-center
/// vector onto the ray, reject rays aimed away from the center (`tca < 0`,
/// which also rejects a ray whose origin is inside the sphere but facing
/// away from the near edge), then solve for the chord half-length `thc`.
pub fn intersect_ray_sphere(origin: Vec3, direction: Vec3, sphere: &Sphere) -> Option<f32> {
    let radius_squared = sphere.radius * sphere.radius;
    let to_center = sphere.center - origin;
    let tca = to_center.dot(direction);

    if tca < 0.0 {
        return None;
    }

    let perpendicular_squared = to_center.squared_length() - tca * tca;
    if perpendicular_squared > radius_squared {
        return None;
    }

    let thc = (radius_squared - perpendicular_squared).sqrt();
    let (mut t0, mut t1) = (tca - thc, tca + thc);
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    if t0 < MIN_HIT_DISTANCE {
        t0 = t1;
        if t0 < MIN_HIT_DISTANCE {
            return None;
        }
    }

    Some(t0)
}
