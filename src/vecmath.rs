//! Vector and matrix arithmetic for the renderer: 3D vectors with the usual
//! operator overloads, plus the flat 4x4 matrix convention the camera and
//! tile renderer rely on (row-major storage, translation in elements 3, 7, 11,
//! bottom row driving the homogeneous divide in `transform_point`).

use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UNIT_X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const UNIT_Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const UNIT_Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Pointwise (Hadamard) product, used to combine attenuation with material colour.
    pub fn hadamard(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    pub fn squared_length(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.squared_length().sqrt()
    }

    /// Returns a unit-length copy of `self`.
    ///
    /// # Panics
    /// Panics if `self` is zero-length or non-finite. This mirrors the source's use of an
    /// assertion rather than a recoverable error: a zero/NaN direction vector reaching this
    /// point is a programmer error, not a runtime condition to handle gracefully.
    pub fn normalize(self) -> Vec3 {
        let len = self.length();
        assert!(
            len.is_finite() && len > 0.0,
            "normalize() called on a zero-length or non-finite vector: {self:?}"
        );
        self * (1.0 / len)
    }

    pub fn reflect(self, normal: Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self * (1.0 - t) + other * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// A 4x4 matrix stored as 16 elements in row-major order, translation in
/// elements 3, 7, 11 (one per row). `transform_point` divides by a `w`
/// derived from the bottom row (elements 12..16), so callers must preserve
/// that convention when building matrices by hand.
#[derive(Debug, Copy, Clone)]
pub struct Mat4 {
    pub e: [f32; 16],
}

impl Mat4 {
    pub fn view(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, position: Vec3) -> Mat4 {
        Mat4 {
            e: [
                x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(position),
                y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(position),
                z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(position),
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Builds a right-handed view matrix looking from `position` toward `target`.
    pub fn look_at(position: Vec3, target: Vec3, world_up: Vec3) -> Mat4 {
        let forward = (position - target).normalize();
        let right = world_up.cross(forward).normalize();
        let up = forward.cross(right).normalize();
        Mat4::view(right, up, forward, position)
    }

    /// Inverts a view matrix built by `look_at`: transpose the rotation block,
    /// recompute the translation as `-(rotation * position)`.
    pub fn inverse_view(self) -> Mat4 {
        let m = self.e;
        let a = -((m[0] * m[3]) + (m[4] * m[7]) + (m[8] * m[11]));
        let b = -((m[1] * m[3]) + (m[5] * m[7]) + (m[9] * m[11]));
        let c = -((m[2] * m[3]) + (m[6] * m[7]) + (m[10] * m[11]));

        Mat4 {
            e: [
                m[0], m[4], m[8], a,
                m[1], m[5], m[9], b,
                m[2], m[6], m[10], c,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Homogeneous point transform: multiplies then divides by the `w` derived
    /// from the bottom row.
    pub fn transform_point(self, v: Vec3) -> Vec3 {
        let m = self.e;
        let w = (m[12] * v.x) + (m[13] * v.y) + (m[14] * v.z) + m[15];

        Vec3::new(
            ((m[0] * v.x) + (m[1] * v.y) + (m[2] * v.z) + m[3]) / w,
            ((m[4] * v.x) + (m[5] * v.y) + (m[6] * v.z) + m[7]) / w,
            ((m[8] * v.x) + (m[9] * v.y) + (m[10] * v.z) + m[11]) / w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_has_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(v.normalize().length(), 1.0, epsilon = 1e-5);

        let v = Vec3::new(-1.0, 7.0, 2.5);
        assert_relative_eq!(v.normalize().length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    #[should_panic]
    fn normalize_zero_vector_panics() {
        Vec3::ZERO.normalize();
    }

    #[test]
    fn reflect_preserves_orthogonal_component_and_flips_normal_component() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let i = Vec3::new(1.0, 2.0, -3.0);
        let r = i.reflect(n);

        assert_relative_eq!(r.dot(n), -(i.dot(n)), epsilon = 1e-6);

        let i_orth = i - n * i.dot(n);
        let r_orth = r - n * r.dot(n);
        assert_relative_eq!(i_orth.x, r_orth.x, epsilon = 1e-6);
        assert_relative_eq!(i_orth.y, r_orth.y, epsilon = 1e-6);
        assert_relative_eq!(i_orth.z, r_orth.z, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_round_trips_through_its_inverse() {
        let position = Vec3::new(0.0, -5.0, 1.0);
        let target = Vec3::ZERO;
        let view = Mat4::look_at(position, target, Vec3::UNIT_Z);
        let inverse = view.inverse_view();

        let p = Vec3::new(0.25, -0.4, -1.0);
        let round_tripped = inverse.transform_point(view.transform_point(p));

        assert_relative_eq!(round_tripped.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(round_tripped.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(round_tripped.z, p.z, epsilon = 1e-4);
    }
}
