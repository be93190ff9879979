use crate::{Mat3, Mat4, Vec3};

/// Camera orientation as three unit vectors.
///
/// Right-handed: `forward x left = up`. View space looks down `-Z` with
/// `+X = right = -left`, `+Y = up`, `+Z = back = -forward`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub left: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// World axes: forward = +X, left = +Y, up = +Z.
    #[inline]
    pub const fn canonical() -> Self {
        Self {
            forward: Vec3::X,
            left: Vec3::Y,
            up: Vec3::Z,
        }
    }

    /// Yaw about world up, then pitch about the resulting left, then roll
    /// about the resulting forward. Angles in radians.
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let b = Self::canonical();
        let b = b.rotated(b.up, yaw);
        let b = b.rotated(b.left, pitch);
        b.rotated(b.forward, roll)
    }

    /// Rotate all three vectors by `angle` radians about `axis`.
    #[inline]
    pub fn rotated(&self, axis: Vec3, angle: f32) -> Self {
        let r = rodrigues(axis, angle);
        Self {
            forward: r * self.forward,
            left: r * self.left,
            up: r * self.up,
        }
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        -self.left
    }

    #[inline]
    pub fn back(&self) -> Vec3 {
        -self.forward
    }

    /// Largest deviation from unit length or from pairwise orthogonality.
    pub fn orthonormal_error(&self) -> f32 {
        let lengths = [self.forward, self.left, self.up]
            .iter()
            .map(|v| (v.length() - 1.0).abs())
            .fold(0.0_f32, f32::max);
        let dots = [
            self.forward.dot(self.left),
            self.forward.dot(self.up),
            self.left.dot(self.up),
        ]
        .iter()
        .map(|d| d.abs())
        .fold(0.0_f32, f32::max);
        lengths.max(dots)
    }

    #[inline]
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        self.orthonormal_error() <= tolerance
    }

    /// Gram-Schmidt: keeps the direction of `forward`, rebuilds `up` from
    /// the cross product so the triad stays right-handed.
    pub fn reorthonormalized(&self) -> Self {
        let forward = self.forward.normalize();
        let left = (self.left - forward * forward.dot(self.left)).normalize();
        let up = forward.cross(left);
        Self { forward, left, up }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Rodrigues rotation: `cos I + sin [k]x + (1 - cos) k k^T`.
/// Positive angles turn counter-clockwise looking down the axis.
pub fn rodrigues(axis: Vec3, angle: f32) -> Mat3 {
    let Some(k) = axis.try_normalize() else {
        return Mat3::IDENTITY;
    };
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let Vec3 { x, y, z } = k;
    Mat3::from_cols(
        Vec3::new(c + x * x * t, y * x * t + z * s, z * x * t - y * s),
        Vec3::new(x * y * t - z * s, c + y * y * t, z * y * t + x * s),
        Vec3::new(x * z * t + y * s, y * z * t - x * s, c + z * z * t),
    )
}

/// Rotation + translation only: camera-to-world placement.
#[derive(Clone, Copy, Debug)]
pub struct RigidTransform {
    pub translation: Vec3,
    pub basis: Basis,
}

impl RigidTransform {
    #[inline]
    pub fn new(translation: Vec3, basis: Basis) -> Self {
        Self { translation, basis }
    }

    /// Columns: right, up, back, translation (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.basis.right().extend(0.0),
            self.basis.up.extend(0.0),
            self.basis.back().extend(0.0),
            self.translation.extend(1.0),
        )
    }

    /// Inverse via transposed rotation; valid because the basis is orthonormal.
    pub fn inverse_matrix(&self) -> Mat4 {
        let r = self.basis.right();
        let u = self.basis.up;
        let b = self.basis.back();
        let p = self.translation;
        Mat4::from_cols(
            Vec3::new(r.x, u.x, b.x).extend(0.0),
            Vec3::new(r.y, u.y, b.y).extend(0.0),
            Vec3::new(r.z, u.z, b.z).extend(0.0),
            Vec3::new(-r.dot(p), -u.dot(p), -b.dot(p)).extend(1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    #[test]
    fn rodrigues_quarter_turn_about_z() {
        let r = rodrigues(Vec3::Z, FRAC_PI_2);
        assert!(approx(r * Vec3::X, Vec3::Y, 1e-6));
        assert!(approx(r * Vec3::Y, -Vec3::X, 1e-6));
        assert!(approx(r * Vec3::Z, Vec3::Z, 1e-6));
    }

    #[test]
    fn rodrigues_matches_glam_axis_angle() {
        let axis = Vec3::new(1.0, -2.0, 0.5).normalize();
        let ours = rodrigues(axis * 3.0, 0.7);
        let reference = Mat3::from_axis_angle(axis, 0.7);
        for v in [Vec3::X, Vec3::Y, Vec3::Z] {
            assert!(approx(ours * v, reference * v, 1e-5));
        }
    }

    #[test]
    fn zero_axis_is_identity() {
        assert_eq!(rodrigues(Vec3::ZERO, 1.0), Mat3::IDENTITY);
    }

    #[test]
    fn euler_yaw_turns_forward_toward_left() {
        let b = Basis::from_euler(FRAC_PI_2, 0.0, 0.0);
        assert!(approx(b.forward, Vec3::Y, 1e-6));
        assert!(approx(b.left, -Vec3::X, 1e-6));
        assert!(approx(b.up, Vec3::Z, 1e-6));
    }

    #[test]
    fn euler_pitch_is_about_rotated_left() {
        // yaw 90 deg makes left = -X; pitching about it tips forward toward +Z.
        let b = Basis::from_euler(FRAC_PI_2, -FRAC_PI_2, 0.0);
        assert!(approx(b.forward, Vec3::Z, 1e-6));
        assert!(approx(b.left, -Vec3::X, 1e-6));
        assert!(b.is_orthonormal(1e-5));
    }

    #[test]
    fn reorthonormalize_fixes_skew() {
        let skewed = Basis {
            forward: Vec3::new(1.0, 0.01, 0.0),
            left: Vec3::new(0.02, 1.0, 0.0),
            up: Vec3::new(0.0, 0.0, 1.1),
        };
        assert!(!skewed.is_orthonormal(1e-3));
        let fixed = skewed.reorthonormalized();
        assert!(fixed.is_orthonormal(1e-6));
        assert!(approx(fixed.forward.cross(fixed.left), fixed.up, 1e-6));
    }

    #[test]
    fn rigid_inverse_matches_full_inverse() {
        let basis = Basis::from_euler(0.3, -0.8, 1.9);
        let t = RigidTransform::new(Vec3::new(5.0, -2.0, 7.5), basis);
        let a = t.inverse_matrix().to_cols_array();
        let b = t.matrix().inverse().to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }
}
