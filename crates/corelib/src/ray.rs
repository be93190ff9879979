//! Rays and the ground-plane intersector.

use crate::Vec3;

/// Half-line `origin + t * direction`, `t > 0`. Direction is unit length
/// (or zero for a degenerate input).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// Ray runs parallel to the plane.
    Parallel,
    /// Plane lies behind the origin (or the origin is on it, pointing away).
    Behind,
}

/// Outcome of a ray/plane test. A miss is an ordinary result, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaneHit {
    Hit(Vec3),
    Miss(MissReason),
}

impl PlaneHit {
    #[inline]
    pub fn point(&self) -> Option<Vec3> {
        match *self {
            PlaneHit::Hit(p) => Some(p),
            PlaneHit::Miss(_) => None,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, PlaneHit::Hit(_))
    }
}

/// Intersect with the horizontal plane `z = plane_z`.
///
/// A parallel ray whose origin lies exactly on the plane hits at its origin.
/// Otherwise only `t > 0` counts; the returned point has `z == plane_z`.
pub fn intersect_plane_z(ray: &Ray, plane_z: f32) -> PlaneHit {
    if ray.direction.z == 0.0 {
        if ray.origin.z == plane_z {
            return PlaneHit::Hit(ray.origin);
        }
        return PlaneHit::Miss(MissReason::Parallel);
    }

    let t = (plane_z - ray.origin.z) / ray.direction.z;
    if t <= 0.0 {
        return PlaneHit::Miss(MissReason::Behind);
    }

    let mut hit = ray.at(t);
    // Grazing rays overflow `t`; treat them as parallel.
    if !t.is_finite() || !hit.is_finite() {
        return PlaneHit::Miss(MissReason::Parallel);
    }
    hit.z = plane_z;
    PlaneHit::Hit(hit)
}
