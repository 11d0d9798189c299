//! Implementation of a 3-dimensional Ray.

use glam::{Affine3A, Vec3A};

/// A 3-dimensional Ray
///
/// The crucial parts of the Ray are its origin and direction;
/// these two members are the primary way to determine an intersection with a [`Geom`](crate::hittables::Geom).
/// The direction is expected to be of unit length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ray {
    pub origin: Vec3A,
    pub direction: Vec3A,
}

impl std::fmt::Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({} -> {})", self.origin, self.direction))
    }
}

impl Ray {
    /// Creates a new Ray, normalizing the given direction.
    ///
    /// A zero-length or non-finite direction becomes [Vec3A::ZERO].
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Whether the direction is unusable for intersection
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3A::ZERO
    }

    /// Returns a position in 3D space along the ray.
    ///
    /// Performs the following calculation: `position = origin + t * direction`
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Maps this ray through the given affine transform.
    ///
    /// Non-uniform scaling stretches the direction, so it is renormalized afterwards.
    /// Distances along the resulting ray are therefore in the target space's units.
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        Self::new(
            transform.transform_point3a(self.origin),
            transform.transform_vector3a(self.direction),
        )
    }
}
