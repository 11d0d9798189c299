//! Implementation of bounding volumes

use glam::Vec3A;

use crate::ray::Ray;

/// An axis aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3A,
    pub max: Vec3A,
}

impl BoundingBox {
    /// Creates a new Axis aligned bounding box
    pub fn new(p0: Vec3A, p1: Vec3A) -> Self {
        Self {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    /// Creates the smallest bounding box containing every given point.
    ///
    /// Returns the empty (inverted) box if `points` yields nothing.
    pub fn from_points(points: impl IntoIterator<Item = Vec3A>) -> Self {
        points
            .into_iter()
            .fold(Self::default(), |bbox, point| bbox.add_point(point))
    }

    /// Returns whether or not the ray's supporting line crosses this bounding box.
    ///
    /// This is a pure accept/reject prefilter: no distance is produced and hits
    /// behind the ray origin are accepted too, so callers may see false positives
    /// but never false negatives.
    ///
    /// A direction component of exactly zero divides into an infinity here.
    /// That yields a `[-inf, inf]` slab when the origin lies between the planes and
    /// an inverted `[inf, -inf]` slab (a guaranteed reject) otherwise, which is the
    /// desired outcome, so the division is left unguarded.
    pub fn hit_line(&self, ray: &Ray) -> bool {
        let t0 = (self.min - ray.origin) / ray.direction;
        let t1 = (self.max - ray.origin) / ray.direction;

        // swap if inverted
        let (x_near, x_far) = if t0.x > t1.x { (t1.x, t0.x) } else { (t0.x, t1.x) };
        let (y_near, y_far) = if t0.y > t1.y { (t1.y, t0.y) } else { (t0.y, t1.y) };

        if x_near > y_far || y_near > x_far {
            return false;
        }

        let t_near = if y_near > x_near { y_near } else { x_near };
        let t_far = if y_far < x_far { y_far } else { x_far };

        let (z_near, z_far) = if t0.z > t1.z { (t1.z, t0.z) } else { (t0.z, t1.z) };

        !(t_near > z_far || z_near > t_far)
    }

    pub fn add_point(&self, point: Vec3A) -> BoundingBox {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn inside(&self, point: Vec3A) -> bool {
        self.max.cmpge(point).all() && self.min.cmple(point).all()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3A::splat(f32::MAX),
            max: Vec3A::splat(f32::MIN),
        }
    }
}
