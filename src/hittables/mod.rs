//! Ray intersection against transformed primitives
//!
//! Every primitive lives in a canonical object space (a unit box, a sphere of
//! radius 0.5, or a triangle mesh) and is placed in the world by a [Transform].
//! The tests here move the world-space ray into that space, intersect there, and
//! map the result back out.

use std::ops::Range;

use glam::Vec3A;

use crate::{bounds::BoundingBox, color::Color, ray::Ray};

pub mod cube;
pub mod mesh;
pub mod sphere;
pub mod transform;
pub mod triangle;

pub use transform::Transform;
pub use triangle::Triangle;

/// Distance by which box and sphere hit points are pulled back along the local ray,
/// keeping secondary rays from re-hitting the surface they start on.
pub const SURFACE_OFFSET: f32 = 1e-4;

/// Information about a ray hitting a primitive, all in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance from the ray origin to `point`
    pub t: f32,
    pub point: Vec3A,
    /// Unit surface normal
    pub normal: Vec3A,
    /// Whether the ray arrived from the primitive's exterior
    pub outside: bool,
}

impl Intersection {
    /// Builds the world-space record from an object-space hit.
    ///
    /// Returns `None` when the mapped distance is not finite.
    pub(crate) fn from_local(
        transform: &Transform,
        world_ray: &Ray,
        local_point: Vec3A,
        local_normal: Vec3A,
        outside: bool,
    ) -> Option<Self> {
        let point = transform.point_to_world(local_point);
        let t = world_ray.origin.distance(point);
        if !t.is_finite() {
            return None;
        }
        Some(Self {
            t,
            point,
            normal: transform.normal_to_world(local_normal),
            outside,
        })
    }
}

/// The canonical primitive an instance refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum GeomKind {
    /// Axis aligned box spanning `[-0.5, 0.5]` on every axis
    Cube,
    /// Sphere of radius 0.5 centered at the origin
    Sphere,
    /// Triangles `triangles` of the scene's triangle array, bounded locally by `bounds`
    Mesh {
        triangles: Range<usize>,
        bounds: BoundingBox,
    },
}

/// A primitive placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Geom {
    pub kind: GeomKind,
    pub transform: Transform,
    /// Surface color recorded into the G-buffer
    pub albedo: Color,
}

impl Geom {
    /// Intersects a world-space ray with this instance.
    ///
    /// `triangles` is the scene-wide triangle array that mesh ranges index into;
    /// boxes and spheres ignore it.
    pub fn intersect(&self, ray: &Ray, triangles: &[Triangle]) -> Option<Intersection> {
        match &self.kind {
            GeomKind::Cube => cube::intersect_cube(&self.transform, ray),
            GeomKind::Sphere => sphere::intersect_sphere(&self.transform, ray),
            GeomKind::Mesh {
                triangles: range,
                bounds,
            } => mesh::intersect_mesh(&self.transform, range.clone(), bounds, triangles, ray),
        }
    }
}
