//! Ray intersection with a transformed triangle mesh

use std::ops::Range;

use crate::{
    bounds::BoundingBox,
    hittables::{triangle::TriangleHit, Intersection, Transform, Triangle},
    ray::Ray,
};

/// Intersects a world-space ray with the mesh made of `triangles[range]`.
///
/// The local bounding box is checked first, and a rejected ray never touches a
/// triangle. Past that, every triangle in the range is tested and the nearest
/// one is shaded with area-weighted vertex normals.
///
/// An empty range, or one reaching past the end of `triangles`, is a miss.
pub fn intersect_mesh(
    transform: &Transform,
    range: Range<usize>,
    bounds: &BoundingBox,
    triangles: &[Triangle],
    ray: &Ray,
) -> Option<Intersection> {
    let local = transform.ray_to_local(ray)?;

    if !bounds.hit_line(&local) {
        return None;
    }

    let (tri, hit) = triangles
        .get(range)?
        .iter()
        .filter_map(|tri| tri.intersect(&local).map(|hit| (tri, hit)))
        .fold(None, |nearest: Option<(&Triangle, TriangleHit)>, (tri, hit)| {
            match nearest {
                Some((_, best)) if best.t <= hit.t => nearest,
                _ => Some((tri, hit)),
            }
        })?;

    let local_point = tri.interpolate_position(hit.u, hit.v);
    let local_normal = tri.interpolate_normal(local_point);
    let outside = local_normal.dot(local.direction) <= 0.0;

    Intersection::from_local(
        transform,
        ray,
        local.at(hit.t),
        local_normal,
        outside,
    )
}
