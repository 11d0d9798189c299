//! Ray intersection with a transformed unit box

use glam::Vec3A;

use crate::{
    hittables::{Intersection, Transform, SURFACE_OFFSET},
    ray::Ray,
};

/// Intersects a world-space ray with the box `[-0.5, 0.5]^3` placed by `transform`.
///
/// Uses the slab method in object space. Each axis narrows the running
/// `[t_min, t_max]` interval, remembering which face produced each bound so its
/// axis-aligned normal can be reported. Only entries in front of the ray
/// advance `t_min`; if none did, the origin is inside and the exit face is
/// reported with `outside == false`.
///
/// A zero direction component divides into infinities on that axis. Those
/// infinities never win the comparisons below, so the axis drops out on its own.
pub fn intersect_cube(transform: &Transform, ray: &Ray) -> Option<Intersection> {
    let local = transform.ray_to_local(ray)?;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut t_min_normal = Vec3A::ZERO;
    let mut t_max_normal = Vec3A::ZERO;

    for axis in 0..3 {
        let t1 = (-0.5 - local.origin[axis]) / local.direction[axis];
        let t2 = (0.5 - local.origin[axis]) / local.direction[axis];
        let (near, far) = if t2 < t1 { (t2, t1) } else { (t1, t2) };

        // faces the ray enters through; the exit face reuses it, pointing back at the origin
        let mut normal = Vec3A::ZERO;
        normal[axis] = if t2 < t1 { 1.0 } else { -1.0 };

        if near > 0.0 && near > t_min {
            t_min = near;
            t_min_normal = normal;
        }
        if far < t_max {
            t_max = far;
            t_max_normal = normal;
        }
    }

    if !(t_max >= t_min && t_max > 0.0) {
        return None;
    }

    let (t, normal, outside) = if t_min <= 0.0 {
        (t_max, t_max_normal, false)
    } else {
        (t_min, t_min_normal, true)
    };

    Intersection::from_local(
        transform,
        ray,
        local.at(t - SURFACE_OFFSET),
        normal,
        outside,
    )
}
