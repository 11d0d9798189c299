//! Ray intersection with a transformed sphere

use crate::{
    hittables::{Intersection, Transform, SURFACE_OFFSET},
    ray::Ray,
};

/// Radius of the canonical sphere, centered at the object-space origin
pub const RADIUS: f32 = 0.5;

/// Intersects a world-space ray with the sphere of radius 0.5 placed by `transform`.
///
/// Solves `|o + t*d|^2 = r^2` in object space. When the origin lies inside the
/// sphere the far root is used and the normal is flipped to face the origin.
pub fn intersect_sphere(transform: &Transform, ray: &Ray) -> Option<Intersection> {
    let local = transform.ray_to_local(ray)?;

    // direction is unit length, so the quadratic's `a` term is 1
    let half_b = local.origin.dot(local.direction);
    let c = local.origin.length_squared() - RADIUS * RADIUS;
    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = -half_b + sqrt_d;
    let t2 = -half_b - sqrt_d;

    let (t, outside) = if t1 < 0.0 && t2 < 0.0 {
        return None;
    } else if t1 > 0.0 && t2 > 0.0 {
        (t1.min(t2), true)
    } else {
        (t1.max(t2), false)
    };

    let local_point = local.at(t - SURFACE_OFFSET);
    let local_normal = if outside { local_point } else { -local_point };

    Intersection::from_local(
        transform,
        ray,
        local_point,
        local_normal,
        outside,
    )
}

#[cfg(test)]
mod tests {
    use glam::{Affine3A, Vec3, Vec3A};

    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn head_on_from_outside() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::Z);
        let transform = Transform::identity();
        let hit = intersect_sphere(&transform, &ray).expect("expected a hit");

        let local = transform.inverse().transform_point3a(hit.point);
        assert!(
            local.abs_diff_eq(Vec3A::new(0.0, 0.0, -0.5), EPS),
            "local hit point was {local}"
        );
        assert!((hit.t - 4.5).abs() < EPS, "expected t = 4.5, got {}", hit.t);
        assert!(hit.normal.abs_diff_eq(-Vec3A::Z, EPS), "normal {}", hit.normal);
        assert!(hit.outside);
    }

    #[test]
    fn from_inside_faces_origin() {
        let ray = Ray::new(Vec3A::new(0.0, 0.1, 0.0), Vec3A::new(1.0, 0.0, 0.0));
        let hit = intersect_sphere(&Transform::identity(), &ray).expect("expected a hit");

        let exit = (RADIUS * RADIUS - 0.01f32).sqrt();
        assert!((hit.t - exit).abs() < EPS, "expected t = {exit}, got {}", hit.t);
        assert!(!hit.outside);

        let naive_outward = hit.point.normalize();
        assert!(
            hit.normal.dot(naive_outward) < -0.99,
            "normal {} should oppose {naive_outward}",
            hit.normal
        );
    }

    #[test]
    fn miss_beside() {
        let ray = Ray::new(Vec3A::new(0.0, 0.6, -5.0), Vec3A::Z);
        assert_eq!(intersect_sphere(&Transform::identity(), &ray), None);
    }

    #[test]
    fn miss_behind() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::Z);
        assert_eq!(intersect_sphere(&Transform::identity(), &ray), None);
    }

    #[test]
    fn ellipsoid_normal_uses_inverse_transpose() {
        // squashed along y; a ray along x still meets the rim head on
        let transform = Transform::from_scale_factor(Vec3::new(2.0, 0.5, 2.0));
        let ray = Ray::new(Vec3A::new(-5.0, 0.0, 0.0), Vec3A::X);
        let hit = intersect_sphere(&transform, &ray).expect("expected a hit");

        assert!((hit.t - 4.0).abs() < EPS, "expected t = 4, got {}", hit.t);
        assert!(hit.normal.abs_diff_eq(-Vec3A::X, EPS), "normal {}", hit.normal);
        assert!(hit.normal.is_normalized());
    }

    #[test]
    fn zero_direction_is_a_miss() {
        let ray = Ray {
            origin: Vec3A::new(0.0, 0.0, -5.0),
            direction: Vec3A::ZERO,
        };
        assert_eq!(intersect_sphere(&Transform::identity(), &ray), None);
        // origin inside the sphere
        let ray = Ray {
            origin: Vec3A::new(0.1, 0.0, 0.0),
            direction: Vec3A::ZERO,
        };
        assert_eq!(intersect_sphere(&Transform::identity(), &ray), None);
    }

    #[test]
    fn sheared_ellipsoid_matches_local_hit() {
        let transform = Transform::from_affine(Affine3A::from_cols(
            Vec3A::new(1.5, 0.0, 0.0),
            Vec3A::new(0.4, 0.8, 0.0),
            Vec3A::new(0.0, 0.3, 2.5),
            Vec3A::new(1.0, -2.0, 3.0),
        ));
        let local_ray = Ray::new(Vec3A::new(0.1, -0.05, -4.0), Vec3A::new(0.02, 0.03, 1.0));
        let world_ray = local_ray.transformed(transform.matrix());

        let local_hit =
            intersect_sphere(&Transform::identity(), &local_ray).expect("local ray should hit");
        let world_hit = intersect_sphere(&transform, &world_ray).expect("world ray should hit");

        let expected = transform.point_to_world(local_hit.point);
        assert!(
            world_hit.point.abs_diff_eq(expected, EPS),
            "expected {expected}, got {}",
            world_hit.point
        );
        assert_eq!(world_hit.outside, local_hit.outside);
    }
}
