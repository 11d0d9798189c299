//! Miscelleanous utilities related to random number generation and random sampling
//!
//! Relies on the [rand] and [rand_distr] crates

use glam::Vec3A;
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

/// Generates a random [Vec3A] on the unit sphere (radius 1).
///
/// wrapper function around [UnitSphere]'s `sample` method
pub fn rand_vec3_on_unit_sphere(rng: &mut impl Rng) -> Vec3A {
    Vec3A::from_array(UnitSphere.sample(rng))
}

/// Generates a random direction around `normal`, cosine-distributed.
///
/// Offsets the normal by a point on the unit sphere; if the two cancel out the
/// normal itself is returned.
pub fn rand_cosine_direction(rng: &mut impl Rng, normal: Vec3A) -> Vec3A {
    let dir = normal + rand_vec3_on_unit_sphere(rng);
    if dir.length_squared() < 1e-8 {
        normal
    } else {
        dir.normalize()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn test_rand_unit_sphere() {
        let mut rng = rand::thread_rng();
        let res = rand_vec3_on_unit_sphere(&mut rng);
        assert!(
            res.is_normalized(),
            "the unit vector {res}'s length was {}",
            res.length()
        )
    }

    #[test]
    fn test_cosine_direction_stays_in_hemisphere() {
        let mut rng = SmallRng::seed_from_u64(3);
        let normal = Vec3A::new(0.0, 1.0, 1.0).normalize();
        for _ in 0..500 {
            let dir = rand_cosine_direction(&mut rng, normal);
            assert!(dir.is_normalized(), "{dir} is not unit length");
            assert!(
                dir.dot(normal) >= -1e-6,
                "{dir} points away from the normal {normal}"
            );
        }
    }
}
