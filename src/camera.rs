//! A pinhole camera turning image coordinates into primary rays

use glam::Vec3A;

use crate::{color::Color, ray::Ray};

/// A pinhole camera.
///
/// Stores the viewport basis derived from its look-at parameters, along with
/// the color returned for rays that leave the scene.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3A,
    lower_left_corner: Vec3A,
    horizontal: Vec3A,
    vertical: Vec3A,
    pub bg_color: Color,
}

impl Camera {
    /// Creates a new [Camera].
    ///
    /// `vert_fov` is the vertical field of view in degrees.
    pub fn new(
        look_from: Vec3A,
        look_at: Vec3A,
        view_up: Vec3A,
        vert_fov: f32,
        aspect_ratio: f32,
        bg_color: Color,
    ) -> Self {
        let half_height = (vert_fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * half_height;
        let viewport_width = aspect_ratio * viewport_height;

        // orthonormal basis; w points away from the view direction
        let w = (look_from - look_at).normalize();
        let u = view_up.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
            bg_color,
        }
    }

    /// Returns the ray through viewport coordinates (`u`, `v`), both in `[0, 1]`
    /// with (0, 0) at the lower left.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.lower_left_corner + u * self.horizontal + v * self.vertical;
        Ray::new(self.origin, target - self.origin)
    }
}
