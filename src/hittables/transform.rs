//! Object-to-world transform carried by every geometry instance

use glam::{Affine3A, EulerRot, Mat3A, Quat, Vec3, Vec3A};

use crate::ray::Ray;

/// An affine object-to-world transform together with its derived matrices.
///
/// The inverse maps world-space rays into the primitive's canonical space,
/// and the inverse-transpose maps object-space normals back to world space.
/// Normals cannot go through the forward matrix: non-uniform scaling would skew them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    transform: Affine3A,
    inv_transform: Affine3A,
    inv_transpose: Mat3A,
}

impl Transform {
    // creators

    /// Creates a transform that does not move the underlying object
    pub fn identity() -> Self {
        Self::from_affine(Affine3A::IDENTITY)
    }

    /// Creates a transform from an arbitrary invertible affine matrix
    pub fn from_affine(transform: Affine3A) -> Self {
        let inv_transform = transform.inverse();
        Self {
            transform,
            inv_transform,
            inv_transpose: inv_transform.matrix3.transpose(),
        }
    }

    /// Creates a transform that changes the size of the object.
    pub fn from_scale_factor(scale: Vec3) -> Self {
        Self::from_affine(Affine3A::from_scale(scale))
    }

    /// Creates a transform containing a 3D rotation around an `axis`, of `angle` (in radians).
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Self::from_affine(Affine3A::from_axis_angle(axis.normalize(), angle))
    }

    /// Creates a transform from the given 3D `translation`.
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_affine(Affine3A::from_translation(translation))
    }

    /// Creates a transform applying scale, then rotation, then translation.
    ///
    /// `rotation_degrees` holds Euler angles around x, y and z, applied in that order.
    pub fn from_trs(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::ZYX,
            rotation_degrees.z.to_radians(),
            rotation_degrees.y.to_radians(),
            rotation_degrees.x.to_radians(),
        );
        Self::from_affine(Affine3A::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ))
    }

    // builders

    /// Adds a scaling factor to the existing transform
    pub fn with_scale_factor(&self, scale: Vec3) -> Self {
        Self::from_affine(Affine3A::from_scale(scale) * self.transform)
    }

    /// Adds a rotation based on the axis and angle (in degrees) to the existing transform
    pub fn with_axis_angle_degrees(&self, axis: Vec3, degrees: f32) -> Self {
        Self::from_affine(
            Affine3A::from_axis_angle(axis.normalize(), degrees.to_radians()) * self.transform,
        )
    }

    /// Adds a translation to the existing transform
    pub fn with_translation(&self, translation: Vec3) -> Self {
        Self::from_affine(Affine3A::from_translation(translation) * self.transform)
    }

    // accessors

    pub fn matrix(&self) -> &Affine3A {
        &self.transform
    }

    pub fn inverse(&self) -> &Affine3A {
        &self.inv_transform
    }

    pub fn inverse_transpose(&self) -> &Mat3A {
        &self.inv_transpose
    }

    // mapping

    /// Moves a world-space ray into object space, renormalizing its direction.
    ///
    /// Returns `None` if the ray has no usable direction.
    pub fn ray_to_local(&self, ray: &Ray) -> Option<Ray> {
        let local = ray.transformed(&self.inv_transform);
        (!local.is_degenerate()).then_some(local)
    }

    /// Moves an object-space point into world space.
    pub fn point_to_world(&self, point: Vec3A) -> Vec3A {
        self.transform.transform_point3a(point)
    }

    /// Moves an object-space normal into world space, returning a unit vector.
    pub fn normal_to_world(&self, normal: Vec3A) -> Vec3A {
        self.inv_transpose.mul_vec3a(normal).normalize_or_zero()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
