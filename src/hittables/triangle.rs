//! Triangles making up a mesh

use glam::Vec3A;

use crate::ray::Ray;

/// Determinants smaller than this are treated as a ray parallel to the triangle
const PARALLEL_EPSILON: f32 = f32::EPSILON;

/// A triangle in its mesh's object space.
///
/// A vertex normal of `None` means the vertex takes the flat face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3A; 3],
    pub normals: [Option<Vec3A>; 3],
}

/// Where a ray crossed a triangle.
///
/// `u` and `v` weigh the second and third vertex; the first gets `1 - u - v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Triangle {
    /// Creates a new triangle with explicit per-vertex normals
    pub fn new(vertices: [Vec3A; 3], normals: [Option<Vec3A>; 3]) -> Self {
        Self { vertices, normals }
    }

    /// Creates a triangle shaded with its face normal everywhere
    pub fn flat(vertices: [Vec3A; 3]) -> Self {
        Self::new(vertices, [None; 3])
    }

    /// Creates a triangle from imported normals where zero length means "not specified".
    ///
    /// The same check applies to all three vertices.
    pub fn from_raw_normals(vertices: [Vec3A; 3], normals: [Vec3A; 3]) -> Self {
        Self::new(
            vertices,
            normals.map(|n| (n.length_squared() > 0.0).then(|| n.normalize())),
        )
    }

    /// Unit normal following counter-clockwise winding
    pub fn face_normal(&self) -> Vec3A {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }

    /// Möller–Trumbore ray/triangle test.
    ///
    /// Only hits strictly in front of the ray origin count.
    pub fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        let [v0, v1, v2] = self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let pvec = ray.direction.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = det.recip();

        let tvec = ray.origin - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(e1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(qvec) * inv_det;
        (t > 0.0).then_some(TriangleHit { t, u, v })
    }

    /// Point at the given barycentric coordinates
    pub fn interpolate_position(&self, u: f32, v: f32) -> Vec3A {
        let [v0, v1, v2] = self.vertices;
        (1.0 - u - v) * v0 + u * v1 + v * v2
    }

    /// Shading normal at `point`, which must lie on the triangle.
    ///
    /// Each vertex normal is weighted by the area of the sub-triangle opposite
    /// that vertex, relative to the whole. Missing vertex normals fall back to
    /// the face normal.
    pub fn interpolate_normal(&self, point: Vec3A) -> Vec3A {
        let face = self.face_normal();
        let [n0, n1, n2] = self.normals.map(|n| n.unwrap_or(face));
        let [v0, v1, v2] = self.vertices;

        let total = self.area();
        if total <= 0.0 {
            return face;
        }

        let a0 = 0.5 * (v1 - point).cross(v2 - point).length();
        let a1 = 0.5 * (v0 - point).cross(v2 - point).length();
        let a2 = 0.5 * (v0 - point).cross(v1 - point).length();

        ((a0 * n0 + a1 * n1 + a2 * n2) / total).normalize_or_zero()
    }
}
