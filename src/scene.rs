//! Scene storage and nearest-hit traversal

use glam::Vec3A;

use crate::{
    bounds::BoundingBox,
    color::Color,
    hittables::{Geom, GeomKind, Intersection, Transform, Triangle},
    ray::Ray,
    utils::match_opts::match_opts,
};

/// The nearest intersection found along a ray, and which instance produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    pub geom_index: usize,
    pub intersection: Intersection,
}

/// Every primitive instance of a scene plus the triangle array meshes index into.
///
/// Nothing here is mutated while rays are traced, so a `&Scene` may be shared
/// across any number of worker threads.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    geoms: Vec<Geom>,
    triangles: Vec<Triangle>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit box placed by `transform`, returning its instance index.
    pub fn add_cube(&mut self, transform: Transform, albedo: Color) -> usize {
        self.push(GeomKind::Cube, transform, albedo)
    }

    /// Adds a sphere of radius 0.5 placed by `transform`, returning its instance index.
    pub fn add_sphere(&mut self, transform: Transform, albedo: Color) -> usize {
        self.push(GeomKind::Sphere, transform, albedo)
    }

    /// Adds a triangle mesh given in its own object space, returning its instance index.
    ///
    /// The triangles are appended to the shared array and the mesh's local
    /// bounding box is computed from their vertices.
    pub fn add_mesh(
        &mut self,
        triangles: impl IntoIterator<Item = Triangle>,
        transform: Transform,
        albedo: Color,
    ) -> usize {
        let start = self.triangles.len();
        self.triangles.extend(triangles);
        let range = start..self.triangles.len();

        let bounds = BoundingBox::from_points(
            self.triangles[range.clone()]
                .iter()
                .flat_map(|t| t.vertices),
        );

        self.push(
            GeomKind::Mesh {
                triangles: range,
                bounds,
            },
            transform,
            albedo,
        )
    }

    fn push(&mut self, kind: GeomKind, transform: Transform, albedo: Color) -> usize {
        self.geoms.push(Geom {
            kind,
            transform,
            albedo,
        });
        self.geoms.len() - 1
    }

    pub fn geoms(&self) -> &[Geom] {
        &self.geoms
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn is_empty(&self) -> bool {
        self.geoms.is_empty()
    }

    /// Returns the nearest intersection along `ray` over every instance.
    ///
    /// A strict running minimum by distance; visiting order does not matter.
    pub fn intersect(&self, ray: &Ray) -> Option<SceneHit> {
        self.geoms
            .iter()
            .enumerate()
            .fold(None, |nearest, (geom_index, geom)| {
                let hit = geom
                    .intersect(ray, &self.triangles)
                    .filter(|isect| isect.t > 0.0)
                    .map(|intersection| SceneHit {
                        geom_index,
                        intersection,
                    });
                match_opts(nearest, hit, |a, b| {
                    if b.intersection.t < a.intersection.t {
                        b
                    } else {
                        a
                    }
                })
            })
    }

    /// Returns whether anything lies along `ray` closer than `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.geoms.iter().any(|geom| {
            geom.intersect(ray, &self.triangles)
                .map_or(false, |isect| isect.t > 0.0 && isect.t < max_distance)
        })
    }

    /// Albedo of the instance at `geom_index`, black if there is none.
    pub fn albedo(&self, geom_index: usize) -> Color {
        self.geoms
            .get(geom_index)
            .map_or(Vec3A::ZERO, |geom| geom.albedo)
    }
}
