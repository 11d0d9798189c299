//! Scene generation functionality

use glam::{Affine3A, Vec3, Vec3A};
use rand::Rng;

use crate::{
    camera::Camera,
    color::Color,
    hittables::{Transform, Triangle},
    scene::Scene,
};

/// Possible hard-coded scenes to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneType {
    /// A closed room with colored walls, a tall box and a sphere
    Cornell,
    /// Spheres, ellipsoids and boxes under rotation, non-uniform scale and shear
    Shapes,
    /// A smooth-shaded and a flat-shaded mesh side by side
    Meshes,
    /// Randomly placed primitives on a ground plane
    Scattered,
}

/// Returns a [Camera], the [Scene], and the image dimensions as a tuple.
pub fn get_scene(
    image_width: u32,
    scene_type: SceneType,
    rng: &mut impl Rng,
) -> (Camera, Scene, (u32, u32)) {
    // Setup default camera properties
    let mut aspect_ratio = 16.0 / 9.0;
    let mut look_from = Vec3A::new(0.0, 2.0, -6.0);
    let look_at = Vec3A::ZERO;
    let view_up = Vec3A::Y;
    let mut vert_fov = 35.0;
    let mut bg_color = Vec3A::new(0.7, 0.8, 1.0);

    // camera changes per scene
    match scene_type {
        SceneType::Cornell => {
            aspect_ratio = 1.0;
            look_from = Vec3A::new(0.0, 0.0, -3.7);
            vert_fov = 40.0;
            bg_color = Vec3A::ZERO;
        }
        SceneType::Shapes | SceneType::Meshes => {}
        SceneType::Scattered => {
            aspect_ratio = 3.0 / 2.0;
            look_from = Vec3A::new(7.0, 3.0, -7.0);
            vert_fov = 30.0;
        }
    }

    let scene = get_geometry(scene_type, rng);

    let cam = Camera::new(
        look_from,
        look_at,
        view_up,
        vert_fov,
        aspect_ratio,
        bg_color,
    );

    let image_height = ((image_width as f32 / aspect_ratio) as u32).max(1);
    let dimensions = (image_width, image_height);

    (cam, scene, dimensions)
}

/// Returns only the geometry of a scene
pub fn get_geometry(scene_type: SceneType, rng: &mut impl Rng) -> Scene {
    match scene_type {
        SceneType::Cornell => gen_cornell(),
        SceneType::Shapes => gen_shapes(),
        SceneType::Meshes => gen_meshes(),
        SceneType::Scattered => gen_scattered(rng),
    }
}

/// Adds a wide, thin box whose top face lies at `y = -0.5`
fn add_ground(scene: &mut Scene) {
    scene.add_cube(
        Transform::from_trs(
            Vec3::new(0.0, -0.55, 0.0),
            Vec3::ZERO,
            Vec3::new(30.0, 0.1, 30.0),
        ),
        Vec3A::splat(0.5),
    );
}

/// Room spanning `[-1, 1]` on every axis, open towards the camera
fn gen_cornell() -> Scene {
    const THICKNESS: f32 = 0.02;
    const SPAN: f32 = 2.0 + THICKNESS;

    let white = Vec3A::splat(0.73);
    let red = Vec3A::new(0.65, 0.05, 0.05);
    let green = Vec3A::new(0.12, 0.45, 0.15);

    let mut scene = Scene::new();
    let wall = |pos: Vec3, scale: Vec3| Transform::from_trs(pos, Vec3::ZERO, scale);

    // floor, ceiling, back
    scene.add_cube(wall(-Vec3::Y, Vec3::new(SPAN, THICKNESS, SPAN)), white);
    scene.add_cube(wall(Vec3::Y, Vec3::new(SPAN, THICKNESS, SPAN)), white);
    scene.add_cube(wall(Vec3::Z, Vec3::new(SPAN, SPAN, THICKNESS)), white);
    // left, right
    scene.add_cube(wall(-Vec3::X, Vec3::new(THICKNESS, SPAN, SPAN)), red);
    scene.add_cube(wall(Vec3::X, Vec3::new(THICKNESS, SPAN, SPAN)), green);

    scene.add_cube(
        Transform::from_trs(
            Vec3::new(-0.35, -0.4, 0.3),
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(0.6, 1.2, 0.6),
        ),
        white,
    );
    scene.add_sphere(
        Transform::from_trs(Vec3::new(0.4, -0.6, -0.2), Vec3::ZERO, Vec3::splat(0.8)),
        white,
    );

    scene
}

/// Primitives exercising every kind of placement a transform allows
fn gen_shapes() -> Scene {
    let mut scene = Scene::new();
    add_ground(&mut scene);

    scene.add_sphere(Transform::identity(), Vec3A::new(0.1, 0.2, 0.5));
    // ellipsoid
    scene.add_sphere(
        Transform::from_trs(
            Vec3::new(-1.6, -0.2, 0.6),
            Vec3::new(0.0, 0.0, 15.0),
            Vec3::new(1.6, 0.6, 0.6),
        ),
        Vec3A::new(0.8, 0.6, 0.2),
    );
    scene.add_cube(
        Transform::from_trs(
            Vec3::new(1.5, 0.0, 0.3),
            Vec3::new(30.0, 45.0, 0.0),
            Vec3::splat(0.7),
        ),
        Vec3A::new(0.8, 0.2, 0.2),
    );
    // sheared box leaning to the right
    scene.add_cube(
        Transform::from_affine(Affine3A::from_cols(
            Vec3A::new(0.5, 0.0, 0.0),
            Vec3A::new(0.4, 1.0, 0.0),
            Vec3A::new(0.0, 0.0, 0.5),
            Vec3A::new(0.2, 0.0, 1.8),
        )),
        Vec3A::new(0.3, 0.7, 0.3),
    );
    // flat slab built from the builder methods
    scene.add_cube(
        Transform::identity()
            .with_scale_factor(Vec3::new(1.2, 0.1, 0.8))
            .with_axis_angle_degrees(Vec3::Y, -25.0)
            .with_translation(Vec3::new(-0.3, -0.45, -1.2)),
        Vec3A::splat(0.9),
    );

    scene
}

fn gen_meshes() -> Scene {
    let mut scene = Scene::new();
    add_ground(&mut scene);

    scene.add_mesh(
        octahedron(true),
        Transform::from_trs(
            Vec3::new(-1.2, 0.2, 0.0),
            Vec3::new(0.0, 30.0, 0.0),
            Vec3::splat(0.7),
        ),
        Vec3A::new(0.2, 0.4, 0.8),
    );
    scene.add_mesh(
        pyramid(),
        Transform::from_trs(
            Vec3::new(1.2, -0.5, 0.2),
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(1.2, 1.4, 1.2),
        ),
        Vec3A::new(0.8, 0.5, 0.2),
    );
    // flat-shaded twin of the octahedron, squashed
    scene.add_mesh(
        octahedron(false),
        Transform::from_trs(
            Vec3::new(0.0, -0.3, 1.5),
            Vec3::ZERO,
            Vec3::new(0.5, 0.2, 0.5),
        ),
        Vec3A::splat(0.8),
    );

    scene
}

/// A grid of randomly jittered spheres, boxes and pyramids
fn gen_scattered(rng: &mut impl Rng) -> Scene {
    let mut scene = Scene::new();
    add_ground(&mut scene);

    for a in -4..4 {
        for b in -4..4 {
            let center = Vec3::new(
                a as f32 + 0.8 * rng.gen::<f32>(),
                0.0,
                b as f32 + 0.8 * rng.gen::<f32>(),
            );
            let size = rng.gen_range(0.3..0.7);
            // rest on the ground
            let pos = center + Vec3::new(0.0, size / 2.0 - 0.5, 0.0);
            let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());

            let kind: f32 = rng.gen();
            if kind < 0.5 {
                scene.add_sphere(
                    Transform::from_trs(pos, Vec3::ZERO, Vec3::splat(size)),
                    albedo,
                );
            } else if kind < 0.85 {
                let yaw = rng.gen_range(0.0..90.0);
                scene.add_cube(
                    Transform::from_trs(pos, Vec3::new(0.0, yaw, 0.0), Vec3::splat(size)),
                    albedo,
                );
            } else {
                scene.add_mesh(
                    pyramid(),
                    Transform::from_trs(
                        center - Vec3::new(0.0, 0.5, 0.0),
                        Vec3::ZERO,
                        Vec3::splat(size),
                    ),
                    albedo,
                );
            }
        }
    }

    scene
}

/// Reorders the vertices so the winding faces away from `center`
fn outward(mut vertices: [Vec3A; 3], center: Vec3A) -> [Vec3A; 3] {
    let [v0, v1, v2] = vertices;
    let centroid = (v0 + v1 + v2) / 3.0;
    if (v1 - v0).cross(v2 - v0).dot(centroid - center) < 0.0 {
        vertices.swap(1, 2);
    }
    vertices
}

/// Unit octahedron with its tips on the axes.
///
/// With `smooth` every vertex carries its direction from the center as normal,
/// otherwise all faces are flat.
fn octahedron(smooth: bool) -> Vec<Triangle> {
    let signs = [-1.0, 1.0];
    signs
        .iter()
        .flat_map(|sx| signs.iter().map(move |sy| (*sx, *sy)))
        .flat_map(|(sx, sy)| signs.iter().map(move |sz| (sx, sy, *sz)))
        .map(|(sx, sy, sz)| {
            let vertices = outward(
                [sx * Vec3A::X, sy * Vec3A::Y, sz * Vec3A::Z],
                Vec3A::ZERO,
            );
            if smooth {
                Triangle::new(vertices, vertices.map(Some))
            } else {
                Triangle::flat(vertices)
            }
        })
        .collect()
}

/// Square pyramid with a unit base on `y = 0` and its tip at `y = 1`.
///
/// Normals come as imported data would: zero vectors where none were authored.
fn pyramid() -> Vec<Triangle> {
    let corners = [
        Vec3A::new(-0.5, 0.0, -0.5),
        Vec3A::new(0.5, 0.0, -0.5),
        Vec3A::new(0.5, 0.0, 0.5),
        Vec3A::new(-0.5, 0.0, 0.5),
    ];
    let apex = Vec3A::Y;
    let center = Vec3A::new(0.0, 0.25, 0.0);

    let sides = (0..corners.len()).map(|i| [corners[i], corners[(i + 1) % corners.len()], apex]);
    let base = [
        [corners[0], corners[1], corners[2]],
        [corners[0], corners[2], corners[3]],
    ];

    sides
        .chain(base)
        .map(|vertices| Triangle::from_raw_normals(outward(vertices, center), [Vec3A::ZERO; 3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    const ALL: [SceneType; 4] = [
        SceneType::Cornell,
        SceneType::Shapes,
        SceneType::Meshes,
        SceneType::Scattered,
    ];

    #[test]
    fn center_ray_hits_every_scene() {
        for scene_type in ALL {
            let mut rng = SmallRng::seed_from_u64(0);
            let (cam, scene, (w, h)) = get_scene(300, scene_type, &mut rng);
            assert!(!scene.is_empty(), "{scene_type:?} is empty");
            assert!(w == 300 && h > 0, "{scene_type:?} has size {w}x{h}");
            assert!(
                scene.intersect(&cam.get_ray(0.5, 0.5)).is_some(),
                "{scene_type:?}: center ray hit nothing"
            );
        }
    }

    #[test]
    fn meshes_face_outward() {
        let faces_away = |tri: &Triangle, center: Vec3A| {
            let centroid = tri.vertices.iter().fold(Vec3A::ZERO, |acc, v| acc + *v) / 3.0;
            tri.face_normal().dot(centroid - center) > 0.0
        };
        for tri in octahedron(false) {
            assert!(faces_away(&tri, Vec3A::ZERO), "{tri:?} faces inward");
        }
        for tri in pyramid() {
            let center = Vec3A::new(0.0, 0.25, 0.0);
            assert!(faces_away(&tri, center), "{tri:?} faces inward");
        }
    }

    #[test]
    fn smooth_octahedron_has_vertex_normals() {
        let tris = octahedron(true);
        assert_eq!(tris.len(), 8);
        for tri in &tris {
            for (v, n) in tri.vertices.iter().zip(tri.normals) {
                assert_eq!(n, Some(*v));
            }
        }
        assert!(pyramid().iter().all(|t| t.normals == [None; 3]));
    }

    #[test]
    fn scattered_depends_on_seed() {
        let a = get_geometry(SceneType::Scattered, &mut SmallRng::seed_from_u64(1));
        let b = get_geometry(SceneType::Scattered, &mut SmallRng::seed_from_u64(1));
        let c = get_geometry(SceneType::Scattered, &mut SmallRng::seed_from_u64(2));
        assert_eq!(a.geoms(), b.geoms());
        assert_ne!(a.geoms(), c.geoms());
    }
}
