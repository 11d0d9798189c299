//! Fill a [Frame] given a [Camera] and a [Scene].
//!
//! The first pass traces one ray through every pixel center and records what it
//! hits into the G-buffer. Every following iteration adds one jittered
//! ambient-occlusion sample per pixel to the accumulation buffer, producing the
//! noisy estimate the denoiser is meant to clean up.

use glam::Vec3A;
use indicatif::ProgressIterator;
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    camera::Camera,
    color::Color,
    error::{Error, Result},
    frame::{pixel_count, Frame, GBufferPixel},
    ray::Ray,
    scene::Scene,
    utils::{progress::get_progressbar, random::rand_cosine_direction},
};

/// Offset along the normal for rays leaving a surface
const SHADOW_BIAS: f32 = 1e-3;

/// Image Renderer storing context values such as image dimensions and samples per pixel
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    ao_radius: f32,
    seed: u64,
}

impl Renderer {
    /// Creates a new [Renderer].
    pub fn new(
        image_width: u32,
        image_height: u32,
        samples_per_pixel: u32,
        ao_radius: f32,
        seed: u64,
    ) -> Self {
        Self {
            image_width,
            image_height,
            samples_per_pixel,
            ao_radius,
            seed,
        }
    }

    /// Creates an empty [Frame] matching this renderer's resolution.
    pub fn new_frame(&self) -> Frame {
        Frame::new(self.image_width, self.image_height)
    }

    fn pixel_count(&self) -> usize {
        pixel_count(self.image_width, self.image_height)
    }

    /// Converts a pixel index plus a sub-pixel offset into viewport coordinates.
    ///
    /// Row 0 is the top of the image.
    #[inline]
    fn viewport_coords(&self, idx: usize, offset_u: f32, offset_v: f32) -> (f32, f32) {
        let x = (idx % self.image_width as usize) as f32;
        let y = (idx / self.image_width as usize) as f32;
        let u = (x + offset_u) / self.image_width as f32;
        let v = 1.0 - (y + offset_v) / self.image_height as f32;
        (u, v)
    }

    /// Resets `frame`, records its G-buffer and accumulates every sample.
    ///
    /// Fails if `frame` was created for a different resolution.
    pub fn render_frame(&self, scene: &Scene, cam: &Camera, frame: &mut Frame) -> Result<()> {
        if frame.gbuffer.len() != self.pixel_count() {
            return Err(Error::BufferSizeMismatch {
                expected: self.pixel_count(),
                actual: frame.gbuffer.len(),
            });
        }

        frame.reset();
        self.record_gbuffer(scene, cam, frame);
        info!(
            "G-buffer recorded for {}x{} pixels",
            self.image_width, self.image_height
        );

        let progress_bar =
            get_progressbar(self.samples_per_pixel as u64).with_prefix("Accumulating");
        for iteration in (0..self.samples_per_pixel).progress_with(progress_bar) {
            self.accumulate_iteration(scene, cam, frame, iteration);
        }
        info!("accumulated {} samples per pixel", frame.iterations());

        Ok(())
    }

    /// Traces the reference bounce through every pixel center.
    fn record_gbuffer(&self, scene: &Scene, cam: &Camera, frame: &mut Frame) {
        let record = |(idx, px): (usize, &mut GBufferPixel)| {
            let (u, v) = self.viewport_coords(idx, 0.5, 0.5);
            let ray = cam.get_ray(u, v);
            *px = match scene.intersect(&ray) {
                Some(hit) => GBufferPixel::from_hit(&hit, scene.albedo(hit.geom_index)),
                None => GBufferPixel::default(),
            };
        };

        #[cfg(feature = "parallel")]
        frame
            .gbuffer
            .pixels_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(record);

        #[cfg(not(feature = "parallel"))]
        frame
            .gbuffer
            .pixels_mut()
            .iter_mut()
            .enumerate()
            .for_each(record);
    }

    /// Adds one sample to every pixel.
    fn accumulate_iteration(
        &self,
        scene: &Scene,
        cam: &Camera,
        frame: &mut Frame,
        iteration: u32,
    ) {
        let base_seed = self
            .seed
            .wrapping_add(iteration as u64 * self.pixel_count() as u64);
        let accumulate = |(idx, acc): (usize, &mut Color)| {
            // one cheap generator per pixel keeps the result independent of scheduling
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(idx as u64));
            *acc += self.sample_pixel(scene, cam, idx, &mut rng);
        };

        #[cfg(feature = "parallel")]
        frame
            .accumulation_mut()
            .par_iter_mut()
            .enumerate()
            .for_each(accumulate);

        #[cfg(not(feature = "parallel"))]
        frame
            .accumulation_mut()
            .iter_mut()
            .enumerate()
            .for_each(accumulate);

        frame.finish_iteration();
    }

    /// Returns one ambient-occlusion sample for the pixel at `idx`.
    ///
    /// A jittered primary ray finds the surface, then a single cosine-distributed
    /// probe decides whether it is occluded within the configured radius.
    fn sample_pixel(
        &self,
        scene: &Scene,
        cam: &Camera,
        idx: usize,
        rng: &mut impl Rng,
    ) -> Color {
        let (u, v) = self.viewport_coords(idx, rng.gen(), rng.gen());
        let ray = cam.get_ray(u, v);

        let Some(hit) = scene.intersect(&ray) else {
            return cam.bg_color;
        };

        let isect = hit.intersection;
        // shade the side the ray arrived on
        let normal = if isect.normal.dot(ray.direction) > 0.0 {
            -isect.normal
        } else {
            isect.normal
        };

        let probe = Ray::new(
            isect.point + SHADOW_BIAS * normal,
            rand_cosine_direction(rng, normal),
        );
        if scene.occluded(&probe, self.ao_radius) {
            Vec3A::ZERO
        } else {
            scene.albedo(hit.geom_index)
        }
    }
}
