//! Per-frame buffers: the G-buffer and radiance accumulation
//!
//! A [Frame] owns everything that lives for exactly one frame. The G-buffer is
//! written once per pixel by the reference bounce and is only read afterwards;
//! accumulation gathers radiance samples until the frame is averaged and handed
//! to the denoiser. [Frame::reset] starts over.

use glam::Vec3A;

use crate::{
    color::Color,
    error::{Error, Result},
    scene::SceneHit,
};

/// Number of pixels in a `width` x `height` image, computed without `u32` overflow.
pub fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Geometry recorded for one pixel on its reference bounce.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GBufferPixel {
    /// World-space unit normal, zero for pixels that saw nothing
    pub normal: Vec3A,
    /// World-space hit position
    pub position: Vec3A,
    pub albedo: Color,
    /// Distance from the camera, `None` for pixels that saw nothing
    pub depth: Option<f32>,
}

impl GBufferPixel {
    /// Records the geometry of a first-bounce hit.
    pub fn from_hit(hit: &SceneHit, albedo: Color) -> Self {
        Self {
            normal: hit.intersection.normal,
            position: hit.intersection.point,
            albedo,
            depth: Some(hit.intersection.t),
        }
    }
}

/// Row-major per-pixel geometry buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GBuffer {
    width: u32,
    height: u32,
    pixels: Vec<GBufferPixel>,
}

impl GBuffer {
    /// Creates a buffer of empty pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![GBufferPixel::default(); pixel_count(width, height)],
        }
    }

    /// Wraps existing pixel data, which must hold exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<GBufferPixel>) -> Result<Self> {
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[GBufferPixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [GBufferPixel] {
        &mut self.pixels
    }

    /// Returns the pixel at image coordinates (`x`, `y`)
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> &GBufferPixel {
        &self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Largest recorded depth, used to normalize depth visualizations
    pub fn max_depth(&self) -> Option<f32> {
        self.pixels
            .iter()
            .filter_map(|px| px.depth)
            .fold(None, |max, d| Some(max.map_or(d, |m: f32| m.max(d))))
    }

    fn clear(&mut self) {
        self.pixels.fill(GBufferPixel::default());
    }
}

/// Everything owned by the frame currently being rendered.
#[derive(Debug, Clone)]
pub struct Frame {
    pub gbuffer: GBuffer,
    accumulated: Vec<Color>,
    iterations: u32,
}

impl Frame {
    /// Creates a new, empty [Frame].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            gbuffer: GBuffer::new(width, height),
            accumulated: vec![Vec3A::ZERO; pixel_count(width, height)],
            iterations: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.gbuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.gbuffer.height()
    }

    /// Completed accumulation iterations since the last reset
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Clears the G-buffer and accumulation for a new frame.
    pub fn reset(&mut self) {
        self.gbuffer.clear();
        self.accumulated.fill(Vec3A::ZERO);
        self.iterations = 0;
    }

    /// Mutable access to the running radiance sums, one per pixel.
    ///
    /// Call [Frame::finish_iteration] once every pixel received its sample.
    pub fn accumulation_mut(&mut self) -> &mut [Color] {
        &mut self.accumulated
    }

    /// Adds one full image of samples.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is not the size of the frame.
    pub fn accumulate(&mut self, samples: &[Color]) {
        assert_eq!(samples.len(), self.accumulated.len(), "sample count mismatch");
        for (acc, sample) in self.accumulated.iter_mut().zip(samples) {
            *acc += *sample;
        }
        self.finish_iteration();
    }

    pub fn finish_iteration(&mut self) {
        self.iterations += 1;
    }

    /// Per-pixel mean of everything accumulated so far.
    pub fn average(&self) -> Vec<Color> {
        let scale = (self.iterations.max(1) as f32).recip();
        self.accumulated.iter().map(|c| *c * scale).collect()
    }
}
