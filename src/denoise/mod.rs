//! Edge-aware à-trous denoising
//!
//! Each pass averages a 5x5 neighborhood whose taps are spread `2^pass` pixels
//! apart, so a handful of cheap passes covers a large footprint. Every tap's
//! spatial weight is attenuated by how much the neighbor's color, normal and
//! position differ from the center pixel, which keeps geometric edges sharp.
//!
//! Based on Dammertz et al., "Edge-Avoiding À-Trous Wavelet Transform for fast
//! Global Illumination Filtering" (HPG 2010).

use glam::Vec3A;
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    color::Color,
    error::{Error, Result},
    frame::GBuffer,
};

pub mod kernel;

pub use kernel::Kernel;

/// Tunable parameters of the filter.
///
/// Each phi is the falloff scale of one edge-stopping term: smaller values stop
/// at weaker edges, `f32::INFINITY` disables the term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenoiseConfig {
    /// Width in pixels the passes should cover together
    pub filter_size: u32,
    /// Falloff for color differences
    pub c_phi: f32,
    /// Falloff for normal differences
    pub n_phi: f32,
    /// Falloff for position differences
    pub p_phi: f32,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            filter_size: 80,
            c_phi: 0.45,
            n_phi: 0.35,
            p_phi: 0.2,
        }
    }
}

impl DenoiseConfig {
    /// Checks every parameter, naming the first bad one.
    pub fn validate(&self) -> Result<()> {
        if self.filter_size < kernel::B3_SPLINE.len() as u32 {
            return Err(Error::InvalidFilterSize(self.filter_size));
        }
        for (name, value) in [
            ("c_phi", self.c_phi),
            ("n_phi", self.n_phi),
            ("p_phi", self.p_phi),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(Error::InvalidPhi { name, value });
            }
        }
        Ok(())
    }
}

/// Width covered by `passes` applications of a kernel with the given radius
fn footprint(radius: u32, passes: u32) -> u64 {
    1 + 2 * radius as u64 * ((1u64 << passes) - 1)
}

/// Weight in `[0, 1]` falling off with the squared distance `dist2`.
///
/// Identical guide values always weigh 1, even with a zero `phi`.
#[inline]
fn edge_weight(dist2: f32, phi: f32) -> f32 {
    if dist2 <= 0.0 {
        return 1.0;
    }
    (-dist2 / (phi * phi)).exp()
}

/// A configured filter, owning its precomputed kernel.
#[derive(Debug, Clone)]
pub struct Denoiser {
    config: DenoiseConfig,
    kernel: Kernel,
    passes: u32,
}

impl Denoiser {
    /// Validates `config` and builds the kernel for it.
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        config.validate()?;
        let kernel = Kernel::b3_spline();
        let radius = kernel.radius() as u32;

        let mut passes = 1;
        while footprint(radius, passes) < config.filter_size as u64 {
            passes += 1;
        }

        Ok(Self {
            config,
            kernel,
            passes,
        })
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Number of passes needed to cover the configured filter size
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Filters `color` guided by `gbuffer`, running every pass.
    ///
    /// Passes ping-pong between two buffers; the G-buffer is only read.
    pub fn denoise(&self, color: &[Color], gbuffer: &GBuffer) -> Result<Vec<Color>> {
        if color.len() != gbuffer.len() {
            return Err(Error::BufferSizeMismatch {
                expected: gbuffer.len(),
                actual: color.len(),
            });
        }

        let mut input = color.to_vec();
        let mut output = vec![Vec3A::ZERO; color.len()];
        for pass in 0..self.passes {
            let step = 1 << pass;
            debug!("a-trous pass {} with step {step}", pass + 1);
            self.apply_pass(step, &input, gbuffer, &mut output);
            std::mem::swap(&mut input, &mut output);
        }

        Ok(input)
    }

    /// Runs a single pass with taps `step` pixels apart, writing into `output`.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `output` differ in size from `gbuffer`.
    pub fn apply_pass(
        &self,
        step: u32,
        input: &[Color],
        gbuffer: &GBuffer,
        output: &mut [Color],
    ) {
        assert_eq!(input.len(), gbuffer.len(), "input does not match the G-buffer");
        assert_eq!(output.len(), gbuffer.len(), "output does not match the G-buffer");
        if gbuffer.is_empty() {
            return;
        }

        let width = gbuffer.width() as usize;

        #[cfg(feature = "parallel")]
        output
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| self.filter_row(y as u32, step, input, gbuffer, row));

        #[cfg(not(feature = "parallel"))]
        output
            .chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| self.filter_row(y as u32, step, input, gbuffer, row));
    }

    fn filter_row(
        &self,
        y: u32,
        step: u32,
        input: &[Color],
        gbuffer: &GBuffer,
        row: &mut [Color],
    ) {
        for (x, out) in row.iter_mut().enumerate() {
            *out = self.filter_pixel(x as u32, y, step, input, gbuffer);
        }
    }

    /// Weighted average around (`x`, `y`) for one pass.
    ///
    /// Taps landing outside the image are skipped, and the result is normalized
    /// by the weights actually used.
    fn filter_pixel(
        &self,
        x: u32,
        y: u32,
        step: u32,
        input: &[Color],
        gbuffer: &GBuffer,
    ) -> Color {
        let width = gbuffer.width() as i64;
        let height = gbuffer.height() as i64;
        let center_idx = y as usize * width as usize + x as usize;
        let center_color = input[center_idx];
        let center = gbuffer.pixels()[center_idx];

        let step = step as i64;
        let step_sq = (step * step) as f32;
        let DenoiseConfig {
            c_phi,
            n_phi,
            p_phi,
            ..
        } = self.config;

        let mut sum = Vec3A::ZERO;
        let mut weight_sum = 0.0;

        for (dx, dy, h) in self.kernel.taps() {
            let nx = x as i64 + dx as i64 * step;
            let ny = y as i64 + dy as i64 * step;
            if nx < 0 || ny < 0 || nx >= width || ny >= height {
                continue;
            }
            let idx = (ny * width + nx) as usize;
            let color = input[idx];
            let px = gbuffer.pixels()[idx];

            let c_w = edge_weight((color - center_color).length_squared(), c_phi);
            let n_w = edge_weight((px.normal - center.normal).length_squared() / step_sq, n_phi);
            let p_w = edge_weight((px.position - center.position).length_squared(), p_phi);

            let w = h * c_w * n_w * p_w;
            sum += w * color;
            weight_sum += w;
        }

        if weight_sum > 0.0 {
            sum / weight_sum
        } else {
            center_color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::GBufferPixel;

    fn unguided(filter_size: u32) -> Denoiser {
        Denoiser::new(DenoiseConfig {
            filter_size,
            c_phi: f32::INFINITY,
            n_phi: f32::INFINITY,
            p_phi: f32::INFINITY,
        })
        .expect("valid config")
    }

    fn impulse(size: u32) -> Vec<Color> {
        let mut color = vec![Vec3A::ZERO; (size * size) as usize];
        let center = size / 2;
        color[(center * size + center) as usize] = Vec3A::ONE;
        color
    }

    #[test]
    fn pass_count_covers_filter_size() {
        for (size, passes) in [(5, 1), (9, 2), (13, 2), (14, 3), (80, 5)] {
            assert_eq!(unguided(size).passes(), passes, "filter size {size}");
        }
    }

    #[test]
    fn keeps_config_and_b3_kernel() {
        let config = DenoiseConfig {
            filter_size: 20,
            ..Default::default()
        };
        let denoiser = Denoiser::new(config).expect("valid config");
        assert_eq!(denoiser.config(), &config);
        assert_eq!(denoiser.kernel(), &Kernel::b3_spline());
        assert_eq!(denoiser.kernel().size(), 5);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad_size = DenoiseConfig {
            filter_size: 3,
            ..Default::default()
        };
        assert!(matches!(
            Denoiser::new(bad_size),
            Err(Error::InvalidFilterSize(3))
        ));

        let bad_phi = DenoiseConfig {
            n_phi: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Denoiser::new(bad_phi),
            Err(Error::InvalidPhi { name: "n_phi", .. })
        ));

        let nan_phi = DenoiseConfig {
            c_phi: f32::NAN,
            ..Default::default()
        };
        assert!(Denoiser::new(nan_phi).is_err());
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let gbuffer = GBuffer::new(4, 4);
        let res = unguided(5).denoise(&[Vec3A::ZERO; 15], &gbuffer);
        assert!(matches!(
            res,
            Err(Error::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn constant_image_is_unchanged() {
        let gbuffer = GBuffer::new(7, 5);
        let color = vec![Vec3A::new(0.3, 0.6, 0.9); 35];
        let out = Denoiser::new(DenoiseConfig::default())
            .unwrap()
            .denoise(&color, &gbuffer)
            .unwrap();
        for c in out {
            assert!(c.abs_diff_eq(Vec3A::new(0.3, 0.6, 0.9), 1e-5), "got {c}");
        }
    }

    #[test]
    fn single_pass_is_the_kernel() {
        let gbuffer = GBuffer::new(17, 17);
        let out = unguided(5).denoise(&impulse(17), &gbuffer).unwrap();

        let at = |x: u32, y: u32| out[(y * 17 + x) as usize].x;
        assert!((at(8, 8) - 9.0 / 64.0).abs() < 1e-6);
        assert!((at(9, 8) - 3.0 / 32.0).abs() < 1e-6);
        assert!((at(10, 10) - 1.0 / 256.0).abs() < 1e-6);
        assert_eq!(at(11, 8), 0.0);
    }

    #[test]
    fn unguided_passes_compose_dilated_kernels() {
        let gbuffer = GBuffer::new(17, 17);
        let out = unguided(9).denoise(&impulse(17), &gbuffer).unwrap();

        // step-1 kernel followed by step-2 kernel, evaluated at the impulse
        let w = kernel::B3_SPLINE;
        let row = w[1] * w[0] + w[2] * w[2] + w[3] * w[4];
        let expected = row * row;
        let center = out[8 * 17 + 8].x;
        assert!(
            (center - expected).abs() < 1e-6,
            "expected {expected}, got {center}"
        );

        // the combined support reaches 6 pixels out
        assert!(out[8 * 17 + 14].x > 0.0);
        assert_eq!(out[8 * 17 + 15].x, 0.0);
    }

    #[test]
    fn normal_edges_are_preserved() {
        let (width, height) = (8, 4);
        let pixels = (0..width * height)
            .map(|idx| GBufferPixel {
                normal: if idx % width < 4 { Vec3A::Z } else { Vec3A::X },
                ..Default::default()
            })
            .collect();
        let gbuffer = GBuffer::from_pixels(width, height, pixels).unwrap();
        let color: Vec<_> = (0..width * height)
            .map(|idx| Vec3A::splat(if idx % width < 4 { 0.2 } else { 0.8 }))
            .collect();

        let with_n_phi = |n_phi| {
            Denoiser::new(DenoiseConfig {
                filter_size: 5,
                c_phi: f32::INFINITY,
                n_phi,
                p_phi: f32::INFINITY,
            })
            .unwrap()
            .denoise(&color, &gbuffer)
            .unwrap()
        };

        let sharp = with_n_phi(1e-3);
        let blurred = with_n_phi(f32::INFINITY);
        let edge = (width + 3) as usize;

        assert!((sharp[edge].x - 0.2).abs() < 1e-5, "leaked: {}", sharp[edge]);
        assert!(blurred[edge].x > 0.3, "expected a blur, got {}", blurred[edge]);
    }

    #[test]
    fn fully_stopped_filter_keeps_pixels() {
        let gbuffer = GBuffer::new(3, 3);
        let color: Vec<_> = (0..9).map(|i| Vec3A::splat(i as f32)).collect();
        let out = Denoiser::new(DenoiseConfig {
            filter_size: 20,
            c_phi: 0.0,
            n_phi: 0.0,
            p_phi: 0.0,
        })
        .unwrap()
        .denoise(&color, &gbuffer)
        .unwrap();
        for (c, expected) in out.iter().zip(&color) {
            assert!(c.abs_diff_eq(*expected, 1e-5), "expected {expected}, got {c}");
        }
    }

    #[test]
    fn tiny_images_survive_wide_steps() {
        for (width, height) in [(1, 1), (2, 3), (5, 1)] {
            let gbuffer = GBuffer::new(width, height);
            let color: Vec<_> = (0..width * height).map(|i| Vec3A::splat(i as f32)).collect();
            let out = unguided(80).denoise(&color, &gbuffer).unwrap();
            assert_eq!(out.len(), color.len());
            assert!(out.iter().all(|c| c.is_finite()));
        }

        let gbuffer = GBuffer::new(1, 1);
        let out = unguided(80).denoise(&[Vec3A::ONE], &gbuffer).unwrap();
        assert!(out[0].abs_diff_eq(Vec3A::ONE, 1e-6), "got {}", out[0]);
    }
}
