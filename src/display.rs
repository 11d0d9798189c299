//! Turning frame buffers into viewable images
//!
//! Radiance is gamma corrected; G-buffer channels are mapped into `[0, 1]`
//! so they can be inspected directly.

use glam::Vec3A;
use image::RgbImage;

use crate::{
    color::{from_unit_vector, gamma_correct, Color, VecExt},
    frame::{GBuffer, GBufferPixel},
};

/// Which buffer ends up in the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayMode {
    /// The filtered image
    Denoised,
    /// The accumulated image before filtering
    Noisy,
    /// Distance from the camera, near is bright
    Depth,
    /// World-space normals
    Normal,
    /// World-space positions, scaled to the scene's extent
    Position,
    /// Surface albedo without lighting
    Albedo,
}

impl DisplayMode {
    /// Whether this mode shows the denoiser's output
    pub fn needs_denoising(self) -> bool {
        self == Self::Denoised
    }
}

/// Builds the image for `mode`.
///
/// `noisy` and `denoised` are row-major radiance buffers matching the
/// G-buffer's resolution; `denoised` may be `None` when the mode does not use it.
pub fn to_image(
    mode: DisplayMode,
    gbuffer: &GBuffer,
    noisy: &[Color],
    denoised: Option<&[Color]>,
) -> RgbImage {
    let colors: Vec<Color> = match mode {
        DisplayMode::Denoised => denoised
            .unwrap_or(noisy)
            .iter()
            .map(|c| gamma_correct(*c))
            .collect(),
        DisplayMode::Noisy => noisy.iter().map(|c| gamma_correct(*c)).collect(),
        DisplayMode::Depth => depth_colors(gbuffer),
        DisplayMode::Normal => gbuffer
            .pixels()
            .iter()
            .map(|px| match px.depth {
                Some(_) => from_unit_vector(px.normal),
                None => Vec3A::ZERO,
            })
            .collect(),
        DisplayMode::Position => position_colors(gbuffer),
        DisplayMode::Albedo => gbuffer.pixels().iter().map(|px| px.albedo).collect(),
    };

    RgbImage::from_fn(gbuffer.width(), gbuffer.height(), |x, y| {
        colors[y as usize * gbuffer.width() as usize + x as usize].to_pixel()
    })
}

fn depth_colors(gbuffer: &GBuffer) -> Vec<Color> {
    let max_depth = gbuffer.max_depth().unwrap_or(1.0).max(f32::EPSILON);
    gbuffer
        .pixels()
        .iter()
        .map(|px| match px.depth {
            Some(d) => Vec3A::splat(1.0 - d / max_depth),
            None => Vec3A::ZERO,
        })
        .collect()
}

fn position_colors(gbuffer: &GBuffer) -> Vec<Color> {
    let hits = || gbuffer.pixels().iter().filter(|px| px.depth.is_some());
    let min = hits()
        .map(|px| px.position)
        .fold(Vec3A::splat(f32::INFINITY), Vec3A::min);
    let max = hits()
        .map(|px| px.position)
        .fold(Vec3A::splat(f32::NEG_INFINITY), Vec3A::max);
    let extent = (max - min).max(Vec3A::splat(f32::EPSILON));

    gbuffer
        .pixels()
        .iter()
        .map(|px: &GBufferPixel| match px.depth {
            Some(_) => (px.position - min) / extent,
            None => Vec3A::ZERO,
        })
        .collect()
}
