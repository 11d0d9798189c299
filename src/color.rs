//! Color and pixel output

use glam::Vec3A;

pub use glam::Vec3A as Color;

pub mod colors {
    pub const WHITE: super::Color = super::Vec3A::ONE;
    pub const BLACK: super::Color = super::Vec3A::ZERO;
}

// conversion for sdr pixels
pub trait VecExt<P: image::Pixel> {
    fn to_pixel(self) -> P;
    fn from_pixel(p: P) -> Self;
}

impl VecExt<image::Rgb<u8>> for Vec3A {
    fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb::<u8>(
            self.to_array()
                .map(|channel| (channel.clamp(0.0, 1.0) * u8::MAX as f32) as u8),
        )
    }

    fn from_pixel(p: image::Rgb<u8>) -> Self {
        Self::from_array(p.0.map(|channel| (channel as f32 / u8::MAX as f32).clamp(0.0, 1.0)))
    }
}

/// Square-root "gamma" used for displaying linear radiance
pub fn gamma_correct(color: Color) -> Color {
    color.max(Vec3A::ZERO).powf(0.5)
}

/// Maps a unit vector's components from `[-1, 1]` into displayable `[0, 1]`
pub fn from_unit_vector(v: Vec3A) -> Color {
    0.5 * (v + Vec3A::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_round_trip_extremes() {
        let px: image::Rgb<u8> = colors::WHITE.to_pixel();
        assert_eq!(px, image::Rgb([255, 255, 255]));
        assert_eq!(Vec3A::from_pixel(image::Rgb([0, 0, 0])), colors::BLACK);
    }

    #[test]
    fn out_of_range_channels_clamp() {
        let px: image::Rgb<u8> = Vec3A::new(-1.0, 0.5, 4.0).to_pixel();
        assert_eq!(px, image::Rgb([0, 127, 255]));
    }

    #[test]
    fn unit_vectors_map_into_range() {
        assert_eq!(from_unit_vector(-Vec3A::X), Vec3A::new(0.0, 0.5, 0.5));
    }
}
