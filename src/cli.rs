//! Definition of command line arguments

use clap::Parser;

pub use clap_verbosity_flag::Verbosity;

use crate::{denoise::DenoiseConfig, display::DisplayMode, scenes::SceneType};

/// Parses the commandline arguments into an [Arguments] struct
pub fn parse_args() -> Arguments {
    Arguments::parse()
}

/// Argument definitions for [clap::Parser]
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Arguments {
    /// The path to the file to write the resulting image into
    #[clap(
        short,
        long,
        value_parser = valid_image_file,
        default_value = "output.png",
        value_name = "FILE"
    )]
    pub output: std::path::PathBuf,

    /// The width of the generated image
    #[clap(
        short = 'w',
        long = "width",
        value_parser = valid_count::<u32>,
        default_value_t = 400,
        value_name = "NUM"
    )]
    pub image_width: u32,

    /// samples per pixel
    ///
    /// More samples give a less noisy input to the denoiser
    #[clap(
        short = 'n',
        long = "samples",
        value_parser = valid_count::<u32>,
        default_value_t = 4,
        value_name = "NUM"
    )]
    pub samples_per_pixel: u32,

    /// The hardcoded scene to use
    #[clap(short, long, value_enum, default_value_t = SceneType::Cornell)]
    pub scene: SceneType,

    /// The seed used for psuedorandom number generation
    #[clap(long)]
    pub seed: Option<u64>,

    /// Which buffer to write to the output file
    #[clap(short, long, value_enum, default_value_t = DisplayMode::Denoised)]
    pub display: DisplayMode,

    /// Width in pixels the denoising passes cover together
    #[clap(
        short,
        long,
        value_parser = valid_count::<u32>,
        default_value_t = DenoiseConfig::default().filter_size,
        value_name = "NUM"
    )]
    pub filter_size: u32,

    /// Falloff of the color edge-stopping term
    #[clap(
        long,
        value_parser = valid_phi,
        default_value_t = DenoiseConfig::default().c_phi,
        value_name = "F"
    )]
    pub c_phi: f32,

    /// Falloff of the normal edge-stopping term
    #[clap(
        long,
        value_parser = valid_phi,
        default_value_t = DenoiseConfig::default().n_phi,
        value_name = "F"
    )]
    pub n_phi: f32,

    /// Falloff of the position edge-stopping term
    #[clap(
        long,
        value_parser = valid_phi,
        default_value_t = DenoiseConfig::default().p_phi,
        value_name = "F"
    )]
    pub p_phi: f32,

    /// Maximum distance at which geometry occludes a surface
    #[clap(long, value_parser = valid_phi, default_value_t = 1.0, value_name = "F")]
    pub ao_radius: f32,

    #[clap(flatten)]
    pub verbosity: self::Verbosity,
}

impl Arguments {
    /// Collects the filter parameters into a [DenoiseConfig]
    pub fn denoise_config(&self) -> DenoiseConfig {
        DenoiseConfig {
            filter_size: self.filter_size,
            c_phi: self.c_phi,
            n_phi: self.n_phi,
            p_phi: self.p_phi,
        }
    }
}

/// Checks whether the given integer value is greater than 0
fn valid_count<T>(s: &str) -> Result<T, String>
where
    T: num_traits::PrimInt + std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    match s.parse::<T>() {
        Ok(count) => {
            if count > T::zero() {
                Ok(count)
            } else {
                Err("count must be greater than 0".to_string())
            }
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Checks whether the given float is a non-negative number
///
/// `inf` is accepted and turns the matching edge-stopping term off.
fn valid_phi(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(value) if value >= 0.0 => Ok(value),
        Ok(_) => Err("value must not be negative".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Checks whether the given output file is valid
///
/// Checks the following properties:
/// * a valid path (always the case)
/// * a supported image format
fn valid_image_file(s: &str) -> Result<std::path::PathBuf, String> {
    let path = std::path::PathBuf::from(s);
    match image::ImageFormat::from_path(&path).and_then(valid_image_format) {
        Ok(_) => Ok(path),
        Err(e) => Err(e.to_string()),
    }
}

/// Helper func for [valid_image_file] to check against compiled image formats
///
/// [image::ImageOutputFormat] conditionally compiles the supported formats,
/// so anything it maps to `Unsupported` cannot be written by this build.
fn valid_image_format(format: image::ImageFormat) -> image::ImageResult<()> {
    use image::{error, ImageOutputFormat};
    match ImageOutputFormat::from(format) {
        ImageOutputFormat::Unsupported(_) => Err(error::ImageError::Unsupported(
            error::UnsupportedError::from(error::ImageFormatHint::from(format)),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn check_cli() {
        Arguments::command().debug_assert()
    }

    #[test]
    fn valid_output_file() {
        // text files are not valid image files
        let res = Arguments::command().try_get_matches_from(["sheen", "--output", "bad.txt"]);

        assert!(res.is_err(), "Expected an error during argument parsing");

        assert_eq!(
            res.as_ref().unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation,
            "Expected an unrecognized image format error"
        );
    }

    #[test]
    fn negative_phi_is_rejected() {
        let res = Arguments::try_parse_from(["sheen", "--n-phi=-0.5"]);
        assert_eq!(
            res.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation,
            "Expected a negative phi to fail validation"
        );
    }

    #[test]
    fn infinite_phi_disables_term() {
        let args = Arguments::try_parse_from(["sheen", "--c-phi", "inf", "--filter-size", "20"])
            .expect("inf should be accepted");
        let config = args.denoise_config();
        assert!(config.c_phi.is_infinite());
        assert_eq!(config.filter_size, 20);
        assert_eq!(config.n_phi, DenoiseConfig::default().n_phi);
    }

    #[test]
    fn defaults_parse() {
        let args = Arguments::try_parse_from(["sheen"]).expect("defaults should parse");
        assert_eq!(args.scene, SceneType::Cornell);
        assert_eq!(args.display, DisplayMode::Denoised);
        assert!(args.denoise_config().validate().is_ok());
    }
}
