//! Error types for buffer handling and output.
//!
//! Geometric queries never fail; a miss is `None`. Errors only come from
//! configuring the denoiser, mismatched buffers, and writing images.

use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Filter footprint smaller than a single kernel application
    #[error("Invalid filter size {0}: must be at least 5 pixels")]
    InvalidFilterSize(u32),

    /// Edge-stopping parameter that is negative or NaN
    #[error("Invalid {name} value {value}: must be a non-negative number")]
    InvalidPhi { name: &'static str, value: f32 },

    /// Buffer length disagreeing with the image resolution
    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Encoding or writing the output image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
