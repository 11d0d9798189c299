mod error;
mod utils;

// public: geometry helpers
pub mod bounds;
pub mod camera;
pub mod color;
pub mod ray;
// public: commandline parser
pub mod cli;
// public: edge-aware filtering
pub mod denoise;
// public: output images
pub mod display;
// public: G-buffer and accumulation
pub mod frame;
// public: primitive intersection
pub mod hittables;
// public: logging setup
pub mod logger;
// public: renderer functionality
pub mod render;
// public: scene container
pub mod scene;
// public: scene selection
pub mod scenes;

pub use error::{Error, Result};
