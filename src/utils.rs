//! Various utilities
//!
//! External crate wrappers, small functions, etc.

pub mod match_opts;
pub mod progress;
pub mod random;
