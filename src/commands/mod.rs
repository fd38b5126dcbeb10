//! Command handlers for the front end.
//!
//! This module exposes the operations the binary invokes:
//! - [`shrink_files`]: Shrink a set of files into an output directory

mod image;

pub use image::*;
