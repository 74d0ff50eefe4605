//! Pixel buffer contract shared by every transformation.
//!
//! [`PixelBuffer`] is the only data type that crosses the crate boundary:
//! the quantizer and the substituter both take one and return a new one.
//! The [`alpha`] helpers glue the RGB-only quantizer to RGBA images.

pub mod alpha;
mod pixel_buffer;

pub use alpha::{split_alpha, with_alpha};
pub use pixel_buffer::{Layout, PixelBuffer};
