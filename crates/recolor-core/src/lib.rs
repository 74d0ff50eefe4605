// Per-channel loops index three parallel arrays at once
#![allow(clippy::needless_range_loop)]

//! recolor-core: color quantization and exact color substitution
//!
//! Pure buffer-in/buffer-out transformations for cleaning up raster images:
//! reduce the palette to counter anti-aliasing fringes, then swap one exact
//! color for another.
//!
//! # Quick Start
//!
//! ```
//! use recolor_core::{quantize_image, substitute, ColorTuple, PixelBuffer, QuantizationRequest};
//!
//! let original = PixelBuffer::from_pixels(
//!     2,
//!     1,
//!     &[ColorTuple::new(10, 20, 30, 255), ColorTuple::new(200, 200, 200, 255)],
//! )
//! .unwrap();
//!
//! let request = QuantizationRequest::parse(4, "threshold").unwrap();
//! let processed = quantize_image(&original, &request).unwrap();
//! assert_eq!(processed.pixel(1, 0), Some(ColorTuple::new(192, 192, 192, 255)));
//!
//! let swapped = substitute(
//!     &processed,
//!     ColorTuple::new(0, 0, 0, 255),
//!     ColorTuple::new(255, 255, 255, 255),
//! )
//! .unwrap();
//! assert_eq!(swapped.replaced, 1);
//! ```
//!
//! # Buffers
//!
//! [`PixelBuffer`] is either 3-channel RGB or 4-channel RGBA, row-major,
//! one byte per channel. Construction validates dimensions and length, so
//! every operation can assume a consistent buffer. Quantizers work on RGB;
//! [`quantize_image`] strips alpha off RGBA input and splices it back
//! unchanged. The substituter works on RGBA.
//!
//! # Quantization Methods
//!
//! | Identifier    | [`QuantizeMethod`]  | Behavior |
//! |---------------|---------------------|----------|
//! | `"kmeans"`    | `KMeans`            | Lloyd's k-means, k-means++ seeding, seed 42, best of 10 |
//! | `"quantize"`  | `MedianCut`         | Median-cut palette, nearest-entry mapping |
//! | `"threshold"` | `Threshold`         | `v -> floor(v / step) * step`, `step = 256 / k` |
//!
//! All three are deterministic.
//!
//! # Errors
//!
//! Every operation validates its inputs before touching a pixel and
//! returns a [`RecolorError`]; a partially transformed buffer is never
//! produced.
//!
//! # Features
//!
//! - `threads` (default): run the per-pixel maps on the rayon thread pool.
//!   Results are identical with or without it.

pub mod buffer;
pub mod color;
pub mod error;
pub mod quantize;
pub mod substitute;

#[cfg(test)]
mod domain_tests;

pub use buffer::{split_alpha, with_alpha, Layout, PixelBuffer};
pub use color::ColorTuple;
pub use error::{InputError, ParseColorError, RecolorError};
pub use quantize::{
    quantize, quantize_image, QuantizationRequest, QuantizeMethod, MAX_COLORS, MIN_COLORS,
};
pub use substitute::{count_color, substitute, Substitution};
