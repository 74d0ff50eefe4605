//! Exact-match color substitution over an RGBA buffer.

#[cfg(feature = "threads")]
use rayon::prelude::*;

use crate::buffer::{Layout, PixelBuffer};
use crate::color::ColorTuple;
use crate::error::RecolorError;

/// Result of [`substitute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The new buffer, same dimensions as the input.
    pub buffer: PixelBuffer,
    /// Number of pixels that matched the target.
    pub replaced: usize,
}

/// Replace every pixel exactly equal to `target` with `replacement`.
///
/// Matching compares all four channels; there is no tolerance. The input
/// is never modified. When nothing matches (or `target == replacement`)
/// the output is a byte-identical copy.
///
/// # Errors
///
/// Returns [`RecolorError::InvalidInput`] if `rgba` is not an RGBA buffer.
///
/// # Example
///
/// ```
/// use recolor_core::{substitute, ColorTuple, PixelBuffer};
///
/// let image = PixelBuffer::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 200, 200, 255]).unwrap();
/// let result = substitute(
///     &image,
///     ColorTuple::new(10, 20, 30, 255),
///     ColorTuple::new(0, 0, 0, 0),
/// )
/// .unwrap();
///
/// assert_eq!(result.replaced, 1);
/// assert_eq!(result.buffer.data(), &[0, 0, 0, 0, 200, 200, 200, 255]);
/// ```
pub fn substitute(
    rgba: &PixelBuffer,
    target: ColorTuple,
    replacement: ColorTuple,
) -> Result<Substitution, RecolorError> {
    rgba.ensure_layout(Layout::Rgba)?;

    let target = target.to_bytes();
    let replacement = replacement.to_bytes();
    let mut data = rgba.data().to_vec();

    #[cfg(feature = "threads")]
    let replaced: usize = data
        .par_chunks_exact_mut(4)
        .map(|px| replace_pixel(px, &target, &replacement))
        .sum();
    #[cfg(not(feature = "threads"))]
    let replaced: usize = data
        .chunks_exact_mut(4)
        .map(|px| replace_pixel(px, &target, &replacement))
        .sum();

    Ok(Substitution {
        buffer: PixelBuffer::from_parts(rgba.width(), rgba.height(), Layout::Rgba, data),
        replaced,
    })
}

/// Count pixels exactly equal to `color`. RGB pixels compare with alpha 255.
pub fn count_color(buffer: &PixelBuffer, color: ColorTuple) -> usize {
    buffer.pixels().filter(|&p| p == color).count()
}

#[inline]
fn replace_pixel(px: &mut [u8], target: &[u8; 4], replacement: &[u8; 4]) -> usize {
    if *px == *target {
        px.copy_from_slice(replacement);
        1
    } else {
        0
    }
}
