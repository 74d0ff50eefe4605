//! Alpha-channel slicing and splicing.
//!
//! Quantization works on RGB only. These two functions take the alpha
//! plane off an RGBA buffer and put it back, position for position, so
//! the quantizer can never touch transparency.

use super::pixel_buffer::{Layout, PixelBuffer};
use crate::error::{InputError, RecolorError};

/// Split an RGBA buffer into its RGB sub-buffer and its alpha plane.
///
/// The alpha plane holds one byte per pixel in row-major order.
///
/// # Errors
///
/// Returns [`RecolorError::InvalidInput`] if `rgba` is not an RGBA buffer.
pub fn split_alpha(rgba: &PixelBuffer) -> Result<(PixelBuffer, Vec<u8>), RecolorError> {
    rgba.ensure_layout(Layout::Rgba)?;

    let count = rgba.pixel_count();
    let mut rgb = Vec::with_capacity(count * 3);
    let mut alpha = Vec::with_capacity(count);
    for px in rgba.data().chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }

    Ok((
        PixelBuffer::from_parts(rgba.width(), rgba.height(), Layout::Rgb, rgb),
        alpha,
    ))
}

/// Recombine an RGB buffer with an alpha plane into an RGBA buffer.
///
/// # Errors
///
/// Returns [`RecolorError::InvalidInput`] if `rgb` is not an RGB buffer or
/// the plane length differs from the pixel count.
pub fn with_alpha(rgb: &PixelBuffer, alpha: &[u8]) -> Result<PixelBuffer, RecolorError> {
    rgb.ensure_layout(Layout::Rgb)?;
    if alpha.len() != rgb.pixel_count() {
        return Err(InputError::AlphaLengthMismatch {
            expected: rgb.pixel_count(),
            actual: alpha.len(),
        }
        .into());
    }

    let mut data = Vec::with_capacity(alpha.len() * 4);
    for (px, &a) in rgb.data().chunks_exact(3).zip(alpha) {
        data.extend_from_slice(&[px[0], px[1], px[2], a]);
    }

    Ok(PixelBuffer::from_parts(
        rgb.width(),
        rgb.height(),
        Layout::Rgba,
        data,
    ))
}
