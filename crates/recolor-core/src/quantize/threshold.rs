//! Fixed-step per-channel threshold quantization.

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Step size for a color count: `floor(256 / color_count)`.
#[inline]
pub(crate) fn step_for(color_count: u32) -> u32 {
    256 / color_count
}

/// Floor every channel value to a multiple of the step.
///
/// No cross-pixel dependency: each byte maps through a 256-entry table.
pub(crate) fn threshold(rgb: &[u8], color_count: u32) -> Vec<u8> {
    let step = step_for(color_count);
    let lut: [u8; 256] = std::array::from_fn(|v| ((v as u32 / step) * step).min(255) as u8);

    #[cfg(feature = "threads")]
    let out = rgb.par_iter().map(|&v| lut[v as usize]).collect();
    #[cfg(not(feature = "threads"))]
    let out = rgb.iter().map(|&v| lut[v as usize]).collect();

    out
}
