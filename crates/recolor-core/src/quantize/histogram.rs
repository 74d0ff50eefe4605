//! Unique-color histogram over an RGB byte slice.
//!
//! Both palette strategies work on unique colors rather than pixels:
//! identical pixels always land in the same cluster or box, so collapsing
//! them into weighted entries changes nothing but the cost.

use std::collections::HashMap;

pub(crate) struct ColorHistogram {
    /// Unique colors in order of first appearance.
    colors: Vec<[u8; 3]>,
    /// Number of pixels per unique color.
    counts: Vec<u32>,
    /// Unique-color index of every pixel, row-major.
    pixel_index: Vec<u32>,
}

impl ColorHistogram {
    pub(crate) fn from_rgb(rgb: &[u8]) -> Self {
        let mut lookup: HashMap<u32, u32> = HashMap::new();
        let mut colors = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        let mut pixel_index = Vec::with_capacity(rgb.len() / 3);

        for px in rgb.chunks_exact(3) {
            let key = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
            let idx = *lookup.entry(key).or_insert_with(|| {
                colors.push([px[0], px[1], px[2]]);
                counts.push(0);
                (colors.len() - 1) as u32
            });
            counts[idx as usize] += 1;
            pixel_index.push(idx);
        }

        Self {
            colors,
            counts,
            pixel_index,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub(crate) fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    #[inline]
    pub(crate) fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Rebuild the RGB pixel data with every unique color replaced.
    ///
    /// `replacement[i]` is the output color for `colors()[i]`.
    pub(crate) fn remap(&self, replacement: &[[u8; 3]]) -> Vec<u8> {
        debug_assert_eq!(replacement.len(), self.colors.len());
        let mut out = Vec::with_capacity(self.pixel_index.len() * 3);
        for &idx in &self.pixel_index {
            out.extend_from_slice(&replacement[idx as usize]);
        }
        out
    }
}
