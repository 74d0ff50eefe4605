//! Weighted median-cut palette quantization.
//!
//! The unique-color histogram is recursively split into at most
//! `max_colors` boxes. Each palette entry is the rounded weighted mean of
//! a box, and every color is then mapped to its nearest palette entry.

#[cfg(feature = "threads")]
use rayon::prelude::*;

use super::histogram::ColorHistogram;

/// A set of histogram entries (indices into the histogram).
struct ColorBox {
    members: Vec<usize>,
}

impl ColorBox {
    fn weight(&self, histogram: &ColorHistogram) -> u64 {
        let counts = histogram.counts();
        self.members.iter().map(|&i| counts[i] as u64).sum()
    }

    /// Range (max - min) of each channel over the box.
    fn ranges(&self, histogram: &ColorHistogram) -> [u8; 3] {
        let colors = histogram.colors();
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for &i in &self.members {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(colors[i][axis]);
                hi[axis] = hi[axis].max(colors[i][axis]);
            }
        }
        [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]]
    }

    /// Heavy boxes with a wide spread split first.
    fn priority(&self, histogram: &ColorHistogram) -> u64 {
        let [r, g, b] = self.ranges(histogram);
        self.weight(histogram) * r.max(g).max(b) as u64
    }

    fn mean(&self, histogram: &ColorHistogram) -> [u8; 3] {
        let colors = histogram.colors();
        let counts = histogram.counts();
        let mut sum = [0u64; 3];
        let mut total = 0u64;
        for &i in &self.members {
            let w = counts[i] as u64;
            for axis in 0..3 {
                sum[axis] += colors[i][axis] as u64 * w;
            }
            total += w;
        }
        // Integer round-half-up of sum / total
        let avg = |s: u64| ((2 * s + total) / (2 * total)).min(255) as u8;
        [avg(sum[0]), avg(sum[1]), avg(sum[2])]
    }

    /// Split along the widest channel at the weighted median.
    fn split(mut self, histogram: &ColorHistogram) -> (ColorBox, ColorBox) {
        let [r, g, b] = self.ranges(histogram);
        let axis = if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        };

        let colors = histogram.colors();
        let counts = histogram.counts();
        // Stable sort keeps first-seen order among equal channel values
        self.members.sort_by_key(|&i| colors[i][axis]);

        let half = self.weight(histogram) / 2;
        let mut accumulated = 0u64;
        let mut split_idx = 1;
        for (pos, &i) in self.members.iter().enumerate() {
            accumulated += counts[i] as u64;
            if accumulated >= half && pos + 1 < self.members.len() {
                split_idx = pos + 1;
                break;
            }
        }
        split_idx = split_idx.clamp(1, self.members.len() - 1);

        let right = self.members.split_off(split_idx);
        (self, ColorBox { members: right })
    }
}

/// Build a palette of at most `max_colors` entries and map every pixel to
/// its nearest entry.
///
/// Images with at most `max_colors` unique colors are returned unchanged.
pub(crate) fn median_cut(rgb: &[u8], max_colors: usize) -> Vec<u8> {
    let histogram = ColorHistogram::from_rgb(rgb);
    if histogram.len() <= max_colors {
        return rgb.to_vec();
    }

    let palette = build_palette(&histogram, max_colors);

    #[cfg(feature = "threads")]
    let replacement: Vec<[u8; 3]> = histogram
        .colors()
        .par_iter()
        .map(|c| palette[nearest(c, &palette)])
        .collect();
    #[cfg(not(feature = "threads"))]
    let replacement: Vec<[u8; 3]> = histogram
        .colors()
        .iter()
        .map(|c| palette[nearest(c, &palette)])
        .collect();

    histogram.remap(&replacement)
}

fn build_palette(histogram: &ColorHistogram, max_colors: usize) -> Vec<[u8; 3]> {
    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox {
        members: (0..histogram.len()).collect(),
    });

    while boxes.len() < max_colors {
        let best_idx = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.members.len() >= 2)
            .max_by_key(|(i, b)| (b.priority(histogram), std::cmp::Reverse(*i)))
            .map(|(i, _)| i);

        let Some(idx) = best_idx else {
            break;
        };

        let (left, right) = boxes.swap_remove(idx).split(histogram);
        boxes.push(left);
        boxes.push(right);
    }

    boxes.iter().map(|b| b.mean(histogram)).collect()
}

/// Index of the nearest palette entry; ties resolve to the lowest index.
fn nearest(color: &[u8; 3], palette: &[[u8; 3]]) -> usize {
    let mut best = (0, u32::MAX);
    for (i, p) in palette.iter().enumerate() {
        let d = dist_sq(color, p);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

#[inline]
fn dist_sq(a: &[u8; 3], b: &[u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
