//! Domain-critical regression tests for recolor-core.
//!
//! Each test names the property it protects and what a failure would mean
//! for someone cleaning up an image.

#[cfg(test)]
mod domain_tests {
    use std::collections::HashSet;

    use crate::buffer::{Layout, PixelBuffer};
    use crate::color::ColorTuple;
    use crate::error::RecolorError;
    use crate::quantize::{quantize, quantize_image, QuantizationRequest, QuantizeMethod};
    use crate::substitute::{count_color, substitute};

    /// Deterministic pseudo-random RGBA image (xorshift, no external RNG).
    fn noisy_rgba(width: u32, height: u32, seed: u32) -> PixelBuffer {
        let mut state = seed.max(1);
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };
        let data = (0..width * height * 4).map(|_| next() as u8).collect();
        PixelBuffer::from_rgba(width, height, data).unwrap()
    }

    fn noisy_rgb(width: u32, height: u32, seed: u32) -> PixelBuffer {
        let rgba = noisy_rgba(width, height, seed);
        crate::buffer::split_alpha(&rgba).unwrap().0
    }

    fn alpha_plane(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.data().chunks_exact(4).map(|px| px[3]).collect()
    }

    fn distinct_colors(buffer: &PixelBuffer) -> HashSet<[u8; 3]> {
        buffer.pixels().map(|c| c.rgb()).collect()
    }

    fn two_by_one() -> PixelBuffer {
        PixelBuffer::from_pixels(
            2,
            1,
            &[
                ColorTuple::new(10, 20, 30, 255),
                ColorTuple::new(200, 200, 200, 255),
            ],
        )
        .unwrap()
    }

    // ========================================================================
    // Threshold
    // ========================================================================

    /// If this breaks, threshold is producing levels off the step grid, and
    /// the "cleaned" image still carries in-between anti-aliasing shades.
    #[test]
    fn test_threshold_outputs_multiples_of_step() {
        let input = noisy_rgb(32, 16, 7);
        for k in [2i64, 3, 4, 5, 7, 8, 16, 100, 255, 256] {
            let request = QuantizationRequest::new(k, QuantizeMethod::Threshold).unwrap();
            let step = request.threshold_step();
            let out = quantize(&input, &request).unwrap();

            let max_levels = 256u32.div_ceil(step) as usize;
            for channel in 0..3 {
                let levels: HashSet<u8> = out.data().iter().skip(channel).step_by(3).copied().collect();
                assert!(
                    levels.len() <= max_levels,
                    "k={} channel {} has {} levels, max {}",
                    k,
                    channel,
                    levels.len(),
                    max_levels
                );
                for v in levels {
                    assert_eq!(v as u32 % step, 0, "k={} produced off-grid value {}", k, v);
                }
            }
        }
    }

    /// If this breaks, re-running threshold drifts the image each time.
    #[test]
    fn test_threshold_idempotent() {
        let input = noisy_rgb(16, 16, 99);
        for k in [2i64, 3, 6, 10, 256] {
            let request = QuantizationRequest::new(k, QuantizeMethod::Threshold).unwrap();
            let once = quantize(&input, &request).unwrap();
            let twice = quantize(&once, &request).unwrap();
            assert_eq!(once, twice, "threshold k={} is not idempotent", k);
        }
    }

    #[test]
    fn test_threshold_two_by_one_scenario() {
        let request = QuantizationRequest::parse(4, "threshold").unwrap();
        let out = quantize_image(&two_by_one(), &request).unwrap();
        assert_eq!(out.layout(), Layout::Rgba);
        assert_eq!(out.pixel(0, 0), Some(ColorTuple::new(0, 0, 0, 255)));
        assert_eq!(out.pixel(1, 0), Some(ColorTuple::new(192, 192, 192, 255)));
    }

    // ========================================================================
    // Alpha preservation
    // ========================================================================

    /// If this breaks, quantizing a logo with a transparent background
    /// changes its transparency.
    #[test]
    fn test_alpha_preserved_for_every_method() {
        let input = noisy_rgba(24, 12, 3);
        for method in QuantizeMethod::ALL {
            let request = QuantizationRequest::new(4, method).unwrap();
            let out = quantize_image(&input, &request).unwrap();
            assert_eq!(out.width(), input.width());
            assert_eq!(out.height(), input.height());
            assert_eq!(out.layout(), Layout::Rgba);
            assert_eq!(
                alpha_plane(&out),
                alpha_plane(&input),
                "{} altered the alpha channel",
                method
            );
        }
    }

    // ========================================================================
    // Palette size
    // ========================================================================

    /// If this breaks, the quantizer is not actually reducing colors.
    #[test]
    fn test_palette_methods_respect_color_count() {
        let input = noisy_rgb(20, 20, 42);
        for method in [QuantizeMethod::KMeans, QuantizeMethod::MedianCut] {
            for k in [2i64, 5, 16] {
                let request = QuantizationRequest::new(k, method).unwrap();
                let out = quantize(&input, &request).unwrap();
                let n = distinct_colors(&out).len();
                assert!(n <= k as usize, "{} k={} produced {} colors", method, k, n);
            }
        }
    }

    /// If this breaks, an already-clean image gets its exact colors shifted
    /// by rounding, and substitution targets sampled before quantizing no
    /// longer match.
    #[test]
    fn test_few_unique_colors_pass_through() {
        let input = two_by_one();
        for method in [QuantizeMethod::KMeans, QuantizeMethod::MedianCut] {
            let request = QuantizationRequest::new(2, method).unwrap();
            assert_eq!(quantize_image(&input, &request).unwrap(), input);
        }
    }

    // ========================================================================
    // K-means determinism and termination
    // ========================================================================

    /// If this breaks, the same request yields different images on each run
    /// and the user cannot rely on a sampled color staying put.
    #[test]
    fn test_kmeans_deterministic() {
        let input = noisy_rgba(16, 16, 5);
        let request = QuantizationRequest::parse(6, "kmeans").unwrap();
        let a = quantize_image(&input, &request).unwrap();
        let b = quantize_image(&input, &request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_uniform_image_terminates_for_every_method() {
        let input = PixelBuffer::from_rgb(8, 8, vec![77; 8 * 8 * 3]).unwrap();
        for method in QuantizeMethod::ALL {
            let request = QuantizationRequest::new(256, method).unwrap();
            let out = quantize(&input, &request).unwrap();
            assert_eq!(distinct_colors(&out).len(), 1);
        }
    }

    // ========================================================================
    // Substitution
    // ========================================================================

    #[test]
    fn test_substitute_absent_target_is_noop() {
        let input = noisy_rgba(10, 10, 11);
        let absent = ColorTuple::new(1, 2, 3, 4);
        assert!(input.pixels().all(|p| p != absent));

        let out = substitute(&input, absent, ColorTuple::new(9, 9, 9, 9)).unwrap();
        assert_eq!(out.replaced, 0);
        assert_eq!(out.buffer, input);
    }

    /// If this breaks, swapping a color and swapping it back loses pixels.
    #[test]
    fn test_substitute_round_trip() {
        let a = ColorTuple::new(10, 20, 30, 255);
        let b = ColorTuple::new(250, 0, 250, 128);
        let input = PixelBuffer::from_pixels(
            3,
            2,
            &[
                a,
                ColorTuple::new(0, 0, 0, 255),
                a,
                ColorTuple::new(10, 20, 30, 0),
                a,
                ColorTuple::new(255, 255, 255, 255),
            ],
        )
        .unwrap();

        let forward = substitute(&input, a, b).unwrap();
        assert_eq!(forward.replaced, 3);
        let back = substitute(&forward.buffer, b, a).unwrap();
        assert_eq!(back.replaced, 3);
        assert_eq!(back.buffer, input);
    }

    /// If this breaks, the reported `replaced` count no longer matches the
    /// pixels that actually held the target color.
    #[test]
    fn test_substitute_replaced_matches_target_count() {
        let request = QuantizationRequest::parse(4, "threshold").unwrap();
        let input = quantize_image(&noisy_rgba(24, 24, 5), &request).unwrap();
        let target = input.pixel(0, 0).unwrap();
        let replacement = ColorTuple::new(1, 2, 3, 4);
        let expected = count_color(&input, target);
        assert!(expected >= 1);

        let out = substitute(&input, target, replacement).unwrap();

        assert_eq!(out.replaced, expected);
        assert_eq!(count_color(&out.buffer, target), 0);
        assert_eq!(
            count_color(&out.buffer, replacement),
            expected + count_color(&input, replacement)
        );
    }

    #[test]
    fn test_substitute_two_by_one_scenario() {
        let out = substitute(
            &two_by_one(),
            ColorTuple::new(10, 20, 30, 255),
            ColorTuple::new(0, 0, 0, 0),
        )
        .unwrap();
        assert_eq!(out.buffer.pixel(0, 0), Some(ColorTuple::new(0, 0, 0, 0)));
        assert_eq!(out.buffer.pixel(1, 0), Some(ColorTuple::new(200, 200, 200, 255)));
    }

    // ========================================================================
    // Parameter validation
    // ========================================================================

    #[test]
    fn test_color_count_boundaries() {
        for method in QuantizeMethod::ALL {
            assert!(QuantizationRequest::new(2, method).is_ok());
            assert!(QuantizationRequest::new(256, method).is_ok());
            for bad in [1i64, 257] {
                assert!(matches!(
                    QuantizationRequest::new(bad, method),
                    Err(RecolorError::ParameterRange {
                        name: "color_count",
                        ..
                    })
                ));
            }
        }
    }

    /// If this breaks, an unknown method silently falls through to a stale
    /// or default result instead of an error.
    #[test]
    fn test_unknown_method_is_an_error() {
        assert_eq!(
            QuantizationRequest::parse(8, "dither").unwrap_err(),
            RecolorError::UnsupportedMethod("dither".to_string())
        );
    }

    #[test]
    fn test_channel_out_of_range_rejected() {
        let err = ColorTuple::from_channels(0, 0, 300, 255).unwrap_err();
        assert!(matches!(
            err,
            RecolorError::ParameterRange {
                name: "b",
                value: 300,
                ..
            }
        ));
        assert!(ColorTuple::from_channels(-1, 0, 0, 0).is_err());
    }
}
