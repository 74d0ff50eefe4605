//! Color quantization with three interchangeable strategies.
//!
//! - [`QuantizeMethod::KMeans`] (`"kmeans"`): weighted Lloyd's k-means with
//!   deterministic k-means++ seeding, best of several runs.
//! - [`QuantizeMethod::MedianCut`] (`"quantize"`): median-cut palette plus
//!   nearest-entry mapping.
//! - [`QuantizeMethod::Threshold`] (`"threshold"`): per-channel floor to a
//!   fixed step.
//!
//! [`quantize`] works on RGB buffers. [`quantize_image`] accepts either
//! layout and, for RGBA, splices the untouched alpha plane back on.

mod histogram;
mod kmeans;
mod median_cut;
mod threshold;

use std::fmt;
use std::str::FromStr;

use crate::buffer::{split_alpha, with_alpha, Layout, PixelBuffer};
use crate::error::RecolorError;

pub use kmeans::{KMEANS_RUNS, KMEANS_SEED, MAX_ITERATIONS};

/// Smallest accepted color count.
pub const MIN_COLORS: u32 = 2;

/// Largest accepted color count.
pub const MAX_COLORS: u32 = 256;

/// Quantization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantizeMethod {
    /// Centroid clustering; slowest, best fit.
    #[default]
    KMeans,
    /// Median-cut palette quantization.
    MedianCut,
    /// Fixed-step per-channel threshold; cheapest.
    Threshold,
}

impl QuantizeMethod {
    /// All methods, in display order.
    pub const ALL: [QuantizeMethod; 3] = [
        QuantizeMethod::KMeans,
        QuantizeMethod::MedianCut,
        QuantizeMethod::Threshold,
    ];

    /// The identifier accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            QuantizeMethod::KMeans => "kmeans",
            QuantizeMethod::MedianCut => "quantize",
            QuantizeMethod::Threshold => "threshold",
        }
    }
}

impl fmt::Display for QuantizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantizeMethod {
    type Err = RecolorError;

    /// Parse a method identifier. Matching is exact: `"kmeans"`,
    /// `"quantize"` or `"threshold"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuantizeMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RecolorError::UnsupportedMethod(s.to_string()))
    }
}

/// Validated quantization parameters.
///
/// A request can only be built through [`new`](Self::new) or
/// [`parse`](Self::parse), so holding one means the color count is in
/// `MIN_COLORS..=MAX_COLORS`.
///
/// # Example
///
/// ```
/// use recolor_core::{QuantizationRequest, QuantizeMethod};
///
/// let request = QuantizationRequest::parse(8, "kmeans").unwrap();
/// assert_eq!(request.color_count(), 8);
/// assert_eq!(request.method(), QuantizeMethod::KMeans);
///
/// assert!(QuantizationRequest::parse(257, "kmeans").is_err());
/// assert!(QuantizationRequest::parse(8, "octree").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationRequest {
    color_count: u32,
    method: QuantizeMethod,
}

impl QuantizationRequest {
    /// Create a request.
    ///
    /// # Errors
    ///
    /// Returns [`RecolorError::ParameterRange`] if `color_count` is outside
    /// `2..=256`.
    pub fn new(color_count: i64, method: QuantizeMethod) -> Result<Self, RecolorError> {
        RecolorError::check_range(
            "color_count",
            color_count,
            MIN_COLORS as i64,
            MAX_COLORS as i64,
        )?;
        Ok(Self {
            color_count: color_count as u32,
            method,
        })
    }

    /// Create a request from a method identifier.
    ///
    /// The color count is checked first, then the method.
    ///
    /// # Errors
    ///
    /// [`RecolorError::ParameterRange`] for a bad count,
    /// [`RecolorError::UnsupportedMethod`] for an unknown method.
    pub fn parse(color_count: i64, method: &str) -> Result<Self, RecolorError> {
        RecolorError::check_range(
            "color_count",
            color_count,
            MIN_COLORS as i64,
            MAX_COLORS as i64,
        )?;
        Self::new(color_count, method.parse()?)
    }

    /// Target number of colors.
    #[inline]
    pub fn color_count(&self) -> u32 {
        self.color_count
    }

    /// Selected strategy.
    #[inline]
    pub fn method(&self) -> QuantizeMethod {
        self.method
    }

    /// Threshold step for this color count, `floor(256 / color_count)`.
    #[inline]
    pub fn threshold_step(&self) -> u32 {
        threshold::step_for(self.color_count)
    }
}

/// Reduce the colors of an RGB buffer.
///
/// Returns a new buffer with identical dimensions; the input is untouched.
///
/// # Errors
///
/// Returns [`RecolorError::InvalidInput`] if `rgb` is not an RGB buffer.
pub fn quantize(rgb: &PixelBuffer, request: &QuantizationRequest) -> Result<PixelBuffer, RecolorError> {
    rgb.ensure_layout(Layout::Rgb)?;

    let k = request.color_count();
    let data = match request.method() {
        QuantizeMethod::KMeans => kmeans::kmeans(rgb.data(), k as usize),
        QuantizeMethod::MedianCut => median_cut::median_cut(rgb.data(), k as usize),
        QuantizeMethod::Threshold => threshold::threshold(rgb.data(), k),
    };

    Ok(PixelBuffer::from_parts(
        rgb.width(),
        rgb.height(),
        Layout::Rgb,
        data,
    ))
}

/// Quantize a buffer of either layout, preserving alpha bit-for-bit.
///
/// RGBA input is split into RGB and alpha, the RGB part is quantized and
/// the original alpha plane is spliced back. RGB input is quantized
/// directly and stays RGB.
///
/// # Example
///
/// ```
/// use recolor_core::{quantize_image, PixelBuffer, QuantizationRequest};
///
/// let image = PixelBuffer::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 200, 200, 255]).unwrap();
/// let request = QuantizationRequest::parse(4, "threshold").unwrap();
///
/// let result = quantize_image(&image, &request).unwrap();
/// assert_eq!(result.data(), &[0, 0, 0, 255, 192, 192, 192, 255]);
/// ```
pub fn quantize_image(
    image: &PixelBuffer,
    request: &QuantizationRequest,
) -> Result<PixelBuffer, RecolorError> {
    match image.layout() {
        Layout::Rgb => quantize(image, request),
        Layout::Rgba => {
            let (rgb, alpha) = split_alpha(image)?;
            let quantized = quantize(&rgb, request)?;
            with_alpha(&quantized, &alpha)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip_identifiers() {
        for method in QuantizeMethod::ALL {
            assert_eq!(method.as_str().parse::<QuantizeMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_method_rejects_unknown_and_case_variants() {
        assert_eq!(
            "octree".parse::<QuantizeMethod>(),
            Err(RecolorError::UnsupportedMethod("octree".to_string()))
        );
        assert!("KMeans".parse::<QuantizeMethod>().is_err());
        assert!("".parse::<QuantizeMethod>().is_err());
    }

    #[test]
    fn test_request_count_checked_before_method() {
        let err = QuantizationRequest::parse(0, "nope").unwrap_err();
        assert_eq!(err.kind(), "parameter_range");
    }

    #[test]
    fn test_request_boundaries() {
        assert!(QuantizationRequest::new(2, QuantizeMethod::Threshold).is_ok());
        assert!(QuantizationRequest::new(256, QuantizeMethod::Threshold).is_ok());
        assert!(QuantizationRequest::new(1, QuantizeMethod::Threshold).is_err());
        assert!(QuantizationRequest::new(257, QuantizeMethod::Threshold).is_err());
        assert!(QuantizationRequest::new(-8, QuantizeMethod::Threshold).is_err());
    }

    #[test]
    fn test_threshold_step() {
        let request = QuantizationRequest::new(4, QuantizeMethod::Threshold).unwrap();
        assert_eq!(request.threshold_step(), 64);
    }

    #[test]
    fn test_quantize_rejects_rgba() {
        let rgba = PixelBuffer::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        let request = QuantizationRequest::new(4, QuantizeMethod::Threshold).unwrap();
        assert!(matches!(
            quantize(&rgba, &request),
            Err(RecolorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_quantize_image_rgb_stays_rgb() {
        let rgb = PixelBuffer::from_rgb(2, 1, vec![10, 20, 30, 200, 200, 200]).unwrap();
        let request = QuantizationRequest::new(4, QuantizeMethod::Threshold).unwrap();
        let out = quantize_image(&rgb, &request).unwrap();
        assert_eq!(out.layout(), Layout::Rgb);
        assert_eq!(out.data(), &[0, 0, 0, 192, 192, 192]);
    }

    #[test]
    fn test_quantize_does_not_mutate_input() {
        let data: Vec<u8> = (0..48).map(|i| (i * 5) as u8).collect();
        let rgb = PixelBuffer::from_rgb(4, 4, data.clone()).unwrap();
        for method in QuantizeMethod::ALL {
            let request = QuantizationRequest::new(3, method).unwrap();
            let out = quantize(&rgb, &request).unwrap();
            assert_eq!(out.width(), 4);
            assert_eq!(out.height(), 4);
            assert_eq!(rgb.data(), data.as_slice());
        }
    }
}
