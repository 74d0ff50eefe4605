//! Owned row-major pixel buffer with explicit dimensions and layout.

use std::collections::HashSet;
use std::fmt;

use crate::color::ColorTuple;
use crate::error::{InputError, RecolorError};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// 3 channels: R, G, B. Working form during quantization.
    Rgb,
    /// 4 channels: R, G, B, A. Substitution, display and persisted form.
    Rgba,
}

impl Layout {
    /// Bytes per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Layout::Rgb => 3,
            Layout::Rgba => 4,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Rgb => write!(f, "RGB"),
            Layout::Rgba => write!(f, "RGBA"),
        }
    }
}

/// A `width x height` grid of 8-bit pixels stored row-major.
///
/// Construction validates the dimensions and the byte length, so every
/// `PixelBuffer` in existence is non-empty and consistent. Transformations
/// in this crate never mutate a buffer; they return a new one.
///
/// # Example
///
/// ```
/// use recolor_core::{ColorTuple, Layout, PixelBuffer};
///
/// let buffer = PixelBuffer::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 200, 200, 128]).unwrap();
/// assert_eq!(buffer.layout(), Layout::Rgba);
/// assert_eq!(buffer.pixel(1, 0), Some(ColorTuple::new(200, 200, 200, 128)));
/// assert_eq!(buffer.pixel(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: Layout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from raw channel bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RecolorError::InvalidInput`] if either dimension is zero or
    /// `data.len() != width * height * layout.channels()`.
    pub fn new(width: u32, height: u32, layout: Layout, data: Vec<u8>) -> Result<Self, RecolorError> {
        if width == 0 || height == 0 {
            return Err(InputError::ZeroDimensions { width, height }.into());
        }
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(InputError::LengthMismatch {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Create an RGB buffer (`[R, G, B, R, G, B, ...]`).
    #[inline]
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RecolorError> {
        Self::new(width, height, Layout::Rgb, data)
    }

    /// Create an RGBA buffer (`[R, G, B, A, R, G, B, A, ...]`).
    #[inline]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RecolorError> {
        Self::new(width, height, Layout::Rgba, data)
    }

    /// Create an RGBA buffer from a row-major slice of colors.
    pub fn from_pixels(width: u32, height: u32, pixels: &[ColorTuple]) -> Result<Self, RecolorError> {
        let data = pixels.iter().flat_map(|c| c.to_bytes()).collect();
        Self::from_rgba(width, height, data)
    }

    /// Wrap data whose length is already known to match.
    pub(crate) fn from_parts(width: u32, height: u32, layout: Layout, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * layout.channels(),
            "pixel data length must match {}x{} {}",
            width,
            height,
            layout,
        );
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether the buffer carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.layout == Layout::Rgba
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw channel bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read a single pixel. RGB buffers report alpha 255.
    ///
    /// Returns `None` when `(x, y)` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<ColorTuple> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.layout.channels();
        let offset = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[offset..offset + channels];
        Some(match self.layout {
            Layout::Rgb => ColorTuple::opaque(px[0], px[1], px[2]),
            Layout::Rgba => ColorTuple::new(px[0], px[1], px[2], px[3]),
        })
    }

    /// Iterate all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = ColorTuple> + '_ {
        let layout = self.layout;
        self.data
            .chunks_exact(layout.channels())
            .map(move |px| match layout {
                Layout::Rgb => ColorTuple::opaque(px[0], px[1], px[2]),
                Layout::Rgba => ColorTuple::new(px[0], px[1], px[2], px[3]),
            })
    }

    /// Number of distinct colors (alpha included).
    pub fn distinct_colors(&self) -> usize {
        self.pixels().collect::<HashSet<_>>().len()
    }

    /// Fail with [`InputError::WrongLayout`] unless the layout matches.
    pub fn ensure_layout(&self, expected: Layout) -> Result<(), RecolorError> {
        if self.layout != expected {
            return Err(InputError::WrongLayout {
                expected,
                actual: self.layout,
            }
            .into());
        }
        Ok(())
    }

    /// Return an RGBA copy. RGB pixels become fully opaque.
    pub fn to_rgba(&self) -> PixelBuffer {
        match self.layout {
            Layout::Rgba => self.clone(),
            Layout::Rgb => {
                let mut data = Vec::with_capacity(self.pixel_count() * 4);
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                PixelBuffer::from_parts(self.width, self.height, Layout::Rgba, data)
            }
        }
    }
}
