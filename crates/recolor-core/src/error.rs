//! Error type for the recolor-core pipeline.
//!
//! Every failure is detected at the call boundary, before any pixel is
//! touched, so a caller either gets a complete new buffer or one of these.

use std::fmt;
use std::num::ParseIntError;

use crate::buffer::Layout;

/// Why a buffer (or a buffer/plane pair) was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Width or height is zero.
    ZeroDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Byte length does not match `width * height * channels`.
    LengthMismatch {
        /// Bytes required by the dimensions and layout
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
    /// The operation needs a different channel layout.
    WrongLayout {
        /// Layout the operation works on
        expected: Layout,
        /// Layout of the supplied buffer
        actual: Layout,
    },
    /// Alpha plane length does not match the pixel count.
    AlphaLengthMismatch {
        /// Pixel count of the color buffer
        expected: usize,
        /// Length of the alpha plane
        actual: usize,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::ZeroDimensions { width, height } => {
                write!(f, "image has zero dimensions ({}x{})", width, height)
            }
            InputError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel data length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            InputError::WrongLayout { expected, actual } => {
                write!(f, "expected {} buffer, got {}", expected, actual)
            }
            InputError::AlphaLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "alpha plane length mismatch: expected {} values, got {}",
                    expected, actual
                )
            }
        }
    }
}

/// Error parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Digit count is not 3, 4, 6 or 8 after stripping `#`.
    InvalidLength(usize),
    /// The string contains non-ASCII characters.
    NonAscii,
    /// A digit is not hexadecimal.
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength(len) => write!(
                f,
                "invalid hex color length {} (expected 3, 4, 6 or 8 digits)",
                len
            ),
            ParseColorError::NonAscii => write!(f, "hex color must be ASCII"),
            ParseColorError::InvalidHex(err) => write!(f, "invalid hex digit: {}", err),
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Unified error type for the recolor-core public API.
///
/// The three variants are distinct on purpose: a UI can tell a bad
/// parameter, an unknown method and a broken buffer apart without parsing
/// messages. See [`RecolorError::kind`] for stable identifiers.
///
/// # Example
///
/// ```
/// use recolor_core::{QuantizationRequest, RecolorError};
///
/// let err = QuantizationRequest::parse(1, "threshold").unwrap_err();
/// assert!(matches!(err, RecolorError::ParameterRange { .. }));
/// assert_eq!(err.kind(), "parameter_range");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecolorError {
    /// A numeric parameter (color count, channel value) is outside its domain.
    ParameterRange {
        /// Parameter name, e.g. `color_count` or `target.r`
        name: &'static str,
        /// The rejected value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
    /// The quantization method identifier is not recognized.
    UnsupportedMethod(String),
    /// The buffer is empty, mis-sized or has the wrong channel layout.
    InvalidInput(InputError),
}

impl RecolorError {
    /// Stable machine-readable identifier for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            RecolorError::ParameterRange { .. } => "parameter_range",
            RecolorError::UnsupportedMethod(_) => "unsupported_method",
            RecolorError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Check `value` against an inclusive range.
    pub(crate) fn check_range(
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    ) -> Result<(), RecolorError> {
        if value < min || value > max {
            return Err(RecolorError::ParameterRange {
                name,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for RecolorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecolorError::ParameterRange {
                name,
                value,
                min,
                max,
            } => write!(
                f,
                "{} out of range: {} (expected {}..={})",
                name, value, min, max
            ),
            RecolorError::UnsupportedMethod(method) => {
                write!(f, "unsupported quantization method: {:?}", method)
            }
            RecolorError::InvalidInput(err) => write!(f, "invalid input: {}", err),
        }
    }
}

impl std::error::Error for RecolorError {}

impl From<InputError> for RecolorError {
    fn from(err: InputError) -> Self {
        RecolorError::InvalidInput(err)
    }
}
