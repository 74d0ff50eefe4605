//! Exact RGBA color value with range-checked construction.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseColorError, RecolorError};

/// An exact (R, G, B, A) color, each channel in `0..=255`.
///
/// Two tuples are equal iff all four channels are equal. There is no
/// tolerance and no distance threshold anywhere this type is compared.
///
/// # Example
///
/// ```
/// use recolor_core::ColorTuple;
///
/// let c = ColorTuple::from_channels(10, 20, 30, 255).unwrap();
/// assert_eq!(c, ColorTuple::new(10, 20, 30, 255));
/// assert_eq!(c.to_string(), "#0A141EFF");
///
/// assert!(ColorTuple::from_channels(256, 0, 0, 255).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorTuple {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl ColorTuple {
    /// Create a color from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color from wide integers, as submitted by a form.
    ///
    /// # Errors
    ///
    /// Returns [`RecolorError::ParameterRange`] naming the first channel
    /// outside `0..=255`.
    pub fn from_channels(r: i64, g: i64, b: i64, a: i64) -> Result<Self, RecolorError> {
        Ok(Self {
            r: channel("r", r)?,
            g: channel("g", g)?,
            b: channel("b", b)?,
            a: channel("a", a)?,
        })
    }

    /// Create a color from a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The color channels without alpha.
    #[inline]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, RecolorError> {
    RecolorError::check_range(name, value, 0, 255)?;
    Ok(value as u8)
}

impl From<[u8; 4]> for ColorTuple {
    fn from(bytes: [u8; 4]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<ColorTuple> for [u8; 4] {
    fn from(color: ColorTuple) -> Self {
        color.to_bytes()
    }
}

impl fmt::Display for ColorTuple {
    /// Formats as `#RRGGBBAA`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl FromStr for ColorTuple {
    type Err = ParseColorError;

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is
    /// optional, case-insensitive). Alpha defaults to 255.
    ///
    /// ```
    /// use recolor_core::ColorTuple;
    ///
    /// let c: ColorTuple = "#0A141E".parse().unwrap();
    /// assert_eq!(c, ColorTuple::new(10, 20, 30, 255));
    ///
    /// let c: ColorTuple = "f008".parse().unwrap();
    /// assert_eq!(c, ColorTuple::new(255, 0, 0, 136));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::NonAscii);
        }

        let short = |i: usize| -> Result<u8, ParseColorError> {
            Ok(u8::from_str_radix(&s[i..i + 1], 16)? * 17)
        };
        let long = |i: usize| -> Result<u8, ParseColorError> {
            Ok(u8::from_str_radix(&s[2 * i..2 * i + 2], 16)?)
        };

        match s.len() {
            3 => Ok(Self::opaque(short(0)?, short(1)?, short(2)?)),
            4 => Ok(Self::new(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Ok(Self::opaque(long(0)?, long(1)?, long(2)?)),
            8 => Ok(Self::new(long(0)?, long(1)?, long(2)?, long(3)?)),
            len => Err(ParseColorError::InvalidLength(len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_accepts_bounds() {
        let lo = ColorTuple::from_channels(0, 0, 0, 0).unwrap();
        let hi = ColorTuple::from_channels(255, 255, 255, 255).unwrap();
        assert_eq!(lo, ColorTuple::new(0, 0, 0, 0));
        assert_eq!(hi, ColorTuple::new(255, 255, 255, 255));
    }

    #[test]
    fn test_from_channels_names_offending_channel() {
        let err = ColorTuple::from_channels(0, 300, 0, 255).unwrap_err();
        assert_eq!(
            err,
            RecolorError::ParameterRange {
                name: "g",
                value: 300,
                min: 0,
                max: 255
            }
        );

        let err = ColorTuple::from_channels(0, 0, 0, -1).unwrap_err();
        assert!(matches!(err, RecolorError::ParameterRange { name: "a", .. }));
    }

    #[test]
    fn test_equality_is_exact() {
        let a = ColorTuple::new(10, 20, 30, 255);
        assert_eq!(a, ColorTuple::new(10, 20, 30, 255));
        assert_ne!(a, ColorTuple::new(10, 20, 30, 254));
        assert_ne!(a, ColorTuple::new(11, 20, 30, 255));
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(ColorTuple::opaque(255, 0, 128).to_string(), "#FF0080FF");
        assert_eq!(ColorTuple::new(0, 0, 0, 0).to_string(), "#00000000");
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#FF0080".parse::<ColorTuple>(), Ok(ColorTuple::opaque(255, 0, 128)));
        assert_eq!("ff008040".parse::<ColorTuple>(), Ok(ColorTuple::new(255, 0, 128, 64)));
        assert_eq!("#abc".parse::<ColorTuple>(), Ok(ColorTuple::opaque(0xAA, 0xBB, 0xCC)));
        assert_eq!(" #0000 ".parse::<ColorTuple>(), Ok(ColorTuple::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_parse_hex_display_round_trip() {
        let c = ColorTuple::new(1, 2, 3, 4);
        assert_eq!(c.to_string().parse::<ColorTuple>(), Ok(c));
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(
            "#12345".parse::<ColorTuple>(),
            Err(ParseColorError::InvalidLength(5))
        );
        assert_eq!("#ééé".parse::<ColorTuple>(), Err(ParseColorError::NonAscii));
        assert!(matches!(
            "#GG0000".parse::<ColorTuple>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_byte_conversions() {
        let c = ColorTuple::from([1, 2, 3, 4]);
        assert_eq!(c.rgb(), [1, 2, 3]);
        let bytes: [u8; 4] = c.into();
        assert_eq!(bytes, [1, 2, 3, 4]);
    }
}
