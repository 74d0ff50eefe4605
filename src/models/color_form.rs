use recolor_core::{ColorTuple, RecolorError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

/// RGBA channels as submitted by a form.
///
/// Values are kept wide so an out-of-range entry reaches the core's range
/// check instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColorForm {
    pub r: i64,
    pub g: i64,
    pub b: i64,
    /// Alpha, 255 (opaque) when omitted
    #[serde(default = "opaque")]
    pub a: i64,
}

fn opaque() -> i64 {
    255
}

impl ColorForm {
    pub fn to_color(&self) -> Result<ColorTuple, RecolorError> {
        ColorTuple::from_channels(self.r, self.g, self.b, self.a)
    }
}

impl From<ColorTuple> for ColorForm {
    fn from(c: ColorTuple) -> Self {
        Self {
            r: c.r as i64,
            g: c.g as i64,
            b: c.b as i64,
            a: c.a as i64,
        }
    }
}

/// A color given either as channels or as a hex string (`"#RRGGBB[AA]"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ColorInput {
    Hex(String),
    Channels(ColorForm),
}

impl ColorInput {
    pub fn to_color(&self) -> Result<ColorTuple, ApiError> {
        match self {
            ColorInput::Hex(s) => s
                .parse::<ColorTuple>()
                .map_err(|e| ApiError::InvalidColor(format!("{s:?}: {e}"))),
            ColorInput::Channels(form) => Ok(form.to_color()?),
        }
    }
}
