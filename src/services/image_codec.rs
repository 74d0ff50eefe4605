//! Image decoding and encoding at the edges of an edit session.
//!
//! Uploads of any supported format are decoded to RGBA, matching how the
//! editor always works on four channels. Downloads are encoded to the
//! requested format; PNG goes through the `png` crate and is recompressed
//! with oxipng, everything else through the `image` crate.

use image::{
    codecs::jpeg::JpegEncoder,
    error::{ParameterError, ParameterErrorKind},
    imageops::FilterType,
    DynamicImage, ImageBuffer, ImageError, ImageFormat,
};
use recolor_core::{Layout, PixelBuffer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use crate::error::CodecError;

/// A decoded upload
#[derive(Debug)]
pub struct DecodedImage {
    /// Always RGBA
    pub buffer: PixelBuffer,
    /// Detected container format, e.g. "png"
    pub format: String,
}

/// Download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// File extension for downloads
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Tiff => "tif",
            other => other.as_str(),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Tiff => "image/tiff",
        }
    }

    /// Whether the format can carry an alpha channel
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Gif => Some(OutputFormat::Gif),
            ImageFormat::Bmp => Some(OutputFormat::Bmp),
            ImageFormat::Tiff => Some(OutputFormat::Tiff),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            "bmp" => Ok(OutputFormat::Bmp),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            _ => Err(CodecError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Encoder settings taken from the app config
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub optimize_png: bool,
    pub jpeg_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            optimize_png: true,
            jpeg_quality: 90,
        }
    }
}

/// Decode an upload to an RGBA buffer, sniffing the format from its bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let format = image::guess_format(bytes)
        .map_err(|_| CodecError::UnsupportedFormat("unrecognized image data".to_string()))?;
    let name = match OutputFormat::from_image_format(format) {
        Some(known) => known.as_str().to_string(),
        None => return Err(CodecError::UnsupportedFormat(format!("{format:?}").to_lowercase())),
    };

    let rgba = image::load_from_memory_with_format(bytes, format)
        .map_err(CodecError::Decode)?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let buffer = PixelBuffer::from_rgba(width, height, rgba.into_raw())?;

    Ok(DecodedImage {
        buffer,
        format: name,
    })
}

/// Encode a buffer. JPEG has no alpha channel, so alpha is dropped.
pub fn encode(
    buffer: &PixelBuffer,
    format: OutputFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>, CodecError> {
    match format {
        OutputFormat::Png => encode_png(buffer, options.optimize_png),
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::from(to_dynamic(buffer)?.to_rgb8());
            let mut out = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
            rgb.write_with_encoder(encoder).map_err(CodecError::Encode)?;
            Ok(out)
        }
        _ => {
            let mut out = Vec::new();
            to_dynamic(buffer)?
                .write_to(&mut Cursor::new(&mut out), format.image_format())
                .map_err(CodecError::Encode)?;
            Ok(out)
        }
    }
}

fn encode_png(buffer: &PixelBuffer, optimize: bool) -> Result<Vec<u8>, CodecError> {
    let color_type = match buffer.layout() {
        Layout::Rgb => png::ColorType::Rgb,
        Layout::Rgba => png::ColorType::Rgba,
    };

    let mut png_bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_bytes, buffer.width(), buffer.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buffer.data())
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    }

    if !optimize {
        return Ok(png_bytes);
    }

    // Keep RGB under fully transparent pixels; a later substitution may target them
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, serving unoptimized PNG");
            Ok(png_bytes)
        }
    }
}

/// Downscale so neither edge exceeds `max_size`, with Lanczos3 filtering.
///
/// Images already within bounds are returned as-is; never upscales.
pub fn preview(buffer: &PixelBuffer, max_size: u32) -> Result<PixelBuffer, CodecError> {
    let (width, height) = (buffer.width(), buffer.height());
    let max_size = max_size.max(1);
    if width <= max_size && height <= max_size {
        return Ok(buffer.clone());
    }

    let ratio = f64::min(
        max_size as f64 / width as f64,
        max_size as f64 / height as f64,
    );
    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);

    let resized = to_dynamic(buffer)?.resize_exact(new_width, new_height, FilterType::Lanczos3);
    let scaled = match buffer.layout() {
        Layout::Rgb => PixelBuffer::from_rgb(new_width, new_height, resized.to_rgb8().into_raw())?,
        Layout::Rgba => {
            PixelBuffer::from_rgba(new_width, new_height, resized.to_rgba8().into_raw())?
        }
    };
    Ok(scaled)
}

/// Quoted strong ETag over encoded bytes
pub fn etag(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    // First 16 bytes of the hash, as 32 hex characters
    format!("\"{}\"", hex::encode(&digest[..16]))
}

fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage, CodecError> {
    let (width, height) = (buffer.width(), buffer.height());
    let data = buffer.data().to_vec();
    let image = match buffer.layout() {
        Layout::Rgb => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        Layout::Rgba => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
    };
    image.ok_or_else(|| {
        CodecError::Encode(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )))
    })
}
