//! Test fixtures and constants.

use std::io::Cursor;

/// Pixels of the 2x1 reference image
pub mod colors {
    pub const DARK: [u8; 4] = [10, 20, 30, 255];
    pub const LIGHT: [u8; 4] = [200, 200, 200, 255];
    pub const CLEAR: [u8; 4] = [0, 0, 0, 0];
}

/// Encode raw RGBA pixels as a PNG file
pub fn png_rgba(width: u32, height: u32, data: Vec<u8>) -> Vec<u8> {
    encode(width, height, data, image::ImageFormat::Png)
}

/// Encode raw RGBA pixels in the given container format
pub fn encode(width: u32, height: u32, data: Vec<u8>, format: image::ImageFormat) -> Vec<u8> {
    let image = image::RgbaImage::from_raw(width, height, data).expect("Invalid fixture size");
    let image = if format == image::ImageFormat::Png {
        image::DynamicImage::ImageRgba8(image)
    } else {
        // Formats without reliable alpha get the RGB part
        image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(image).to_rgb8())
    };
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), format)
        .expect("Failed to encode fixture");
    out
}

/// The 2x1 RGBA image `[(10,20,30,255), (200,200,200,255)]`
pub fn two_pixel_png() -> Vec<u8> {
    png_rgba(2, 1, [colors::DARK, colors::LIGHT].concat())
}

/// Horizontal gray gradient with a semi-transparent right half
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            let v = (x * 255 / width.saturating_sub(1).max(1)) as u8;
            let a = if x < width / 2 { 255 } else { 128 };
            data.extend_from_slice(&[v, v / 2, 255 - v, a]);
        }
    }
    png_rgba(width, height, data)
}

/// Opaque image whose red channel is `10 * x`
pub fn column_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 10) as u8, 0, 0, 255]);
        }
    }
    png_rgba(width, height, data)
}

/// Alpha plane of an RGBA byte vector
pub fn alpha_of(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).map(|px| px[3]).collect()
}
