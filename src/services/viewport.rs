//! Mapping between a fit-to-canvas view and image coordinates.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::CanvasConfig;

/// How an image of a given size is shown on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Viewport {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub image_width: u32,
    pub image_height: u32,
    /// Scale from image to canvas, never above 1.0
    pub display_ratio: f64,
    pub display_width: u32,
    pub display_height: u32,
}

impl Viewport {
    /// Fit an image onto the canvas. Images that already fit are shown
    /// 1:1 in the top-left corner.
    pub fn fit(canvas: CanvasConfig, image_width: u32, image_height: u32) -> Self {
        let ratio = f64::min(
            canvas.width as f64 / image_width.max(1) as f64,
            canvas.height as f64 / image_height.max(1) as f64,
        );
        let display_ratio = ratio.min(1.0);
        let (display_width, display_height) = if display_ratio < 1.0 {
            (
                (image_width as f64 * display_ratio) as u32,
                (image_height as f64 * display_ratio) as u32,
            )
        } else {
            (image_width, image_height)
        };

        Self {
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            image_width,
            image_height,
            display_ratio,
            display_width,
            display_height,
        }
    }

    /// Image coordinate under a canvas click (truncating division).
    ///
    /// The result may lie outside the image when the click misses it.
    pub fn to_image(&self, canvas_x: u32, canvas_y: u32) -> (u32, u32) {
        (
            (canvas_x as f64 / self.display_ratio) as u32,
            (canvas_y as f64 / self.display_ratio) as u32,
        )
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.image_width && y < self.image_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasConfig = CanvasConfig {
        width: 650,
        height: 400,
    };

    #[test]
    fn test_small_image_is_one_to_one() {
        let v = Viewport::fit(CANVAS, 100, 50);
        assert_eq!(v.display_ratio, 1.0);
        assert_eq!((v.display_width, v.display_height), (100, 50));
        assert_eq!(v.to_image(42, 7), (42, 7));
    }

    #[test]
    fn test_wide_image_scales_by_width() {
        let v = Viewport::fit(CANVAS, 1300, 400);
        assert_eq!(v.display_ratio, 0.5);
        assert_eq!((v.display_width, v.display_height), (650, 200));
        assert_eq!(v.to_image(100, 51), (200, 102));
    }

    #[test]
    fn test_tall_image_scales_by_height() {
        let v = Viewport::fit(CANVAS, 400, 1600);
        assert_eq!(v.display_ratio, 0.25);
        assert_eq!((v.display_width, v.display_height), (100, 400));
        assert_eq!(v.to_image(3, 3), (12, 12));
    }

    #[test]
    fn test_click_outside_image() {
        let v = Viewport::fit(CANVAS, 100, 50);
        let (x, y) = v.to_image(200, 10);
        assert!(!v.contains(x, y));
        assert!(v.contains(99, 49));
    }
}
