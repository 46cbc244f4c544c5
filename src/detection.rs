use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::{BoundingRect, Corner, CornerPoint};

/// Side length of the square window searched at each image corner
pub const CORNER_SEARCH_SIZE: u32 = 50;

/// Channels above this value on all of R, G and B count as background
pub const BACKGROUND_THRESHOLD: u8 = 250;

/// How the crop rectangle was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Reconciled from the black bracket marks
    Brackets,
    /// Bounding box of all non-background pixels
    ContentFallback,
}

/// Result of the detection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedBounds {
    pub rect: BoundingRect,
    pub method: DetectionMethod,
}

/// First pure-black pixel found in each corner window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketCorners {
    pub top_left: Option<CornerPoint>,
    pub top_right: Option<CornerPoint>,
    pub bottom_left: Option<CornerPoint>,
    pub bottom_right: Option<CornerPoint>,
}

impl BracketCorners {
    pub fn find(img: &RgbaImage) -> Self {
        Self {
            top_left: find_corner(img, Corner::TopLeft),
            top_right: find_corner(img, Corner::TopRight),
            bottom_left: find_corner(img, Corner::BottomLeft),
            bottom_right: find_corner(img, Corner::BottomRight),
        }
    }

    /// Build the crop rectangle from the bracket corners, moved inward by `inset`.
    ///
    /// Needs the top-left and bottom-right corners. The other two can only
    /// extend the rectangle, never shrink it. The result is not validated.
    pub fn reconcile(&self, inset: u32) -> Option<BoundingRect> {
        let top_left = self.top_left?;
        let bottom_right = self.bottom_right?;
        let inset = inset as i64;

        let mut rect = BoundingRect::new(
            top_left.x as i64 + inset,
            top_left.y as i64 + inset,
            bottom_right.x as i64 - inset,
            bottom_right.y as i64 - inset,
        );

        if let Some(top_right) = self.top_right {
            rect.right = rect.right.max(top_right.x as i64 - inset);
            rect.top = rect.top.min(top_right.y as i64 + inset);
        }
        if let Some(bottom_left) = self.bottom_left {
            rect.left = rect.left.min(bottom_left.x as i64 + inset);
            rect.bottom = rect.bottom.max(bottom_left.y as i64 - inset);
        }

        Some(rect)
    }
}

fn is_black(pixel: &Rgba<u8>) -> bool {
    pixel[0] == 0 && pixel[1] == 0 && pixel[2] == 0
}

fn is_background(pixel: &Rgba<u8>) -> bool {
    pixel[0] > BACKGROUND_THRESHOLD
        && pixel[1] > BACKGROUND_THRESHOLD
        && pixel[2] > BACKGROUND_THRESHOLD
}

/// Scan the window anchored at `corner` for the first pure-black pixel.
///
/// Rows are the outer loop. Both axes start at the anchoring image edge, so
/// the top-right window walks rows downward and columns leftward from
/// `(width - 1, 0)`, and so on for the other corners. Alpha is ignored.
pub fn find_corner(img: &RgbaImage, corner: Corner) -> Option<CornerPoint> {
    let (width, height) = img.dimensions();
    let window_width = CORNER_SEARCH_SIZE.min(width);
    let window_height = CORNER_SEARCH_SIZE.min(height);

    for dy in 0..window_height {
        let y = if corner.scans_up() { height - 1 - dy } else { dy };
        for dx in 0..window_width {
            let x = if corner.scans_left() { width - 1 - dx } else { dx };
            if is_black(img.get_pixel(x, y)) {
                return Some(CornerPoint::new(x, y));
            }
        }
    }

    None
}

/// Bounding box of every pixel that is not near-white.
///
/// An image with no such pixel is a detection failure rather than an empty
/// rectangle.
pub fn content_bounds(img: &RgbaImage) -> Result<BoundingRect> {
    let (width, height) = img.dimensions();
    let mut left = width;
    let mut top = height;
    let mut right = 0;
    let mut bottom = 0;
    let mut found = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if !is_background(pixel) {
            left = left.min(x);
            right = right.max(x);
            top = top.min(y);
            bottom = bottom.max(y);
            found = true;
        }
    }

    if !found {
        return Err(Error::DetectionFailure { width, height });
    }

    Ok(BoundingRect::new(
        left as i64,
        top as i64,
        right as i64,
        bottom as i64,
    ))
}

/// Main detection function: find the crop rectangle for a screenshot.
///
/// Uses the bracket corners when the top-left and bottom-right marks are
/// present and the inset leaves a non-empty rectangle, otherwise the
/// content bounds of the whole image.
pub fn locate_bounds(img: &RgbaImage, inset: u32) -> Result<DetectedBounds> {
    let (width, height) = img.dimensions();
    let corners = BracketCorners::find(img);
    debug!(?corners, "Bracket corner candidates");

    match corners.reconcile(inset) {
        Some(rect) if rect.is_valid() && rect.fits_within(width, height) => {
            return Ok(DetectedBounds {
                rect,
                method: DetectionMethod::Brackets,
            });
        }
        Some(rect) => {
            warn!(
                ?rect,
                inset, "Bracket offset too large, using content bounds fallback"
            );
        }
        None => {
            debug!("Bracket corners not found, using content bounds fallback");
        }
    }

    let rect = content_bounds(img)?;
    Ok(DetectedBounds {
        rect,
        method: DetectionMethod::ContentFallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bracketed_image, draw_bracket, WHITE};

    #[test]
    fn test_four_corner_scenario() {
        let img = bracketed_image(800, 600, 10);
        let corners = BracketCorners::find(&img);
        assert_eq!(corners.top_left, Some(CornerPoint::new(10, 10)));
        assert_eq!(corners.top_right, Some(CornerPoint::new(790, 10)));
        assert_eq!(corners.bottom_left, Some(CornerPoint::new(10, 590)));
        assert_eq!(corners.bottom_right, Some(CornerPoint::new(790, 590)));

        let bounds = locate_bounds(&img, 2).unwrap();
        assert_eq!(bounds.method, DetectionMethod::Brackets);
        assert_eq!(bounds.rect, BoundingRect::new(12, 12, 788, 588));
    }

    #[test]
    fn test_inset_applied_on_every_side() {
        let img = bracketed_image(200, 120, 5);
        for inset in [0, 1, 3, 7] {
            let rect = locate_bounds(&img, inset).unwrap().rect;
            let i = inset as i64;
            assert_eq!(rect, BoundingRect::new(5 + i, 5 + i, 195 - i, 115 - i));
        }
    }

    #[test]
    fn test_oversized_inset_falls_back_to_content() {
        let img = bracketed_image(100, 100, 1);
        let reconciled = BracketCorners::find(&img).reconcile(500).unwrap();
        assert!(reconciled.right < reconciled.left);

        let bounds = locate_bounds(&img, 500).unwrap();
        assert_eq!(bounds.method, DetectionMethod::ContentFallback);
        assert_eq!(bounds.rect, BoundingRect::new(1, 1, 99, 99));
    }

    #[test]
    fn test_missing_bottom_right_falls_back() {
        let mut img = RgbaImage::from_pixel(120, 80, WHITE);
        draw_bracket(&mut img, Corner::TopLeft, 4, 4);
        draw_bracket(&mut img, Corner::TopRight, 115, 4);
        let bounds = locate_bounds(&img, 2).unwrap();
        assert_eq!(bounds.method, DetectionMethod::ContentFallback);
        assert_eq!(bounds.rect, BoundingRect::new(4, 4, 115, 23));
    }

    #[test]
    fn test_diagonal_pair_is_enough() {
        let mut img = RgbaImage::from_pixel(120, 80, WHITE);
        draw_bracket(&mut img, Corner::TopLeft, 3, 3);
        draw_bracket(&mut img, Corner::BottomRight, 116, 76);
        let corners = BracketCorners::find(&img);
        assert!(corners.top_right.is_none());
        assert!(corners.bottom_left.is_none());

        let bounds = locate_bounds(&img, 2).unwrap();
        assert_eq!(bounds.method, DetectionMethod::Brackets);
        assert_eq!(bounds.rect, BoundingRect::new(5, 5, 114, 74));
    }

    #[test]
    fn test_off_diagonal_corners_only_extend() {
        let corners = BracketCorners {
            top_left: Some(CornerPoint::new(10, 10)),
            bottom_right: Some(CornerPoint::new(90, 90)),
            top_right: Some(CornerPoint::new(95, 5)),
            bottom_left: Some(CornerPoint::new(20, 80)),
        };
        // Top-right widens right and top, bottom-left is inside and changes nothing
        assert_eq!(
            corners.reconcile(2),
            Some(BoundingRect::new(12, 7, 93, 88))
        );
    }

    #[test]
    fn test_search_window_is_bounded() {
        let mut img = RgbaImage::from_pixel(200, 200, WHITE);
        img.put_pixel(60, 60, Rgba([0, 0, 0, 255]));
        assert_eq!(find_corner(&img, Corner::TopLeft), None);

        img.put_pixel(49, 49, Rgba([0, 0, 0, 255]));
        assert_eq!(
            find_corner(&img, Corner::TopLeft),
            Some(CornerPoint::new(49, 49))
        );
    }

    #[test]
    fn test_black_ignores_alpha() {
        let mut img = RgbaImage::from_pixel(10, 10, WHITE);
        img.put_pixel(3, 2, Rgba([0, 0, 0, 0]));
        assert_eq!(
            find_corner(&img, Corner::TopLeft),
            Some(CornerPoint::new(3, 2))
        );
        // Windows clamp to the image, so every corner reaches the same pixel
        assert_eq!(
            find_corner(&img, Corner::BottomRight),
            Some(CornerPoint::new(3, 2))
        );
    }

    #[test]
    fn test_all_white_is_detection_failure() {
        let img = RgbaImage::from_pixel(64, 48, WHITE);
        assert!(matches!(
            content_bounds(&img),
            Err(Error::DetectionFailure {
                width: 64,
                height: 48
            })
        ));
        assert!(matches!(
            locate_bounds(&img, 2),
            Err(Error::DetectionFailure { .. })
        ));
    }

    #[test]
    fn test_background_threshold() {
        let mut img = RgbaImage::from_pixel(30, 30, WHITE);
        img.put_pixel(5, 7, Rgba([251, 251, 251, 255]));
        assert!(content_bounds(&img).is_err());

        img.put_pixel(20, 9, Rgba([251, 250, 251, 255]));
        img.put_pixel(8, 25, Rgba([200, 10, 10, 0]));
        assert_eq!(
            content_bounds(&img).unwrap(),
            BoundingRect::new(8, 9, 20, 25)
        );
    }
}
