use imageproc::rect::Rect;

/// One of the four image corners that anchors a bracket search window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Rows are scanned from the bottom edge upward
    pub fn scans_up(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }

    /// Columns are scanned from the right edge leftward
    pub fn scans_left(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }
}

/// Pixel position of a bracket candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerPoint {
    pub x: u32,
    pub y: u32,
}

impl CornerPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Crop rectangle with inclusive `right` and `bottom` edges.
///
/// Coordinates are signed because subtracting the bracket inset can push an
/// edge past zero before the rectangle is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl BoundingRect {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Right edge strictly past the left, bottom strictly below the top
    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.bottom > self.top
    }

    /// True when every edge lies on a pixel of a `width`x`height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right >= self.left
            && self.bottom >= self.top
            && self.right < width as i64
            && self.bottom < height as i64
    }

    /// Number of columns covered, counting both edges
    pub fn width(&self) -> u32 {
        (self.right - self.left + 1).max(0) as u32
    }

    /// Number of rows covered, counting both edges
    pub fn height(&self) -> u32 {
        (self.bottom - self.top + 1).max(0) as u32
    }

    /// Half-open crop region `[left, right + 1) x [top, bottom + 1)`.
    ///
    /// Returns `None` for a rectangle with no pixels.
    pub fn crop_region(&self) -> Option<Rect> {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return None;
        }
        Some(Rect::at(self.left as i32, self.top as i32).of_size(width, height))
    }
}
