//! Measured text boxes

use chart_text::TextBounds;

/// Integer pixel extent of a measured string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: i32,
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub const fn new(top: i32, left: i32, right: i32, bottom: i32) -> Self {
        Self { top, left, right, bottom }
    }

    /// Anchor raw string bounds at (0, 0).
    ///
    /// A non-zero left or top offset is folded into the right or bottom
    /// extent, then every edge is rounded up.
    pub fn from_text_bounds(bounds: &TextBounds) -> Self {
        let TextBounds { mut left, mut top, mut right, mut bottom } = *bounds;

        if left < 0.0 {
            right -= left;
            left = 0.0;
        }
        if top < 0.0 {
            bottom -= top;
            top = 0.0;
        }
        if left > 0.0 {
            right += left;
            left = 0.0;
        }
        if top > 0.0 {
            bottom += top;
            top = 0.0;
        }

        Self {
            top: top.ceil() as i32,
            left: left.ceil() as i32,
            right: right.ceil() as i32,
            bottom: bottom.ceil() as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    pub fn corners(&self) -> BoxCorners {
        BoxCorners {
            top_left: Point::new(self.left, self.top),
            top_right: Point::new(self.right, self.top),
            bottom_right: Point::new(self.right, self.bottom),
            bottom_left: Point::new(self.left, self.bottom),
        }
    }
}

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate about `center` by `radians` (clockwise on screen)
    pub fn rotate(self, center: Point, radians: f64) -> Point {
        let dx = (self.x - center.x) as f64;
        let dy = (self.y - center.y) as f64;
        let (sin, cos) = radians.sin_cos();
        Point {
            x: (dx * cos - dy * sin).round() as i32 + center.x,
            y: (dx * sin + dy * cos).round() as i32 + center.y,
        }
    }
}

/// The four corners of a box, which may no longer be axis-aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoxCorners {
    fn points(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    pub fn center(&self) -> Point {
        let left = (self.top_left.x + self.bottom_left.x) / 2;
        let right = (self.top_right.x + self.bottom_right.x) / 2;
        let top = (self.top_left.y + self.top_right.y) / 2;
        let bottom = (self.bottom_left.y + self.bottom_right.y) / 2;
        Point::new(left + (right - left) / 2, top + (bottom - top) / 2)
    }

    /// Rotate every corner about the center
    pub fn rotate(&self, radians: f64) -> BoxCorners {
        let center = self.center();
        BoxCorners {
            top_left: self.top_left.rotate(center, radians),
            top_right: self.top_right.rotate(center, radians),
            bottom_right: self.bottom_right.rotate(center, radians),
            bottom_left: self.bottom_left.rotate(center, radians),
        }
    }

    /// Axis-aligned box enclosing the corners
    pub fn bounding_box(&self) -> BoundingBox {
        let points = self.points();
        BoundingBox {
            top: points.iter().map(|p| p.y).min().unwrap_or(0),
            left: points.iter().map(|p| p.x).min().unwrap_or(0),
            right: points.iter().map(|p| p.x).max().unwrap_or(0),
            bottom: points.iter().map(|p| p.y).max().unwrap_or(0),
        }
    }
}

/// Normalized measurement, rotated when text rotation is active
pub(crate) fn measured_box(bounds: &TextBounds, rotation: Option<f64>) -> BoundingBox {
    let measured = BoundingBox::from_text_bounds(bounds);
    match rotation {
        Some(radians) => measured.corners().rotate(radians).bounding_box(),
        None => measured,
    }
}
