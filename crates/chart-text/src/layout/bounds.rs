//! String bounds

/// Raw extent of a laid-out string, in pixels relative to the pen origin.
///
/// Y grows downward, so `top` is negative for glyphs above the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TextBounds {
    /// Grow the bounds to contain the given rectangle
    pub fn include(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.left = self.left.min(left);
        self.top = self.top.min(top);
        self.right = self.right.max(right);
        self.bottom = self.bottom.max(bottom);
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_grows() {
        let mut bounds = TextBounds { left: 2.0, top: -10.0, right: 8.0, bottom: -4.0 };
        bounds.include(9.0, -6.0, 12.0, -2.0);
        assert_eq!(bounds, TextBounds { left: 2.0, top: -10.0, right: 12.0, bottom: -2.0 });
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 8.0);
    }

    #[test]
    fn test_include_negative_bearing() {
        let mut bounds = TextBounds { left: 0.5, top: -3.0, right: 4.0, bottom: 0.0 };
        bounds.include(-1.5, -2.0, 3.0, 2.0);
        assert_eq!(bounds.left, -1.5);
        assert_eq!(bounds.bottom, 2.0);
        assert_eq!(bounds.width(), 5.5);
    }
}
