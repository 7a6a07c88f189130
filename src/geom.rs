//! Basic geometry value types.

use serde::{Deserialize, Serialize};

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Creates a square size.
    pub fn square(side: u32) -> Self {
        Self { w: side, h: side }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Returns the larger of the two dimensions.
    pub fn max_side(&self) -> u32 {
        self.w.max(self.h)
    }
}

/// A rectangle in continuous pixel coordinates.
///
/// Draw geometry is fractional: content rects are centered and padded
/// with sub-pixel precision, and only the backing surfaces themselves
/// are integer sized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// A rectangle at the origin covering the given size.
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: size.w as f32,
            h: size.h as f32,
        }
    }

    /// The unit rectangle `{0, 0, 1, 1}` that shapes are defined in.
    pub fn unit() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        }
    }

    /// A rectangle of size `inner` centered within `outer`.
    pub fn centered_in(outer: Size, inner: Size) -> Self {
        Self {
            x: (outer.w as f32 - inner.w as f32) / 2.0,
            y: (outer.h as f32 - inner.h as f32) / 2.0,
            w: inner.w as f32,
            h: inner.h as f32,
        }
    }

    /// Width-to-height ratio.
    pub fn aspect(&self) -> f32 {
        self.w / self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_helpers() {
        assert!(Size::new(0, 4).is_empty());
        assert!(!Size::square(4).is_empty());
        assert_eq!(Size::new(3, 7).max_side(), 7);
    }

    #[test]
    fn rect_centered() {
        let r = Rect::centered_in(Size::square(100), Size::square(50));
        assert_eq!(r, Rect::new(25.0, 25.0, 50.0, 50.0));
    }
}
