//! Boxes in pixel coordinates.

use serde::Serialize;
use std::cmp::{max, min};
use std::ops::Range;

/// A glyph or space box. `left` and `top` are inclusive, `right` and
/// `bottom` are exclusive, so an empty box has `left == right` or
/// `top == bottom`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Rect {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl Rect {
    /// Build a box from its four edges. Panics if `right < left` or
    /// `bottom < top`.
    pub fn ltrb(left: usize, top: usize, right: usize, bottom: usize) -> Rect {
        assert!(left <= right, "box has negative width: {}..{}", left, right);
        assert!(top <= bottom, "box has negative height: {}..{}", top, bottom);
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a box from its top-left corner and size.
    pub fn ltwh(left: usize, top: usize, width: usize, height: usize) -> Rect {
        let right = left.checked_add(width).expect("box right edge overflows");
        let bottom = top.checked_add(height).expect("box bottom edge overflows");
        Rect::ltrb(left, top, right, bottom)
    }

    /// The first column inside the box.
    pub fn left(&self) -> usize {
        self.left
    }

    /// The first row inside the box.
    pub fn top(&self) -> usize {
        self.top
    }

    /// The first column past the box.
    pub fn right(&self) -> usize {
        self.right
    }

    /// The first row past the box.
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Does the box cover no pixels?
    pub fn is_empty(&self) -> bool {
        self.left == self.right || self.top == self.bottom
    }

    /// Is pixel `(x, y)` inside the box?
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.horizontal_range().contains(&x) && self.vertical_range().contains(&y)
    }

    /// The smallest box covering both `self` and `other`. Empty boxes cover
    /// nothing, so they don't stretch the result.
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (_, true) => *self,
            (true, false) => *other,
            (false, false) => Rect {
                left: min(self.left, other.left),
                top: min(self.top, other.top),
                right: max(self.right, other.right),
                bottom: max(self.bottom, other.bottom),
            },
        }
    }

    /// The columns covered, `left..right`.
    pub fn horizontal_range(&self) -> Range<usize> {
        self.left..self.right
    }

    /// The rows covered, `top..bottom`.
    pub fn vertical_range(&self) -> Range<usize> {
        self.top..self.bottom
    }
}
