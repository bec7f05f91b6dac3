//! Axis-aligned rectangle in world pixel coordinates.

/// An axis-aligned rectangle. `top < bottom` and `left < right` for any
/// live thing; edge mutators preserve width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Bounds {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Builds a rectangle from its top-left corner and size.
    pub fn from_origin(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            right: left + width,
            bottom: top + height,
            left,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn mid_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    #[inline]
    pub fn mid_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }

    /// Edge-inclusive intersection test, matching the touching predicate of
    /// the collision engine (flush edges count as touching).
    pub fn touches(&self, other: &Bounds) -> bool {
        self.right >= other.left
            && self.left <= other.right
            && self.bottom >= other.top
            && self.top <= other.bottom
    }

    /// Strict-overlap test (flush edges do not count).
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    pub fn shift_horiz(&mut self, dx: i32) {
        self.left += dx;
        self.right += dx;
    }

    pub fn shift_vert(&mut self, dy: i32) {
        self.top += dy;
        self.bottom += dy;
    }

    /// Moves the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: i32) {
        let height = self.height();
        self.top = top;
        self.bottom = top + height;
    }

    /// Moves the rectangle so its right edge sits at `right`.
    pub fn set_right(&mut self, right: i32) {
        let width = self.width();
        self.right = right;
        self.left = right - width;
    }

    /// Moves the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: i32) {
        let height = self.height();
        self.bottom = bottom;
        self.top = bottom - height;
    }

    /// Moves the rectangle so its left edge sits at `left`.
    pub fn set_left(&mut self, left: i32) {
        let width = self.width();
        self.left = left;
        self.right = left + width;
    }

    /// Centers this rectangle horizontally on `other`.
    pub fn set_mid_x_of(&mut self, other: &Bounds) {
        let width = self.width();
        self.left = other.mid_x() - width / 2;
        self.right = self.left + width;
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
            left: self.left.min(other.left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_mutators_preserve_size() {
        let mut bounds = Bounds::from_origin(0, 0, 16, 16);
        bounds.set_right(48);
        assert_eq!(bounds.left, 32);
        assert_eq!(bounds.width(), 16);

        bounds.set_top(-8);
        assert_eq!(bounds.bottom, 8);
        assert_eq!(bounds.height(), 16);
    }

    #[test]
    fn flush_edges_touch_but_do_not_overlap() {
        let a = Bounds::from_origin(0, 0, 16, 16);
        let b = Bounds::from_origin(16, 0, 16, 16);

        assert!(a.touches(&b));
        assert!(!a.overlaps(&b));
    }
}
