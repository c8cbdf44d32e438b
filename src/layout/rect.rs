//! Rect: A rectangle primitive in view space.

/// A rectangle defined by its top-left corner and size.
///
/// Coordinates are signed because dragged pieces may hang off the left or
/// top edge of the surface while they follow the pointer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle covering a whole surface.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// A square of side `size` centered on `(cx, cy)`.
    ///
    /// The corner is offset by `size / 2` on both axes, so odd sizes lean
    /// one pixel to the bottom-right.
    #[inline]
    pub const fn centered_on(cx: i32, cy: i32, size: i32) -> Self {
        let half = size / 2;
        Self::new(cx - half, cy - half, size, size)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// The overlapping part of two rectangles, or [`Rect::ZERO`].
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::ZERO;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Self::new(x, y, self.right().min(other.right()) - x, self.bottom().min(other.bottom()) - y)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(20, 20, 100, 100);
        assert!(rect.contains(20, 20));
        assert!(rect.contains(119, 119));
        assert!(!rect.contains(120, 50));
        assert!(!rect.contains(50, 120));
        assert!(!rect.contains(19, 50));
    }

    #[test]
    fn test_rect_centered_on() {
        let rect = Rect::centered_on(300, 200, 100);
        assert_eq!(rect, Rect::new(250, 150, 100, 100));

        // Pointer near the origin pushes the rect off-surface
        let rect = Rect::centered_on(10, 10, 100);
        assert_eq!(rect.x, -40);
        assert!(rect.contains(10, 10));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Rect::new(5, 5, 5, 5));

        let c = Rect::new(50, 50, 1, 1);
        assert_eq!(a.intersection(&c), Rect::ZERO);
        assert_eq!(Rect::new(-5, -5, 10, 10).intersection(&a), Rect::new(0, 0, 5, 5));
    }
}
