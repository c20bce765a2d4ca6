//! Integer rectangles in root window coordinates.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Strip a border of `border` pixels from the outer size.
    pub fn without_border(&self, border: i32) -> Self {
        Self {
            width: self.width - 2 * border,
            height: self.height - 2 * border,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_and_bottom_edges_are_exclusive() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(99, 49));
        assert!(!r.contains_point(100, 10));
        assert!(!r.contains_point(10, 50));
    }
}
