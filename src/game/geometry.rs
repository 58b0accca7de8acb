//! Axis-aligned rectangles in integer board units.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict intersection test: rectangles that only share an edge do not
    /// overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether a point lies inside, counting the top/left edges but not the
    /// bottom/right ones.
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects() {
        let a = Rect::new(0, 0, 20, 20);
        assert!(a.overlaps(&Rect::new(10, 10, 20, 20)));
        assert!(a.overlaps(&Rect::new(5, 5, 2, 2)));
        assert!(Rect::new(5, 5, 2, 2).overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        assert!(!a.overlaps(&Rect::new(20, 0, 20, 20)));
        assert!(!a.overlaps(&Rect::new(0, 20, 20, 20)));
        assert!(!a.overlaps(&Rect::new(-20, -20, 20, 20)));
        assert!(!a.overlaps(&Rect::new(40, 40, 5, 5)));
    }

    #[test]
    fn contains_point_is_half_open() {
        let button = Rect::new(100, 400, 340, 60);
        assert!(button.contains_point(100, 400));
        assert!(button.contains_point(439, 459));
        assert!(!button.contains_point(440, 420));
        assert!(!button.contains_point(200, 460));
        assert!(!button.contains_point(99, 420));
    }

    #[test]
    fn translated_keeps_size() {
        let moved = Rect::square(10, 10, 20).translated(-5, 7);
        assert_eq!(moved, Rect::new(5, 17, 20, 20));
    }
}
