use glam::IVec2;

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_parts(position: IVec2, size: Dimension) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Rectangle spanning the edges `left..right` and `top..bottom`, the way
    /// platform display APIs report them.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    // i64 so that rectangles near the end of the i32 range do not overflow
    pub fn right(self) -> i64 {
        self.x as i64 + self.w as i64
    }

    pub fn bottom(self) -> i64 {
        self.y as i64 + self.h as i64
    }

    pub fn area(self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Overlapping part of two rectangles. Rectangles that only touch along an
    /// edge have no overlap.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left as i64 || bottom <= top as i64 {
            return None;
        }
        // both spans are bounded by an input width/height, so they fit in i32
        Some(Rect::new(
            left,
            top,
            (right - left as i64) as i32,
            (bottom - top as i64) as i32,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
