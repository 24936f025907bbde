//! Rectangles and scored detections in image pixel space.

use std::cmp::Ordering;

/// Axis-aligned integer rectangle with a top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels; zero for degenerate rectangles.
    pub fn area(&self) -> i64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        i64::from(self.width) * i64::from(self.height)
    }

    /// True when both sides are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Inclusive right column.
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width) - 1
    }

    /// Inclusive bottom row.
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height) - 1
    }

    /// Number of pixels shared with `other`, counting inclusive extents.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let left = i64::from(self.x.max(other.x));
        let right = self.right().min(other.right());
        if right < left {
            return 0;
        }
        let top = i64::from(self.y.max(other.y));
        let bottom = self.bottom().min(other.bottom());
        if bottom < top {
            return 0;
        }
        (right - left + 1) * (bottom - top + 1)
    }
}

/// A scored bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub score: f32,
    pub rect: Rect,
}

impl Detection {
    /// Creates a detection.
    pub const fn new(score: f32, rect: Rect) -> Self {
        Self { score, rect }
    }

    /// Best-first ordering: higher scores compare as `Less`.
    pub fn cmp_best_first(&self, other: &Detection) -> Ordering {
        other.score.total_cmp(&self.score)
    }
}

/// Stable sort by descending score; equal scores keep their input order.
pub(crate) fn sort_best_first(detections: &mut [Detection]) {
    detections.sort_by(Detection::cmp_best_first);
}
