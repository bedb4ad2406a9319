use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Integer point in canvas (or frame-local) pixel coordinates. Arithmetic
/// saturates at the `i32` limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Bound both components into `[min, max]`. The lower bound wins when the
    /// two bounds cross, so a misconfigured plugin never panics the host.
    pub fn bounded(self, min: Size, max: Size) -> Size {
        Size::new(
            bound(min.width, self.width, max.width),
            bound(min.height, self.height, max.height),
        )
    }
}

/// Axis-aligned rectangle. `right()` and `bottom()` are exclusive and
/// saturate at `i32::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn right(&self) -> i32 {
        self.origin.x.saturating_add(self.size.width)
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y.saturating_add(self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// `value` limited to `[lo, hi]`; `lo` takes precedence when `hi < lo`.
pub fn bound(lo: i32, value: i32, hi: i32) -> i32 {
    value.min(hi).max(lo)
}
