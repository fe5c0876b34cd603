//! Integer arena geometry: [`Point`] and closed-interval [`Rect`].
//!
//! All containment and intersection tests treat the far edges as part of
//! the shape, so a rectangle at `(x, y)` with width `w` covers the integer
//! columns `x..=x + w`.

use std::fmt;

/// An integer position in arena coordinates.
///
/// The arena origin is the top-left corner; `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by an integer offset.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Translate by a real-valued displacement, truncating toward zero.
    ///
    /// Positions in the simulation are integral; fractional motion is
    /// dropped at every commit rather than accumulated.
    pub fn displaced(self, dx: f64, dy: f64) -> Self {
        Self {
            x: (f64::from(self.x) + dx) as i32,
            y: (f64::from(self.y) + dy) as i32,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with closed-interval semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rightmost covered column (inclusive).
    pub const fn max_x(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom covered row (inclusive).
    pub const fn max_y(&self) -> i32 {
        self.y + self.height
    }

    /// Whether `p` lies inside or on the border.
    pub const fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.max_x() && p.y >= self.y && p.y <= self.max_y()
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.max_x() <= self.max_x()
            && other.y >= self.y
            && other.max_y() <= self.max_y()
    }

    /// Whether the two closed extents share at least one point.
    ///
    /// Containment in either direction is reported as an intersection;
    /// edges that merely touch also intersect.
    pub const fn intersects(&self, other: &Rect) -> bool {
        !(self.max_x() < other.x
            || self.x > other.max_x()
            || self.max_y() < other.y
            || self.y > other.max_y())
    }

    /// Grow the rectangle by `margin` on every side.
    pub const fn inflate(&self, margin: i32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}; {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}
