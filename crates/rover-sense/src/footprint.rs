//! The robot's rectangular footprint.

use rover_core::{Occupancy, Point};

/// Integer extent of a robot body, centred on its position.
///
/// A body of width `w` and height `h` centred on `(x, y)` covers the
/// columns `x - w/2 .. x - w/2 + w` and rows `y - h/2 .. y - h/2 + h`
/// (integer division, end exclusive). For the standard 25x50 robot that
/// is `x-12..=x+12` by `y-25..=y+24`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Footprint {
    /// The standard 25x50 robot body.
    pub const ROBOT: Footprint = Footprint {
        width: 25,
        height: 50,
    };

    /// Offsets of every covered point relative to the centre, column by
    /// column.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> {
        let (w, h) = (self.width, self.height);
        let (hw, hh) = (w / 2, h / 2);
        (0..w).flat_map(move |i| (0..h).map(move |j| (i - hw, j - hh)))
    }

    /// Every point covered by the axis-aligned body at `center`.
    pub fn cells(&self, center: Point) -> impl Iterator<Item = Point> {
        self.offsets()
            .map(move |(dx, dy)| center.offset(dx, dy))
    }

    /// Every point covered by the body at `center` rotated by `heading`.
    ///
    /// Each offset is rotated about the centre and truncated toward zero.
    pub fn rotated_cells(&self, center: Point, heading: f64) -> impl Iterator<Item = Point> {
        let (sin, cos) = heading.sin_cos();
        self.offsets().map(move |(dx, dy)| {
            let (dx, dy) = (f64::from(dx), f64::from(dy));
            center.offset((dx * cos - dy * sin) as i32, (dx * sin + dy * cos) as i32)
        })
    }

    /// Whether the axis-aligned body at `center` touches no obstacle.
    pub fn fits<O: Occupancy + ?Sized>(&self, occupancy: &O, center: Point) -> bool {
        self.cells(center).all(|p| !occupancy.is_blocked(p))
    }

    /// Whether the body rotated by `heading` at `center` touches no obstacle.
    pub fn fits_rotated<O: Occupancy + ?Sized>(
        &self,
        occupancy: &O,
        center: Point,
        heading: f64,
    ) -> bool {
        self.rotated_cells(center, heading)
            .all(|p| !occupancy.is_blocked(p))
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::ROBOT
    }
}
