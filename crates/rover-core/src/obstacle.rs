//! Obstacle geometry and the placement-time proximity tests.
//!
//! Every obstacle is tested through its axis-aligned bounding box,
//! including circular cliffs. The shape only matters to renderers.

use std::fmt;
use std::str::FromStr;

use crate::error::ObstacleError;
use crate::geometry::{Point, Rect};

/// Default inflation margin for [`Obstacle::is_near`].
pub const DEFAULT_NEAR_MARGIN: i32 = 60;

/// The terrain category an obstacle belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObstacleKind {
    /// Large rectangular mound; may grow satellite hills.
    Hill,
    /// Small square rock. The only kind the sensor tags separately.
    Rock,
    /// Arena border segment.
    Wall,
    /// Circular drop-off.
    Cliff,
}

impl ObstacleKind {
    /// All kinds in collision-test order.
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Hill,
        ObstacleKind::Rock,
        ObstacleKind::Wall,
        ObstacleKind::Cliff,
    ];

    /// The shape obstacles of this kind must have.
    pub const fn shape(self) -> Shape {
        match self {
            ObstacleKind::Cliff => Shape::Circle,
            _ => Shape::Rectangle,
        }
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            ObstacleKind::Hill => "hill",
            ObstacleKind::Rock => "rock",
            ObstacleKind::Wall => "wall",
            ObstacleKind::Cliff => "cliff",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObstacleKind {
    type Err = ObstacleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObstacleKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ObstacleError::UnknownKind {
                name: s.to_string(),
            })
    }
}

/// Rendered outline of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Filled rectangle.
    Rectangle,
    /// Filled circle inscribed in the bounding box.
    Circle,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Rectangle => f.write_str("rectangular"),
            Shape::Circle => f.write_str("circular"),
        }
    }
}

/// Locates one obstacle inside an arena: its kind list and index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObstacleRef {
    /// Which list the obstacle lives in.
    pub kind: ObstacleKind,
    /// Position within that list.
    pub index: usize,
}

/// A static obstacle.
///
/// Geometry is fixed at construction. The visibility flag is display
/// metadata and has no effect on collision tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    kind: ObstacleKind,
    shape: Shape,
    bounds: Rect,
    visible: bool,
}

impl Obstacle {
    /// Create a rectangular obstacle.
    ///
    /// # Errors
    ///
    /// Fails if either extent is not positive or if `kind` must be circular.
    pub fn rectangle(
        kind: ObstacleKind,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<Self, ObstacleError> {
        Self::build(kind, Shape::Rectangle, Rect::new(x, y, width, height))
    }

    /// Create a circular obstacle from the corner of its bounding square.
    ///
    /// # Errors
    ///
    /// Fails if `diameter` is not positive or if `kind` must be rectangular.
    pub fn circle(kind: ObstacleKind, x: i32, y: i32, diameter: i32) -> Result<Self, ObstacleError> {
        Self::build(kind, Shape::Circle, Rect::new(x, y, diameter, diameter))
    }

    fn build(kind: ObstacleKind, shape: Shape, bounds: Rect) -> Result<Self, ObstacleError> {
        if bounds.width <= 0 || bounds.height <= 0 {
            return Err(ObstacleError::NonPositiveExtent {
                width: bounds.width,
                height: bounds.height,
            });
        }
        if kind.shape() != shape {
            return Err(ObstacleError::KindShapeMismatch { kind, shape });
        }
        Ok(Self {
            kind,
            shape,
            bounds,
            visible: false,
        })
    }

    /// The obstacle's kind.
    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    /// The obstacle's outline.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Bounding box used for every collision test.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Diameter for circular obstacles, `None` for rectangles.
    pub fn diameter(&self) -> Option<i32> {
        match self.shape {
            Shape::Circle => Some(self.bounds.width),
            Shape::Rectangle => None,
        }
    }

    /// Whether this obstacle is drawn as a circle.
    pub fn is_circle(&self) -> bool {
        self.shape == Shape::Circle
    }

    /// Whether renderers should draw this obstacle.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set the display flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Closed-interval containment test against the bounding box.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains_point(p)
    }

    /// Whether the two bounding boxes overlap.
    pub fn overlaps(&self, other: &Obstacle) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    /// Whether this obstacle overlaps `other` grown by [`DEFAULT_NEAR_MARGIN`].
    pub fn is_near(&self, other: &Obstacle) -> bool {
        self.is_near_within(other, DEFAULT_NEAR_MARGIN)
    }

    /// Whether this obstacle overlaps `other` grown by `margin` on all sides.
    pub fn is_near_within(&self, other: &Obstacle, margin: i32) -> bool {
        self.bounds.intersects(&other.bounds.inflate(margin))
    }

    /// Whether any obstacle in `others` overlaps this one.
    pub fn overlaps_any<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a Obstacle>,
    {
        others.into_iter().any(|o| self.overlaps(o))
    }

    /// Whether this obstacle is within `margin` of any obstacle in `others`.
    pub fn is_near_any<'a, I>(&self, others: I, margin: i32) -> bool
    where
        I: IntoIterator<Item = &'a Obstacle>,
    {
        others.into_iter().any(|o| self.is_near_within(o, margin))
    }
}
