//! The obstacle store.

use rover_core::{Obstacle, ObstacleKind, ObstacleRef, Rect};

use crate::error::ArenaError;

/// Per-kind obstacle lists used to assemble an [`Arena`] by hand.
///
/// [`Arena::from_layout`] checks that each list only holds obstacles of
/// its own kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObstacleLayout {
    /// Arena width.
    pub width: i32,
    /// Arena height.
    pub height: i32,
    /// Hill obstacles.
    pub hills: Vec<Obstacle>,
    /// Rock obstacles.
    pub rocks: Vec<Obstacle>,
    /// Wall obstacles.
    pub walls: Vec<Obstacle>,
    /// Cliff obstacles.
    pub cliffs: Vec<Obstacle>,
}

/// A bounded 2-D arena holding four obstacle collections.
///
/// Lists are kept in insertion order; [`ObstacleRef`] indices stay valid
/// until [`clear()`](Self::clear).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arena {
    width: i32,
    height: i32,
    hills: Vec<Obstacle>,
    rocks: Vec<Obstacle>,
    walls: Vec<Obstacle>,
    cliffs: Vec<Obstacle>,
}

impl Arena {
    /// An empty arena of the given size, without walls.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// An arena bounded by the four standard border walls.
    ///
    /// The walls are laid out clockwise from the top edge and never
    /// overlap: top `(0, 0, W, T)`, right `(W-T, 0, T, H)`, bottom
    /// `(0, H-T, W-T, T)`, left `(0, T, T, H-T)`.
    ///
    /// # Errors
    ///
    /// Fails if any wall would have a non-positive extent.
    pub fn walled(width: i32, height: i32, thickness: i32) -> Result<Self, ArenaError> {
        let mut arena = Self::new(width, height);
        let (w, h, t) = (width, height, thickness);
        for (x, y, ww, wh) in [
            (0, 0, w, t),
            (w - t, 0, t, h),
            (0, h - t, w - t, t),
            (0, t, t, h - t),
        ] {
            arena.push(Obstacle::rectangle(ObstacleKind::Wall, x, y, ww, wh)?);
        }
        Ok(arena)
    }

    /// Build an arena from per-kind lists.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::MisfiledObstacle`] if a list holds an
    /// obstacle of another kind.
    pub fn from_layout(layout: ObstacleLayout) -> Result<Self, ArenaError> {
        let ObstacleLayout {
            width,
            height,
            hills,
            rocks,
            walls,
            cliffs,
        } = layout;
        for (expected, list) in [
            (ObstacleKind::Hill, &hills),
            (ObstacleKind::Rock, &rocks),
            (ObstacleKind::Wall, &walls),
            (ObstacleKind::Cliff, &cliffs),
        ] {
            let misfiled = list.iter().enumerate().find(|(_, o)| o.kind() != expected);
            if let Some((index, o)) = misfiled {
                return Err(ArenaError::MisfiledObstacle {
                    expected,
                    found: o.kind(),
                    index,
                });
            }
        }
        Ok(Self {
            width,
            height,
            hills,
            rocks,
            walls,
            cliffs,
        })
    }

    /// Arena width.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Arena height.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The full arena rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Obstacles of one kind, in insertion order.
    pub fn obstacles(&self, kind: ObstacleKind) -> &[Obstacle] {
        match kind {
            ObstacleKind::Hill => &self.hills,
            ObstacleKind::Rock => &self.rocks,
            ObstacleKind::Wall => &self.walls,
            ObstacleKind::Cliff => &self.cliffs,
        }
    }

    fn list_mut(&mut self, kind: ObstacleKind) -> &mut Vec<Obstacle> {
        match kind {
            ObstacleKind::Hill => &mut self.hills,
            ObstacleKind::Rock => &mut self.rocks,
            ObstacleKind::Wall => &mut self.walls,
            ObstacleKind::Cliff => &mut self.cliffs,
        }
    }

    /// Look up a single obstacle.
    pub fn get(&self, r: ObstacleRef) -> Option<&Obstacle> {
        self.obstacles(r.kind).get(r.index)
    }

    /// Every obstacle with its reference, hills first, then rocks, walls
    /// and cliffs.
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleRef, &Obstacle)> + '_ {
        ObstacleKind::ALL.into_iter().flat_map(move |kind| {
            self.obstacles(kind)
                .iter()
                .enumerate()
                .map(move |(index, o)| (ObstacleRef { kind, index }, o))
        })
    }

    /// Hills followed by rocks: the set new placements are spaced against.
    pub fn spacing_set(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.hills.iter().chain(self.rocks.iter())
    }

    /// Total obstacle count.
    pub fn len(&self) -> usize {
        self.hills.len() + self.rocks.len() + self.walls.len() + self.cliffs.len()
    }

    /// Whether the arena holds no obstacles at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store an obstacle in the list for its kind.
    pub fn push(&mut self, obstacle: Obstacle) -> ObstacleRef {
        let kind = obstacle.kind();
        let list = self.list_mut(kind);
        list.push(obstacle);
        ObstacleRef {
            kind,
            index: list.len() - 1,
        }
    }

    /// Drop every obstacle. Dimensions are kept.
    pub fn clear(&mut self) {
        self.hills.clear();
        self.rocks.clear();
        self.walls.clear();
        self.cliffs.clear();
    }

    /// Set the display flag on every obstacle.
    pub fn set_all_visible(&mut self, visible: bool) {
        for kind in ObstacleKind::ALL {
            for o in self.list_mut(kind) {
                o.set_visible(visible);
            }
        }
    }

    /// Mark one obstacle visible. Returns `true` if it was hidden before.
    pub fn reveal(&mut self, r: ObstacleRef) -> bool {
        match self.list_mut(r.kind).get_mut(r.index) {
            Some(o) if !o.is_visible() => {
                o.set_visible(true);
                true
            }
            _ => false,
        }
    }

    /// Clone the obstacle lists for a renderer.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            width: self.width,
            height: self.height,
            hills: self.hills.clone(),
            rocks: self.rocks.clone(),
            walls: self.walls.clone(),
            cliffs: self.cliffs.clone(),
        }
    }
}

/// An owned copy of an arena's obstacles, detached from the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaSnapshot {
    /// Arena width.
    pub width: i32,
    /// Arena height.
    pub height: i32,
    /// Hill obstacles.
    pub hills: Vec<Obstacle>,
    /// Rock obstacles.
    pub rocks: Vec<Obstacle>,
    /// Wall obstacles.
    pub walls: Vec<Obstacle>,
    /// Cliff obstacles.
    pub cliffs: Vec<Obstacle>,
}

impl ArenaSnapshot {
    /// Every obstacle in collision-test order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.hills
            .iter()
            .chain(&self.rocks)
            .chain(&self.walls)
            .chain(&self.cliffs)
    }

    /// Obstacles a renderer should draw.
    pub fn visible(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.iter().filter(|o| o.is_visible())
    }
}
