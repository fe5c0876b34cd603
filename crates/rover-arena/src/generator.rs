//! Seeded random obstacle placement.
//!
//! Generation runs in a fixed order: border walls, hills, hill
//! refinement, rocks, cliffs. Every non-satellite candidate must keep
//! [`PlacementConfig::near_margin`] of clearance from the hills and rocks
//! already placed; walls and cliffs are not part of that check, so a
//! cliff may sit against another cliff or a wall.
//!
//! Rejections are bounded: after `failure_cap` consecutive rejections
//! the remaining target for that kind drops by one. Generation therefore
//! always terminates, even in arenas too small for the requested counts,
//! and never fails for lack of space.

use indexmap::IndexMap;
use log::{debug, info, trace};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rover_core::{Obstacle, ObstacleError, ObstacleKind, Point};

use crate::arena::Arena;
use crate::config::PlacementConfig;
use crate::error::{ArenaError, PlacementConfigError};

/// One obstacle added by the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Kind of the placed obstacle.
    pub kind: ObstacleKind,
    /// The obstacle as stored in the arena.
    pub obstacle: Obstacle,
    /// Whether this is a satellite hill grown during refinement. Satellites
    /// skip the spacing check.
    pub satellite: bool,
}

/// Outcome of the retry loop for one obstacle kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    /// Count drawn from `count_range` before any backoff.
    pub target: u32,
    /// Obstacles actually placed (satellites not included).
    pub placed: u32,
    /// Target reductions caused by hitting the failure cap.
    pub abandoned: u32,
    /// Total rejected candidates.
    pub rejections: u32,
}

/// Everything the generator did, in insertion order.
///
/// Walls are not listed; they are always the four border rectangles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Every hill, rock, and cliff in the order it entered the arena.
    pub placements: Vec<Placement>,
    /// Per-kind retry summaries for hills, rocks, and cliffs.
    pub summaries: IndexMap<ObstacleKind, PlacementSummary>,
    /// Number of refinement passes run over the hills.
    pub refinement_passes: u32,
}

impl GenerationReport {
    /// Number of satellite hills grown during refinement.
    pub fn satellites(&self) -> usize {
        self.placements.iter().filter(|p| p.satellite).count()
    }
}

/// A generated arena together with its report.
#[derive(Clone, Debug)]
pub struct GeneratedArena {
    /// The populated arena.
    pub arena: Arena,
    /// What was placed, and how hard it was.
    pub report: GenerationReport,
}

/// Random obstacle placer.
///
/// Holds a validated [`PlacementConfig`]; randomness is supplied per
/// call so a caller can share one seeded RNG between the arena and
/// robot spawning.
#[derive(Clone, Debug)]
pub struct ArenaGenerator {
    config: PlacementConfig,
}

type DrawFn<R> = fn(&PlacementConfig, &mut R, Point) -> Result<Obstacle, ObstacleError>;

impl ArenaGenerator {
    /// Create a generator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the first invariant `config` violates.
    pub fn new(config: PlacementConfig) -> Result<Self, PlacementConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Generate an arena from a fresh ChaCha8 stream seeded with `seed`.
    ///
    /// The same seed and configuration always produce the same arena.
    ///
    /// # Errors
    ///
    /// See [`generate()`](Self::generate).
    pub fn generate_seeded(&self, seed: u64) -> Result<GeneratedArena, ArenaError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    /// Populate a new walled arena.
    ///
    /// # Errors
    ///
    /// Only fails if an obstacle cannot be built, which a validated
    /// configuration rules out.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedArena, ArenaError> {
        let cfg = &self.config;
        let mut arena = Arena::walled(cfg.width, cfg.height, cfg.wall_thickness)?;
        let mut report = GenerationReport::default();

        self.place(&mut arena, &mut report, rng, ObstacleKind::Hill, draw_hill)?;
        self.refine_hills(&mut arena, &mut report, rng)?;
        self.place(&mut arena, &mut report, rng, ObstacleKind::Rock, draw_rock)?;
        self.place(&mut arena, &mut report, rng, ObstacleKind::Cliff, draw_cliff)?;

        info!(
            "generated {}x{} arena: {} hills ({} satellites), {} rocks, {} cliffs",
            cfg.width,
            cfg.height,
            arena.obstacles(ObstacleKind::Hill).len(),
            report.satellites(),
            arena.obstacles(ObstacleKind::Rock).len(),
            arena.obstacles(ObstacleKind::Cliff).len(),
        );
        Ok(GeneratedArena { arena, report })
    }

    /// Place obstacles of one kind until the (possibly reduced) target is met.
    fn place<R: Rng + ?Sized>(
        &self,
        arena: &mut Arena,
        report: &mut GenerationReport,
        rng: &mut R,
        kind: ObstacleKind,
        draw: DrawFn<R>,
    ) -> Result<(), ArenaError> {
        let cfg = &self.config;
        let mut summary = PlacementSummary {
            target: rng.random_range(cfg.count_range.clone()),
            ..PlacementSummary::default()
        };
        let mut target = summary.target;
        let mut failures = 0u32;

        while summary.placed < target {
            let origin = Point::new(
                rng.random_range(cfg.interior_x()),
                rng.random_range(cfg.interior_y()),
            );
            let candidate = draw(cfg, rng, origin)?;

            if candidate.is_near_any(arena.spacing_set(), cfg.near_margin) {
                summary.rejections += 1;
                failures += 1;
                trace!("rejected {kind} at {}", candidate.bounds());
                if failures >= cfg.failure_cap {
                    target -= 1;
                    summary.abandoned += 1;
                    failures = 0;
                    debug!(
                        "{kind}: {} consecutive rejections, target lowered to {target}",
                        cfg.failure_cap
                    );
                }
                continue;
            }

            arena.push(candidate.clone());
            report.placements.push(Placement {
                kind,
                obstacle: candidate,
                satellite: false,
            });
            summary.placed += 1;
            failures = 0;
        }

        debug!(
            "{kind}: placed {}/{} after {} rejections",
            summary.placed, summary.target, summary.rejections
        );
        report.summaries.insert(kind, summary);
        Ok(())
    }

    /// Grow satellite hills off existing ones.
    ///
    /// Each pass only visits the hills present when it starts, so a
    /// satellite born in a pass cannot spawn another in the same pass.
    fn refine_hills<R: Rng + ?Sized>(
        &self,
        arena: &mut Arena,
        report: &mut GenerationReport,
        rng: &mut R,
    ) -> Result<(), ArenaError> {
        let cfg = &self.config;
        let passes = rng.random_range(cfg.refinement_passes.clone());
        report.refinement_passes = passes;

        for _ in 0..passes {
            let count = arena.obstacles(ObstacleKind::Hill).len();
            for i in 0..count {
                let roll = rng.random_range(0..100u32);
                if roll % cfg.satellite_chance != 0 {
                    continue;
                }
                let parent = arena.obstacles(ObstacleKind::Hill)[i].bounds();
                let dx = offset_within(rng, parent.width - 5);
                let dy = offset_within(rng, parent.height - 5);
                let satellite = Obstacle::rectangle(
                    ObstacleKind::Hill,
                    parent.x + dx,
                    parent.y + dy,
                    rng.random_range(cfg.satellite_size.clone()),
                    rng.random_range(cfg.satellite_size.clone()),
                )?;
                trace!("satellite hill at {} off {}", satellite.bounds(), parent);
                arena.push(satellite.clone());
                report.placements.push(Placement {
                    kind: ObstacleKind::Hill,
                    obstacle: satellite,
                    satellite: true,
                });
            }
        }
        Ok(())
    }
}

/// Uniform draw in `0..bound`, or 0 when the range is empty.
fn offset_within<R: Rng + ?Sized>(rng: &mut R, bound: i32) -> i32 {
    if bound > 0 {
        rng.random_range(0..bound)
    } else {
        0
    }
}

fn draw_hill<R: Rng + ?Sized>(
    cfg: &PlacementConfig,
    rng: &mut R,
    at: Point,
) -> Result<Obstacle, ObstacleError> {
    let size = rng.random_range(cfg.hill_size.clone());
    let width = size + rng.random_range(cfg.hill_deviation.clone());
    let height = size + rng.random_range(cfg.hill_deviation.clone());
    Obstacle::rectangle(ObstacleKind::Hill, at.x, at.y, width, height)
}

fn draw_rock<R: Rng + ?Sized>(
    cfg: &PlacementConfig,
    rng: &mut R,
    at: Point,
) -> Result<Obstacle, ObstacleError> {
    let side = rng.random_range(cfg.rock_side.clone());
    Obstacle::rectangle(ObstacleKind::Rock, at.x, at.y, side, side)
}

fn draw_cliff<R: Rng + ?Sized>(
    cfg: &PlacementConfig,
    rng: &mut R,
    at: Point,
) -> Result<Obstacle, ObstacleError> {
    let diameter = rng.random_range(cfg.cliff_diameter.clone());
    Obstacle::circle(ObstacleKind::Cliff, at.x, at.y, diameter)
}
