//! Reusable arena fixtures.
//!
//! - [`walled_arena`]: the standard 800x500 arena with 20-unit walls.
//! - [`arena_with`]: the walled arena plus extra obstacles.
//! - [`rock`], [`hill`], [`cliff`]: obstacle shorthands.
//! - [`seeded_rng`]: the deterministic RNG the simulator uses.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rover_arena::Arena;
use rover_core::{Obstacle, ObstacleKind};

pub const ARENA_WIDTH: i32 = 800;
pub const ARENA_HEIGHT: i32 = 500;
pub const WALL_THICKNESS: i32 = 20;

/// The standard arena: four border walls and nothing else.
pub fn walled_arena() -> Arena {
    match Arena::walled(ARENA_WIDTH, ARENA_HEIGHT, WALL_THICKNESS) {
        Ok(arena) => arena,
        Err(e) => panic!("standard walls are valid: {e}"),
    }
}

/// The standard arena with extra obstacles pushed after the walls.
pub fn arena_with(obstacles: impl IntoIterator<Item = Obstacle>) -> Arena {
    let mut arena = walled_arena();
    for o in obstacles {
        arena.push(o);
    }
    arena
}

pub fn rock(x: i32, y: i32, side: i32) -> Obstacle {
    build(Obstacle::rectangle(ObstacleKind::Rock, x, y, side, side))
}

pub fn hill(x: i32, y: i32, width: i32, height: i32) -> Obstacle {
    build(Obstacle::rectangle(ObstacleKind::Hill, x, y, width, height))
}

pub fn cliff(x: i32, y: i32, diameter: i32) -> Obstacle {
    build(Obstacle::circle(ObstacleKind::Cliff, x, y, diameter))
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn build(result: Result<Obstacle, rover_core::ObstacleError>) -> Obstacle {
    match result {
        Ok(o) => o,
        Err(e) => panic!("invalid fixture obstacle: {e}"),
    }
}
