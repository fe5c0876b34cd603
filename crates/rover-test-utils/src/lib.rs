//! Test utilities and mock types for rover simulator development.
//!
//! Provides a mock [`Occupancy`] backed by explicit rectangles, a probe
//! that counts queries, and the arena fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use rover_core::{ObstacleKind, ObstacleRef, Occupancy, Point, Rect};

pub use fixtures::*;

/// Mock implementation of [`Occupancy`].
///
/// Blocked regions are closed rectangles tagged with a kind. Regions are
/// tested in insertion order, so the first matching region wins.
#[derive(Default)]
pub struct MockOccupancy {
    regions: Vec<(ObstacleKind, Rect)>,
}

impl MockOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a closed rectangle.
    pub fn block(mut self, kind: ObstacleKind, rect: Rect) -> Self {
        self.regions.push((kind, rect));
        self
    }

    /// Block a single point.
    pub fn block_point(self, kind: ObstacleKind, p: Point) -> Self {
        self.block(kind, Rect::new(p.x, p.y, 0, 0))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl Occupancy for MockOccupancy {
    fn blocked_at(&self, p: Point) -> Option<ObstacleRef> {
        self.regions
            .iter()
            .position(|(_, r)| r.contains_point(p))
            .map(|index| ObstacleRef {
                kind: self.regions[index].0,
                index,
            })
    }

    fn blocked_by(&self, kind: ObstacleKind, p: Point) -> bool {
        self.regions
            .iter()
            .any(|(k, r)| *k == kind && r.contains_point(p))
    }
}

/// Wraps another [`Occupancy`] and counts point queries.
pub struct CountingOccupancy<O> {
    inner: O,
    queries: Cell<usize>,
}

impl<O: Occupancy> CountingOccupancy<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            queries: Cell::new(0),
        }
    }

    /// Number of `blocked_at` queries so far.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl<O: Occupancy> Occupancy for CountingOccupancy<O> {
    fn blocked_at(&self, p: Point) -> Option<ObstacleRef> {
        self.queries.set(self.queries.get() + 1);
        self.inner.blocked_at(p)
    }

    fn blocked_by(&self, kind: ObstacleKind, p: Point) -> bool {
        self.inner.blocked_by(kind, p)
    }
}
