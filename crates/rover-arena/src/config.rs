//! Placement configuration for the arena generator.

use std::ops::{Range, RangeInclusive};

use rover_core::DEFAULT_NEAR_MARGIN;

use crate::error::PlacementConfigError;

/// Parameters for [`ArenaGenerator`](crate::ArenaGenerator).
///
/// All ranges are sampled uniformly. Half-open ranges exclude their end.
/// Validated by [`validate()`](Self::validate) when the generator is built.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Arena width. Default: 800.
    pub width: i32,
    /// Arena height. Default: 500.
    pub height: i32,
    /// Border wall thickness. Default: 20.
    pub wall_thickness: i32,
    /// Minimum spacing between a new obstacle and existing hills and
    /// rocks. Default: 60.
    pub near_margin: i32,
    /// How many obstacles of each generated kind to aim for. Default: `3..=5`.
    pub count_range: RangeInclusive<u32>,
    /// Consecutive rejections after which the target count drops by one.
    /// Default: 50.
    pub failure_cap: u32,
    /// Distance from the left and right arena edges that obstacle origins
    /// keep. Default: 120.
    pub inset_x: i32,
    /// Distance from the top and bottom arena edges that obstacle origins
    /// keep. Default: 100.
    pub inset_y: i32,
    /// Rock side length. Default: `10..30`.
    pub rock_side: Range<i32>,
    /// Base hill extent, shared by both axes. Default: `30..70`.
    pub hill_size: Range<i32>,
    /// Per-axis hill deviation added to the base extent. Default: `-10..50`.
    pub hill_deviation: Range<i32>,
    /// Cliff diameter. Default: `40..70`.
    pub cliff_diameter: Range<i32>,
    /// Number of hill refinement passes. Default: `15..25`.
    pub refinement_passes: Range<u32>,
    /// A hill grows a satellite when a draw in `0..100` is divisible by
    /// this value. Default: 13.
    pub satellite_chance: u32,
    /// Satellite hill extent, drawn per axis. Default: `40..50`.
    pub satellite_size: Range<i32>,
}

impl PlacementConfig {
    /// Default arena width.
    pub const DEFAULT_WIDTH: i32 = 800;
    /// Default arena height.
    pub const DEFAULT_HEIGHT: i32 = 500;
    /// Default wall thickness.
    pub const DEFAULT_WALL_THICKNESS: i32 = 20;
    /// Default retry cap.
    pub const DEFAULT_FAILURE_CAP: u32 = 50;

    /// Default configuration for an arena of the given size.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Half-open interval obstacle origins are drawn from on the x axis.
    pub fn interior_x(&self) -> Range<i32> {
        self.inset_x..self.width - self.inset_x
    }

    /// Half-open interval obstacle origins are drawn from on the y axis.
    pub fn interior_y(&self) -> Range<i32> {
        self.inset_y..self.height - self.inset_y
    }

    /// Check every invariant the generator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), PlacementConfigError> {
        // 1. Arena must have area.
        if self.width <= 0 || self.height <= 0 {
            return Err(PlacementConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        // 2. Walls must be positive and leave free space.
        if self.wall_thickness <= 0
            || 2 * self.wall_thickness >= self.width
            || 2 * self.wall_thickness >= self.height
        {
            return Err(PlacementConfigError::WallsTooThick {
                thickness: self.wall_thickness,
            });
        }
        // 3. Origins need a non-empty interior.
        if self.inset_x < 0
            || self.inset_y < 0
            || self.interior_x().is_empty()
            || self.interior_y().is_empty()
        {
            return Err(PlacementConfigError::NoInterior {
                inset_x: self.inset_x,
                inset_y: self.inset_y,
            });
        }
        // 4. Sampling ranges must be non-empty.
        let ranges: [(&'static str, bool); 7] = [
            ("count_range", self.count_range.is_empty()),
            ("rock_side", self.rock_side.is_empty()),
            ("hill_size", self.hill_size.is_empty()),
            ("hill_deviation", self.hill_deviation.is_empty()),
            ("cliff_diameter", self.cliff_diameter.is_empty()),
            ("refinement_passes", self.refinement_passes.is_empty()),
            ("satellite_size", self.satellite_size.is_empty()),
        ];
        if let Some(&(name, _)) = ranges.iter().find(|(_, empty)| *empty) {
            return Err(PlacementConfigError::EmptyRange { name });
        }
        // 5. Every extent the ranges can produce must be positive.
        let minimums = [
            ("rock_side", self.rock_side.start),
            (
                "hill_size + hill_deviation",
                self.hill_size.start + self.hill_deviation.start,
            ),
            ("cliff_diameter", self.cliff_diameter.start),
            ("satellite_size", self.satellite_size.start),
        ];
        if let Some(&(name, min)) = minimums.iter().find(|(_, min)| *min <= 0) {
            return Err(PlacementConfigError::NonPositiveSize { name, min });
        }
        // 6. Retry and satellite knobs.
        if self.failure_cap == 0 {
            return Err(PlacementConfigError::ZeroFailureCap);
        }
        if self.satellite_chance == 0 {
            return Err(PlacementConfigError::ZeroSatelliteChance);
        }
        Ok(())
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            wall_thickness: Self::DEFAULT_WALL_THICKNESS,
            near_margin: DEFAULT_NEAR_MARGIN,
            count_range: 3..=5,
            failure_cap: Self::DEFAULT_FAILURE_CAP,
            inset_x: 120,
            inset_y: 100,
            rock_side: 10..30,
            hill_size: 30..70,
            hill_deviation: -10..50,
            cliff_diameter: 40..70,
            refinement_passes: 15..25,
            satellite_chance: 13,
            satellite_size: 40..50,
        }
    }
}
