//! Magazine loading.
//!
//! A load draws a live count and a blank count independently and
//! uniformly from their configured ranges, lays out that multiset, and
//! applies a uniform permutation. Loading is a pure function of the
//! random source: no state survives between loads.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, RandomSource, ShellRange};

use super::{Magazine, Shell};

/// Result of one loading round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Load {
    pub magazine: Magazine,
    pub live_count: u32,
    pub blank_count: u32,
}

/// Builds randomized magazines from configured ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagazineLoader {
    live: ShellRange,
    blank: ShellRange,
}

impl MagazineLoader {
    /// Create a loader for explicit ranges. Callers are expected to pass
    /// ranges that passed `GameConfig::validate`.
    pub fn new(live: ShellRange, blank: ShellRange) -> Self {
        Self { live, blank }
    }

    /// Create a loader from the game configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.live_shells, config.blank_shells)
    }

    /// Load a fresh magazine.
    pub fn load<R: RandomSource>(&self, rng: &mut R) -> Load {
        let live_count = rng.uniform(self.live.min, self.live.max);
        let blank_count = rng.uniform(self.blank.min, self.blank.max);

        let mut shells = Vec::with_capacity(live_count as usize + blank_count as usize);
        shells.extend(std::iter::repeat(Shell::Live).take(live_count as usize));
        shells.extend(std::iter::repeat(Shell::Blank).take(blank_count as usize));
        rng.shuffle(&mut shells);

        Load {
            magazine: Magazine::from_shells(shells),
            live_count,
            blank_count,
        }
    }
}
