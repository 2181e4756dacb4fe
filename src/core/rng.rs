//! Injectable randomness for magazine loading and bot targeting.
//!
//! ## Key Features
//!
//! - **Injectable**: every random decision goes through [`RandomSource`],
//!   so the session engine never touches an ambient global generator
//! - **Deterministic**: [`GameRng`] replays the same sequence for a seed
//! - **Forkable**: one request-handler RNG can hand out independent streams
//! - **Scriptable**: [`ScriptedRng`] replays exact draws for scenario tests
//!
//! ## Usage
//!
//! ```
//! use shotgun_roulette::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//! let lives = rng.uniform(1, 4);
//! assert!((1..=4).contains(&lives));
//!
//! // Forks are deterministic too
//! let mut a = GameRng::new(7).fork();
//! let mut b = GameRng::new(7).fork();
//! assert_eq!(a.uniform(0, 1000), b.uniform(0, 1000));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the random draws the game rules need.
///
/// Only two primitives are required; shuffling is derived from
/// `uniform` so a scripted source controls permutations as well.
pub trait RandomSource {
    /// Draw an integer uniformly from the inclusive range `lo..=hi`.
    ///
    /// Implementations may assume `lo <= hi`.
    fn uniform(&mut self, lo: u32, hi: u32) -> u32;

    /// Return `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Shuffle a slice in place with a Fisher-Yates pass.
    ///
    /// Every ordering is equally likely when `uniform` is unbiased.
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.uniform(0, i as u32) as usize;
            slice.swap(i, j.min(i));
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        (**self).uniform(lo, hi)
    }

    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }
}

/// Seeded production source backed by ChaCha8.
///
/// Request handlers usually hold one per worker and `fork` it per session.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }
}

impl RandomSource for GameRng {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.gen_range(lo..=hi)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays queued draws in order.
///
/// Integer draws are clamped into the requested range. When a queue runs
/// dry the source falls back to the low bound (`uniform`) and a roll of
/// `1.0` (`chance`, which then always fails), so a short script never
/// panics mid-scenario.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    integers: VecDeque<u32>,
    rolls: VecDeque<f64>,
}

impl ScriptedRng {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue integer draws for `uniform`.
    #[must_use]
    pub fn with_integers(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.integers.extend(values);
        self
    }

    /// Queue rolls in `[0, 1)` for `chance`; a roll succeeds when it is
    /// below the requested probability.
    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Draws still queued, integers first.
    #[must_use]
    pub fn remaining(&self) -> (usize, usize) {
        (self.integers.len(), self.rolls.len())
    }
}

impl RandomSource for ScriptedRng {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        self.integers.pop_front().map_or(lo, |v| v.clamp(lo, hi))
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rolls.pop_front().unwrap_or(1.0) < probability
    }
}
