//! Deterministic random number generator for guesses.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), always seeded, so a
//! match replayed with the same dimensions and mine count makes the same
//! guesses.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seed derived from the match parameters.
pub fn match_seed(height: usize, width: usize, total_mines: usize) -> u64 {
    (height as u64)
        .wrapping_mul(29)
        .wrapping_add((width as u64).wrapping_mul(13))
        .wrapping_add(total_mines as u64)
}

pub struct AgentRng {
    inner: SmallRng,
}

impl AgentRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the match parameters via [`match_seed`].
    pub fn for_match(height: usize, width: usize, total_mines: usize) -> Self {
        Self::from_seed(match_seed(height, width, total_mines))
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}
