//! Level assignment for new nodes.
//!
//! Levels follow the exponential decay distribution of the HNSW paper:
//! `floor(-ln(U) * 1/ln(M))` with `U` uniform in `(0, 1]`.

use super::params::MAX_LEVELS;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default xorshift seed.
pub(crate) const DEFAULT_SEED: u64 = 0x5DEE_CE66_D1A4_B5B5;

/// Lock-free xorshift64 level generator shared by concurrent inserts.
#[derive(Debug)]
pub(crate) struct LevelGenerator {
    state: AtomicU64,
    multiplier: f64,
}

#[inline]
fn xorshift(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

impl LevelGenerator {
    /// Creates a generator. A zero seed would lock xorshift at zero, so it is replaced.
    pub(crate) fn new(seed: u64, multiplier: f64) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            state: AtomicU64::new(seed),
            multiplier,
        }
    }

    /// Draws the next uniform value in `(0, 1]`.
    fn next_uniform(&self) -> f64 {
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| Some(xorshift(s)))
            .unwrap_or(DEFAULT_SEED);
        let value = xorshift(previous);
        // Top 53 bits, shifted into (0, 1]
        ((value >> 11) as f64 + 1.0) / (1u64 << 53) as f64
    }

    /// Draws a level for a new node, capped at `MAX_LEVELS - 1`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn next_level(&self) -> usize {
        let level = (-self.next_uniform().ln() * self.multiplier).floor() as usize;
        level.min(MAX_LEVELS - 1)
    }
}
