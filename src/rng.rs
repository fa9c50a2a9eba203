//! Seedable randomness for damage variance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Battle random source.
///
/// A seeded instance replays the same battle given the same inputs and
/// frame deltas.
pub struct BattleRng {
    rng: StdRng,
    seed: Option<u64>,
}

impl BattleRng {
    /// Deterministic generator for replays and tests.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Generator seeded from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seed used to build this generator, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Multiplier drawn uniformly from `[1 - spread, 1 + spread]`.
    pub fn variance(&mut self, spread: f32) -> f32 {
        if spread <= 0.0 {
            return 1.0;
        }
        self.rng.gen_range((1.0 - spread)..=(1.0 + spread))
    }
}

impl From<Option<u64>> for BattleRng {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl std::fmt::Debug for BattleRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRng").field("seed", &self.seed).finish()
    }
}
