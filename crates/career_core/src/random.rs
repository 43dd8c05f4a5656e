//! Seedable random primitives used by every simulator.
//!
//! Engine code takes `&mut impl RandomSource`; any `rand::Rng` qualifies, so
//! tests hand in a `ChaCha8Rng::seed_from_u64(..)` and get reproducible careers.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The generator owned by the career service.
pub type GameRng = ChaCha8Rng;

/// Seeded generator (same seed = same career)
pub fn seeded(seed: u64) -> GameRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator seeded from OS entropy
pub fn from_entropy() -> GameRng {
    ChaCha8Rng::from_entropy()
}

pub trait RandomSource {
    /// Uniform integer in `[min, max]` (both inclusive).
    fn roll_int(&mut self, min: i32, max: i32) -> i32;

    /// Uniform float in `[min, max)`.
    fn roll_float(&mut self, min: f64, max: f64) -> f64;

    /// Uniform float in `[0, 1)`.
    fn roll_unit(&mut self) -> f64;

    /// `true` with the given percentage (0-100).
    fn chance(&mut self, percentage: f64) -> bool {
        self.roll_unit() * 100.0 < percentage
    }

    /// Uniformly chosen element, `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.roll_int(0, items.len() as i32 - 1) as usize;
        items.get(idx)
    }

    /// In-place Fisher-Yates shuffle.
    fn shuffle_slice<T>(&mut self, items: &mut [T]);
}

impl<R: Rng> RandomSource for R {
    fn roll_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.gen_range(min..=max)
    }

    fn roll_float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.gen_range(min..max)
    }

    fn roll_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn shuffle_slice<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}
