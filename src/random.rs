//! Randomness capability handed to the session at construction.
//!
//! The browser build uses the thread RNG (seeded from `crypto.getRandomValues`
//! through getrandom's `js` backend). Tests can pass a seeded [`SeededRandom`]
//! or their own fake.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `low..=high`. Callers guarantee `low <= high`.
    fn between(&mut self, low: u32, high: u32) -> u32;

    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn index(&mut self, len: usize) -> usize;
}

#[derive(Default)]
pub struct ThreadRandom(ThreadRng);

impl ThreadRandom {
    pub fn new() -> Self {
        Self(rand::thread_rng())
    }
}

impl RandomSource for ThreadRandom {
    fn between(&mut self, low: u32, high: u32) -> u32 {
        self.0.gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Reproducible source for tests and replays.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn between(&mut self, low: u32, high: u32) -> u32 {
        self.0.gen_range(low..=high)
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}
