//! Randomness sources for expansion.
//!
//! Every choice point draws exactly one value in `[0, 1)`. Production code
//! uses [`SeededRandom`]; tests script the draws with [`ScriptedRandom`] so
//! an expansion's outcome is known in advance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A deterministic stream of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Return the next uniform value in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Draw an index in `0..len`. Returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let index = (self.next_uniform() * len as f64) as usize;
        index.min(len - 1)
    }

    /// Return true with probability `p`.
    fn next_bool(&mut self, p: f64) -> bool {
        self.next_uniform() < p
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// A seedable pseudo-random source. The same seed always yields the same
/// sequence of draws.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling back to the start when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedRandom {
    /// Values are clamped into `[0, 1)` and NaN becomes 0. An empty script
    /// always draws 0.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws = draws
            .into()
            .into_iter()
            .map(|v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        ScriptedRandom { draws, position: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RandomSource for ScriptedRandom {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            self.position += 1;
            return 0.0;
        }
        let value = self.draws[self.position % self.draws.len()];
        self.position += 1;
        value
    }
}
