//! Random draw sources
//!
//! Every probabilistic decision in a battle goes through an [`RngSource`].
//! The trait has a single required operation, a uniform draw in `[0, 1)`;
//! ranges, chances and index picks are derived from it so that a scripted
//! source controls every outcome.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest value a sanitized draw can take
const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

/// A source of uniform random draws
pub trait RngSource {
    /// Next uniform draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Draw clamped into `[0, 1)`; NaN maps to 0
    fn draw(&mut self) -> f64 {
        let value = self.next_unit();
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, MAX_UNIT)
        }
    }

    /// Uniform integer in `[min, max]` inclusive
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min;
        let offset = (self.draw() * (span as f64 + 1.0)).floor() as u32;
        min + offset.min(span)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.draw() < p
    }

    /// Uniform index in `[0, len)`; 0 for empty or single-element sets
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let index = (self.draw() * len as f64).floor() as usize;
        index.min(len - 1)
    }
}

/// Seeded or OS-seeded standard generator
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Create a reproducible generator from a seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the thread-local generator
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RngSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Always returns the same draw
///
/// `ConstantRng::max()` rolls the top of every range and fails every chance
/// check below 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRng(pub f64);

impl ConstantRng {
    pub fn max() -> Self {
        Self(MAX_UNIT)
    }

    pub fn min() -> Self {
        Self(0.0)
    }
}

impl RngSource for ConstantRng {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of draws
///
/// Once the script runs out it either cycles from the start or repeats the
/// fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    script: Vec<f64>,
    pending: VecDeque<f64>,
    cycle: bool,
    fallback: f64,
    drawn: usize,
}

impl ScriptedRng {
    /// Replay `draws` once, then return `fallback` forever
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        let script: Vec<f64> = draws.into_iter().collect();
        Self {
            pending: script.iter().copied().collect(),
            script,
            cycle: false,
            fallback,
            drawn: 0,
        }
    }

    /// Replay `draws` in a loop
    pub fn cycle(draws: impl IntoIterator<Item = f64>) -> Self {
        let mut rng = Self::new(draws, 0.0);
        rng.cycle = true;
        rng
    }

    /// Number of draws taken so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RngSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        self.drawn += 1;
        if self.pending.is_empty() && self.cycle && !self.script.is_empty() {
            self.pending.extend(self.script.iter().copied());
        }
        self.pending.pop_front().unwrap_or(self.fallback)
    }
}
