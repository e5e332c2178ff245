//! Injected randomness for the transition engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A source of randomness the engine draws from.
///
/// Implementations must be thread-confined; the engine never shares one.
pub trait RandomSource {
    /// Next float in the half-open range [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..n`. `n` is always at least 1.
    fn pick(&mut self, n: usize) -> usize;
}

/// Production source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source: the same seed yields the same game.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// Replays fixed sequences of floats and picks.
///
/// Once a sequence runs dry, floats fall back to `fallback` (0.99 unless
/// changed, which fails every chance check) and picks fall back to 0.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    floats: VecDeque<f64>,
    picks: VecDeque<usize>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(floats: impl IntoIterator<Item = f64>) -> Self {
        Self {
            floats: floats.into_iter().collect(),
            ..Self::quiet()
        }
    }

    /// Source that fails every chance check.
    pub fn quiet() -> Self {
        Self {
            floats: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: 0.99,
        }
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks = picks.into_iter().collect();
        self
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of scripted floats not yet drawn.
    pub fn remaining_floats(&self) -> usize {
        self.floats.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(self.fallback)
    }

    fn pick(&mut self, n: usize) -> usize {
        // Out-of-range scripted picks wrap rather than escape `0..n`.
        self.picks.pop_front().map_or(0, |p| p % n.max(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn pick(&mut self, n: usize) -> usize {
        (**self).pick(n)
    }
}
