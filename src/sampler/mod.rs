//! Budgeted random candidate sampling

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws uniformly random indices into the relay list, with replacement,
/// under a countdown budget equal to the list length.
///
/// This is deliberately weaker than sampling without replacement: the same
/// index may come up more than once, and fewer than `len` distinct relays
/// may ever be visited. Callers interleave draws with filtering and stop
/// early once they have enough accepted addresses; the budget only bounds
/// the total number of draws.
pub struct RelaySampler {
    budget: usize,
    rng: StdRng,
}

impl RelaySampler {
    /// Sampler over a list of `len` relays, seeded from the OS.
    pub fn new(len: usize) -> Self {
        Self::with_rng(len, StdRng::from_entropy())
    }

    /// Sampler with a caller-supplied RNG, for deterministic tests.
    pub fn with_rng(len: usize, rng: StdRng) -> Self {
        RelaySampler { budget: len, rng }
    }

    /// Draw one candidate index in `[0, len)`, or `None` once the budget is
    /// spent or the list is empty.
    pub fn draw(&mut self, len: usize) -> Option<usize> {
        if self.budget == 0 || len == 0 {
            return None;
        }
        self.budget -= 1;
        Some(self.rng.gen_range(0..len))
    }

    /// Draws left in the budget.
    pub fn remaining(&self) -> usize {
        self.budget
    }
}
