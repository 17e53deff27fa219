//! Deterministic random number generation for demo landscapes.
//!
//! RULE: Nothing that builds a landscape may call any platform RNG.
//! Every population pass draws from its own stream, seeded from
//! (master_seed XOR slot). Adding a pass never changes another's draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    pub fn new(master_seed: u64, slot: u64) -> Self {
        let derived_seed = master_seed ^ slot.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self { name: "unnamed", inner: Pcg64Mcg::seed_from_u64(derived_seed) }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Uniform in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform integer in [0, n).
    pub fn below(&mut self, n: u32) -> u32 {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Bernoulli trial: true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// All streams for one demo landscape.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries, only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Trees = 0,
    Soil = 1,
    Snags = 2,
    Saplings = 3,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trees => "trees",
            Self::Soil => "soil",
            Self::Snags => "snags",
            Self::Saplings => "saplings",
        }
    }
}
