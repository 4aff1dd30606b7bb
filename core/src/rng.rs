//! Deterministic random number generation for deck shuffling.
//!
//! RULE: Nothing in the crate may call a platform or thread-global RNG.
//! Every shuffle draws from a DeckRng owned by the caller.
//!
//! Each generation batch gets its own stream, seeded deterministically
//! from (master_seed XOR batch_index * golden ratio). This means:
//!   - Generating batch 7 never depends on whether batch 6 ran.
//!   - Two callers holding different DeckRng values never share state.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A named, deterministic RNG owned by a single generation path.
pub struct DeckRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DeckRng {
    /// Create a stream directly from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Create a stream from the process entropy source. Used only when the
    /// caller has no seed to reproduce.
    pub fn from_entropy() -> Self {
        Self {
            name: "entropy",
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform in-place shuffle over all permutations of `items`.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

/// Derives one independent DeckRng per batch from a master seed.
#[derive(Debug, Clone, Copy)]
pub struct SeedBank {
    master_seed: u64,
}

impl SeedBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The seed recorded alongside a stored batch.
    pub fn batch_seed(&self, batch_index: u64) -> u64 {
        self.master_seed ^ batch_index.wrapping_mul(GOLDEN_GAMMA)
    }

    pub fn for_batch(&self, batch_index: u64) -> DeckRng {
        DeckRng::from_seed(self.batch_seed(batch_index)).with_name("batch")
    }
}
