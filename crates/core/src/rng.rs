//! RNG module - seeded shuffling and card identities
//!
//! Every deck build draws its shuffle from a [`ShuffleRng`], a ChaCha8 stream
//! seeded from a `u64`. Same seed, same deck, which keeps engine tests and
//! replays reproducible.
//!
//! Card identities come from a [`CardIdGen`] owned by a single deck build.
//! A fresh generator starts at zero for every round; nothing is process-global.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::CardId;

/// Deterministic shuffle source
#[derive(Debug, Clone)]
pub struct ShuffleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl ShuffleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG from OS entropy. The chosen seed is still recorded.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive a seed for a child stream (one per round deck)
    pub fn next_seed(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Shuffle a slice uniformly (Fisher-Yates)
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// Monotonic card identity source for one deck build
#[derive(Debug, Clone, Default)]
pub struct CardIdGen {
    next: u32,
}

impl CardIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> CardId {
        let id = CardId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}
