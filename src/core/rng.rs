//! Deterministic random number generation for board shuffles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical boards
//! - **Entropy seeding**: Hosts that don't care about replays can seed from the OS
//!
//! ## Usage
//!
//! ```
//! use match_pairs::core::GameRng;
//!
//! let mut rng1 = GameRng::new(42);
//! let mut rng2 = GameRng::new(42);
//!
//! // Same seed, same sequence
//! assert_eq!(rng1.gen_range_usize(0..100), rng2.gen_range_usize(0..100));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used by the shuffler.
///
/// Uses ChaCha8 for speed while keeping uniform, unbiased ranges.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from operating system entropy.
    ///
    /// The chosen seed is still recorded, so `seed()` can reproduce the shuffles.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a uniformly distributed usize in the given range.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }
}
