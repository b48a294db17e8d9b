//! Random number generator construction.
//!
//! Every island owns an independent stream derived from the run seed, so
//! islands never share RNG state across threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a seeded RNG.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a seed from the OS entropy source.
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// Derives a decorrelated child seed (SplitMix64 finalizer).
///
/// Used to give each run and each island its own stream from one master seed.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed
        .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
