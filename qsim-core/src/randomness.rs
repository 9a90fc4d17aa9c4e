//! Random sources for parallel simulation tasks.
//!
//! There is no ambient generator. Each task owns exactly one [`SimRng`] and
//! passes it by `&mut` into every variate draw. Given a base seed, the source of
//! a task is derived from the seed and the task's stream index, so a task's
//! draws do not depend on which worker thread runs it or when.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source owned by one simulation task.
pub type SimRng = ChaCha8Rng;

pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministically derive the seed of stream `stream` from a base seed.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    splitmix64(seed ^ splitmix64(stream))
}

/// Random source for stream `stream`.
///
/// With a base seed the source is reproducible; without one it is seeded from
/// operating system entropy.
pub fn stream_rng(seed: Option<u64>, stream: u64) -> SimRng {
    match seed {
        Some(seed) => SimRng::seed_from_u64(stream_seed(seed, stream)),
        None => SimRng::from_entropy(),
    }
}
