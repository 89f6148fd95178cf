//! Random draws used by the simulation
//!
//! Every draw goes through the session's own generator. Integer ranges are
//! half-open and collapse to `lo` when empty, since legitimate boundary
//! positions (bobber on a rail, bar near the top) can produce them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Default session generator
pub type SessionRng = Pcg32;

/// Seed a session generator
pub fn seeded(seed: u64) -> SessionRng {
    Pcg32::seed_from_u64(seed)
}

/// Integer in `[lo, hi)`, or `lo` if the range is empty
#[inline]
pub fn next_int<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo { lo } else { rng.random_range(lo..hi) }
}

/// True with probability `p` (values outside 0..1 saturate)
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}
