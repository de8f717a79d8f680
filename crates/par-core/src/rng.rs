//! Seeded random number generation
//!
//! The engine constructs exactly one generator type, [`Mulberry32`], a 32-bit
//! counter-based PRNG. It implements [`rand::RngCore`] and
//! [`rand::SeedableRng`], so it plugs into `rand`'s sampling helpers
//! (`SliceRandom::shuffle`, `seq::index::sample`, `gen_range`).
//!
//! [`RandomSource`] adds the two draws the numeric code needs directly and is
//! implemented for every `RngCore`.

use rand::{Error as RandError, RngCore, SeedableRng};
use std::f64::consts::TAU;

const GOLDEN_GAMMA: u32 = 0x9E37_79B9;

/// Mulberry32 generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Independent stream for the `index`-th work item of a batch
    ///
    /// Streams depend only on `(seed, index)`, so sequential and parallel
    /// batch execution draw identical numbers for each item.
    pub fn for_stream(seed: u32, index: usize) -> Self {
        let mut mixer = Self::new(seed ^ (index as u32).wrapping_mul(GOLDEN_GAMMA));
        Self::new(mixer.next_u32())
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}

/// Uniform and Gaussian draws on top of a 32-bit generator
pub trait RandomSource {
    /// Uniform draw in `[0, 1)` from one 32-bit output
    fn next_f64(&mut self) -> f64;

    /// Standard normal draw via Box–Muller on two uniform draws
    fn next_gaussian(&mut self) -> f64 {
        let mut u1 = self.next_f64();
        while u1 <= 0.0 {
            u1 = self.next_f64();
        }
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Uniform index in `0..n`; `n` must be positive
    fn next_index(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}
