//! Resampling primitives
//!
//! All functions take the random generator explicitly; none of them touch
//! global state. Any `rand::Rng` works, the engine itself always passes a
//! seeded [`par_core::Mulberry32`].

use par_core::{math, Error, RandomSource, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Default moving-block length `round(n^(1/3))`, at least 2 and at most `n`
pub fn default_block_length(n: usize) -> usize {
    let length = ((n as f64).cbrt().round() as usize).max(2);
    length.min(n.max(1))
}

/// Random subset of `target_n` time points, kept in time order
///
/// Indices are chosen by a Fisher–Yates shuffle; a series already at or
/// below the target length is returned unchanged.
pub fn downsample<R: Rng + ?Sized>(series: &[f64], target_n: usize, rng: &mut R) -> Vec<f64> {
    if target_n >= series.len() {
        return series.to_vec();
    }
    let mut indices: Vec<usize> = (0..series.len()).collect();
    indices.shuffle(rng);
    let mut kept = indices[..target_n].to_vec();
    kept.sort_unstable();
    kept.into_iter().map(|i| series[i]).collect()
}

/// Add Gaussian noise with SD `relative_level × RMS amplitude`
///
/// The amplitude is measured about the mean, so a large expression
/// baseline does not inflate the noise.
pub fn add_noise<R: Rng + ?Sized>(series: &[f64], relative_level: f64, rng: &mut R) -> Result<Vec<f64>> {
    if !relative_level.is_finite() || relative_level < 0.0 {
        return Err(Error::invalid_config(
            "noise level",
            format!("must be finite and non-negative, got {relative_level}"),
        ));
    }
    let sd = relative_level * math::rms_amplitude(series);
    Ok(series.iter().map(|&v| v + sd * rng.next_gaussian()).collect())
}

/// Moving-block resample with replacement
///
/// Blocks of `block_length` consecutive points are drawn with uniformly
/// random starts and concatenated, then truncated to the original length.
pub fn block_resample<R: Rng + ?Sized>(series: &[f64], block_length: usize, rng: &mut R) -> Result<Vec<f64>> {
    if block_length == 0 {
        return Err(Error::invalid_config("block length", "must be positive"));
    }
    let n = series.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let block = block_length.min(n);
    let starts = n - block + 1;
    let mut out = Vec::with_capacity(n + block);
    while out.len() < n {
        let start = rng.next_index(starts);
        out.extend_from_slice(&series[start..start + block]);
    }
    out.truncate(n);
    Ok(out)
}

/// Uniformly random permutation of `values`
pub fn permute_labels<T: Clone, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> Vec<T> {
    let mut out = values.to_vec();
    out.shuffle(rng);
    out
}
