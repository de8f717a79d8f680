//! Descriptive statistics and empirical-distribution helpers shared by
//! every par-* crate.

use statrs::statistics::Statistics;

/// Arithmetic mean; `NaN` for empty input
pub fn mean(data: &[f64]) -> f64 {
    data.mean()
}

/// Population variance (divisor `n`); `NaN` for empty input
pub fn population_variance(data: &[f64]) -> f64 {
    data.population_variance()
}

/// Sample standard deviation (divisor `n - 1`); `NaN` below two samples
pub fn sample_std_dev(data: &[f64]) -> f64 {
    data.std_dev()
}

/// Root-mean-square amplitude about the mean
pub fn rms_amplitude(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    population_variance(data).sqrt()
}

/// Copy of `data` sorted ascending with NaN placed last
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Linear-interpolation percentile of pre-sorted data, `q` in `[0, 1]`
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}

/// Linear-interpolation percentile, `q` in `[0, 1]`
pub fn percentile(data: &[f64], q: f64) -> f64 {
    percentile_sorted(&sorted(data), q)
}

pub fn median(data: &[f64]) -> f64 {
    percentile(data, 0.5)
}

/// Add-one empirical p-value: `(count(null >= observed) + 1) / (n + 1)`
pub fn empirical_p_value(observed: f64, null_distribution: &[f64]) -> f64 {
    let exceed = null_distribution.iter().filter(|&&x| x >= observed).count();
    (exceed + 1) as f64 / (null_distribution.len() + 1) as f64
}

/// Standardised position of `observed` within a null distribution
///
/// `None` when the null has fewer than two values or zero spread.
pub fn z_score(observed: f64, null_distribution: &[f64]) -> Option<f64> {
    if null_distribution.len() < 2 {
        return None;
    }
    let sd = sample_std_dev(null_distribution);
    if !sd.is_finite() || sd <= 0.0 {
        return None;
    }
    Some((observed - mean(null_distribution)) / sd)
}

/// Standard error of the mean; `None` below two samples
pub fn standard_error(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    Some(sample_std_dev(data) / (data.len() as f64).sqrt())
}
