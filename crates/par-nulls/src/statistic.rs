//! Group persistence statistics the null tests resample

use par_ar::fit_ar2;
use par_core::{math, GeneSeries};

/// AR(2) eigenvalue modulus, or `None` when the fit is not computable
pub fn modulus(values: &[f64]) -> Option<f64> {
    let fit = fit_ar2(values);
    fit.is_ok().then_some(fit.eigenvalue_modulus)
}

/// Mean modulus over computable fits; `None` when no fit is computable
pub fn mean_modulus<'a, I>(series: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let moduli: Vec<f64> = series.into_iter().filter_map(modulus).collect();
    (!moduli.is_empty()).then(|| math::mean(&moduli))
}

/// Clock-minus-target gap of mean eigenvalue modulus
pub fn persistence_gap(clock: &[GeneSeries], target: &[GeneSeries]) -> Option<f64> {
    let clock_mean = mean_modulus(clock.iter().map(|g| g.values.as_slice()))?;
    let target_mean = mean_modulus(target.iter().map(|g| g.values.as_slice()))?;
    Some(clock_mean - target_mean)
}
