//! Multiple-testing corrections
//!
//! Non-finite p-values are treated as 1 and values outside `[0, 1]` are
//! clamped, so a single failed test cannot poison a family.

fn sanitize(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Benjamini–Hochberg adjusted p-values (q-values), in input order
///
/// `q_(i) = min_{j >= i} min(1, p_(j) · m / j)` over the ascending ranks.
/// Guarantees `q_i >= p_i` and that q is monotone in p.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let p: Vec<f64> = p_values.iter().copied().map(sanitize).collect();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p[a].total_cmp(&p[b]).then(a.cmp(&b)));

    let mut q = vec![1.0; m];
    let mut running = 1.0f64;
    for (rank, &idx) in order.iter().enumerate().rev() {
        let scaled = (p[idx] * m as f64 / (rank + 1) as f64).min(1.0);
        running = running.min(scaled);
        q[idx] = running;
    }
    q
}

/// Bonferroni adjusted p-values, in input order
pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values
        .iter()
        .map(|&p| (sanitize(p) * m).min(1.0))
        .collect()
}

/// Number of adjusted values strictly below `alpha`
pub fn count_discoveries(adjusted: &[f64], alpha: f64) -> usize {
    adjusted.iter().filter(|&&q| q < alpha).count()
}
