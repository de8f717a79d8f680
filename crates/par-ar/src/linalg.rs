//! Small dense solvers for the normal and Yule–Walker equations

use nalgebra::{DMatrix, DVector};

/// Normalised determinants below this are treated as singular
pub const SINGULAR_DETERMINANT: f64 = 1e-10;

/// Determinant of `m` after scaling to unit diagonal
///
/// Equals `det(m) / prod(diag(m))`, the determinant of the correlation
/// matrix for a Gram or autocovariance matrix, so the singularity test does
/// not depend on the units of the series.
pub fn normalized_determinant(m: &DMatrix<f64>) -> f64 {
    let diag: f64 = m.diagonal().iter().product();
    if !(diag > 0.0) || !diag.is_finite() {
        return 0.0;
    }
    determinant(m) / diag
}

fn determinant(m: &DMatrix<f64>) -> f64 {
    match m.nrows() {
        0 => 1.0,
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        _ => m.clone().lu().determinant(),
    }
}

/// Solve `a x = b` for a symmetric positive semi-definite system
///
/// Orders 1 and 2 use closed forms; larger systems use LU with partial
/// pivoting. `None` when the system is singular.
pub fn solve_symmetric(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<Vec<f64>> {
    if normalized_determinant(a).abs() < SINGULAR_DETERMINANT {
        return None;
    }
    let solution = match a.nrows() {
        1 => vec![b[0] / a[(0, 0)]],
        2 => {
            let det = determinant(a);
            vec![
                (b[0] * a[(1, 1)] - b[1] * a[(0, 1)]) / det,
                (a[(0, 0)] * b[1] - a[(1, 0)] * b[0]) / det,
            ]
        }
        _ => a.clone().lu().solve(b)?.iter().copied().collect(),
    };
    solution.iter().all(|v| v.is_finite()).then_some(solution)
}

/// Ordinary least squares via the normal equations `XᵀX β = Xᵀy`
pub fn least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<Vec<f64>> {
    let xt = x.transpose();
    solve_symmetric(&(&xt * x), &(&xt * y))
}

/// Biased autocovariance `γ(h) = (1/n) Σ c_t c_{t-h}` of a centred series
pub fn autocovariance(centered: &[f64], lag: usize) -> f64 {
    let n = centered.len();
    if lag >= n {
        return 0.0;
    }
    centered[lag..]
        .iter()
        .zip(centered)
        .map(|(a, b)| a * b)
        .sum::<f64>()
        / n as f64
}

/// Yule–Walker coefficients from the Toeplitz autocovariance system
pub fn yule_walker(centered: &[f64], lags: usize) -> Option<Vec<f64>> {
    let gamma: Vec<f64> = (0..=lags).map(|h| autocovariance(centered, h)).collect();
    let toeplitz = DMatrix::from_fn(lags, lags, |i, j| gamma[i.abs_diff(j)]);
    let rhs = DVector::from_fn(lags, |i, _| gamma[i + 1]);
    solve_symmetric(&toeplitz, &rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_form_matches_lu() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        let closed = solve_symmetric(&a, &b).unwrap();
        let lu: Vec<f64> = a.clone().lu().solve(&b).unwrap().iter().copied().collect();
        assert_relative_eq!(closed[0], lu[0], epsilon = 1e-12);
        assert_relative_eq!(closed[1], lu[1], epsilon = 1e-12);
    }

    #[test]
    fn test_three_by_three() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0]);
        let x = DVector::from_row_slice(&[1.0, -2.0, 0.5]);
        let b = &a * &x;
        let solved = solve_symmetric(&a, &b).unwrap();
        for (s, e) in solved.iter().zip(x.iter()) {
            assert_relative_eq!(*s, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_detection_is_scale_free() {
        let singular = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert!(solve_symmetric(&singular, &DVector::from_row_slice(&[1.0, 1.0])).is_none());

        // Tiny units but well conditioned
        let tiny = DMatrix::from_row_slice(2, 2, &[1e-8, 0.0, 0.0, 1e-8]);
        assert!(solve_symmetric(&tiny, &DVector::from_row_slice(&[1e-8, 2e-8])).is_some());
        assert_relative_eq!(normalized_determinant(&tiny), 1.0);
    }

    #[test]
    fn test_autocovariance() {
        let c = [1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(autocovariance(&c, 0), 1.0);
        assert_relative_eq!(autocovariance(&c, 1), -0.75);
        assert_eq!(autocovariance(&c, 4), 0.0);
    }
}
