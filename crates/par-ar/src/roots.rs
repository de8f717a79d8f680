//! Dominant root of the AR characteristic polynomial
//!
//! For `x_t = φ1 x_{t-1} + … + φp x_{t-p} + ε_t` the characteristic
//! polynomial is `λ^p − φ1 λ^{p-1} − … − φp`. The largest root modulus is
//! the persistence measure ("eigenvalue") reported throughout the engine.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Largest-modulus root of an AR characteristic polynomial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantRoot {
    pub modulus: f64,
    pub is_complex: bool,
    /// Argument in radians: 0 for a positive real root, π for a negative one
    pub argument: f64,
}

impl DominantRoot {
    fn real(root: f64) -> Self {
        Self {
            modulus: root.abs(),
            is_complex: false,
            argument: if root < 0.0 { PI } else { 0.0 },
        }
    }

    fn complex(modulus: f64, cos_argument: f64) -> Self {
        Self {
            modulus,
            is_complex: true,
            argument: cos_argument.clamp(-1.0, 1.0).acos(),
        }
    }

    /// Larger of two candidates, preferring `self` on ties
    fn max(self, other: Self) -> Self {
        if other.modulus > self.modulus {
            other
        } else {
            self
        }
    }

    /// Root of `λ − φ1`
    pub fn of_ar1(phi1: f64) -> Self {
        Self::real(phi1)
    }

    /// Roots of `λ² − φ1 λ − φ2`, classified by the discriminant `φ1² + 4φ2`
    pub fn of_ar2(phi1: f64, phi2: f64) -> Self {
        let disc = phi1 * phi1 + 4.0 * phi2;
        if disc >= 0.0 {
            let s = disc.sqrt();
            Self::real((phi1 + s) / 2.0).max(Self::real((phi1 - s) / 2.0))
        } else {
            let modulus = (-phi2).sqrt();
            Self::complex(modulus, phi1 / (2.0 * modulus))
        }
    }

    /// Roots of `λ³ − φ1 λ² − φ2 λ − φ3` via the depressed cubic
    ///
    /// Cardano's formula gives the single real root when the cubic
    /// discriminant is positive; the complex pair then comes from deflating
    /// to a quadratic. Otherwise all three roots are real and use the
    /// trigonometric form.
    pub fn of_ar3(phi1: f64, phi2: f64, phi3: f64) -> Self {
        if phi3 == 0.0 {
            return Self::of_ar2(phi1, phi2);
        }
        let (a, b, c) = (-phi1, -phi2, -phi3);
        let shift = -a / 3.0;
        let p = b - a * a / 3.0;
        let q = 2.0 * a.powi(3) / 27.0 - a * b / 3.0 + c;
        let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

        if disc > 0.0 {
            let s = disc.sqrt();
            let r = (-q / 2.0 + s).cbrt() + (-q / 2.0 - s).cbrt() + shift;
            let real = Self::real(r);

            // λ³ + aλ² + bλ + c = (λ − r)(λ² + (a + r)λ + e)
            let linear = a + r;
            let e = b + r * linear;
            let quad_disc = linear * linear - 4.0 * e;
            if quad_disc < 0.0 {
                let modulus = e.sqrt();
                real.max(Self::complex(modulus, -linear / (2.0 * modulus)))
            } else {
                let s = quad_disc.sqrt();
                real.max(Self::real((-linear + s) / 2.0))
                    .max(Self::real((-linear - s) / 2.0))
            }
        } else if p.abs() < 1e-14 {
            Self::real((-q).cbrt() + shift)
        } else {
            let m = 2.0 * (-p / 3.0).sqrt();
            let theta = ((3.0 * q / (2.0 * p)) * (-3.0 / p).sqrt())
                .clamp(-1.0, 1.0)
                .acos()
                / 3.0;
            (0..3)
                .map(|k| Self::real(m * (theta - TAU * k as f64 / 3.0).cos() + shift))
                .fold(Self::real(0.0), Self::max)
        }
    }
}

/// Dominant root for coefficient vectors of length 1 to 3
///
/// `None` for an empty vector or more than three coefficients.
pub fn dominant_root(coefficients: &[f64]) -> Option<DominantRoot> {
    match *coefficients {
        [phi1] => Some(DominantRoot::of_ar1(phi1)),
        [phi1, phi2] => Some(DominantRoot::of_ar2(phi1, phi2)),
        [phi1, phi2, phi3] => Some(DominantRoot::of_ar3(phi1, phi2, phi3)),
        _ => None,
    }
}
