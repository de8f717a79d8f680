//! Synthetic series with known qualitative outcomes

use par_core::{Mulberry32, RandomSource};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Samples discarded before a simulated AR(2) series is recorded
pub const BURN_IN: usize = 100;

/// Outcome class a fixture is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expectation {
    /// Structureless or memoryless input: poor fit or a non-stable zone
    Nonsense,
    /// Monotonic growth: poor fit or a critical trend flag
    NonRecurrent,
    /// Near-unit-root dynamics: raw modulus above the instability threshold
    Adversarial,
    /// Known generating process
    #[serde(rename_all = "camelCase")]
    Control {
        truth: f64,
        tolerance: f64,
        /// Population R² of the generating AR(2), if stationary
        theoretical_r_squared: Option<f64>,
    },
}

impl Expectation {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Nonsense => "NONSENSE",
            Self::NonRecurrent => "NON_RECURRENT",
            Self::Adversarial => "ADVERSARIAL",
            Self::Control { .. } => "CONTROL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub name: String,
    pub expectation: Expectation,
    pub series: Vec<f64>,
}

impl Fixture {
    pub fn new(name: impl Into<String>, expectation: Expectation, series: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            expectation,
            series,
        }
    }
}

/// AR(2) coefficients with a complex root pair `modulus · e^{±i·angle}`
pub fn ar2_coefficients(modulus: f64, angle: f64) -> (f64, f64) {
    (2.0 * modulus * angle.cos(), -modulus * modulus)
}

/// Population `1 - σ²/γ0` of a stationary AR(2); `None` outside the
/// stationarity triangle
pub fn theoretical_r_squared(phi1: f64, phi2: f64) -> Option<f64> {
    let stationary = phi2.abs() < 1.0 && phi1 + phi2 < 1.0 && phi2 - phi1 < 1.0;
    if !stationary {
        return None;
    }
    let variance_ratio = (1.0 - phi2) / ((1.0 + phi2) * ((1.0 - phi2).powi(2) - phi1 * phi1));
    Some(1.0 - 1.0 / variance_ratio)
}

pub fn uniform_noise(n: usize, seed: u32) -> Vec<f64> {
    let mut rng = Mulberry32::new(seed);
    (0..n).map(|_| rng.next_f64()).collect()
}

/// Cumulative sum of standard normal steps
pub fn random_walk(n: usize, seed: u32) -> Vec<f64> {
    let mut rng = Mulberry32::new(seed);
    let mut level = 0.0;
    (0..n)
        .map(|_| {
            level += rng.next_gaussian();
            level
        })
        .collect()
}

/// `sin(2πt / period)` at `points` samples spaced `interval_hours` apart
pub fn sampled_sinusoid(points: usize, interval_hours: f64, period_hours: f64) -> Vec<f64> {
    (0..points)
        .map(|k| (TAU * k as f64 * interval_hours / period_hours).sin())
        .collect()
}

pub fn exponential_growth(n: usize, rate: f64) -> Vec<f64> {
    (0..n).map(|t| (rate * t as f64).exp()).collect()
}

/// AR(2) with root pair `modulus · e^{±i·angle}` and Gaussian innovations
/// of SD `sigma`, started from zero and recorded after [`BURN_IN`] samples
pub fn simulate_ar2(modulus: f64, angle: f64, n: usize, sigma: f64, seed: u32) -> Vec<f64> {
    let (phi1, phi2) = ar2_coefficients(modulus, angle);
    let mut rng = Mulberry32::new(seed);
    let (mut prev2, mut prev1) = (0.0, 0.0);
    let mut out = Vec::with_capacity(n);
    for t in 0..n + BURN_IN {
        let next = phi1 * prev1 + phi2 * prev2 + sigma * rng.next_gaussian();
        prev2 = prev1;
        prev1 = next;
        if t >= BURN_IN {
            out.push(next);
        }
    }
    out
}

fn control(name: &str, modulus: f64, angle: f64, n: usize, seed: u32) -> Fixture {
    let (phi1, phi2) = ar2_coefficients(modulus, angle);
    Fixture::new(
        name,
        Expectation::Control {
            truth: modulus,
            tolerance: 0.05,
            theoretical_r_squared: theoretical_r_squared(phi1, phi2),
        },
        simulate_ar2(modulus, angle, n, 0.01, seed),
    )
}

/// The standard fixture panel
pub fn standard_fixtures() -> Vec<Fixture> {
    vec![
        Fixture::new("uniform-noise", Expectation::Nonsense, uniform_noise(48, 1)),
        Fixture::new("random-walk", Expectation::Nonsense, random_walk(96, 1)),
        Fixture::new(
            "sinusoid-24h-every-4h",
            Expectation::Nonsense,
            sampled_sinusoid(48, 4.0, 24.0),
        ),
        Fixture::new(
            "exponential-growth",
            Expectation::NonRecurrent,
            exponential_growth(48, 0.05),
        ),
        Fixture::new(
            "near-unit-root",
            Expectation::Adversarial,
            simulate_ar2(0.995, PI / 12.0, 500, 0.01, 1),
        ),
        control("known-ar2-0.537", 0.537, PI / 3.0, 5000, 1),
        control("known-ar2-0.95", 0.95, PI / 3.0, 2000, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_theoretical_r_squared() {
        let (phi1, phi2) = ar2_coefficients(0.537, PI / 3.0);
        assert_relative_eq!(phi1, 0.537, epsilon = 1e-12);
        let r2 = theoretical_r_squared(phi1, phi2).unwrap();
        assert!((0.2..0.3).contains(&r2), "{r2}");
        let (phi1, phi2) = ar2_coefficients(0.95, PI / 3.0);
        assert!(theoretical_r_squared(phi1, phi2).unwrap() > 0.8);
        assert_eq!(theoretical_r_squared(2.0, -1.0), None);
        // White noise explains nothing
        assert_relative_eq!(theoretical_r_squared(0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_sinusoid_sampling() {
        let s = sampled_sinusoid(48, 4.0, 24.0);
        assert_eq!(s.len(), 48);
        assert_relative_eq!(s[0], s[6], epsilon = 1e-12);
        assert!(s.iter().all(|v| v.abs() <= 1.0));
    }

    #[test]
    fn test_generators_are_seeded() {
        assert_eq!(uniform_noise(10, 3), uniform_noise(10, 3));
        assert_ne!(random_walk(10, 3), random_walk(10, 4));
        assert!(uniform_noise(100, 1).iter().all(|v| (0.0..1.0).contains(v)));
        assert_eq!(simulate_ar2(0.5, 1.0, 25, 1.0, 9).len(), 25);
    }

    #[test]
    fn test_standard_panel_covers_every_class() {
        let fixtures = standard_fixtures();
        for class in ["NONSENSE", "NON_RECURRENT", "ADVERSARIAL", "CONTROL"] {
            assert!(fixtures.iter().any(|f| f.expectation.class_name() == class));
        }
    }
}
