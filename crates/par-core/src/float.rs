//! JSON handling for unbounded statistics
//!
//! Not-computable information criteria, infinite F statistics and the
//! uncertainty of a single-gene group are stored as `f64::INFINITY`.
//! `serde_json` writes every non-finite float as `null`, so such fields
//! read `null` back as `+∞`.

use serde::{Deserialize, Deserializer};

/// Deserialize an `f64` that may have been written as `null`
///
/// Use with `#[serde(deserialize_with = "par_core::float::unbounded")]`.
pub fn unbounded<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}
