//! Feature scalers
//!
//! Deterministic per-column affine transforms fitted offline and shipped as
//! `scaler.json`:
//!
//! - `identity`: `x`
//! - `standard`: `(x - mean) / scale` (columns with `|scale| < 1e-10` are only centered)
//! - `min_max`: `x * scale + min`

use serde::{Deserialize, Serialize};

use crate::error::{HuellaError, Result};

/// Scale values below this are treated as zero variance
const MIN_SCALE: f64 = 1e-10;

/// Fitted feature scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// Pass-through
    Identity,
    /// Standardization: subtract mean, divide by scale
    Standard {
        /// Per-column mean
        mean: Vec<f64>,
        /// Per-column scale (standard deviation)
        scale: Vec<f64>,
    },
    /// Range scaling: multiply by scale, add min
    MinMax {
        /// Per-column offset
        min: Vec<f64>,
        /// Per-column multiplier
        scale: Vec<f64>,
    },
}

impl FeatureScaler {
    /// Number of columns this scaler was fitted on, `None` for identity
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Identity => None,
            Self::Standard { mean, .. } => Some(mean.len()),
            Self::MinMax { min, .. } => Some(min.len()),
        }
    }

    /// Structural check run at load time
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMismatch` if the parameter vectors differ in length
    /// or contain non-finite values.
    pub fn validate(&self) -> Result<()> {
        let (a, b, names) = match self {
            Self::Identity => return Ok(()),
            Self::Standard { mean, scale } => (mean, scale, ("mean", "scale")),
            Self::MinMax { min, scale } => (min, scale, ("min", "scale")),
        };
        if a.len() != b.len() {
            return Err(HuellaError::ArtifactMismatch {
                reason: format!(
                    "scaler {} has {} entries but {} has {}",
                    names.0,
                    a.len(),
                    names.1,
                    b.len()
                ),
            });
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(HuellaError::ArtifactMismatch {
                reason: "scaler parameters contain NaN or infinity".to_string(),
            });
        }
        Ok(())
    }

    /// Transform one feature row
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `x` does not match the fitted width.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        if let Some(expected) = self.width() {
            if x.len() != expected {
                return Err(HuellaError::DimensionMismatch {
                    stage: "scaler",
                    expected,
                    actual: x.len(),
                });
            }
        }

        let out = match self {
            Self::Identity => x.to_vec(),
            Self::Standard { mean, scale } => x
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(&v, (&m, &s))| {
                    let centered = v - m;
                    if s.abs() > MIN_SCALE {
                        centered / s
                    } else {
                        centered
                    }
                })
                .collect(),
            Self::MinMax { min, scale } => x
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(&v, (&lo, &s))| v * s + lo)
                .collect(),
        };
        Ok(out)
    }
}
