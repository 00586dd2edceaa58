//! Scoring: scale, predict, convert units
//!
//! Pure and synchronous. Any failure is a per-request pipeline error; the
//! scorer itself holds only read-only artifacts and never changes state.

use std::sync::Arc;

use crate::{
    artifacts::Artifacts,
    error::{HuellaError, Result},
    schema::FeatureVector,
};

/// Round to 2 decimal places
///
/// Rounds the exact binary value of `value`, so exact ties go to the even
/// digit (`0.125` → `0.12`) and values stored just below a tie round down
/// (`2.675` → `2.67`). Non-finite input is returned unchanged.
///
/// ```
/// assert_eq!(huella::scorer::round_to_cents(150.5), 150.5);
/// assert_eq!(huella::scorer::round_to_cents(2.345_678), 2.35);
/// assert_eq!(huella::scorer::round_to_cents(-1.005_1), -1.01);
/// assert_eq!(huella::scorer::round_to_cents(0.125), 0.12);
/// ```
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Fixed post-prediction divisor, e.g. 1000 for kg → t
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    divisor: f64,
}

impl UnitConversion {
    /// Create a conversion dividing by `divisor`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for zero or non-finite divisors.
    pub fn new(divisor: f64) -> Result<Self> {
        if !divisor.is_finite() || divisor == 0.0 {
            return Err(HuellaError::InvalidConfiguration(format!(
                "unit divisor must be finite and non-zero, got {divisor}"
            )));
        }
        Ok(Self { divisor })
    }

    /// The configured divisor
    #[must_use]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Apply the conversion
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        value / self.divisor
    }
}

/// Result of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Model output before unit conversion
    pub raw: f64,
    /// Value after unit conversion (equals `raw` when none is configured)
    pub value: f64,
}

impl Prediction {
    /// Value rounded to 2 decimal places, as presented to callers
    #[must_use]
    pub fn rounded(&self) -> f64 {
        round_to_cents(self.value)
    }
}

/// Applies scaler, model and optional unit conversion
#[derive(Debug, Clone)]
pub struct Scorer {
    artifacts: Arc<Artifacts>,
    conversion: Option<UnitConversion>,
}

impl Scorer {
    /// Create a scorer over loaded artifacts
    #[must_use]
    pub fn new(artifacts: Arc<Artifacts>, conversion: Option<UnitConversion>) -> Self {
        Self {
            artifacts,
            conversion,
        }
    }

    /// Artifacts this scorer reads
    #[must_use]
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Score one reconciled feature vector
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the vector does not match the schema,
    /// scaler or model width, and `NonFinitePrediction` if the model output
    /// is NaN or infinite.
    pub fn score(&self, vector: &FeatureVector) -> Result<Prediction> {
        let expected = self.artifacts.schema().len();
        if vector.len() != expected {
            return Err(HuellaError::DimensionMismatch {
                stage: "schema",
                expected,
                actual: vector.len(),
            });
        }

        let scaled = self.artifacts.scaler().transform(vector.as_slice())?;
        let raw = self.artifacts.model().predict(&scaled)?;
        if !raw.is_finite() {
            return Err(HuellaError::NonFinitePrediction { value: raw });
        }

        let value = self.conversion.map_or(raw, |c| c.apply(raw));
        Ok(Prediction { raw, value })
    }
}
