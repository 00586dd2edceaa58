//! Error types for Huella
//!
//! One crate-wide error enum. Field-level problems in submitted forms never
//! reach this type: the reconciler absorbs them. Everything here is either a
//! startup failure (artifacts, configuration) or a per-request pipeline failure.

use thiserror::Error;

/// Result type alias for Huella operations
pub type Result<T> = std::result::Result<T, HuellaError>;

/// Error type for all Huella operations
#[derive(Debug, Error)]
pub enum HuellaError {
    /// Artifact file could not be read
    #[error("Failed to read artifact {path}: {reason}")]
    ArtifactIo {
        /// Path of the artifact
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// Artifact file was read but could not be decoded or is structurally invalid
    #[error("Invalid artifact {path}: {reason}")]
    ArtifactFormat {
        /// Path of the artifact
        path: String,
        /// Decoding or validation failure
        reason: String,
    },

    /// Artifacts disagree with each other (e.g. scaler width vs. schema width)
    #[error("Artifact mismatch: {reason}")]
    ArtifactMismatch {
        /// Description of the disagreement
        reason: String,
    },

    /// Feature vector width does not match what a pipeline stage expects
    #[error("Dimension mismatch in {stage}: expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Pipeline stage that rejected the vector
        stage: &'static str,
        /// Expected width
        expected: usize,
        /// Actual width
        actual: usize,
    },

    /// Model produced NaN or infinity
    #[error("Model produced a non-finite prediction: {value}")]
    NonFinitePrediction {
        /// The offending value
        value: f64,
    },

    /// Prediction requested while artifacts are not loaded
    #[error("Prediction service unavailable: {reason}")]
    Unavailable {
        /// Why the artifacts are not available
        reason: String,
    },

    /// Page template failed to compile or render
    #[error("Template error: {reason}")]
    Template {
        /// Underlying template engine message
        reason: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// HTTP server failure (bind, accept, address parsing)
    #[error("Server error: {0}")]
    Server(String),
}

impl HuellaError {
    /// Whether this error belongs to the numeric prediction pipeline
    ///
    /// Pipeline errors are reported to callers as prediction failures; the
    /// service stays ready for subsequent requests.
    #[must_use]
    pub fn is_pipeline_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::NonFinitePrediction { .. }
        )
    }
}
