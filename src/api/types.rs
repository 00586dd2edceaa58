//! API request/response types

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when artifacts are loaded, "degraded" otherwise
    pub status: String,
    /// Service version
    pub version: String,
    /// Whether predictions are being served
    pub ready: bool,
    /// Schema width (0 when not ready)
    pub features: usize,
}

/// Successful prediction for programmatic callers
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Prediction rounded to 2 decimal places
    pub result: f64,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
