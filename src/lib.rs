//! # Huella
//!
//! Carbon-footprint prediction server over pre-trained regression artifacts.
//!
//! Huella (Spanish: "footprint") turns a submitted lifestyle survey into the
//! exact feature vector a pre-trained model expects, scales it, scores it and
//! serves the result to browsers and AJAX clients.
//!
//! ## Pipeline
//!
//! ```text
//! form fields --reconcile--> FeatureVector --scaler--> model --> round(2)
//!                 ▲
//!          FeatureSchema (columns.json)
//! ```
//!
//! - **Schema**: the ordered feature list the model was trained on
//! - **Reconcile**: numeric, single-choice, multi-choice and checkbox rules
//! - **Scorer**: scaler transform, model prediction, optional unit conversion
//! - **Service**: `Uninitialized` or `Ready`, decided once at startup
//!
//! ## Example
//!
//! ```rust
//! use huella::{
//!     artifacts::Artifacts,
//!     model::RegressionModel,
//!     reconcile::{FormInput, ReconcileRules},
//!     scaler::FeatureScaler,
//!     schema::FeatureSchema,
//!     service::ServiceState,
//! };
//!
//! let schema = FeatureSchema::new(vec!["Monthly Grocery Bill".into(), "Sex_male".into()])?;
//! let model = RegressionModel::Linear { coefficients: vec![1.0, 10.0], intercept: 0.0 };
//! let artifacts = Artifacts::new(schema, FeatureScaler::Identity, model)?;
//! let service = ServiceState::ready(artifacts, ReconcileRules::survey(), None);
//!
//! let form = FormInput::from_pairs([("Monthly_Grocery_Bill", "150.5"), ("Sex", "male")]);
//! assert_eq!(service.predict(&form)?.rounded(), 160.5);
//! # Ok::<(), huella::HuellaError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Clippy allows (MUST come after deny/warn to override them)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // usize -> f64 for tree counts is acceptable
#![allow(clippy::must_use_candidate)] // Not all methods need #[must_use]
#![allow(clippy::doc_markdown)] // Allow technical terms without backticks
#![allow(clippy::missing_panics_doc)] // Allow missing Panics doc sections

/// HTTP server (form page, prediction and health endpoints)
#[cfg(feature = "server")]
pub mod api;
/// Artifact loading (feature list, scaler, model)
pub mod artifacts;
/// Command-line and environment configuration
#[cfg(feature = "server")]
pub mod config;
pub mod error;
/// Regression models (linear, tree ensemble)
pub mod model;
/// Form-to-feature-vector reconciliation
pub mod reconcile;
/// Feature scaling
pub mod scaler;
/// Feature schema and vectors
pub mod schema;
/// Scoring and unit conversion
pub mod scorer;
/// Prediction service state
pub mod service;

// Re-exports for convenience
pub use error::{HuellaError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
