//! Artifact store: model, scaler and feature list loaded from disk
//!
//! The three files are produced by the offline training job. They are read
//! once at startup, checked against each other, and never touched again.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    error::{HuellaError, Result},
    model::RegressionModel,
    scaler::FeatureScaler,
    schema::FeatureSchema,
};

/// Default model file name
pub const DEFAULT_MODEL_FILE: &str = "model.json";
/// Default scaler file name
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
/// Default feature list file name
pub const DEFAULT_COLUMNS_FILE: &str = "columns.json";

/// Locations of the three artifact files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Regression model
    pub model: PathBuf,
    /// Feature scaler
    pub scaler: PathBuf,
    /// Ordered feature names
    pub columns: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_FILE),
            scaler: dir.join(DEFAULT_SCALER_FILE),
            columns: dir.join(DEFAULT_COLUMNS_FILE),
        }
    }
}

/// Loaded, mutually consistent artifacts
#[derive(Debug, Clone)]
pub struct Artifacts {
    schema: FeatureSchema,
    scaler: FeatureScaler,
    model: RegressionModel,
}

impl Artifacts {
    /// Assemble artifacts, checking widths against the schema
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMismatch` if the scaler or model disagree with the
    /// schema width or are structurally invalid.
    pub fn new(
        schema: FeatureSchema,
        scaler: FeatureScaler,
        model: RegressionModel,
    ) -> Result<Self> {
        scaler.validate()?;
        if let Some(width) = scaler.width() {
            if width != schema.len() {
                return Err(HuellaError::ArtifactMismatch {
                    reason: format!(
                        "scaler was fitted on {width} columns but schema has {}",
                        schema.len()
                    ),
                });
            }
        }
        model.validate(schema.len())?;

        Ok(Self {
            schema,
            scaler,
            model,
        })
    }

    /// Read and validate all three files
    ///
    /// # Errors
    ///
    /// Returns `ArtifactIo` for unreadable files, `ArtifactFormat` for
    /// undecodable JSON, and `ArtifactMismatch` for inconsistent artifacts.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let columns: Vec<String> = read_json(&paths.columns)?;
        let schema = FeatureSchema::new(columns).map_err(|e| HuellaError::ArtifactFormat {
            path: paths.columns.display().to_string(),
            reason: e.to_string(),
        })?;
        let scaler: FeatureScaler = read_json(&paths.scaler)?;
        let model: RegressionModel = read_json(&paths.model)?;

        let artifacts = Self::new(schema, scaler, model)?;
        info!(
            features = artifacts.schema.len(),
            model = artifacts.model.kind(),
            scaled = artifacts.scaler.width().is_some(),
            "artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Feature schema
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature scaler
    #[must_use]
    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    /// Regression model
    #[must_use]
    pub fn model(&self) -> &RegressionModel {
        &self.model
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| HuellaError::ArtifactIo {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| HuellaError::ArtifactFormat {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
