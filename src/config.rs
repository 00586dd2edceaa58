//! Command-line and environment configuration
//!
//! Every flag has an environment fallback so the server can be configured
//! from a container environment without a wrapper script.

use std::{net::SocketAddr, path::PathBuf};

use clap::Args;

use crate::{
    artifacts::{ArtifactPaths, DEFAULT_COLUMNS_FILE, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE},
    error::{HuellaError, Result},
    scorer::UnitConversion,
};

/// Where to find the artifacts and how to post-process predictions
#[derive(Debug, Clone, Args)]
pub struct ArtifactArgs {
    /// Directory holding the artifact files
    #[arg(short, long, env = "HUELLA_ARTIFACTS", default_value = ".")]
    pub artifacts: PathBuf,

    /// Model file name inside the artifact directory
    #[arg(long, env = "HUELLA_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Scaler file name inside the artifact directory
    #[arg(long, env = "HUELLA_SCALER_FILE", default_value = DEFAULT_SCALER_FILE)]
    pub scaler_file: String,

    /// Feature list file name inside the artifact directory
    #[arg(long, env = "HUELLA_COLUMNS_FILE", default_value = DEFAULT_COLUMNS_FILE)]
    pub columns_file: String,

    /// Divide predictions by this value before rounding (e.g. 1000 for kg → t)
    #[arg(long, env = "HUELLA_UNIT_DIVISOR")]
    pub unit_divisor: Option<f64>,
}

impl ArtifactArgs {
    /// Resolved artifact paths
    #[must_use]
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.artifacts.join(&self.model_file),
            scaler: self.artifacts.join(&self.scaler_file),
            columns: self.artifacts.join(&self.columns_file),
        }
    }

    /// Validated unit conversion, if configured
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero or non-finite divisor.
    pub fn conversion(&self) -> Result<Option<UnitConversion>> {
        self.unit_divisor.map(UnitConversion::new).transpose()
    }
}

/// `serve` options
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "HUELLA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, env = "HUELLA_PORT", default_value = "5000")]
    pub port: u16,

    /// Unit shown next to the result on the form page (e.g. "kg CO2e/year")
    #[arg(long, env = "HUELLA_UNIT_LABEL")]
    pub unit_label: Option<String>,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub artifacts: ArtifactArgs,
}

impl ServeArgs {
    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if host and port don't form a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| HuellaError::InvalidConfiguration(format!("Invalid address: {e}")))
    }
}
