//! Prediction service state machine
//!
//! `Uninitialized` or `Ready`, decided once at startup. There is no
//! transition back: a failed load stays failed until the process restarts,
//! and a ready service stays ready whatever individual requests do.

use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    artifacts::{ArtifactPaths, Artifacts},
    error::{HuellaError, Result},
    reconcile::{FormInput, ReconcileRules},
    scorer::{Prediction, Scorer, UnitConversion},
};

/// Reconciler and scorer over loaded artifacts
#[derive(Debug, Clone)]
pub struct Predictor {
    rules: ReconcileRules,
    scorer: Scorer,
}

impl Predictor {
    /// Combine reconciliation rules with a scorer
    #[must_use]
    pub fn new(rules: ReconcileRules, scorer: Scorer) -> Self {
        Self { rules, scorer }
    }

    /// Scorer
    #[must_use]
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Reconcile a form and score it
    ///
    /// # Errors
    ///
    /// Only pipeline errors from [`Scorer::score`]; field-level issues are
    /// absorbed during reconciliation.
    pub fn predict(&self, form: &FormInput) -> Result<Prediction> {
        let vector = self.rules.reconcile(form, self.scorer.artifacts().schema());
        self.scorer.score(&vector)
    }
}

/// Process-wide prediction state
#[derive(Debug, Clone)]
pub enum ServiceState {
    /// Artifacts missing or invalid; every prediction fails fast
    Uninitialized {
        /// Load failure message
        reason: String,
    },
    /// Artifacts loaded; serving predictions
    Ready(Arc<Predictor>),
}

impl ServiceState {
    /// Load artifacts and enter `Ready`, or `Uninitialized` on failure
    ///
    /// Never fails: a load error is logged and becomes the unavailable reason.
    /// Rule drift against the loaded schema is logged as warnings.
    #[must_use]
    pub fn load(
        paths: &ArtifactPaths,
        rules: ReconcileRules,
        conversion: Option<UnitConversion>,
    ) -> Self {
        match Artifacts::load(paths) {
            Ok(artifacts) => Self::ready(artifacts, rules, conversion),
            Err(e) => {
                error!(error = %e, "artifact load failed; predictions disabled");
                Self::Uninitialized {
                    reason: e.to_string(),
                }
            },
        }
    }

    /// `Ready` state over already loaded artifacts
    #[must_use]
    pub fn ready(
        artifacts: Artifacts,
        rules: ReconcileRules,
        conversion: Option<UnitConversion>,
    ) -> Self {
        for warning in rules.validate(artifacts.schema()) {
            warn!(%warning, "reconciliation rule does not match schema");
        }
        let scorer = Scorer::new(Arc::new(artifacts), conversion);
        Self::Ready(Arc::new(Predictor::new(rules, scorer)))
    }

    /// Whether predictions are being served
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Schema width, 0 when not ready
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self {
            Self::Ready(p) => p.scorer().artifacts().schema().len(),
            Self::Uninitialized { .. } => 0,
        }
    }

    /// Run one prediction
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` immediately when uninitialized, otherwise any
    /// pipeline error from the predictor.
    pub fn predict(&self, form: &FormInput) -> Result<Prediction> {
        match self {
            Self::Ready(predictor) => predictor.predict(form),
            Self::Uninitialized { reason } => Err(HuellaError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }
}
