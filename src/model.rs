//! Regression models
//!
//! The trained model ships as `model.json`. Two families are supported:
//!
//! - `linear`: `y = coefficients · x + intercept` (ordinary least squares,
//!   ridge and lasso all export to this form)
//! - `tree_ensemble`: regression trees combined by mean (random forest) or
//!   by `base_score + learning_rate * Σ tree(x)` (gradient boosting)
//!
//! Tree traversal follows the usual convention: go left when
//! `x[feature] <= threshold`.

use serde::{Deserialize, Serialize};

use crate::error::{HuellaError, Result};

/// Node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Terminal node
    Leaf {
        /// Predicted value
        value: f64,
    },
    /// Internal split
    Split {
        /// Feature index tested at this node
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Subtree for `x[feature] <= threshold`
        left: Box<TreeNode>,
        /// Subtree for `x[feature] > threshold`
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Evaluate the tree for one row
    ///
    /// Feature indices are checked against the width at load time.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if x[*feature] <= *threshold {
                        node = left;
                    } else {
                        node = right;
                    }
                },
            }
        }
    }

    /// Largest feature index referenced anywhere in the tree
    #[must_use]
    pub fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }

    /// Depth of the tree (a lone leaf has depth 0)
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (bagging / random forest)
    Mean,
    /// `base_score + learning_rate * Σ` (boosting)
    Sum,
}

fn default_learning_rate() -> f64 {
    1.0
}

/// Trained regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    /// Linear model
    Linear {
        /// One coefficient per feature
        coefficients: Vec<f64>,
        /// Bias term
        #[serde(default)]
        intercept: f64,
    },
    /// Ensemble of regression trees
    TreeEnsemble {
        /// Combination rule
        aggregation: Aggregation,
        /// Initial prediction for boosting
        #[serde(default)]
        base_score: f64,
        /// Shrinkage applied to each tree for boosting
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        /// Trees
        trees: Vec<TreeNode>,
    },
}

impl RegressionModel {
    /// Model family name, for logs and `/health`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    /// Structural check against the schema width, run at load time
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMismatch` if coefficients don't match `width`, a tree
    /// references a feature outside `width`, the ensemble is empty, or any
    /// parameter is non-finite.
    pub fn validate(&self, width: usize) -> Result<()> {
        match self {
            Self::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != width {
                    return Err(HuellaError::ArtifactMismatch {
                        reason: format!(
                            "model has {} coefficients but schema has {width} columns",
                            coefficients.len()
                        ),
                    });
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(HuellaError::ArtifactMismatch {
                        reason: "model parameters contain NaN or infinity".to_string(),
                    });
                }
            },
            Self::TreeEnsemble {
                trees,
                base_score,
                learning_rate,
                ..
            } => {
                if trees.is_empty() {
                    return Err(HuellaError::ArtifactMismatch {
                        reason: "tree ensemble has no trees".to_string(),
                    });
                }
                if !base_score.is_finite() || !learning_rate.is_finite() {
                    return Err(HuellaError::ArtifactMismatch {
                        reason: "model parameters contain NaN or infinity".to_string(),
                    });
                }
                if let Some(max) = trees.iter().filter_map(TreeNode::max_feature).max() {
                    if max >= width {
                        return Err(HuellaError::ArtifactMismatch {
                            reason: format!(
                                "tree splits on feature {max} but schema has {width} columns"
                            ),
                        });
                    }
                }
            },
        }
        Ok(())
    }

    /// Predict for one scaled feature row
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if a linear model receives the wrong width.
    /// Tree models only require the row to cover every split feature.
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        match self {
            Self::Linear {
                coefficients,
                intercept,
            } => {
                if x.len() != coefficients.len() {
                    return Err(HuellaError::DimensionMismatch {
                        stage: "model",
                        expected: coefficients.len(),
                        actual: x.len(),
                    });
                }
                Ok(coefficients
                    .iter()
                    .zip(x)
                    .map(|(c, v)| c * v)
                    .sum::<f64>()
                    + intercept)
            },
            Self::TreeEnsemble {
                aggregation,
                base_score,
                learning_rate,
                trees,
            } => {
                let needed = trees
                    .iter()
                    .filter_map(TreeNode::max_feature)
                    .max()
                    .map_or(0, |m| m + 1);
                if x.len() < needed {
                    return Err(HuellaError::DimensionMismatch {
                        stage: "model",
                        expected: needed,
                        actual: x.len(),
                    });
                }
                let total: f64 = trees.iter().map(|t| t.predict(x)).sum();
                Ok(match aggregation {
                    Aggregation::Mean => total / trees.len() as f64,
                    Aggregation::Sum => base_score + learning_rate * total,
                })
            },
        }
    }
}
