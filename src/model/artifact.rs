//! Fitted model artifacts.
//!
//! Training runs offline and exports a JSON artifact per schema variant:
//! the feature column order it was fitted against, the standard-scaler
//! parameters, and a logistic head per model (stacked ensemble + gradient
//! boosted). Serving only ever consumes this export; the column list in the
//! artifact is authoritative and is validated against the active schema at
//! load time, never recomputed.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::schema::{ColumnSpec, FeatureSchema};

/// Standard-scaler parameters fitted at training time.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                if *scale == 0.0 {
                    0.0
                } else {
                    (x - mean) / scale
                }
            })
            .collect()
    }
}

/// One exported logistic head: weights over the scaled feature vector.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearHead {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearHead {
    fn predict_proba(&self, scaled: &[f64]) -> f64 {
        let logit: f64 = self
            .weights
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(logit)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelHeads {
    pub stacked: LinearHead,
    pub xgb: Option<LinearHead>,
}

/// On-disk artifact layout (`models/model_<variant>.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Schema variant tag the artifact was trained for.
    pub schema: String,
    /// Feature order the scaler and heads were fitted against.
    pub feature_columns: Vec<String>,
    pub scaler: Scaler,
    pub heads: ModelHeads,
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,
}

fn default_decision_threshold() -> f64 {
    0.5
}

/// Probabilities from both heads plus the thresholded label.
#[derive(Debug, Clone, Copy)]
pub struct ModelPrediction {
    pub probability: f64,
    pub secondary_probability: f64,
    pub is_fraud: bool,
}

impl ModelArtifact {
    /// Load and structurally validate an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading model artifact {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model artifact {}", path.display()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        let n = self.feature_columns.len();
        if n == 0 {
            bail!("artifact has no feature columns");
        }
        if self.scaler.mean.len() != n || self.scaler.scale.len() != n {
            bail!(
                "scaler shape {}x{} does not match {} feature columns",
                self.scaler.mean.len(),
                self.scaler.scale.len(),
                n
            );
        }
        if self.heads.stacked.weights.len() != n {
            bail!("stacked head has {} weights for {} columns", self.heads.stacked.weights.len(), n);
        }
        if let Some(xgb) = &self.heads.xgb {
            if xgb.weights.len() != n {
                bail!("xgb head has {} weights for {} columns", xgb.weights.len(), n);
            }
        }
        Ok(())
    }

    /// Resolve the persisted column order against the active schema.
    ///
    /// Any unresolved name means the artifact was trained for a different
    /// schema; the caller must treat the artifact as unusable rather than
    /// guess an order.
    pub fn resolve_columns(&self, schema: &FeatureSchema) -> Result<Vec<ColumnSpec>> {
        self.feature_columns
            .iter()
            .map(|name| {
                schema.resolve_column(name).with_context(|| {
                    format!(
                        "artifact column {name:?} does not exist in schema {}",
                        schema.variant
                    )
                })
            })
            .collect()
    }

    /// Score an encoded feature vector. The vector must already be in the
    /// artifact's column order (see [`resolve_columns`](Self::resolve_columns)).
    pub fn predict(&self, features: &[f64]) -> Result<ModelPrediction> {
        if features.len() != self.feature_columns.len() {
            bail!(
                "feature vector length {} does not match artifact ({})",
                features.len(),
                self.feature_columns.len()
            );
        }
        let scaled = self.scaler.transform(features);
        let probability = self.heads.stacked.predict_proba(&scaled);
        let secondary_probability = self
            .heads
            .xgb
            .as_ref()
            .map(|head| head.predict_proba(&scaled))
            .unwrap_or(probability);
        Ok(ModelPrediction {
            probability,
            secondary_probability,
            is_fraud: probability >= self.decision_threshold,
        })
    }
}

/// Locate the artifact file for a schema variant inside the models directory.
pub fn artifact_path(models_dir: &str, variant: crate::schema::SchemaVariant) -> std::path::PathBuf {
    Path::new(models_dir).join(format!("model_{variant}.json"))
}
