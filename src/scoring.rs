//! Scoring service.
//!
//! `ModelContext` is built once at startup and shared read-only across
//! requests. It owns the active schema variant, the loaded artifact with its
//! resolved column order, and the configured behavior for a missing artifact.

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{Config, ScoringMode};
use crate::encoder;
use crate::error::{AppError, AppResult};
use crate::model::{artifact_path, fallback, ModelArtifact};
use crate::rules;
use crate::schema::{ColumnSpec, SchemaVariant};
use crate::types::{RiskLevel, ScoringOutcome, TransactionRecord};

struct LoadedModel {
    artifact: ModelArtifact,
    /// Artifact feature columns resolved against the active schema.
    columns: Vec<ColumnSpec>,
}

pub struct ModelContext {
    variant: SchemaVariant,
    mode: ScoringMode,
    model: Option<LoadedModel>,
}

impl ModelContext {
    /// Build a context from an already-loaded artifact. Fails if the
    /// artifact's persisted column order does not resolve against the schema.
    pub fn new(
        variant: SchemaVariant,
        mode: ScoringMode,
        artifact: Option<ModelArtifact>,
    ) -> Result<Self> {
        let model = artifact
            .map(|artifact| {
                let columns = artifact.resolve_columns(variant.schema())?;
                Ok::<_, anyhow::Error>(LoadedModel { artifact, columns })
            })
            .transpose()?;
        Ok(Self {
            variant,
            mode,
            model,
        })
    }

    /// Load the artifact for the configured variant from disk.
    ///
    /// A missing or inconsistent artifact does not abort startup: the context
    /// comes up without a model and requests answer per the scoring mode.
    pub fn load(config: &Config) -> Self {
        let path = artifact_path(&config.models_dir, config.schema_variant);
        let artifact = match ModelArtifact::load(&path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    columns = artifact.feature_columns.len(),
                    "Model artifact loaded"
                );
                Some(artifact)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "No usable model artifact");
                None
            }
        };

        match Self::new(config.schema_variant, config.scoring_mode, artifact) {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!(error = %err, "Model artifact rejected, serving without it");
                Self {
                    variant: config.schema_variant,
                    mode: config.scoring_mode,
                    model: None,
                }
            }
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn models_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Score one validated record: risk rules, model probability (or
    /// fallback), tier, assembled outcome.
    pub fn score(&self, record: &TransactionRecord) -> AppResult<ScoringOutcome> {
        let risk_factors = rules::evaluate(record, self.variant);

        let (is_fraud, probability, secondary_probability) = match &self.model {
            Some(model) => {
                let features = encoder::encode(record, &model.columns)?;
                let pred = model
                    .artifact
                    .predict(&features)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                (pred.is_fraud, pred.probability, pred.secondary_probability)
            }
            None => match self.mode {
                ScoringMode::Strict => return Err(AppError::ModelUnavailable),
                ScoringMode::Fallback => {
                    let pred = fallback::score(risk_factors.len());
                    (pred.is_fraud, pred.probability, pred.probability)
                }
            },
        };

        Ok(ScoringOutcome {
            is_fraud,
            probability,
            secondary_probability,
            risk_level: RiskLevel::from_probability(probability),
            risk_factors,
        })
    }
}
