//! Configuration module

use std::env;

use crate::schema::SchemaVariant;

/// What to do when no model artifact could be loaded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Scoring requests fail with `ModelUnavailable`.
    Strict,
    /// Scoring requests are answered by the deterministic rule-based scorer.
    Fallback,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding exported model artifacts
    pub models_dir: String,

    /// CSV dataset backing the dashboard statistics
    pub dataset_path: String,

    /// Active transaction schema variant
    pub schema_variant: SchemaVariant,

    /// Behavior when the model artifact is missing
    pub scoring_mode: ScoringMode,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            models_dir: env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string()),

            dataset_path: env::var("DATASET_PATH")
                .unwrap_or_else(|_| "data/transactions.csv".to_string()),

            schema_variant: env::var("SCHEMA_VARIANT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SchemaVariant::V2),

            scoring_mode: match env::var("SCORING_MODE").as_deref() {
                Ok("fallback") => ScoringMode::Fallback,
                _ => ScoringMode::Strict,
            },

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            models_dir: "models".to_string(),
            dataset_path: "data/transactions.csv".to_string(),
            schema_variant: SchemaVariant::V2,
            scoring_mode: ScoringMode::Strict,
            environment: "development".to_string(),
        }
    }
}
