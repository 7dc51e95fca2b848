//! Scoring result types.

use serde::Serialize;

/// Coarse risk tier derived from the fraud probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tier thresholds: High above 0.7, Medium above 0.3, Low otherwise.
    /// Both boundaries belong to the lower tier.
    pub fn from_probability(p: f64) -> Self {
        if p > 0.7 {
            RiskLevel::High
        } else if p > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Everything the scoring pipeline produces for one transaction, before the
/// handler stamps on a transaction id and timestamp.
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub is_fraud: bool,
    /// Primary (stacked ensemble) fraud probability, 0..1.
    pub probability: f64,
    /// Secondary (gradient-boosted) probability, 0..1. Equal to `probability`
    /// when only one head is available.
    pub secondary_probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

/// Wire format of `POST /api/predict`, matching the dashboard client.
/// Probabilities are percentages rounded to two decimals.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub is_fraud: bool,
    pub fraud_probability: f64,
    pub xgb_probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub transaction_id: String,
    pub timestamp: String,
}

/// Round a 0..1 probability to a two-decimal percentage.
pub fn as_percent(p: f64) -> f64 {
    (p * 10_000.0).round() / 100.0
}
