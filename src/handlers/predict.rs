//! Fraud prediction handler

use axum::{extract::State, Json};
use rand::Rng;
use serde_json::Value;

use crate::types::{as_percent, PredictionResponse, TransactionRecord};
use crate::{AppResult, AppState};

/// Score one transaction.
///
/// The body is validated against the active schema variant before any
/// scoring runs, so a missing field is reported by name with a 400 rather
/// than surfacing as an encoding failure.
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<PredictionResponse>> {
    let schema = state.ctx.variant().schema();
    let record = TransactionRecord::from_value(&body, schema)?;

    let outcome = state.ctx.score(&record)?;

    tracing::debug!(
        probability = outcome.probability,
        risk_level = ?outcome.risk_level,
        factors = outcome.risk_factors.len(),
        "Transaction scored"
    );

    Ok(Json(PredictionResponse {
        is_fraud: outcome.is_fraud,
        fraud_probability: as_percent(outcome.probability),
        xgb_probability: as_percent(outcome.secondary_probability),
        risk_level: outcome.risk_level,
        risk_factors: outcome.risk_factors,
        transaction_id: new_transaction_id(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

fn new_transaction_id() -> String {
    format!("TXN{}", rand::thread_rng().gen_range(1000..10000))
}
