//! Dashboard statistics handler

use axum::{extract::State, Json};

use crate::stats::{dashboard_stats, DashboardStats};
use crate::AppState;

/// Aggregate dataset statistics for the dashboard. Always 200: an unreadable
/// dataset degrades to the fallback payload inside the stats module.
pub async fn get(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(dashboard_stats(&state.config.dataset_path))
}
