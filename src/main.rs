//! FraudGuard API Server
//!
//! Fraud-scoring service for transaction traffic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    FRAUDGUARD SERVER                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │  │  API      │   │ Scoring      │   │  Stats Aggregator   │  │
//! │  │  (Axum)   │──▶│ (encoder +   │   │  (CSV dataset)      │  │
//! │  │           │   │  rules +     │   │                     │  │
//! │  └───────────┘   │  artifact)   │   └─────────────────────┘  │
//! │                  └──────┬───────┘                            │
//! │                         ▼                                    │
//! │                 ┌──────────────┐                             │
//! │                 │ Model context│  (loaded once, read-only)   │
//! │                 └──────────────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod encoder;
mod error;
mod handlers;
mod model;
mod rules;
mod schema;
mod scoring;
mod stats;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraudguard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!(
        environment = %config.environment,
        production = config.is_production(),
        "FraudGuard server starting..."
    );
    tracing::info!(
        variant = %config.schema_variant,
        models_dir = %config.models_dir,
        "Active schema"
    );

    // Load the model artifact once; it is read-only for the process lifetime.
    let ctx = scoring::ModelContext::load(&config);
    if !ctx.models_loaded() {
        tracing::warn!("Serving without a model artifact ({:?} mode)", config.scoring_mode);
    }

    let state = AppState {
        ctx: Arc::new(ctx),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<scoring::ModelContext>,
    pub config: config::Config,
}

/// Create the main router with all routes.
///
/// Both path spellings are registered because deployed clients disagree on
/// whether the API lives under `/api`.
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/api/predict", post(handlers::predict::predict))
        .route("/stats", get(handlers::stats::get))
        .route("/api/stats", get(handlers::stats::get))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ScoringMode};
    use crate::schema::SchemaVariant;
    use crate::scoring::ModelContext;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app(mode: ScoringMode) -> Router {
        let ctx = ModelContext::new(SchemaVariant::V2, mode, None).unwrap();
        let config = Config {
            dataset_path: "/nonexistent/dataset.csv".to_string(),
            scoring_mode: mode,
            ..Config::default()
        };
        create_router(AppState {
            ctx: Arc::new(ctx),
            config,
        })
    }

    fn predict_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "amount": 4500.0,
            "hour": 14,
            "day_of_week": 2,
            "category": "groceries",
            "age": 34,
            "gender": "F",
            "country": "Mumbai",
            "device": "mobile",
            "payment_method": "upi",
            "item_quantity": 2,
            "shipping_address": "Same as billing",
            "browser_info": "Chrome"
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_model_state() {
        let app = test_app(ScoringMode::Fallback);
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["models_loaded"], false);
    }

    #[tokio::test]
    async fn predict_scores_a_valid_transaction() {
        let app = test_app(ScoringMode::Fallback);
        let response = app.oneshot(predict_request(valid_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["risk_level"], "Low");
        assert_eq!(body["risk_factors"], json!([]));
        assert!(body["transaction_id"].as_str().unwrap().starts_with("TXN"));
        assert!(body["fraud_probability"].as_f64().unwrap() < 30.0);
    }

    #[tokio::test]
    async fn predict_without_required_field_is_400() {
        let app = test_app(ScoringMode::Fallback);
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("payment_method");
        let response = app.oneshot(predict_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing field: payment_method");
    }

    #[tokio::test]
    async fn strict_mode_without_artifact_is_500() {
        let app = test_app(ScoringMode::Strict);
        let response = app.oneshot(predict_request(valid_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Model not loaded");
    }

    #[tokio::test]
    async fn stats_with_missing_dataset_is_200_fallback() {
        let app = test_app(ScoringMode::Fallback);
        let response = app
            .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalTransactions"], 0);
        assert_eq!(body["recentTransactions"], json!([]));
    }

    #[tokio::test]
    async fn unprefixed_predict_route_also_works() {
        let app = test_app(ScoringMode::Fallback);
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(valid_body().to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
