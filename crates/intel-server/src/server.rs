use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use intel_core::Ruleset;
use intel_telemetry::MetricsRecorder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 9092,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<Ruleset>,
    pub metrics: Option<Arc<MetricsRecorder>>,
}

impl AppState {
    pub fn new(rules: Ruleset) -> Self {
        Self {
            rules: Arc::new(rules),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<MetricsRecorder>>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Count one request outcome and log rejected bodies.
    pub(crate) fn record<T>(&self, endpoint: &str, result: &Result<T, ApiError>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => {
                match e {
                    ApiError::Validation(details) => {
                        tracing::warn!(endpoint, ?details, "request rejected")
                    }
                    ApiError::Internal(message) => {
                        tracing::error!(endpoint, error = %message, "request failed")
                    }
                }
                e.error_kind()
            }
        };
        if let Some(metrics) = &self.metrics {
            metrics.counter_inc(
                "model_intel_requests_total",
                &[("endpoint", endpoint), ("outcome", outcome)],
                1,
            );
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/api/model-intel/normalize-openrouter",
            post(handlers::normalize_openrouter),
        )
        .route("/api/model-intel/capabilities", post(handlers::capabilities))
        .route(
            "/api/model-intel/benchmarks/parse-match",
            post(handlers::benchmarks_parse_match),
        )
        .route("/api/model-intel/rules", get(rules_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve in a background task. Returns a handle to the task.
pub async fn start(config: ServerConfig, state: AppState) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(state, &config);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "model-intel server started");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "server exited");
        }
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        server: server_handle,
    })
}

/// Handle returned by `start()` — keeps the server task alive.
pub struct ServerHandle {
    pub port: u16,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub fn abort(&self) {
        self.server.abort();
    }
}

/// Health check HTTP endpoint.
async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.as_ref().map(|m| m.snapshot()).unwrap_or_default();
    Json(snapshot)
}

/// The active lookup tables.
async fn rules_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.rules.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_starts_and_serves_health() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0, // Random port
            ..Default::default()
        };

        let handle = start(config, AppState::new(Ruleset::default())).await.unwrap();
        assert!(handle.port > 0);

        let url = format!("http://127.0.0.1:{}/health", handle.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
        handle.abort();
    }

    #[tokio::test]
    async fn rules_endpoint_reports_active_tables() {
        let rules = Ruleset::from_json(r#"{"providers": [{"slug": "acme", "display_name": "ACME"}]}"#).unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let handle = start(config, AppState::new(rules)).await.unwrap();

        let url = format!("http://127.0.0.1:{}/api/model-intel/rules", handle.port);
        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["providers"][0]["display_name"], "ACME");
        assert_eq!(body["matcher"]["creator_boost"], 1.2);
        handle.abort();
    }

    #[tokio::test]
    async fn metrics_endpoint_is_empty_when_disabled() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let handle = start(config, AppState::new(Ruleset::default())).await.unwrap();

        let url = format!("http://127.0.0.1:{}/metrics", handle.port);
        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body, serde_json::json!([]));
        handle.abort();
    }

    #[test]
    fn record_counts_outcomes() {
        let metrics = Arc::new(MetricsRecorder::new());
        let state = AppState::new(Ruleset::default()).with_metrics(Some(Arc::clone(&metrics)));

        state.record::<()>("capabilities", &Ok(()));
        state.record::<()>("capabilities", &Err(ApiError::Validation(vec!["x".into()])));
        state.record::<()>("capabilities", &Err(ApiError::Validation(vec!["y".into()])));

        let ok = metrics.counter_get(
            "model_intel_requests_total",
            &[("endpoint", "capabilities"), ("outcome", "ok")],
        );
        let invalid = metrics.counter_get(
            "model_intel_requests_total",
            &[("endpoint", "capabilities"), ("outcome", "invalid")],
        );
        assert_eq!((ok, invalid), (1, 2));
    }

    #[test]
    fn build_router_creates_routes() {
        let _router = build_router(AppState::new(Ruleset::default()), &ServerConfig::default());
        // If this doesn't panic, the router was built successfully
    }
}
