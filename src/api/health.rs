//! Health and readiness probes.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::context::AppContext;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/v1/health
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        environment: ctx.config.service.environment.clone(),
        timestamp: Utc::now(),
    })
}

/// GET /api/v1/readiness
///
/// All components are in-process and constructed before the listener
/// binds, so readiness always reports ready once the server is up.
pub async fn readiness() -> Json<Value> {
    Json(json!({
        "ready": true,
        "service": SERVICE_NAME,
        "timestamp": Utc::now(),
        "components": {
            "api": "ready",
            "scoring_engine": "ready",
            "history_store": "ready",
            "metrics_aggregator": "ready",
        }
    }))
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "status": "running",
        "health": "/api/v1/health",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::AppContext;

    #[tokio::test]
    async fn test_health_reports_environment() {
        let mut config = Config::from_env().expect("Failed to load config");
        config.service.environment = "staging".to_string();
        let ctx = Arc::new(AppContext::new(config));

        let response = health(State(ctx)).await;

        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.service, SERVICE_NAME);
        assert_eq!(response.0.environment, "staging");
    }

    #[tokio::test]
    async fn test_readiness_components() {
        let response = readiness().await;

        assert_eq!(response.0["ready"], true);
        assert_eq!(response.0["components"]["scoring_engine"], "ready");
        assert_eq!(response.0["components"]["history_store"], "ready");
        assert_eq!(response.0["components"]["metrics_aggregator"], "ready");
    }

    #[tokio::test]
    async fn test_root_links_health() {
        let response = root().await;

        assert_eq!(response.0["status"], "running");
        assert_eq!(response.0["health"], "/api/v1/health");
    }
}
