//! 🌐 HTTP surface of the risk scoring service.

pub mod data;
pub mod error;
pub mod health;
pub mod middleware;
pub mod transaction;
pub mod types;

use axum::{
    http::Uri,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::context::AppContext;
use error::ApiError;
use middleware::RequestId;

/// Build the service router with all routes and middleware attached.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route(
            "/api/v1/transaction/score",
            post(transaction::score_transaction),
        )
        .route(
            "/api/v1/transaction/:transaction_id",
            get(transaction::get_transaction),
        )
        .route(
            "/api/v1/data/history",
            get(data::get_history).delete(data::clear_history),
        )
        .route("/api/v1/data/history/stats", get(data::get_history_stats))
        .route(
            "/api/v1/data/metrics",
            get(data::get_metrics_snapshot).delete(data::reset_metrics),
        )
        .route("/api/v1/health", get(health::health))
        .route("/api/v1/readiness", get(health::readiness))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::track_request))
        .with_state(ctx)
}

/// Unmatched routes get the standard error envelope.
async fn not_found(Extension(request_id): Extension<RequestId>, uri: Uri) -> ApiError {
    ApiError::not_found(uri.path(), &request_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_router_builds() {
        let config = Config::from_env().expect("Failed to load config");
        let ctx = Arc::new(AppContext::new(config));
        let _app = router(ctx);
    }
}
