//! 📜 History and analytics endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use log::info;
use std::sync::Arc;

use crate::analytics::MetricsSnapshot;
use crate::api::error::ApiError;
use crate::api::middleware::RequestId;
use crate::api::types::{HistoryQuery, HistoryResponse, HistoryStatsResponse};
use crate::context::AppContext;
use crate::metrics;
use crate::types::Decision;

/// GET /api/v1/data/history
pub async fn get_history(
    State(ctx): State<Arc<AppContext>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let mut errors = Vec::new();

    let mut limit = ctx.config.history.default_return_limit;
    if let Some(value) = query.limit {
        if (1..=100).contains(&value) {
            limit = value as usize;
        } else {
            errors.push("limit: must be between 1 and 100".to_string());
        }
    }

    let mut filter = None;
    if let Some(raw) = &query.decision {
        match Decision::parse(raw) {
            Some(decision) => filter = Some(decision),
            None => errors.push("decision: must be one of ALLOW, FLAG, DECLINE".to_string()),
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::validation(errors, &request_id.0));
    }

    let transactions = ctx.history.list(limit, filter);
    Ok(Json(HistoryResponse {
        total_count: ctx.history.count(),
        returned_count: transactions.len(),
        transactions,
    }))
}

/// GET /api/v1/data/history/stats
pub async fn get_history_stats(State(ctx): State<Arc<AppContext>>) -> Json<HistoryStatsResponse> {
    let by_decision = ctx.history.decision_counts();
    Json(HistoryStatsResponse {
        total: by_decision.total(),
        by_decision,
    })
}

/// DELETE /api/v1/data/history
pub async fn clear_history(State(ctx): State<Arc<AppContext>>) -> StatusCode {
    let removed = ctx.history.count();
    ctx.history.clear();
    metrics::update_history_size(0);
    info!("🧹 History cleared ({} entries dropped)", removed);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/data/metrics
pub async fn get_metrics_snapshot(State(ctx): State<Arc<AppContext>>) -> Json<MetricsSnapshot> {
    Json(ctx.analytics.snapshot())
}

/// DELETE /api/v1/data/metrics
pub async fn reset_metrics(State(ctx): State<Arc<AppContext>>) -> StatusCode {
    ctx.analytics.reset();
    info!("🧹 Analytics counters reset");
    StatusCode::NO_CONTENT
}
