//! 🧾 Transaction scoring endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::api::error::ApiError;
use crate::api::middleware::RequestId;
use crate::api::types::{ScoreRequest, ScoreResponse};
use crate::context::AppContext;
use crate::history::HistoryEntry;
use crate::metrics::{self, ScoringTimer};

/// POST /api/v1/transaction/score
///
/// Validates the payload, scores it, then feeds the result to the
/// history store and the metrics aggregator. A rejected payload touches
/// neither.
pub async fn score_transaction(
    State(ctx): State<Arc<AppContext>>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let start = Instant::now();

    info!(
        "🧾 Scoring request: user {} amount {:.2} {} at merchant {}",
        payload.user_id,
        payload.amount,
        payload.currency.to_uppercase(),
        payload.merchant_id
    );

    let transaction = match payload.validate(chrono::Utc::now()) {
        Ok(transaction) => transaction,
        Err(errors) => {
            metrics::record_validation_reject();
            warn!("❌ Rejected scoring request: {}", errors.join("; "));
            return Err(ApiError::validation(errors, &request_id.0));
        }
    };

    let timer = ScoringTimer::start();
    let result = ctx.scorer.score(&transaction, &request_id.0);
    timer.observe();

    ctx.history
        .record(HistoryEntry::from_scored(&transaction, &result));
    ctx.analytics.record(&transaction, &result);
    metrics::record_scored(result.decision);
    metrics::update_history_size(ctx.history.count());

    let processing_time_ms = round2(start.elapsed().as_secs_f64() * 1000.0);

    info!(
        "✅ Scored {}: {:.2} → {} ({:.2}ms)",
        result.transaction_id, result.score, result.decision, processing_time_ms
    );

    Ok(Json(ScoreResponse {
        transaction_id: result.transaction_id,
        score: result.score,
        decision: result.decision,
        explanation: result.explanation,
        timestamp: result.timestamp,
        processing_time_ms,
    }))
}

/// GET /api/v1/transaction/:transaction_id
///
/// Placeholder until per-transaction lookup lands. Scored transactions
/// are only reachable through the history endpoint for now.
pub async fn get_transaction(Path(transaction_id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "message": "Transaction lookup not yet implemented",
            "transaction_id": transaction_id,
            "status": "not_implemented",
        })),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Decision;

    fn test_context() -> Arc<AppContext> {
        let config = Config::from_env().expect("Failed to load config");
        Arc::new(AppContext::new(config))
    }

    fn request_id() -> Extension<RequestId> {
        Extension(RequestId("test-req".to_string()))
    }

    fn payload(value: serde_json::Value) -> Json<ScoreRequest> {
        Json(serde_json::from_value(value).expect("payload"))
    }

    #[tokio::test]
    async fn test_score_updates_history_and_analytics() {
        let ctx = test_context();

        // user_id 100 has zero jitter, amount 50 is below every tier
        let response = score_transaction(
            State(ctx.clone()),
            request_id(),
            payload(json!({"user_id": 100, "amount": 50.0, "merchant_id": "MERCHANT_001"})),
        )
        .await
        .expect("scored");

        assert!(response.0.transaction_id.starts_with("txn_"));
        assert_eq!(response.0.score, 0.0);
        assert_eq!(response.0.decision, Decision::Allow);
        assert!(response.0.processing_time_ms >= 0.0);

        assert_eq!(ctx.history.count(), 1);
        assert_eq!(ctx.analytics.snapshot().total_transactions, 1);
        assert_eq!(ctx.analytics.snapshot().allowed_count, 1);
    }

    #[tokio::test]
    async fn test_score_decline_path() {
        let ctx = test_context();

        let response = score_transaction(
            State(ctx.clone()),
            request_id(),
            payload(json!({
                "user_id": 67,
                "amount": 1500.0,
                "merchant_id": "MERCHANT_001",
                "merchant_category": "crypto"
            })),
        )
        .await
        .expect("scored");

        assert_eq!(response.0.score, 0.90);
        assert_eq!(response.0.decision, Decision::Decline);
        assert_eq!(
            response.0.explanation.top_features[0].feature_name,
            "transaction_amount"
        );
        assert_eq!(response.0.explanation.threshold, 0.70);

        assert_eq!(ctx.analytics.snapshot().declined_count, 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_touches_nothing() {
        let ctx = test_context();

        let err = score_transaction(
            State(ctx.clone()),
            request_id(),
            payload(json!({"user_id": 0, "amount": -5.0, "merchant_id": "MERCHANT_001"})),
        )
        .await
        .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(ctx.history.count(), 0);
        assert_eq!(ctx.analytics.snapshot().total_transactions, 0);
    }

    #[tokio::test]
    async fn test_lookup_not_implemented() {
        let response = get_transaction(Path("txn_123".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_identical_payloads_score_identically() {
        let ctx = test_context();
        let body = json!({
            "user_id": 42,
            "amount": 250.0,
            "merchant_id": "MERCHANT_001",
            "merchant_category": "travel"
        });

        let first = score_transaction(State(ctx.clone()), request_id(), payload(body.clone()))
            .await
            .expect("scored");
        let second = score_transaction(State(ctx.clone()), request_id(), payload(body))
            .await
            .expect("scored");

        assert_eq!(first.0.score, second.0.score);
        assert_eq!(first.0.transaction_id, second.0.transaction_id);
        assert_eq!(ctx.history.count(), 2);
    }
}
