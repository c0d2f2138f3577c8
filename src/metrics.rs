//! 📊 Prometheus metrics for the risk scoring service.
//!
//! Exposed on GET /metrics via the main router. Counters and histograms
//! are process-global; handlers record through the helper functions
//! below rather than touching the registry directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, info};
use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

use crate::types::Decision;

/// Global metrics registry
static METRICS: once_cell::sync::Lazy<Arc<RiskMetrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(RiskMetrics::new()));

/// Risk service metrics
pub struct RiskMetrics {
    // Registry for Prometheus
    registry: Registry,

    // Scoring counters
    pub transactions_scored: IntCounter,
    pub decisions_allow: IntCounter,
    pub decisions_flag: IntCounter,
    pub decisions_decline: IntCounter,
    pub validation_rejects: IntCounter,

    // Performance metrics
    pub scoring_latency: Histogram,
    pub request_latency: Histogram,

    // System metrics
    pub history_size: IntGauge,
}

impl RiskMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        // Scoring counters
        let transactions_scored = IntCounter::with_opts(Opts::new(
            "risk_transactions_scored_total",
            "Total number of transactions scored",
        ))
        .unwrap();
        registry.register(Box::new(transactions_scored.clone())).unwrap();

        let decisions_allow = IntCounter::with_opts(Opts::new(
            "risk_decisions_allow_total",
            "Transactions allowed",
        ))
        .unwrap();
        registry.register(Box::new(decisions_allow.clone())).unwrap();

        let decisions_flag = IntCounter::with_opts(Opts::new(
            "risk_decisions_flag_total",
            "Transactions flagged for review",
        ))
        .unwrap();
        registry.register(Box::new(decisions_flag.clone())).unwrap();

        let decisions_decline = IntCounter::with_opts(Opts::new(
            "risk_decisions_decline_total",
            "Transactions declined",
        ))
        .unwrap();
        registry.register(Box::new(decisions_decline.clone())).unwrap();

        let validation_rejects = IntCounter::with_opts(Opts::new(
            "risk_validation_rejects_total",
            "Requests rejected by payload validation",
        ))
        .unwrap();
        registry.register(Box::new(validation_rejects.clone())).unwrap();

        // Performance histograms
        let scoring_latency = Histogram::with_opts(
            HistogramOpts::new(
                "risk_scoring_latency_seconds",
                "Score computation latency",
            )
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01]),
        )
        .unwrap();
        registry.register(Box::new(scoring_latency.clone())).unwrap();

        let request_latency = Histogram::with_opts(
            HistogramOpts::new(
                "risk_request_latency_seconds",
                "End-to-end HTTP request latency",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        )
        .unwrap();
        registry.register(Box::new(request_latency.clone())).unwrap();

        // System gauges
        let history_size = IntGauge::with_opts(Opts::new(
            "risk_history_size",
            "Number of entries currently retained in history",
        ))
        .unwrap();
        registry.register(Box::new(history_size.clone())).unwrap();

        Self {
            registry,
            transactions_scored,
            decisions_allow,
            decisions_flag,
            decisions_decline,
            validation_rejects,
            scoring_latency,
            request_latency,
            history_size,
        }
    }

    /// Get the metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Get global metrics instance
pub fn metrics() -> Arc<RiskMetrics> {
    METRICS.clone()
}

/// Initialize metrics (called at startup)
pub fn init_metrics() {
    // Force initialization of lazy static
    let _ = METRICS.clone();
    info!("📊 Metrics system initialized");
}

/// Prometheus exposition endpoint handler
pub async fn metrics_handler() -> Response {
    let metrics = METRICS.clone();
    let encoder = prometheus::TextEncoder::new();

    match encoder.encode_to_string(&metrics.registry().gather()) {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Helper Functions for Recording Metrics
// ============================================================================

/// Record a completed scoring request and its decision
pub fn record_scored(decision: Decision) {
    let m = metrics();
    m.transactions_scored.inc();
    match decision {
        Decision::Allow => m.decisions_allow.inc(),
        Decision::Flag => m.decisions_flag.inc(),
        Decision::Decline => m.decisions_decline.inc(),
    }
}

/// Record a payload rejected by validation
pub fn record_validation_reject() {
    metrics().validation_rejects.inc();
}

/// Update the history size gauge
pub fn update_history_size(len: usize) {
    metrics().history_size.set(len as i64);
}

/// Record end-to-end request latency
pub fn observe_request_latency(seconds: f64) {
    metrics().request_latency.observe(seconds);
}

/// Timer for measuring score computation latency
pub struct ScoringTimer {
    start: std::time::Instant,
}

impl ScoringTimer {
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    pub fn observe(self) {
        let duration = self.start.elapsed().as_secs_f64();
        metrics().scoring_latency.observe(duration);
    }
}
