//! 📈 Running quality metrics over every scored transaction.
//!
//! Until labeled outcomes exist, ground truth is simulated by a
//! deterministic score-band oracle. The oracle is a trait so real labels
//! can replace the simulation without touching the aggregation math.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::sync::Mutex;

use crate::scoring::ScoringResult;
use crate::types::{Decision, Transaction};

/// Flat loss assumed prevented per caught fraud, in USD
pub const DEFAULT_AVG_FRAUD_LOSS_USD: f64 = 500.0;

/// Supplies the fraud label for a scored transaction.
pub trait FraudOracle: Send + Sync {
    fn is_fraud(&self, score: f64) -> bool;
    fn loss_per_fraud_usd(&self) -> f64;
}

/// Deterministic stand-in for real labels. Each score band maps to a
/// fraud likelihood, and the label is a fixed function of the score so
/// identical scores always classify identically.
#[derive(Debug, Clone)]
pub struct ScoreBandOracle {
    avg_fraud_loss_usd: f64,
}

impl ScoreBandOracle {
    pub fn new(avg_fraud_loss_usd: f64) -> Self {
        Self { avg_fraud_loss_usd }
    }

    fn fraud_probability(score: f64) -> f64 {
        if score >= 0.85 {
            0.90
        } else if score >= 0.65 {
            0.60
        } else if score >= 0.40 {
            0.30
        } else {
            0.05
        }
    }
}

impl Default for ScoreBandOracle {
    fn default() -> Self {
        Self::new(DEFAULT_AVG_FRAUD_LOSS_USD)
    }
}

impl FraudOracle for ScoreBandOracle {
    fn is_fraud(&self, score: f64) -> bool {
        let probability = Self::fraud_probability(score);
        (score * 100.0) % 100.0 < probability * 100.0
    }

    fn loss_per_fraud_usd(&self) -> f64 {
        self.avg_fraud_loss_usd
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MetricsState {
    total: u64,
    allowed: u64,
    flagged: u64,
    declined: u64,
    true_positives: u64,
    false_positives: u64,
    true_negatives: u64,
    false_negatives: u64,
    score_sum: f64,
}

/// Point-in-time view of the aggregated counters and derived metrics.
/// Ratios are rounded to 4 decimal places, monetary figures to 2.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_transactions: u64,
    pub flagged_count: u64,
    pub allowed_count: u64,
    pub declined_count: u64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub average_score: f64,
    pub losses_prevented: f64,
    pub false_positive_rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Lock-guarded aggregate of confusion counters and score totals.
pub struct MetricsAggregator {
    state: Mutex<MetricsState>,
    oracle: Box<dyn FraudOracle>,
}

impl MetricsAggregator {
    pub fn new(oracle: Box<dyn FraudOracle>) -> Self {
        Self {
            state: Mutex::new(MetricsState::default()),
            oracle,
        }
    }

    /// Fold one scored transaction into the running counters.
    pub fn record(&self, transaction: &Transaction, result: &ScoringResult) {
        let is_fraud = self.oracle.is_fraud(result.score);
        debug!(
            "Recording {} for user {} (score {:.2}, simulated fraud: {})",
            result.decision, transaction.user_id, result.score, is_fraud
        );

        let mut state = self.state.lock().unwrap();
        state.total += 1;
        state.score_sum += result.score;
        match result.decision {
            Decision::Allow => {
                state.allowed += 1;
                if is_fraud {
                    state.false_negatives += 1;
                } else {
                    state.true_negatives += 1;
                }
            }
            Decision::Flag => {
                state.flagged += 1;
                if is_fraud {
                    state.true_positives += 1;
                } else {
                    state.false_positives += 1;
                }
            }
            Decision::Decline => {
                state.declined += 1;
                if is_fraud {
                    state.true_positives += 1;
                } else {
                    state.false_positives += 1;
                }
            }
        }
    }

    /// Derive the current metrics view. Every division by zero degrades
    /// to 0.0 rather than an error.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = *self.state.lock().unwrap();

        let tp = state.true_positives as f64;
        let fp = state.false_positives as f64;
        let tn = state.true_negatives as f64;
        let missed = state.false_negatives as f64;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + missed);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        MetricsSnapshot {
            total_transactions: state.total,
            flagged_count: state.flagged,
            allowed_count: state.allowed,
            declined_count: state.declined,
            precision: round4(precision),
            recall: round4(recall),
            f1_score: round4(f1),
            average_score: round4(ratio(state.score_sum, state.total as f64)),
            losses_prevented: round2(tp * self.oracle.loss_per_fraud_usd()),
            false_positive_rate: round4(ratio(fp, fp + tn)),
            timestamp: Utc::now(),
        }
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap() = MetricsState::default();
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn round4(value: f64) -> f64 {
    (value * 10000.0).round() / 10000.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
