//! 📊 Risk Scoring Engine
//!
//! Computes a 0.0-1.0 fraud risk score from transaction attributes:
//! - Amount tier: larger amounts carry more risk
//! - Merchant category: known risky verticals add a fixed bump
//! - Per-user jitter: a deterministic function of user_id, so the same
//!   user always scores identically for the same transaction
//!
//! The formula is a fixed contract shared with downstream analytics; the
//! jitter is intentionally NOT a random draw.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::scoring::explanation::{build_explanation, Explanation};
use crate::types::{Decision, Transaction};

/// Default score at or above which a transaction is flagged for review
pub const DEFAULT_FLAG_THRESHOLD: f64 = 0.70;

/// Default score at or above which a transaction is declined outright
pub const DEFAULT_DECLINE_THRESHOLD: f64 = 0.90;

/// Categories that add the full 0.40 risk bump
const HIGH_RISK_CATEGORIES: [&str; 3] = ["online_gambling", "crypto", "foreign_exchange"];

/// Categories that add a moderate 0.20 risk bump
const MEDIUM_RISK_CATEGORIES: [&str; 3] = ["electronics", "jewelry", "travel"];

/// Complete outcome of one scoring call.
///
/// Created once per transaction and never mutated; the request coordinator
/// projects it into the history store, the metrics aggregator, and the wire
/// response.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    /// Content-hash identifier (`txn_` + 12 hex chars)
    pub transaction_id: String,
    /// Fraud risk score in [0.0, 1.0], rounded to 2 decimal places
    pub score: f64,
    /// Decision derived from the score and thresholds
    pub decision: Decision,
    /// Factor-level explanation of the score
    pub explanation: Explanation,
    /// When scoring completed
    pub timestamp: DateTime<Utc>,
}

/// Risk scorer with configurable decision thresholds.
///
/// Holds no mutable state; a single instance is shared across all request
/// tasks without synchronization.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    /// Score at or above this flags the transaction (boundary inclusive)
    flag_threshold: f64,
    /// Score at or above this declines the transaction (boundary inclusive)
    decline_threshold: f64,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            flag_threshold: DEFAULT_FLAG_THRESHOLD,
            decline_threshold: DEFAULT_DECLINE_THRESHOLD,
        }
    }
}

impl RiskScorer {
    /// Create a scorer with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom thresholds
    pub fn with_thresholds(flag_threshold: f64, decline_threshold: f64) -> Self {
        Self {
            flag_threshold,
            decline_threshold,
        }
    }

    /// Score a validated transaction.
    ///
    /// Total over the validated input domain: this never fails. The
    /// `correlation_id` (request id) only feeds the transaction identifier
    /// hash, so identical inputs within one request hash identically.
    pub fn score(&self, transaction: &Transaction, correlation_id: &str) -> ScoringResult {
        let score = self.calculate_score(transaction);
        let decision = self.decide(score);
        let transaction_id = transaction_id(transaction, correlation_id);
        let explanation = build_explanation(transaction, score, self.flag_threshold);

        ScoringResult {
            transaction_id,
            score,
            decision,
            explanation,
            timestamp: Utc::now(),
        }
    }

    /// Compute the raw heuristic score.
    ///
    /// Amount tier, then category risk, then user jitter; clamped to
    /// [0.0, 1.0] and rounded to 2 decimal places.
    fn calculate_score(&self, transaction: &Transaction) -> f64 {
        let mut score = 0.0;

        // Amount tier (strict lower bounds)
        if transaction.amount > 1000.0 {
            score += 0.3;
        } else if transaction.amount > 500.0 {
            score += 0.2;
        } else if transaction.amount > 100.0 {
            score += 0.1;
        }

        // Merchant category risk
        if let Some(category) = &transaction.merchant_category {
            if HIGH_RISK_CATEGORIES.contains(&category.as_str()) {
                score += 0.4;
            } else if MEDIUM_RISK_CATEGORIES.contains(&category.as_str()) {
                score += 0.2;
            }
        }

        // Deterministic per-user jitter: same user, same contribution
        let user_seed = (transaction.user_id % 100) as f64 / 100.0;
        score += user_seed * 0.3;

        round2(score.clamp(0.0, 1.0))
    }

    /// Map a score to a decision. Thresholds are evaluated high to low and
    /// are inclusive.
    fn decide(&self, score: f64) -> Decision {
        if score >= self.decline_threshold {
            Decision::Decline
        } else if score >= self.flag_threshold {
            Decision::Flag
        } else {
            Decision::Allow
        }
    }
}

/// Derive the transaction identifier from a content hash.
///
/// The amount is formatted with its canonical 2 decimal places so equal
/// post-rounding amounts always hash identically.
fn transaction_id(transaction: &Transaction, correlation_id: &str) -> String {
    let content = format!(
        "{}_{:.2}_{}_{}",
        transaction.user_id, transaction.amount, transaction.merchant_id, correlation_id
    );

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("txn_{}", &digest[..12])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
