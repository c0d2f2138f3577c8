//! Request and response shapes for the scoring API.
//!
//! Validation collects every violated rule so the client sees the full
//! list in one response instead of fixing fields one at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{DecisionCounts, HistoryEntry};
use crate::scoring::Explanation;
use crate::types::{Decision, Transaction};

/// Largest accepted transaction amount in any currency
const MAX_AMOUNT: f64 = 1_000_000.0;

fn default_currency() -> String {
    "USD".to_string()
}

// Omitting the field selects the default; an explicit null clears it
fn default_payment_method() -> Option<String> {
    Some("credit_card".to_string())
}

/// Inbound scoring request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub user_id: u64,
    pub amount: f64,
    pub merchant_id: String,
    #[serde(default)]
    pub merchant_category: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_payment_method")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl ScoreRequest {
    /// Check every field and convert into the core transaction shape.
    /// The amount is rounded to cents and the country code uppercased
    /// on the way in; a missing timestamp defaults to `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Transaction, Vec<String>> {
        let mut errors = Vec::new();

        if self.user_id == 0 {
            errors.push("user_id: must be greater than 0".to_string());
        }
        if self.amount <= 0.0 {
            errors.push("amount: must be greater than 0".to_string());
        } else if self.amount > MAX_AMOUNT {
            errors.push("amount: must not exceed 1000000".to_string());
        }
        if self.merchant_id.is_empty() || self.merchant_id.chars().count() > 100 {
            errors.push("merchant_id: length must be between 1 and 100".to_string());
        }
        if let Some(category) = &self.merchant_category {
            if category.chars().count() > 50 {
                errors.push("merchant_category: length must not exceed 50".to_string());
            }
        }
        if self.currency.chars().count() != 3 {
            errors.push("currency: must be a 3-letter code".to_string());
        }
        if let Some(country) = &self.country {
            if country.chars().count() != 2 {
                errors.push("country: must be a 2-letter code".to_string());
            }
        }
        if let Some(device_id) = &self.device_id {
            if device_id.chars().count() > 100 {
                errors.push("device_id: length must not exceed 100".to_string());
            }
        }
        if let Some(ip) = &self.ip_address {
            if ip.chars().count() > 45 {
                errors.push("ip_address: length must not exceed 45".to_string());
            }
        }

        let timestamp = self.timestamp.unwrap_or(now);
        if timestamp > now {
            errors.push("timestamp: must not be in the future".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Transaction {
            user_id: self.user_id,
            amount: round2(self.amount),
            merchant_id: self.merchant_id.clone(),
            merchant_category: self.merchant_category.clone(),
            country: self.country.as_ref().map(|c| c.to_uppercase()),
            payment_method: self.payment_method.clone(),
            timestamp,
        })
    }
}

/// Scoring result as returned to the client.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub transaction_id: String,
    pub score: f64,
    pub decision: Decision,
    pub explanation: Explanation,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: f64,
}

/// Query parameters accepted by the history endpoint. `limit` is signed
/// so out-of-range values reach our validator instead of a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub decision: Option<String>,
}

/// Page of recent scoring history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub transactions: Vec<HistoryEntry>,
    pub total_count: usize,
    pub returned_count: usize,
}

/// Counts of retained history entries.
#[derive(Debug, Serialize)]
pub struct HistoryStatsResponse {
    pub total: usize,
    pub by_decision: DecisionCounts,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
