//! Core domain types shared by the scoring engine, history store, and
//! metrics aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated financial transaction, ready for scoring.
///
/// Built by the API boundary after field validation; the core consumes it
/// by reference and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Customer identifier (always > 0)
    pub user_id: u64,
    /// Amount in the transaction currency, rounded to 2 decimal places
    pub amount: f64,
    /// Merchant identifier (non-empty)
    pub merchant_id: String,
    /// Merchant category (e.g. "electronics", "crypto")
    pub merchant_category: Option<String>,
    /// ISO 3166-1 alpha-2 country code, uppercased
    pub country: Option<String>,
    /// Payment method (e.g. "credit_card")
    pub payment_method: Option<String>,
    /// Event timestamp (UTC, never in the future)
    pub timestamp: DateTime<Utc>,
}

/// Outcome of scoring a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Flag,
    Decline,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Flag => "FLAG",
            Decision::Decline => "DECLINE",
        }
    }

    /// Parse the wire representation used in query filters.
    pub fn parse(s: &str) -> Option<Decision> {
        match s {
            "ALLOW" => Some(Decision::Allow),
            "FLAG" => Some(Decision::Flag),
            "DECLINE" => Some(Decision::Decline),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
