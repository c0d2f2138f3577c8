//! SHAP-style factor explanations for scored transactions.
//!
//! Until a real model ships, each factor's weight is a fixed fraction of
//! the final score. The factor list, its ordering (by absolute weight,
//! descending), and the top-5 truncation are part of the scoring contract.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::Transaction;

/// Version tag reported with every explanation
pub const MODEL_VERSION: &str = "placeholder_v1.0";

/// Explanation flavor reported until real SHAP values exist
pub const EXPLANATION_TYPE: &str = "mock_shap";

/// Countries that contribute positive (fraud-leaning) weight
pub const HIGH_RISK_COUNTRIES: [&str; 3] = ["NG", "RU", "CN"];

/// Maximum number of factors kept after sorting
const MAX_FACTORS: usize = 5;

/// Which side of the decision a factor pushes toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Fraud,
    Legitimate,
}

/// Observed value of a factor. Amounts and the velocity placeholder are
/// numeric; categories, countries, and payment methods are text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

/// One contributing factor in an explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub feature_name: String,
    pub feature_value: FactorValue,
    /// Signed contribution weight, rounded to 3 decimal places
    pub shap_value: f64,
    pub contribution: Polarity,
}

/// Factor list plus the envelope fields clients need to interpret it.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub top_features: Vec<RiskFactor>,
    /// The FLAG threshold the score is compared against
    pub threshold: f64,
    pub model_version: String,
    pub explanation_type: String,
}

/// Build the explanation for a scored transaction.
///
/// Candidates are conditional on the transaction's attributes; the
/// velocity placeholder is always present. Sorting is stable, so factors
/// with equal absolute weight keep their construction order.
pub fn build_explanation(transaction: &Transaction, score: f64, threshold: f64) -> Explanation {
    let mut factors = Vec::with_capacity(MAX_FACTORS);

    if transaction.amount > 500.0 {
        factors.push(RiskFactor {
            feature_name: "transaction_amount".to_string(),
            feature_value: FactorValue::Number(transaction.amount),
            shap_value: round3(0.3 * score),
            contribution: Polarity::Fraud,
        });
    }

    if let Some(category) = &transaction.merchant_category {
        factors.push(RiskFactor {
            feature_name: "merchant_category".to_string(),
            feature_value: FactorValue::Text(category.clone()),
            shap_value: round3(0.2 * score),
            contribution: if score > 0.5 {
                Polarity::Fraud
            } else {
                Polarity::Legitimate
            },
        });
    }

    // Placeholder until a feature store supplies real velocity data
    factors.push(RiskFactor {
        feature_name: "user_velocity_5min".to_string(),
        feature_value: FactorValue::Number(1.0),
        shap_value: round3(0.1 * score),
        contribution: Polarity::Legitimate,
    });

    if let Some(country) = &transaction.country {
        let is_risky = HIGH_RISK_COUNTRIES.contains(&country.as_str());
        let weight = if is_risky { 0.2 } else { -0.1 };
        factors.push(RiskFactor {
            feature_name: "country_risk".to_string(),
            feature_value: FactorValue::Text(country.clone()),
            shap_value: round3(weight * score),
            contribution: if is_risky {
                Polarity::Fraud
            } else {
                Polarity::Legitimate
            },
        });
    }

    if let Some(method) = &transaction.payment_method {
        factors.push(RiskFactor {
            feature_name: "payment_method".to_string(),
            feature_value: FactorValue::Text(method.clone()),
            shap_value: round3(0.05 * score),
            contribution: Polarity::Legitimate,
        });
    }

    factors.sort_by(|a, b| {
        b.shap_value
            .abs()
            .partial_cmp(&a.shap_value.abs())
            .unwrap_or(Ordering::Equal)
    });
    factors.truncate(MAX_FACTORS);

    Explanation {
        top_features: factors,
        threshold,
        model_version: MODEL_VERSION.to_string(),
        explanation_type: EXPLANATION_TYPE.to_string(),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
