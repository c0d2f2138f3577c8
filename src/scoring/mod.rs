//! 📊 Risk Scoring
//!
//! Deterministic fraud scoring for validated transactions:
//! - Heuristic score in [0.0, 1.0] from amount tier, merchant category,
//!   and per-user jitter
//! - Threshold decision (ALLOW / FLAG / DECLINE)
//! - SHAP-style factor explanation for every score
//! - Content-hash transaction identifiers
//!
//! The scorer is a pure function over its input: no shared state, no I/O,
//! safe to call from any number of request tasks.

pub mod engine;
pub mod explanation;

pub use engine::{RiskScorer, ScoringResult};
pub use explanation::{Explanation, FactorValue, Polarity, RiskFactor};
