//! Shared service state constructed once at startup.
//!
//! Handlers receive this through axum state instead of reaching for
//! process globals, so each component exists exactly once per process.

use crate::analytics::{MetricsAggregator, ScoreBandOracle};
use crate::config::Config;
use crate::history::HistoryStore;
use crate::scoring::RiskScorer;

pub struct AppContext {
    pub config: Config,
    pub scorer: RiskScorer,
    pub history: HistoryStore,
    pub analytics: MetricsAggregator,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let scorer = RiskScorer::with_thresholds(
            config.scoring.flag_threshold,
            config.scoring.decline_threshold,
        );
        let history = HistoryStore::new(config.history.max_entries);
        let analytics = MetricsAggregator::new(Box::new(ScoreBandOracle::new(
            config.analytics.avg_fraud_loss_usd,
        )));

        Self {
            config,
            scorer,
            history,
            analytics,
        }
    }
}
