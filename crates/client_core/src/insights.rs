use shared::protocol::ChurnStats;
use tracing::{debug, warn};

use crate::{error::ChurnApiError, lifetime::ViewLifetime, risk::format_probability};

pub const STATUS_LOADING: &str = "Loading churn stats...";
pub const STATUS_LOADED: &str = "Churn analytics loaded.";
pub const STATUS_FAILED: &str = "Failed to load churn stats.";

/// One bar of a churn chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub category: String,
    pub churn_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChurnSeries {
    pub by_contract: Vec<ChartPoint>,
    pub by_payment_method: Vec<ChartPoint>,
}

/// Converts the server breakdowns into percentage series, keeping order and
/// length.
pub fn churn_series(stats: &ChurnStats) -> ChurnSeries {
    ChurnSeries {
        by_contract: stats
            .churn_rate_by_contract
            .iter()
            .map(|row| ChartPoint {
                category: row.contract.clone(),
                churn_pct: row.churn_rate * 100.0,
            })
            .collect(),
        by_payment_method: stats
            .churn_rate_by_payment_method
            .iter()
            .map(|row| ChartPoint {
                category: row.payment_method.clone(),
                churn_pct: row.churn_rate * 100.0,
            })
            .collect(),
    }
}

pub fn summary_line(stats: &ChurnStats) -> String {
    format!(
        "Total customers in dataset: {} | Overall churn: {}",
        stats.total_customers,
        format_probability(stats.churn_rate_overall)
    )
}

#[derive(Debug)]
pub struct InsightsView {
    stats: Option<ChurnStats>,
    status: String,
    lifetime: ViewLifetime,
}

impl Default for InsightsView {
    fn default() -> Self {
        Self {
            stats: None,
            status: STATUS_LOADING.to_string(),
            lifetime: ViewLifetime::default(),
        }
    }
}

impl InsightsView {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn stats(&self) -> Option<&ChurnStats> {
        self.stats.as_ref()
    }

    pub fn series(&self) -> Option<ChurnSeries> {
        self.stats.as_ref().map(churn_series)
    }

    pub fn is_loading(&self) -> bool {
        self.lifetime.is_loading()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.stats = None;
        self.status = STATUS_LOADING.to_string();
        self.lifetime.begin()
    }

    pub(crate) fn lifetime_mut(&mut self) -> &mut ViewLifetime {
        &mut self.lifetime
    }

    pub fn apply(&mut self, generation: u64, outcome: Result<ChurnStats, ChurnApiError>) -> bool {
        if !self.lifetime.settle(generation) {
            debug!(generation, "dropping stale churn stats response");
            return false;
        }
        match outcome {
            Ok(stats) => {
                self.stats = Some(stats);
                self.status = STATUS_LOADED.to_string();
            }
            Err(err) => {
                warn!("failed to load churn stats: {err}");
                self.status = STATUS_FAILED.to_string();
            }
        }
        true
    }

    /// Leaves the view; the snapshot is not kept.
    pub fn deactivate(&mut self) {
        self.lifetime.invalidate();
        self.stats = None;
        self.status = STATUS_LOADING.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{ContractChurnRate, PaymentMethodChurnRate};

    fn stats() -> ChurnStats {
        ChurnStats {
            total_customers: 7043,
            churn_rate_overall: 0.2654,
            churn_rate_by_contract: vec![
                ContractChurnRate {
                    contract: "Month-to-month".to_string(),
                    churn_rate: 0.4271,
                },
                ContractChurnRate {
                    contract: "One year".to_string(),
                    churn_rate: 0.1127,
                },
                ContractChurnRate {
                    contract: "Two year".to_string(),
                    churn_rate: 0.0283,
                },
            ],
            churn_rate_by_payment_method: vec![
                PaymentMethodChurnRate {
                    payment_method: "Mailed check".to_string(),
                    churn_rate: 0.191,
                },
                PaymentMethodChurnRate {
                    payment_method: "Electronic check".to_string(),
                    churn_rate: 0.4529,
                },
            ],
        }
    }

    #[test]
    fn series_match_server_sequences() {
        let stats = stats();
        let series = churn_series(&stats);
        assert_eq!(series.by_contract.len(), stats.churn_rate_by_contract.len());
        assert_eq!(
            series.by_payment_method.len(),
            stats.churn_rate_by_payment_method.len()
        );
        for (point, row) in series.by_contract.iter().zip(&stats.churn_rate_by_contract) {
            assert_eq!(point.category, row.contract);
            assert!((point.churn_pct - row.churn_rate * 100.0).abs() < 1e-9);
        }
        assert_eq!(series.by_payment_method[0].category, "Mailed check");
        assert!((series.by_payment_method[1].churn_pct - 45.29).abs() < 1e-9);
    }

    #[test]
    fn empty_breakdowns_yield_empty_series() {
        let mut stats = stats();
        stats.churn_rate_by_contract.clear();
        stats.churn_rate_by_payment_method.clear();
        let series = churn_series(&stats);
        assert!(series.by_contract.is_empty());
        assert!(series.by_payment_method.is_empty());
    }

    #[test]
    fn summary_reports_total_and_overall_rate() {
        assert_eq!(
            summary_line(&stats()),
            "Total customers in dataset: 7043 | Overall churn: 26.5%"
        );
    }

    #[test]
    fn failure_is_persistent_until_reactivated() {
        let mut view = InsightsView::default();
        let generation = view.begin_load();
        view.apply(
            generation,
            Err(ChurnApiError::Transport("connection refused".to_string())),
        );
        assert_eq!(view.status(), STATUS_FAILED);
        assert!(view.series().is_none());
        assert!(!view.is_loading());
    }

    #[test]
    fn deactivation_discards_the_snapshot() {
        let mut view = InsightsView::default();
        let generation = view.begin_load();
        assert!(view.apply(generation, Ok(stats())));
        assert_eq!(view.status(), STATUS_LOADED);
        view.deactivate();
        assert!(view.stats().is_none());
        assert!(!view.apply(generation, Ok(stats())));
    }
}
