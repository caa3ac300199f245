//! Recent-predictions view: fetch state, row shaping and risk colouring.

use shared::protocol::ScoredPrediction;
use tracing::{debug, warn};

use crate::{
    error::ChurnApiError,
    lifetime::ViewLifetime,
    risk::{format_probability, risk_tone, RiskTone},
};

/// Number of recent predictions requested from the service.
pub const HISTORY_LIMIT: u32 = 50;

pub const STATUS_LOADING: &str = "Loading history...";
pub const STATUS_FAILED: &str = "Failed to load predictions.";
pub const EMPTY_PLACEHOLDER: &str = "No predictions yet. Run a prediction first.";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub customer_id: String,
    pub churn_probability: String,
    pub risk_label: String,
    pub tone: RiskTone,
    pub predicted_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRow {
    Entry(HistoryEntry),
    Placeholder(&'static str),
}

impl From<&ScoredPrediction> for HistoryEntry {
    fn from(prediction: &ScoredPrediction) -> Self {
        Self {
            id: prediction.id.map(|id| id.to_string()).unwrap_or_default(),
            customer_id: prediction.customer_id.clone(),
            churn_probability: format_probability(prediction.churn_probability),
            risk_label: prediction.risk_label.clone(),
            tone: risk_tone(&prediction.risk_label),
            predicted_at: prediction.predicted_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
pub struct HistoryView {
    items: Vec<ScoredPrediction>,
    status: String,
    lifetime: ViewLifetime,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: STATUS_LOADING.to_string(),
            lifetime: ViewLifetime::default(),
        }
    }
}

impl HistoryView {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn items(&self) -> &[ScoredPrediction] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.lifetime.is_loading()
    }

    /// Rows in service order; an empty list yields one placeholder row.
    pub fn rows(&self) -> Vec<HistoryRow> {
        if self.items.is_empty() {
            return vec![HistoryRow::Placeholder(EMPTY_PLACEHOLDER)];
        }
        self.items
            .iter()
            .map(|item| HistoryRow::Entry(item.into()))
            .collect()
    }

    /// Starts a load, superseding any outstanding one. Current rows stay
    /// visible until the new list arrives.
    pub fn begin_load(&mut self) -> u64 {
        self.status = STATUS_LOADING.to_string();
        self.lifetime.begin()
    }

    pub(crate) fn lifetime_mut(&mut self) -> &mut ViewLifetime {
        &mut self.lifetime
    }

    /// Applies a completed fetch. Returns `false` for a stale generation.
    pub fn apply(
        &mut self,
        generation: u64,
        outcome: Result<Vec<ScoredPrediction>, ChurnApiError>,
    ) -> bool {
        if !self.lifetime.settle(generation) {
            debug!(generation, "dropping stale history response");
            return false;
        }
        match outcome {
            Ok(mut items) => {
                let limit = HISTORY_LIMIT as usize;
                if items.len() > limit {
                    warn!(
                        received = items.len(),
                        limit, "history response exceeded the requested limit"
                    );
                    items.truncate(limit);
                }
                self.status = format!("Showing {} recent predictions.", items.len());
                self.items = items;
            }
            Err(err) => {
                warn!("failed to load predictions: {err}");
                self.status = STATUS_FAILED.to_string();
            }
        }
        true
    }

    /// Leaves the view: aborts its fetch and discards the rows.
    pub fn deactivate(&mut self) {
        self.lifetime.invalidate();
        self.items.clear();
        self.status = STATUS_LOADING.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: i64, label: &str) -> ScoredPrediction {
        ScoredPrediction {
            id: Some(id),
            customer_id: format!("C-{id}"),
            churn_probability: 0.5,
            risk_label: label.to_string(),
            predicted_at: Some("2025-01-01 10:00:00".to_string()),
        }
    }

    #[test]
    fn empty_list_renders_single_placeholder() {
        let mut view = HistoryView::default();
        let generation = view.begin_load();
        assert!(view.apply(generation, Ok(Vec::new())));
        assert_eq!(view.status(), "Showing 0 recent predictions.");
        assert_eq!(view.rows(), vec![HistoryRow::Placeholder(EMPTY_PLACEHOLDER)]);
    }

    #[test]
    fn rows_keep_service_order_and_tones() {
        let mut view = HistoryView::default();
        let generation = view.begin_load();
        view.apply(
            generation,
            Ok(vec![scored(9, "HIGH"), scored(8, "LOW"), scored(7, "MEDIUM")]),
        );
        let rows = view.rows();
        let summary: Vec<_> = rows
            .iter()
            .map(|row| match row {
                HistoryRow::Entry(entry) => (entry.id.as_str(), entry.tone),
                HistoryRow::Placeholder(_) => panic!("unexpected placeholder"),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("9", RiskTone::Alert),
                ("8", RiskTone::Positive),
                ("7", RiskTone::Warning)
            ]
        );
        assert_eq!(view.status(), "Showing 3 recent predictions.");
    }

    #[test]
    fn list_is_replaced_wholesale() {
        let mut view = HistoryView::default();
        let generation = view.begin_load();
        view.apply(generation, Ok(vec![scored(1, "LOW"), scored(2, "LOW")]));
        let generation = view.begin_load();
        view.apply(generation, Ok(vec![scored(3, "HIGH")]));
        assert_eq!(view.items(), &[scored(3, "HIGH")]);
    }

    #[test]
    fn never_shows_more_than_the_limit() {
        let mut view = HistoryView::default();
        let generation = view.begin_load();
        let items: Vec<_> = (0..60).map(|id| scored(id, "LOW")).collect();
        view.apply(generation, Ok(items));
        assert_eq!(view.rows().len(), HISTORY_LIMIT as usize);
        assert_eq!(view.items().len(), HISTORY_LIMIT as usize);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut view = HistoryView::default();
        let stale = view.begin_load();
        let current = view.begin_load();
        assert!(!view.apply(stale, Ok(vec![scored(1, "HIGH")])));
        assert!(view.items().is_empty());
        assert_eq!(view.status(), STATUS_LOADING);
        assert!(view.apply(current, Ok(vec![scored(2, "LOW")])));
        assert_eq!(view.items(), &[scored(2, "LOW")]);
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut view = HistoryView::default();
        let generation = view.begin_load();
        view.apply(generation, Ok(vec![scored(1, "LOW")]));
        let generation = view.begin_load();
        view.apply(
            generation,
            Err(ChurnApiError::Transport("connection refused".to_string())),
        );
        assert_eq!(view.status(), STATUS_FAILED);
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn prediction_without_id_renders_blank_cells() {
        let entry = HistoryEntry::from(&ScoredPrediction {
            id: None,
            customer_id: "X".to_string(),
            churn_probability: 0.125,
            risk_label: "LOW".to_string(),
            predicted_at: None,
        });
        assert_eq!(entry.id, "");
        assert_eq!(entry.predicted_at, "");
        assert_eq!(entry.churn_probability, "12.5%");
    }
}
