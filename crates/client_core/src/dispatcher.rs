use shared::protocol::ScoredPrediction;
use tracing::{info, warn};

use crate::error::{ChurnApiError, FormError};

pub const STATUS_READY: &str = "Ready.";
pub const STATUS_PREDICTING: &str = "Predicting...";
pub const STATUS_PREDICTED: &str = "Prediction successful.";

/// Status line and in-flight guard for the scoring request.
///
/// At most one request is outstanding: `begin` refuses while busy, which is
/// how the submit control stays disabled. Requests are never cancelled.
#[derive(Debug, Clone)]
pub struct ScoringDispatcher {
    status: String,
    in_flight: bool,
}

impl Default for ScoringDispatcher {
    fn default() -> Self {
        Self {
            status: STATUS_READY.to_string(),
            in_flight: false,
        }
    }
}

impl ScoringDispatcher {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    /// Marks a request as started. Returns `false` if one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.status = STATUS_PREDICTING.to_string();
        true
    }

    /// Settles the outstanding request. The scored prediction is handed back
    /// only on success.
    pub fn finish(
        &mut self,
        outcome: Result<ScoredPrediction, ChurnApiError>,
    ) -> Option<ScoredPrediction> {
        self.in_flight = false;
        match outcome {
            Ok(prediction) => {
                info!(
                    customer_id = %prediction.customer_id,
                    churn_probability = prediction.churn_probability,
                    risk_label = %prediction.risk_label,
                    "prediction scored"
                );
                self.status = STATUS_PREDICTED.to_string();
                Some(prediction)
            }
            Err(err) => {
                warn!("prediction failed: {err}");
                self.status = format!("Error: {}", err.operator_message());
                None
            }
        }
    }

    /// Reports a draft that could not be turned into a request.
    pub fn reject(&mut self, err: &FormError) {
        warn!("prediction not sent: {err}");
        self.status = format!("Error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction() -> ScoredPrediction {
        ScoredPrediction {
            id: None,
            customer_id: "TEST-0001".to_string(),
            churn_probability: 0.42,
            risk_label: "MEDIUM".to_string(),
            predicted_at: None,
        }
    }

    #[test]
    fn success_path_walks_through_statuses() {
        let mut dispatcher = ScoringDispatcher::default();
        assert_eq!(dispatcher.status(), "Ready.");

        assert!(dispatcher.begin());
        assert_eq!(dispatcher.status(), "Predicting...");
        assert!(!dispatcher.can_submit());

        let scored = dispatcher.finish(Ok(prediction()));
        assert_eq!(scored, Some(prediction()));
        assert_eq!(dispatcher.status(), "Prediction successful.");
        assert!(dispatcher.can_submit());
    }

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mut dispatcher = ScoringDispatcher::default();
        assert!(dispatcher.begin());
        assert!(!dispatcher.begin());
        assert_eq!(dispatcher.status(), "Predicting...");
    }

    #[test]
    fn service_detail_is_surfaced_verbatim() {
        let mut dispatcher = ScoringDispatcher::default();
        dispatcher.begin();
        let scored = dispatcher.finish(Err(ChurnApiError::rejected(
            422,
            r#"{"detail":"invalid tenure"}"#,
        )));
        assert!(scored.is_none());
        assert_eq!(dispatcher.status(), "Error: invalid tenure");
        assert!(dispatcher.can_submit());
    }

    #[test]
    fn transport_failure_uses_error_text() {
        let mut dispatcher = ScoringDispatcher::default();
        dispatcher.begin();
        dispatcher.finish(Err(ChurnApiError::Transport(
            "error sending request".to_string(),
        )));
        assert_eq!(dispatcher.status(), "Error: error sending request");
    }
}
