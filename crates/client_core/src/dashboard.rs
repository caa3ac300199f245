//! Orchestration of the three dashboard views around one session.
//!
//! The `Dashboard` value owns all state. Operator intents come in through
//! [`Dashboard::handle`]; network work runs on spawned tasks whose results
//! come back as [`DashboardEvent`]s and are applied by [`Dashboard::apply`] on
//! the owning task.

use std::sync::Arc;

use shared::{
    domain::FeatureField,
    protocol::{ChurnStats, ScoredPrediction},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    dispatcher::ScoringDispatcher,
    error::ChurnApiError,
    form::FeatureDraft,
    history::{HistoryView, HISTORY_LIMIT},
    insights::InsightsView,
    session::{SessionController, SessionState, SessionTransition, Tab},
    ChurnApi,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    SelectTab(Tab),
    SetField { field: FeatureField, raw: String },
    ClearField(FeatureField),
    Submit,
}

#[derive(Debug)]
pub enum DashboardEvent {
    PredictionSettled(Result<ScoredPrediction, ChurnApiError>),
    HistoryLoaded {
        generation: u64,
        outcome: Result<Vec<ScoredPrediction>, ChurnApiError>,
    },
    StatsLoaded {
        generation: u64,
        outcome: Result<ChurnStats, ChurnApiError>,
    },
}

pub struct Dashboard<A: ChurnApi + 'static> {
    api: Arc<A>,
    session: SessionController,
    form: FeatureDraft,
    dispatcher: ScoringDispatcher,
    history: HistoryView,
    insights: InsightsView,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl<A: ChurnApi + 'static> Dashboard<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            session: SessionController::default(),
            form: FeatureDraft::default(),
            dispatcher: ScoringDispatcher::default(),
            history: HistoryView::default(),
            insights: InsightsView::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn form(&self) -> &FeatureDraft {
        &self.form
    }

    pub fn dispatcher(&self) -> &ScoringDispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn insights(&self) -> &InsightsView {
        &self.insights
    }

    /// True while any request whose result will still be applied is running.
    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy() || self.history.is_loading() || self.insights.is_loading()
    }

    /// Applies an operator intent. Must be called inside a tokio runtime, since
    /// network work is spawned.
    pub fn handle(&mut self, command: DashboardCommand) {
        match command {
            DashboardCommand::SelectTab(tab) => {
                let transition = self.session.select_tab(tab);
                self.apply_transition(transition);
            }
            DashboardCommand::SetField { field, raw } => self.form.set_field(field, raw),
            DashboardCommand::ClearField(field) => self.form.clear_field(field),
            DashboardCommand::Submit => self.submit(),
        }
    }

    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::PredictionSettled(outcome) => {
                if let Some(prediction) = self.dispatcher.finish(outcome) {
                    let transition = self.session.record_prediction(prediction);
                    self.apply_transition(transition);
                }
            }
            DashboardEvent::HistoryLoaded {
                generation,
                outcome,
            } => {
                self.history.apply(generation, outcome);
            }
            DashboardEvent::StatsLoaded {
                generation,
                outcome,
            } => {
                self.insights.apply(generation, outcome);
            }
        }
    }

    /// Waits for the next completion from a spawned request.
    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.recv().await
    }

    /// Applies completions until nothing is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.events_rx.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }

    fn submit(&mut self) {
        if !self.dispatcher.can_submit() {
            debug!("submit ignored while a prediction is in flight");
            return;
        }
        let features = match self.form.build_request() {
            Ok(features) => features,
            Err(err) => {
                self.dispatcher.reject(&err);
                return;
            }
        };
        self.dispatcher.begin();
        info!(customer_id = %features.customer_id, "submitting prediction");

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        // Not bound to any view: a scoring request always runs to completion.
        tokio::spawn(async move {
            let outcome = api.predict_churn(&features).await;
            let _ = tx.send(DashboardEvent::PredictionSettled(outcome));
        });
    }

    fn apply_transition(&mut self, transition: SessionTransition) {
        match transition.tab_change {
            Some((from, to)) => {
                debug!(from = %from, to = %to, "switching tab");
                self.deactivate(from);
                self.activate(to);
            }
            None if transition.result_changed
                && self.session.state().active_tab() == Tab::History =>
            {
                self.load_history();
            }
            None => {}
        }
    }

    fn activate(&mut self, tab: Tab) {
        match tab {
            Tab::Predict => {}
            Tab::History => self.load_history(),
            Tab::Insights => self.load_insights(),
        }
    }

    fn deactivate(&mut self, tab: Tab) {
        match tab {
            Tab::Predict => {}
            Tab::History => self.history.deactivate(),
            Tab::Insights => self.insights.deactivate(),
        }
    }

    fn load_history(&mut self) {
        let generation = self.history.begin_load();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = api.list_predictions(HISTORY_LIMIT).await;
            let _ = tx.send(DashboardEvent::HistoryLoaded {
                generation,
                outcome,
            });
        });
        self.history.lifetime_mut().attach(handle);
    }

    fn load_insights(&mut self) {
        let generation = self.insights.begin_load();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = api.churn_stats().await;
            let _ = tx.send(DashboardEvent::StatsLoaded {
                generation,
                outcome,
            });
        });
        self.insights.lifetime_mut().attach(handle);
    }
}
