//! Active view and last scoring result, the state shared by every view.

use std::{fmt, str::FromStr};

use shared::protocol::ScoredPrediction;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Predict,
    History,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Predict, Tab::History, Tab::Insights];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Predict => "Predict",
            Tab::History => "History",
            Tab::Insights => "Insights",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab '{0}' (expected predict, history or insights)")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownTab(name.to_string()))
    }
}

/// Read-only view of the session handed to the view controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    active_tab: Tab,
    last_result: Option<ScoredPrediction>,
    result_revision: u64,
}

impl SessionState {
    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn last_result(&self) -> Option<&ScoredPrediction> {
        self.last_result.as_ref()
    }

    /// Bumped on every recorded result, including one equal to the previous.
    pub fn result_revision(&self) -> u64 {
        self.result_revision
    }
}

/// What a transition changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTransition {
    /// `(from, to)` when the active tab moved.
    pub tab_change: Option<(Tab, Tab)>,
    pub result_changed: bool,
}

/// Owner of the session state; the only place it is mutated.
#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
}

impl Default for SessionController {
    fn default() -> Self {
        Self {
            state: SessionState {
                active_tab: Tab::Predict,
                last_result: None,
                result_revision: 0,
            },
        }
    }
}

impl SessionController {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn select_tab(&mut self, tab: Tab) -> SessionTransition {
        SessionTransition {
            tab_change: self.move_to(tab),
            result_changed: false,
        }
    }

    /// Stores a fresh result and forces the History tab.
    pub fn record_prediction(&mut self, prediction: ScoredPrediction) -> SessionTransition {
        self.state.last_result = Some(prediction);
        self.state.result_revision += 1;
        SessionTransition {
            tab_change: self.move_to(Tab::History),
            result_changed: true,
        }
    }

    fn move_to(&mut self, tab: Tab) -> Option<(Tab, Tab)> {
        let from = self.state.active_tab;
        if from == tab {
            return None;
        }
        self.state.active_tab = tab;
        Some((from, tab))
    }
}
