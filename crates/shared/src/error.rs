use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the scoring service on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<ValidationIssue>),
    Other(serde_json::Value),
}

/// One entry of a request-validation failure list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

impl ErrorDetail {
    pub fn to_operator_text(&self) -> String {
        match self {
            ErrorDetail::Message(message) => message.clone(),
            ErrorDetail::Issues(issues) => issues
                .iter()
                .map(ValidationIssue::to_operator_text)
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Other(value) => value.to_string(),
        }
    }
}

impl ValidationIssue {
    fn to_operator_text(&self) -> String {
        if self.loc.is_empty() {
            return self.msg.clone();
        }
        let path = self
            .loc
            .iter()
            .map(|part| match part {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        format!("{path}: {}", self.msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownChoice {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature field '{0}'")]
pub struct UnknownField(pub String);
