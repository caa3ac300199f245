use shared::{
    domain::FeatureField,
    error::{ApiErrorBody, UnknownChoice, UnknownField},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChurnApiError {
    /// The service could not be reached or the connection failed mid-request.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected {
        status: u16,
        detail: Option<String>,
        message: String,
    },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ChurnApiError {
    /// Builds a rejection from a status code and the raw response body.
    pub fn rejected(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|body| body.detail)
            .map(|detail| detail.to_operator_text())
            .filter(|text| !text.is_empty());
        Self::Rejected {
            status,
            detail,
            message: format!("request failed with status code {status}"),
        }
    }

    /// Text shown to the operator: the service detail when there is one,
    /// otherwise the transport-level message.
    pub fn operator_message(&self) -> String {
        match self {
            ChurnApiError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ChurnApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChurnApiError::Decode(err.to_string())
        } else {
            ChurnApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error("{field}: {source}")]
    InvalidChoice {
        field: FeatureField,
        source: UnknownChoice,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_service_detail() {
        let err = ChurnApiError::rejected(400, r#"{"detail":"invalid tenure"}"#);
        assert_eq!(err.operator_message(), "invalid tenure");
    }

    #[test]
    fn rejection_without_detail_falls_back_to_status_text() {
        let err = ChurnApiError::rejected(502, "<html>bad gateway</html>");
        assert_eq!(
            err.operator_message(),
            "request failed with status code 502"
        );
        let err = ChurnApiError::rejected(500, r#"{"detail":""}"#);
        assert_eq!(
            err.operator_message(),
            "request failed with status code 500"
        );
    }

    #[test]
    fn transport_error_uses_low_level_text() {
        let err = ChurnApiError::Transport("connection refused".to_string());
        assert_eq!(err.operator_message(), "connection refused");
    }
}
