use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::protocol::{
    ChurnStats, CustomerFeatures, HealthStatus, PredictionList, ScoredPrediction,
};
use tracing::debug;

pub mod config;
pub mod dashboard;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod history;
pub mod insights;
mod lifetime;
pub mod risk;
pub mod session;

pub use dashboard::{Dashboard, DashboardCommand, DashboardEvent};
pub use error::{ChurnApiError, FormError};
pub use form::FeatureDraft;
pub use session::{SessionState, Tab};

/// The remote scoring service.
#[async_trait]
pub trait ChurnApi: Send + Sync {
    async fn predict_churn(
        &self,
        features: &CustomerFeatures,
    ) -> Result<ScoredPrediction, ChurnApiError>;
    async fn list_predictions(&self, limit: u32) -> Result<Vec<ScoredPrediction>, ChurnApiError>;
    async fn churn_stats(&self) -> Result<ChurnStats, ChurnApiError>;
    async fn health(&self) -> Result<HealthStatus, ChurnApiError>;
}

/// `ChurnApi` over HTTP/JSON. No client-side timeout is applied; a request
/// lasts as long as the service takes to answer.
pub struct HttpChurnApi {
    http: Client,
    base_url: String,
}

impl HttpChurnApi {
    /// `base_url` is expected without a trailing slash
    /// (see [`config::prepare_api_url`]).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ChurnApiError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "churn service rejected request");
            return Err(ChurnApiError::rejected(status.as_u16(), &body));
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl ChurnApi for HttpChurnApi {
    async fn predict_churn(
        &self,
        features: &CustomerFeatures,
    ) -> Result<ScoredPrediction, ChurnApiError> {
        let res = self
            .http
            .post(self.endpoint("/predict_churn"))
            .json(features)
            .send()
            .await?;
        Self::read_json(res).await
    }

    async fn list_predictions(&self, limit: u32) -> Result<Vec<ScoredPrediction>, ChurnApiError> {
        let res = self
            .http
            .get(self.endpoint("/predictions"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body: PredictionList = Self::read_json(res).await?;
        Ok(body.items)
    }

    async fn churn_stats(&self) -> Result<ChurnStats, ChurnApiError> {
        let res = self.http.get(self.endpoint("/stats/churn")).send().await?;
        Self::read_json(res).await
    }

    async fn health(&self) -> Result<HealthStatus, ChurnApiError> {
        let res = self.http.get(self.endpoint("/")).send().await?;
        Self::read_json(res).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod dashboard_tests;
