//! HTTP client for the planning service
//!
//! Speaks the `/api/plan-tasks` JSON contract over reqwest. No timeout is
//! configured: a submission waits until the service answers or the
//! connection fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{HealthStatus, PlanError, PlanRequest, PlanResult, PlanService};
use crate::config::ServiceConfig;

/// Planning service reached over HTTP
pub struct HttpPlanClient {
    plan_url: String,
    health_url: String,
    http: Client,
}

impl HttpPlanClient {
    /// Create a new client from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, PlanError> {
        debug!(?config, "HttpPlanClient::from_config: called");
        let http = Client::builder().build().map_err(PlanError::Network)?;

        Ok(Self {
            plan_url: config.plan_url(),
            health_url: config.health_url(),
            http,
        })
    }

    /// URL submissions are posted to
    pub fn plan_url(&self) -> &str {
        &self.plan_url
    }

    /// Check the status, then decode the body as `T`
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PlanError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "HttpPlanClient: non-success status");
            return Err(PlanError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(body_len = body.len(), "HttpPlanClient: decoding body");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PlanService for HttpPlanClient {
    async fn plan(&self, tasks: &[String]) -> Result<PlanResult, PlanError> {
        debug!(url = %self.plan_url, task_count = tasks.len(), "HttpPlanClient::plan: called");
        let request = PlanRequest::new(tasks.to_vec());

        let response = self.http.post(&self.plan_url).json(&request).send().await?;
        let result: PlanResult = Self::decode(response).await?;

        debug!(items = result.schedule.len(), "HttpPlanClient::plan: received schedule");
        Ok(result)
    }

    async fn health(&self) -> Result<HealthStatus, PlanError> {
        debug!(url = %self.health_url, "HttpPlanClient::health: called");
        let response = self.http.get(&self.health_url).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_builds_urls() {
        let config = ServiceConfig {
            base_url: "http://127.0.0.1:8000/".to_string(),
            ..Default::default()
        };
        let client = HttpPlanClient::from_config(&config).unwrap();
        assert_eq!(client.plan_url(), "http://127.0.0.1:8000/api/plan-tasks");
        assert_eq!(client.health_url, "http://127.0.0.1:8000/");
    }
}
