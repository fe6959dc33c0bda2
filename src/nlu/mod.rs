//! Conversational Language Understanding client
//!
//! Sends a query to a deployed conversation project and returns the
//! predicted intent and entities.

mod model;

pub use model::{Entity, Intent, Prediction};

use crate::azure::http::{Auth, AzureHttpClient};
use anyhow::{Context, Result};
use model::{AnalyzeRequest, AnalyzeResponse};

/// Language service API version for conversation analysis
pub const CONVERSATIONS_API_VERSION: &str = "2023-04-01";

/// Client for the `:analyze-conversations` endpoint
#[derive(Clone)]
pub struct ConversationClient {
    http: AzureHttpClient,
    endpoint: String,
    key: String,
    project_name: String,
    deployment_name: String,
}

impl ConversationClient {
    pub fn new(endpoint: &str, key: &str, project_name: &str, deployment_name: &str) -> Result<Self> {
        let http = AzureHttpClient::new().context("Failed to initialize language client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
            project_name: project_name.to_string(),
            deployment_name: deployment_name.to_string(),
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/language/:analyze-conversations?api-version={}",
            self.endpoint, CONVERSATIONS_API_VERSION
        )
    }

    /// Analyze one query
    pub async fn analyze(&self, text: &str) -> Result<Prediction> {
        let request = AnalyzeRequest::conversation(text, &self.project_name, &self.deployment_name);
        let body = serde_json::to_value(&request).context("Failed to encode analysis request")?;

        let response = self
            .http
            .post(&self.analyze_url(), Auth::SubscriptionKey(&self.key), Some(&body))
            .await
            .context("Failed to analyze query")?;

        let parsed: AnalyzeResponse =
            serde_json::from_value(response).context("Unexpected conversation analysis response")?;

        tracing::debug!(
            "Prediction for {:?}: {:?}",
            parsed.result.query.as_deref().unwrap_or(text),
            parsed.result.prediction
        );

        Ok(parsed.result.prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_url() {
        let client = ConversationClient::new("https://lang.example.test/", "k", "p", "d").unwrap();
        assert_eq!(
            client.analyze_url(),
            "https://lang.example.test/language/:analyze-conversations?api-version=2023-04-01"
        );
    }
}
