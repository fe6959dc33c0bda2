//! Azure Client
//!
//! Main client for Azure Resource Manager, combining authentication
//! and HTTP functionality.

use super::auth::AzureCredentials;
use super::http::{Auth, AzureHttpClient};
use anyhow::{Context, Result};
use serde_json::Value;

/// Default Resource Manager endpoint for Azure public cloud
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// API version for resource groups and generic resources
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// API version for App Service (Microsoft.Web)
pub const WEB_API_VERSION: &str = "2022-03-01";

/// Main Azure Resource Manager client
#[derive(Clone)]
pub struct AzureClient {
    pub credentials: AzureCredentials,
    pub http: AzureHttpClient,
    pub subscription_id: String,
    management_endpoint: String,
}

impl AzureClient {
    pub fn new(
        credentials: AzureCredentials,
        subscription_id: &str,
        management_endpoint: &str,
    ) -> Result<Self> {
        let http = AzureHttpClient::new().context("Failed to initialize Azure client")?;

        Ok(Self {
            credentials,
            http,
            subscription_id: subscription_id.to_string(),
            management_endpoint: management_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Make an authenticated GET request to Resource Manager
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        self.http.get(url, Auth::Bearer(&token)).await
    }

    // =========================================================================
    // Resource Manager URL helpers
    // =========================================================================

    /// Build a subscription-scoped URL
    pub fn subscription_url(&self, path: &str, api_version: &str) -> String {
        format!(
            "{}/subscriptions/{}/{}?api-version={}",
            self.management_endpoint,
            urlencoding::encode(&self.subscription_id),
            path,
            api_version
        )
    }

    /// Build a URL for a resource provider inside a resource group
    pub fn provider_url(
        &self,
        resource_group: &str,
        provider_path: &str,
        api_version: &str,
    ) -> String {
        self.subscription_url(
            &format!(
                "resourceGroups/{}/providers/{}",
                urlencoding::encode(resource_group),
                provider_path
            ),
            api_version,
        )
    }
}
