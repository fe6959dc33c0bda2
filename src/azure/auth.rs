//! Azure Authentication
//!
//! Acquires bearer tokens for Azure Resource Manager from a static token,
//! a service principal client secret, or the Azure CLI.

use super::http::ApiError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Resource Manager audience used when asking the Azure CLI for a token
pub const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";

/// OAuth2 scope for the client credentials flow
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Default authority for Azure public cloud
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Where access tokens come from
#[derive(Clone)]
pub enum CredentialSource {
    /// Pre-issued bearer token (AZURE_ACCESS_TOKEN)
    Static(String),
    /// Service principal with client secret
    ClientSecret {
        authority_host: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// `az account get-access-token`
    AzureCli,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secrets
        match self {
            CredentialSource::Static(_) => f.write_str("Static(***)"),
            CredentialSource::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            CredentialSource::AzureCli => f.write_str("AzureCli"),
        }
    }
}

impl CredentialSource {
    /// Pick a credential source from the environment, falling back to the Azure CLI
    pub fn from_env(authority_host: &str) -> Self {
        if let Some(token) = non_empty_env("AZURE_ACCESS_TOKEN") {
            return CredentialSource::Static(token);
        }

        let tenant = non_empty_env("AZURE_TENANT_ID");
        let client = non_empty_env("AZURE_CLIENT_ID");
        let secret = non_empty_env("AZURE_CLIENT_SECRET");
        if let (Some(tenant_id), Some(client_id), Some(client_secret)) = (tenant, client, secret) {
            return CredentialSource::ClientSecret {
                authority_host: authority_host.trim_end_matches('/').to_string(),
                tenant_id,
                client_id,
                client_secret,
            };
        }

        CredentialSource::AzureCli
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenResponse {
    access_token: String,
}

/// Azure credentials holder with token caching
#[derive(Clone)]
pub struct AzureCredentials {
    source: CredentialSource,
    http: reqwest::Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl AzureCredentials {
    pub fn new(source: CredentialSource) -> Self {
        tracing::debug!("Using credential source: {:?}", source);
        Self {
            source,
            http: reqwest::Client::new(),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token for API calls, reusing the cached one while it is valid
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let (token, ttl) = match &self.source {
            CredentialSource::Static(token) => (token.clone(), DEFAULT_TOKEN_TTL),
            CredentialSource::ClientSecret {
                authority_host,
                tenant_id,
                client_id,
                client_secret,
            } => {
                self.client_secret_token(authority_host, tenant_id, client_id, client_secret)
                    .await?
            }
            CredentialSource::AzureCli => (azure_cli_token()?, DEFAULT_TOKEN_TTL),
        };

        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token)
    }

    async fn client_secret_token(
        &self,
        authority_host: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(String, Duration)> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority_host,
            urlencoding::encode(tenant_id)
        );
        tracing::debug!("POST {}", url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", MANAGEMENT_SCOPE),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .context("Failed to contact Azure token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Token request failed: {}", status);
            return Err(ApiError::new(status)).context("Failed to get access token");
        }

        let body: OAuthTokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        let ttl = body
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        Ok((body.access_token, ttl))
    }
}

/// Ask the Azure CLI for a Resource Manager token
fn azure_cli_token() -> Result<String> {
    tracing::info!("Executing: az account get-access-token --resource {}", MANAGEMENT_RESOURCE);

    let output = Command::new("az")
        .args([
            "account",
            "get-access-token",
            "--resource",
            MANAGEMENT_RESOURCE,
            "--output",
            "json",
        ])
        .output()
        .context("Failed to run 'az'. Install the Azure CLI or set AZURE_ACCESS_TOKEN")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::error!("az exited with {}: {}", output.status, stderr.trim());
        return Err(anyhow::anyhow!(
            "Failed to get access token from Azure CLI. Run 'az login'"
        ));
    }

    parse_cli_token(&output.stdout)
}

fn parse_cli_token(stdout: &[u8]) -> Result<String> {
    let parsed: CliTokenResponse =
        serde_json::from_slice(stdout).context("Failed to parse Azure CLI token output")?;
    Ok(parsed.access_token)
}
