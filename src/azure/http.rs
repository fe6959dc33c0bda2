//! HTTP utilities for Azure REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header Azure services echo back for request correlation
const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";

/// Truncate a response body and strip non-printable characters for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// How a request authenticates
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    /// `Authorization: Bearer ...` (Resource Manager)
    Bearer(&'a str),
    /// `Ocp-Apim-Subscription-Key: ...` (Cognitive Services)
    SubscriptionKey(&'a str),
}

/// HTTP client wrapper for Azure API calls
#[derive(Clone)]
pub struct AzureHttpClient {
    client: Client,
}

impl AzureHttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("azassist/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to an Azure API
    pub async fn get(&self, url: &str, auth: Auth<'_>) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = authorize(self.client.get(url), auth);
        send(request).await
    }

    /// Make a POST request to an Azure API
    pub async fn post(&self, url: &str, auth: Auth<'_>, body: Option<&Value>) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = authorize(self.client.post(url), auth);
        if let Some(body) = body {
            request = request.json(body);
        }

        send(request).await
    }
}

fn authorize(request: RequestBuilder, auth: Auth<'_>) -> RequestBuilder {
    let request = request.header(CLIENT_REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string());
    match auth {
        Auth::Bearer(token) => request.bearer_auth(token),
        Auth::SubscriptionKey(key) => request.header("Ocp-Apim-Subscription-Key", key),
    }
}

async fn send(request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.context("Failed to send request")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        // Only the truncated body is logged; it may echo request details
        tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
        return Err(ApiError::new(status).into());
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).context("Failed to parse response JSON")
}

/// Non-success HTTP status returned by an Azure endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API request failed: {}", self.status)
    }
}

impl std::error::Error for ApiError {}

fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Invalid request. Check your parameters.".to_string(),
        401 => "Authentication failed. Run 'az login' or check your service principal.".to_string(),
        403 => "Permission denied. Check the role assignments on your subscription.".to_string(),
        404 => "Resource not found.".to_string(),
        429 => "Rate limit exceeded. Please try again later.".to_string(),
        500..=599 => "Azure service temporarily unavailable. Please try again.".to_string(),
        code => format!("Request failed with HTTP {}. Please try again.", code),
    }
}

/// Format an Azure API error for display
///
/// Classifies on the typed causes in the chain; lower layers may carry
/// URLs with ids and ports, so their text is never matched or shown.
pub fn format_azure_error(error: &anyhow::Error) -> String {
    if let Some(api) = error.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        return status_message(api.status);
    }

    if let Some(http) = error.chain().find_map(|e| e.downcast_ref::<reqwest::Error>()) {
        if http.is_connect() || http.is_timeout() {
            return "Could not reach Azure. Check your network connection and try again."
                .to_string();
        }
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.contains("[truncated, 500 bytes total]"));
        assert!(out.len() < body.len());
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_format_status_errors() {
        let err = anyhow::Error::new(ApiError::new(StatusCode::FORBIDDEN));
        assert!(format_azure_error(&err).starts_with("Permission denied"));

        let err = anyhow::Error::new(ApiError::new(StatusCode::TOO_MANY_REQUESTS));
        assert!(format_azure_error(&err).starts_with("Rate limit"));

        let err = anyhow::Error::new(ApiError::new(StatusCode::BAD_GATEWAY));
        assert!(format_azure_error(&err).starts_with("Azure service temporarily unavailable"));
    }

    #[test]
    fn test_format_sees_context_chain() {
        let err = anyhow::Error::new(ApiError::new(StatusCode::UNAUTHORIZED))
            .context("Failed to list resources");
        assert!(format_azure_error(&err).starts_with("Authentication failed"));
    }

    #[test]
    fn test_digits_in_text_do_not_classify() {
        let err = anyhow::anyhow!("lookup for 5f1c4003-4000-4500 failed")
            .context("Failed to load subscription");
        assert_eq!(format_azure_error(&err), "Failed to load subscription");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::new(StatusCode::NOT_FOUND).to_string(),
            "API request failed: 404 Not Found"
        );
    }

    #[test]
    fn test_format_truncates_other_errors() {
        let err = anyhow::anyhow!("{}", "y".repeat(200));
        let out = format_azure_error(&err);
        assert!(out.ends_with("..."));
        assert_eq!(out.len(), 83);
    }
}
