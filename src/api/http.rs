//! HTTP utilities for the Oktawave JSON API

use crate::error::{ApiError, ResolveError};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Maximum length of an untyped error shown to the user
const MAX_ERROR_LENGTH: usize = 120;

const USER_AGENT: &str = concat!("oktawave-cli/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
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

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP client wrapper for one API service endpoint
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
    base: Url,
    username: String,
    password: String,
}

impl ApiHttpClient {
    /// Create a client posting to methods below `base`
    pub fn new(base: Url, username: &str, password: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base,
            username: format!("API\\{}", username),
            password: password.to_string(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(method)
            .with_context(|| format!("Invalid API method name: {}", method))
    }

    /// Call a remote method with named parameters
    pub async fn call(&self, method: &str, params: &Value) -> Result<Value> {
        let url = self.method_url(method)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(params)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Status {
                method: method.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        tracing::trace!("{} response: {}", method, sanitize_for_log(&body));
        let value: Value = serde_json::from_str(&body).context("Failed to parse response JSON")?;
        Ok(unwrap_result(method, value))
    }
}

/// Strip the `{"<Method>Result": ...}` envelope the service wraps replies in
fn unwrap_result(method: &str, value: Value) -> Value {
    let key = format!("{}Result", method);
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(&key) => {
            map.remove(&key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Format an API error for display
/// Typed errors are shown verbatim, HTTP statuses get generic messages and
/// anything else is stripped of control characters and shortened
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(ResolveError::Upstream(inner)) = error.downcast_ref::<ResolveError>() {
        return format_api_error(inner);
    }

    if let Some(ApiError::Status { status, .. }) = error.downcast_ref::<ApiError>() {
        return match status {
            401 => "Authentication failed. Check your Oktawave username and password.".to_string(),
            403 => "Permission denied.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            500 | 503 => "Oktawave service temporarily unavailable. Please try again.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        };
    }

    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return api_error.to_string();
    }
    if let Some(resolve_error) = error.downcast_ref::<ResolveError>() {
        return resolve_error.to_string();
    }

    let error_str = error.to_string();
    let mut chars = error_str.chars().filter(|c| !c.is_control());
    let sanitized: String = chars.by_ref().take(MAX_ERROR_LENGTH).collect();

    if chars.next().is_some() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
