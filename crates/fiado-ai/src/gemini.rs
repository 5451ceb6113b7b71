//! Gemini API client.
//!
//! One non-streaming `generateContent` call per insight refresh. No retry,
//! no timeout beyond what the transport does by default.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::InsightConfig;
use crate::error::{ApiErrorResponse, InsightError};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl GeminiClient {
    /// Creates a client for `config.model` at `config.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key contains characters that cannot go in
    /// a header, or `Http` if the HTTP client cannot be built.
    pub fn new(api_key: &SecretString, config: &InsightConfig) -> Result<Self, InsightError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| InsightError::InvalidKey(e.to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                url: generate_url(&config.endpoint, &config.model),
            }),
        })
    }

    /// The model this client talks to.
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Sends `prompt` with a structured-output `schema`; returns the text of
    /// the first candidate.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, unparseable bodies and
    /// candidates without text.
    #[instrument(skip(self, prompt, schema), fields(model = %self.inner.model))]
    pub async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, InsightError> {
        let request = GenerateContentRequest::json_prompt(prompt, schema.clone());

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received generateContent response");

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| InsightError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.first_text().ok_or(InsightError::EmptyResponse)
    }
}

fn generate_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

async fn error_for_status(status: reqwest::StatusCode, response: reqwest::Response) -> InsightError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return InsightError::RateLimited;
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return InsightError::Unauthorized(status.to_string());
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => InsightError::Api {
                status: api_error.error.status,
                message: api_error.error.message,
            },
            Err(_) => InsightError::Api {
                status: status.to_string(),
                message: body,
            },
        },
        Err(e) => InsightError::Http(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        assert_eq!(
            generate_url("https://generativelanguage.googleapis.com/v1beta/", "gemini-3-flash-preview"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_client_rejects_bad_header_key() {
        let config = InsightConfig::default();
        let key = SecretString::from("line\nbreak".to_string());
        assert!(matches!(
            GeminiClient::new(&key, &config),
            Err(InsightError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_client_builds() {
        let config = InsightConfig::default().model("gemini-test");
        let key = SecretString::from("abc123".to_string());
        let client = GeminiClient::new(&key, &config).unwrap();
        assert_eq!(client.model(), "gemini-test");
    }
}
