//! Insight client configuration.

use secrecy::SecretString;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Base URL of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Insight client configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct InsightConfig {
    /// API key. `None` disables the call entirely.
    pub api_key: Option<SecretString>,
    /// Model ID (e.g., gemini-3-flash-preview)
    pub model: String,
    /// API base URL, without the `/models/...` suffix
    pub endpoint: String,
}

impl InsightConfig {
    /// Configuration with the default model and endpoint.
    pub fn new(api_key: Option<SecretString>) -> Self {
        InsightConfig {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Sets the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Checks if a credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        InsightConfig::new(None)
    }
}

impl std::fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
