//! Insight service: prompt in, validated insights out, never an error.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate(products, customers)                                          │
//! │       │                                                                 │
//! │       ├── no credential ─────────────────► fallback (Unconfigured)      │
//! │       ▼                                                                 │
//! │  backend.generate(prompt, schema)                                       │
//! │       ├── Err (transport, status, empty) ─► fallback (Unavailable)      │
//! │       ▼                                                                 │
//! │  parse_insights(text)                                                   │
//! │       ├── Err (not JSON / not array) ────► fallback (Unavailable)       │
//! │       ├── 0 valid ───────────────────────► fallback (Unavailable)       │
//! │       ▼                                                                 │
//! │  Generated(insights)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use fiado_core::insight::{build_prompt, fallback_insights, parse_insights, response_schema, FallbackReason};
use fiado_core::{Customer, Insight, Product};

use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::gemini::GeminiClient;

// =============================================================================
// Backend
// =============================================================================

/// Something that can turn a prompt into model text.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, InsightError>;
}

#[async_trait]
impl InsightBackend for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, InsightError> {
        GeminiClient::generate(self, prompt, schema).await
    }
}

// =============================================================================
// Report
// =============================================================================

/// Where a list of insights came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightSource {
    Generated,
    Fallback(FallbackReason),
}

/// Insights ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub source: InsightSource,
    /// Elements of the model's answer that failed validation.
    pub dropped: usize,
}

impl InsightReport {
    fn fallback(reason: FallbackReason) -> Self {
        InsightReport {
            insights: fallback_insights(reason),
            source: InsightSource::Fallback(reason),
            dropped: 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, InsightSource::Fallback(_))
    }
}

// =============================================================================
// Service
// =============================================================================

/// Insight service.
#[derive(Clone)]
pub struct InsightService {
    backend: Option<Arc<dyn InsightBackend>>,
}

impl InsightService {
    /// Builds the service from configuration.
    ///
    /// Without a credential, or with one that cannot be used, every call
    /// returns the fallback.
    pub fn from_config(config: &InsightConfig) -> Self {
        let Some(api_key) = &config.api_key else {
            warn!("No AI API key configured; insights are disabled");
            return InsightService::disabled();
        };

        match GeminiClient::new(api_key, config) {
            Ok(client) => InsightService::with_backend(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "Insight client could not be created; insights are disabled");
                InsightService::disabled()
            }
        }
    }

    /// A service that always returns the unconfigured fallback.
    pub fn disabled() -> Self {
        InsightService { backend: None }
    }

    /// A service over any backend.
    pub fn with_backend(backend: Arc<dyn InsightBackend>) -> Self {
        InsightService {
            backend: Some(backend),
        }
    }

    /// Checks if calls will actually be made.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Generates insights for the current shop state.
    ///
    /// Every failure is logged and replaced by the fallback; this never
    /// returns an error.
    pub async fn generate(
        &self,
        products: &[Product],
        customers: &[Customer],
        low_stock_threshold: i64,
    ) -> InsightReport {
        let Some(backend) = &self.backend else {
            return InsightReport::fallback(FallbackReason::Unconfigured);
        };

        let prompt = build_prompt(products, customers, low_stock_threshold);
        let start = Instant::now();

        let text = match backend.generate(&prompt, &response_schema()).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Insight request failed, showing fallback");
                return InsightReport::fallback(FallbackReason::Unavailable);
            }
        };

        let parsed = match parse_insights(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Insight response unusable, showing fallback");
                return InsightReport::fallback(FallbackReason::Unavailable);
            }
        };

        for reason in &parsed.rejected {
            warn!(reason = %reason, "Dropped invalid insight");
        }

        if parsed.insights.is_empty() {
            warn!("No valid insights in response, showing fallback");
            return InsightReport::fallback(FallbackReason::Unavailable);
        }

        info!(
            count = parsed.insights.len(),
            dropped = parsed.rejected.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Insights generated"
        );

        InsightReport {
            insights: parsed.insights,
            source: InsightSource::Generated,
            dropped: parsed.rejected.len(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fiado_core::{seed, InsightKind, InsightPriority, LOW_STOCK_THRESHOLD};
    use std::sync::Mutex;

    /// Returns a fixed answer and remembers the prompt it was given.
    struct FixedBackend {
        answer: Result<String, String>,
        seen_prompt: Mutex<Option<String>>,
    }

    impl FixedBackend {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(FixedBackend {
                answer: Ok(text.to_string()),
                seen_prompt: Mutex::new(None),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(FixedBackend {
                answer: Err(message.to_string()),
                seen_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl InsightBackend for FixedBackend {
        async fn generate(&self, prompt: &str, schema: &Value) -> Result<String, InsightError> {
            assert_eq!(schema["type"], "ARRAY");
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            self.answer
                .clone()
                .map_err(|message| InsightError::Api {
                    status: "UNAVAILABLE".to_string(),
                    message,
                })
        }
    }

    async fn run(service: &InsightService) -> InsightReport {
        service
            .generate(&seed::products(), &seed::customers(), LOW_STOCK_THRESHOLD)
            .await
    }

    fn assert_single_fallback(report: &InsightReport) {
        assert!(report.is_fallback());
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].kind, InsightKind::Financial);
        assert_eq!(report.insights[0].priority, InsightPriority::Medium);
    }

    #[tokio::test]
    async fn test_disabled_returns_unconfigured_fallback() {
        let report = run(&InsightService::disabled()).await;
        assert_single_fallback(&report);
        assert_eq!(report.source, InsightSource::Fallback(FallbackReason::Unconfigured));
    }

    #[tokio::test]
    async fn test_from_config_without_key_is_disabled() {
        let service = InsightService::from_config(&InsightConfig::default());
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_backend_error_is_absorbed() {
        let service = InsightService::with_backend(FixedBackend::failing("network down"));
        let report = run(&service).await;

        assert_single_fallback(&report);
        assert_eq!(report.source, InsightSource::Fallback(FallbackReason::Unavailable));
    }

    #[tokio::test]
    async fn test_garbage_text_is_absorbed() {
        let service = InsightService::with_backend(FixedBackend::ok("Claro! Aqui estão..."));
        assert_single_fallback(&run(&service).await);
    }

    #[tokio::test]
    async fn test_all_invalid_elements_fall_back() {
        let service = InsightService::with_backend(FixedBackend::ok(
            r#"[{"type":"PROMO","message":"x","priority":"ALTA"}]"#,
        ));
        assert_single_fallback(&run(&service).await);
    }

    #[tokio::test]
    async fn test_valid_response_passes_through() {
        let backend = FixedBackend::ok(
            r#"[
                {"type":"FINANCEIRO","message":"Cobrar João Silva","priority":"ALTA"},
                {"type":"REPOR","message":"Repor leite","priority":"MEDIA"},
                {"type":"CONSELHO","message":"","priority":"BAIXA"}
            ]"#,
        );
        let service = InsightService::with_backend(backend.clone());
        let report = run(&service).await;

        assert_eq!(report.source, InsightSource::Generated);
        assert_eq!(report.insights.len(), 2);
        assert_eq!(report.dropped, 1);

        let prompt = backend.seen_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("João Silva: R$ 45.50"));
    }
}
