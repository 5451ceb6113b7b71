//! # Insight Commands
//!
//! Refreshing and showing the generated suggestions.
//!
//! ```text
//! fiado insights
//!      │
//!      ▼
//! snapshot collections (lock released before the network call)
//!      │
//!      ▼
//! InsightState::refresh ──► InsightService::generate ──► report
//!      │                        (fallback on any failure)
//!      ▼
//! report replaces the displayed list
//! ```
//!
//! Never fails: a broken or missing AI setup shows the fallback entry.

use serde::Serialize;
use tracing::debug;

use fiado_ai::{InsightReport, InsightSource};
use fiado_core::Insight;

use crate::state::{ConfigState, InsightState, ShopState};

/// Insights ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    /// `true` when the list is the static fallback.
    pub fallback: bool,
    /// Model entries that failed validation and were left out.
    pub dropped: usize,
}

impl From<InsightReport> for InsightsResponse {
    fn from(report: InsightReport) -> Self {
        InsightsResponse {
            fallback: matches!(report.source, InsightSource::Fallback(_)),
            dropped: report.dropped,
            insights: report.insights,
        }
    }
}

/// Asks for a fresh set of insights.
pub async fn refresh_insights(
    shop: &ShopState,
    insights: &InsightState,
    config: &ConfigState,
) -> InsightsResponse {
    debug!(enabled = insights.is_enabled(), "refresh_insights command");

    let snapshot = shop.snapshot().await;
    insights
        .refresh(&snapshot, config.low_stock_threshold)
        .await
        .into()
}

/// The list on display, if a refresh has completed.
pub async fn latest_insights(insights: &InsightState) -> Option<InsightsResponse> {
    insights.latest().await.map(InsightsResponse::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use fiado_core::{InsightKind, InsightPriority};

    #[tokio::test]
    async fn test_refresh_without_key_shows_fallback() {
        let app = AppState::for_tests().await;
        assert!(latest_insights(&app.insights).await.is_none());

        let response = refresh_insights(&app.shop, &app.insights, &app.config).await;
        assert!(response.fallback);
        assert_eq!(response.insights.len(), 1);
        assert_eq!(response.insights[0].kind, InsightKind::Financial);
        assert_eq!(response.insights[0].priority, InsightPriority::Medium);

        let latest = latest_insights(&app.insights).await.unwrap();
        assert_eq!(latest.insights, response.insights);
    }
}
