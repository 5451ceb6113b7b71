//! # Insight State
//!
//! The insight service plus the list currently on display.
//!
//! Every refresh is a fresh call. Overlapping refreshes are not guarded:
//! whichever completes last replaces the displayed list.

use std::sync::Arc;

use tokio::sync::Mutex;

use fiado_ai::{InsightReport, InsightService};
use fiado_core::ShopData;

/// Insight service and the last completed report.
#[derive(Clone)]
pub struct InsightState {
    service: InsightService,
    latest: Arc<Mutex<Option<InsightReport>>>,
}

impl InsightState {
    pub fn new(service: InsightService) -> Self {
        InsightState {
            service,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Checks if refreshes will call out.
    pub fn is_enabled(&self) -> bool {
        self.service.is_enabled()
    }

    /// Generates a new report from `shop` and makes it the displayed one.
    pub async fn refresh(&self, shop: &ShopData, low_stock_threshold: i64) -> InsightReport {
        let report = self
            .service
            .generate(&shop.products, &shop.customers, low_stock_threshold)
            .await;

        *self.latest.lock().await = Some(report.clone());
        report
    }

    /// The displayed report, if any refresh has completed.
    pub async fn latest(&self) -> Option<InsightReport> {
        self.latest.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiado_core::seed;

    #[tokio::test]
    async fn test_refresh_replaces_latest() {
        let state = InsightState::new(InsightService::disabled());
        assert!(state.latest().await.is_none());
        assert!(!state.is_enabled());

        let shop = ShopData::new(seed::products(), seed::customers());
        let report = state.refresh(&shop, 5).await;

        assert!(report.is_fallback());
        assert_eq!(state.latest().await, Some(report));
    }
}
