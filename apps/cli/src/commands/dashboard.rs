//! # Dashboard Command
//!
//! The home screen numbers: money owed, money received, stock to watch.

use tracing::debug;

use fiado_core::report::DashboardReport;

use crate::error::ApiError;
use crate::state::{ConfigState, ShopState};

/// Builds the dashboard from the current collections.
pub async fn dashboard(shop: &ShopState, config: &ConfigState) -> Result<DashboardReport, ApiError> {
    debug!("dashboard command");

    let report = shop
        .with_shop(|s| DashboardReport::build(&s.products, &s.customers, config.low_stock_threshold))
        .await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::customer;
    use crate::error::ErrorCode;
    use crate::state::AppState;

    #[tokio::test]
    async fn test_dashboard_tracks_ledger() {
        let app = AppState::for_tests().await;

        let before = dashboard(&app.shop, &app.config).await.unwrap();
        assert_eq!(before.total_receivable.cents(), 4550 + 1200);
        assert_eq!(before.debtor_count, 2);
        assert_eq!(before.payments_received.cents(), 0);
        assert_eq!(before.top_debtors[0].first_name, "João");

        customer::record_payment(&app.db, &app.shop, "c2", "12")
            .await
            .unwrap();

        let after = dashboard(&app.shop, &app.config).await.unwrap();
        assert_eq!(after.total_receivable.cents(), 4550);
        assert_eq!(after.debtor_count, 1);
        assert_eq!(after.payments_received.cents(), 1200);
    }

    #[tokio::test]
    async fn test_overflowing_stored_values_are_an_error() {
        let app = AppState::for_tests().await;
        // Stored documents are not re-validated on load.
        let mut shop = app.shop.snapshot().await;
        shop.products[0].price_cents = 100_000_000;
        shop.products[0].stock = 100_000_000_000;
        app.shop.replace(shop).await;

        let err = dashboard(&app.shop, &app.config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
