//! # Settings Commands
//!
//! Backup export, full reset, and a status report.
//!
//! ## Reset Flow
//! ```text
//! fiado config resetar
//!      │
//!      ├── not confirmed ──► CONFIRMATION_REQUIRED (nothing touched)
//!      ▼
//! delete both documents (one transaction)
//!      │
//!      ▼
//! in-memory collections replaced with seed data
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use fiado_core::backup::{backup_document, backup_file_name};
use fiado_db::migrations::migration_status;
use fiado_db::DocumentInfo;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, InsightState, ShopState};

/// Where a backup went and what it holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupResponse {
    pub path: PathBuf,
    pub products: usize,
    pub customers: usize,
}

/// Collection sizes after a reset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub products: usize,
    pub customers: usize,
}

/// Diagnostics for `config status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub store_name: String,
    pub database_path: PathBuf,
    pub database_ok: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    /// Stored documents. A missing one means seed data is in use.
    pub documents: Vec<DocumentInfo>,
    pub products: usize,
    pub customers: usize,
    /// Customers whose balance differs from their history net.
    pub unreconciled_customers: usize,
    pub insights_enabled: bool,
    pub insight_model: String,
    pub low_stock_threshold: i64,
}

/// Writes both collections to `BACKUP_MERCEARIA_<dd-mm-yyyy>.json` in `dir`.
///
/// An existing file for the same day is overwritten.
pub async fn export_backup(
    shop: &ShopState,
    dir: &Path,
    today: NaiveDate,
) -> Result<BackupResponse, ApiError> {
    debug!(dir = %dir.display(), "export_backup command");

    let snapshot = shop.snapshot().await;
    let document = backup_document(&snapshot).map_err(|e| {
        error!("Backup serialization failed: {}", e);
        ApiError::internal("Falha ao gerar o backup")
    })?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(today));
    std::fs::write(&path, document)?;

    info!(path = %path.display(), "Backup written");
    Ok(BackupResponse {
        path,
        products: snapshot.products.len(),
        customers: snapshot.customers.len(),
    })
}

/// Clears all stored data and returns to seed data. Needs `confirmed`.
pub async fn reset_shop(
    db: &DbState,
    shop: &ShopState,
    confirmed: bool,
) -> Result<ResetResponse, ApiError> {
    debug!(confirmed, "reset_shop command");

    if !confirmed {
        return Err(ApiError::confirmation_required(
            "Apagar TODOS os dados e voltar aos dados iniciais? Esta ação não pode ser desfeita.",
        ));
    }

    let seed = db.inner().shop().reset().await?;
    let response = ResetResponse {
        products: seed.products.len(),
        customers: seed.customers.len(),
    };
    shop.replace(seed).await;

    warn!("Shop reset by operator");
    Ok(response)
}

/// Gathers database, collection, and insight diagnostics.
pub async fn status(
    db: &DbState,
    shop: &ShopState,
    config: &ConfigState,
    insights: &InsightState,
) -> Result<StatusResponse, ApiError> {
    debug!("status command");

    let database = db.inner();
    let (migrations_total, migrations_applied) = migration_status(database.pool()).await?;
    let documents = database.documents().list().await?;

    let (products, customers, unreconciled_customers) = shop
        .with_shop(|s| {
            (
                s.products.len(),
                s.customers.len(),
                s.customers
                    .iter()
                    .filter(|c| c.unreconciled_cents() != 0)
                    .count(),
            )
        })
        .await;

    Ok(StatusResponse {
        store_name: config.store_name.clone(),
        database_path: db.path().to_path_buf(),
        database_ok: database.health_check().await,
        migrations_total,
        migrations_applied,
        documents,
        products,
        customers,
        unreconciled_customers,
        insights_enabled: insights.is_enabled(),
        insight_model: config.insight.model.clone(),
        low_stock_threshold: config.low_stock_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{customer, product};
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use fiado_core::ShopData;

    #[tokio::test]
    async fn test_export_backup() {
        let app = AppState::for_tests().await;
        let dir = std::env::temp_dir().join(format!("fiado-backup-{}", std::process::id()));
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let response = export_backup(&app.shop, &dir, day).await.unwrap();
        assert!(response.path.ends_with("BACKUP_MERCEARIA_19-10-2026.json"));
        assert_eq!(response.products, 5);

        let text = std::fs::read_to_string(&response.path).unwrap();
        let restored: ShopData = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, app.shop.snapshot().await);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_reset_needs_confirmation_then_restores_seed() {
        let app = AppState::for_tests().await;
        customer::record_debt(&app.db, &app.shop, "c3", "10").await.unwrap();
        product::delete_product(&app.db, &app.shop, "1", true).await.unwrap();

        let err = reset_shop(&app.db, &app.shop, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(app.shop.with_shop(|s| s.products.len()).await, 4);

        let response = reset_shop(&app.db, &app.shop, true).await.unwrap();
        assert_eq!(response.products, 5);

        let memory = app.shop.snapshot().await;
        assert_eq!(memory.customers[2].balance_cents, 0);
        assert!(app.db.inner().documents().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status() {
        let app = AppState::for_tests().await;
        customer::record_debt(&app.db, &app.shop, "c3", "10").await.unwrap();

        let status = status(&app.db, &app.shop, &app.config, &app.insights)
            .await
            .unwrap();

        assert!(status.database_ok);
        assert_eq!(status.migrations_total, status.migrations_applied);
        assert_eq!(status.documents.len(), 2);
        assert_eq!(status.products, 5);
        assert!(!status.insights_enabled);
        // c1 and c2 carry seed balances with no history behind them.
        assert_eq!(status.unreconciled_customers, 2);
    }
}
