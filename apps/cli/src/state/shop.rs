//! # Shop State
//!
//! Holds the two collections (products, customers) for the whole process.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ShopState::apply                                     │
//! │                                                                         │
//! │  lock ──► clone current ──► run core operation on the clone             │
//! │                                   │                                     │
//! │                    Err ◄──────────┤  (current untouched)                │
//! │                                   ▼                                     │
//! │                     unchanged? ──► return (no write)                    │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │            save both documents in ONE transaction                       │
//! │                                   │                                     │
//! │                    Err ◄──────────┤  (current untouched)                │
//! │                                   ▼                                     │
//! │                     swap clone in as current ──► unlock                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The collections live behind `Arc<tokio::sync::Mutex<_>>`. The lock is held
//! across the database write, so mutations are applied one at a time and
//! the in-memory copy never runs ahead of what is stored.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use fiado_core::{CoreError, ShopData};

use crate::error::ApiError;
use crate::state::DbState;

/// Shared handle to the shop collections.
#[derive(Debug, Clone)]
pub struct ShopState {
    shop: Arc<Mutex<ShopData>>,
}

impl ShopState {
    /// Wraps collections loaded at startup.
    pub fn new(shop: ShopData) -> Self {
        ShopState {
            shop: Arc::new(Mutex::new(shop)),
        }
    }

    /// Returns a copy of the current collections.
    pub async fn snapshot(&self) -> ShopData {
        self.shop.lock().await.clone()
    }

    /// Runs a read-only closure against the current collections.
    pub async fn with_shop<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ShopData) -> R,
    {
        let shop = self.shop.lock().await;
        f(&shop)
    }

    /// Applies a mutation with write-through.
    ///
    /// The closure works on a copy. The copy replaces the current
    /// collections only after both documents are stored.
    pub async fn apply<F, R>(&self, db: &DbState, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut ShopData) -> Result<R, CoreError>,
    {
        let mut current = self.shop.lock().await;
        let mut next = current.clone();

        let result = f(&mut next)?;

        if next == *current {
            debug!("Mutation left the shop unchanged, skipping write");
            return Ok(result);
        }

        db.inner().shop().save(&next).await?;
        *current = next;

        Ok(result)
    }

    /// Replaces the collections wholesale (after a reset).
    pub async fn replace(&self, shop: ShopData) {
        *self.shop.lock().await = shop;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fiado_core::{ledger, seed, Money};
    use fiado_db::{Database, DbConfig};

    async fn setup() -> (DbState, ShopState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.shop().load().await.unwrap();
        (DbState::new(db, ":memory:"), ShopState::new(shop))
    }

    #[tokio::test]
    async fn test_apply_writes_through() {
        let (db, shop) = setup().await;

        shop.apply(&db, |s| {
            ledger::record_debt(&mut s.customers, "c3", Money::from_cents(1000), Utc::now())
        })
        .await
        .unwrap();

        let stored = db.inner().shop().load().await.unwrap();
        let memory = shop.snapshot().await;
        assert_eq!(stored, memory);
        assert_eq!(memory.customers[2].balance_cents, 1000);
    }

    #[tokio::test]
    async fn test_failed_operation_leaves_state_untouched() {
        let (db, shop) = setup().await;
        let before = shop.snapshot().await;

        let err = shop
            .apply(&db, |s| {
                ledger::record_payment(&mut s.customers, "nobody", Money::from_cents(100), Utc::now())
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
        assert_eq!(shop.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_unchanged_result_skips_write() {
        let (db, shop) = setup().await;

        shop.apply(&db, |_| Ok(())).await.unwrap();

        // Nothing was stored, so the documents table is still empty.
        assert!(db.inner().documents().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace() {
        let (_db, shop) = setup().await;
        shop.replace(ShopData::default()).await;
        assert!(shop.with_shop(|s| s.products.is_empty()).await);

        shop.replace(ShopData::new(seed::products(), seed::customers())).await;
        assert_eq!(shop.with_shop(|s| s.customers.len()).await, 3);
    }
}
