//! # Shop Repository
//!
//! Loads and stores the two collections as JSON documents.
//!
//! ## Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(shop)                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serialize products ──┐                                                 │
//! │  serialize customers ─┤  (either fails → nothing written)               │
//! │                       ▼                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │  UPSERT kv_store['grocy_products']                              │   │
//! │  │  UPSERT kv_store['grocy_customers']                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← both documents or neither                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load
//! A key that was never written falls back to that collection's seed data.
//! A key holding something that does not parse is an error; it is never
//! papered over with seed data.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use fiado_core::{seed, ShopData};

use crate::error::{DbError, DbResult};
use crate::repository::document::DocumentRepository;

/// Key of the product collection document.
pub const PRODUCTS_KEY: &str = "grocy_products";

/// Key of the customer collection document.
pub const CUSTOMERS_KEY: &str = "grocy_customers";

/// Repository for the shop's two collections.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    documents: DocumentRepository,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository {
            documents: DocumentRepository::new(pool),
        }
    }

    /// Loads both collections, seeding whichever was never saved.
    pub async fn load(&self) -> DbResult<ShopData> {
        let products = self
            .load_collection(PRODUCTS_KEY, || seed::products_at(Utc::now()))
            .await?;
        let customers = self.load_collection(CUSTOMERS_KEY, seed::customers).await?;

        info!(
            products = products.len(),
            customers = customers.len(),
            "Shop data loaded"
        );
        Ok(ShopData::new(products, customers))
    }

    async fn load_collection<T, F>(&self, key: &str, fallback: F) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        match self.documents.get(key).await? {
            Some(text) => serde_json::from_str(&text).map_err(|e| {
                warn!(key = %key, error = %e, "Stored document does not parse");
                DbError::corrupt(key, e)
            }),
            None => {
                info!(key = %key, "No stored document, starting from seed data");
                Ok(fallback())
            }
        }
    }

    /// Writes both collections in one transaction.
    pub async fn save(&self, shop: &ShopData) -> DbResult<()> {
        let products = encode(&shop.products)?;
        let customers = encode(&shop.customers)?;

        self.documents
            .put_all(&[(PRODUCTS_KEY, products), (CUSTOMERS_KEY, customers)])
            .await
    }

    /// Deletes both documents in one transaction and returns the seed
    /// state the next load would produce.
    pub async fn reset(&self) -> DbResult<ShopData> {
        let removed = self
            .documents
            .delete_all(&[PRODUCTS_KEY, CUSTOMERS_KEY])
            .await?;

        warn!(removed, "Shop data reset to seed");
        Ok(ShopData::new(seed::products_at(Utc::now()), seed::customers()))
    }
}

fn encode<T: Serialize>(collection: &[T]) -> DbResult<String> {
    serde_json::to_string(collection).map_err(|e| DbError::Serialization(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use fiado_core::catalog::{self, ProductFields};
    use fiado_core::{ledger, Money};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_loads_seed() {
        let db = test_db().await;
        let shop = db.shop().load().await.unwrap();

        assert_eq!(shop.products.len(), 5);
        assert_eq!(shop.customers, seed::customers());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order_and_fields() {
        let db = test_db().await;
        let mut shop = db.shop().load().await.unwrap();

        let now = Utc::now();
        ledger::register_customer(&mut shop.customers, "Ana", "").unwrap();
        ledger::record_debt(&mut shop.customers, "c2", Money::from_cents(1990), now).unwrap();
        ledger::record_payment(&mut shop.customers, "c1", Money::from_cents(5000), now).unwrap();
        catalog::add_product(
            &mut shop.products,
            ProductFields {
                name: Some("Macarrão".to_string()),
                category: Some("Massas".to_string()),
                price_cents: Some(399),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        db.shop().save(&shop).await.unwrap();
        let reloaded = db.shop().load().await.unwrap();

        assert_eq!(reloaded, shop);
        assert_eq!(reloaded.customers[0].name, "Ana");
        assert_eq!(reloaded.products[0].name, "Macarrão");
    }

    #[tokio::test]
    async fn test_missing_one_key_seeds_only_that_collection() {
        let db = test_db().await;
        let mut shop = db.shop().load().await.unwrap();
        shop.products.clear();
        db.shop().save(&shop).await.unwrap();

        db.documents().delete_all(&[CUSTOMERS_KEY]).await.unwrap();

        let reloaded = db.shop().load().await.unwrap();
        assert!(reloaded.products.is_empty());
        assert_eq!(reloaded.customers.len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let db = test_db().await;
        db.documents()
            .put_all(&[(PRODUCTS_KEY, "{not json".to_string())])
            .await
            .unwrap();

        let result = db.shop().load().await;
        assert!(matches!(
            result,
            Err(DbError::CorruptDocument { ref key, .. }) if key == PRODUCTS_KEY
        ));
    }

    #[tokio::test]
    async fn test_reset_returns_seed_and_clears_store() {
        let db = test_db().await;
        let mut shop = db.shop().load().await.unwrap();
        shop.customers.clear();
        db.shop().save(&shop).await.unwrap();

        let fresh = db.shop().reset().await.unwrap();
        assert_eq!(fresh.customers.len(), 3);
        assert!(db.documents().list().await.unwrap().is_empty());

        let reloaded = db.shop().load().await.unwrap();
        assert_eq!(reloaded.customers, seed::customers());
    }
}
