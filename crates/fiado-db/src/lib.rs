//! # fiado-db: Persistence Layer for Fiado POS
//!
//! Stores the shop's products and customers in a local SQLite file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fiado POS Data Flow                              │
//! │                                                                         │
//! │  CLI command (fiado clientes pagar c1 50)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fiado-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ShopRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ DocumentRepo  │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: kv_store(grocy_products, grocy_customers)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fiado.db")).await?;
//! let mut shop = db.shop().load().await?;
//! // ... mutate a copy with fiado-core ...
//! db.shop().save(&shop).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::document::{DocumentInfo, DocumentRepository};
pub use repository::shop::{ShopRepository, CUSTOMERS_KEY, PRODUCTS_KEY};
