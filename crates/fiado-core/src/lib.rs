//! # fiado-core: Pure Business Logic for Fiado POS
//!
//! Everything the shop knows how to do with its two collections (products
//! and customers) lives here as pure functions over owned data. Nothing in
//! this crate touches the disk, the network or the clock on its own; callers
//! pass `now` in.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fiado POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal (apps/cli)                          │   │
//! │  │   painel · catalogo · estoque · clientes · insights · config    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fiado-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  ledger  │ │ catalog  │ │  report  │ │ receipt  │          │   │
//! │  │   │ VISTA /  │ │ sell /   │ │ painel   │ │ WhatsApp │          │   │
//! │  │   │ FIADO    │ │ add/edit │ │ numbers  │ │ text     │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │validation│ │ insight  │ │   seed   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────┐   ┌──────────────▼──────────────┐     │
//! │  │   fiado-db (SQLite docs)    │   │   fiado-ai (Gemini call)    │     │
//! │  └─────────────────────────────┘   └─────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Transaction, Insight)
//! - [`money`] - Money type in integer centavos
//! - [`error`] - Domain error types
//! - [`validation`] - Amount parsing and input rules
//! - [`ledger`] - Customer balances and transaction history
//! - [`catalog`] - Product mutations, sale, filtering
//! - [`report`] - Dashboard aggregates
//! - [`receipt`] - Message composer and deep link
//! - [`insight`] - Insight prompt, schema, response validation, fallback
//! - [`backup`] - Backup snapshot document
//! - [`seed`] - Starting catalog and customers
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use fiado_core::{ledger, seed, validation::parse_amount};
//!
//! let mut customers = seed::customers();
//! let amount = parse_amount("50").unwrap();
//!
//! // João owes R$ 45,50; paying R$ 50,00 floors the balance at zero.
//! let outcome = ledger::record_payment(&mut customers, "c1", amount, Utc::now()).unwrap();
//! assert_eq!(outcome.new_balance.cents(), 0);
//! assert_eq!(outcome.overpayment.cents(), 450);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod catalog;
pub mod error;
pub mod insight;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod report;
pub mod seed;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store name printed at the top of customer messages.
pub const DEFAULT_STORE_NAME: &str = "MERCADINHO DAVI";

/// PIN accepted when none is configured.
pub const DEFAULT_PIN: &str = "1540";

/// Number of digits in the access PIN.
pub const PIN_LENGTH: usize = 4;

/// Dashboard low-stock threshold: products with fewer units are counted.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Catalog badge: "últimas unidades" at or below this many units.
pub const LAST_UNITS_THRESHOLD: i64 = 5;

/// Inventory badge: "estoque baixo" below this many units.
pub const INVENTORY_LOW_STOCK: i64 = 10;

/// Pseudo-category that matches every product.
pub const ALL_CATEGORIES: &str = "Todos";

/// Maximum customer name length, in characters.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Maximum product name length, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum search query length, in characters.
pub const MAX_SEARCH_LEN: usize = 100;

/// How many debtors the dashboard ranks.
pub const TOP_DEBTORS: usize = 5;

/// Largest amount, price, or cost accepted from the operator
/// (R$ 100.000.000,00), in centavos.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// Largest stock count accepted for one product.
pub const MAX_STOCK: i64 = 1_000_000;

/// Largest quantity accepted on one receipt line.
pub const MAX_RECEIPT_QUANTITY: i64 = 10_000;
