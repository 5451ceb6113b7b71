//! # Commands Module
//!
//! One async function per operator action. The router (one-shot
//! subcommands) and the interactive shell both call these.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── PIN gate, session open/close
//! ├── dashboard.rs  ◄─── Home screen aggregates
//! ├── product.rs    ◄─── Catalog, sale, inventory CRUD
//! ├── customer.rs   ◄─── Accounts, payments, credit, messages
//! ├── insight.rs    ◄─── Generated suggestions
//! └── settings.rs   ◄─── Backup, reset, status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ fiado clientes pagar c1 12,50        fiado> clientes pagar c1 12,50  │
//! │         │                                       │                       │
//! │         └──────────────┬────────────────────────┘                       │
//! │                        ▼                                                │
//! │  clap parses into Command::Clientes(CustomerAction::Pagar { .. })       │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  router checks the session, then calls                                  │
//! │  customer::record_payment(&db, &shop, "c1", "12,50")                    │
//! │      -> Result<LedgerResponse, ApiError>                                │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  view renders text (or JSON with --json) on stdout                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only reads the collections
//! async fn list_customers(shop: &ShopState, query: &str)
//!
//! // Mutates: needs the database for write-through
//! async fn record_payment(db: &DbState, shop: &ShopState, ...)
//! ```

pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod insight;
pub mod product;
pub mod settings;
