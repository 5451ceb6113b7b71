//! # Repository Module
//!
//! Persistence for Fiado POS.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │  db.shop().save(&next)                                          │
//! │       ▼                                                                 │
//! │  ShopRepository      typed: ShopData ⇄ two JSON documents               │
//! │  ├── load()          seed fallback per missing key                      │
//! │  ├── save(shop)      both documents, one transaction                    │
//! │  └── reset()         delete both, hand back seed data                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DocumentRepository  raw: key → JSON text                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite kv_store                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ShopRepository`](shop::ShopRepository) - Products and customers
//! - [`DocumentRepository`](document::DocumentRepository) - Key-value rows

pub mod document;
pub mod shop;
