//! # fiado-ai: Insight Client for Fiado POS
//!
//! Asks a hosted generative model (Gemini `generateContent`) for three short
//! business insights about the shop's stock and debts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI: fiado insights                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   fiado-ai (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   InsightService ──► dyn InsightBackend ──► GeminiClient        │   │
//! │  │        │                                        │ reqwest       │   │
//! │  │        │ absorbs every failure                  ▼               │   │
//! │  │        ▼                                  HTTPS POST            │   │
//! │  │   InsightReport (generated or fallback)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fiado-core::insight  prompt, schema, validation, fallback text        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failure here is decorative: it never blocks the rest of the app.

pub mod config;
pub mod error;
pub mod gemini;
pub mod service;
pub mod types;

pub use config::InsightConfig;
pub use error::InsightError;
pub use gemini::GeminiClient;
pub use service::{InsightBackend, InsightReport, InsightService, InsightSource};
