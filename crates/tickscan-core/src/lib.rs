//! # Tickscan Core
//!
//! Scanning engine and domain types for the Tickscan stock scanner.
//!
//! ## Overview
//!
//! This crate provides the foundational components for Tickscan:
//!
//! - **Canonical domain models** for symbols, timestamps, and quotes
//! - **Provider adapters** for Polygon, Financial Modeling Prep, and a
//!   deterministic demo generator
//! - **TTL-bucketed quote cache** shared across scan passes
//! - **Batched concurrent fetcher** with per-fetch timeouts
//! - **Scan catalog** of named predicates, composite scoring, and ranking
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Polygon, FMP, demo) |
//! | [`cache`] | TTL-bucketed quote cache |
//! | [`config`] | Environment-first configuration |
//! | [`domain`] | Domain models (Symbol, UtcDateTime, Quote) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider`] | Provider trait and fetch outcomes |
//! | [`scanner`] | Scan pipeline: fetch, filter, score, rank |
//! | [`throttling`] | Rate limiting support |
//! | [`universe`] | Symbol universe reference data |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickscan_core::config::ScannerConfig;
//! use tickscan_core::scanner::{ScanRequest, ScanType, Scanner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scanner = Scanner::from_config(&ScannerConfig::from_env());
//!     let request = ScanRequest::new(ScanType::TopGainers).with_limit(10);
//!     let outcome = scanner.scan(&request).await;
//!     for stock in &outcome.stocks {
//!         println!("{} {:.1}", stock.quote.symbol, stock.score);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Scanner        │────▶│ Symbol Universe  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Batch Fetcher   │────▶│ TTL Quote Cache  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Quote Provider  │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/none)   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Per-symbol fetch problems are data, not errors: they surface as
//! [`provider::FetchOutcome::Failed`] values and a scan pass always
//! completes. Contract violations (bad parameters, malformed inputs)
//! return structured [`ValidationError`]s at the boundary.
//!
//! ## Security
//!
//! - API keys are read from environment variables only (never logged)
//! - Input validation on all domain types

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod scanner;
pub mod throttling;
pub mod universe;

// Re-export commonly used types at crate root for convenience

// Adapter implementations
pub use adapters::{DemoProvider, FmpProvider, PolygonProvider};

// Caching
pub use cache::{CacheKey, MemoryQuoteCache, QuoteCache};

// Configuration
pub use config::ScannerConfig;

// Domain models
pub use domain::{Quote, Symbol, UtcDateTime};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Provider contracts
pub use provider::{FailureReason, FetchFailure, FetchOutcome, ProviderId, QuoteProvider};

// Scanning pipeline
pub use scanner::{
    MarketSummary, ScanFilters, ScanOutcome, ScanRequest, ScanType, Scanner, ScoreBreakdown,
    ScoredQuote, SummaryEntry,
};

// Throttling
pub use throttling::RateGate;

// Universe reference data
pub use universe::{SymbolUniverse, UniverseEntry};
