//! Bolsa Market Data Crate
//!
//! Upstream-provider adapter for the Bolsa API server. Wraps the Yahoo
//! Finance HTTP endpoints behind the [`MarketDataProvider`] trait so the
//! server layer never talks to the network directly.
//!
//! # Overview
//!
//! The crate supports the five upstream operations the API façade needs:
//! - Live quote snapshot (quoteSummary `price` + `summaryDetail` modules)
//! - Raw chart documents for arbitrary intervals
//! - Keyword symbol search
//! - quoteSummary documents for a caller-chosen module list
//! - Daily historical bars parsed into typed rows
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - The provider seam (mockable in server tests)
//! - [`YahooProvider`] - The single concrete implementation
//! - [`LiveQuote`] - Typed snapshot of one security
//! - [`HistoricalQuote`] - One daily OHLCV bar
//! - [`MarketDataError`] - Error enum for all provider operations

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{HistoricalQuote, LiveQuote};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
