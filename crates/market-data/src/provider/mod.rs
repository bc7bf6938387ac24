//! Market data provider trait definition.

pub mod yahoo;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{HistoricalQuote, LiveQuote};

/// Trait for market data providers.
///
/// This is the seam between the HTTP server and the upstream data source:
/// the server holds an `Arc<dyn MarketDataProvider>` so tests can substitute
/// a mock without touching the network.
///
/// Operations returning [`Value`] pass the provider's JSON document through
/// untouched; the server forwards them as-is.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    ///
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote snapshot for a symbol.
    async fn live_quote(&self, symbol: &str) -> Result<LiveQuote, MarketDataError>;

    /// Fetch the raw chart document for a symbol.
    ///
    /// `interval` uses the provider's notation ("1d", "1wk", "1mo", ...);
    /// `period1`/`period2` are Unix seconds bounding the range.
    async fn chart(
        &self,
        symbol: &str,
        interval: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Value, MarketDataError>;

    /// Keyword search for symbols; returns the raw search document.
    async fn search(&self, query: &str) -> Result<Value, MarketDataError>;

    /// Fetch the raw quoteSummary result for the given module list.
    async fn quote_summary(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<Value, MarketDataError>;

    /// Fetch daily historical bars between two Unix timestamps.
    ///
    /// Bars are ordered by date ascending.
    async fn daily_history(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError>;
}
