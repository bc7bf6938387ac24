//! Yahoo Finance market data provider.
//!
//! Talks to the public query1.finance.yahoo.com endpoints:
//! - `/v8/finance/chart/{symbol}` for chart documents and daily history
//! - `/v1/finance/search` for keyword search
//! - `/v10/finance/quoteSummary/{symbol}` for module-based summaries
//!
//! The quoteSummary endpoint requires crumb/cookie authentication; the crumb
//! is cached process-wide and cleared when Yahoo rejects it.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{HistoricalQuote, LiveQuote};
use crate::provider::MarketDataProvider;

use models::{YahooApiError, YahooChartResponse, YahooQuoteSummaryResult};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Process-wide cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
///
/// Built once at process start; the server holds it behind the
/// [`MarketDataProvider`] trait for the lifetime of the process.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get cookie: {}", e),
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get(format!("{}/v1/test/getcrumb", BASE_URL))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to get crumb: {}", e),
            })?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    // ========================================================================
    // Document Fetching
    // ========================================================================

    /// Fetch a chart document for the given symbol and range.
    ///
    /// Yahoo returns the embedded `chart.error` object with a non-2xx status
    /// for unknown symbols, so the body is parsed regardless of status.
    async fn chart_document(
        &self,
        symbol: &str,
        interval: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Value, MarketDataError> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval={}&period1={}&period2={}&events=div%7Csplit",
            BASE_URL,
            encode(symbol),
            encode(interval),
            period1,
            period2
        );

        let document: Value = self.client.get(&url).send().await?.json().await.map_err(
            |e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse chart response: {}", e),
            },
        )?;

        if let Some(error) = embedded_error(&document, "chart") {
            return Err(api_error_to_market(symbol, &error));
        }

        Ok(document)
    }

    /// Fetch a quoteSummary result object for the given modules.
    async fn quote_summary_document(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<Value, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            BASE_URL,
            encode(symbol),
            encode(&modules.join(",")),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }

        let document: Value =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse quoteSummary response: {}", e),
                })?;

        if let Some(error) = embedded_error(&document, "quoteSummary") {
            return Err(api_error_to_market(symbol, &error));
        }

        document
            .pointer("/quoteSummary/result/0")
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn live_quote(&self, symbol: &str) -> Result<LiveQuote, MarketDataError> {
        debug!("Fetching live quote for {} from Yahoo", symbol);

        let result = self
            .quote_summary_document(symbol, &["price", "summaryDetail"])
            .await?;

        let result: YahooQuoteSummaryResult =
            serde_json::from_value(result).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse quote modules: {}", e),
            })?;

        summary_to_live_quote(symbol, &result)
    }

    async fn chart(
        &self,
        symbol: &str,
        interval: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Value, MarketDataError> {
        debug!(
            "Fetching {} chart for {} between {} and {} from Yahoo",
            interval, symbol, period1, period2
        );
        self.chart_document(symbol, interval, period1, period2)
            .await
    }

    async fn search(&self, query: &str) -> Result<Value, MarketDataError> {
        debug!("Searching Yahoo for '{}'", query);

        let url = format!("{}/v1/finance/search?q={}", BASE_URL, encode(query));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Search returned status {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse search response: {}", e),
            })
    }

    async fn quote_summary(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<Value, MarketDataError> {
        debug!(
            "Fetching quoteSummary modules [{}] for {} from Yahoo",
            modules.join(","),
            symbol
        );
        self.quote_summary_document(symbol, modules).await
    }

    async fn daily_history(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
    ) -> Result<Vec<HistoricalQuote>, MarketDataError> {
        debug!(
            "Fetching daily history for {} between {} and {} from Yahoo",
            symbol, period1, period2
        );

        let document = self.chart_document(symbol, "1d", period1, period2).await?;

        let response: YahooChartResponse =
            serde_json::from_value(document).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse chart document: {}", e),
            })?;

        let result = response
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        let bars = bars_from_chart(&result);
        if bars.is_empty() {
            warn!(
                "No daily bars returned for '{}' between {} and {}",
                symbol, period1, period2
            );
            return Err(MarketDataError::NoDataForRange);
        }

        Ok(bars)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract the embedded error object from a Yahoo document, if present.
fn embedded_error(document: &Value, root: &str) -> Option<YahooApiError> {
    let error = document.get(root)?.get("error")?;
    if error.is_null() {
        return None;
    }
    serde_json::from_value(error.clone()).ok()
}

/// Map a Yahoo API error object to a MarketDataError.
fn api_error_to_market(symbol: &str, error: &YahooApiError) -> MarketDataError {
    if error.code.as_deref() == Some("Not Found") {
        return MarketDataError::SymbolNotFound(symbol.to_string());
    }
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: error
            .description
            .clone()
            .or_else(|| error.code.clone())
            .unwrap_or_else(|| "Unknown Yahoo error".to_string()),
    }
}

/// Map a quoteSummary result (price + summaryDetail) to a LiveQuote.
fn summary_to_live_quote(
    symbol: &str,
    result: &YahooQuoteSummaryResult,
) -> Result<LiveQuote, MarketDataError> {
    let price = result
        .price
        .as_ref()
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;
    let detail = result.summary_detail.as_ref();

    let regular_market_price = price
        .regular_market_price
        .as_ref()
        .and_then(|p| p.raw)
        .and_then(Decimal::from_f64_retain)
        .ok_or_else(|| MarketDataError::ValidationFailed {
            message: format!("No valid price for {}", symbol),
        })?;

    Ok(LiveQuote {
        symbol: price.symbol.clone().unwrap_or_else(|| symbol.to_string()),
        short_name: price.short_name.clone(),
        long_name: price.long_name.clone(),
        currency: price.currency.clone(),
        regular_market_price,
        regular_market_change_percent: to_decimal(
            price.regular_market_change_percent.as_ref().and_then(|p| p.raw),
        ),
        regular_market_previous_close: to_decimal(
            price.regular_market_previous_close.as_ref().and_then(|p| p.raw),
        ),
        regular_market_time: price.regular_market_time,
        dividend_yield: to_decimal(detail.and_then(|d| d.dividend_yield.as_ref()).and_then(|p| p.raw)),
        fifty_two_week_low: to_decimal(
            detail.and_then(|d| d.fifty_two_week_low.as_ref()).and_then(|p| p.raw),
        ),
        fifty_two_week_high: to_decimal(
            detail.and_then(|d| d.fifty_two_week_high.as_ref()).and_then(|p| p.raw),
        ),
        average_volume: to_decimal(detail.and_then(|d| d.average_volume.as_ref()).and_then(|p| p.raw)),
        market_cap: to_decimal(price.market_cap.as_ref().and_then(|p| p.raw)),
    })
}

/// Zip a chart result's parallel arrays into daily bars.
///
/// Sessions with a null close are skipped (Yahoo emits them for halted or
/// not-yet-settled days).
fn bars_from_chart(result: &models::YahooChartResult) -> Vec<HistoricalQuote> {
    let quote = match result.indicators.quote.first() {
        Some(q) => q,
        None => return Vec::new(),
    };
    let adjclose = result.indicators.adjclose.first();

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let close = quote
                .close
                .get(i)
                .copied()
                .flatten()
                .and_then(Decimal::from_f64_retain)?;
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(HistoricalQuote {
                date,
                open: to_decimal(quote.open.get(i).copied().flatten()),
                high: to_decimal(quote.high.get(i).copied().flatten()),
                low: to_decimal(quote.low.get(i).copied().flatten()),
                close,
                adj_close: to_decimal(adjclose.and_then(|a| a.adjclose.get(i).copied().flatten())),
                volume: to_decimal(quote.volume.get(i).copied().flatten()),
            })
        })
        .collect()
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64_retain)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_summary_result() -> YahooQuoteSummaryResult {
        serde_json::from_value(serde_json::json!({
            "price": {
                "symbol": "PETR4.SA",
                "currency": "BRL",
                "shortName": "PETROBRAS   PN      N2",
                "longName": "Petróleo Brasileiro S.A. - Petrobras",
                "regularMarketPrice": {"raw": 38.12, "fmt": "38.12"},
                "regularMarketChangePercent": {"raw": 0.0125, "fmt": "1.25%"},
                "regularMarketPreviousClose": {"raw": 37.65, "fmt": "37.65"},
                "regularMarketTime": 1717800000,
                "marketCap": {"raw": 495000000000.0, "fmt": "495B"}
            },
            "summaryDetail": {
                "dividendYield": {"raw": 0.125, "fmt": "12.50%"},
                "fiftyTwoWeekLow": {"raw": 30.41, "fmt": "30.41"},
                "fiftyTwoWeekHigh": {"raw": 42.95, "fmt": "42.95"},
                "averageVolume": {"raw": 45123456.0, "fmt": "45.12M"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_to_live_quote_maps_all_fields() {
        let result = sample_summary_result();
        let quote = summary_to_live_quote("PETR4.SA", &result).unwrap();

        assert_eq!(quote.symbol, "PETR4.SA");
        assert_eq!(quote.currency.as_deref(), Some("BRL"));
        assert_eq!(quote.regular_market_price, dec!(38.12));
        assert_eq!(quote.dividend_yield, Some(dec!(0.125)));
        assert_eq!(quote.fifty_two_week_low, Some(dec!(30.41)));
        assert_eq!(quote.fifty_two_week_high, Some(dec!(42.95)));
        assert_eq!(quote.average_volume, Some(dec!(45123456)));
        assert_eq!(quote.regular_market_time, Some(1717800000));
    }

    #[test]
    fn test_summary_to_live_quote_requires_price() {
        let result: YahooQuoteSummaryResult = serde_json::from_value(serde_json::json!({
            "price": {
                "symbol": "^BVSP",
                "currency": "BRL",
                "regularMarketPrice": {}
            }
        }))
        .unwrap();

        let err = summary_to_live_quote("^BVSP", &result).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));
    }

    #[test]
    fn test_summary_to_live_quote_missing_price_module_is_not_found() {
        let result: YahooQuoteSummaryResult =
            serde_json::from_value(serde_json::json!({})).unwrap();
        let err = summary_to_live_quote("NOPE", &result).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_bars_from_chart_skips_null_closes() {
        let response: YahooChartResponse = serde_json::from_value(serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1705276800, 1705363200, 1705449600],
                    "indicators": {
                        "quote": [{
                            "open": [36.90, 37.50, 37.60],
                            "high": [37.80, 37.95, 38.00],
                            "low": [36.75, 37.10, 37.40],
                            "close": [37.55, null, 37.90],
                            "volume": [52000000.0, null, 48000000.0]
                        }],
                        "adjclose": [{"adjclose": [37.55, null, 37.90]}]
                    }
                }],
                "error": null
            }
        }))
        .unwrap();

        let result = &response.chart.result.unwrap()[0];
        let bars = bars_from_chart(result);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, dec!(37.55));
        assert_eq!(bars[0].date.to_string(), "2024-01-15");
        assert_eq!(bars[1].close, dec!(37.90));
        assert_eq!(bars[1].volume, Some(dec!(48000000)));
    }

    #[test]
    fn test_api_error_to_market_not_found() {
        let error = YahooApiError {
            code: Some("Not Found".to_string()),
            description: Some("No data found, symbol may be delisted".to_string()),
        };
        let err = api_error_to_market("NOPE.SA", &error);
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_api_error_to_market_other_codes_are_provider_errors() {
        let error = YahooApiError {
            code: Some("Internal Error".to_string()),
            description: Some("Something went wrong".to_string()),
        };
        let err = api_error_to_market("PETR4.SA", &error);
        match err {
            MarketDataError::ProviderError { provider, message } => {
                assert_eq!(provider, "YAHOO");
                assert_eq!(message, "Something went wrong");
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }
    }

    #[test]
    fn test_embedded_error_ignores_null() {
        let document = serde_json::json!({"chart": {"result": [], "error": null}});
        assert!(embedded_error(&document, "chart").is_none());

        let document = serde_json::json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "nope"}}
        });
        assert!(embedded_error(&document, "chart").is_some());
    }
}
