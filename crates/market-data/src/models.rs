//! Public data models returned by the provider seam.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Live quote snapshot for a single security.
///
/// Backed by the quoteSummary `price` and `summaryDetail` modules; only the
/// close price is required, everything else depends on the security type
/// (indices carry no dividend yield, for instance).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveQuote {
    /// Provider symbol (e.g. "PETR4.SA", "^GSPC")
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    /// Quote currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Last regular-market trade price (required)
    pub regular_market_price: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_change_percent: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_previous_close: Option<Decimal>,

    /// Unix seconds of the last regular-market trade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_time: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<Decimal>,

    /// Average daily trading volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_volume: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
}

/// One daily OHLCV bar from the historical series.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalQuote {
    /// Trading date (UTC)
    pub date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing price (required)
    pub close: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_live_quote_serializes_camel_case() {
        let quote = LiveQuote {
            symbol: "PETR4.SA".to_string(),
            short_name: Some("PETROBRAS PN".to_string()),
            long_name: Some("Petróleo Brasileiro S.A. - Petrobras".to_string()),
            currency: Some("BRL".to_string()),
            regular_market_price: dec!(38.12),
            regular_market_change_percent: Some(dec!(1.25)),
            regular_market_previous_close: None,
            regular_market_time: Some(1_717_800_000),
            dividend_yield: Some(dec!(0.12)),
            fifty_two_week_low: Some(dec!(30.41)),
            fifty_two_week_high: Some(dec!(42.95)),
            average_volume: Some(dec!(45000000)),
            market_cap: None,
        };

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["symbol"], "PETR4.SA");
        assert_eq!(json["regularMarketChangePercent"], 1.25);
        assert_eq!(json["fiftyTwoWeekHigh"], 42.95);
        // None fields are dropped, not serialized as null
        assert!(json.get("marketCap").is_none());
        assert!(json.get("regularMarketPreviousClose").is_none());
    }

    #[test]
    fn test_historical_quote_serializes_date_and_bars() {
        let bar = HistoricalQuote {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: Some(dec!(36.90)),
            high: Some(dec!(37.80)),
            low: Some(dec!(36.75)),
            close: dec!(37.55),
            adj_close: Some(dec!(37.55)),
            volume: Some(dec!(52000000)),
        };

        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["adjClose"], 37.55);
        assert_eq!(json["close"], 37.55);
    }
}
