//! Ticker rows for the financial source.
//!
//! The quotes endpoint answers with an object of closing prices per symbol,
//! oldest first:
//!
//! ```text
//! { "BTC-USD": [66012.5, 67234.56], "CNY=X": [7.21, 7.19] }
//! ```
//!
//! [`FinanceFetcher`] turns that into one display-ready row per configured
//! ticker, in configuration order. A symbol with no usable closes still gets
//! a row, with the missing placeholder as its price.

use async_trait::async_trait;
use inkdash_core::display::{format_change, format_price, percent_change};
use inkdash_core::{Record, SourceFetchError, TickerSpec};
use inkdash_sources::SourceFetcher;
use serde_json::{json, Value};

use crate::http::HttpJsonFetcher;

/// Wraps the quotes fetcher and formats its payload per ticker.
#[derive(Debug, Clone)]
pub struct FinanceFetcher {
    inner: HttpJsonFetcher,
    tickers: Vec<TickerSpec>,
}

impl FinanceFetcher {
    pub fn new(inner: HttpJsonFetcher, tickers: Vec<TickerSpec>) -> Self {
        Self { inner, tickers }
    }

    pub fn tickers(&self) -> &[TickerSpec] {
        &self.tickers
    }
}

#[async_trait]
impl SourceFetcher for FinanceFetcher {
    async fn fetch(&self) -> Result<Record, SourceFetchError> {
        let record = self.inner.fetch().await?;
        let payload = record
            .as_json()
            .ok_or_else(|| SourceFetchError::malformed("quotes payload is not JSON"))?;
        summarize(&self.tickers, payload).map(Record::json)
    }
}

/// Build the ticker rows from a quotes payload.
///
/// Fails only when the payload is not an object.
pub fn summarize(tickers: &[TickerSpec], payload: &Value) -> Result<Value, SourceFetchError> {
    let quotes = payload
        .as_object()
        .ok_or_else(|| SourceFetchError::malformed("quotes payload must be an object"))?;

    let rows = tickers
        .iter()
        .map(|ticker| {
            let closes: Vec<f64> = quotes
                .get(&ticker.symbol)
                .and_then(Value::as_array)
                .map(|series| series.iter().filter_map(Value::as_f64).collect())
                .unwrap_or_default();

            let change = match (closes.first(), closes.last()) {
                (Some(&first), Some(&last)) => percent_change(first, last),
                _ => 0.0,
            };
            if closes.is_empty() {
                tracing::debug!(symbol = %ticker.symbol, "No closes for ticker");
            }

            json!({
                "name": ticker.name,
                "symbol": ticker.symbol,
                "price": format_price(&ticker.name, closes.last().copied()),
                "change": change,
                "change_str": format_change(change),
                "closes": closes,
            })
        })
        .collect();

    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers() -> Vec<TickerSpec> {
        vec![
            TickerSpec::new("SGDCNY=X", "SGD/CNY"),
            TickerSpec::new("BTC-USD", "BTC/USD"),
        ]
    }

    #[test]
    fn test_rows_follow_ticker_order() {
        let payload = json!({
            "BTC-USD": [60000.0, 63000.0],
            "SGDCNY=X": [5.4, 5.37219],
        });
        let rows = summarize(&tickers(), &payload).unwrap();
        let rows = rows.as_array().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "SGD/CNY");
        assert_eq!(rows[0]["price"], "5.3722");
        assert_eq!(rows[1]["name"], "BTC/USD");
        assert_eq!(rows[1]["price"], "63,000");
        assert_eq!(rows[1]["change_str"], "+5.00%");
        assert!((rows[1]["change"].as_f64().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_symbol_gets_placeholder_row() {
        let payload = json!({ "BTC-USD": [1.0, 2.0], "SGDCNY=X": [] });
        let rows = summarize(&tickers(), &payload).unwrap();

        assert_eq!(rows[0]["price"], "--");
        assert_eq!(rows[0]["change"], 0.0);
        assert_eq!(rows[0]["change_str"], "+0.00%");

        let rows = summarize(&tickers(), &json!({})).unwrap();
        assert!(rows.as_array().unwrap().iter().all(|r| r["price"] == "--"));
    }

    #[test]
    fn test_non_numeric_closes_are_skipped() {
        let payload = json!({ "SGDCNY=X": [null, 5.0, "x", 5.5] });
        let rows = summarize(&tickers(), &payload).unwrap();
        assert_eq!(rows[0]["price"], "5.5000");
        assert_eq!(rows[0]["change_str"], "+10.00%");
    }

    #[test]
    fn test_zero_reference_price_is_flat() {
        let payload = json!({ "SGDCNY=X": [0.0, 5.0] });
        let rows = summarize(&tickers(), &payload).unwrap();
        assert_eq!(rows[0]["change"], 0.0);
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let err = summarize(&tickers(), &json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), "malformed_payload");
    }
}
