//! Alpha Vantage `GLOBAL_QUOTE` quotes.
//!
//! Every value in the `Global Quote` object is a string; the change percent
//! carries a trailing `%`. Alpha Vantage has no company name in this endpoint,
//! so the symbol stands in for it. Throttled or rejected calls come back as
//! HTTP 200 with `Note`, `Information` or `Error Message` and no quote.

use serde::Deserialize;
use stock_common::{Provider, QuoteError, QuoteRecord, Result};

use super::parse_number;
use crate::connection::PersistentConnection;

const QUERY_PATH: &str = "/query";

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

pub(crate) fn fetch(conn: &PersistentConnection, ticker: &str, credential: &str) -> Result<QuoteRecord> {
    let body = conn.get(
        Provider::AlphaVantage,
        QUERY_PATH,
        &[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", ticker),
            ("apikey", credential),
        ],
    )?;
    parse(ticker, &body, credential)
}

/// Parses a `GLOBAL_QUOTE` response body.
pub fn parse(ticker: &str, body: &str, credential: &str) -> Result<QuoteRecord> {
    let provider = Provider::AlphaVantage;
    let response: GlobalQuoteResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::malformed(provider, e))?;

    if let Some(message) = response
        .error_message
        .or(response.note)
        .or(response.information)
    {
        return Err(QuoteError::malformed(provider, message));
    }

    // Unknown symbols get an empty `Global Quote` object.
    let quote = response
        .global_quote
        .ok_or_else(|| QuoteError::malformed(provider, "missing Global Quote"))?;
    let price = quote
        .price
        .ok_or_else(|| QuoteError::malformed(provider, format!("no quote for {}", ticker)))?;
    let change = quote
        .change_percent
        .ok_or_else(|| QuoteError::malformed(provider, "missing change percent"))?;

    let price = parse_number(provider, "price", &price)?;
    let change = parse_number(provider, "change percent", change.trim().trim_end_matches('%'))?;
    let name = quote
        .symbol
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ticker.to_string());

    Ok(QuoteRecord::new(name, price, change / 100.0, credential))
}
