//! Financial Modeling Prep quotes.
//!
//! `GET /stable/quote?symbol=T&apikey=K` answers with a JSON array whose first
//! element carries `name`, `price` and `changePercentage` (in percent). A bad key
//! or exhausted plan answers with an object holding `Error Message` instead.

use serde::Deserialize;
use stock_common::{Provider, QuoteError, QuoteRecord, Result};

use crate::connection::PersistentConnection;

const QUOTE_PATH: &str = "/stable/quote";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteResponse {
    Quotes(Vec<FmpQuote>),
    Error {
        #[serde(rename = "Error Message")]
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct FmpQuote {
    name: Option<String>,
    price: Option<f64>,
    #[serde(rename = "changePercentage")]
    change_percentage: Option<f64>,
}

pub(crate) fn fetch(conn: &PersistentConnection, ticker: &str, credential: &str) -> Result<QuoteRecord> {
    let body = conn.get(
        Provider::Fmp,
        QUOTE_PATH,
        &[("symbol", ticker), ("apikey", credential)],
    )?;
    parse(ticker, &body, credential)
}

/// Parses a quote response body.
pub fn parse(ticker: &str, body: &str, credential: &str) -> Result<QuoteRecord> {
    let response: QuoteResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::malformed(Provider::Fmp, e))?;

    let quote = match response {
        QuoteResponse::Quotes(quotes) => quotes
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::malformed(Provider::Fmp, format!("no quote for {}", ticker)))?,
        QuoteResponse::Error { message } => return Err(QuoteError::malformed(Provider::Fmp, message)),
    };

    let price = quote
        .price
        .ok_or_else(|| QuoteError::malformed(Provider::Fmp, "missing price"))?;
    let change = quote
        .change_percentage
        .ok_or_else(|| QuoteError::malformed(Provider::Fmp, "missing changePercentage"))?;
    let name = quote
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| ticker.to_string());

    Ok(QuoteRecord::new(name, price, change / 100.0, credential))
}
