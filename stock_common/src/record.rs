//! Normalized quote record.

use serde::{Deserialize, Serialize};

/// Latest quote for one `(ticker, provider)` pair.
///
/// `price` is in the security's currency for a nominal of 1; bond prices are a
/// fraction of face value (99.5% of par is `0.995`). `change` is a fraction of
/// the previous close, so +2% is stored as `0.02`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Display name, or the ticker when the provider has none.
    pub company_name: String,
    /// Last price.
    pub price: f64,
    /// Change against the previous close or settlement, as a fraction.
    pub change: f64,
    /// API key the record was fetched with; reused by the background refresh.
    pub credential: String,
}

impl QuoteRecord {
    /// Creates a new record.
    pub fn new(company_name: impl Into<String>, price: f64, change: f64, credential: impl Into<String>) -> Self {
        QuoteRecord {
            company_name: company_name.into(),
            price,
            change,
            credential: credential.into(),
        }
    }
}
