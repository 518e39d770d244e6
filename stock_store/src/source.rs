//! Data source seam between the store and the providers.

use std::sync::Arc;

use stock_common::{Provider, QuoteRecord, Result};

/// Anything that can turn a ticker into a fresh quote.
///
/// Implementations must be callable from the caller's thread and the refresh
/// thread at once.
pub trait QuoteSource: Send + Sync {
    /// Fetches the current quote for `ticker` at `provider`.
    ///
    /// `ticker` is already upper-cased and non-empty.
    fn fetch(&self, ticker: &str, provider: Provider, credential: &str) -> Result<QuoteRecord>;
}

impl<S: QuoteSource + ?Sized> QuoteSource for Arc<S> {
    fn fetch(&self, ticker: &str, provider: Provider, credential: &str) -> Result<QuoteRecord> {
        (**self).fetch(ticker, provider, credential)
    }
}
