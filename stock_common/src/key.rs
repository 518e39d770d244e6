//! Cache key scheme.
//!
//! A key is `TICKER:PROVIDER`, both upper-cased, so one symbol may be tracked
//! at several providers at once without the entries colliding.

/// Separator between ticker and provider code. Never part of either.
pub const DELIMITER: char = ':';

/// Builds the cache key for a ticker tracked at a provider.
pub fn make_key(ticker: &str, provider: &str) -> String {
    format!(
        "{}{}{}",
        ticker.to_uppercase(),
        DELIMITER,
        provider.to_uppercase()
    )
}

/// Splits a key back into `(ticker, provider)`.
///
/// A string without a delimiter is taken as a bare ticker with an empty provider.
pub fn split_key(key: &str) -> (String, String) {
    match key.split_once(DELIMITER) {
        Some((ticker, provider)) => (ticker.to_string(), provider.to_string()),
        None => (key.to_string(), String::new()),
    }
}
