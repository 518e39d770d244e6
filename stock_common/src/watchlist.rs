//! Watch-list files: which tickers to track, where, and with which key.

use std::io::BufRead;

use crate::error::QuoteError;
use crate::provider::Provider;

/// One line of a watch list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    /// Ticker as written in the file.
    pub ticker: String,
    /// Provider to fetch it from.
    pub provider: Provider,
    /// API key for this entry; empty when the line has none.
    pub credential: String,
}

/// Trait providing file parsing for watch lists.
pub trait WatchListParser {
    /// Parses entries from a buffered reader.
    ///
    /// Each non-empty, non-comment line holds `TICKER PROVIDER [CREDENTIAL]`,
    /// separated by whitespace or commas. Returns an error naming the first
    /// line that cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<WatchEntry>, QuoteError>;
}

impl WatchListParser for WatchEntry {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError> {
        let mut entries = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(QuoteError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed_line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|f| !f.is_empty())
                .collect();

            let entry = match fields.as_slice() {
                [ticker, provider] => WatchEntry::new(ticker, provider, ""),
                [ticker, provider, credential] => WatchEntry::new(ticker, provider, credential),
                _ => Err(QuoteError::InvalidInput(format!(
                    "expected TICKER PROVIDER [CREDENTIAL], got '{}'",
                    trimmed_line
                ))),
            };

            match entry {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    return Err(QuoteError::ParseWatchList(format!(
                        "line {}: {}",
                        index + 1,
                        e
                    )));
                }
            }
        }
        Ok(entries)
    }
}

impl WatchEntry {
    fn new(ticker: &str, provider: &str, credential: &str) -> Result<Self, QuoteError> {
        Ok(WatchEntry {
            ticker: ticker.to_string(),
            provider: Provider::from_code(provider)?,
            credential: credential.to_string(),
        })
    }
}
