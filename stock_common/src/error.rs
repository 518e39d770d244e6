//! Error types shared between the store and its front ends.
//!
//! The `QuoteError` enum separates the failure classes a caller may want to tell
//! apart: rejected input, an unreachable provider, an unparseable provider
//! response and a lookup of an absent key. I/O, watch-list parsing and lock
//! poisoning round out the ambient cases.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the store, the provider adapter and the CLI.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Empty ticker or provider code outside the supported set.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport failure talking to a provider, reconnect included.
    #[error("Provider {provider} unavailable: {message}")]
    ProviderUnavailable {
        /// Provider code the request was addressed to.
        provider: String,
        /// Transport or HTTP status description.
        message: String,
    },

    /// The provider answered, but not with a usable quote.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// Provider code the response came from.
        provider: String,
        /// What was wrong with the body.
        message: String,
    },

    /// Lookup of a key the store does not hold.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while parsing a watch-list file.
    #[error("Parse watch list error: {0}")]
    ParseWatchList(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl QuoteError {
    /// Shorthand for a `ProviderUnavailable` error.
    pub fn unavailable(provider: impl ToString, message: impl ToString) -> Self {
        QuoteError::ProviderUnavailable {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Shorthand for a `MalformedResponse` error.
    pub fn malformed(provider: impl ToString, message: impl ToString) -> Self {
        QuoteError::MalformedResponse {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
