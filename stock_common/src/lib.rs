//!
//! Common types and utilities shared by the quote store and its front ends.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `provider` — the closed set of supported quote providers.
//! - `key` — cache key scheme combining a ticker and a provider code.
//! - `record` — the normalized `QuoteRecord` kept for every key.
//! - `endpoints` — provider base URLs and their overridable bundle.
//! - `watchlist` — parsing of `TICKER PROVIDER [CREDENTIAL]` files.
#![warn(missing_docs)]
pub mod endpoints;
pub mod error;
pub mod key;
pub mod provider;
pub mod record;
pub mod result;
pub mod watchlist;

pub use error::QuoteError;
pub use provider::Provider;
pub use record::QuoteRecord;
pub use result::Result;
