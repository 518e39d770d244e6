//! In-memory store of security quotes kept fresh from several providers.
//!
//! The crate wires together four building blocks:
//!
//! - `provider` — one fetch/parse routine per provider (`FMP`, `AV`, `MOEX`,
//!   `MOEXBONDS`) behind the `ProviderAdapter`, each over its own
//!   `PersistentConnection`.
//! - `source` — the `QuoteSource` seam the store fetches through, so callers and
//!   tests can substitute their own data source.
//! - `store` — the `QuoteStore` keyed by `TICKER:PROVIDER`, with duplicate
//!   suppression on insert and forced refetch on update.
//! - `scheduler` — the background thread started by `QuoteStore::maintain` that
//!   refetches every key at a fixed interval until `desist` is called.
//!
//! Network round-trips never run under the store lock; only reading a key's
//! credential and writing the fetched record do.
#![warn(missing_docs)]
pub mod connection;
pub mod provider;
mod scheduler;
pub mod snapshot;
pub mod source;
pub mod store;

pub use provider::{AdapterConfig, ProviderAdapter};
pub use snapshot::Snapshot;
pub use source::QuoteSource;
pub use stock_common::key::{make_key, split_key};
pub use store::QuoteStore;
