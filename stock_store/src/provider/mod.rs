//! Provider adapter: per-provider request building and response parsing.
//!
//! Each submodule turns one provider's wire format into a `QuoteRecord`:
//! - `fmp` — Financial Modeling Prep JSON quote list.
//! - `alpha_vantage` — Alpha Vantage `GLOBAL_QUOTE` JSON object.
//! - `moex` — Moscow Exchange ISS XML for shares and bonds.
//!
//! The adapter keeps one `PersistentConnection` per provider host; both MOEX
//! markets share one.

pub mod alpha_vantage;
pub mod fmp;
pub mod moex;

use std::time::Duration;

use log::debug;
use stock_common::endpoints::Endpoints;
use stock_common::{Provider, QuoteRecord, Result};

use crate::connection::PersistentConnection;
use crate::source::QuoteSource;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the networked adapter.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Base URL per provider host.
    pub endpoints: Endpoints,
    /// Per-request timeout, connect included.
    pub timeout: Duration,
    /// Honour `HTTP(S)_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            endpoints: Endpoints::default(),
            timeout: DEFAULT_TIMEOUT,
            system_proxy: true,
        }
    }
}

/// `QuoteSource` backed by the live provider APIs.
pub struct ProviderAdapter {
    fmp: PersistentConnection,
    alpha_vantage: PersistentConnection,
    moex: PersistentConnection,
}

impl ProviderAdapter {
    /// Opens one connection pool per provider host.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let AdapterConfig {
            endpoints,
            timeout,
            system_proxy,
        } = config;
        Ok(Self {
            fmp: PersistentConnection::new(&endpoints.fmp, timeout, system_proxy)?,
            alpha_vantage: PersistentConnection::new(&endpoints.alpha_vantage, timeout, system_proxy)?,
            moex: PersistentConnection::new(&endpoints.moex, timeout, system_proxy)?,
        })
    }
}

impl QuoteSource for ProviderAdapter {
    fn fetch(&self, ticker: &str, provider: Provider, credential: &str) -> Result<QuoteRecord> {
        debug!("Fetching {} from {}", ticker, provider);
        match provider {
            Provider::Fmp => fmp::fetch(&self.fmp, ticker, credential),
            Provider::AlphaVantage => alpha_vantage::fetch(&self.alpha_vantage, ticker, credential),
            Provider::Moex => moex::fetch_share(&self.moex, ticker),
            Provider::MoexBonds => moex::fetch_bond(&self.moex, ticker),
        }
    }
}

/// Parses a decimal number a provider sent as text.
pub(crate) fn parse_number(provider: Provider, field: &str, text: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|e| {
        stock_common::QuoteError::malformed(provider, format!("{} '{}': {}", field, text, e))
    })
}
