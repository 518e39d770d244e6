//! Provider hosts.

/// Financial Modeling Prep API root.
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com";
/// Alpha Vantage API root.
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
/// Moscow Exchange ISS root, shared by the shares and bonds markets.
pub const MOEX_BASE_URL: &str = "https://iss.moex.com";

/// Base URLs the provider adapter talks to, one per provider host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Financial Modeling Prep root, without a trailing slash.
    pub fmp: String,
    /// Alpha Vantage root, without a trailing slash.
    pub alpha_vantage: String,
    /// Moscow Exchange ISS root, without a trailing slash.
    pub moex: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            fmp: FMP_BASE_URL.to_string(),
            alpha_vantage: ALPHA_VANTAGE_BASE_URL.to_string(),
            moex: MOEX_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every provider at the same root. Handy for local test servers.
    pub fn all(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Endpoints {
            fmp: base.clone(),
            alpha_vantage: base.clone(),
            moex: base,
        }
    }
}
