//! Supported quote providers.
//!
//! The set is closed: a code outside it is rejected before any store entry
//! or network request is made.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::QuoteError;

/// Quote provider a ticker is tracked at.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Hash,
    Eq,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum Provider {
    /// Financial Modeling Prep, JSON quote endpoint.
    #[strum(serialize = "FMP")]
    Fmp,
    /// Alpha Vantage `GLOBAL_QUOTE`, JSON.
    #[strum(serialize = "AV")]
    AlphaVantage,
    /// Moscow Exchange shares market, XML.
    #[strum(serialize = "MOEX")]
    Moex,
    /// Moscow Exchange bonds market, XML. Prices are fractions of face value.
    #[strum(serialize = "MOEXBONDS")]
    MoexBonds,
}

impl Provider {
    /// Parses a provider code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Result<Self, QuoteError> {
        code.trim()
            .parse()
            .map_err(|_| QuoteError::InvalidInput(format!("unknown provider code '{}'", code)))
    }

    /// Canonical upper-case code, as used in cache keys.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Whether requests to this provider carry an API key.
    pub fn needs_credential(self) -> bool {
        matches!(self, Provider::Fmp | Provider::AlphaVantage)
    }

    /// Bond quotes are kept as a fraction of par rather than in currency.
    pub fn is_bond(self) -> bool {
        self == Provider::MoexBonds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Provider::from_code("fmp").unwrap(), Provider::Fmp);
        assert_eq!(Provider::from_code("Av").unwrap(), Provider::AlphaVantage);
        assert_eq!(Provider::from_code(" moexbonds ").unwrap(), Provider::MoexBonds);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(matches!(
            Provider::from_code("BOGUS"),
            Err(QuoteError::InvalidInput(_))
        ));
        assert!(Provider::from_code("").is_err());
    }

    #[test]
    fn code_round_trips_through_parse() {
        for provider in Provider::iter() {
            assert_eq!(Provider::from_code(provider.code()).unwrap(), provider);
            assert_eq!(provider.to_string(), provider.code());
        }
    }

    #[test]
    fn only_moex_bonds_is_a_bond_provider() {
        let bonds: Vec<Provider> = Provider::iter().filter(|p| p.is_bond()).collect();
        assert_eq!(bonds, vec![Provider::MoexBonds]);
        assert!(!Provider::Moex.needs_credential());
        assert!(Provider::Fmp.needs_credential());
    }
}
