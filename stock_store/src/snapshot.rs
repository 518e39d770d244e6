//! Point-in-time copy of the store and its table rendering.

use std::fmt;

use stock_common::key::split_key;
use stock_common::{Provider, QuoteRecord};

/// Entries of the store at the moment `QuoteStore::snapshot` was taken, in
/// insertion order. Iterate it as often as needed; it never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, QuoteRecord)>,
}

impl Snapshot {
    pub(crate) fn new(entries: Vec<(String, QuoteRecord)>) -> Self {
        Self { entries }
    }

    /// `(key, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuoteRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Record for `key`, if it was present when the snapshot was taken.
    pub fn get(&self, key: &str) -> Option<&QuoteRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, QuoteRecord);
    type IntoIter = std::vec::IntoIter<(String, QuoteRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a (String, QuoteRecord);
    type IntoIter = std::slice::Iter<'a, (String, QuoteRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Cuts `text` to `keep` characters plus `...` when longer than `limit`.
fn truncate(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(keep).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Fixed-width table: ticker, name, price, change, provider.
///
/// Bond prices and all changes are shown in percent.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<20}{:<20}{:<9}{:<10}{:<10}", "TICKER", "NAME", "PRICE", "CHANGE", "API")?;
        writeln!(
            f,
            "{} {} {} {} {}",
            "-".repeat(19),
            "-".repeat(19),
            "-".repeat(8),
            "-".repeat(9),
            "-".repeat(9)
        )?;

        for (key, record) in &self.entries {
            let (ticker, code) = split_key(key);
            let is_bond = Provider::from_code(&code).is_ok_and(Provider::is_bond);

            write!(
                f,
                "{:<20}{:<20}",
                truncate(&ticker, 19, 16),
                truncate(&record.company_name, 19, 16)
            )?;
            if is_bond {
                write!(f, "{:7.2}% {:8.2}% ", 100.0 * record.price, 100.0 * record.change)?;
            } else {
                write!(f, "{:8.2} {:8.2}% ", record.price, 100.0 * record.change)?;
            }
            writeln!(f, "{:<8}", truncate(&code, 9, 6))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot::new(vec![
            (
                "AAPL:FMP".to_string(),
                QuoteRecord::new("Apple Inc.", 157.96, 0.02, "key"),
            ),
            (
                "SU26248RMFS3:MOEXBONDS".to_string(),
                QuoteRecord::new("OFZ 26248", 0.9875, -0.0012, ""),
            ),
            (
                "GMKN:MOEX".to_string(),
                QuoteRecord::new("Public Joint Stock Company Norilsk", 153.12, 0.01, ""),
            ),
        ])
    }

    #[test]
    fn renders_header_and_one_line_per_entry() {
        let table = sample().to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("TICKER              NAME                PRICE    CHANGE    API"));
        assert_eq!(lines[1], "------------------- ------------------- -------- --------- ---------");
    }

    #[test]
    fn equity_row_shows_currency_price_and_percent_change() {
        let table = sample().to_string();
        let row = table.lines().nth(2).unwrap();
        assert_eq!(
            row,
            "AAPL                Apple Inc.            157.96     2.00% FMP     "
        );
    }

    #[test]
    fn bond_row_shows_percent_of_par() {
        let table = sample().to_string();
        let row = table.lines().nth(3).unwrap();
        assert!(row.starts_with("SU26248RMFS3        OFZ 26248           "));
        assert!(row.contains("  98.75%    -0.12% MOEXBONDS"), "{}", row);
    }

    #[test]
    fn long_names_are_truncated() {
        let table = sample().to_string();
        let row = table.lines().nth(4).unwrap();
        assert!(row.contains("Public Joint Sto... "), "{}", row);
        assert_eq!(truncate("ABCDEFGHIJ", 9, 6), "ABCDEF...");
        assert_eq!(truncate("MOEXBONDS", 9, 6), "MOEXBONDS");
    }

    #[test]
    fn iteration_is_restartable() {
        let snapshot = sample();
        let first: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        let second: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "AAPL:FMP");
        assert_eq!(snapshot.get("GMKN:MOEX").unwrap().price, 153.12);
    }
}
