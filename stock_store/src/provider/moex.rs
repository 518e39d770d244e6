//! Moscow Exchange ISS quotes for shares and bonds.
//!
//! Both markets answer with the same document shape:
//!
//! ```xml
//! <document>
//!   <data id="securities"><metadata>...</metadata><rows><row BOARDID=".." SECNAME=".." PREVPRICE=".."/></rows></data>
//!   <data id="marketdata"><metadata>...</metadata><rows><row BOARDID=".." LAST=".." MARKETPRICE=".." LASTTOPREVPRICE=".."/></rows></data>
//! </document>
//! ```
//!
//! A security is listed on several boards; only rows of the main trading board
//! are read. Bond prices and all `LASTTOPREVPRICE` values are percentages and are
//! scaled to fractions. `LAST` is blank outside trading hours.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use stock_common::{Provider, QuoteError, QuoteRecord, Result};

use super::parse_number;
use crate::connection::PersistentConnection;

/// Main board for shares.
pub const SHARE_BOARDS: &[&str] = &["TQBR"];
/// Corporate and federal loan bond boards.
pub const BOND_BOARDS: &[&str] = &["TQCB", "TQOB"];

const SHARES_PATH: &str = "/iss/engines/stock/markets/shares/securities/";
const BONDS_PATH: &str = "/iss/engines/stock/markets/bonds/securities/";

type Row = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Securities,
    MarketData,
}

/// First board-matching row of each section.
#[derive(Debug, Default)]
struct BoardRows {
    securities: Option<Row>,
    market_data: Option<Row>,
}

pub(crate) fn fetch_share(conn: &PersistentConnection, ticker: &str) -> Result<QuoteRecord> {
    let body = conn.get(Provider::Moex, &format!("{}{}.xml", SHARES_PATH, ticker), &[])?;
    parse_share(ticker, &body)
}

pub(crate) fn fetch_bond(conn: &PersistentConnection, ticker: &str) -> Result<QuoteRecord> {
    let body = conn.get(Provider::MoexBonds, &format!("{}{}.xml", BONDS_PATH, ticker), &[])?;
    parse_bond(ticker, &body)
}

/// Parses a shares market document. The credential is always empty.
pub fn parse_share(ticker: &str, body: &str) -> Result<QuoteRecord> {
    let provider = Provider::Moex;
    let rows = scan(provider, body, SHARE_BOARDS)?;
    let market = market_row(provider, ticker, rows.market_data)?;

    let last = field(&market, "LAST");
    let price_text = if last.is_empty() {
        field(&market, "MARKETPRICE")
    } else {
        last
    };
    let price = parse_number(provider, "LAST", price_text)?;
    let change = percent_or_zero(provider, field(&market, "LASTTOPREVPRICE"))?;

    Ok(QuoteRecord::new(
        company_name(ticker, rows.securities.as_ref()),
        price,
        change,
        "",
    ))
}

/// Parses a bonds market document. Prices come back as a fraction of par.
pub fn parse_bond(ticker: &str, body: &str) -> Result<QuoteRecord> {
    let provider = Provider::MoexBonds;
    let rows = scan(provider, body, BOND_BOARDS)?;
    let market = market_row(provider, ticker, rows.market_data)?;

    // Previous close stands until a trade today replaces it.
    let mut price = match rows.securities.as_ref().map(|r| field(r, "PREVPRICE")) {
        Some(prev) if !prev.is_empty() => Some(parse_number(provider, "PREVPRICE", prev)? / 100.0),
        _ => None,
    };
    let last = field(&market, "LAST");
    if !last.is_empty() {
        price = Some(parse_number(provider, "LAST", last)? / 100.0);
    }
    let price = price.ok_or_else(|| {
        QuoteError::malformed(provider, format!("neither LAST nor PREVPRICE for {}", ticker))
    })?;
    let change = percent_or_zero(provider, field(&market, "LASTTOPREVPRICE"))?;

    Ok(QuoteRecord::new(
        company_name(ticker, rows.securities.as_ref()),
        price,
        change,
        "",
    ))
}

fn market_row(provider: Provider, ticker: &str, row: Option<Row>) -> Result<Row> {
    row.ok_or_else(|| QuoteError::malformed(provider, format!("no board row for {}", ticker)))
}

fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(|v| v.trim()).unwrap_or("")
}

fn company_name(ticker: &str, securities: Option<&Row>) -> String {
    securities
        .map(|r| field(r, "SECNAME"))
        .filter(|name| !name.is_empty())
        .unwrap_or(ticker)
        .to_string()
}

fn percent_or_zero(provider: Provider, text: &str) -> Result<f64> {
    if text.is_empty() {
        return Ok(0.0);
    }
    Ok(parse_number(provider, "LASTTOPREVPRICE", text)? / 100.0)
}

/// Walks the document and keeps the first row on one of `boards` in the
/// top-level `securities` and `marketdata` sections.
fn scan(provider: Provider, xml: &str, boards: &[&str]) -> Result<BoardRows> {
    let mut reader = Reader::from_str(xml);
    let mut rows = BoardRows::default();
    let mut section: Option<Section> = None;
    // document = 1, data = 2, rows = 3
    let mut depth = 0usize;

    loop {
        match reader
            .read_event()
            .map_err(|e| QuoteError::malformed(provider, e))?
        {
            Event::Start(e) => {
                depth += 1;
                match e.name().as_ref() {
                    b"data" if depth == 2 => section = section_of(provider, &e)?,
                    b"row" if depth == 4 => keep_row(provider, &e, section, boards, &mut rows)?,
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"row" && depth == 3 {
                    keep_row(provider, &e, section, boards, &mut rows)?;
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"data" && depth == 2 {
                    section = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}

fn section_of(provider: Provider, element: &BytesStart) -> Result<Option<Section>> {
    let attrs = attributes(provider, element)?;
    Ok(match attrs.get("id").map(String::as_str) {
        Some("securities") => Some(Section::Securities),
        Some("marketdata") => Some(Section::MarketData),
        _ => None,
    })
}

fn keep_row(
    provider: Provider,
    element: &BytesStart,
    section: Option<Section>,
    boards: &[&str],
    rows: &mut BoardRows,
) -> Result<()> {
    let slot = match section {
        Some(Section::Securities) => &mut rows.securities,
        Some(Section::MarketData) => &mut rows.market_data,
        None => return Ok(()),
    };
    if slot.is_some() {
        return Ok(());
    }

    let attrs = attributes(provider, element)?;
    let board = field(&attrs, "BOARDID");
    if boards.iter().any(|b| *b == board) {
        *slot = Some(attrs);
    }
    Ok(())
}

fn attributes(provider: Provider, element: &BytesStart) -> Result<Row> {
    let mut attrs = Row::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| QuoteError::malformed(provider, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| QuoteError::malformed(provider, e))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
