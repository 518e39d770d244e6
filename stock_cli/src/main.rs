//! Stock CLI — fills a quote store from a watch list, keeps it fresh in the
//! background for a few intervals, then prints the quotes as a table.
//!
//! Usage example (CLI):
//! ```bash
//! stock_cli --path ./watchlist.txt --interval 2 --cycles 2 --api-key YOUR_KEY
//! ```
//!
//! The watch list holds one `TICKER PROVIDER [API_KEY]` entry per line, e.g.
//! `SQQQ FMP`, `AMZN AV`, `GMKN MOEX`. See `stock_common::watchlist`.
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use stock_common::Result;
use stock_common::watchlist::{WatchEntry, WatchListParser};
use stock_store::{AdapterConfig, QuoteStore};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of the wait loop, so Ctrl+C is noticed quickly.
const POLL_MS: u64 = 100;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Printing what we have...");
            shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Could not install Ctrl+C handler: {}", e);
        }
    }

    let file_path = normalize_path(&args.path);
    if !is_file_exist(&file_path) {
        error!("Watch list {} not found", file_path.display());
        return Ok(());
    }
    let entries = WatchEntry::parse_from_file(BufReader::new(File::open(&file_path)?))?;
    info!("Watch list: {} entries", entries.len());

    let store = QuoteStore::connect(AdapterConfig::default())?;
    let fallback_key = args.api_key.unwrap_or_default();
    for entry in &entries {
        let credential = if entry.credential.is_empty() {
            fallback_key.as_str()
        } else {
            entry.credential.as_str()
        };
        match store.insert(&entry.ticker, entry.provider.code(), credential) {
            Some(key) => info!("Tracking {}", key),
            None => warn!("Skipping {} at {}", entry.ticker, entry.provider),
        }
    }

    let interval = Duration::from_secs(args.interval.max(1));
    store.maintain(interval)?;
    wait(interval * args.cycles, &shutdown);
    store.desist();

    println!("Quotes as of {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    print!("{}", store.render_table());
    Ok(())
}

/// Sleeps for `total`, returning early once `shutdown` is set.
fn wait(total: Duration, shutdown: &AtomicBool) {
    let deadline = Instant::now() + total;
    while Instant::now() < deadline && !shutdown.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(POLL_MS));
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
