//! Command-line arguments for the quote demo.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a watch list: one `TICKER PROVIDER [API_KEY]` per line.
    #[clap(long)]
    pub path: String,

    /// Seconds between background refreshes.
    #[clap(long, default_value_t = 2)]
    pub interval: u64,

    /// Refresh intervals to wait before printing the table.
    #[clap(long, default_value_t = 2)]
    pub cycles: u32,

    /// API key for watch-list lines that carry none.
    #[clap(long)]
    pub api_key: Option<String>,
}
