#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod models;
pub mod signals;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate
pub use app::App;
pub use data::{MarketFeed, PriceStream, SnapshotClient};
pub use models::{Candle, PriceQuote, Signal};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Trading pairs to track, e.g. "BTC/USDT" (defaults to the built-in set)
    #[arg(long, value_delimiter = ',')]
    pub pairs: Vec<String>,
}

impl Cli {
    /// Tracked pairs: the CLI override when given, otherwise the defaults.
    pub fn tracked_pairs(&self) -> Vec<String> {
        if self.pairs.is_empty() {
            config::DEFAULT_PAIRS.iter().map(|s| s.to_string()).collect()
        } else {
            self.pairs.clone()
        }
    }
}

/// Main application entry point - creates the GUI app.
/// This is the public API for the binary to call.
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}
