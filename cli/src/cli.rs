use clap::Parser;
use store::StoreKey;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[clap(name = "watchlist-cli", version)]
pub struct Cli {
    /// Stock service root (overrides WATCHLIST_API_URL)
    #[clap(long)]
    pub api_url: Option<String>,

    /// Stock service key (overrides WATCHLIST_API_KEY)
    #[clap(long)]
    pub api_key: Option<String>,

    /// Database connection string (overrides DATABASE_URL)
    #[clap(long)]
    pub database_url: Option<String>,

    /// Key the watchlist is stored under: watchlist, stocks or starred
    #[clap(long)]
    pub store_key: Option<StoreKey>,

    /// Search debounce in milliseconds
    #[clap(long)]
    pub debounce_ms: Option<u64>,

    /// Price refresh interval in milliseconds
    #[clap(long)]
    pub refresh_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[clap(long)]
    pub timeout_ms: Option<u64>,

    /// Search the bundled demo list instead of the remote service
    #[clap(long)]
    pub local: bool,

    /// Keep the watchlist in memory only
    #[clap(long)]
    pub ephemeral: bool,

    /// Log as JSON lines
    #[clap(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Layer command-line flags over the environment-derived config.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            cfg.api_url = Some(url.clone());
        }
        if let Some(key) = &self.api_key {
            cfg.api_key = key.clone();
        }
        if let Some(url) = &self.database_url {
            cfg.database_url = url.clone();
        }
        if let Some(key) = self.store_key {
            cfg.store_key = key;
        }
        if let Some(ms) = self.debounce_ms {
            cfg.search_debounce_ms = ms;
        }
        if let Some(ms) = self.refresh_ms {
            cfg.refresh_interval_ms = ms;
        }
        if let Some(ms) = self.timeout_ms {
            cfg.request_timeout_ms = ms;
        }
        if self.local {
            cfg.api_url = None;
        }
        cfg.json_logs |= self.json_logs;
    }
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Current content of the search box.
    Search(String),
    Toggle(String),
    Mode,
    Dismiss,
    Show,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(rest) = line.strip_prefix('/') else {
            return Command::Search(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("toggle" | "t"), Some(ticker)) => Command::Toggle(ticker.to_uppercase()),
            (Some("mode" | "m"), None) => Command::Mode,
            (Some("dismiss" | "d"), None) => Command::Dismiss,
            (Some("show" | "s"), None) => Command::Show,
            (Some("quit" | "q"), None) => Command::Quit,
            (Some("help" | "h"), None) => Command::Help,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
type to search; commands:
  /toggle TICKER   add or remove a stock from the watchlist
  /mode            switch between amount and percent change
  /dismiss         clear the current error
  /show            print the current state
  /quit            exit";
