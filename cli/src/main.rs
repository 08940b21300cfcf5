pub mod cli;
pub mod config;
pub mod render;

use std::sync::Arc;

use adapters::{HttpStockApi, LocalStockApi, StockApi, StockApiConfig};
use anyhow::Context;
use clap::Parser;
use common::logger::init_logger;
use store::{MemoryWatchlistStore, SqliteWatchlistStore, WatchlistStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use watchlist::{
    SearchInput, Snapshot, SyncConfig, WatchlistSynchronizer, spawn_refresh_loop,
    spawn_search_input,
};

use cli::{Cli, Command, HELP};
use config::AppConfig;
use render::render;

fn build_api(cfg: &AppConfig) -> anyhow::Result<Arc<dyn StockApi>> {
    let Some(url) = &cfg.api_url else {
        tracing::info!("no stock service configured; searching the demo list");
        return Ok(Arc::new(LocalStockApi::demo()));
    };

    let client = HttpStockApi::new(StockApiConfig {
        base_url: url.clone(),
        api_key: cfg.api_key.clone(),
        api_key_header: cfg.api_key_header.clone(),
        timeout: cfg.request_timeout(),
    })
    .context("build stock service client")?;

    tracing::info!(url = %url, "using remote stock service");
    Ok(Arc::new(client))
}

async fn build_store(cfg: &AppConfig, ephemeral: bool) -> anyhow::Result<Arc<dyn WatchlistStore>> {
    if ephemeral {
        tracing::info!("watchlist kept in memory only");
        return Ok(Arc::new(MemoryWatchlistStore::new()));
    }

    let store = SqliteWatchlistStore::connect(&cfg.database_url).await?;
    tracing::info!(database_url = %cfg.database_url, "watchlist store ready");
    Ok(Arc::new(store))
}

/// Prints every snapshot that renders differently from the previous one.
fn spawn_printer(mut rx: watch::Receiver<Snapshot>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = String::new();

        while rx.changed().await.is_ok() {
            let text = render(&rx.borrow_and_update());
            if text != last {
                println!("{text}");
                last = text;
            }
        }
    })
}

/// Reads commands until `/quit`, end of input or Ctrl-C.
async fn run_commands(sync: &WatchlistSynchronizer, input: &SearchInput) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("read stdin")?,
            res = &mut ctrl_c => {
                res?;
                tracing::info!("Shutdown signal received");
                return Ok(());
            }
        };

        let Some(line) = line else {
            tracing::info!("end of input");
            return Ok(());
        };

        match Command::parse(&line) {
            Command::Search(text) => {
                if !input.push(text) {
                    anyhow::bail!("search input loop stopped");
                }
            }
            Command::Toggle(ticker) => match sync.toggle_watchlist(&ticker).await {
                Ok(true) => println!("{ticker} added to watchlist"),
                Ok(false) => println!("{ticker} removed from watchlist"),
                Err(e) => println!("{e}"),
            },
            Command::Mode => {
                let mode = sync.toggle_display_mode();
                println!("showing change as {mode}");
            }
            Command::Dismiss => sync.dismiss_error(),
            Command::Show => println!("{}", render(&sync.snapshot())),
            Command::Quit => return Ok(()),
            Command::Help => println!("{HELP}"),
            Command::Unknown(cmd) => println!("unknown command {cmd:?}; /help lists commands"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut cfg = AppConfig::from_env()?;
    args.apply(&mut cfg);

    init_logger("watchlist-cli", cfg.json_logs);
    tracing::info!("Starting watchlist...");

    let api = build_api(&cfg)?;
    let store = build_store(&cfg, args.ephemeral).await?;

    let sync = WatchlistSynchronizer::new(
        api,
        store,
        SyncConfig {
            store_key: cfg.store_key,
            search_debounce: cfg.search_debounce(),
            refresh_every: cfg.refresh_interval(),
            request_timeout: cfg.request_timeout(),
        },
    );

    let printer = spawn_printer(sync.subscribe());

    // a failed start is already in the snapshot; keep going with what we have
    if let Err(e) = sync.start().await {
        tracing::warn!(error = %e, "startup incomplete");
    }

    let refresh = spawn_refresh_loop(&sync);
    let input = spawn_search_input(&sync);

    println!("{HELP}");
    let result = run_commands(&sync, &input).await;

    input.shutdown();
    refresh.shutdown();
    printer.abort();

    tracing::info!("watchlist stopped");
    result
}
