pub mod config;
pub mod display;
pub mod errors;
pub mod refresh;
pub mod search_input;
mod state;
pub mod synchronizer;
pub mod types;

pub use config::SyncConfig;
pub use display::{CloseColor, close_color, close_delta, format_price};
pub use errors::SyncError;
pub use refresh::{RefreshLoop, spawn_refresh_loop};
pub use search_input::{SearchInput, spawn_search_input};
pub use synchronizer::WatchlistSynchronizer;
pub use types::{SearchOutcome, Snapshot};
