use std::time::Duration;

use anyhow::Context;
use store::StoreKey;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Root of the remote stock service. Without it the bundled demo list
    /// is searched locally.
    pub api_url: Option<String>,

    /// Key sent with every service request.
    pub api_key: String,

    /// Header carrying `api_key`.
    pub api_key_header: String,

    /// Database connection string.
    pub database_url: String,

    /// Key the watchlist is persisted under.
    pub store_key: StoreKey,

    // =========================
    // Timing
    // =========================
    /// Quiet period before typed search text is sent.
    pub search_debounce_ms: u64,

    /// Cadence of the background price refresh.
    pub refresh_interval_ms: u64,

    /// Upper bound for one service call.
    pub request_timeout_ms: u64,

    /// One JSON object per log line (`APP_ENV=production`).
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; absent variables take
    /// their defaults, malformed ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store_key = match lookup("WATCHLIST_STORE_KEY") {
            Some(v) => v.parse().context("WATCHLIST_STORE_KEY")?,
            None => StoreKey::Watchlist,
        };

        Ok(Self {
            api_url: lookup("WATCHLIST_API_URL").filter(|v| !v.trim().is_empty()),
            api_key: lookup("WATCHLIST_API_KEY").unwrap_or_default(),
            api_key_header: lookup("WATCHLIST_API_KEY_HEADER")
                .unwrap_or_else(|| adapters::stock_api::DEFAULT_API_KEY_HEADER.to_string()),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://watchlist.db?mode=rwc".to_string()),
            store_key,

            search_debounce_ms: millis(&lookup, "SEARCH_DEBOUNCE_MS", 300)?,
            refresh_interval_ms: millis(&lookup, "REFRESH_INTERVAL_MS", 5_000)?,
            request_timeout_ms: millis(&lookup, "REQUEST_TIMEOUT_MS", 10_000)?,

            json_logs: lookup("APP_ENV").as_deref() == Some("production"),
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> anyhow::Result<u64> {
    match lookup(name) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number of milliseconds, got {v:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let cfg = from_map(&[]).unwrap();

        assert_eq!(cfg.api_url, None);
        assert_eq!(cfg.api_key_header, "X-Api-Key");
        assert_eq!(cfg.database_url, "sqlite://watchlist.db?mode=rwc");
        assert_eq!(cfg.store_key, StoreKey::Watchlist);
        assert_eq!(cfg.search_debounce(), Duration::from_millis(300));
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(5));
        assert!(!cfg.json_logs);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = from_map(&[
            ("WATCHLIST_API_URL", "https://stocks.example.com/api"),
            ("WATCHLIST_API_KEY", "secret"),
            ("WATCHLIST_STORE_KEY", "starred"),
            ("REFRESH_INTERVAL_MS", "1000"),
            ("APP_ENV", "production"),
        ])
        .unwrap();

        assert_eq!(cfg.api_url.as_deref(), Some("https://stocks.example.com/api"));
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.store_key, StoreKey::Starred);
        assert_eq!(cfg.refresh_interval_ms, 1000);
        assert!(cfg.json_logs);
    }

    #[test]
    fn blank_api_url_means_local() {
        let cfg = from_map(&[("WATCHLIST_API_URL", "  ")]).unwrap();
        assert_eq!(cfg.api_url, None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = from_map(&[("SEARCH_DEBOUNCE_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("SEARCH_DEBOUNCE_MS"));
    }
}
