use std::fmt::Write;

use corelib::{DisplayMode, Stock};
use watchlist::{CloseColor, Snapshot, close_color, close_delta, format_price};

/// Plain-text rendering of a snapshot.
pub fn render(snap: &Snapshot) -> String {
    let mut out = String::new();

    if !snap.online {
        out.push_str("! offline: stock service unreachable\n");
    }
    if let Some(err) = &snap.error {
        let _ = writeln!(out, "! {err} (/dismiss)");
    }

    let _ = writeln!(out, "watchlist ({}):", snap.display_mode);
    if snap.watchlist.is_empty() {
        out.push_str("  (empty)\n");
    }
    for s in &snap.watchlist {
        let _ = writeln!(out, "  {}", row(s, snap.display_mode));
    }

    if !snap.query.trim().is_empty() {
        let _ = writeln!(out, "search {:?}:", snap.query);
        if snap.loading {
            out.push_str("  searching...\n");
        } else if snap.search_results.is_empty() {
            out.push_str("  no matches\n");
        }
        for s in &snap.search_results {
            let _ = writeln!(out, "  {}", row(s, snap.display_mode));
        }
    }

    out
}

fn row(s: &Stock, mode: DisplayMode) -> String {
    let star = if s.is_in_watchlist { '*' } else { ' ' };
    let price = format_price(s).unwrap_or_else(|| "-".to_string());
    let delta = close_delta(s, mode).unwrap_or_else(|| "-".to_string());
    let arrow = match close_color(s) {
        CloseColor::Gain => '+',
        CloseColor::Loss => '-',
        CloseColor::Neutral => '=',
    };

    format!(
        "{star} {:<6} {:<24} {:>12} {arrow} {delta}",
        s.ticker, s.company_name, price
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_watchlist_and_search() {
        let mut aapl = Stock::new("AAPL", "Apple Inc.").with_prices(145.3, 147.38);
        aapl.is_in_watchlist = true;

        let snap = Snapshot {
            watchlist: vec![aapl.clone()],
            search_results: vec![aapl, Stock::new("AMZN", "Amazon.com Inc.")],
            query: "a".into(),
            ..Snapshot::default()
        };

        let text = render(&snap);

        assert!(text.contains("watchlist (amount):"));
        assert!(text.contains("* AAPL"));
        assert!(text.contains("$ 145.30"));
        assert!(text.contains("- $ -2.08"));
        assert!(text.contains("search \"a\":"));
        assert!(text.contains("  AMZN"));
    }

    #[test]
    fn surfaces_error_and_offline() {
        let snap = Snapshot {
            error: Some("network error: boom".into()),
            online: false,
            ..Snapshot::default()
        };

        let text = render(&snap);

        assert!(text.starts_with("! offline"));
        assert!(text.contains("network error: boom"));
        assert!(text.contains("(empty)"));
    }

    #[test]
    fn loading_search_says_so() {
        let snap = Snapshot {
            query: "tes".into(),
            loading: true,
            ..Snapshot::default()
        };

        assert!(render(&snap).contains("searching..."));
    }
}
