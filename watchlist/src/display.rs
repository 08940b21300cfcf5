//! Presentation helpers: pure functions of a stock and the display mode.

use corelib::{DisplayMode, Stock};

/// Direction of the move against the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseColor {
    Gain,
    Loss,
    Neutral,
}

fn close_diff(stock: &Stock) -> Option<f64> {
    Some(stock.price? - stock.last_close_price?)
}

/// Change against the previous close: `"$ 10.00"` in amount mode,
/// `"10.00 %"` in percent mode. `None` while either price is unknown, or
/// in percent mode when the previous close is zero.
pub fn close_delta(stock: &Stock, mode: DisplayMode) -> Option<String> {
    let diff = close_diff(stock)?;

    match mode {
        DisplayMode::Amount => Some(format!("$ {:.2}", diff)),
        DisplayMode::Percent => {
            let last_close = stock.last_close_price?;
            if last_close == 0.0 {
                return None;
            }
            Some(format!("{:.2} %", diff / last_close * 100.0))
        }
    }
}

pub fn close_color(stock: &Stock) -> CloseColor {
    match close_diff(stock) {
        Some(d) if d > 0.0 => CloseColor::Gain,
        Some(d) if d < 0.0 => CloseColor::Loss,
        _ => CloseColor::Neutral,
    }
}

/// `"$ 145.30"`, or `None` before the first price fetch.
pub fn format_price(stock: &Stock) -> Option<String> {
    stock.price.map(|p| format!("$ {:.2}", p))
}
