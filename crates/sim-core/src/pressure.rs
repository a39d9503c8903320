//! Trade-pressure extension: aggregate order flow nudges prices.
//!
//! A separate post-tick pass, never folded into the market advance. After
//! every agent has traded, the net executed buy/sell volume per instrument
//! is converted into a small bounded price impact. The current tick's
//! history entry is rewritten so history length still tracks the tick.

use types::{AppliedOrder, MarketState, Ticker, TickerMap};

/// Fractional price impact per net executed share.
const PRESSURE_PER_SHARE: f64 = 1e-5;

/// Impact clamp per tick, either direction.
const MAX_PRESSURE: f64 = 0.02;

/// Prices never fall below this epsilon, same floor as the market advance.
const PRICE_FLOOR: f64 = 0.01;

/// Net signed share volume per instrument across all applied orders.
pub fn net_volume(applied: &[AppliedOrder]) -> TickerMap<i64> {
    let mut net = TickerMap::<i64>::default();
    for order in applied {
        net[order.ticker] += order.signed_volume();
    }
    net
}

/// Apply aggregate trade pressure to the current tick's prices.
///
/// Net buying pushes a price up, net selling pushes it down, linearly in
/// net share volume and clamped to [`MAX_PRESSURE`] per tick.
pub fn apply_trade_pressure(state: &mut MarketState, applied: &[AppliedOrder]) {
    let net = net_volume(applied);

    for ticker in Ticker::ALL {
        let shares = net[ticker];
        if shares == 0 {
            continue;
        }

        let impact = (shares as f64 * PRESSURE_PER_SHARE).clamp(-MAX_PRESSURE, MAX_PRESSURE);
        let next = (state.prices[ticker] * (1.0 + impact)).max(PRICE_FLOOR);
        state.prices[ticker] = next;
        if let Some(last) = state.price_history[ticker].last_mut() {
            *last = next;
        }
    }
}
