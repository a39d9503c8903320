//! Sim-core: market mechanics for the Santa Market.
//!
//! This crate provides the deterministic heart of the simulation:
//! - Seeded RNG with a reproducible 32-bit mixing sequence
//! - Market engine: initialization, pure per-tick advance, scenario
//!   overrides and scripted-event injection
//! - Portfolio model: equity valuation and constrained order application
//! - Scoring: drawdown, penalty-adjusted scores, style detection, ranking
//! - Trade-pressure extension: aggregate order flow feeding back into prices

mod error;
mod market;
mod portfolio;
mod pressure;
mod rng;
mod scoring;

pub use error::{Result, SimCoreError};
pub use market::{
    advance, apply_overrides, apply_scripted_events, default_prices, init_market_state,
};
pub use portfolio::{OrderOutcome, apply_orders, compute_equity, init_agent_state};
pub use pressure::{apply_trade_pressure, net_volume};
pub use rng::SeededRng;
pub use scoring::{compute_max_drawdown, detect_trading_style, rank_agents, score_agent};
