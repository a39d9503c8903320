//! Simulation crate: the run loop for the Santa Market.
//!
//! This crate coordinates one competition run:
//! - Tick-based loop over the market engine in `sim-core`
//! - Concurrent per-agent policy calls against frozen turn snapshots
//! - Sequential order application and per-tick logging
//! - Batch and streaming run modes, with cooperative cancellation
//! - Hook-based observation and a built-in metrics hook
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             SimulationRunner tick            │
//! │                                              │
//! │  1. advance market (prices, macro, events)   │
//! │  2. inject scripted scenario events          │
//! │  3. Hook: on_tick_start / on_events          │
//! │  4. freeze TurnState per agent               │
//! │  5. policy fan-out (rayon, concurrent)       │
//! │  6. apply orders per agent (sequential)      │
//! │  7. optional trade-pressure pass             │
//! │  8. record equity, build TickSnapshot        │
//! │  9. Hook: on_orders_applied / on_tick_end    │
//! │  10. emit streaming progress (if streaming)  │
//! │                                              │
//! └──────────────────────────────────────────────┘
//! ```

mod error;
pub mod hooks;
mod metrics;
mod policy;
mod runner;

pub use error::{Result, SimulationError};
pub use hooks::{HookContext, HookRunner, NoOpHook, SimulationHook};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use policy::{HoldPolicy, PolicyCaller, PolicyDecision, PolicyError, build_turn_state};
pub use runner::{RunConfig, SimulationProgress, SimulationRunner};
