//! MetricsHook - built-in hook for aggregating run statistics.
//!
//! Collects per-tick metrics and computes aggregate statistics for
//! post-run reports.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use types::{AppliedOrder, EventDescriptor, SimulationResult, TickSnapshot};

use crate::hooks::{HookContext, SimulationHook};

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Total ticks processed.
    pub total_ticks: u64,
    /// Total executed orders across all agents.
    pub total_orders: u64,
    /// Total news events observed.
    pub total_events: u64,
    /// Total violations recorded across all agents.
    pub total_violations: u64,
    /// Average executed orders per tick.
    pub avg_orders_per_tick: f64,
    /// Peak executed orders in a single tick.
    pub peak_orders_per_tick: u64,
}

/// Built-in hook for collecting run metrics.
///
/// Thread-safe via atomics and a mutex for interior mutability.
pub struct MetricsHook {
    tick_count: AtomicU64,
    order_count: AtomicU64,
    event_count: AtomicU64,
    violation_count: AtomicU64,
    peak_orders: AtomicU64,
    /// Per-tick order counts, bounded to max_history entries.
    order_history: Mutex<Vec<u64>>,
    max_history: usize,
}

impl MetricsHook {
    /// Create a new metrics hook with default settings.
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Create a metrics hook with a custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            order_count: AtomicU64::new(0),
            event_count: AtomicU64::new(0),
            violation_count: AtomicU64::new(0),
            peak_orders: AtomicU64::new(0),
            order_history: Mutex::new(Vec::with_capacity(max_history.min(10_000))),
            max_history,
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_ticks = self.tick_count.load(Ordering::Relaxed);
        let total_orders = self.order_count.load(Ordering::Relaxed);

        let avg_orders = if total_ticks > 0 {
            total_orders as f64 / total_ticks as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_ticks,
            total_orders,
            total_events: self.event_count.load(Ordering::Relaxed),
            total_violations: self.violation_count.load(Ordering::Relaxed),
            avg_orders_per_tick: avg_orders,
            peak_orders_per_tick: self.peak_orders.load(Ordering::Relaxed),
        }
    }

    /// Get the per-tick order count history.
    pub fn order_history(&self) -> Vec<u64> {
        self.order_history.lock().clone()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.order_count.store(0, Ordering::Relaxed);
        self.event_count.store(0, Ordering::Relaxed);
        self.violation_count.store(0, Ordering::Relaxed);
        self.peak_orders.store(0, Ordering::Relaxed);
        self.order_history.lock().clear();
    }

    /// Update peak value atomically (CAS loop).
    fn update_peak(peak: &AtomicU64, value: u64) {
        let mut current = peak.load(Ordering::Relaxed);
        while value > current {
            match peak.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_events(&self, events: Vec<EventDescriptor>, _ctx: &HookContext) {
        self.event_count
            .fetch_add(events.len() as u64, Ordering::Relaxed);
    }

    fn on_orders_applied(&self, orders: Vec<AppliedOrder>, _ctx: &HookContext) {
        let count = orders.len() as u64;
        self.order_count.fetch_add(count, Ordering::Relaxed);
        Self::update_peak(&self.peak_orders, count);

        let mut history = self.order_history.lock();
        if history.len() < self.max_history {
            history.push(count);
        }
    }

    fn on_tick_end(&self, snapshot: &TickSnapshot, _ctx: &HookContext) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        let violations: u64 = snapshot
            .agent_logs
            .iter()
            .map(|log| log.violations.len() as u64)
            .sum();
        self.violation_count.fetch_add(violations, Ordering::Relaxed);
    }

    fn on_simulation_end(&self, _result: &SimulationResult) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRunner;
    use sim_core::default_prices;
    use std::sync::Arc;
    use types::{OrderAction, Ticker};

    fn test_ctx() -> HookContext {
        HookContext {
            tick: 1,
            total_ticks: 14,
            prices: default_prices(),
            agent_count: 1,
        }
    }

    fn fill() -> AppliedOrder {
        AppliedOrder {
            ticker: Ticker::Santa,
            action: OrderAction::Buy,
            quantity: 10,
            fill_price: 100.0,
        }
    }

    fn empty_snapshot(tick: u64) -> TickSnapshot {
        TickSnapshot {
            tick,
            prices: default_prices(),
            events: Vec::new(),
            agent_logs: Vec::new(),
        }
    }

    #[test]
    fn test_metrics_accumulation() {
        let metrics = Arc::new(MetricsHook::new());
        let mut runner = HookRunner::new();
        runner.add(metrics.clone());

        let ctx = test_ctx();
        for tick in 1..=3 {
            runner.on_orders_applied(&[fill(), fill()], &ctx);
            runner.on_tick_end(&empty_snapshot(tick), &ctx);
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_ticks, 3);
        assert_eq!(snapshot.total_orders, 6);
        assert!((snapshot.avg_orders_per_tick - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_peak_tracking() {
        let metrics = MetricsHook::new();
        let ctx = test_ctx();

        metrics.on_orders_applied(vec![fill(), fill()], &ctx);
        metrics.on_orders_applied(vec![fill(); 5], &ctx);
        metrics.on_orders_applied(vec![fill()], &ctx);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.peak_orders_per_tick, 5);
        assert_eq!(snapshot.total_orders, 8);
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsHook::new();
        let ctx = test_ctx();

        metrics.on_orders_applied(vec![fill()], &ctx);
        metrics.on_tick_end(&empty_snapshot(1), &ctx);
        assert_eq!(metrics.snapshot().total_ticks, 1);

        metrics.reset();

        assert_eq!(metrics.snapshot().total_ticks, 0);
        assert_eq!(metrics.snapshot().total_orders, 0);
        assert!(metrics.order_history().is_empty());
    }
}
