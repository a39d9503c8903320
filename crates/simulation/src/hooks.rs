//! Simulation hooks for observing run lifecycle events.
//!
//! Hooks are **observers** that receive owned snapshots of run state at key
//! lifecycle points. They cannot modify simulation state.
//!
//! Hooks receive owned data (not references) so they can store, serialize,
//! or forward it without lifetime constraints.

use std::sync::Arc;

use types::{AppliedOrder, EventDescriptor, PriceMap, SimulationResult, Tick, TickSnapshot};

// ─────────────────────────────────────────────────────────────────────────────
// Hook Context
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to hooks at each lifecycle point.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Current simulation tick.
    pub tick: Tick,
    /// Run horizon.
    pub total_ticks: Tick,
    /// Prices at the time of the hook call.
    pub prices: PriceMap,
    /// Number of competing agents.
    pub agent_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for run observers.
///
/// Hooks must be `Send + Sync`: the runner may invoke them from whichever
/// thread drives the tick loop, and hook-owned state needs interior
/// mutability (`Mutex`, atomics, channels).
///
/// Lifecycle per tick: `on_tick_start` (after the market advances, before
/// any policy call), `on_events` (the tick's active events), then
/// `on_orders_applied` (every executed order across all agents), then
/// `on_tick_end` with the full snapshot. `on_simulation_end` fires once with
/// the final result.
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called at the start of each tick, after the market advance.
    #[allow(unused_variables)]
    fn on_tick_start(&self, ctx: &HookContext) {}

    /// Called with the events active this tick (may be empty).
    #[allow(unused_variables)]
    fn on_events(&self, events: Vec<EventDescriptor>, ctx: &HookContext) {}

    /// Called after all agents have traded, with every executed order.
    #[allow(unused_variables)]
    fn on_orders_applied(&self, orders: Vec<AppliedOrder>, ctx: &HookContext) {}

    /// Called at the end of each tick with the full snapshot.
    #[allow(unused_variables)]
    fn on_tick_end(&self, snapshot: &TickSnapshot, ctx: &HookContext) {}

    /// Called once when the run completes.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, result: &SimulationResult) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order. Each hook call is synchronous;
/// for async behavior, hooks should use interior channels/queues.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    /// Create a new empty hook runner.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    /// Get the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Invoke `on_tick_start` on all hooks.
    pub fn on_tick_start(&self, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.on_tick_start(ctx);
        }
    }

    /// Invoke `on_events` on all hooks, cloning for the owned-data contract.
    pub fn on_events(&self, events: &[EventDescriptor], ctx: &HookContext) {
        if self.hooks.is_empty() {
            return;
        }
        for hook in &self.hooks {
            hook.on_events(events.to_vec(), ctx);
        }
    }

    /// Invoke `on_orders_applied` on all hooks.
    pub fn on_orders_applied(&self, orders: &[AppliedOrder], ctx: &HookContext) {
        if self.hooks.is_empty() {
            return;
        }
        for hook in &self.hooks {
            hook.on_orders_applied(orders.to_vec(), ctx);
        }
    }

    /// Invoke `on_tick_end` on all hooks.
    pub fn on_tick_end(&self, snapshot: &TickSnapshot, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.on_tick_end(snapshot, ctx);
        }
    }

    /// Invoke `on_simulation_end` on all hooks.
    pub fn on_simulation_end(&self, result: &SimulationResult) {
        for hook in &self.hooks {
            hook.on_simulation_end(result);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::default_prices;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn test_ctx() -> HookContext {
        HookContext {
            tick: 1,
            total_ticks: 14,
            prices: default_prices(),
            agent_count: 2,
        }
    }

    struct CountingHook {
        tick_starts: AtomicU64,
        tick_ends: AtomicU64,
        orders_seen: AtomicU64,
    }

    impl CountingHook {
        fn new() -> Self {
            Self {
                tick_starts: AtomicU64::new(0),
                tick_ends: AtomicU64::new(0),
                orders_seen: AtomicU64::new(0),
            }
        }
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_tick_start(&self, _ctx: &HookContext) {
            self.tick_starts.fetch_add(1, Ordering::Relaxed);
        }

        fn on_orders_applied(&self, orders: Vec<AppliedOrder>, _ctx: &HookContext) {
            self.orders_seen
                .fetch_add(orders.len() as u64, Ordering::Relaxed);
        }

        fn on_tick_end(&self, _snapshot: &TickSnapshot, _ctx: &HookContext) {
            self.tick_ends.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::new());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        let ctx = test_ctx();
        runner.on_tick_start(&ctx);
        runner.on_tick_start(&ctx);

        assert_eq!(hook.tick_starts.load(Ordering::Relaxed), 2);
        assert_eq!(hook.tick_ends.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_multiple_hooks_called_in_order() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(hook1.clone());
        runner.add(hook2.clone());

        runner.on_tick_start(&test_ctx());

        assert_eq!(hook1.tick_starts.load(Ordering::Relaxed), 1);
        assert_eq!(hook2.tick_starts.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::new()));

        assert_eq!(runner.hook_names(), vec!["NoOp", "CountingHook"]);
    }
}
