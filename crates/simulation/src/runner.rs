//! Simulation runner implementing the tick-based run loop.
//!
//! Per tick: advance the market, inject any scripted events, freeze each
//! agent's turn state, fan the policy calls out concurrently, then apply the
//! resulting orders strictly sequentially in fixed agent order (execution
//! mutates per-agent state, and with trade pressure enabled feeds back into
//! shared prices). Scoring and ranking run once after the final tick.
//!
//! Policy calls for one tick are independent reads of the same frozen
//! snapshot, so they parallelize via rayon without changing the outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use sim_core::{
    SeededRng, advance, apply_orders, apply_overrides, apply_scripted_events,
    apply_trade_pressure, compute_equity, init_agent_state, init_market_state, rank_agents,
    score_agent,
};
use types::{
    AgentConfig, AgentState, AgentTickLog, Constraints, ScenarioConfig, SimulationResult, Tick,
    TickSnapshot,
};

use crate::error::{Result, SimulationError};
use crate::hooks::{HookContext, HookRunner, SimulationHook};
use crate::policy::{PolicyCaller, PolicyDecision, build_turn_state};

// ─────────────────────────────────────────────────────────────────────────────
// Run Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to run one simulation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scenario: ScenarioConfig,
    pub agents: Vec<AgentConfig>,
    pub total_ticks: Tick,
    pub constraints: Constraints,
    /// Enable the aggregate trade-pressure pass after each tick's trades.
    pub trade_pressure: bool,
}

impl RunConfig {
    pub fn new(scenario: ScenarioConfig, agents: Vec<AgentConfig>, total_ticks: Tick) -> Self {
        Self {
            scenario,
            agents,
            total_ticks,
            constraints: Constraints::default(),
            trade_pressure: false,
        }
    }

    /// Build a config from a preset scenario id.
    pub fn for_scenario(id: &str, agents: Vec<AgentConfig>, total_ticks: Tick) -> Result<Self> {
        let scenario = scenarios::get_scenario(id)
            .ok_or_else(|| SimulationError::UnknownScenario(id.to_string()))?;
        Ok(Self::new(scenario, agents, total_ticks))
    }

    pub fn with_trade_pressure(mut self, enabled: bool) -> Self {
        self.trade_pressure = enabled;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming Progress
// ─────────────────────────────────────────────────────────────────────────────

/// Progress updates emitted by [`SimulationRunner::run_streaming`].
#[derive(Debug, Clone)]
pub enum SimulationProgress {
    /// One tick completed.
    Tick {
        tick: Tick,
        total_ticks: Tick,
        snapshot: TickSnapshot,
    },
    /// The run finished with a full result.
    Complete { result: SimulationResult },
    /// The run could not be completed.
    Failed { message: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

/// The main simulation runner.
pub struct SimulationRunner {
    config: RunConfig,
    hooks: HookRunner,
    stop: Arc<AtomicBool>,
}

impl SimulationRunner {
    /// Build a runner, validating the configuration up front.
    pub fn new(config: RunConfig) -> Result<Self> {
        if config.agents.is_empty() {
            return Err(SimulationError::NoAgents);
        }
        if config.constraints.initial_cash <= 0.0 {
            return Err(sim_core::SimCoreError::NonPositiveCash.into());
        }
        Ok(Self {
            config,
            hooks: HookRunner::new(),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Register an observer hook.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    /// Handle for requesting cancellation from another thread.
    ///
    /// The flag is checked once per tick, before the tick's policy calls
    /// are issued; a completed tick is never discarded.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run to completion and return the final result.
    pub fn run(&self, policy: &dyn PolicyCaller) -> Result<SimulationResult> {
        self.run_internal(policy, None)
    }

    /// Run, emitting per-tick progress over `tx`, and return the final
    /// result. A setup failure is also reported on the channel.
    pub fn run_streaming(
        &self,
        policy: &dyn PolicyCaller,
        tx: &Sender<SimulationProgress>,
    ) -> Result<SimulationResult> {
        match self.run_internal(policy, Some(tx)) {
            Ok(result) => Ok(result),
            Err(e) => {
                let _ = tx.send(SimulationProgress::Failed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn run_internal(
        &self,
        policy: &dyn PolicyCaller,
        progress: Option<&Sender<SimulationProgress>>,
    ) -> Result<SimulationResult> {
        let scenario = &self.config.scenario;
        let total_ticks = self.config.total_ticks;
        let constraints = self.config.constraints;

        let mut rng = SeededRng::new(scenario.seed);
        let mut market = apply_overrides(init_market_state(total_ticks)?, scenario);

        let mut agents: Vec<AgentState> = self
            .config
            .agents
            .iter()
            .map(|config| init_agent_state(config.clone(), &constraints))
            .collect();

        info!(
            scenario = %scenario.id,
            agents = agents.len(),
            total_ticks,
            trade_pressure = self.config.trade_pressure,
            "starting simulation run"
        );

        let mut timeline: Vec<TickSnapshot> = Vec::with_capacity(total_ticks as usize);

        for tick in 1..=total_ticks {
            if self.stop.load(Ordering::Relaxed) {
                debug!(tick, "stop requested, ending run early");
                break;
            }

            market = advance(&market, &mut rng);
            market = apply_scripted_events(market, scenario, tick);

            let ctx = HookContext {
                tick,
                total_ticks,
                prices: market.prices,
                agent_count: agents.len(),
            };
            self.hooks.on_tick_start(&ctx);
            self.hooks.on_events(&market.events, &ctx);

            // Concurrent fan-out: each call reads its own frozen snapshot.
            let decisions: Vec<std::result::Result<PolicyDecision, _>> = agents
                .par_iter()
                .map(|agent| {
                    let turn = build_turn_state(&market, agent, &constraints);
                    policy.decide(&agent.config, &turn)
                })
                .collect();

            // Sequential application in fixed agent order.
            let mut all_applied = Vec::new();
            let mut tick_inputs = Vec::with_capacity(agents.len());
            for (agent, result) in agents.iter_mut().zip(decisions) {
                let decision = match result {
                    Ok(d) => d,
                    Err(e) => {
                        warn!(agent = %agent.config.id, tick, error = %e, "policy call failed, holding");
                        agent.violations.push("Model error: no orders".to_string());
                        PolicyDecision::hold("Model call failed")
                    }
                };

                let outcome = apply_orders(agent, &decision.orders, &market.prices, &constraints);
                agent.turnover += outcome.turnover_delta;
                agent.violations.extend(outcome.violations.iter().cloned());
                all_applied.extend(outcome.applied_orders.iter().copied());
                tick_inputs.push((decision.reasoning, outcome));
            }

            if self.config.trade_pressure {
                apply_trade_pressure(&mut market, &all_applied);
            }

            // Equity is recorded at this tick's settled prices (post
            // trade-pressure when enabled), so logs agree with the snapshot.
            let mut agent_logs = Vec::with_capacity(agents.len());
            for (agent, (reasoning, outcome)) in agents.iter_mut().zip(tick_inputs) {
                let equity = compute_equity(&agent.portfolio, &market.prices);
                agent.equity_history.push(equity);
                agent_logs.push(AgentTickLog {
                    agent_id: agent.config.id.clone(),
                    reasoning,
                    orders: outcome.applied_orders,
                    equity,
                    violations: outcome.violations,
                    portfolio: agent.portfolio,
                });
            }

            let snapshot = TickSnapshot {
                tick,
                prices: market.prices,
                events: market.events.clone(),
                agent_logs,
            };

            let end_ctx = HookContext {
                prices: market.prices,
                ..ctx
            };
            self.hooks.on_orders_applied(&all_applied, &end_ctx);
            self.hooks.on_tick_end(&snapshot, &end_ctx);

            if let Some(tx) = progress {
                let _ = tx.send(SimulationProgress::Tick {
                    tick,
                    total_ticks,
                    snapshot: snapshot.clone(),
                });
            }

            timeline.push(snapshot);
        }

        let scores = rank_agents(
            agents
                .iter()
                .map(|agent| score_agent(agent, &market.prices, constraints.initial_cash))
                .collect(),
        );

        let result = SimulationResult {
            scenario_id: scenario.id.clone(),
            timeline,
            scores,
        };

        self.hooks.on_simulation_end(&result);
        if let Some(tx) = progress {
            let _ = tx.send(SimulationProgress::Complete {
                result: result.clone(),
            });
        }

        info!(
            scenario = %scenario.id,
            ticks_completed = result.timeline.len(),
            "simulation run complete"
        );

        Ok(result)
    }
}
