//! The policy boundary: how agent decisions enter the simulation.
//!
//! A [`PolicyCaller`] maps one agent's frozen [`TurnState`] to a decision.
//! The production implementation calls an external model; the engine only
//! depends on this trait. Failures are a typed `Err`, never a panic, and the
//! runner converts them into a hold tick plus a recorded violation.

use std::fmt;

use types::{AgentConfig, AgentState, Constraints, MarketState, Order, TurnState};

// =============================================================================
// Decision & Error
// =============================================================================

/// One agent's decision for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecision {
    /// Free-text rationale, logged verbatim.
    pub reasoning: String,
    /// Desired orders, applied sequentially in the given order.
    pub orders: Vec<Order>,
}

impl PolicyDecision {
    /// A decision that trades nothing.
    pub fn hold(reasoning: impl Into<String>) -> Self {
        Self {
            reasoning: reasoning.into(),
            orders: Vec::new(),
        }
    }
}

/// A failed policy call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The external caller errored or produced an unusable response.
    CallFailed(String),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::CallFailed(msg) => write!(f, "policy call failed: {msg}"),
        }
    }
}

impl std::error::Error for PolicyError {}

// =============================================================================
// PolicyCaller
// =============================================================================

/// Decision source for agents.
///
/// `Send + Sync` because per-tick calls for all agents are issued
/// concurrently against the same frozen snapshot.
pub trait PolicyCaller: Send + Sync {
    /// Decide one agent's orders for one tick.
    fn decide(
        &self,
        agent: &AgentConfig,
        state: &TurnState,
    ) -> std::result::Result<PolicyDecision, PolicyError>;
}

/// A caller that always holds. Useful as a baseline and in tests.
#[derive(Debug, Default)]
pub struct HoldPolicy;

impl PolicyCaller for HoldPolicy {
    fn decide(
        &self,
        _agent: &AgentConfig,
        _state: &TurnState,
    ) -> std::result::Result<PolicyDecision, PolicyError> {
        Ok(PolicyDecision::hold("Holding position"))
    }
}

// =============================================================================
// Turn State
// =============================================================================

/// Freeze the observable view for one agent at the current tick.
///
/// Exposes the agent's own portfolio and the market, with price history
/// bounded to the last [`TurnState::HISTORY_WINDOW`] entries per instrument.
/// Other agents' state is never included.
pub fn build_turn_state(
    market: &MarketState,
    agent: &AgentState,
    constraints: &Constraints,
) -> TurnState {
    let price_history = market.price_history.map(|_, history| {
        let start = history.len().saturating_sub(TurnState::HISTORY_WINDOW);
        history[start..].to_vec()
    });

    TurnState {
        tick: market.tick,
        total_ticks: market.total_ticks,
        portfolio: agent.portfolio,
        prices: market.prices,
        price_history,
        macro_env: market.macro_env,
        regime: market.regime,
        events: market.events.clone(),
        constraints: *constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{SeededRng, advance, init_agent_state, init_market_state};
    use types::Ticker;

    fn test_agent() -> AgentState {
        init_agent_state(
            AgentConfig::new("a1", "Agent One", "model"),
            &Constraints::default(),
        )
    }

    #[test]
    fn test_turn_state_mirrors_market() {
        let market = init_market_state(14).unwrap();
        let agent = test_agent();

        let turn = build_turn_state(&market, &agent, &Constraints::default());

        assert_eq!(turn.tick, 0);
        assert_eq!(turn.total_ticks, 14);
        assert_eq!(turn.prices, market.prices);
        assert_eq!(turn.portfolio.cash, 100_000.0);
        assert_eq!(turn.constraints.max_coal_pct, 0.2);
    }

    #[test]
    fn test_history_window_is_bounded() {
        let mut rng = SeededRng::new(5);
        let mut market = init_market_state(100).unwrap();
        for _ in 0..50 {
            market = advance(&market, &mut rng);
        }

        let turn = build_turn_state(&market, &test_agent(), &Constraints::default());

        for ticker in Ticker::ALL {
            assert_eq!(turn.price_history[ticker].len(), TurnState::HISTORY_WINDOW);
            // Window holds the most recent entries.
            assert_eq!(
                turn.price_history[ticker].last(),
                market.price_history[ticker].last()
            );
        }
    }

    #[test]
    fn test_short_history_passed_whole() {
        let market = init_market_state(14).unwrap();
        let turn = build_turn_state(&market, &test_agent(), &Constraints::default());
        assert_eq!(turn.price_history[Ticker::Santa].len(), 1);
    }

    #[test]
    fn test_hold_policy_never_trades() {
        let market = init_market_state(14).unwrap();
        let agent = test_agent();
        let turn = build_turn_state(&market, &agent, &Constraints::default());

        let decision = HoldPolicy.decide(&agent.config, &turn).unwrap();
        assert!(decision.orders.is_empty());
    }
}
