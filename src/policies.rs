//! Built-in demo policies.
//!
//! Deterministic functions of the turn state, so demo runs stay reproducible
//! from the scenario seed alone. Each roster agent's `policy_ref` selects a
//! strategy; an unknown ref is a failed call, which the runner converts into
//! a hold tick plus a violation.

use simulation::{PolicyCaller, PolicyDecision, PolicyError};
use types::{AgentConfig, Order, Ticker, TurnState};

/// Dispatches to a built-in strategy by the agent's `policy_ref`.
#[derive(Debug, Default)]
pub struct DemoPolicy;

impl PolicyCaller for DemoPolicy {
    fn decide(
        &self,
        agent: &AgentConfig,
        state: &TurnState,
    ) -> Result<PolicyDecision, PolicyError> {
        match agent.policy_ref.as_str() {
            "momentum" => Ok(momentum(state)),
            "value" => Ok(value(state)),
            "steady" => Ok(steady(state)),
            other => Err(PolicyError::CallFailed(format!(
                "no built-in policy named '{other}'"
            ))),
        }
    }
}

/// Shares affordable with `fraction` of current cash at `price`.
fn affordable(cash: f64, fraction: f64, price: f64) -> u32 {
    if price <= 0.0 {
        return 0;
    }
    (cash * fraction / price).floor() as u32
}

/// Chases three-tick winning streaks, bails on losing ones.
fn momentum(state: &TurnState) -> PolicyDecision {
    let mut orders = Vec::new();
    let mut notes = Vec::new();

    for ticker in Ticker::ALL {
        let history = &state.price_history[ticker];
        if history.len() < 3 {
            continue;
        }
        let window = &history[history.len() - 3..];
        let rising = window[0] < window[1] && window[1] < window[2];
        let falling = window[0] > window[1] && window[1] > window[2];

        if rising {
            let qty = affordable(state.portfolio.cash, 0.10, state.prices[ticker]);
            if qty > 0 {
                orders.push(Order::buy(ticker, qty));
                notes.push(format!("{ticker} three-tick rally, adding"));
            }
        } else if falling && state.portfolio.holdings[ticker] > 0 {
            let qty = state.portfolio.holdings[ticker] / 2;
            if qty > 0 {
                orders.push(Order::sell(ticker, qty));
                notes.push(format!("{ticker} rolling over, trimming"));
            }
        }
    }

    if orders.is_empty() {
        PolicyDecision::hold("No streak to chase")
    } else {
        PolicyDecision {
            reasoning: notes.join("; "),
            orders,
        }
    }
}

/// Buys the deepest discount to the rolling mean, sells stretched names.
fn value(state: &TurnState) -> PolicyDecision {
    let mut best: Option<(Ticker, f64)> = None;
    let mut orders = Vec::new();
    let mut notes = Vec::new();

    for ticker in Ticker::ALL {
        let history = &state.price_history[ticker];
        if history.len() < 5 {
            continue;
        }
        let mean: f64 = history.iter().sum::<f64>() / history.len() as f64;
        let price = state.prices[ticker];

        if price > mean * 1.05 && state.portfolio.holdings[ticker] > 0 {
            let qty = state.portfolio.holdings[ticker] / 2;
            if qty > 0 {
                orders.push(Order::sell(ticker, qty));
                notes.push(format!("{ticker} stretched above its mean, selling"));
            }
            continue;
        }

        let discount = (mean - price) / mean;
        if discount > 0.02 {
            match best {
                Some((_, d)) if d >= discount => {}
                _ => best = Some((ticker, discount)),
            }
        }
    }

    if let Some((ticker, discount)) = best {
        let qty = affordable(state.portfolio.cash, 0.15, state.prices[ticker]);
        if qty > 0 {
            orders.push(Order::buy(ticker, qty));
            notes.push(format!(
                "{ticker} {:.1}% below its mean, buying",
                discount * 100.0
            ));
        }
    }

    if orders.is_empty() {
        PolicyDecision::hold("Nothing cheap enough")
    } else {
        PolicyDecision {
            reasoning: notes.join("; "),
            orders,
        }
    }
}

/// Small periodic buys, mostly cash. Dollar-cost averaging into the season.
fn steady(state: &TurnState) -> PolicyDecision {
    if state.tick % 3 != 1 {
        return PolicyDecision::hold("Between scheduled buys");
    }

    let ticker = Ticker::Gift;
    let qty = affordable(state.portfolio.cash, 0.03, state.prices[ticker]);
    if qty == 0 {
        return PolicyDecision::hold("Scheduled buy too small to fill");
    }

    PolicyDecision {
        reasoning: format!("Scheduled buy of {qty} {ticker}"),
        orders: vec![Order::buy(ticker, qty)],
    }
}
