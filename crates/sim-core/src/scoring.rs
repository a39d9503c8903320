//! Scoring engine: drawdown, penalty-adjusted score, style classification,
//! and final ranking.

use types::{AgentScore, AgentState, PriceMap, TradingStyle};

use crate::portfolio::compute_equity;

/// Penalty per recorded violation.
const VIOLATION_PENALTY: f64 = 1000.0;

/// Penalty per unit of turnover notional.
const TURNOVER_PENALTY_RATE: f64 = 0.0002;

/// Drawdown penalty rate, scaled by final value.
const DRAWDOWN_PENALTY_RATE: f64 = 0.05;

// Style classification thresholds.
const AGGRESSIVE_TRADES_PER_TICK: f64 = 3.0;
const AGGRESSIVE_MAX_CASH_RATIO: f64 = 0.15;
const CONSERVATIVE_TRADES_PER_TICK: f64 = 1.0;
const CONSERVATIVE_MIN_CASH_RATIO: f64 = 0.3;

/// Maximum peak-to-trough drawdown over an equity series.
///
/// Tracks a running peak; drawdown at each point is `(peak - value) / peak`
/// when the peak is positive. Empty series scores 0.
pub fn compute_max_drawdown(series: &[f64]) -> f64 {
    let mut peak = match series.first() {
        Some(&first) => first,
        None => return 0.0,
    };
    let mut max_drawdown = 0.0f64;

    for &value in series {
        if value > peak {
            peak = value;
        }
        let drawdown = if peak > 0.0 { (peak - value) / peak } else { 0.0 };
        max_drawdown = max_drawdown.max(drawdown);
    }

    max_drawdown
}

/// Classify trading behavior from trade frequency and end-of-run cash ratio.
pub fn detect_trading_style(agent: &AgentState, initial_cash: f64) -> TradingStyle {
    let total_ticks = agent.equity_history.len().max(1) as f64;
    let trades_per_tick = agent.total_trades as f64 / total_ticks;

    let equity = agent
        .equity_history
        .last()
        .copied()
        .unwrap_or(initial_cash);
    let cash_ratio = if equity > 0.0 {
        agent.portfolio.cash / equity
    } else {
        1.0
    };

    if trades_per_tick >= AGGRESSIVE_TRADES_PER_TICK && cash_ratio < AGGRESSIVE_MAX_CASH_RATIO {
        TradingStyle::Aggressive
    } else if trades_per_tick < CONSERVATIVE_TRADES_PER_TICK
        && cash_ratio > CONSERVATIVE_MIN_CASH_RATIO
    {
        TradingStyle::Conservative
    } else {
        TradingStyle::Momentum
    }
}

/// Compute an agent's final, penalty-adjusted score (rank left at 0).
pub fn score_agent(agent: &AgentState, final_prices: &PriceMap, initial_cash: f64) -> AgentScore {
    let final_value = compute_equity(&agent.portfolio, final_prices);
    let total_return = (final_value - initial_cash) / initial_cash;
    let max_drawdown = compute_max_drawdown(&agent.equity_history);

    let violation_penalty = agent.violations.len() as f64 * VIOLATION_PENALTY;
    let turnover_penalty = agent.turnover * TURNOVER_PENALTY_RATE;
    let drawdown_penalty = max_drawdown * final_value * DRAWDOWN_PENALTY_RATE;

    let score = final_value - violation_penalty - turnover_penalty - drawdown_penalty;

    AgentScore {
        agent_id: agent.config.id.clone(),
        name: agent.config.name.clone(),
        rank: 0,
        final_value,
        total_return,
        score,
        max_drawdown,
        total_trades: agent.total_trades,
        turnover: agent.turnover,
        violations: agent.violations.clone(),
        trading_style: detect_trading_style(agent, initial_cash),
    }
}

/// Sort scores descending and assign 1-based ranks. Stable: score ties keep
/// their input order.
pub fn rank_agents(mut scores: Vec<AgentScore>) -> Vec<AgentScore> {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (idx, score) in scores.iter_mut().enumerate() {
        score.rank = idx as u32 + 1;
    }
    scores
}
