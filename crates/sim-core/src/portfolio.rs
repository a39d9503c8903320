//! Portfolio model: agent initialization, equity valuation, and order
//! application against the run constraints.

use types::{
    AgentConfig, AgentState, AppliedOrder, Constraints, Order, OrderAction, Portfolio, PriceMap,
    Ticker,
};

/// Outcome of applying one tick's order batch for a single agent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderOutcome {
    /// Orders that executed, with fill prices.
    pub applied_orders: Vec<AppliedOrder>,
    /// Violations raised by this batch (rejections and limit breaches).
    pub violations: Vec<String>,
    /// Total notional traded by this batch.
    pub turnover_delta: f64,
}

/// Build a fresh agent with the constraint-defined starting cash.
pub fn init_agent_state(config: AgentConfig, constraints: &Constraints) -> AgentState {
    AgentState {
        config,
        portfolio: Portfolio::with_cash(constraints.initial_cash),
        equity_history: Vec::new(),
        violations: Vec::new(),
        turnover: 0.0,
        total_trades: 0,
    }
}

/// Total portfolio value at the given prices.
pub fn compute_equity(portfolio: &Portfolio, prices: &PriceMap) -> f64 {
    let positions: f64 = portfolio
        .holdings
        .iter()
        .map(|(ticker, &qty)| qty as f64 * prices[ticker])
        .sum();
    portfolio.cash + positions
}

/// Apply one agent's order batch sequentially at current prices.
///
/// Invalid orders (insufficient cash, insufficient holdings) are rejected
/// with a violation but never abort the batch. Position-limit and COAL
/// exposure checks run after each execution; breaches are recorded as
/// violations but the trade still stands.
pub fn apply_orders(
    agent: &mut AgentState,
    orders: &[Order],
    prices: &PriceMap,
    constraints: &Constraints,
) -> OrderOutcome {
    let mut outcome = OrderOutcome::default();

    for order in orders {
        // Zero-quantity orders are malformed; drop them silently.
        if order.quantity == 0 {
            continue;
        }

        let price = prices[order.ticker];
        let notional = price * order.quantity as f64;

        match order.action {
            OrderAction::Buy => {
                if notional > agent.portfolio.cash {
                    outcome.violations.push(format!(
                        "Insufficient cash for BUY {} x{}",
                        order.ticker, order.quantity
                    ));
                    continue;
                }
                agent.portfolio.cash -= notional;
                agent.portfolio.holdings[order.ticker] += order.quantity;
            }
            OrderAction::Sell => {
                if agent.portfolio.holdings[order.ticker] < order.quantity {
                    outcome
                        .violations
                        .push(format!("No holdings to SELL {}", order.ticker));
                    continue;
                }
                agent.portfolio.cash += notional;
                agent.portfolio.holdings[order.ticker] -= order.quantity;
            }
        }

        outcome.applied_orders.push(AppliedOrder {
            ticker: order.ticker,
            action: order.action,
            quantity: order.quantity,
            fill_price: price,
        });
        outcome.turnover_delta += notional;
        agent.total_trades += 1;

        check_exposure(agent, order.ticker, prices, constraints, &mut outcome);
    }

    outcome
}

/// Post-trade exposure checks. Non-blocking: a breach costs a violation,
/// the position is not unwound.
fn check_exposure(
    agent: &AgentState,
    ticker: Ticker,
    prices: &PriceMap,
    constraints: &Constraints,
    outcome: &mut OrderOutcome,
) {
    let equity = compute_equity(&agent.portfolio, prices);
    if equity <= 0.0 {
        return;
    }

    let position_value = agent.portfolio.holdings[ticker] as f64 * prices[ticker];
    let pct = position_value / equity;

    if pct > constraints.max_position_pct {
        outcome.violations.push(format!(
            "Position limit exceeded: {} is {:.1}% of portfolio (max {:.0}%)",
            ticker,
            pct * 100.0,
            constraints.max_position_pct * 100.0
        ));
    }

    if ticker == Ticker::Coal && pct > constraints.max_coal_pct {
        outcome.violations.push(format!(
            "COAL exposure {:.1}% exceeds the {:.0}% cap",
            pct * 100.0,
            constraints.max_coal_pct * 100.0
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TickerMap;

    fn test_prices() -> PriceMap {
        TickerMap::from_fn(|t| match t {
            Ticker::Santa => 100.0,
            Ticker::Rein => 40.0,
            Ticker::Elf => 20.0,
            Ticker::Coal => 5.0,
            Ticker::Gift => 80.0,
        })
    }

    fn test_agent() -> AgentState {
        init_agent_state(
            AgentConfig::new("test-agent", "Test Agent", "test-model"),
            &Constraints::default(),
        )
    }

    #[test]
    fn test_init_agent() {
        let agent = test_agent();
        assert_eq!(agent.portfolio.cash, 100_000.0);
        assert_eq!(agent.portfolio.holdings[Ticker::Santa], 0);
        assert!(agent.equity_history.is_empty());
        assert!(agent.violations.is_empty());
        assert_eq!(agent.turnover, 0.0);
    }

    #[test]
    fn test_compute_equity() {
        let mut agent = test_agent();
        agent.portfolio.cash = 50_000.0;
        agent.portfolio.holdings[Ticker::Santa] = 100;
        assert_eq!(compute_equity(&agent.portfolio, &test_prices()), 60_000.0);
    }

    #[test]
    fn test_valid_buy_executes() {
        let mut agent = test_agent();
        let orders = [Order::buy(Ticker::Santa, 100)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert_eq!(outcome.applied_orders[0].fill_price, 100.0);
        assert_eq!(agent.portfolio.holdings[Ticker::Santa], 100);
        assert_eq!(agent.portfolio.cash, 90_000.0);
        assert!(outcome.violations.is_empty());
        assert_eq!(agent.total_trades, 1);
    }

    #[test]
    fn test_valid_sell_executes() {
        let mut agent = test_agent();
        agent.portfolio.holdings[Ticker::Santa] = 100;
        agent.portfolio.cash = 90_000.0;
        let orders = [Order::sell(Ticker::Santa, 50)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert_eq!(agent.portfolio.holdings[Ticker::Santa], 50);
        assert_eq!(agent.portfolio.cash, 95_000.0);
    }

    #[test]
    fn test_buy_rejected_on_insufficient_cash() {
        let mut agent = test_agent();
        let orders = [Order::buy(Ticker::Santa, 2000)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert!(outcome.applied_orders.is_empty());
        assert!(
            outcome
                .violations
                .contains(&"Insufficient cash for BUY SANTA x2000".to_string())
        );
        assert_eq!(agent.portfolio.cash, 100_000.0);
        assert_eq!(agent.total_trades, 0);
    }

    #[test]
    fn test_sell_rejected_on_no_holdings() {
        let mut agent = test_agent();
        let orders = [Order::sell(Ticker::Santa, 100)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert!(outcome.applied_orders.is_empty());
        assert!(
            outcome
                .violations
                .contains(&"No holdings to SELL SANTA".to_string())
        );
    }

    #[test]
    fn test_position_limit_flagged_not_blocked() {
        let mut agent = test_agent();
        // 700 SANTA at $100 is 70% of a $100k portfolio.
        let orders = [Order::buy(Ticker::Santa, 700)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert!(agent.portfolio.holdings[Ticker::Santa] == 700);
        assert!(
            outcome
                .violations
                .iter()
                .any(|v| v.contains("Position limit exceeded"))
        );
    }

    #[test]
    fn test_coal_exposure_flagged() {
        let mut agent = test_agent();
        // 5000 COAL at $5 is 25%, above the 20% cap but below the 60% limit.
        let orders = [Order::buy(Ticker::Coal, 5000)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert!(outcome.violations.iter().any(|v| v.contains("COAL exposure")));
        assert!(
            !outcome
                .violations
                .iter()
                .any(|v| v.contains("Position limit"))
        );
    }

    #[test]
    fn test_turnover_accumulates_notional() {
        let mut agent = test_agent();
        let orders = [Order::buy(Ticker::Santa, 100), Order::buy(Ticker::Rein, 50)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.turnover_delta, 100.0 * 100.0 + 50.0 * 40.0);
    }

    #[test]
    fn test_zero_quantity_dropped_silently() {
        let mut agent = test_agent();
        let orders = [Order::buy(Ticker::Santa, 0), Order::buy(Ticker::Rein, 10)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert_eq!(outcome.applied_orders[0].ticker, Ticker::Rein);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn test_batch_is_sequential() {
        let mut agent = test_agent();
        // First buy consumes most of the cash, so the second must bounce.
        let orders = [Order::buy(Ticker::Santa, 950), Order::buy(Ticker::Gift, 100)];

        let outcome = apply_orders(&mut agent, &orders, &test_prices(), &Constraints::default());

        assert_eq!(outcome.applied_orders.len(), 1);
        assert!(
            outcome
                .violations
                .contains(&"Insufficient cash for BUY GIFT x100".to_string())
        );
    }
}
