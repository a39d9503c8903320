//! Core types for the Santa Market simulation.
//!
//! This crate provides all shared data types used across the simulation:
//! the fixed instrument set, market and agent state, orders, scenario
//! configuration, and end-of-run scoring records.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use derive_more::Display;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Time
// =============================================================================

/// Simulation tick number (discrete time step).
pub type Tick = u64;

// =============================================================================
// Instruments
// =============================================================================

/// The fixed, closed set of five tradable tickers.
///
/// Order and price maps are always fully populated over this set; there are
/// no sparse or partial price maps anywhere in the engine.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ticker {
    #[display("SANTA")]
    Santa,
    #[display("REIN")]
    Rein,
    #[display("ELF")]
    Elf,
    #[display("COAL")]
    Coal,
    #[display("GIFT")]
    Gift,
}

impl Ticker {
    /// Every tradable ticker, in canonical order.
    pub const ALL: [Ticker; 5] = [
        Ticker::Santa,
        Ticker::Rein,
        Ticker::Elf,
        Ticker::Coal,
        Ticker::Gift,
    ];

    /// Canonical index into [`TickerMap`] storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Ticker::Santa => 0,
            Ticker::Rein => 1,
            Ticker::Elf => 2,
            Ticker::Coal => 3,
            Ticker::Gift => 4,
        }
    }
}

// =============================================================================
// TickerMap
// =============================================================================

/// A total map from [`Ticker`] to `T`.
///
/// Backed by a fixed array so every ticker always has a value; this is how
/// the fully-populated-map invariant is enforced by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickerMap<T> {
    slots: [T; 5],
}

impl<T> TickerMap<T> {
    /// Build a map by evaluating `f` for each ticker in canonical order.
    pub fn from_fn(mut f: impl FnMut(Ticker) -> T) -> Self {
        Self {
            slots: Ticker::ALL.map(&mut f),
        }
    }

    /// Build a map holding the same value for every ticker.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_| value.clone())
    }

    /// Iterate over `(ticker, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Ticker, &T)> {
        Ticker::ALL.iter().map(|t| (*t, &self.slots[t.index()]))
    }

    /// Apply `f` to every value, producing a new map.
    pub fn map<U>(&self, mut f: impl FnMut(Ticker, &T) -> U) -> TickerMap<U> {
        TickerMap::from_fn(|t| f(t, &self.slots[t.index()]))
    }
}

impl<T> Index<Ticker> for TickerMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, ticker: Ticker) -> &T {
        &self.slots[ticker.index()]
    }
}

impl<T> IndexMut<Ticker> for TickerMap<T> {
    #[inline]
    fn index_mut(&mut self, ticker: Ticker) -> &mut T {
        &mut self.slots[ticker.index()]
    }
}

impl<T: Serialize> Serialize for TickerMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for (ticker, value) in self.iter() {
            map.serialize_entry(&ticker, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TickerMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TickerMapVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for TickerMapVisitor<T> {
            type Value = TickerMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map with one entry per ticker")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut slots: [Option<T>; 5] = [None, None, None, None, None];
                while let Some((ticker, value)) = access.next_entry::<Ticker, T>()? {
                    slots[ticker.index()] = Some(value);
                }
                let mut out = Vec::with_capacity(5);
                for (slot, ticker) in slots.into_iter().zip(Ticker::ALL) {
                    match slot {
                        Some(v) => out.push(v),
                        None => {
                            return Err(serde::de::Error::custom(format!(
                                "missing entry for ticker {ticker}"
                            )));
                        }
                    }
                }
                let slots: [T; 5] = out
                    .try_into()
                    .map_err(|_| serde::de::Error::custom("ticker map size mismatch"))?;
                Ok(TickerMap { slots })
            }
        }

        deserializer.deserialize_map(TickerMapVisitor(std::marker::PhantomData))
    }
}

/// Current market prices, one per ticker.
pub type PriceMap = TickerMap<f64>;

/// Share counts held by an agent, one per ticker.
pub type Holdings = TickerMap<u32>;

// =============================================================================
// Macro Environment
// =============================================================================

/// The four bounded macro-economic indicators.
///
/// Each indicator drifts by a small random jitter per tick and is clamped to
/// its documented range by [`MacroEnvironment::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroEnvironment {
    /// Consumer sentiment, 0..=100.
    pub consumer_sentiment: f64,
    /// Labor disruption risk, 0..=1.
    pub labor_disruption_risk: f64,
    /// Supply chain pressure, 0..=100.
    pub supply_chain_pressure: f64,
    /// Energy cost index, 0.5..=2.0.
    pub energy_cost_index: f64,
}

impl MacroEnvironment {
    /// Clamp every indicator back into its documented range.
    pub fn clamp(&mut self) {
        self.consumer_sentiment = self.consumer_sentiment.clamp(0.0, 100.0);
        self.labor_disruption_risk = self.labor_disruption_risk.clamp(0.0, 1.0);
        self.supply_chain_pressure = self.supply_chain_pressure.clamp(0.0, 100.0);
        self.energy_cost_index = self.energy_cost_index.clamp(0.5, 2.0);
    }
}

impl Default for MacroEnvironment {
    fn default() -> Self {
        Self {
            consumer_sentiment: 60.0,
            labor_disruption_risk: 0.4,
            supply_chain_pressure: 40.0,
            energy_cost_index: 1.0,
        }
    }
}

// =============================================================================
// Regime
// =============================================================================

/// Coarse market phase over the run horizon.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimePhase {
    #[display("pre_season")]
    PreSeason,
    #[display("holiday_rush")]
    HolidayRush,
    #[display("post_peak")]
    PostPeak,
}

/// Current regime: phase, time spent in it, and the volatility scale it
/// applies to every instrument's noise term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeState {
    pub phase: RegimePhase,
    pub ticks_in_phase: u64,
    pub volatility_multiplier: f64,
}

impl Default for RegimeState {
    fn default() -> Self {
        Self {
            phase: RegimePhase::PreSeason,
            ticks_in_phase: 0,
            volatility_multiplier: 1.0,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// What an event applies to: one ticker, or the whole market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTarget {
    /// Every instrument.
    #[serde(rename = "ALL")]
    All,
    /// A single instrument.
    #[serde(untagged)]
    One(Ticker),
}

impl EventTarget {
    /// Whether this target covers `ticker`.
    #[inline]
    pub fn matches(self, ticker: Ticker) -> bool {
        match self {
            EventTarget::All => true,
            EventTarget::One(t) => t == ticker,
        }
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::All => write!(f, "ALL"),
            EventTarget::One(t) => write!(f, "{t}"),
        }
    }
}

/// Category of a news event.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    #[display("labor")]
    Labor,
    #[display("esg")]
    Esg,
    #[display("weather")]
    Weather,
    #[display("demand")]
    Demand,
    #[display("ops")]
    Ops,
}

impl EventCategory {
    /// Every category, for uniform random selection.
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Labor,
        EventCategory::Esg,
        EventCategory::Weather,
        EventCategory::Demand,
        EventCategory::Ops,
    ];
}

/// Direction of a news event's price pressure.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDirection {
    #[display("positive")]
    Positive,
    #[display("negative")]
    Negative,
}

impl EventDirection {
    /// +1.0 or -1.0, the sign applied to a shock band.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            EventDirection::Positive => 1.0,
            EventDirection::Negative => -1.0,
        }
    }
}

/// Size of a news event's fixed percentage shock band.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMagnitude {
    #[display("small")]
    Small,
    #[display("medium")]
    Medium,
    #[display("large")]
    Large,
}

impl EventMagnitude {
    /// Every magnitude, for uniform random selection.
    pub const ALL: [EventMagnitude; 3] = [
        EventMagnitude::Small,
        EventMagnitude::Medium,
        EventMagnitude::Large,
    ];

    /// The unsigned shock band: 0.5% / 1% / 1.5%.
    #[inline]
    pub fn shock(self) -> f64 {
        match self {
            EventMagnitude::Small => 0.005,
            EventMagnitude::Medium => 0.01,
            EventMagnitude::Large => 0.015,
        }
    }
}

/// A news/event descriptor active for exactly one tick.
///
/// Purely descriptive plus a price-shock input; carries no other state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub target: EventTarget,
    pub category: EventCategory,
    pub direction: EventDirection,
    pub magnitude: EventMagnitude,
    pub message: String,
}

impl EventDescriptor {
    /// Signed percentage shock this event applies to `ticker` (0.0 when the
    /// target does not match).
    pub fn price_shock(&self, ticker: Ticker) -> f64 {
        if self.target.matches(ticker) {
            self.direction.sign() * self.magnitude.shock()
        } else {
            0.0
        }
    }
}

// =============================================================================
// Market State
// =============================================================================

/// The complete mutable market state, one live instance per run.
///
/// Invariant: `price_history[ticker].len() == tick + 1` for every ticker,
/// one entry per tick including the initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Current tick, starts at 0 and increments by exactly 1 per advance.
    pub tick: Tick,
    /// Run horizon; constant, used only for regime-phase fractions.
    pub total_ticks: Tick,
    /// Current prices, floor-clamped positive.
    pub prices: PriceMap,
    /// Full price history, one appended entry per tick.
    pub price_history: TickerMap<Vec<f64>>,
    /// Macro indicators.
    pub macro_env: MacroEnvironment,
    /// Current regime.
    pub regime: RegimeState,
    /// Events active this tick only.
    pub events: Vec<EventDescriptor>,
}

// =============================================================================
// Orders & Portfolio
// =============================================================================

/// Buy or sell.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    #[display("BUY")]
    Buy,
    #[display("SELL")]
    Sell,
}

/// A desired trade produced by an agent's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub ticker: Ticker,
    pub action: OrderAction,
    pub quantity: u32,
}

impl Order {
    pub fn buy(ticker: Ticker, quantity: u32) -> Self {
        Self {
            ticker,
            action: OrderAction::Buy,
            quantity,
        }
    }

    pub fn sell(ticker: Ticker, quantity: u32) -> Self {
        Self {
            ticker,
            action: OrderAction::Sell,
            quantity,
        }
    }
}

/// An order that actually executed, with its fill price attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedOrder {
    pub ticker: Ticker,
    pub action: OrderAction,
    pub quantity: u32,
    pub fill_price: f64,
}

impl AppliedOrder {
    /// Notional value of the fill (always positive).
    #[inline]
    pub fn notional(&self) -> f64 {
        self.fill_price * self.quantity as f64
    }

    /// Signed share volume: positive for buys, negative for sells.
    #[inline]
    pub fn signed_volume(&self) -> i64 {
        match self.action {
            OrderAction::Buy => self.quantity as i64,
            OrderAction::Sell => -(self.quantity as i64),
        }
    }
}

/// Cash plus share holdings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Cash balance; never negative after a valid execution.
    pub cash: f64,
    /// Non-negative share counts per ticker.
    pub holdings: Holdings,
}

impl Portfolio {
    /// A fresh portfolio with the given cash and no positions.
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            holdings: Holdings::default(),
        }
    }
}

// =============================================================================
// Agents
// =============================================================================

/// Static identity of a competing agent.
///
/// `policy_ref` is an opaque reference handed to the external policy caller;
/// the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub policy_ref: String,
}

impl AgentConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        policy_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            policy_ref: policy_ref.into(),
        }
    }
}

/// Full per-agent state over one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub config: AgentConfig,
    pub portfolio: Portfolio,
    /// Total portfolio valuation, one entry appended per tick after trades.
    pub equity_history: Vec<f64>,
    /// Append-only log of constraint-breach descriptions.
    pub violations: Vec<String>,
    /// Cumulative notional of every executed trade.
    pub turnover: f64,
    /// Count of executed (not merely attempted) orders.
    pub total_trades: u64,
}

// =============================================================================
// Constraints
// =============================================================================

/// Run-wide, immutable trading constraints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Max fraction of equity any single instrument may represent post-trade.
    pub max_position_pct: f64,
    /// Stricter max fraction for the higher-risk COAL instrument.
    pub max_coal_pct: f64,
    /// Starting cash; also the scoring baseline.
    pub initial_cash: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_position_pct: 0.6,
            max_coal_pct: 0.2,
            initial_cash: 100_000.0,
        }
    }
}

// =============================================================================
// Turn State
// =============================================================================

/// The read-only view an external policy receives for one agent, one tick.
///
/// This is the complete contract boundary to the decision maker: it never
/// exposes other agents' portfolios or reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub tick: Tick,
    pub total_ticks: Tick,
    /// The agent's own portfolio snapshot.
    pub portfolio: Portfolio,
    pub prices: PriceMap,
    /// Recent price history, bounded to the last
    /// [`TurnState::HISTORY_WINDOW`] ticks per instrument.
    pub price_history: TickerMap<Vec<f64>>,
    pub macro_env: MacroEnvironment,
    pub regime: RegimeState,
    pub events: Vec<EventDescriptor>,
    pub constraints: Constraints,
}

impl TurnState {
    /// How many recent history entries each instrument exposes to a policy.
    pub const HISTORY_WINDOW: usize = 30;
}

// =============================================================================
// Snapshots & Results
// =============================================================================

/// One agent's record for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTickLog {
    pub agent_id: String,
    pub reasoning: String,
    /// Orders that actually executed this tick, with fill prices.
    pub orders: Vec<AppliedOrder>,
    /// Equity after this tick's trades.
    pub equity: f64,
    /// Violations raised during this tick only.
    pub violations: Vec<String>,
    /// Portfolio after this tick's trades.
    pub portfolio: Portfolio,
}

/// Everything that happened in one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: Tick,
    pub prices: PriceMap,
    pub events: Vec<EventDescriptor>,
    pub agent_logs: Vec<AgentTickLog>,
}

/// Post-hoc behavioral classification of an agent.
///
/// Derived from trade frequency and end-of-run cash ratio; never stored.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingStyle {
    #[display("aggressive")]
    Aggressive,
    #[display("conservative")]
    Conservative,
    #[display("momentum")]
    Momentum,
}

/// Final, penalty-adjusted result for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentScore {
    pub agent_id: String,
    pub name: String,
    /// 1-based position after ranking; 0 until ranked.
    pub rank: u32,
    pub final_value: f64,
    pub total_return: f64,
    pub score: f64,
    pub max_drawdown: f64,
    pub total_trades: u64,
    pub turnover: f64,
    pub violations: Vec<String>,
    pub trading_style: TradingStyle,
}

/// Complete output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario_id: String,
    pub timeline: Vec<TickSnapshot>,
    pub scores: Vec<AgentScore>,
}

// =============================================================================
// Scenarios
// =============================================================================

/// Optional overrides for the initial macro indicators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroOverrides {
    pub consumer_sentiment: Option<f64>,
    pub labor_disruption_risk: Option<f64>,
    pub supply_chain_pressure: Option<f64>,
    pub energy_cost_index: Option<f64>,
}

impl MacroOverrides {
    /// Merge the overridden fields into `env`.
    pub fn apply(&self, env: &mut MacroEnvironment) {
        if let Some(v) = self.consumer_sentiment {
            env.consumer_sentiment = v;
        }
        if let Some(v) = self.labor_disruption_risk {
            env.labor_disruption_risk = v;
        }
        if let Some(v) = self.supply_chain_pressure {
            env.supply_chain_pressure = v;
        }
        if let Some(v) = self.energy_cost_index {
            env.energy_cost_index = v;
        }
    }
}

/// A non-random event bound to a specific tick of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Tick at which the event fires.
    pub tick: Tick,
    pub event: EventDescriptor,
    /// Optional direct price shocks, as fractional changes per ticker.
    /// Applied multiplicatively after the random price model.
    #[serde(default)]
    pub price_shock: BTreeMap<Ticker, f64>,
}

/// A named, curated simulation preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// RNG seed; the whole run is reproducible from this value.
    pub seed: u32,
    /// Partial initial-price overrides, merged over engine defaults.
    #[serde(default)]
    pub initial_prices: BTreeMap<Ticker, f64>,
    #[serde(default)]
    pub macro_overrides: MacroOverrides,
    #[serde(default)]
    pub scripted_events: Vec<ScriptedEvent>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_display() {
        assert_eq!(Ticker::Santa.to_string(), "SANTA");
        assert_eq!(Ticker::Coal.to_string(), "COAL");
    }

    #[test]
    fn test_ticker_map_indexing() {
        let mut map = TickerMap::<u32>::default();
        map[Ticker::Rein] = 7;
        assert_eq!(map[Ticker::Rein], 7);
        assert_eq!(map[Ticker::Gift], 0);
    }

    #[test]
    fn test_ticker_map_from_fn_order() {
        let map = TickerMap::from_fn(|t| t.index());
        let collected: Vec<_> = map.iter().map(|(t, v)| (t, *v)).collect();
        assert_eq!(collected[0], (Ticker::Santa, 0));
        assert_eq!(collected[4], (Ticker::Gift, 4));
    }

    #[test]
    fn test_ticker_map_serde_round_trip() {
        let map = TickerMap::from_fn(|t| t.index() as f64 * 10.0);
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"SANTA\""));
        let back: TickerMap<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_ticker_map_rejects_partial() {
        let err = serde_json::from_str::<TickerMap<f64>>(r#"{"SANTA": 1.0}"#).unwrap_err();
        assert!(err.to_string().contains("missing entry"));
    }

    #[test]
    fn test_macro_clamp() {
        let mut env = MacroEnvironment {
            consumer_sentiment: 130.0,
            labor_disruption_risk: -0.2,
            supply_chain_pressure: 50.0,
            energy_cost_index: 3.0,
        };
        env.clamp();
        assert_eq!(env.consumer_sentiment, 100.0);
        assert_eq!(env.labor_disruption_risk, 0.0);
        assert_eq!(env.supply_chain_pressure, 50.0);
        assert_eq!(env.energy_cost_index, 2.0);
    }

    #[test]
    fn test_event_target_matching() {
        assert!(EventTarget::All.matches(Ticker::Elf));
        assert!(EventTarget::One(Ticker::Elf).matches(Ticker::Elf));
        assert!(!EventTarget::One(Ticker::Elf).matches(Ticker::Coal));
    }

    #[test]
    fn test_event_target_serde() {
        assert_eq!(serde_json::to_string(&EventTarget::All).unwrap(), "\"ALL\"");
        assert_eq!(
            serde_json::to_string(&EventTarget::One(Ticker::Santa)).unwrap(),
            "\"SANTA\""
        );
        let all: EventTarget = serde_json::from_str("\"ALL\"").unwrap();
        assert_eq!(all, EventTarget::All);
        let one: EventTarget = serde_json::from_str("\"COAL\"").unwrap();
        assert_eq!(one, EventTarget::One(Ticker::Coal));
    }

    #[test]
    fn test_event_shock_bands() {
        assert_eq!(EventMagnitude::Small.shock(), 0.005);
        assert_eq!(EventMagnitude::Medium.shock(), 0.01);
        assert_eq!(EventMagnitude::Large.shock(), 0.015);
    }

    #[test]
    fn test_event_price_shock_signed_and_targeted() {
        let event = EventDescriptor {
            target: EventTarget::One(Ticker::Coal),
            category: EventCategory::Esg,
            direction: EventDirection::Negative,
            magnitude: EventMagnitude::Large,
            message: "divestment wave".to_string(),
        };
        assert_eq!(event.price_shock(Ticker::Coal), -0.015);
        assert_eq!(event.price_shock(Ticker::Santa), 0.0);
    }

    #[test]
    fn test_applied_order_notional_and_volume() {
        let buy = AppliedOrder {
            ticker: Ticker::Santa,
            action: OrderAction::Buy,
            quantity: 100,
            fill_price: 100.0,
        };
        assert_eq!(buy.notional(), 10_000.0);
        assert_eq!(buy.signed_volume(), 100);

        let sell = AppliedOrder {
            action: OrderAction::Sell,
            ..buy
        };
        assert_eq!(sell.signed_volume(), -100);
    }

    #[test]
    fn test_macro_overrides_partial_apply() {
        let mut env = MacroEnvironment::default();
        let overrides = MacroOverrides {
            consumer_sentiment: Some(85.0),
            labor_disruption_risk: Some(0.2),
            ..Default::default()
        };
        overrides.apply(&mut env);
        assert_eq!(env.consumer_sentiment, 85.0);
        assert_eq!(env.labor_disruption_risk, 0.2);
        assert_eq!(env.supply_chain_pressure, 40.0);
        assert_eq!(env.energy_cost_index, 1.0);
    }

    #[test]
    fn test_default_constraints() {
        let c = Constraints::default();
        assert_eq!(c.max_position_pct, 0.6);
        assert_eq!(c.max_coal_pct, 0.2);
        assert_eq!(c.initial_cash, 100_000.0);
    }
}
