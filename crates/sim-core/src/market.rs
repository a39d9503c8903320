//! Market engine: initialization and the per-tick state transition.
//!
//! [`advance`] is a pure function of the previous state plus RNG draws. All
//! randomness flows through the caller's [`SeededRng`] in a fixed draw order
//! (macro jitter, event generation, then per-instrument price noise), which
//! is what makes whole runs reproducible from a single seed.

use news::message_for;
use types::{
    EventCategory, EventDescriptor, EventDirection, EventMagnitude, EventTarget, MarketState,
    PriceMap, RegimePhase, RegimeState, ScenarioConfig, Tick, Ticker, TickerMap,
};

use crate::error::{Result, SimCoreError};
use crate::rng::SeededRng;

// =============================================================================
// Constants
// =============================================================================

/// Probability of generating one random event per tick.
const EVENT_PROBABILITY: f64 = 0.3;

/// Labor-risk level above which labor events bias negative.
const LABOR_BIAS_THRESHOLD: f64 = 0.6;

/// Probability of a negative direction for a biased labor event.
const LABOR_NEGATIVE_PROB: f64 = 0.8;

/// Prices never fall below this epsilon.
const PRICE_FLOOR: f64 = 0.01;

/// Drift amplification for season-sensitive tickers during the rush.
const SEASONAL_DRIFT_BOOST: f64 = 2.0;

/// Regime phase boundaries as fractions of the run horizon.
const PRE_SEASON_END: f64 = 4.0 / 14.0;
const HOLIDAY_RUSH_END: f64 = 10.0 / 14.0;

// Per-tick macro jitter ranges (symmetric).
const SENTIMENT_JITTER: f64 = 2.0;
const LABOR_RISK_JITTER: f64 = 0.05;
const SUPPLY_JITTER: f64 = 3.0;
const ENERGY_JITTER: f64 = 0.05;

// =============================================================================
// Instrument Profiles
// =============================================================================

/// Per-instrument price-model parameters.
#[derive(Debug, Clone, Copy)]
struct TickerProfile {
    /// Base per-tick trend.
    drift: f64,
    /// Base volatility, scaled by the regime multiplier.
    base_vol: f64,
    /// Whether drift is amplified during the holiday rush.
    seasonal: bool,
}

fn profile(ticker: Ticker) -> TickerProfile {
    match ticker {
        Ticker::Santa => TickerProfile {
            drift: 0.002,
            base_vol: 0.015,
            seasonal: true,
        },
        Ticker::Rein => TickerProfile {
            drift: 0.001,
            base_vol: 0.020,
            seasonal: true,
        },
        Ticker::Elf => TickerProfile {
            drift: 0.0015,
            base_vol: 0.025,
            seasonal: true,
        },
        Ticker::Coal => TickerProfile {
            drift: -0.001,
            base_vol: 0.035,
            seasonal: false,
        },
        Ticker::Gift => TickerProfile {
            drift: 0.001,
            base_vol: 0.012,
            seasonal: true,
        },
    }
}

/// Documented starting prices.
pub fn default_prices() -> PriceMap {
    TickerMap::from_fn(|t| match t {
        Ticker::Santa => 100.0,
        Ticker::Rein => 40.0,
        Ticker::Elf => 20.0,
        Ticker::Coal => 5.0,
        Ticker::Gift => 80.0,
    })
}

// =============================================================================
// Initialization
// =============================================================================

/// Build the tick-0 market state for a run of `total_ticks`.
pub fn init_market_state(total_ticks: Tick) -> Result<MarketState> {
    if total_ticks == 0 {
        return Err(SimCoreError::ZeroHorizon);
    }

    let prices = default_prices();
    Ok(MarketState {
        tick: 0,
        total_ticks,
        price_history: prices.map(|_, p| vec![*p]),
        prices,
        macro_env: Default::default(),
        regime: RegimeState::default(),
        events: Vec::new(),
    })
}

/// Merge a scenario's initial-price and macro overrides into `state`.
///
/// Applied exactly once, before the first [`advance`] call.
pub fn apply_overrides(mut state: MarketState, scenario: &ScenarioConfig) -> MarketState {
    for (&ticker, &price) in &scenario.initial_prices {
        state.prices[ticker] = price;
        // Tick-0 history must reflect the overridden starting price.
        state.price_history[ticker] = vec![price];
    }
    scenario.macro_overrides.apply(&mut state.macro_env);
    state
}

// =============================================================================
// Advance
// =============================================================================

/// Advance the market by one tick. Pure: `state` is not mutated.
pub fn advance(state: &MarketState, rng: &mut SeededRng) -> MarketState {
    let tick = state.tick + 1;

    let regime = next_regime(tick, state.total_ticks, &state.regime);

    let mut macro_env = state.macro_env;
    macro_env.consumer_sentiment += rng.jitter(SENTIMENT_JITTER);
    macro_env.labor_disruption_risk += rng.jitter(LABOR_RISK_JITTER);
    macro_env.supply_chain_pressure += rng.jitter(SUPPLY_JITTER);
    macro_env.energy_cost_index += rng.jitter(ENERGY_JITTER);
    macro_env.clamp();

    let mut events = Vec::new();
    if rng.next_f64() < EVENT_PROBABILITY {
        events.push(generate_event(rng, macro_env.labor_disruption_risk));
    }

    let mut prices = state.prices;
    let mut price_history = state.price_history.clone();
    for ticker in Ticker::ALL {
        let p = profile(ticker);

        let mut drift = p.drift;
        if p.seasonal && regime.phase == RegimePhase::HolidayRush {
            drift *= SEASONAL_DRIFT_BOOST;
        }

        let shock = rng.jitter(p.base_vol) * regime.volatility_multiplier;
        let news: f64 = events.iter().map(|e| e.price_shock(ticker)).sum();

        let next = (prices[ticker] * (1.0 + drift + shock + news)).max(PRICE_FLOOR);
        prices[ticker] = next;
        price_history[ticker].push(next);
    }

    MarketState {
        tick,
        total_ticks: state.total_ticks,
        prices,
        price_history,
        macro_env,
        regime,
        events,
    }
}

fn next_regime(tick: Tick, total_ticks: Tick, prev: &RegimeState) -> RegimeState {
    let frac = tick as f64 / total_ticks as f64;
    let (phase, volatility_multiplier) = if frac <= PRE_SEASON_END {
        (RegimePhase::PreSeason, 1.0)
    } else if frac <= HOLIDAY_RUSH_END {
        (RegimePhase::HolidayRush, 1.3)
    } else {
        (RegimePhase::PostPeak, 1.4)
    };

    let ticks_in_phase = if phase == prev.phase {
        prev.ticks_in_phase + 1
    } else {
        1
    };

    RegimeState {
        phase,
        ticks_in_phase,
        volatility_multiplier,
    }
}

fn generate_event(rng: &mut SeededRng, labor_risk: f64) -> EventDescriptor {
    let target = EventTarget::One(*rng.pick(&Ticker::ALL));
    let category = *rng.pick(&EventCategory::ALL);
    let magnitude = *rng.pick(&EventMagnitude::ALL);

    let negative_prob = if category == EventCategory::Labor && labor_risk > LABOR_BIAS_THRESHOLD {
        LABOR_NEGATIVE_PROB
    } else {
        0.5
    };
    let direction = if rng.next_f64() < negative_prob {
        EventDirection::Negative
    } else {
        EventDirection::Positive
    };

    let message = message_for(category, direction, rng.next_f64()).to_string();

    EventDescriptor {
        target,
        category,
        direction,
        magnitude,
        message,
    }
}

// =============================================================================
// Scripted Events
// =============================================================================

/// Inject any of the scenario's scripted events bound to `tick`.
///
/// Events are appended to the tick's active list; direct price shocks are
/// applied multiplicatively in list order, on top of the random price model.
/// No-op on ticks with nothing scripted.
pub fn apply_scripted_events(
    mut state: MarketState,
    scenario: &ScenarioConfig,
    tick: Tick,
) -> MarketState {
    for scripted in scenario.scripted_events.iter().filter(|e| e.tick == tick) {
        state.events.push(scripted.event.clone());
        for (&ticker, &shock) in &scripted.price_shock {
            let next = (state.prices[ticker] * (1.0 + shock)).max(PRICE_FLOOR);
            state.prices[ticker] = next;
            // The shocked price replaces this tick's history entry.
            if let Some(last) = state.price_history[ticker].last_mut() {
                *last = next;
            }
        }
    }
    state
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use types::MacroOverrides;

    fn empty_scenario(seed: u32) -> ScenarioConfig {
        ScenarioConfig {
            id: "test".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            seed,
            initial_prices: BTreeMap::new(),
            macro_overrides: MacroOverrides::default(),
            scripted_events: Vec::new(),
        }
    }

    #[test]
    fn test_init_defaults() {
        let state = init_market_state(14).unwrap();
        assert_eq!(state.tick, 0);
        assert_eq!(state.prices[Ticker::Santa], 100.0);
        assert_eq!(state.prices[Ticker::Coal], 5.0);
        assert_eq!(state.price_history[Ticker::Gift], vec![80.0]);
        assert_eq!(state.macro_env.consumer_sentiment, 60.0);
        assert_eq!(state.regime.phase, RegimePhase::PreSeason);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_init_rejects_zero_horizon() {
        assert_eq!(init_market_state(0), Err(SimCoreError::ZeroHorizon));
    }

    #[test]
    fn test_advance_is_deterministic() {
        let run = |seed: u32| {
            let mut rng = SeededRng::new(seed);
            let mut state = init_market_state(14).unwrap();
            for _ in 0..14 {
                state = advance(&state, &mut rng);
            }
            state
        };
        assert_eq!(run(12345), run(12345));
    }

    #[test]
    fn test_advance_does_not_mutate_input() {
        let mut rng = SeededRng::new(1);
        let state = init_market_state(14).unwrap();
        let before = state.clone();
        let _ = advance(&state, &mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_history_grows_one_per_tick() {
        let mut rng = SeededRng::new(7);
        let mut state = init_market_state(20).unwrap();
        for _ in 0..20 {
            state = advance(&state, &mut rng);
            for ticker in Ticker::ALL {
                assert_eq!(
                    state.price_history[ticker].len() as u64,
                    state.tick + 1,
                    "history length must track tick for {ticker}"
                );
            }
        }
    }

    #[test]
    fn test_prices_stay_positive() {
        let mut rng = SeededRng::new(666);
        let mut state = init_market_state(500).unwrap();
        for _ in 0..500 {
            state = advance(&state, &mut rng);
            for ticker in Ticker::ALL {
                assert!(state.prices[ticker] >= PRICE_FLOOR);
            }
        }
    }

    #[test]
    fn test_regime_phase_boundaries() {
        // 14-tick horizon: ticks 1-4 pre-season, 5-10 holiday rush, 11-14 post-peak.
        let mut rng = SeededRng::new(42);
        let mut state = init_market_state(14).unwrap();
        let mut phases = Vec::new();
        for _ in 0..14 {
            state = advance(&state, &mut rng);
            phases.push(state.regime.phase);
        }
        assert_eq!(phases[3], RegimePhase::PreSeason);
        assert_eq!(phases[4], RegimePhase::HolidayRush);
        assert_eq!(phases[9], RegimePhase::HolidayRush);
        assert_eq!(phases[10], RegimePhase::PostPeak);
        assert_eq!(phases[13], RegimePhase::PostPeak);
    }

    #[test]
    fn test_regime_volatility_multipliers() {
        let mut rng = SeededRng::new(42);
        let mut state = init_market_state(14).unwrap();
        for _ in 0..14 {
            state = advance(&state, &mut rng);
            let expected = match state.regime.phase {
                RegimePhase::PreSeason => 1.0,
                RegimePhase::HolidayRush => 1.3,
                RegimePhase::PostPeak => 1.4,
            };
            assert_eq!(state.regime.volatility_multiplier, expected);
        }
    }

    #[test]
    fn test_ticks_in_phase_resets_on_change() {
        let mut rng = SeededRng::new(42);
        let mut state = init_market_state(14).unwrap();
        let mut counts = Vec::new();
        for _ in 0..14 {
            state = advance(&state, &mut rng);
            counts.push((state.regime.phase, state.regime.ticks_in_phase));
        }
        // Initial phase is already pre_season, so the counter keeps rising.
        assert_eq!(counts[0], (RegimePhase::PreSeason, 1));
        assert_eq!(counts[3], (RegimePhase::PreSeason, 4));
        assert_eq!(counts[4], (RegimePhase::HolidayRush, 1));
        assert_eq!(counts[9], (RegimePhase::HolidayRush, 6));
        assert_eq!(counts[10], (RegimePhase::PostPeak, 1));
    }

    #[test]
    fn test_macro_stays_bounded() {
        let mut rng = SeededRng::new(31337);
        let mut state = init_market_state(1000).unwrap();
        for _ in 0..1000 {
            state = advance(&state, &mut rng);
            let m = &state.macro_env;
            assert!((0.0..=100.0).contains(&m.consumer_sentiment));
            assert!((0.0..=1.0).contains(&m.labor_disruption_risk));
            assert!((0.0..=100.0).contains(&m.supply_chain_pressure));
            assert!((0.5..=2.0).contains(&m.energy_cost_index));
        }
    }

    #[test]
    fn test_event_rate_near_thirty_percent() {
        let mut rng = SeededRng::new(2024);
        let mut state = init_market_state(2000).unwrap();
        let mut with_event = 0usize;
        for _ in 0..2000 {
            state = advance(&state, &mut rng);
            if !state.events.is_empty() {
                with_event += 1;
            }
        }
        let rate = with_event as f64 / 2000.0;
        assert!((0.25..0.35).contains(&rate), "event rate was {rate}");
    }

    #[test]
    fn test_overrides_merge_prices_and_macro() {
        let mut scenario = empty_scenario(1);
        scenario.initial_prices.insert(Ticker::Coal, 8.0);
        scenario.macro_overrides.energy_cost_index = Some(1.5);

        let state = apply_overrides(init_market_state(14).unwrap(), &scenario);

        assert_eq!(state.prices[Ticker::Coal], 8.0);
        assert_eq!(state.price_history[Ticker::Coal], vec![8.0]);
        // Non-overridden values untouched
        assert_eq!(state.prices[Ticker::Santa], 100.0);
        assert_eq!(state.macro_env.energy_cost_index, 1.5);
        assert_eq!(state.macro_env.consumer_sentiment, 60.0);
    }

    #[test]
    fn test_scripted_event_fires_only_on_its_tick() {
        let mut scenario = empty_scenario(1);
        scenario.scripted_events.push(types::ScriptedEvent {
            tick: 4,
            event: EventDescriptor {
                target: EventTarget::One(Ticker::Coal),
                category: EventCategory::Esg,
                direction: EventDirection::Negative,
                magnitude: EventMagnitude::Large,
                message: "divestment".to_string(),
            },
            price_shock: BTreeMap::from([(Ticker::Coal, -0.20)]),
        });

        let state = init_market_state(14).unwrap();
        let untouched = apply_scripted_events(state.clone(), &scenario, 3);
        assert!(untouched.events.is_empty());
        assert_eq!(untouched.prices[Ticker::Coal], 5.0);

        let shocked = apply_scripted_events(state, &scenario, 4);
        assert_eq!(shocked.events.len(), 1);
        assert!((shocked.prices[Ticker::Coal] - 4.0).abs() < 1e-9);
        assert_eq!(
            *shocked.price_history[Ticker::Coal].last().unwrap(),
            shocked.prices[Ticker::Coal]
        );
    }

    #[test]
    fn test_scripted_shocks_compose_multiplicatively() {
        let mut scenario = empty_scenario(1);
        for _ in 0..2 {
            scenario.scripted_events.push(types::ScriptedEvent {
                tick: 1,
                event: EventDescriptor {
                    target: EventTarget::All,
                    category: EventCategory::Ops,
                    direction: EventDirection::Negative,
                    magnitude: EventMagnitude::Medium,
                    message: "disruption".to_string(),
                },
                price_shock: BTreeMap::from([(Ticker::Gift, -0.10)]),
            });
        }

        let state = apply_scripted_events(init_market_state(14).unwrap(), &scenario, 1);
        assert!((state.prices[Ticker::Gift] - 80.0 * 0.9 * 0.9).abs() < 1e-9);
    }
}
