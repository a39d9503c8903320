//! Curated scenario presets for the Santa Market.
//!
//! Each preset is a fixed seed plus optional initial-price and macro
//! overrides and a script of tick-bound events. Runs over the same preset
//! are reproducible end to end.

use std::collections::BTreeMap;

use types::{
    EventCategory, EventDescriptor, EventDirection, EventMagnitude, EventTarget, MacroOverrides,
    ScenarioConfig, ScriptedEvent, Ticker,
};

// =============================================================================
// Presets
// =============================================================================

fn calm_q4() -> ScenarioConfig {
    ScenarioConfig {
        id: "calm-q4".to_string(),
        name: "Calm Q4".to_string(),
        description: "Baseline scenario with default parameters and no scripted events"
            .to_string(),
        seed: 12345,
        initial_prices: BTreeMap::new(),
        macro_overrides: MacroOverrides::default(),
        scripted_events: Vec::new(),
    }
}

fn holiday_boom() -> ScenarioConfig {
    ScenarioConfig {
        id: "holiday-boom".to_string(),
        name: "Holiday Boom".to_string(),
        description: "Bull market with high consumer sentiment and record sales".to_string(),
        seed: 54321,
        initial_prices: BTreeMap::new(),
        macro_overrides: MacroOverrides {
            consumer_sentiment: Some(85.0),
            labor_disruption_risk: Some(0.2),
            ..Default::default()
        },
        scripted_events: vec![ScriptedEvent {
            tick: 5,
            event: EventDescriptor {
                target: EventTarget::One(Ticker::Santa),
                category: EventCategory::Demand,
                direction: EventDirection::Positive,
                magnitude: EventMagnitude::Large,
                message: "Record toy sales reported across all major retailers".to_string(),
            },
            price_shock: BTreeMap::from([(Ticker::Santa, 0.10), (Ticker::Gift, 0.05)]),
        }],
    }
}

fn esg_meltdown() -> ScenarioConfig {
    ScenarioConfig {
        id: "esg-meltdown".to_string(),
        name: "ESG Meltdown".to_string(),
        description: "Environmental crisis triggers COAL sell-off".to_string(),
        seed: 98765,
        initial_prices: BTreeMap::from([(Ticker::Coal, 8.0)]),
        macro_overrides: MacroOverrides {
            energy_cost_index: Some(1.5),
            ..Default::default()
        },
        scripted_events: vec![ScriptedEvent {
            tick: 4,
            event: EventDescriptor {
                target: EventTarget::One(Ticker::Coal),
                category: EventCategory::Esg,
                direction: EventDirection::Negative,
                magnitude: EventMagnitude::Large,
                message: "Major pension funds announce complete COAL divestment".to_string(),
            },
            price_shock: BTreeMap::from([(Ticker::Coal, -0.20)]),
        }],
    }
}

fn supply_chain_chaos() -> ScenarioConfig {
    ScenarioConfig {
        id: "supply-chain-chaos".to_string(),
        name: "Supply Chain Chaos".to_string(),
        description: "Port strikes and logistics disruptions cause volatility".to_string(),
        seed: 11111,
        initial_prices: BTreeMap::new(),
        macro_overrides: MacroOverrides {
            supply_chain_pressure: Some(80.0),
            ..Default::default()
        },
        scripted_events: vec![ScriptedEvent {
            tick: 6,
            event: EventDescriptor {
                target: EventTarget::All,
                category: EventCategory::Ops,
                direction: EventDirection::Negative,
                magnitude: EventMagnitude::Large,
                message: "Major port strike delays holiday shipments worldwide".to_string(),
            },
            price_shock: BTreeMap::from([
                (Ticker::Gift, -0.08),
                (Ticker::Santa, -0.05),
                (Ticker::Rein, -0.03),
            ]),
        }],
    }
}

fn elf_strike() -> ScenarioConfig {
    ScenarioConfig {
        id: "elf-strike".to_string(),
        name: "Elf Strike".to_string(),
        description: "Labor crisis at the North Pole workshop".to_string(),
        seed: 22222,
        initial_prices: BTreeMap::from([(Ticker::Elf, 25.0)]),
        macro_overrides: MacroOverrides {
            labor_disruption_risk: Some(0.8),
            ..Default::default()
        },
        scripted_events: vec![
            ScriptedEvent {
                tick: 3,
                event: EventDescriptor {
                    target: EventTarget::One(Ticker::Elf),
                    category: EventCategory::Labor,
                    direction: EventDirection::Negative,
                    magnitude: EventMagnitude::Large,
                    message: "Elf union walks out! Production halted at North Pole".to_string(),
                },
                price_shock: BTreeMap::from([(Ticker::Elf, -0.25)]),
            },
            ScriptedEvent {
                tick: 10,
                event: EventDescriptor {
                    target: EventTarget::One(Ticker::Elf),
                    category: EventCategory::Labor,
                    direction: EventDirection::Positive,
                    magnitude: EventMagnitude::Medium,
                    message: "Strike resolved! Elves return to work with new contract".to_string(),
                },
                price_shock: BTreeMap::from([(Ticker::Elf, 0.15)]),
            },
        ],
    }
}

// =============================================================================
// Lookup
// =============================================================================

/// Every preset, in catalog order.
pub fn all_scenarios() -> Vec<ScenarioConfig> {
    vec![
        calm_q4(),
        holiday_boom(),
        esg_meltdown(),
        supply_chain_chaos(),
        elf_strike(),
    ]
}

/// Look up a preset by id.
pub fn get_scenario(id: &str) -> Option<ScenarioConfig> {
    all_scenarios().into_iter().find(|s| s.id == id)
}
