//! Headline pools, keyed by event category and direction.

use types::{EventCategory, EventDirection};

// =============================================================================
// Pools
// =============================================================================

const LABOR_POSITIVE: &[&str] = &[
    "Elf workforce expansion announced to meet demand",
    "Workshop signs landmark contract with elf union",
    "Elf overtime reaches record levels as deadline looms",
    "Seasonal hiring surge beats North Pole projections",
];

const LABOR_NEGATIVE: &[&str] = &[
    "Elf union threatens walkout over cocoa rations",
    "Workshop absenteeism spikes ahead of the rush",
    "Contract talks stall between elves and management",
    "Reindeer handlers stage slowdown over grazing rights",
];

const ESG_POSITIVE: &[&str] = &[
    "North Pole operations certified carbon neutral",
    "Sustainable wrapping initiative wins investor praise",
    "Workshop unveils solar-powered toy assembly line",
];

const ESG_NEGATIVE: &[&str] = &[
    "Major pension funds announce complete COAL divestment",
    "Environmental audit flags workshop emissions",
    "Activists picket naughty-list coal distribution",
];

const WEATHER_POSITIVE: &[&str] = &[
    "Clear skies forecast across all delivery routes",
    "Mild polar winter keeps supply sleighs running early",
    "Tailwinds shave hours off transatlantic routes",
];

const WEATHER_NEGATIVE: &[&str] = &[
    "Weather concerns threaten Christmas Eve operations",
    "Blizzard grounds sleigh fleet at northern hub",
    "Ice storm disrupts reindeer training schedules",
];

const DEMAND_POSITIVE: &[&str] = &[
    "Record toy sales reported across all major retailers",
    "Early bird shoppers drive unexpected surge in pre-orders",
    "Consumer confidence survey shows optimistic holiday outlook",
    "Black Friday results exceed analyst expectations",
];

const DEMAND_NEGATIVE: &[&str] = &[
    "Returns flood in as holiday hangover begins",
    "Analysts downgrade gift demand after weak survey",
    "Popular toy shortages frustrate key markets",
    "Last-minute gift rush crashes online retailers",
];

const OPS_POSITIVE: &[&str] = &[
    "Shipping carriers report operating at full capacity",
    "Sleigh tracking shows record-breaking efficiency",
    "Fulfillment network clears backlog ahead of schedule",
];

const OPS_NEGATIVE: &[&str] = &[
    "Major port strike delays holiday shipments worldwide",
    "Record online sales strain fulfillment operations",
    "Logistics snarl leaves warehouses overflowing",
];

fn pool(category: EventCategory, direction: EventDirection) -> &'static [&'static str] {
    match (category, direction) {
        (EventCategory::Labor, EventDirection::Positive) => LABOR_POSITIVE,
        (EventCategory::Labor, EventDirection::Negative) => LABOR_NEGATIVE,
        (EventCategory::Esg, EventDirection::Positive) => ESG_POSITIVE,
        (EventCategory::Esg, EventDirection::Negative) => ESG_NEGATIVE,
        (EventCategory::Weather, EventDirection::Positive) => WEATHER_POSITIVE,
        (EventCategory::Weather, EventDirection::Negative) => WEATHER_NEGATIVE,
        (EventCategory::Demand, EventDirection::Positive) => DEMAND_POSITIVE,
        (EventCategory::Demand, EventDirection::Negative) => DEMAND_NEGATIVE,
        (EventCategory::Ops, EventDirection::Positive) => OPS_POSITIVE,
        (EventCategory::Ops, EventDirection::Negative) => OPS_NEGATIVE,
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Pick a headline from the matching pool using a uniform `roll` in `[0, 1)`.
///
/// The same roll always yields the same headline, so selection inherits the
/// caller's determinism.
pub fn message_for(category: EventCategory, direction: EventDirection, roll: f64) -> &'static str {
    let messages = pool(category, direction);
    let idx = (roll.clamp(0.0, 1.0) * messages.len() as f64) as usize;
    messages[idx.min(messages.len() - 1)]
}
