//! News flavor text for the Santa Market.
//!
//! The market engine decides *that* an event happens and what it does to
//! prices; this crate only supplies the headline. Pools are keyed by
//! (category, direction) and selection is driven by a caller-provided
//! uniform roll, so the crate itself holds no randomness and stays trivially
//! deterministic.

mod catalog;

pub use catalog::message_for;
