//! Mortgage affordability estimates under Bank of Israel rules, plus a
//! deterministic generator of comparable-deal data for neighborhood browsing.
//!
//! Both engines are pure: `affordability::calculate_mortgage` and
//! `market::generate_deals` touch no shared state and never fail on inputs
//! inside their documented domains.

pub mod affordability;
pub mod config;
pub mod error;
pub mod market;
mod rounding;
pub mod telemetry;
