// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Pricing Factors

//! The five independent price multipliers.
//!
//! Each function is pure and takes only the inputs it needs. Inputs are
//! assumed validated; the engine calls [`PricingInput::validate`](crate::PricingInput::validate)
//! first.

use crate::types::{TimeBand, WeatherCondition};

/// Substituted for a supply or demand that evaluates to exactly zero, so the
/// log ratio stays finite.
pub const ZERO_FLOOR: f64 = 1.0;

fn floor_zero(v: f64) -> f64 {
    if v == 0.0 { ZERO_FLOOR } else { v }
}

/// `sunlight × weather modifier`, floored at 1 when zero.
pub fn effective_supply(sunlight_intensity: f64, weather: WeatherCondition) -> f64 {
    floor_zero(sunlight_intensity * weather.supply_modifier())
}

/// Grid demand, floored at 1 when zero.
pub fn effective_demand(grid_demand: f64) -> f64 {
    floor_zero(grid_demand)
}

/// `F_sd = 1 + α · ln(demand / supply)`
pub fn supply_demand_factor(supply: f64, demand: f64, sensitivity: f64) -> f64 {
    1.0 + sensitivity * (demand / supply).ln()
}

/// `F_soc = 1 + β · (1 - soc/100)²`
///
/// Quadratic scarcity: the price accelerates as aggregate storage empties.
pub fn scarcity_factor(battery_state_of_charge: f64, sensitivity: f64) -> f64 {
    let deficit = 1.0 - battery_state_of_charge / 100.0;
    1.0 + sensitivity * (deficit * deficit)
}

/// `F_dist = 1 + γ · d` (linear transmission penalty, km)
pub fn distance_factor(distance_km: f64, coefficient: f64) -> f64 {
    1.0 + coefficient * distance_km
}

pub fn time_factor(hour_of_day: u8) -> f64 {
    TimeBand::from_hour(hour_of_day).multiplier()
}

/// `F_quality = 1 + η · (score/100)`
pub fn quality_factor(donor_reliability_score: f64, premium: f64) -> f64 {
    1.0 + premium * (donor_reliability_score / 100.0)
}
