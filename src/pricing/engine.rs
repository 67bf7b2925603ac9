// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Pricing Engine

//! Dynamic energy price: a base price times five multiplicative factors.
//!
//! ```text
//! P = P_base · clamp(F_sd · F_soc · F_dist · F_time · F_quality, min, max)
//! ```
//!
//! The engine holds only its [`PricingParams`]; every call recomputes all
//! factors from the input, so one engine can be shared freely across threads.

use chrono::{DateTime, Utc};

use super::factors;
use super::params::PricingParams;
use super::quote::MarketQuote;
use crate::types::{PriceBreakdown, PricingError, PricingInput};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingEngine {
    params: PricingParams,
}

impl PricingEngine {
    /// Engine with the published default coefficients.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: PricingParams) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PricingParams {
        &self.params
    }

    /// Compute the full price breakdown for one set of conditions.
    pub fn compute_price(&self, input: &PricingInput) -> Result<PriceBreakdown, PricingError> {
        input.validate()?;
        let supply = factors::effective_supply(input.sunlight_intensity, input.weather);
        let demand = factors::effective_demand(input.grid_demand);
        Ok(self.price_from(supply, demand, input))
    }

    /// Price against explicit market volumes (e.g. open sell and buy order
    /// counts) instead of the sunlight and grid-demand readings, which are
    /// ignored. Zero volumes take the same floor of 1.
    pub fn compute_price_for_volumes(
        &self,
        supply: f64,
        demand: f64,
        input: &PricingInput,
    ) -> Result<PriceBreakdown, PricingError> {
        input.validate()?;
        for (field, value) in [("supply", supply), ("demand", demand)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::InvalidInput {
                    field,
                    reason: format!("must be a non-negative finite volume, got {value}"),
                });
            }
        }
        let supply = if supply == 0.0 { factors::ZERO_FLOOR } else { supply };
        let demand = if demand == 0.0 { factors::ZERO_FLOOR } else { demand };
        Ok(self.price_from(supply, demand, input))
    }

    fn price_from(&self, supply: f64, demand: f64, input: &PricingInput) -> PriceBreakdown {
        let p = &self.params;

        let f_sd = factors::supply_demand_factor(supply, demand, p.supply_demand_sensitivity);
        let f_soc = factors::scarcity_factor(input.battery_state_of_charge, p.scarcity_sensitivity);
        let f_dist = factors::distance_factor(input.distance_km, p.distance_coefficient);
        let f_time = factors::time_factor(input.hour_of_day);
        let f_quality = factors::quality_factor(input.donor_reliability_score, p.quality_premium);

        let raw = f_sd * f_soc * f_dist * f_time * f_quality;
        let total_multiplier = p.clamp_multiplier(raw);
        let final_price = p.base_price * total_multiplier;

        tracing::debug!(
            supply,
            demand,
            f_sd,
            f_soc,
            f_dist,
            f_time,
            f_quality,
            raw_multiplier = raw,
            clamped = raw != total_multiplier,
            final_price,
            "computed dynamic price"
        );

        PriceBreakdown {
            base_price: p.base_price,
            supply_demand_factor: f_sd,
            scarcity_factor: f_soc,
            distance_factor: f_dist,
            time_factor: f_time,
            quality_factor: f_quality,
            total_multiplier,
            final_price,
        }
    }

    /// Price the input and wrap it as a market quote stamped `at`.
    pub fn quote_at(&self, input: &PricingInput, at: DateTime<Utc>) -> Result<MarketQuote, PricingError> {
        let breakdown = self.compute_price(input)?;
        Ok(MarketQuote::new(input, breakdown, at))
    }

    pub fn quote_now(&self, input: &PricingInput) -> Result<MarketQuote, PricingError> {
        self.quote_at(input, Utc::now())
    }
}

/// [`PricingEngine::compute_price`] with the default parameters.
pub fn compute_price(input: &PricingInput) -> Result<PriceBreakdown, PricingError> {
    PricingEngine::new().compute_price(input)
}
