// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Pricing Parameters

//! Tunable coefficients of the dynamic price formula.
//!
//! The defaults are the published marketplace formula. A pricing service may
//! override the base price (e.g. with the lowest open ask) or the
//! sensitivities; [`PricingParams::validate`] keeps the clamp meaningful.

use serde::{Deserialize, Serialize};

use crate::types::PricingError;

/// Reference price per unit of energy.
pub const DEFAULT_BASE_PRICE: f64 = 5.0;
/// α in `F_sd = 1 + α·ln(D/S)`
pub const DEFAULT_SUPPLY_DEMAND_SENSITIVITY: f64 = 0.2;
/// β in `F_soc = 1 + β·(1 - SoC)²`
pub const DEFAULT_SCARCITY_SENSITIVITY: f64 = 0.5;
/// γ in `F_dist = 1 + γ·d`
pub const DEFAULT_DISTANCE_COEFFICIENT: f64 = 0.1;
/// η in `F_quality = 1 + η·Q`
pub const DEFAULT_QUALITY_PREMIUM: f64 = 0.1;
pub const DEFAULT_MIN_MULTIPLIER: f64 = 0.5;
pub const DEFAULT_MAX_MULTIPLIER: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingParams {
    pub base_price: f64,
    pub supply_demand_sensitivity: f64,
    pub scarcity_sensitivity: f64,
    pub distance_coefficient: f64,
    pub quality_premium: f64,
    /// Lower bound of the aggregate multiplier (inclusive).
    pub min_multiplier: f64,
    /// Upper bound of the aggregate multiplier (inclusive).
    pub max_multiplier: f64,
}

impl Default for PricingParams {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            supply_demand_sensitivity: DEFAULT_SUPPLY_DEMAND_SENSITIVITY,
            scarcity_sensitivity: DEFAULT_SCARCITY_SENSITIVITY,
            distance_coefficient: DEFAULT_DISTANCE_COEFFICIENT,
            quality_premium: DEFAULT_QUALITY_PREMIUM,
            min_multiplier: DEFAULT_MIN_MULTIPLIER,
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
        }
    }
}

impl PricingParams {
    pub fn with_base_price(self, base_price: f64) -> Self {
        Self { base_price, ..self }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        let all = [
            ("base_price", self.base_price),
            ("supply_demand_sensitivity", self.supply_demand_sensitivity),
            ("scarcity_sensitivity", self.scarcity_sensitivity),
            ("distance_coefficient", self.distance_coefficient),
            ("quality_premium", self.quality_premium),
            ("min_multiplier", self.min_multiplier),
            ("max_multiplier", self.max_multiplier),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(PricingError::InvalidParams(format!("{name} must be finite, got {value}")));
            }
            if value < 0.0 {
                return Err(PricingError::InvalidParams(format!("{name} must not be negative, got {value}")));
            }
        }
        if self.base_price == 0.0 {
            return Err(PricingError::InvalidParams("base_price must be positive".to_string()));
        }
        if self.min_multiplier == 0.0 {
            return Err(PricingError::InvalidParams("min_multiplier must be positive".to_string()));
        }
        if self.min_multiplier > self.max_multiplier {
            return Err(PricingError::InvalidParams(format!(
                "min_multiplier {} exceeds max_multiplier {}",
                self.min_multiplier, self.max_multiplier
            )));
        }
        Ok(())
    }

    /// Clamp an aggregate multiplier into `[min_multiplier, max_multiplier]`.
    pub fn clamp_multiplier(&self, raw: f64) -> f64 {
        raw.clamp(self.min_multiplier, self.max_multiplier)
    }

    pub fn price_floor(&self) -> f64 {
        self.base_price * self.min_multiplier
    }

    pub fn price_ceiling(&self) -> f64 {
        self.base_price * self.max_multiplier
    }
}
