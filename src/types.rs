// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Type Definitions

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Errors raised while validating pricing inputs or parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid input: unknown weather condition {0:?}")]
    UnknownWeather(String),

    #[error("invalid pricing parameters: {0}")]
    InvalidParams(String),
}

impl PricingError {
    /// Whether the error was caused by the caller's input rather than the
    /// engine configuration.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::UnknownWeather(_))
    }
}

// ─── Weather ────────────────────────────────────────────────────────────────

/// Observed weather, applied as a dampener on solar supply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[serde(alias = "Sunny")]
    Sunny,
    #[serde(alias = "Cloudy")]
    Cloudy,
    #[serde(alias = "Rainy")]
    Rainy,
}

impl Default for WeatherCondition {
    fn default() -> Self { WeatherCondition::Sunny }
}

impl WeatherCondition {
    pub fn supply_modifier(&self) -> f64 {
        match self {
            Self::Sunny => 1.0,
            Self::Cloudy => 0.6,
            Self::Rainy => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(Self::Sunny),
            "cloudy" => Ok(Self::Cloudy),
            "rainy" => Ok(Self::Rainy),
            _ => Err(PricingError::UnknownWeather(s.to_string())),
        }
    }
}

// ─── Time Band ──────────────────────────────────────────────────────────────

/// Local time-of-day bucket. Brackets are half-open: `[18,22)`, `[6,9)`, `[2,6)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeBand {
    EveningPeak,
    MorningPeak,
    NightTrough,
    Standard,
}

impl TimeBand {
    pub fn from_hour(hour: u8) -> Self {
        if (18..22).contains(&hour) {
            Self::EveningPeak
        } else if (6..9).contains(&hour) {
            Self::MorningPeak
        } else if (2..6).contains(&hour) {
            Self::NightTrough
        } else {
            Self::Standard
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::EveningPeak => 1.3,
            Self::MorningPeak => 1.15,
            Self::NightTrough => 0.85,
            Self::Standard => 1.0,
        }
    }
}

// ─── Pricing Input ──────────────────────────────────────────────────────────

/// Environmental and market conditions for one price computation.
///
/// Percentages are on a 0-100 scale. Use [`PricingInput::validate`] (called
/// by the engine) to reject out-of-domain values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingInput {
    pub sunlight_intensity: f64,
    pub weather: WeatherCondition,
    pub grid_demand: f64,
    pub battery_state_of_charge: f64,
    pub distance_km: f64,
    pub hour_of_day: u8,
    pub donor_reliability_score: f64,
}

impl Default for PricingInput {
    /// The formula playground's starting position.
    fn default() -> Self {
        Self {
            sunlight_intensity: 50.0,
            weather: WeatherCondition::Sunny,
            grid_demand: 50.0,
            battery_state_of_charge: 50.0,
            distance_km: 1.0,
            hour_of_day: 12,
            donor_reliability_score: 100.0,
        }
    }
}

impl PricingInput {
    /// Local hour bucket of a timestamp, for callers pricing "now".
    pub fn hour_from<Tz: TimeZone>(at: &DateTime<Tz>) -> u8 {
        // `hour()` is always < 24
        at.hour() as u8
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        check_percentage("sunlight_intensity", self.sunlight_intensity)?;
        check_percentage("grid_demand", self.grid_demand)?;
        check_percentage("battery_state_of_charge", self.battery_state_of_charge)?;
        check_percentage("donor_reliability_score", self.donor_reliability_score)?;

        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(PricingError::InvalidInput {
                field: "distance_km",
                reason: format!("must be a non-negative finite number, got {}", self.distance_km),
            });
        }
        if self.hour_of_day > 23 {
            return Err(PricingError::InvalidInput {
                field: "hour_of_day",
                reason: format!("must be in 0..=23, got {}", self.hour_of_day),
            });
        }
        Ok(())
    }
}

pub(crate) fn check_percentage(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(PricingError::InvalidInput {
            field,
            reason: format!("must be a percentage in [0, 100], got {}", value),
        });
    }
    Ok(())
}

// ─── Price Breakdown ────────────────────────────────────────────────────────

/// Every factor behind a price, plus the clamped multiplier and the result.
///
/// Serializes with the keys the marketplace API exposes
/// (`base_price`, `f_sd`, `f_soc`, `f_dist`, `f_time`, `f_quality`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: f64,
    #[serde(rename = "f_sd")]
    pub supply_demand_factor: f64,
    #[serde(rename = "f_soc")]
    pub scarcity_factor: f64,
    #[serde(rename = "f_dist")]
    pub distance_factor: f64,
    #[serde(rename = "f_time")]
    pub time_factor: f64,
    #[serde(rename = "f_quality")]
    pub quality_factor: f64,
    pub total_multiplier: f64,
    pub final_price: f64,
}

impl PriceBreakdown {
    /// Product of the five factors before clamping.
    pub fn raw_multiplier(&self) -> f64 {
        self.supply_demand_factor
            * self.scarcity_factor
            * self.distance_factor
            * self.time_factor
            * self.quality_factor
    }

    pub fn was_clamped(&self) -> bool {
        self.raw_multiplier() != self.total_multiplier
    }

    /// Percentage change of the final price against the base price.
    pub fn change_from_base_pct(&self) -> f64 {
        (self.final_price - self.base_price) / self.base_price * 100.0
    }
}
