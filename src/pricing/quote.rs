// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Market Quote

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::factors;
use crate::types::{PriceBreakdown, PricingInput};

/// The market-price payload served to marketplace clients.
///
/// `supply` and `demand` are the effective values the supply/demand factor
/// was computed from (after the zero floor).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketQuote {
    pub price: f64,
    pub supply: f64,
    pub demand: f64,
    #[serde(with = "rfc3339_seconds")]
    pub timestamp: DateTime<Utc>,
    pub breakdown: PriceBreakdown,
}

impl MarketQuote {
    pub fn new(input: &PricingInput, breakdown: PriceBreakdown, timestamp: DateTime<Utc>) -> Self {
        Self {
            price: breakdown.final_price,
            supply: factors::effective_supply(input.sunlight_intensity, input.weather),
            demand: factors::effective_demand(input.grid_demand),
            timestamp,
            breakdown,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// RFC3339 at whole-second precision with a `Z` suffix.
mod rfc3339_seconds {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
