// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Device Telemetry

//! Reduces raw device telemetry to the scalar pricing inputs.

use serde::{Deserialize, Serialize};

use crate::types::{check_percentage, PricingError};

/// Used when no device reports a battery level.
pub const DEFAULT_COMMUNITY_SOC: f64 = 50.0;

const DELIVERY_WEIGHT: f64 = 0.4;
const VOLTAGE_WEIGHT: f64 = 0.3;
const BATTERY_WEIGHT: f64 = 0.3;

/// Historical delivery performance of a donor's device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceQualityMetrics {
    pub successful_deliveries: u32,
    pub total_deliveries: u32,
    /// Voltage stability score, 0-100.
    pub voltage_stability: f64,
    /// Battery health score, 0-100.
    pub battery_health_score: f64,
}

impl DeviceQualityMetrics {
    /// Composite donor reliability on a 0-100 scale.
    ///
    /// `100 · (0.4·succ/(total+1) + 0.3·voltage/100 + 0.3·battery/100)`.
    /// The `+1` keeps a device with no history from scoring a perfect
    /// delivery record.
    pub fn reliability_score(&self) -> Result<f64, PricingError> {
        check_percentage("voltage_stability", self.voltage_stability)?;
        check_percentage("battery_health_score", self.battery_health_score)?;
        if self.successful_deliveries > self.total_deliveries {
            return Err(PricingError::InvalidInput {
                field: "successful_deliveries",
                reason: format!(
                    "{} exceeds total_deliveries {}",
                    self.successful_deliveries, self.total_deliveries
                ),
            });
        }

        let delivery_ratio =
            self.successful_deliveries as f64 / (self.total_deliveries as f64 + 1.0);
        let score = DELIVERY_WEIGHT * delivery_ratio
            + VOLTAGE_WEIGHT * self.voltage_stability / 100.0
            + BATTERY_WEIGHT * self.battery_health_score / 100.0;
        Ok((score * 100.0).clamp(0.0, 100.0))
    }
}

/// Mean battery level across reporting devices, in percent.
///
/// Returns [`DEFAULT_COMMUNITY_SOC`] for an empty fleet.
pub fn community_state_of_charge(levels: &[f64]) -> Result<f64, PricingError> {
    if levels.is_empty() {
        return Ok(DEFAULT_COMMUNITY_SOC);
    }
    for &level in levels {
        check_percentage("battery_level", level)?;
    }
    Ok(levels.iter().sum::<f64>() / levels.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn reliability_of_good_device() {
        let m = DeviceQualityMetrics {
            successful_deliveries: 9,
            total_deliveries: 9,
            voltage_stability: 100.0,
            battery_health_score: 100.0,
        };
        // 0.4 * 9/10 + 0.3 + 0.3 = 0.96
        assert!((m.reliability_score().expect("test: valid metrics") - 96.0).abs() < EPS);
    }

    #[test]
    fn reliability_without_history() {
        let m = DeviceQualityMetrics {
            successful_deliveries: 0,
            total_deliveries: 0,
            voltage_stability: 50.0,
            battery_health_score: 50.0,
        };
        assert!((m.reliability_score().expect("test: valid metrics") - 30.0).abs() < EPS);
    }

    #[test]
    fn reliability_rejects_impossible_counts() {
        let m = DeviceQualityMetrics {
            successful_deliveries: 5,
            total_deliveries: 4,
            voltage_stability: 50.0,
            battery_health_score: 50.0,
        };
        assert!(m.reliability_score().is_err());
    }

    #[test]
    fn reliability_rejects_bad_percentage() {
        let m = DeviceQualityMetrics {
            successful_deliveries: 1,
            total_deliveries: 1,
            voltage_stability: 120.0,
            battery_health_score: 50.0,
        };
        let err = m.reliability_score().expect_err("test: voltage out of range");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn community_soc_mean() {
        let soc = community_state_of_charge(&[20.0, 40.0, 90.0]).expect("test: valid levels");
        assert!((soc - 50.0).abs() < EPS);
    }

    #[test]
    fn community_soc_empty_fleet_defaults() {
        assert_eq!(community_state_of_charge(&[]), Ok(DEFAULT_COMMUNITY_SOC));
    }

    #[test]
    fn community_soc_rejects_nan() {
        assert!(community_state_of_charge(&[10.0, f64::NAN]).is_err());
    }
}
