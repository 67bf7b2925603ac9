//! Adapter layer: converts between the engine's f64 prices and Decimal money.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Convert f64 to Decimal. `None` for NaN, infinities and values outside
/// Decimal's range.
pub fn to_decimal(v: f64) -> Option<Decimal> {
    Decimal::from_f64(v)
}

/// Convert Decimal to f64 (lossy).
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Convert a price to Decimal rounded to `dp` places (banker's rounding).
pub fn to_money(v: f64, dp: u32) -> Option<Decimal> {
    to_decimal(v).map(|d| d.round_dp(dp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn simple_values_convert_cleanly() {
        assert_eq!(to_decimal(2.5), Some(dec!(2.5)));
        assert_eq!(to_decimal(0.1), Some(dec!(0.1)));
        assert_eq!(from_decimal(dec!(25)), 25.0);
    }

    #[test]
    fn non_finite_is_unrepresentable() {
        assert_eq!(to_decimal(f64::NAN), None);
        assert_eq!(to_decimal(f64::INFINITY), None);
    }

    #[test]
    fn money_rounding() {
        assert_eq!(to_money(10.480091287692526, 7), Some(dec!(10.4800913)));
        assert_eq!(to_money(2.5, 7), Some(dec!(2.5)));
    }
}
