// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine

//! Computation core of the peer-to-peer energy marketplace.
//!
//! - [`pricing`]: the dynamic per-kWh price, built from supply/demand,
//!   scarcity, distance, time-of-day and donor-quality factors.
//! - [`amm`]: a constant-product liquidity pool with a 0.3% swap fee.
//! - [`settlement`]: filling a matched trade at the dynamic price.
//! - [`matching`]: one pass over the open order book.
//!
//! The same code is compiled to WASM for the browser estimator, so the
//! client-side preview and the authoritative price never diverge.

pub mod adapter;
pub mod amm;
pub mod matching;
pub mod pricing;
pub mod settlement;
pub mod types;

pub use amm::{ConstantProductPool, PoolError, PoolStatus, SharedPool, SwapQuote};
pub use matching::{match_orders, order_book_quote, EnergyOrder, MatchError, OrderMatch};
pub use pricing::{compute_price, MarketQuote, PriceHistory, PricingEngine, PricingParams};
pub use settlement::{settle_trade, SettlementError, TradeSettlement};
pub use types::*;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn input_error(e: impl std::fmt::Display) -> PricingError {
    PricingError::InvalidInput {
        field: "input",
        reason: e.to_string(),
    }
}

fn input_from_js(input: JsValue) -> Result<PricingInput, PricingError> {
    serde_wasm_bindgen::from_value(input).map_err(input_error)
}

/// Engine for the browser estimator, optionally overriding the base price.
fn engine_with_base(base_price: Option<f64>) -> Result<PricingEngine, PricingError> {
    let mut params = PricingParams::default();
    if let Some(base) = base_price {
        params = params.with_base_price(base);
    }
    PricingEngine::with_params(params)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Price breakdown for a `PricingInput`-shaped object.
#[wasm_bindgen(js_name = computePrice)]
pub fn compute_price_js(input: JsValue) -> Result<JsValue, JsError> {
    init_panic_hook();
    let input = input_from_js(input)?;
    let breakdown = compute_price(&input)?;
    to_js(&breakdown)
}

/// Market quote stamped with the current time, optionally overriding the
/// base price.
#[wasm_bindgen(js_name = marketQuote)]
pub fn market_quote_js(input: JsValue, base_price: Option<f64>) -> Result<JsValue, JsError> {
    init_panic_hook();
    let input = input_from_js(input)?;
    let quote = engine_with_base(base_price)?.quote_now(&input)?;
    to_js(&quote)
}

/// Browser-side handle on a [`ConstantProductPool`].
#[wasm_bindgen]
pub struct LiquidityPool {
    pool: ConstantProductPool,
}

#[wasm_bindgen]
impl LiquidityPool {
    #[wasm_bindgen(constructor)]
    pub fn new(reserve_a: f64, reserve_b: f64) -> Result<LiquidityPool, JsError> {
        init_panic_hook();
        Ok(Self { pool: ConstantProductPool::new(reserve_a, reserve_b)? })
    }

    #[wasm_bindgen(js_name = swapAForB)]
    pub fn swap_a_for_b(&mut self, amount_in: f64) -> Result<f64, JsError> {
        Ok(self.pool.swap_a_for_b(amount_in)?)
    }

    #[wasm_bindgen(js_name = quoteAForB)]
    pub fn quote_a_for_b(&self, amount_in: f64) -> Result<JsValue, JsError> {
        to_js(&self.pool.quote_a_for_b(amount_in)?)
    }

    #[wasm_bindgen(js_name = priceA)]
    pub fn price_a(&self) -> f64 {
        self.pool.price()
    }

    pub fn status(&self) -> Result<JsValue, JsError> {
        to_js(&self.pool.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Same serde shape the browser sends through serde-wasm-bindgen.
    const FORMULA_PAGE_INPUT: &str = r#"{
        "sunlight_intensity": 80, "weather": "Cloudy", "grid_demand": 60,
        "battery_state_of_charge": 40, "distance_km": 2, "hour_of_day": 19,
        "donor_reliability_score": 90
    }"#;

    #[test]
    fn browser_input_shape_parses() {
        let input: PricingInput = serde_json::from_str(FORMULA_PAGE_INPUT).expect("test: parse input");
        assert_eq!(input.weather, WeatherCondition::Cloudy);
        let b = compute_price(&input).expect("test: valid input");
        assert!((b.final_price - 10.480091287692526).abs() < 1e-9);
    }

    #[test]
    fn malformed_input_maps_to_invalid_input() {
        let err = serde_json::from_str::<PricingInput>(r#"{"weather": "sunny"}"#)
            .map_err(input_error)
            .expect_err("test: missing fields");
        assert!(err.is_invalid_input());
        assert!(matches!(err, PricingError::InvalidInput { field: "input", .. }));
    }

    #[test]
    fn base_price_override() {
        let engine = engine_with_base(Some(0.5)).expect("test: positive base");
        assert_eq!(engine.params().base_price, 0.5);
        assert_eq!(engine_with_base(None).expect("test: defaults"), PricingEngine::new());
        assert!(matches!(engine_with_base(Some(0.0)), Err(PricingError::InvalidParams(_))));
    }

    #[test]
    fn breakdown_serializes_with_factor_keys() {
        let b = compute_price(&PricingInput::default()).expect("test: valid input");
        let json = serde_json::to_value(b).expect("test: serialize breakdown");
        for key in ["base_price", "f_sd", "f_soc", "f_dist", "f_time", "f_quality", "total_multiplier", "final_price"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn liquidity_pool_handle_swaps() {
        let mut pool = LiquidityPool::new(1000.0, 10000.0).unwrap_or_else(|_| panic!("test: valid reserves"));
        assert_eq!(pool.price_a(), 10.0);
        let out = pool.swap_a_for_b(100.0).unwrap_or_else(|_| panic!("test: positive amount"));
        assert!((out - 906.6108938801499).abs() < 1e-6);
        assert!((pool.price_a() - 8.268972543529918).abs() < 1e-6);
    }
}
