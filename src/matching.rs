// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Order Matching

//! One matching pass over the open order book.
//!
//! Sell orders are walked cheapest ask first, buy orders highest limit first.
//! Supply and demand for the supply/demand factor are the open sell and buy
//! order counts, and each sell order is priced with its own ask as the base
//! price. A pair fills when the quantities are equal and the buyer's limit
//! covers the dynamic price; the trade settles at the dynamic price. Every
//! order fills at most once per pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapter::from_decimal;
use crate::pricing::{MarketQuote, PricingEngine};
use crate::settlement::{settle_trade, SettlementError, TradeSettlement};
use crate::types::{PriceBreakdown, PricingError, PricingInput};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("order {id}: {reason}")]
    InvalidOrder { id: String, reason: String },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

// ---------------------------------------------------------------------------
// Orders and fills
// ---------------------------------------------------------------------------

/// An open order. `token_price` is the ask for a sell order and the per-kWh
/// limit for a buy order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyOrder {
    pub id: String,
    pub kwh: Decimal,
    pub token_price: Decimal,
}

impl EnergyOrder {
    pub fn new(id: impl Into<String>, kwh: Decimal, token_price: Decimal) -> Self {
        Self { id: id.into(), kwh, token_price }
    }

    fn validate(&self) -> Result<(), MatchError> {
        let invalid = |reason: String| MatchError::InvalidOrder { id: self.id.clone(), reason };
        if self.kwh <= Decimal::ZERO {
            return Err(invalid(format!("kwh must be positive, got {}", self.kwh)));
        }
        if self.token_price <= Decimal::ZERO {
            return Err(invalid(format!("token price must be positive, got {}", self.token_price)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderMatch {
    pub sell_id: String,
    pub buy_id: String,
    pub ask: Decimal,
    pub breakdown: PriceBreakdown,
    pub settlement: TradeSettlement,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

fn sorted_books<'a>(
    sells: &'a [EnergyOrder],
    buys: &'a [EnergyOrder],
) -> (Vec<&'a EnergyOrder>, Vec<&'a EnergyOrder>) {
    let mut sells: Vec<&EnergyOrder> = sells.iter().collect();
    let mut buys: Vec<&EnergyOrder> = buys.iter().collect();
    sells.sort_by(|a, b| a.token_price.cmp(&b.token_price));
    buys.sort_by(|a, b| b.token_price.cmp(&a.token_price));
    (sells, buys)
}

/// Price `conditions` against the order counts with `ask` as the base price.
fn price_at_ask(
    engine: &PricingEngine,
    ask: Decimal,
    supply: usize,
    demand: usize,
    conditions: &PricingInput,
) -> Result<PriceBreakdown, PricingError> {
    let params = engine.params().clone().with_base_price(from_decimal(ask));
    PricingEngine::with_params(params)?.compute_price_for_volumes(supply as f64, demand as f64, conditions)
}

/// Run one matching pass. `conditions` supplies the scarcity, distance,
/// time-of-day and quality inputs; its sunlight and grid-demand readings are
/// replaced by the order counts.
pub fn match_orders(
    sells: &[EnergyOrder],
    buys: &[EnergyOrder],
    conditions: &PricingInput,
    engine: &PricingEngine,
) -> Result<Vec<OrderMatch>, MatchError> {
    for order in sells.iter().chain(buys) {
        order.validate()?;
    }
    if sells.is_empty() || buys.is_empty() {
        return Ok(Vec::new());
    }

    let (sells, buys) = sorted_books(sells, buys);
    let mut buy_filled = vec![false; buys.len()];
    let mut matches = Vec::new();

    tracing::debug!(supply = sells.len(), demand = buys.len(), "matching order book");

    for sell in &sells {
        let breakdown = price_at_ask(engine, sell.token_price, sells.len(), buys.len(), conditions)?;

        for (idx, buy) in buys.iter().enumerate() {
            if buy_filled[idx] || buy.kwh != sell.kwh {
                continue;
            }
            let settlement = match settle_trade(buy.kwh, buy.token_price, &breakdown) {
                Ok(settlement) => settlement,
                Err(SettlementError::PriceAboveLimit { .. }) => continue,
                Err(e) => return Err(e.into()),
            };

            tracing::debug!(
                sell_id = %sell.id,
                buy_id = %buy.id,
                ask = %sell.token_price,
                unit_price = %settlement.unit_price,
                "orders matched"
            );

            buy_filled[idx] = true;
            matches.push(OrderMatch {
                sell_id: sell.id.clone(),
                buy_id: buy.id.clone(),
                ask: sell.token_price,
                breakdown,
                settlement,
            });
            break;
        }
    }

    Ok(matches)
}

/// The market-price payload for the current book: supply and demand are the
/// open order counts and the base price is the lowest ask, or the engine's
/// own base price when there are no sell orders.
pub fn order_book_quote(
    sells: &[EnergyOrder],
    buys: &[EnergyOrder],
    conditions: &PricingInput,
    engine: &PricingEngine,
    at: DateTime<Utc>,
) -> Result<MarketQuote, MatchError> {
    let breakdown = match sells.iter().map(|o| o.token_price).min() {
        Some(ask) => price_at_ask(engine, ask, sells.len(), buys.len(), conditions)?,
        None => engine.compute_price_for_volumes(0.0, buys.len() as f64, conditions)?,
    };
    Ok(MarketQuote {
        price: breakdown.final_price,
        supply: sells.len() as f64,
        demand: buys.len() as f64,
        timestamp: at,
        breakdown,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    /// Every factor except supply/demand is neutral.
    fn neutral() -> PricingInput {
        PricingInput {
            battery_state_of_charge: 100.0,
            distance_km: 0.0,
            hour_of_day: 12,
            donor_reliability_score: 0.0,
            ..PricingInput::default()
        }
    }

    fn order(id: &str, kwh: Decimal, price: Decimal) -> EnergyOrder {
        EnergyOrder::new(id, kwh, price)
    }

    #[test]
    fn balanced_book_settles_at_ask() {
        let sells = [order("s1", dec!(5), dec!(4))];
        let buys = [order("b1", dec!(5), dec!(6))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert_eq!(m.len(), 1);
        assert_eq!((m[0].sell_id.as_str(), m[0].buy_id.as_str()), ("s1", "b1"));
        assert_eq!(m[0].breakdown.base_price, 4.0);
        assert_eq!(m[0].settlement.unit_price, dec!(4));
        assert_eq!(m[0].settlement.token_amount, dec!(20));
        assert_eq!(m[0].settlement.buyer_surplus, dec!(10));
    }

    #[test]
    fn cheapest_ask_meets_highest_limit_first() {
        let sells = [order("pricey", dec!(1), dec!(3)), order("cheap", dec!(1), dec!(1))];
        let buys = [order("low", dec!(1), dec!(10)), order("high", dec!(1), dec!(20))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        let pairs: Vec<(&str, &str)> = m.iter().map(|x| (x.sell_id.as_str(), x.buy_id.as_str())).collect();
        assert_eq!(pairs, vec![("cheap", "high"), ("pricey", "low")]);
    }

    #[test]
    fn only_equal_quantities_fill() {
        let sells = [order("s1", dec!(3), dec!(2))];
        let buys = [order("b-big", dec!(4), dec!(50)), order("b-exact", dec!(3), dec!(10))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].buy_id, "b-exact");
    }

    #[test]
    fn each_buy_fills_once() {
        let sells = [order("s1", dec!(2), dec!(1)), order("s2", dec!(2), dec!(1))];
        let buys = [order("b1", dec!(2), dec!(10))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].buy_id, "b1");
    }

    #[test]
    fn each_sell_fills_once() {
        let sells = [order("s1", dec!(2), dec!(1))];
        let buys = [order("b1", dec!(2), dec!(10)), order("b2", dec!(2), dec!(9))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].buy_id, "b1");
    }

    #[test]
    fn limit_below_dynamic_price_does_not_fill() {
        // three buyers vs one seller pushes the price above the ask
        let sells = [order("s1", dec!(1), dec!(5))];
        let buys = [
            order("b1", dec!(1), dec!(5)),
            order("b2", dec!(2), dec!(50)),
            order("b3", dec!(2), dec!(50)),
        ];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert!(m.is_empty());
    }

    #[test]
    fn order_counts_drive_supply_demand() {
        let sells = [order("s1", dec!(1), dec!(5))];
        let buys = [order("b1", dec!(1), dec!(100)), order("b2", dec!(7), dec!(100))];
        let m = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        let expected = 1.0 + 0.2 * 2.0_f64.ln();
        assert!((m[0].breakdown.supply_demand_factor - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_side_matches_nothing() {
        let buys = [order("b1", dec!(1), dec!(10))];
        let m = match_orders(&[], &buys, &neutral(), &PricingEngine::new()).expect("test: valid book");
        assert!(m.is_empty());
    }

    #[test]
    fn rejects_invalid_orders() {
        let sells = [order("s1", dec!(0), dec!(1))];
        let buys = [order("b1", dec!(1), dec!(10))];
        let err = match_orders(&sells, &buys, &neutral(), &PricingEngine::new()).expect_err("test: zero kwh");
        assert!(matches!(err, MatchError::InvalidOrder { ref id, .. } if id == "s1"));

        let buys = [order("b1", dec!(1), dec!(-1))];
        assert!(match_orders(&[], &buys, &neutral(), &PricingEngine::new()).is_err());
    }

    #[test]
    fn book_quote_uses_lowest_ask_and_counts() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("test: valid date");
        let sells = [order("s1", dec!(1), dec!(0.8)), order("s2", dec!(1), dec!(0.5))];
        let buys = [order("b1", dec!(1), dec!(1))];
        let q = order_book_quote(&sells, &buys, &neutral(), &PricingEngine::new(), at).expect("test: valid book");
        assert_eq!(q.supply, 2.0);
        assert_eq!(q.demand, 1.0);
        assert_eq!(q.breakdown.base_price, 0.5);
        assert!((q.breakdown.supply_demand_factor - (1.0 + 0.2 * 0.5_f64.ln())).abs() < 1e-12);
        assert_eq!(q.timestamp, at);
    }

    #[test]
    fn book_quote_without_sells_uses_engine_base() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("test: valid date");
        let q = order_book_quote(&[], &[], &neutral(), &PricingEngine::new(), at).expect("test: empty book");
        assert_eq!(q.breakdown.base_price, 5.0);
        assert_eq!(q.price, 5.0);
        assert_eq!(q.supply, 0.0);
    }
}
