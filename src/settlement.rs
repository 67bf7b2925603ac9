// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Trade Settlement

//! Settling a matched energy trade at the dynamic price.
//!
//! A buy order fills when the buyer's limit is at or above the dynamic unit
//! price; the trade then executes at the dynamic price, not at the limit.
//! Amounts are carried as `Decimal` and rounded to the settlement token's
//! precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapter::to_money;
use crate::types::PriceBreakdown;

/// Settlement token precision (7 decimal places).
pub const TOKEN_DECIMALS: u32 = 7;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettlementError {
    #[error("energy quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    #[error("dynamic price {price} exceeds buyer limit {limit}")]
    PriceAboveLimit { price: Decimal, limit: Decimal },

    #[error("price {0} cannot be represented as a settlement amount")]
    Unrepresentable(f64),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeSettlement {
    pub kwh: Decimal,
    /// Dynamic price per kWh, rounded to token precision.
    pub unit_price: Decimal,
    /// `kwh × unit_price`, rounded to token precision.
    pub token_amount: Decimal,
    /// What the buyer saved against their limit.
    pub buyer_surplus: Decimal,
}

/// Settle `kwh` of energy for a buyer willing to pay up to `buyer_limit` per kWh.
pub fn settle_trade(
    kwh: Decimal,
    buyer_limit: Decimal,
    breakdown: &PriceBreakdown,
) -> Result<TradeSettlement, SettlementError> {
    if kwh <= Decimal::ZERO {
        return Err(SettlementError::InvalidQuantity(kwh));
    }
    let unit_price = to_money(breakdown.final_price, TOKEN_DECIMALS)
        .ok_or(SettlementError::Unrepresentable(breakdown.final_price))?;

    if buyer_limit < unit_price {
        return Err(SettlementError::PriceAboveLimit { price: unit_price, limit: buyer_limit });
    }

    let token_amount = (kwh * unit_price).round_dp(TOKEN_DECIMALS);
    let buyer_surplus = ((buyer_limit - unit_price) * kwh).round_dp(TOKEN_DECIMALS);

    tracing::debug!(%kwh, %unit_price, %token_amount, "settled energy trade");

    Ok(TradeSettlement { kwh, unit_price, token_amount, buyer_surplus })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
