// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Constant Product Pool

//! Two-asset constant-product market maker (`x · y = k`) with a 0.3% fee on
//! the input side.
//!
//! Only the A → B direction exists. After every swap the stored invariant is
//! recomputed from the new reserves rather than carried over, so `k` can
//! drift across trades through floating-point rounding. That recomputation is
//! part of the observable behaviour and is kept as is.
//!
//! A swap that would pay out nothing, or push reserve A past `f64::MAX`, is
//! rejected before the reserves are touched.

use serde::{Deserialize, Serialize};

/// Proportional fee taken from every swap input (30 basis points).
pub const SWAP_FEE_RATE: f64 = 0.003;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolError {
    #[error("invalid swap amount {0}: must be a positive finite number")]
    InvalidAmount(f64),

    #[error("invalid initial reserves ({reserve_a}, {reserve_b}): both must be positive finite numbers")]
    InvalidReserve { reserve_a: f64, reserve_b: f64 },
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Snapshot of pool state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PoolStatus {
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub invariant_k: f64,
}

/// Outcome of an A → B swap, computed against the current reserves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwapQuote {
    pub amount_in: f64,
    pub fee: f64,
    pub amount_out: f64,
    pub new_reserve_a: f64,
    pub new_reserve_b: f64,
}

// ---------------------------------------------------------------------------
// ConstantProductPool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantProductPool {
    reserve_a: f64,
    reserve_b: f64,
    invariant_k: f64,
}

impl ConstantProductPool {
    pub fn new(reserve_a: f64, reserve_b: f64) -> Result<Self, PoolError> {
        let valid = |r: f64| r.is_finite() && r > 0.0;
        if !valid(reserve_a) || !valid(reserve_b) {
            return Err(PoolError::InvalidReserve { reserve_a, reserve_b });
        }
        Ok(Self {
            reserve_a,
            reserve_b,
            invariant_k: reserve_a * reserve_b,
        })
    }

    /// Price the swap without touching the reserves.
    pub fn quote_a_for_b(&self, amount_in: f64) -> Result<SwapQuote, PoolError> {
        if !amount_in.is_finite() || amount_in <= 0.0 {
            return Err(PoolError::InvalidAmount(amount_in));
        }
        let fee = amount_in * SWAP_FEE_RATE;
        let net_in = amount_in - fee;

        let new_reserve_a = self.reserve_a + net_in;
        let new_reserve_b = self.invariant_k / new_reserve_a;
        let amount_out = self.reserve_b - new_reserve_b;

        // Inputs too small to move reserve A, or large enough to overflow it,
        // would credit nothing or leave the pool with infinite/zero reserves.
        if !new_reserve_a.is_finite() || new_reserve_b <= 0.0 || amount_out <= 0.0 {
            return Err(PoolError::InvalidAmount(amount_in));
        }

        Ok(SwapQuote {
            amount_in,
            fee,
            amount_out,
            new_reserve_a,
            new_reserve_b,
        })
    }

    /// Swap `amount_in` of A for B, returning the B paid out.
    pub fn swap_a_for_b(&mut self, amount_in: f64) -> Result<f64, PoolError> {
        let quote = self.quote_a_for_b(amount_in)?;
        self.apply(&quote);
        Ok(quote.amount_out)
    }

    fn apply(&mut self, quote: &SwapQuote) {
        self.reserve_a = quote.new_reserve_a;
        self.reserve_b = quote.new_reserve_b;
        self.invariant_k = quote.new_reserve_a * quote.new_reserve_b;

        tracing::debug!(
            amount_in = quote.amount_in,
            fee = quote.fee,
            amount_out = quote.amount_out,
            reserve_a = self.reserve_a,
            reserve_b = self.reserve_b,
            invariant_k = self.invariant_k,
            "swapped A for B"
        );
    }

    /// Marginal price of one A in units of B.
    pub fn price(&self) -> f64 {
        self.reserve_b / self.reserve_a
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            invariant_k: self.invariant_k,
        }
    }

    pub fn reserve_a(&self) -> f64 {
        self.reserve_a
    }

    pub fn reserve_b(&self) -> f64 {
        self.reserve_b
    }

    pub fn invariant_k(&self) -> f64 {
        self.invariant_k
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
