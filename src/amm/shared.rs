// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Shared Pool Handle

use parking_lot::Mutex;
use std::sync::Arc;

use super::pool::{ConstantProductPool, PoolError, PoolStatus, SwapQuote};

/// Cloneable handle that serializes access to one pool.
///
/// A swap holds the lock across quote and commit, so no caller ever prices
/// against reserves another swap is about to replace.
#[derive(Debug, Clone)]
pub struct SharedPool {
    inner: Arc<Mutex<ConstantProductPool>>,
}

impl SharedPool {
    pub fn new(pool: ConstantProductPool) -> Self {
        Self { inner: Arc::new(Mutex::new(pool)) }
    }

    pub fn swap_a_for_b(&self, amount_in: f64) -> Result<f64, PoolError> {
        self.inner.lock().swap_a_for_b(amount_in)
    }

    pub fn quote_a_for_b(&self, amount_in: f64) -> Result<SwapQuote, PoolError> {
        self.inner.lock().quote_a_for_b(amount_in)
    }

    pub fn price(&self) -> f64 {
        self.inner.lock().price()
    }

    pub fn status(&self) -> PoolStatus {
        self.inner.lock().status()
    }

    /// Copy of the current pool state.
    pub fn snapshot(&self) -> ConstantProductPool {
        self.inner.lock().clone()
    }
}

impl From<ConstantProductPool> for SharedPool {
    fn from(pool: ConstantProductPool) -> Self {
        Self::new(pool)
    }
}
