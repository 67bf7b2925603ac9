//! Constant-product liquidity pool and a thread-safe handle around it.

pub mod pool;
pub mod shared;

pub use pool::{ConstantProductPool, PoolError, PoolStatus, SwapQuote, SWAP_FEE_RATE};
pub use shared::SharedPool;
