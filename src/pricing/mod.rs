//! Dynamic energy pricing: factor math, engine, quotes, history and
//! telemetry reduction.

pub mod engine;
pub mod factors;
pub mod history;
pub mod params;
pub mod quote;
pub mod telemetry;

pub use engine::{compute_price, PricingEngine};
pub use history::{HistorySummary, PriceHistory};
pub use params::PricingParams;
pub use quote::MarketQuote;
pub use telemetry::{community_state_of_charge, DeviceQualityMetrics};
