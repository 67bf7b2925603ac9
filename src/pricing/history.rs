// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Energy Market Engine - Price History

//! Rolling window of recent quotes, kept in memory for explainability and
//! market-chart summaries. Oldest entries are evicted once the window is full.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::quote::MarketQuote;

pub const DEFAULT_WINDOW_SIZE: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(from = "StoredHistory")]
pub struct PriceHistory {
    window: VecDeque<MarketQuote>,
    capacity: usize,
}

/// Wire shape of a history; normalised into a bounded window on load.
#[derive(Deserialize)]
struct StoredHistory {
    window: VecDeque<MarketQuote>,
    capacity: usize,
}

impl From<StoredHistory> for PriceHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut history = PriceHistory {
            window: stored.window,
            capacity: stored.capacity.max(1),
        };
        history.evict_to(history.capacity);
        history
    }
}

/// Aggregate view over the quotes currently in the window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub count: usize,
    pub mean_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_multiplier: f64,
    /// Quotes whose aggregate multiplier hit a clamp bound.
    pub clamped_count: usize,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl PriceHistory {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, quote: MarketQuote) {
        self.evict_to(self.capacity - 1);
        self.window.push_back(quote);
    }

    /// Drop the oldest quotes until at most `len` remain.
    fn evict_to(&mut self, len: usize) {
        while self.window.len() > len {
            self.window.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&MarketQuote> {
        self.window.back()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MarketQuote> {
        self.window.iter()
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        if self.window.is_empty() {
            return None;
        }
        let n = self.window.len() as f64;
        let prices = self.window.iter().map(|q| q.price);
        Some(HistorySummary {
            count: self.window.len(),
            mean_price: prices.clone().sum::<f64>() / n,
            min_price: prices.clone().fold(f64::INFINITY, f64::min),
            max_price: prices.fold(f64::NEG_INFINITY, f64::max),
            mean_multiplier: self.window.iter().map(|q| q.breakdown.total_multiplier).sum::<f64>() / n,
            clamped_count: self.window.iter().filter(|q| q.breakdown.was_clamped()).count(),
        })
    }
}
