// Playground report types
// Structured output for the Monte Carlo sweep

use serde::Serialize;

// ─── Statistics ─────────────────────────────────────────────────────────────

/// Distribution of one sweep quantity. Prices pile up on the clamp bounds,
/// so percentiles say more than the mean alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// 95% confidence interval of the mean.
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub p05: f64,
    pub median: f64,
    pub p95: f64,
    pub max: f64,
}

/// Nearest-rank percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std_dev = if sorted.len() > 1 {
            (sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let half_width = 1.96 * std_dev / n.sqrt();

        Self {
            n: sorted.len(),
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min: sorted[0],
            p05: percentile(&sorted, 5.0),
            median: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            max: sorted[sorted.len() - 1],
        }
    }
}

// ─── Sweep Report ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BandReport {
    pub band: String,
    pub final_price: Stats,
}

#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub seed: u64,
    pub samples: usize,
    pub base_price: f64,
    pub price_floor: f64,
    pub price_ceiling: f64,
    pub final_price: Stats,
    pub total_multiplier: Stats,
    pub clamped_low: usize,
    pub clamped_high: usize,
    /// Prices outside `[price_floor, price_ceiling]`; must be zero.
    pub bound_violations: usize,
    pub by_time_band: Vec<BandReport>,
}

impl SweepReport {
    pub fn pass(&self) -> bool {
        self.bound_violations == 0
    }
}
