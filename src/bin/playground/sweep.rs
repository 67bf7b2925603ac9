// Monte Carlo sweep over the pricing input domain
// Seeded ChaCha8 PRNG so every run is reproducible

use energy_market_engine::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::report::{BandReport, Stats, SweepReport};

/// Distances beyond the UI's 10 km slider, so the ceiling clamp is exercised.
const MAX_SWEEP_DISTANCE_KM: f64 = 25.0;

const BANDS: [TimeBand; 4] = [
    TimeBand::EveningPeak,
    TimeBand::MorningPeak,
    TimeBand::NightTrough,
    TimeBand::Standard,
];

pub fn random_input(rng: &mut ChaCha8Rng) -> PricingInput {
    let weather = match rng.gen_range(0..3) {
        0 => WeatherCondition::Sunny,
        1 => WeatherCondition::Cloudy,
        _ => WeatherCondition::Rainy,
    };
    PricingInput {
        sunlight_intensity: rng.gen_range(0.0..=100.0),
        weather,
        grid_demand: rng.gen_range(0.0..=100.0),
        battery_state_of_charge: rng.gen_range(0.0..=100.0),
        distance_km: rng.gen_range(0.0..=MAX_SWEEP_DISTANCE_KM),
        hour_of_day: rng.gen_range(0..24),
        donor_reliability_score: rng.gen_range(0.0..=100.0),
    }
}

pub fn run_sweep(engine: &PricingEngine, samples: usize, seed: u64) -> Result<SweepReport, PricingError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let params = engine.params();

    let mut prices = Vec::with_capacity(samples);
    let mut multipliers = Vec::with_capacity(samples);
    let mut band_prices: [Vec<f64>; 4] = Default::default();
    let mut clamped_low = 0;
    let mut clamped_high = 0;
    let mut bound_violations = 0;

    for _ in 0..samples {
        let input = random_input(&mut rng);
        let b = engine.compute_price(&input)?;

        let raw = b.raw_multiplier();
        if raw < params.min_multiplier {
            clamped_low += 1;
        } else if raw > params.max_multiplier {
            clamped_high += 1;
        }
        if b.final_price < params.price_floor() || b.final_price > params.price_ceiling() {
            tracing::error!(?input, final_price = b.final_price, "price escaped clamp bounds");
            bound_violations += 1;
        }

        let band = TimeBand::from_hour(input.hour_of_day);
        if let Some(idx) = BANDS.iter().position(|&x| x == band) {
            band_prices[idx].push(b.final_price);
        }
        prices.push(b.final_price);
        multipliers.push(b.total_multiplier);
    }

    Ok(SweepReport {
        seed,
        samples,
        base_price: params.base_price,
        price_floor: params.price_floor(),
        price_ceiling: params.price_ceiling(),
        final_price: Stats::from_samples(&prices),
        total_multiplier: Stats::from_samples(&multipliers),
        clamped_low,
        clamped_high,
        bound_violations,
        by_time_band: BANDS
            .iter()
            .zip(band_prices.iter())
            .map(|(band, samples)| BandReport {
                band: format!("{:?}", band),
                final_price: Stats::from_samples(samples),
            })
            .collect(),
    })
}
