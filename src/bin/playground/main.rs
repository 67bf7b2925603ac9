// Energy Market Playground
// Command-line mirror of the formula playground and the liquidity pool demo
//
// Usage:
//   cargo run --bin playground -- price --weather cloudy --hour 19
//   cargo run --bin playground -- price --params params.json --json
//   cargo run --bin playground -- pool --swap 100 --swap 250
//   cargo run --bin playground -- sweep --samples 100000 --seed 42
//
// Library debug events are printed with RUST_LOG=energy_market_engine=debug

mod report;
mod sweep;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use energy_market_engine::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "playground", version, about = "Energy market pricing and liquidity playground")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the dynamic price for one set of conditions
    Price(PriceArgs),
    /// Run A -> B swaps against a constant-product pool
    Pool(PoolArgs),
    /// Monte Carlo sweep over the pricing input domain
    Sweep(SweepArgs),
}

#[derive(Args)]
struct PriceArgs {
    /// Sunlight intensity, 0-100
    #[arg(long, default_value_t = 50.0)]
    sunlight: f64,
    /// sunny, cloudy or rainy
    #[arg(long, default_value = "sunny")]
    weather: WeatherCondition,
    /// Grid demand, 0-100
    #[arg(long, default_value_t = 50.0)]
    demand: f64,
    /// Aggregate battery state of charge, 0-100
    #[arg(long, default_value_t = 50.0)]
    soc: f64,
    /// Distance between trading parties in km
    #[arg(long, default_value_t = 1.0)]
    distance: f64,
    /// Local hour, 0-23
    #[arg(long, default_value_t = 12)]
    hour: u8,
    /// Donor reliability score, 0-100
    #[arg(long, default_value_t = 100.0)]
    reliability: f64,
    /// JSON file with pricing parameter overrides
    #[arg(long)]
    params: Option<PathBuf>,
    /// Print the market quote as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PoolArgs {
    #[arg(long, default_value_t = 1000.0)]
    reserve_a: f64,
    #[arg(long, default_value_t = 10000.0)]
    reserve_b: f64,
    /// Amount of token A to swap; repeat for several swaps
    #[arg(long = "swap", default_values_t = [100.0])]
    swaps: Vec<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SweepArgs {
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Price(args) => run_price(args),
        Command::Pool(args) => run_pool(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn load_engine(path: Option<&Path>) -> Result<PricingEngine> {
    let params = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read params file {}", path.display()))?;
            serde_json::from_str::<PricingParams>(&raw)
                .with_context(|| format!("failed to parse params file {}", path.display()))?
        }
        None => PricingParams::default(),
    };
    tracing::info!(?params, "pricing parameters loaded");
    Ok(PricingEngine::with_params(params)?)
}

// ─── price ──────────────────────────────────────────────────────────────────

fn run_price(args: PriceArgs) -> Result<()> {
    let engine = load_engine(args.params.as_deref())?;
    let input = PricingInput {
        sunlight_intensity: args.sunlight,
        weather: args.weather,
        grid_demand: args.demand,
        battery_state_of_charge: args.soc,
        distance_km: args.distance,
        hour_of_day: args.hour,
        donor_reliability_score: args.reliability,
    };
    let quote = engine.quote_now(&input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    let b = &quote.breakdown;
    println!("Supply {:.2} / Demand {:.2} ({})", quote.supply, quote.demand, input.weather);
    println!("  Supply/Demand   {:>8.4}x", b.supply_demand_factor);
    println!("  Scarcity (SoC)  {:>8.4}x", b.scarcity_factor);
    println!("  Distance        {:>8.4}x", b.distance_factor);
    println!("  Time of Day     {:>8.4}x  {:?}", b.time_factor, TimeBand::from_hour(input.hour_of_day));
    println!("  Quality         {:>8.4}x", b.quality_factor);
    let clamp_note = if b.was_clamped() { " (clamped)" } else { "" };
    println!("  Total           {:>8.4}x{}", b.total_multiplier, clamp_note);
    println!(
        "Price: {:.4} per kWh (base {:.2}, {:+.1}%)",
        b.final_price,
        b.base_price,
        b.change_from_base_pct()
    );
    Ok(())
}

// ─── pool ───────────────────────────────────────────────────────────────────

fn run_pool(args: PoolArgs) -> Result<()> {
    let mut pool = ConstantProductPool::new(args.reserve_a, args.reserve_b)?;

    if args.json {
        let mut quotes = Vec::with_capacity(args.swaps.len());
        for &amount in &args.swaps {
            let quote = pool.quote_a_for_b(amount)?;
            pool.swap_a_for_b(amount)?;
            quotes.push(quote);
        }
        let out = serde_json::json!({ "swaps": quotes, "status": pool.status(), "price_a": pool.price() });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_status("Initial", &pool);
    for &amount in &args.swaps {
        let received = pool.swap_a_for_b(amount)?;
        println!();
        println!("Swapped {} Token A, Received {:.2} Token B", amount, received);
        print_status("New", &pool);
    }
    Ok(())
}

fn print_status(label: &str, pool: &ConstantProductPool) {
    let s = pool.status();
    println!(
        "{} Pool Status: TokenA={} TokenB={} K={}",
        label, s.reserve_a, s.reserve_b, s.invariant_k
    );
    println!("{} Price of Token A (in B): {}", label, pool.price());
}

// ─── sweep ──────────────────────────────────────────────────────────────────

fn run_sweep(args: SweepArgs) -> Result<()> {
    let engine = load_engine(args.params.as_deref())?;
    let report = sweep::run_sweep(&engine, args.samples, args.seed)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Sweep: {} samples, seed {}, bounds [{:.2}, {:.2}]",
            report.samples, report.seed, report.price_floor, report.price_ceiling
        );
        println!(
            "  price  mean {:.4} ± {:.4} (95% CI [{:.4}, {:.4}])",
            report.final_price.mean,
            report.final_price.std_dev,
            report.final_price.ci_lower,
            report.final_price.ci_upper
        );
        println!(
            "         min {:.4} p5 {:.4} median {:.4} p95 {:.4} max {:.4}",
            report.final_price.min,
            report.final_price.p05,
            report.final_price.median,
            report.final_price.p95,
            report.final_price.max
        );
        println!("  clamped low {} / high {}", report.clamped_low, report.clamped_high);
        for band in &report.by_time_band {
            println!(
                "  {:<12} n={:<7} mean {:.4} median {:.4}",
                band.band, band.final_price.n, band.final_price.mean, band.final_price.median
            );
        }
        println!("  bound violations: {}", report.bound_violations);
    }

    if !report.pass() {
        anyhow::bail!("{} prices escaped the clamp bounds", report.bound_violations);
    }
    Ok(())
}
