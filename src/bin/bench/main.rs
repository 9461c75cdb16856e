// Arena Benchmark Runner: Monte Carlo mining-economics scenarios
// Seedable ChaCha8 ensembles, per-day JSONL series, JSON summary
//
// Usage:
//   cargo run --release --bin bench                       # All scenarios, 25 trials each
//   cargo run --release --bin bench -- --trials 5         # Quick mode
//   cargo run --release --bin bench -- bearish            # Filter by name or label
//   cargo run --release --bin bench -- --config cal.json  # Calibration/population overrides
//   cargo run --release --bin bench -- --seed 42          # Custom base seed

mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use clap::Parser;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hashpower_arena::{MachineCatalog, Result, SimConfig};

use report::BenchReport;
use scenarios::{scenarios, Scenario};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bench")]
#[command(about = "Run Monte Carlo mining-economics scenarios")]
#[command(version)]
struct Cli {
    /// Peer trials per scenario (defaults to the config's run.n_trials)
    #[arg(short, long)]
    trials: Option<usize>,

    /// Simulated days per trial (defaults to the config's run.n_days)
    #[arg(short, long)]
    days: Option<usize>,

    /// Base seed; peer i uses seed + i (defaults to the config's run.seed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config overriding calibration, population and user tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "benchmark-results")]
    out: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only run scenarios whose name or label contains this
    filter: Option<String>,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let base = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    let catalog = MachineCatalog::default();
    base.validate(&catalog)?;

    let n_trials = cli.trials.unwrap_or(base.run.n_trials);
    let n_days = cli.days.unwrap_or(base.run.n_days);
    let seed = cli.seed.unwrap_or(base.run.seed);

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => all_scenarios.iter().filter(|s| s.matches(f)).collect(),
        None => all_scenarios.iter().collect(),
    };
    if to_run.is_empty() {
        error!(filter = ?cli.filter, "no scenarios match filter");
        std::process::exit(1);
    }

    println!("\n  Arena Benchmark Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Trials/scenario: {} | Days: {} | Base seed: {}", n_trials, n_days, seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<22} {:>12} {:>14} {:>8}  {}", "Scenario", "Price", "Hash (EH/s)", "Time", "Best cohort");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for scenario in &to_run {
        let outcome = monte_carlo::run_scenario(scenario, &base, &catalog, n_trials, n_days, seed)?;

        let env_path = cli.out.join(format!("env-{}.jsonl", scenario.name));
        let pos_path = cli.out.join(format!("positions-{}.jsonl", scenario.name));
        time_series::write_jsonl(&env_path, &outcome.env)?;
        time_series::write_positions(&pos_path, &outcome.positions)?;
        info!(scenario = scenario.name, env = %env_path.display(), positions = %pos_path.display(), "series written");

        let r = &outcome.report;
        let (best_label, best_value) = r.best_cohort().unwrap_or_else(|| ("-".to_string(), 0.0));
        println!("  {:<22} {:>12.2} {:>14.2} {:>6}ms  {} ({:.0})",
            r.scenario_name,
            r.final_avg_price,
            r.final_avg_hash_rate / 1e6,
            r.elapsed_ms,
            best_label,
            best_value,
        );

        reports.push(outcome.report);
    }

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Suite time: {:.1}s\n", reports.len(), suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_trials_per_scenario: n_trials,
        base_seed: seed,
        scenarios: reports,
    };

    std::fs::create_dir_all(&cli.out)?;
    let path = cli.out.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    Ok(())
}
