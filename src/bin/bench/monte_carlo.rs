// Monte Carlo Ensemble Driver
// One parent simulator per scenario on its own stream; N peers with seeds base_seed..base_seed+N-1

use std::time::Instant;

use hashpower_arena::{parent_rng, AveragedPositionRow, MachineCatalog, Population, Result, SimConfig, Simulator};

use crate::report::{final_day_summaries, ScenarioReport};
use crate::scenarios::Scenario;
use crate::time_series::{env_snapshots, EnvSnapshot};

/// Everything a scenario run produces.
pub struct ScenarioOutcome {
    pub report: ScenarioReport,
    pub env: Vec<EnvSnapshot>,
    pub positions: Vec<AveragedPositionRow>,
}

pub fn run_scenario(
    scenario: &Scenario,
    base: &SimConfig,
    catalog: &MachineCatalog,
    n_trials: usize,
    n_days: usize,
    base_seed: u64,
) -> Result<ScenarioOutcome> {
    let start = Instant::now();
    let cfg = scenario.config(base);
    let population = Population::from_config(&cfg, catalog)?;

    let mut rng = parent_rng(base_seed);
    let mut sim = Simulator::generate(population, cfg.calibration.clone(), n_days, &mut rng)?;
    sim.run_trials(n_trials, base_seed)?;

    let prices = sim.avg_prices()?;
    let hash_rates = sim.avg_global_hash_rate()?;
    let positions = sim.avg_user_positions()?;

    let report = ScenarioReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        n_trials,
        n_days,
        final_avg_price: prices.last().copied().unwrap_or_default(),
        final_avg_hash_rate: hash_rates.last().copied().unwrap_or_default(),
        elapsed_ms: start.elapsed().as_millis(),
        cohorts: final_day_summaries(&positions),
    };

    Ok(ScenarioOutcome {
        report,
        env: env_snapshots(&prices, &hash_rates, n_trials),
        positions,
    })
}
