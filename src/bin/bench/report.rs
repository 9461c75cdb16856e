// Benchmark Report Types
// Structured JSON summary of final user positions per scenario

use serde::Serialize;

use hashpower_arena::{AveragedPositionRow, MachineModel, Stats, Strategy};

// ─── Per-Cohort Summary ─────────────────────────────────────────────────────

/// A user cohort's position on the last simulated day, across the ensemble.
#[derive(Debug, Clone, Serialize)]
pub struct CohortSummary {
    pub strategy: Strategy,
    pub machine_model: MachineModel,
    pub elec_cost: f64,
    pub n_machines: u64,
    pub day: usize,
    pub btc_balance: f64,
    pub currency_balance: f64,
    pub position: Stats,
}

impl CohortSummary {
    pub fn from_row(row: &AveragedPositionRow) -> Self {
        Self {
            strategy: row.mean.strategy,
            machine_model: row.mean.machine_model,
            elec_cost: row.mean.elec_cost,
            n_machines: row.mean.n_machines,
            day: row.mean.day,
            btc_balance: row.mean.btc_balance,
            currency_balance: row.mean.currency_balance,
            position: row.position_band.clone(),
        }
    }
}

/// Rows for the last day present in `rows`.
pub fn final_day_summaries(rows: &[AveragedPositionRow]) -> Vec<CohortSummary> {
    let Some(last_day) = rows.iter().map(|r| r.mean.day).max() else {
        return Vec::new();
    };
    rows.iter()
        .filter(|r| r.mean.day == last_day)
        .map(CohortSummary::from_row)
        .collect()
}

// ─── Scenario Report ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub n_trials: usize,
    pub n_days: usize,
    pub final_avg_price: f64,
    pub final_avg_hash_rate: f64,
    pub elapsed_ms: u128,
    pub cohorts: Vec<CohortSummary>,
}

impl ScenarioReport {
    /// Best final mean position, as (label, value).
    pub fn best_cohort(&self) -> Option<(String, f64)> {
        self.cohorts
            .iter()
            .max_by(|a, b| a.position.mean.total_cmp(&b.position.mean))
            .map(|c| {
                (
                    format!("{} {} @{:.2}", c.machine_model, c.strategy, c.elec_cost),
                    c.position.mean,
                )
            })
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_trials_per_scenario: usize,
    pub base_seed: u64,
    pub scenarios: Vec<ScenarioReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashpower_arena::PositionRow;

    fn averaged(day: usize, value: f64) -> AveragedPositionRow {
        AveragedPositionRow {
            mean: PositionRow {
                day,
                price: 1.0,
                global_hash_rate: 1.0,
                global_reward: 1.0,
                machine_model: MachineModel::AntminerS19,
                machine_hash_rate: 95.0,
                machine_power_kw: 3.25,
                n_machines: 1,
                strategy: Strategy::SellDaily,
                elec_cost: 0.03,
                own_hash_rate: 95.0,
                revenue: 0.0,
                expense: 0.0,
                btc_balance: 0.0,
                currency_balance: value,
                total_position_value: value,
            },
            trials: 2,
            position_band: Stats::over_trials([value, value]),
        }
    }

    #[test]
    fn summaries_keep_last_day_only() {
        let rows = vec![averaged(0, 0.0), averaged(5, 12.0), averaged(3, 7.0)];
        let s = final_day_summaries(&rows);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].day, 5);
        assert_eq!(s[0].position.mean, 12.0);
        assert!(final_day_summaries(&[]).is_empty());
    }
}
