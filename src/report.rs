// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Report Types

//! Reporting rows and Monte Carlo aggregation.
//!
//! Everything here is a read-only reduction over finished simulators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::{MachineModel, Strategy};

// ─── Trial bands ────────────────────────────────────────────────────────────

/// Normal quantile for a two-sided 95% interval on the ensemble mean.
const Z_95: f64 = 1.96;

/// Spread of one metric across peer trials.
///
/// `std_dev` is the sample deviation between trials; `ci_lower..ci_upper`
/// bounds the ensemble mean. An empty band is all zeros with `n == 0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    /// Band over one value per trial, accumulated in a single pass.
    pub fn over_trials(values: impl IntoIterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut mean = 0.0;
        let mut sum_sq = 0.0;
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values {
            n += 1;
            let delta = v - mean;
            mean += delta / n as f64;
            sum_sq += delta * (v - mean);
            min = min.min(v);
            max = max.max(v);
        }
        if n == 0 {
            return Self::default();
        }
        let std_dev = if n > 1 { (sum_sq / (n - 1) as f64).sqrt() } else { 0.0 };
        let half_width = Z_95 * std_dev / (n as f64).sqrt();
        Self {
            mean,
            std_dev,
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
            min,
            max,
            n,
        }
    }

    /// Whether `value` falls inside the observed trial range.
    pub fn spans(&self, value: f64) -> bool {
        self.n > 0 && self.min <= value && value <= self.max
    }
}

impl FromIterator<f64> for Stats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::over_trials(iter)
    }
}

// ─── Position rows ──────────────────────────────────────────────────────────

/// One cohort on one day, joined with that day's market state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionRow {
    pub day: usize,
    pub price: f64,
    pub global_hash_rate: f64,
    /// Network reward for the day, BTC.
    pub global_reward: f64,
    pub machine_model: MachineModel,
    pub machine_hash_rate: f64,
    pub machine_power_kw: f64,
    pub n_machines: u64,
    pub strategy: Strategy,
    pub elec_cost: f64,
    pub own_hash_rate: f64,
    /// Cohort share of the day's reward, BTC.
    pub revenue: f64,
    /// Electricity cost of the day, currency.
    pub expense: f64,
    pub btc_balance: f64,
    pub currency_balance: f64,
    /// `currency_balance + btc_balance × price`.
    pub total_position_value: f64,
}

/// Grouping identity of a row across peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CohortDayKey {
    strategy: Strategy,
    machine_model: MachineModel,
    elec_cost_bits: u64,
    day: usize,
    n_machines: u64,
}

impl From<&PositionRow> for CohortDayKey {
    fn from(r: &PositionRow) -> Self {
        Self {
            strategy: r.strategy,
            machine_model: r.machine_model,
            elec_cost_bits: r.elec_cost.to_bits(),
            day: r.day,
            n_machines: r.n_machines,
        }
    }
}

/// Pointwise ensemble mean of a cohort-day, with the spread of position value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AveragedPositionRow {
    #[serde(flatten)]
    pub mean: PositionRow,
    pub trials: usize,
    pub position_band: Stats,
}

/// Average rows sharing (strategy, machine, electricity cost, day, machine count).
///
/// Output is ordered by that key.
pub fn average_positions(rows: &[PositionRow]) -> Vec<AveragedPositionRow> {
    let mut groups: BTreeMap<CohortDayKey, Vec<&PositionRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(CohortDayKey::from(row)).or_default().push(row);
    }
    groups.into_values().map(|g| average_group(&g)).collect()
}

fn average_group(group: &[&PositionRow]) -> AveragedPositionRow {
    let n = group.len() as f64;
    let mean_of = |f: fn(&PositionRow) -> f64| group.iter().map(|r| f(r)).sum::<f64>() / n;
    let first = group[0];

    AveragedPositionRow {
        mean: PositionRow {
            price: mean_of(|r| r.price),
            global_hash_rate: mean_of(|r| r.global_hash_rate),
            global_reward: mean_of(|r| r.global_reward),
            own_hash_rate: mean_of(|r| r.own_hash_rate),
            revenue: mean_of(|r| r.revenue),
            expense: mean_of(|r| r.expense),
            btc_balance: mean_of(|r| r.btc_balance),
            currency_balance: mean_of(|r| r.currency_balance),
            total_position_value: mean_of(|r| r.total_position_value),
            ..first.clone()
        },
        trials: group.len(),
        position_band: group.iter().map(|r| r.total_position_value).collect(),
    }
}

/// Pointwise mean of equally long series.
pub fn average_series<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Result<Vec<f64>> {
    let series: Vec<&[f64]> = series.into_iter().collect();
    let Some(first) = series.first() else {
        return Err(SimError::NoTrials);
    };
    let len = first.len();
    if let Some(bad) = series.iter().find(|s| s.len() != len) {
        return Err(SimError::SeriesLengthMismatch {
            prices: len,
            rewards: bad.len(),
            hash_rates: bad.len(),
        });
    }
    let n = series.len() as f64;
    Ok((0..len)
        .map(|i| series.iter().map(|s| s[i]).sum::<f64>() / n)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: usize, elec_cost: f64, value: f64) -> PositionRow {
        PositionRow {
            day,
            price: 100.0 + value,
            global_hash_rate: 1_000.0,
            global_reward: 900.0,
            machine_model: MachineModel::AntminerS9,
            machine_hash_rate: 14.5,
            machine_power_kw: 1.35,
            n_machines: 10,
            strategy: Strategy::LongBtc,
            elec_cost,
            own_hash_rate: 145.0,
            revenue: 1.0,
            expense: 10.0,
            btc_balance: value / 100.0,
            currency_balance: 0.0,
            total_position_value: value,
        }
    }

    #[test]
    fn trial_band_spread() {
        let s = Stats::over_trials([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.n, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.std_dev - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        let half = 1.96 * s.std_dev / 2.0;
        assert!((s.ci_upper - s.mean - half).abs() < 1e-12);
        assert!((s.mean - s.ci_lower - half).abs() < 1e-12);
        assert!(s.spans(1.0) && s.spans(4.0) && !s.spans(4.5));
    }

    #[test]
    fn trial_band_degenerate_inputs() {
        assert_eq!(Stats::over_trials(std::iter::empty()), Stats::default());
        assert!(!Stats::default().spans(0.0));

        let single: Stats = std::iter::once(7.5).collect();
        assert_eq!((single.mean, single.std_dev, single.n), (7.5, 0.0, 1));
        assert_eq!((single.ci_lower, single.ci_upper), (7.5, 7.5));
    }

    #[test]
    fn trial_band_stable_for_large_offsets() {
        // Tiny spread on a large position value
        let s = Stats::over_trials([1e9 + 4.0, 1e9 + 7.0, 1e9 + 13.0, 1e9 + 16.0]);
        assert!((s.mean - (1e9 + 10.0)).abs() < 1e-6);
        assert!((s.std_dev - 30.0f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn average_series_pointwise() {
        let a = [100.0, 110.0];
        let b = [100.0, 90.0];
        let avg = average_series([&a[..], &b[..]]).unwrap();
        assert_eq!(avg, vec![100.0, 100.0]);
    }

    #[test]
    fn average_series_needs_input() {
        assert!(matches!(average_series(std::iter::empty()), Err(SimError::NoTrials)));
        let a = [1.0, 2.0];
        let b = [1.0];
        assert!(average_series([&a[..], &b[..]]).is_err());
    }

    #[test]
    fn positions_grouped_by_identity() {
        let rows = vec![
            row(1, 0.04, 10.0),
            row(1, 0.04, 30.0),
            row(0, 0.04, 0.0),
            row(1, 0.07, 5.0),
        ];
        let avg = average_positions(&rows);
        assert_eq!(avg.len(), 3);
        assert_eq!(avg[0].mean.day, 0);
        let pooled = avg.iter().find(|r| r.mean.day == 1 && r.mean.elec_cost == 0.04).unwrap();
        assert_eq!(pooled.trials, 2);
        assert_eq!(pooled.mean.total_position_value, 20.0);
        assert_eq!(pooled.mean.price, 120.0);
        assert_eq!(pooled.position_band.min, 10.0);
        assert_eq!(pooled.position_band.max, 30.0);
    }

    #[test]
    fn averaged_row_serializes_flat() {
        let avg = average_positions(&[row(2, 0.05, 1.0)]);
        let v: serde_json::Value = serde_json::to_value(&avg[0]).unwrap();
        assert_eq!(v["day"], 2);
        assert_eq!(v["strategy"], "Long BTC");
        assert_eq!(v["trials"], 1);
        assert!(v["position_band"]["mean"].is_number());
    }
}
