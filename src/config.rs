// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Run Configuration

//! Run configuration: calibration outputs, population tables, user cohorts.
//!
//! Every section has a `Default` carrying the reference tables, so a JSON file
//! only needs to override what differs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{MachineCatalog, MarketReference};
use crate::error::{Result, SimError};
use crate::generators::{FeeParams, PriceParams};
use crate::miner::DEFAULT_LAG_DAYS;
use crate::types::{MachineModel, Strategy};

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Observed daily network revenue (currency) and hash rate used to seed each
/// cohort's profit history. Empty history means cohorts start cold.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CalibrationHistory {
    #[serde(default)]
    pub miner_revenue: Vec<f64>,
    #[serde(default)]
    pub hash_rate: Vec<f64>,
}

/// Outputs of the external calibration step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Calibration {
    pub price: PriceParams,
    pub fee: FeeParams,
    /// BTC per block.
    pub block_subsidy: f64,
    /// Starting network hash rate, TH/s.
    pub target_hash_rate: f64,
    pub history: CalibrationHistory,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            price: PriceParams {
                reference_price: 35_000.0,
                daily_drift: 0.002,
                daily_log_std: 0.035,
            },
            fee: FeeParams { mean: -1.6, std_dev: 0.35 },
            block_subsidy: 6.25,
            target_hash_rate: 150_000_000.0,
            history: CalibrationHistory::default(),
        }
    }
}

impl Calibration {
    /// Reference point machine capital prices are quoted against.
    pub fn market_reference(&self) -> MarketReference {
        MarketReference {
            price: self.price.reference_price,
            hash_rate: self.target_hash_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.price.validate()?;
        self.fee.validate()?;
        if !(self.block_subsidy.is_finite() && self.block_subsidy >= 0.0) {
            return Err(SimError::InvalidParameter { name: "block_subsidy", value: self.block_subsidy });
        }
        if !(self.target_hash_rate.is_finite() && self.target_hash_rate > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "target_hash_rate",
                value: self.target_hash_rate,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// Share of machines running at a given electricity price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElecTier {
    /// Currency per kWh.
    pub cost: f64,
    pub proportion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub lag: usize,
    /// Unscaled machine counts per model; only ratios matter after rescaling.
    pub machine_counts: BTreeMap<MachineModel, f64>,
    pub elec_cost_tiers: Vec<ElecTier>,
    pub strategy_props: BTreeMap<Strategy, f64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        use MachineModel::*;
        let machine_counts = [
            (AntminerS9, 3_000_000.0),
            (AntminerS17, 300_000.0),
            (AntminerT17, 350_000.0),
            (AntminerS19, 80_000.0),
            (AntminerT19, 50_000.0),
            (AntminerS19Pro, 80_000.0),
            (MicroBtM20s, 400_000.0),
            (MicroBtM21s, 250_000.0),
            (MicroBtM30s, 120_000.0),
            (MicroBtM31s, 120_000.0),
            (InnosiliconT2T, 275_000.0),
        ]
        .into_iter()
        .collect();

        let elec_cost_tiers = [
            (0.02, 0.05),
            (0.03, 0.10),
            (0.04, 0.20),
            (0.05, 0.35),
            (0.06, 0.20),
            (0.07, 0.05),
            (0.08, 0.05),
        ]
        .into_iter()
        .map(|(cost, proportion)| ElecTier { cost, proportion })
        .collect();

        let strategy_props = [(Strategy::SellDaily, 0.5), (Strategy::LongBtc, 0.5)]
            .into_iter()
            .collect();

        Self {
            lag: DEFAULT_LAG_DAYS,
            machine_counts,
            elec_cost_tiers,
            strategy_props,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self, catalog: &MachineCatalog) -> Result<()> {
        if self.lag == 0 {
            return Err(SimError::InvalidParameter { name: "lag", value: 0.0 });
        }
        for (model, count) in &self.machine_counts {
            catalog.lookup(*model)?;
            if !(count.is_finite() && *count >= 0.0) {
                return Err(SimError::InvalidParameter { name: "machine_count", value: *count });
            }
        }
        for tier in &self.elec_cost_tiers {
            if !(tier.proportion.is_finite() && tier.proportion >= 0.0) {
                return Err(SimError::InvalidParameter { name: "elec_proportion", value: tier.proportion });
            }
            if !(tier.cost.is_finite() && tier.cost >= 0.0) {
                return Err(SimError::InvalidParameter { name: "elec_cost", value: tier.cost });
            }
        }
        for strategy in Strategy::ALL {
            match self.strategy_props.get(&strategy) {
                Some(p) if p.is_finite() && *p >= 0.0 => {}
                Some(p) => return Err(SimError::InvalidParameter { name: "strategy_proportion", value: *p }),
                None => {
                    return Err(SimError::MissingProportion {
                        table: "strategy",
                        key: strategy.label().to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// User cohorts
// ---------------------------------------------------------------------------

/// Fixed fleets bought with a budget, tracked for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    pub budget: f64,
    pub elec_costs: Vec<f64>,
    pub machines: Vec<MachineModel>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            budget: 1_000_000.0,
            elec_costs: vec![0.04, 0.07],
            machines: MachineModel::ALL.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub n_days: usize,
    pub n_trials: usize,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { n_days: 100, n_trials: 25, seed: 1_032_009 }
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub calibration: Calibration,
    pub population: PopulationConfig,
    pub user: UserConfig,
    pub run: RunConfig,
}

impl SimConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self, catalog: &MachineCatalog) -> Result<()> {
        self.calibration.validate()?;
        self.population.validate(catalog)?;
        for model in &self.user.machines {
            catalog.lookup(*model)?;
        }
        if !(self.user.budget.is_finite() && self.user.budget >= 0.0) {
            return Err(SimError::InvalidParameter { name: "budget", value: self.user.budget });
        }
        Ok(())
    }
}
