// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Machine Catalog

//! Static machine specifications.
//!
//! The catalog is built once per run and never mutated afterwards; agents and
//! peer trials share its entries through [`Arc`] without locking.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::MachineModel;

const HOURS_PER_DAY: f64 = 24.0;

// ---------------------------------------------------------------------------
// MarketReference
// ---------------------------------------------------------------------------

/// Coin price and network hash rate at which catalog capital prices were quoted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarketReference {
    pub price: f64,
    pub hash_rate: f64,
}

// ---------------------------------------------------------------------------
// MachineSpec
// ---------------------------------------------------------------------------

/// Specification of a single mining machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineSpec {
    pub model: MachineModel,
    /// Hash rate per machine, TH/s.
    pub hash_rate: f64,
    /// Power draw per machine, watts.
    pub power_watts: f64,
    /// Capital price of one machine at the market reference point.
    pub capital_price: f64,
    /// Responsiveness of capacity growth to trailing profit.
    pub growth_factor: f64,
    /// Days between ordering a machine and it coming online.
    pub setup_days: u64,
}

impl MachineSpec {
    pub fn power_kw(&self) -> f64 {
        self.power_watts / 1_000.0
    }

    /// Electricity cost of running one machine for a day.
    pub fn daily_energy_cost(&self, elec_price: f64) -> f64 {
        self.power_kw() * elec_price * HOURS_PER_DAY
    }

    /// Capital price of one machine today.
    ///
    /// Scales with coin price and inversely with network hash-rate growth,
    /// relative to the reference point the catalog price was quoted at.
    pub fn implied_price(&self, price: f64, global_hash_rate: f64, reference: &MarketReference) -> f64 {
        self.capital_price * (price * reference.hash_rate) / (reference.price * global_hash_rate)
    }
}

// ---------------------------------------------------------------------------
// MachineCatalog
// ---------------------------------------------------------------------------

/// Immutable lookup table of machine specifications keyed by model.
#[derive(Debug, Clone)]
pub struct MachineCatalog {
    specs: BTreeMap<MachineModel, Arc<MachineSpec>>,
}

impl MachineCatalog {
    pub fn new(specs: impl IntoIterator<Item = MachineSpec>) -> Self {
        Self {
            specs: specs
                .into_iter()
                .map(|s| (s.model, Arc::new(s)))
                .collect(),
        }
    }

    /// Fetch a spec. Missing models are a configuration error, never defaulted.
    pub fn lookup(&self, model: MachineModel) -> Result<Arc<MachineSpec>> {
        self.specs
            .get(&model)
            .cloned()
            .ok_or_else(|| SimError::UnknownMachine(model.label().to_string()))
    }

    pub fn lookup_label(&self, label: &str) -> Result<Arc<MachineSpec>> {
        self.lookup(MachineModel::from_label(label)?)
    }

    pub fn models(&self) -> impl Iterator<Item = MachineModel> + '_ {
        self.specs.keys().copied()
    }

    pub fn contains(&self, model: MachineModel) -> bool {
        self.specs.contains_key(&model)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn spec(
    model: MachineModel,
    hash_rate: f64,
    power_watts: f64,
    capital_price: f64,
    growth_factor: f64,
    setup_days: u64,
) -> MachineSpec {
    MachineSpec { model, hash_rate, power_watts, capital_price, growth_factor, setup_days }
}

impl Default for MachineCatalog {
    fn default() -> Self {
        use MachineModel::*;
        Self::new([
            spec(AntminerS9, 14.5, 1350.0, 566.50, 0.2, 14),
            spec(AntminerS17, 56.0, 2520.0, 4_394.88, 0.4, 14),
            spec(AntminerT17, 40.0, 2200.0, 2_394.07, 0.4, 14),
            spec(AntminerS19, 95.0, 3250.0, 6_019.00, 1.0, 48),
            spec(AntminerT19, 84.0, 3150.0, 4_922.00, 0.8, 48),
            spec(AntminerS19Pro, 110.0, 3250.0, 7_388.00, 1.0, 48),
            spec(MicroBtM20s, 68.0, 3360.0, 5_674.27, 0.5, 21),
            spec(MicroBtM21s, 56.0, 3360.0, 4_231.81, 0.5, 21),
            spec(MicroBtM30s, 86.0, 3268.0, 9_989.33, 0.8, 36),
            spec(MicroBtM31s, 70.0, 3220.0, 8_385.29, 0.8, 36),
            spec(InnosiliconT2T, 24.0, 1980.0, 1_394.50, 0.4, 14),
        ])
    }
}
