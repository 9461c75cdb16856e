// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite ("The Arena")

//! Agent-based Monte Carlo simulation of mining economics.
//!
//! A population of miner cohorts earns its hash-rate share of the daily
//! network reward, pays for electricity, and grows or shrinks from trailing
//! profit, under stochastic price and block-reward paths.

pub mod types;
pub mod error;
pub mod catalog;
pub mod generators;
pub mod ledger;
pub mod miner;
pub mod config;
pub mod population;
pub mod report;
pub mod simulation;

pub use catalog::{MachineCatalog, MachineSpec, MarketReference};
pub use config::{Calibration, CalibrationHistory, PopulationConfig, RunConfig, SimConfig, UserConfig};
pub use error::{Result, SimError};
pub use generators::{FeeParams, PriceParams};
pub use ledger::PositionLedger;
pub use miner::{DayOutcome, MinerAgent, ScalingAction};
pub use population::{Population, PopulationBuilder, UserCohorts};
pub use report::{AveragedPositionRow, PositionRow, Stats};
pub use simulation::{parent_rng, Simulator};
pub use types::*;
