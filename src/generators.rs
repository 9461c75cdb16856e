// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Stochastic Path Generators

//! Exogenous day-indexed price and block-reward paths.
//!
//! Both generators are pure functions of their parameters and the supplied
//! RNG. Each peer trial passes its own seeded RNG, so paths never correlate
//! through shared state.

use rand::Rng;
use rand_distr::{Distribution, LogNormal, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// 6 blocks/hour × 24 hours.
pub const BLOCKS_PER_DAY: f64 = 144.0;

// ─── Parameters ──────────────────────────────────────────────────────────────

/// Price-process calibration. Drift and volatility are per-day, estimated in
/// log space but applied multiplicatively in level space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceParams {
    pub reference_price: f64,
    pub daily_drift: f64,
    pub daily_log_std: f64,
}

impl PriceParams {
    /// Same start and volatility, drift forced negative.
    pub fn bearish(&self) -> Self {
        Self { daily_drift: -self.daily_drift.abs(), ..*self }
    }

    /// Flat drift with volatility scaled by `vol_multiplier`.
    pub fn with_corrections(&self, vol_multiplier: f64) -> Self {
        Self {
            daily_drift: 0.0,
            daily_log_std: self.daily_log_std * vol_multiplier,
            ..*self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.reference_price.is_finite() && self.reference_price > 0.0) {
            return Err(SimError::InvalidParameter { name: "reference_price", value: self.reference_price });
        }
        if !self.daily_drift.is_finite() {
            return Err(SimError::InvalidParameter { name: "daily_drift", value: self.daily_drift });
        }
        if !(self.daily_log_std.is_finite() && self.daily_log_std >= 0.0) {
            return Err(SimError::InvalidParameter { name: "daily_log_std", value: self.daily_log_std });
        }
        Ok(())
    }
}

/// Per-block fee calibration: mean and std-dev of the underlying normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeeParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl FeeParams {
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(SimError::InvalidParameter { name: "fee_mean", value: self.mean });
        }
        if !(self.std_dev.is_finite() && self.std_dev >= 0.0) {
            return Err(SimError::InvalidParameter { name: "fee_std_dev", value: self.std_dev });
        }
        Ok(())
    }
}

// ─── Generators ──────────────────────────────────────────────────────────────

/// Geometric price path of `n_days + 1` values starting at the reference price.
///
/// `p[i] = p[i-1] * (1 + drift + volatility * Z)`, `Z ~ N(0, 1)`.
pub fn generate_prices<R: Rng + ?Sized>(params: &PriceParams, n_days: usize, rng: &mut R) -> Vec<f64> {
    let mut prices = Vec::with_capacity(n_days + 1);
    let mut price = params.reference_price;
    prices.push(price);
    for day in 1..=n_days {
        let z: f64 = StandardNormal.sample(rng);
        price *= 1.0 + params.daily_drift + params.daily_log_std * z;
        if price <= 0.0 {
            tracing::warn!(day, price, "price path went non-positive");
        }
        prices.push(price);
    }
    prices
}

/// Daily network block reward (BTC) for `n_days + 1` days.
///
/// Each day draws a log-normal per-block fee, adds the subsidy and scales by
/// [`BLOCKS_PER_DAY`].
pub fn generate_block_rewards<R: Rng + ?Sized>(
    fee: &FeeParams,
    block_subsidy: f64,
    n_days: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    fee.validate()?;
    let dist = LogNormal::new(fee.mean, fee.std_dev)
        .map_err(|e| SimError::InvalidDistribution(e.to_string()))?;
    Ok((0..=n_days)
        .map(|_| (block_subsidy + dist.sample(rng)) * BLOCKS_PER_DAY)
        .collect())
}
