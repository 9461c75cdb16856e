// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Miner Agent

//! A cohort of identical machines: same model, strategy and electricity price.
//!
//! Each simulated day the cohort collects its hash-rate share of the network
//! reward, pays for electricity, and (if scalable) resizes itself from its
//! trailing profit. Growth orders land `setup_days` after they are placed.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{MachineSpec, MarketReference};
use crate::config::CalibrationHistory;
use crate::error::{Result, SimError};
use crate::ledger::PositionLedger;
use crate::types::{MachineModel, PositionDelta, Strategy};

pub const DEFAULT_LAG_DAYS: usize = 30;

// ─── Day outcome ─────────────────────────────────────────────────────────────

/// Capacity decision taken during one `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingAction {
    Hold,
    /// Machines switched off immediately.
    ScaleDown { removed: u64 },
    /// Machines ordered, online on `arrival_day`.
    Order { machines: u64, arrival_day: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOutcome {
    pub day: u64,
    /// Machines that came online at the start of the day.
    pub arrived: u64,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub scaling: ScalingAction,
    pub delta: PositionDelta,
}

// ─── MinerAgent ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MinerAgent {
    spec: Arc<MachineSpec>,
    strategy: Strategy,
    elec_price: f64,
    n_machines: u64,
    lag: usize,
    reference: MarketReference,
    scalable: bool,

    profit_history: Vec<f64>,
    /// arrival day -> machines landing that day
    pending: BTreeMap<u64, u64>,
    pending_count: u64,
    ledger: PositionLedger,
    day: u64,
}

impl MinerAgent {
    pub fn new(
        spec: Arc<MachineSpec>,
        strategy: Strategy,
        elec_price: f64,
        n_machines: u64,
        reference: MarketReference,
    ) -> Self {
        Self {
            spec,
            strategy,
            elec_price,
            n_machines,
            lag: DEFAULT_LAG_DAYS,
            reference,
            scalable: true,
            profit_history: Vec::new(),
            pending: BTreeMap::new(),
            pending_count: 0,
            ledger: PositionLedger::new(),
            day: 0,
        }
    }

    pub fn with_lag(mut self, lag: usize) -> Self {
        self.lag = lag;
        self
    }

    /// User cohorts hold a fixed fleet and never resize.
    pub fn unscalable(mut self) -> Self {
        self.scalable = false;
        self
    }

    pub fn with_profit_history(mut self, history: Vec<f64>) -> Self {
        self.profit_history = history;
        self
    }

    /// Seed profit history from observed network revenue and hash rate,
    /// as if the current fleet had been running over the history window.
    pub fn seeded_from(mut self, history: &CalibrationHistory) -> Self {
        let own = self.hash_rate();
        let expense = self.daily_expense();
        self.profit_history = history
            .miner_revenue
            .iter()
            .zip(&history.hash_rate)
            .filter(|(_, hr)| **hr > 0.0)
            .map(|(rev, hr)| rev * own / hr - expense)
            .collect();
        self
    }

    // -- Accessors ----------------------------------------------------------

    pub fn spec(&self) -> &MachineSpec {
        &self.spec
    }

    pub fn model(&self) -> MachineModel {
        self.spec.model
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn elec_price(&self) -> f64 {
        self.elec_price
    }

    pub fn n_machines(&self) -> u64 {
        self.n_machines
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    pub fn is_scalable(&self) -> bool {
        self.scalable
    }

    pub fn reference(&self) -> &MarketReference {
        &self.reference
    }

    /// Days advanced so far.
    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn profit_history(&self) -> &[f64] {
        &self.profit_history
    }

    pub fn pending(&self) -> &BTreeMap<u64, u64> {
        &self.pending
    }

    pub fn pending_count(&self) -> u64 {
        self.pending_count
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    /// Cumulative (BTC, currency) balance after each day.
    pub fn positions(&self) -> Vec<PositionDelta> {
        self.ledger.cumulative()
    }

    /// Aggregate cohort hash rate, TH/s.
    pub fn hash_rate(&self) -> f64 {
        self.spec.hash_rate * self.n_machines as f64
    }

    pub fn daily_expense(&self) -> f64 {
        self.spec.daily_energy_cost(self.elec_price) * self.n_machines as f64
    }

    // -- Daily update -------------------------------------------------------

    /// Advance the cohort by one day.
    ///
    /// `daily_network_reward` is the whole network's reward for the day in
    /// BTC; `prior_global_hash_rate` is the aggregate from the previous day,
    /// which is what today's reward share is allocated against.
    pub fn advance(
        &mut self,
        price: f64,
        daily_network_reward: f64,
        prior_global_hash_rate: f64,
    ) -> Result<DayOutcome> {
        if !(prior_global_hash_rate.is_finite() && prior_global_hash_rate > 0.0) {
            return Err(SimError::NonPositiveHashRate(prior_global_hash_rate));
        }
        let day = self.day;

        let arrived = self.receive_pending();

        let revenue = daily_network_reward * price * self.hash_rate() / prior_global_hash_rate;
        let expense = self.daily_expense();
        let profit = revenue - expense;
        self.profit_history.push(profit);

        let scaling = if self.scalable {
            self.rescale(price, prior_global_hash_rate, expense)
        } else {
            ScalingAction::Hold
        };

        let delta = self.strategy.position_change(profit, price);
        self.ledger.record(delta);
        self.day += 1;

        Ok(DayOutcome { day, arrived, revenue, expense, profit, scaling, delta })
    }

    /// Bring online everything due by today. Zero-delay orders are keyed to
    /// the day they were placed and land on the following day.
    fn receive_pending(&mut self) -> u64 {
        let later = self.pending.split_off(&(self.day + 1));
        let due = std::mem::replace(&mut self.pending, later);
        let arrived = due.values().fold(0u64, |acc, n| acc.saturating_add(*n));
        self.n_machines = self.n_machines.saturating_add(arrived);
        self.pending_count = self.pending_count.saturating_sub(arrived);
        arrived
    }

    fn trailing_profit(&self) -> Option<f64> {
        if self.lag == 0 || self.profit_history.len() < self.lag {
            return None;
        }
        Some(self.profit_history[self.profit_history.len() - self.lag..].iter().sum())
    }

    fn rescale(&mut self, price: f64, prior_global_hash_rate: f64, expense: f64) -> ScalingAction {
        let Some(trailing) = self.trailing_profit() else {
            return ScalingAction::Hold;
        };

        if trailing < 0.0 && self.n_machines > 0 {
            let per_machine = self.spec.daily_energy_cost(self.elec_price);
            if per_machine <= 0.0 {
                return ScalingAction::Hold;
            }
            // Float-to-int `as` saturates, so absurd losses clamp to the fleet size
            let removed = ((trailing.abs() / per_machine).floor() as u64).min(self.n_machines);
            self.n_machines -= removed;
            tracing::trace!(model = %self.spec.model, day = self.day, removed, "scale down");
            ScalingAction::ScaleDown { removed }
        } else if trailing > expense {
            let unit_price = self.spec.implied_price(price, prior_global_hash_rate, &self.reference);
            let raw = (self.spec.growth_factor * (trailing - expense) / unit_price).floor();
            if !raw.is_finite() {
                return ScalingAction::Hold;
            }
            let machines = (raw.abs() - self.pending_count as f64).max(0.0) as u64;
            if machines == 0 {
                return ScalingAction::Hold;
            }
            let arrival_day = self.day + self.spec.setup_days;
            let slot = self.pending.entry(arrival_day).or_insert(0);
            *slot = slot.saturating_add(machines);
            self.pending_count = self.pending_count.saturating_add(machines);
            tracing::trace!(model = %self.spec.model, day = self.day, machines, arrival_day, "order placed");
            ScalingAction::Order { machines, arrival_day }
        } else {
            ScalingAction::Hold
        }
    }
}
