// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Population Builder

use std::sync::Arc;

use crate::catalog::{MachineCatalog, MachineSpec, MarketReference};
use crate::config::{CalibrationHistory, PopulationConfig, SimConfig, UserConfig};
use crate::error::{Result, SimError};
use crate::miner::{MinerAgent, DEFAULT_LAG_DAYS};
use crate::types::Strategy;

// ─── Population ──────────────────────────────────────────────────────────────

/// The agent set a simulator starts from, already split into its partitions.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub environment: Vec<MinerAgent>,
    pub user_sell_daily: Vec<MinerAgent>,
    pub user_long_btc: Vec<MinerAgent>,
}

impl Population {
    /// Environment sized to the calibrated hash rate plus budget-bought user fleets.
    pub fn from_config(config: &SimConfig, catalog: &MachineCatalog) -> Result<Self> {
        config.validate(catalog)?;
        let reference = config.calibration.market_reference();
        let environment = PopulationBuilder::new(catalog, &config.population, reference)
            .with_history(&config.calibration.history)
            .build(config.calibration.target_hash_rate)?;
        let users = UserCohorts::from_budget(&config.user, catalog, config.population.lag, reference)?;
        Ok(Self {
            environment,
            user_sell_daily: users.sell_daily,
            user_long_btc: users.long_btc,
        })
    }

    pub fn hash_rate(&self) -> f64 {
        self.environment
            .iter()
            .chain(&self.user_sell_daily)
            .chain(&self.user_long_btc)
            .map(MinerAgent::hash_rate)
            .sum()
    }
}

// ─── Environment cohorts ─────────────────────────────────────────────────────

struct UnscaledCohort {
    spec: Arc<MachineSpec>,
    strategy: Strategy,
    elec_price: f64,
    machines: f64,
}

/// Builds the machine × strategy × electricity-tier cross product of
/// scalable cohorts, sized so the population matches a target hash rate.
pub struct PopulationBuilder<'a> {
    catalog: &'a MachineCatalog,
    config: &'a PopulationConfig,
    reference: MarketReference,
    history: Option<&'a CalibrationHistory>,
}

impl<'a> PopulationBuilder<'a> {
    pub fn new(catalog: &'a MachineCatalog, config: &'a PopulationConfig, reference: MarketReference) -> Self {
        Self { catalog, config, reference, history: None }
    }

    pub fn with_history(mut self, history: &'a CalibrationHistory) -> Self {
        self.history = Some(history);
        self
    }

    fn unscaled(&self) -> Result<Vec<UnscaledCohort>> {
        let mut cohorts = Vec::new();
        for (model, total) in &self.config.machine_counts {
            let spec = self.catalog.lookup(*model)?;
            for strategy in Strategy::ALL {
                let strategy_share = *self.config.strategy_props.get(&strategy).ok_or_else(|| {
                    SimError::MissingProportion {
                        table: "strategy",
                        key: strategy.label().to_string(),
                    }
                })?;
                for tier in &self.config.elec_cost_tiers {
                    cohorts.push(UnscaledCohort {
                        spec: Arc::clone(&spec),
                        strategy,
                        elec_price: tier.cost,
                        machines: total * tier.proportion * strategy_share,
                    });
                }
            }
        }
        Ok(cohorts)
    }

    /// Build the environment so its aggregate hash rate equals `target_hash_rate`
    /// (to within whole-machine rounding per cohort).
    pub fn build(&self, target_hash_rate: f64) -> Result<Vec<MinerAgent>> {
        let cohorts = self.unscaled()?;
        let aggregate: f64 = cohorts.iter().map(|c| c.spec.hash_rate * c.machines).sum();
        if !(aggregate.is_finite() && aggregate > 0.0) {
            tracing::warn!(cohorts = cohorts.len(), aggregate, target_hash_rate, "population cannot be rescaled");
            return Err(SimError::ZeroAggregateHashRate);
        }
        let scalar = target_hash_rate / aggregate;
        if !(scalar.is_finite() && scalar > 0.0) {
            tracing::warn!(aggregate, target_hash_rate, scalar, "rescale factor is not finite and positive");
            return Err(SimError::InvalidParameter { name: "target_hash_rate", value: target_hash_rate });
        }
        tracing::debug!(cohorts = cohorts.len(), aggregate, target_hash_rate, scalar, "rescaling environment");

        Ok(cohorts
            .into_iter()
            .map(|c| {
                let n = (c.machines * scalar).round() as u64;
                let agent = MinerAgent::new(c.spec, c.strategy, c.elec_price, n, self.reference)
                    .with_lag(self.config.lag);
                match self.history {
                    Some(h) => agent.seeded_from(h),
                    None => agent,
                }
            })
            .collect())
    }
}

// ─── User cohorts ────────────────────────────────────────────────────────────

/// Fixed, non-scalable fleets whose positions are reported.
#[derive(Debug, Clone, Default)]
pub struct UserCohorts {
    pub sell_daily: Vec<MinerAgent>,
    pub long_btc: Vec<MinerAgent>,
}

impl UserCohorts {
    /// One fleet per (electricity cost, machine) for each strategy, each buying
    /// as many whole machines as the budget covers at catalog price.
    pub fn from_budget(
        config: &UserConfig,
        catalog: &MachineCatalog,
        lag: usize,
        reference: MarketReference,
    ) -> Result<Self> {
        let mut cohorts = Self::default();
        for &elec_price in &config.elec_costs {
            for model in &config.machines {
                let spec = catalog.lookup(*model)?;
                let n = (config.budget / spec.capital_price).floor() as u64;
                cohorts.push(Self::fleet(&spec, Strategy::LongBtc, elec_price, n, lag, reference));
                cohorts.push(Self::fleet(&spec, Strategy::SellDaily, elec_price, n, lag, reference));
            }
        }
        Ok(cohorts)
    }

    /// The same fleet under both strategies.
    pub fn single(spec: Arc<MachineSpec>, elec_price: f64, n_machines: u64, reference: MarketReference) -> Self {
        let mut cohorts = Self::default();
        for strategy in Strategy::ALL {
            cohorts.push(Self::fleet(&spec, strategy, elec_price, n_machines, DEFAULT_LAG_DAYS, reference));
        }
        cohorts
    }

    fn fleet(
        spec: &Arc<MachineSpec>,
        strategy: Strategy,
        elec_price: f64,
        n_machines: u64,
        lag: usize,
        reference: MarketReference,
    ) -> MinerAgent {
        MinerAgent::new(Arc::clone(spec), strategy, elec_price, n_machines, reference)
            .with_lag(lag)
            .unscalable()
    }

    fn push(&mut self, agent: MinerAgent) {
        match agent.strategy() {
            Strategy::SellDaily => self.sell_daily.push(agent),
            Strategy::LongBtc => self.long_btc.push(agent),
        }
    }
}
