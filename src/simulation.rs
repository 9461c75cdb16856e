// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Simulation Core

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Calibration;
use crate::error::{Result, SimError};
use crate::generators::{generate_block_rewards, generate_prices};
use crate::miner::MinerAgent;
use crate::population::Population;
use crate::report::{average_positions, average_series, AveragedPositionRow, PositionRow};
use crate::types::CohortGroup;

// ─── Seeding ─────────────────────────────────────────────────────────────────

/// ChaCha stream reserved for the parent's paths. Peers draw from stream 0.
pub const PARENT_STREAM: u64 = 1;

/// Generator for a parent simulator whose peers will use `base_seed`.
///
/// Peer `i` is seeded `base_seed + i` on the default stream, so a parent on
/// [`PARENT_STREAM`] never replays any peer's price or reward path.
pub fn parent_rng(base_seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(PARENT_STREAM);
    rng
}

// ─── Simulator struct ────────────────────────────────────────────────────────

/// Day-stepped driver over one agent population and one pair of exogenous paths.
///
/// Agents are stored contiguously as environment, then user sell-daily, then
/// user long-BTC cohorts. Index 0 of every series is the starting state.
#[derive(Debug, Clone)]
pub struct Simulator {
    agents: Vec<MinerAgent>,
    environment: Range<usize>,
    user_sell_daily: Range<usize>,
    user_long_btc: Range<usize>,

    prices: Vec<f64>,
    /// Network reward per day, BTC.
    block_rewards: Vec<f64>,
    global_hash_rate: Vec<f64>,

    // Retained so peers draw fresh paths from the same process
    calibration: Calibration,
    peers: Vec<Simulator>,
}

impl Simulator {
    pub fn new(
        population: Population,
        prices: Vec<f64>,
        block_rewards: Vec<f64>,
        calibration: Calibration,
    ) -> Result<Self> {
        if prices.is_empty() || block_rewards.is_empty() {
            return Err(SimError::EmptySeries);
        }
        if prices.len() != block_rewards.len() {
            return Err(SimError::SeriesLengthMismatch {
                prices: prices.len(),
                rewards: block_rewards.len(),
                hash_rates: 1,
            });
        }

        let Population { environment, user_sell_daily, user_long_btc } = population;
        let env_end = environment.len();
        let sell_end = env_end + user_sell_daily.len();
        let long_end = sell_end + user_long_btc.len();

        let mut agents = environment;
        agents.extend(user_sell_daily);
        agents.extend(user_long_btc);
        let seed_hash_rate: f64 = agents.iter().map(MinerAgent::hash_rate).sum();

        Ok(Self {
            agents,
            environment: 0..env_end,
            user_sell_daily: env_end..sell_end,
            user_long_btc: sell_end..long_end,
            prices,
            block_rewards,
            global_hash_rate: vec![seed_hash_rate],
            calibration,
            peers: Vec::new(),
        })
    }

    /// Draw `n_days` of price and reward paths from `calibration` and wrap them
    /// around `population`.
    pub fn generate<R: Rng + ?Sized>(
        population: Population,
        calibration: Calibration,
        n_days: usize,
        rng: &mut R,
    ) -> Result<Self> {
        calibration.validate()?;
        let prices = generate_prices(&calibration.price, n_days, rng);
        let block_rewards =
            generate_block_rewards(&calibration.fee, calibration.block_subsidy, n_days, rng)?;
        Self::new(population, prices, block_rewards, calibration)
    }

    // ─── Stepping ───────────────────────────────────────────────────────────

    /// Days simulated so far.
    pub fn days_elapsed(&self) -> usize {
        self.global_hash_rate.len() - 1
    }

    /// Days left on the exogenous paths.
    pub fn days_remaining(&self) -> usize {
        self.prices.len() - self.global_hash_rate.len()
    }

    /// Advance every agent by one day against the previous day's aggregate
    /// hash rate. Returns the new aggregate, or `None` once the paths are
    /// exhausted.
    pub fn step_day(&mut self) -> Result<Option<f64>> {
        let day = self.global_hash_rate.len();
        if day >= self.prices.len() {
            return Ok(None);
        }
        let price = self.prices[day];
        let reward = self.block_rewards[day];
        let prior = self.global_hash_rate[day - 1];

        // Agents are independent within a day; the join is the day barrier
        self.agents
            .par_iter_mut()
            .try_for_each(|agent| agent.advance(price, reward, prior).map(|_| ()))?;

        // Sequential sum keeps the aggregate bit-identical across thread counts
        let aggregate: f64 = self.agents.iter().map(MinerAgent::hash_rate).sum();
        self.global_hash_rate.push(aggregate);
        debug!(day, price, reward, aggregate, "day complete");
        Ok(Some(aggregate))
    }

    /// Run to the end of the paths.
    pub fn run(&mut self) -> Result<()> {
        while self.step_day()?.is_some() {}
        Ok(())
    }

    /// Run `n_trials` independent peers, each a deep copy of the starting
    /// population on freshly drawn paths of the same length. Peer `i` draws
    /// from `ChaCha8Rng::seed_from_u64(base_seed + i)`; build the parent from
    /// [`parent_rng`] to keep it off those paths.
    pub fn run_trials(&mut self, n_trials: usize, base_seed: u64) -> Result<&[Simulator]> {
        let days = self.days_elapsed();
        if days > 0 {
            return Err(SimError::AlreadyStepped { days });
        }
        let n_days = self.prices.len() - 1;
        info!(trials = n_trials, n_days, base_seed, agents = self.agents.len(), "spawning peer trials");

        let population = self.population();
        let calibration = &self.calibration;
        let peers = (0..n_trials as u64)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i));
                let mut peer = Simulator::generate(population.clone(), calibration.clone(), n_days, &mut rng)?;
                peer.run()?;
                Ok(peer)
            })
            .collect::<Result<Vec<_>>>()?;

        self.peers = peers;
        info!(trials = self.peers.len(), "peer trials complete");
        Ok(&self.peers)
    }

    /// Current agents, split back into their partitions.
    pub fn population(&self) -> Population {
        Population {
            environment: self.agents[self.environment.clone()].to_vec(),
            user_sell_daily: self.agents[self.user_sell_daily.clone()].to_vec(),
            user_long_btc: self.agents[self.user_long_btc.clone()].to_vec(),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn agents(&self) -> &[MinerAgent] {
        &self.agents
    }

    pub fn cohort(&self, group: CohortGroup) -> &[MinerAgent] {
        let range = match group {
            CohortGroup::Environment => &self.environment,
            CohortGroup::UserSellDaily => &self.user_sell_daily,
            CohortGroup::UserLongBtc => &self.user_long_btc,
        };
        &self.agents[range.clone()]
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn block_rewards(&self) -> &[f64] {
        &self.block_rewards
    }

    pub fn global_hash_rate(&self) -> &[f64] {
        &self.global_hash_rate
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn peers(&self) -> &[Simulator] {
        &self.peers
    }

    // ─── Reporting ──────────────────────────────────────────────────────────

    /// Join each cohort's cumulative ledger in `group` with the day series.
    ///
    /// Machine count and the figures derived from it reflect the cohort's
    /// current size, so this is exact for the fixed user fleets.
    pub fn positions(&self, group: CohortGroup) -> Vec<PositionRow> {
        let mut rows = Vec::new();
        for agent in self.cohort(group) {
            let spec = agent.spec();
            let n_machines = agent.n_machines();
            let own_hash_rate = agent.hash_rate();
            let expense = agent.daily_expense();
            let days = agent
                .positions()
                .into_iter()
                .zip(&self.prices)
                .zip(&self.global_hash_rate)
                .zip(&self.block_rewards)
                .enumerate();
            for (day, (((balance, &price), &global_hash_rate), &global_reward)) in days {
                let revenue = if global_hash_rate > 0.0 {
                    global_reward * own_hash_rate / global_hash_rate
                } else {
                    0.0
                };
                rows.push(PositionRow {
                    day,
                    price,
                    global_hash_rate,
                    global_reward,
                    machine_model: spec.model,
                    machine_hash_rate: spec.hash_rate,
                    machine_power_kw: spec.power_kw(),
                    n_machines,
                    strategy: agent.strategy(),
                    elec_cost: agent.elec_price(),
                    own_hash_rate,
                    revenue,
                    expense,
                    btc_balance: balance.btc,
                    currency_balance: balance.currency,
                    total_position_value: balance.value_at(price),
                });
            }
        }
        rows
    }

    /// Long-BTC user rows followed by sell-daily user rows.
    pub fn user_positions(&self) -> Vec<PositionRow> {
        let mut rows = self.positions(CohortGroup::UserLongBtc);
        rows.extend(self.positions(CohortGroup::UserSellDaily));
        rows
    }

    // ─── Ensemble aggregation ───────────────────────────────────────────────

    pub fn avg_prices(&self) -> Result<Vec<f64>> {
        average_series(self.peers.iter().map(|p| p.prices.as_slice()))
    }

    pub fn avg_global_hash_rate(&self) -> Result<Vec<f64>> {
        average_series(self.peers.iter().map(|p| p.global_hash_rate.as_slice()))
    }

    /// User position rows of every peer, averaged per cohort-day.
    pub fn avg_user_positions(&self) -> Result<Vec<AveragedPositionRow>> {
        if self.peers.is_empty() {
            return Err(SimError::NoTrials);
        }
        let rows: Vec<PositionRow> = self.peers.iter().flat_map(Simulator::user_positions).collect();
        Ok(average_positions(&rows))
    }
}
