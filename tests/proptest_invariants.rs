//! Property-based tests for cohort scaling and accounting.
//!
//! Every property drives a single agent through arbitrary market days,
//! including hostile profit histories and near-zero network hash rates.

use std::collections::BTreeMap;
use std::sync::Arc;

use hashpower_arena::{MachineModel, MachineSpec, MarketReference, MinerAgent, ScalingAction, Strategy as Mining};
use proptest::prelude::*;

fn spec(setup_days: u64, growth_factor: f64) -> Arc<MachineSpec> {
    Arc::new(MachineSpec {
        model: MachineModel::MicroBtM30s,
        hash_rate: 86.0,
        power_watts: 3_268.0,
        capital_price: 9_989.33,
        growth_factor,
        setup_days,
    })
}

fn strategy() -> impl Strategy<Value = Mining> {
    prop_oneof![
        Just(Mining::SellDaily),
        Just(Mining::LongBtc),
    ]
}

/// (price, daily network reward in BTC, prior aggregate hash rate)
fn market_day() -> impl Strategy<Value = (f64, f64, f64)> {
    (1e-3f64..1e6, 0.0f64..1e5, 1e-3f64..1e9)
}

fn agent(
    strategy: Mining,
    n_machines: u64,
    setup_days: u64,
    history: Vec<f64>,
) -> MinerAgent {
    MinerAgent::new(
        spec(setup_days, 0.8),
        strategy,
        0.05,
        n_machines,
        MarketReference { price: 30_000.0, hash_rate: 150_000_000.0 },
    )
    .with_lag(5)
    .with_profit_history(history)
}

// ============================================================================
// Capacity
// ============================================================================

proptest! {
    /// Property: no history can drive the fleet below zero or make it grow
    /// by more than what was ordered.
    #[test]
    fn prop_fleet_bounded_by_orders(
        n in 0u64..100_000,
        history in prop::collection::vec(-1e12f64..1e12, 0..10),
        days in prop::collection::vec(market_day(), 1..40),
        setup in 0u64..10,
        strategy in strategy(),
    ) {
        let mut a = agent(strategy, n, setup, history);
        // Counts saturate at u64::MAX under runaway growth; account in u128
        let mut ordered = 0u128;
        let mut removed = 0u128;
        for (price, reward, prior) in days {
            let out = a.advance(price, reward, prior).unwrap();
            match out.scaling {
                ScalingAction::Order { machines, .. } => ordered += machines as u128,
                ScalingAction::ScaleDown { removed: r } => removed += r as u128,
                ScalingAction::Hold => {}
            }
            prop_assert!(a.n_machines() as u128 + removed <= n as u128 + ordered);
        }
        if ordered < u64::MAX as u128 / 4 {
            let pending: u128 = a.pending().values().map(|v| *v as u128).sum();
            prop_assert_eq!(pending, a.pending_count() as u128);
            prop_assert_eq!(
                a.n_machines() as u128 + removed + a.pending_count() as u128,
                n as u128 + ordered
            );
        }
    }

    /// Property: every arrival on day d was ordered `setup` days earlier
    /// by this same agent.
    #[test]
    fn prop_arrivals_match_orders(
        days in prop::collection::vec(market_day(), 1..60),
        setup in 1u64..15,
    ) {
        let mut a = agent(Mining::SellDaily, 1_000, setup, vec![1e7; 5]);
        let mut scheduled: BTreeMap<u64, u64> = BTreeMap::new();
        for (price, reward, prior) in days {
            let out = a.advance(price, reward, prior).unwrap();
            let expected = scheduled.remove(&out.day).unwrap_or(0);
            prop_assert_eq!(out.arrived, expected);
            if let ScalingAction::Order { machines, arrival_day } = out.scaling {
                prop_assert_eq!(arrival_day, out.day + setup);
                let slot = scheduled.entry(arrival_day).or_insert(0);
                *slot = slot.saturating_add(machines);
            }
        }
    }

    /// Property: user fleets never schedule capacity nor change size.
    #[test]
    fn prop_unscalable_never_pending(
        n in 0u64..10_000,
        history in prop::collection::vec(-1e12f64..1e12, 0..10),
        days in prop::collection::vec(market_day(), 1..30),
    ) {
        let mut a = agent(Mining::LongBtc, n, 3, history).unscalable();
        for (price, reward, prior) in days {
            let out = a.advance(price, reward, prior).unwrap();
            prop_assert_eq!(out.scaling, ScalingAction::Hold);
            prop_assert!(a.pending().is_empty());
            prop_assert_eq!(a.n_machines(), n);
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

proptest! {
    /// Property: the ledger only ever moves the strategy's own currency.
    #[test]
    fn prop_ledger_strategy_pure(
        strategy in strategy(),
        days in prop::collection::vec(market_day(), 1..30),
    ) {
        let mut a = agent(strategy, 500, 7, vec![]);
        for (price, reward, prior) in days {
            a.advance(price, reward, prior).unwrap();
        }
        for d in a.ledger().entries() {
            match strategy {
                Mining::SellDaily => prop_assert_eq!(d.btc, 0.0),
                Mining::LongBtc => prop_assert_eq!(d.currency, 0.0),
            }
        }
    }

    /// Property: the last cumulative balance is the ledger total.
    #[test]
    fn prop_positions_prefix_sum(days in prop::collection::vec(market_day(), 1..30)) {
        let mut a = agent(Mining::SellDaily, 200, 7, vec![]);
        let mut running = 0.0;
        for (price, reward, prior) in days {
            running += a.advance(price, reward, prior).unwrap().profit;
        }
        let last = *a.positions().last().unwrap();
        prop_assert!((last.currency - running).abs() <= 1e-9 * running.abs().max(1.0));
        prop_assert_eq!(last, a.ledger().total());
    }
}
