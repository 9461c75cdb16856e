#[cfg(test)]
mod tests {
    use hashpower_arena::generators::generate_prices;
    use hashpower_arena::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const N_DAYS: usize = 20;

    fn parent(seed: u64) -> Simulator {
        let mut cfg = SimConfig::default();
        cfg.user.machines = vec![MachineModel::AntminerS9, MachineModel::AntminerS19];
        cfg.user.elec_costs = vec![0.03, 0.05];
        let pop = Population::from_config(&cfg, &MachineCatalog::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Simulator::generate(pop, cfg.calibration, N_DAYS, &mut rng).unwrap()
    }

    // ========== Peer Orchestration ==========

    #[test]
    fn test_peers_run_full_length() {
        let mut sim = parent(1);
        let peers = sim.run_trials(4, 100).unwrap();
        assert_eq!(peers.len(), 4);
        for peer in peers {
            assert_eq!(peer.prices().len(), N_DAYS + 1);
            assert_eq!(peer.global_hash_rate().len(), N_DAYS + 1);
            assert_eq!(peer.days_remaining(), 0);
        }
        // Parent population is untouched
        assert_eq!(sim.days_elapsed(), 0);
        assert!(sim.agents().iter().all(|a| a.day() == 0));
    }

    #[test]
    fn test_peer_paths_seeded_per_trial() {
        let mut sim = parent(1);
        let calibration = sim.calibration().clone();
        sim.run_trials(3, 500).unwrap();
        for (i, peer) in sim.peers().iter().enumerate() {
            let mut rng = ChaCha8Rng::seed_from_u64(500 + i as u64);
            assert_eq!(peer.prices(), generate_prices(&calibration.price, N_DAYS, &mut rng).as_slice());
        }
        assert_ne!(sim.peers()[0].prices(), sim.peers()[1].prices());
    }

    #[test]
    fn test_ensemble_reproducible() {
        let mut a = parent(1);
        let mut b = parent(2);
        a.run_trials(3, 42).unwrap();
        b.run_trials(3, 42).unwrap();
        assert_eq!(a.avg_prices().unwrap(), b.avg_prices().unwrap());
        assert_eq!(a.avg_global_hash_rate().unwrap(), b.avg_global_hash_rate().unwrap());

        let mut c = parent(1);
        c.run_trials(3, 43).unwrap();
        assert_ne!(a.avg_prices().unwrap(), c.avg_prices().unwrap());
    }

    #[test]
    fn test_stepped_parent_rejected() {
        let mut sim = parent(1);
        sim.step_day().unwrap();
        assert!(matches!(sim.run_trials(2, 0), Err(SimError::AlreadyStepped { days: 1 })));
    }

    #[test]
    fn test_zero_trials_leaves_nothing_to_average() {
        let mut sim = parent(1);
        assert!(sim.run_trials(0, 0).unwrap().is_empty());
        assert!(matches!(sim.avg_prices(), Err(SimError::NoTrials)));
    }

    #[test]
    fn test_parent_paths_disjoint_from_peers() {
        let base_seed = 42;
        let mut cfg = SimConfig::default();
        cfg.user.machines = vec![MachineModel::AntminerS19];
        cfg.user.elec_costs = vec![0.05];
        let pop = Population::from_config(&cfg, &MachineCatalog::default()).unwrap();
        let mut rng = parent_rng(base_seed);
        let mut sim = Simulator::generate(pop, cfg.calibration, N_DAYS, &mut rng).unwrap();

        let parent_prices = sim.prices().to_vec();
        let parent_rewards = sim.block_rewards().to_vec();
        sim.run_trials(4, base_seed).unwrap();
        for peer in sim.peers() {
            assert_ne!(peer.prices(), parent_prices.as_slice());
            assert_ne!(peer.block_rewards(), parent_rewards.as_slice());
        }

        // Seeding the parent like peer 0 would replay its paths
        let mut shared = ChaCha8Rng::seed_from_u64(base_seed);
        let replayed = generate_prices(&sim.calibration().price, N_DAYS, &mut shared);
        assert_eq!(replayed.as_slice(), sim.peers()[0].prices());
    }

    // ========== Aggregation ==========

    #[test]
    fn test_avg_prices_pointwise_mean() {
        let mut sim = parent(1);
        sim.run_trials(5, 9).unwrap();
        let avg = sim.avg_prices().unwrap();
        assert_eq!(avg.len(), N_DAYS + 1);
        for (day, value) in avg.iter().enumerate() {
            let mean = sim.peers().iter().map(|p| p.prices()[day]).sum::<f64>() / 5.0;
            assert!((value - mean).abs() <= 1e-9 * mean.abs());
        }
    }

    #[test]
    fn test_avg_user_positions_grouped() {
        let n_trials = 4;
        let mut sim = parent(1);
        sim.run_trials(n_trials, 77).unwrap();
        let rows = sim.avg_user_positions().unwrap();

        // 2 machines × 2 elec costs × 2 strategies, one row per day each
        assert_eq!(rows.len(), 8 * (N_DAYS + 1));
        assert!(rows.iter().all(|r| r.trials == n_trials));
        assert!(rows.iter().all(|r| r.position_band.n == n_trials));

        let day_zero: Vec<_> = rows.iter().filter(|r| r.mean.day == 0).collect();
        assert_eq!(day_zero.len(), 8);
        assert!(day_zero.iter().all(|r| r.mean.total_position_value == 0.0));

        for r in &rows {
            let band = &r.position_band;
            assert!(band.min <= r.mean.total_position_value + 1e-6);
            assert!(r.mean.total_position_value <= band.max + 1e-6);
        }
    }
}
