// Scenario Definitions: the reference market regimes and user fleet mixes
// Each scenario rewrites a copy of the base config; the engine is untouched

use hashpower_arena::{MachineModel, SimConfig};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    /// Mutates the base config into this scenario's config.
    pub apply: fn(&mut SimConfig),
}

impl Scenario {
    pub fn config(&self, base: &SimConfig) -> SimConfig {
        let mut cfg = base.clone();
        (self.apply)(&mut cfg);
        cfg
    }

    pub fn matches(&self, filter: &str) -> bool {
        let f = filter.to_lowercase();
        self.name.contains(&f) || self.label.to_lowercase().contains(&f)
    }
}

// ─── Config transforms ──────────────────────────────────────────────────────

const HARDWARE_COMPARISON: [MachineModel; 2] = [MachineModel::AntminerS9, MachineModel::AntminerS19];

fn historical(_: &mut SimConfig) {}

fn bearish(cfg: &mut SimConfig) {
    cfg.calibration.price = cfg.calibration.price.bearish();
}

fn corrections(cfg: &mut SimConfig) {
    cfg.calibration.price = cfg.calibration.price.with_corrections(1.25);
}

fn historical_machines(cfg: &mut SimConfig) {
    cfg.user.machines = HARDWARE_COMPARISON.to_vec();
    cfg.user.elec_costs = vec![0.03];
}

fn bearish_opex(cfg: &mut SimConfig) {
    bearish(cfg);
    cfg.user.machines = HARDWARE_COMPARISON.to_vec();
    cfg.user.elec_costs = vec![0.03, 0.04, 0.05];
}

// ─── Scenario Registry ──────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "historical", label: "Historical Parameters", apply: historical },
        Scenario { name: "bearish", label: "Bearish Parameters", apply: bearish },
        Scenario { name: "corrections", label: "Bull Market with Corrections", apply: corrections },
        Scenario {
            name: "historical-machines",
            label: "Historical Parameters, S9 vs S19",
            apply: historical_machines,
        },
        Scenario {
            name: "bearish-opex",
            label: "Bearish Parameters, Electricity Cost Sweep",
            apply: bearish_opex,
        },
    ]
}
