// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SimError};

// ─── Strategy ────────────────────────────────────────────────────────────────

/// What a cohort does with its daily profit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Profit is realized in currency every day.
    #[serde(rename = "Sell Daily")]
    SellDaily,
    /// Profit is converted to BTC at the day's price and held.
    #[serde(rename = "Long BTC")]
    LongBtc,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::SellDaily, Strategy::LongBtc];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SellDaily => "Sell Daily",
            Self::LongBtc => "Long BTC",
        }
    }

    /// Split one day's currency profit into a ledger entry.
    pub fn position_change(&self, profit: f64, price: f64) -> PositionDelta {
        match self {
            Self::SellDaily => PositionDelta { btc: 0.0, currency: profit },
            Self::LongBtc => PositionDelta { btc: profit / price, currency: 0.0 },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Machine Model ───────────────────────────────────────────────────────────

/// Closed set of mining machines known to the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MachineModel {
    #[serde(rename = "Antminer S9")]
    AntminerS9,
    #[serde(rename = "Antminer S17")]
    AntminerS17,
    #[serde(rename = "Antminer T17")]
    AntminerT17,
    #[serde(rename = "Antminer S19")]
    AntminerS19,
    #[serde(rename = "Antminer T19")]
    AntminerT19,
    #[serde(rename = "Antminer S19 Pro")]
    AntminerS19Pro,
    #[serde(rename = "MicroBT M20s")]
    MicroBtM20s,
    #[serde(rename = "MicroBT M21s")]
    MicroBtM21s,
    #[serde(rename = "MicroBT M30s")]
    MicroBtM30s,
    #[serde(rename = "MicroBT M31s")]
    MicroBtM31s,
    #[serde(rename = "Innosilicon T2T")]
    InnosiliconT2T,
}

impl MachineModel {
    pub const ALL: [MachineModel; 11] = [
        MachineModel::AntminerS9,
        MachineModel::AntminerS17,
        MachineModel::AntminerT17,
        MachineModel::AntminerS19,
        MachineModel::AntminerT19,
        MachineModel::AntminerS19Pro,
        MachineModel::MicroBtM20s,
        MachineModel::MicroBtM21s,
        MachineModel::MicroBtM30s,
        MachineModel::MicroBtM31s,
        MachineModel::InnosiliconT2T,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AntminerS9 => "Antminer S9",
            Self::AntminerS17 => "Antminer S17",
            Self::AntminerT17 => "Antminer T17",
            Self::AntminerS19 => "Antminer S19",
            Self::AntminerT19 => "Antminer T19",
            Self::AntminerS19Pro => "Antminer S19 Pro",
            Self::MicroBtM20s => "MicroBT M20s",
            Self::MicroBtM21s => "MicroBT M21s",
            Self::MicroBtM30s => "MicroBT M30s",
            Self::MicroBtM31s => "MicroBT M31s",
            Self::InnosiliconT2T => "Innosilicon T2T",
        }
    }

    /// Look a model up by its human-readable name (case-insensitive).
    pub fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| SimError::UnknownMachine(label.to_string()))
    }
}

impl fmt::Display for MachineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── PositionDelta ───────────────────────────────────────────────────────────

/// One day's change in a cohort's holdings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PositionDelta {
    pub btc: f64,
    pub currency: f64,
}

impl std::ops::Add for PositionDelta {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            btc: self.btc + rhs.btc,
            currency: self.currency + rhs.currency,
        }
    }
}

impl PositionDelta {
    /// Value of the holding in currency at `price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.currency + self.btc * price
    }
}

// ─── CohortGroup ─────────────────────────────────────────────────────────────

/// The three fixed partitions of a simulator's agent list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CohortGroup {
    Environment,
    UserSellDaily,
    UserLongBtc,
}
