// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Position Ledger

use serde::{Deserialize, Serialize};

use crate::types::PositionDelta;

/// Append-only record of a cohort's daily position changes.
///
/// Entry `d` is the change realized on day `d`; entry 0 is the empty day-0
/// position. Balances are never stored, only derived by prefix sum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionLedger {
    entries: Vec<PositionDelta>,
}

impl Default for PositionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionLedger {
    pub fn new() -> Self {
        Self { entries: vec![PositionDelta::default()] }
    }

    pub fn record(&mut self, delta: PositionDelta) {
        self.entries.push(delta);
    }

    pub fn entries(&self) -> &[PositionDelta] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running balance after each day.
    pub fn cumulative(&self) -> Vec<PositionDelta> {
        self.entries
            .iter()
            .scan(PositionDelta::default(), |acc, d| {
                *acc = *acc + *d;
                Some(*acc)
            })
            .collect()
    }

    /// Balance after `day` (inclusive), or `None` past the end of the ledger.
    pub fn balance_at(&self, day: usize) -> Option<PositionDelta> {
        if day >= self.entries.len() {
            return None;
        }
        Some(
            self.entries[..=day]
                .iter()
                .fold(PositionDelta::default(), |acc, d| acc + *d),
        )
    }

    pub fn total(&self) -> PositionDelta {
        self.entries.iter().fold(PositionDelta::default(), |acc, d| acc + *d)
    }
}
