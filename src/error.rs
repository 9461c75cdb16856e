// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Hashpower Arena Simulation Suite - Error Types

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the simulation core.
///
/// Configuration problems surface at build time and are not recoverable.
/// Invalid-state errors mean the simulated world reached something impossible
/// (a zero aggregate hash rate) and abort the run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    // -- Configuration -------------------------------------------------------
    #[error("unknown machine model: {0}")]
    UnknownMachine(String),

    #[error("no {table} proportion configured for {key}")]
    MissingProportion { table: &'static str, key: String },

    #[error("series length mismatch: prices={prices}, rewards={rewards}, hash_rates={hash_rates}")]
    SeriesLengthMismatch {
        prices: usize,
        rewards: usize,
        hash_rates: usize,
    },

    #[error("price and reward series must contain at least the day-0 value")]
    EmptySeries,

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid distribution parameters: {0}")]
    InvalidDistribution(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    // -- Invalid state -------------------------------------------------------
    #[error("prior aggregate hash rate must be positive (got {0})")]
    NonPositiveHashRate(f64),

    #[error("population has zero aggregate hash rate; cannot rescale to target")]
    ZeroAggregateHashRate,

    #[error("no peer trials have been run")]
    NoTrials,

    #[error("simulator already advanced {days} day(s); peers must start from day 0")]
    AlreadyStepped { days: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
