// Per-Day JSONL Series Writers
// One JSON line per day (environment) or per cohort-day (positions)

use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashpower_arena::AveragedPositionRow;

/// Ensemble-averaged market state for one day.
#[derive(Debug, Serialize)]
pub struct EnvSnapshot {
    pub day: usize,
    pub price: f64,
    pub hash_rate: f64,
    pub trials: usize,
}

pub fn env_snapshots(prices: &[f64], hash_rates: &[f64], trials: usize) -> Vec<EnvSnapshot> {
    prices
        .iter()
        .zip(hash_rates)
        .enumerate()
        .map(|(day, (&price, &hash_rate))| EnvSnapshot { day, price, hash_rate, trials })
        .collect()
}

/// Write one JSON object per line, creating parent directories as needed.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut file, record)?;
        writeln!(file)?;
    }
    file.flush()
}

pub fn write_positions(path: &Path, rows: &[AveragedPositionRow]) -> std::io::Result<()> {
    write_jsonl(path, rows)
}
