use serde::{Deserialize, Serialize};

/// Static worker type: hire cost curve and repair throughput.
#[derive(Debug, Clone, Copy)]
pub struct WorkerKind {
    pub id: &'static str,
    pub name: &'static str,
    /// Repair points contributed per second, before multipliers.
    pub repair_rate: f64,
    pub base_cost: u64,
    pub cost_growth: f64,
}

/// A hired worker. Never fired within a run; cleared only by a full reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub kind_id: String,
    /// Unix ms hire timestamp.
    pub hired_at: i64,
    /// Lifetime repair points contributed by this worker.
    pub total_repairs: f64,
}

impl Worker {
    pub fn new(kind_id: &str, hired_at: i64) -> Self {
        Self {
            kind_id: kind_id.to_string(),
            hired_at,
            total_repairs: 0.0,
        }
    }
}
