//! Static worker catalog.

use super::types::WorkerKind;

/// Hireable worker types, cheapest first. All share the same cost growth;
/// throughput tiers are roughly 4x apart.
pub static WORKER_CATALOG: &[WorkerKind] = &[
    WorkerKind {
        id: "apprentice",
        name: "Apprentice",
        repair_rate: 0.5,
        base_cost: 100,
        cost_growth: 1.15,
    },
    WorkerKind {
        id: "mechanic",
        name: "Mechanic",
        repair_rate: 2.0,
        base_cost: 500,
        cost_growth: 1.15,
    },
    WorkerKind {
        id: "specialist",
        name: "Specialist",
        repair_rate: 8.0,
        base_cost: 3_000,
        cost_growth: 1.15,
    },
    WorkerKind {
        id: "master-tech",
        name: "Master Technician",
        repair_rate: 30.0,
        base_cost: 20_000,
        cost_growth: 1.15,
    },
];

/// Look up a worker type by id.
pub fn worker_kind(id: &str) -> Option<&'static WorkerKind> {
    WORKER_CATALOG.iter().find(|kind| kind.id == id)
}
