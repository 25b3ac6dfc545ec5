//! Hiring and per-tick auto-repair accrual.

use super::data::worker_kind;
use super::types::{Worker, WorkerKind};
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use crate::repair::complete_repair;

/// Hire cost after `owned` purchases of the same kind:
/// `floor(base_cost * cost_growth^owned)`.
pub fn hire_cost(kind: &WorkerKind, owned: u32) -> u64 {
    (kind.base_cost as f64 * kind.cost_growth.powi(owned as i32)).floor() as u64
}

/// Next hire cost for a kind id. Unknown ids price at `u64::MAX` so every
/// affordability check fails without a special case.
pub fn next_hire_cost(state: &Ledger, kind_id: &str) -> u64 {
    match worker_kind(kind_id) {
        Some(kind) => {
            let owned = state.worker_counts.get(kind_id).copied().unwrap_or(0);
            hire_cost(kind, owned)
        }
        None => u64::MAX,
    }
}

/// Atomic hire: fails cleanly on unknown ids or insufficient funds, else
/// deducts the cost, appends the worker, bumps the owned-count cache, and
/// recomputes the aggregate repair rate.
pub fn hire_worker(state: &mut Ledger, bus: &mut EventBus, kind_id: &str, now_ms: i64) -> bool {
    let Some(kind) = worker_kind(kind_id) else {
        bus.emit(GameEvent::Notification {
            message: format!("Unknown worker type: {kind_id}"),
        });
        return false;
    };

    let owned = state.worker_counts.get(kind_id).copied().unwrap_or(0);
    let cost = hire_cost(kind, owned);
    if !state.spend_currency(cost, bus) {
        bus.emit(GameEvent::Notification {
            message: format!("Not enough cash to hire a {}", kind.name),
        });
        return false;
    }

    *state.worker_counts.entry(kind_id.to_string()).or_insert(0) += 1;
    state.workers.push(Worker::new(kind_id, now_ms));
    state.finalize_derived();

    bus.emit(GameEvent::WorkerHired {
        kind_id: kind_id.to_string(),
        owned: owned + 1,
        cost,
    });
    true
}

/// Per-tick accrual: every worker contributes `rate * elapsed` to its own
/// lifetime counter, and the multiplied total goes onto the current car.
/// Completion is delegated to the repair service with the auto flag and no
/// payout bonus.
pub fn tick_workers(state: &mut Ledger, bus: &mut EventBus, now_ms: i64, dt_ms: f64) {
    if state.workers.is_empty() || state.current_car.is_none() {
        return;
    }

    let elapsed_secs = dt_ms / 1000.0;
    let mut total = 0.0;
    for worker in &mut state.workers {
        if let Some(kind) = worker_kind(&worker.kind_id) {
            let contribution = kind.repair_rate * elapsed_secs;
            worker.total_repairs += contribution;
            total += contribution;
        }
    }

    let applied = total * state.auto_repair_multiplier;
    let car = state.current_car.as_mut().expect("checked above");
    let completed = car.apply_repair(applied);
    bus.emit(GameEvent::CarProgressed {
        progress: car.repair_progress,
        repair_cost: car.repair_cost,
    });

    if completed {
        complete_repair(state, bus, now_ms, true, 1.0);
    }
}
