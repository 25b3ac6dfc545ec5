//! Car spawn cadence and the queue/current-car lifecycle.
//!
//! A timer advances with elapsed time; whole intervals convert into
//! weighted-random spawns while the queue has room. The timer is clamped
//! to twice the interval so a large tick (an offline gap, a long frame)
//! catches up with at most a short burst instead of an unbounded loop.

use super::data::{starter_spec, CAR_CATALOG};
use super::types::{Car, CarSpec};
use crate::core::constants::{
    BASE_SPAWN_INTERVAL_MS, CAR_QUEUE_CAP, MIN_SPAWN_INTERVAL_MS, WORKER_SPAWN_BONUS_CAP,
    WORKER_SPAWN_BONUS_PER_WORKER,
};
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use rand::Rng;

/// Transient spawn-timer state. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    pub timer_ms: f64,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
    }
}

/// Current spawn interval: more workers mean a busier garage, down to a
/// capped 75% reduction, and upgrades scale the result with a floor.
pub fn spawn_interval_ms(state: &Ledger) -> f64 {
    let worker_bonus =
        (state.worker_count() as f64 * WORKER_SPAWN_BONUS_PER_WORKER).min(WORKER_SPAWN_BONUS_CAP);
    (BASE_SPAWN_INTERVAL_MS * (1.0 - worker_bonus) * state.queue_spawn_multiplier)
        .max(MIN_SPAWN_INTERVAL_MS)
}

/// Pick a spec from the unlocked pool, weighted by rarity. Falls back to
/// the starter car if the pool is somehow empty.
fn pick_spawn_spec<R: Rng>(state: &Ledger, rng: &mut R) -> &'static CarSpec {
    let pool: Vec<&'static CarSpec> = CAR_CATALOG
        .iter()
        .filter(|spec| state.unlocked_cars.contains(spec.id))
        .collect();
    if pool.is_empty() {
        return starter_spec();
    }

    let total: u32 = pool.iter().map(|spec| spec.rarity.spawn_weight()).sum();
    let mut roll = rng.gen_range(0..total);
    for spec in &pool {
        let weight = spec.rarity.spawn_weight();
        if roll < weight {
            return spec;
        }
        roll -= weight;
    }
    pool[pool.len() - 1]
}

/// Spawn one weighted-random car onto the back of the queue.
pub fn spawn_car<R: Rng>(state: &mut Ledger, bus: &mut EventBus, rng: &mut R) {
    let spec = pick_spawn_spec(state, rng);
    let car = Car::from_spec(spec, state.current_tier, 1.0);
    bus.emit(GameEvent::CarQueued {
        spec_id: car.spec_id.clone(),
        name: car.name.clone(),
    });
    state.car_queue.push_back(car);
}

/// Move the front of the queue onto the lift when it is free.
pub fn promote_next_car(state: &mut Ledger, bus: &mut EventBus) {
    if state.current_car.is_none() {
        if let Some(car) = state.car_queue.pop_front() {
            bus.emit(GameEvent::CarStarted {
                spec_id: car.spec_id.clone(),
                name: car.name.clone(),
            });
            state.current_car = Some(car);
        }
    }
}

/// Per-tick queue update: advance the clamped timer, spawn for each whole
/// interval while below capacity, then fill the lift.
pub fn tick_queue<R: Rng>(
    timer: &mut SpawnTimer,
    state: &mut Ledger,
    bus: &mut EventBus,
    rng: &mut R,
    dt_ms: f64,
) {
    let interval = spawn_interval_ms(state);
    timer.timer_ms = (timer.timer_ms + dt_ms).min(interval * 2.0);

    while timer.timer_ms >= interval && state.car_queue.len() < CAR_QUEUE_CAP {
        timer.timer_ms -= interval;
        spawn_car(state, bus, rng);
    }

    promote_next_car(state, bus);
}

/// Immediate spawn that bypasses the timer, for run initialization.
pub fn force_spawn<R: Rng>(state: &mut Ledger, bus: &mut EventBus, rng: &mut R) {
    spawn_car(state, bus, rng);
    promote_next_car(state, bus);
}
