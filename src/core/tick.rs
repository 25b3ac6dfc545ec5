//! Per-tick orchestration.
//!
//! One simulation step runs the sub-systems in a fixed, deterministic
//! order: combo decay, worker accrual, queue spawn/assign, contract
//! expiry/refresh. Sub-systems never interleave mid-tick, so every tick
//! observes the same sequence of intermediate states.

use crate::achievements::check_achievements;
use crate::cars::queue::{tick_queue, SpawnTimer};
use crate::clicks::{decay_combo, ComboState};
use crate::contracts::logic::{tick_contracts, JobBoard};
use crate::core::events::EventBus;
use crate::core::ledger::Ledger;
use crate::workers::logic::tick_workers;
use rand::Rng;

/// Advance the simulation by one fixed step of `dt_ms`, ending at wall
/// clock `now_ms`.
pub fn run_tick<R: Rng>(
    state: &mut Ledger,
    combo: &mut ComboState,
    spawner: &mut SpawnTimer,
    board: &mut JobBoard,
    bus: &mut EventBus,
    rng: &mut R,
    now_ms: i64,
    dt_ms: f64,
) {
    // ── 1. Combo decay ──────────────────────────────────────────
    decay_combo(combo, now_ms, dt_ms);

    // ── 2. Worker accrual ───────────────────────────────────────
    tick_workers(state, bus, now_ms, dt_ms);

    // ── 3. Queue spawn / assign ─────────────────────────────────
    tick_queue(spawner, state, bus, rng, dt_ms);

    // ── 4. Contract expiry & board refresh ──────────────────────
    tick_contracts(board, state, bus, rng, now_ms, dt_ms);

    // ── 5. Achievement sweep over this tick's transitions ───────
    check_achievements(state, bus, now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cars::{car_spec, Car};
    use crate::core::constants::CONTRACT_OFFER_CAP;
    use crate::workers::logic::hire_worker;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Rig {
        state: Ledger,
        combo: ComboState,
        spawner: SpawnTimer,
        board: JobBoard,
        bus: EventBus,
        rng: ChaCha8Rng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                state: Ledger::new(0),
                combo: ComboState::new(),
                spawner: SpawnTimer::new(),
                board: JobBoard::new(),
                bus: EventBus::new(),
                rng: ChaCha8Rng::seed_from_u64(9),
            }
        }

        fn tick(&mut self, now_ms: i64, dt_ms: f64) {
            run_tick(
                &mut self.state,
                &mut self.combo,
                &mut self.spawner,
                &mut self.board,
                &mut self.bus,
                &mut self.rng,
                now_ms,
                dt_ms,
            );
        }
    }

    #[test]
    fn test_tick_tops_up_empty_job_board() {
        let mut rig = Rig::new();
        assert!(rig.state.job_contracts.is_empty());

        rig.tick(0, 16.0);
        assert_eq!(rig.state.job_contracts.len(), CONTRACT_OFFER_CAP);
    }

    #[test]
    fn test_worker_completion_then_queue_promotion_same_tick() {
        let mut rig = Rig::new();
        rig.state.currency = 1_000;
        hire_worker(&mut rig.state, &mut rig.bus, "apprentice", 0);

        // A nearly-done car on the lift and one waiting behind it.
        let mut car = Car::from_spec(car_spec("hatchback").unwrap(), 1, 1.0);
        car.repair_progress = 49.99;
        rig.state.current_car = Some(car);
        rig.state
            .car_queue
            .push_back(Car::from_spec(car_spec("hatchback").unwrap(), 1, 1.0));

        rig.tick(0, 1_000.0);

        // Step 2 finished the car; step 3 pulled the next one on.
        assert_eq!(rig.state.cars_repaired, 1);
        assert!(rig.state.current_car.is_some());
        assert!(rig.state.car_queue.is_empty());
    }

    #[test]
    fn test_combo_decays_even_with_no_clicks_in_flight() {
        let mut rig = Rig::new();
        rig.combo.multiplier = 3.0;
        rig.combo.last_click_ms = Some(0);

        // Past the timeout window, each tick bleeds combo.
        rig.tick(5_000, 1_000.0);
        assert!((rig.combo.multiplier - 2.5).abs() < 1e-9);
        rig.tick(6_000, 1_000.0);
        assert!((rig.combo.multiplier - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_achievement_sweep_sees_tick_transitions() {
        let mut rig = Rig::new();
        rig.state.currency = 1_000;
        hire_worker(&mut rig.state, &mut rig.bus, "apprentice", 0);

        rig.tick(123, 16.0);
        assert!(rig.state.achievements.contains_key("first-crew"));
    }
}
