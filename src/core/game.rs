//! Top-level game facade: the command surface the host drives.
//!
//! Owns the ledger, the event bus, and the transient engine state (combo,
//! spawn timer, job board clock, fixed-timestep accumulator). Every
//! command mutates first and dispatches events strictly afterwards, so
//! subscribers never observe a mid-mutation ledger.

use crate::cars::queue::{force_spawn, promote_next_car, SpawnTimer};
use crate::clicks::{handle_click, ClickOutcome, ComboState};
use crate::contracts::logic::{
    abandon_active_contract, accept_contract, reconcile_after_load, refresh_offers, JobBoard,
};
use crate::contracts::types::AcceptResult;
use crate::core::constants::{OFFLINE_AVG_REPAIR_COST, XP_PER_REPAIR_COST};
use crate::core::events::{EventBus, GameEvent, Listener};
use crate::core::ledger::Ledger;
use crate::core::offline::{estimate_offline_progress, OfflineEstimate};
use crate::core::scheduler::FixedTimestep;
use crate::core::tick::run_tick;
use crate::prestige::perform_prestige;
use crate::progression::award_xp;
use crate::save::SaveData;
use crate::shop::logic::{purchase_nip_upgrade, purchase_upgrade};
use crate::workers::logic::hire_worker;
use rand::Rng;
use uuid::Uuid;

pub struct Game {
    state: Ledger,
    bus: EventBus,
    combo: ComboState,
    spawner: SpawnTimer,
    board: JobBoard,
    clock: FixedTimestep,
    /// Wall clock of the latest `update`, used by commands between frames.
    now_ms: i64,
    play_time_accum_ms: f64,
}

impl Game {
    /// Start a fresh run stamped with the wall clock, for hosts that do
    /// not drive time explicitly.
    pub fn new_from_wall_clock<R: Rng>(rng: &mut R) -> Self {
        Self::new(chrono::Utc::now().timestamp_millis(), rng)
    }

    /// Start a fresh run: a car on the lift and a full job board.
    pub fn new<R: Rng>(now_ms: i64, rng: &mut R) -> Self {
        let mut state = Ledger::new(now_ms);
        let mut bus = EventBus::new();
        force_spawn(&mut state, &mut bus, rng);
        refresh_offers(&mut state, &mut bus, rng, now_ms);

        Self {
            state,
            bus,
            combo: ComboState::new(),
            spawner: SpawnTimer::new(),
            board: JobBoard::new(),
            clock: FixedTimestep::new(),
            now_ms,
            play_time_accum_ms: 0.0,
        }
    }

    pub fn state(&self) -> &Ledger {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut Ledger {
        &mut self.state
    }

    pub fn combo_multiplier(&self) -> f64 {
        self.combo.multiplier
    }

    /// Fraction of a simulation step in the accumulator, for render
    /// interpolation.
    pub fn interpolation_alpha(&self) -> f64 {
        self.clock.alpha()
    }

    /// Register an event listener.
    pub fn subscribe(&mut self, listener: Listener) {
        self.bus.subscribe(listener);
    }

    /// Drain buffered events without listeners, for polling hosts.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain()
    }

    // ------------------------------------------------------------------
    // Simulation driver
    // ------------------------------------------------------------------

    /// Advance the simulation to wall clock `now_ms`, running as many
    /// fixed steps as the elapsed time covers. Returns the step count.
    pub fn update<R: Rng>(&mut self, now_ms: i64, rng: &mut R) -> u32 {
        self.now_ms = now_ms;
        let steps = self.clock.advance(now_ms as f64);
        let dt_ms = self.clock.step_ms();

        for _ in 0..steps {
            run_tick(
                &mut self.state,
                &mut self.combo,
                &mut self.spawner,
                &mut self.board,
                &mut self.bus,
                rng,
                now_ms,
                dt_ms,
            );
            self.play_time_accum_ms += dt_ms;
        }
        while self.play_time_accum_ms >= 1_000.0 {
            self.play_time_accum_ms -= 1_000.0;
            self.state.play_time_seconds += 1;
        }

        self.bus.dispatch();
        steps
    }

    // ------------------------------------------------------------------
    // Command surface
    // ------------------------------------------------------------------

    /// Click at screen position (x, y). `None` means no car was on the
    /// lift and nothing happened.
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<ClickOutcome> {
        let outcome = handle_click(&mut self.combo, &mut self.state, &mut self.bus, self.now_ms, x, y);
        self.bus.dispatch();
        outcome
    }

    pub fn purchase_upgrade(&mut self, id: &str) -> bool {
        let ok = purchase_upgrade(&mut self.state, &mut self.bus, id);
        self.bus.dispatch();
        ok
    }

    pub fn purchase_nip_upgrade(&mut self, id: &str) -> bool {
        let ok = purchase_nip_upgrade(&mut self.state, &mut self.bus, id);
        self.bus.dispatch();
        ok
    }

    pub fn hire_worker(&mut self, kind_id: &str) -> bool {
        let ok = hire_worker(&mut self.state, &mut self.bus, kind_id, self.now_ms);
        self.bus.dispatch();
        ok
    }

    pub fn accept_contract<R: Rng>(&mut self, contract_id: Uuid, rng: &mut R) -> AcceptResult {
        let result = accept_contract(&mut self.state, &mut self.bus, rng, contract_id, self.now_ms);
        self.bus.dispatch();
        result
    }

    pub fn abandon_active_contract(&mut self) -> bool {
        let ok = abandon_active_contract(&mut self.state, &mut self.bus);
        self.bus.dispatch();
        ok
    }

    /// Prestige: reset with carryover, then reinitialize the run the same
    /// way a new game starts.
    pub fn prestige<R: Rng>(&mut self, rng: &mut R) -> bool {
        let ok = perform_prestige(&mut self.state, &mut self.bus, self.now_ms);
        if ok {
            self.combo.reset();
            self.spawner.reset();
            self.board.reset();
            force_spawn(&mut self.state, &mut self.bus, rng);
            refresh_offers(&mut self.state, &mut self.bus, rng, self.now_ms);
        }
        self.bus.dispatch();
        ok
    }

    // ------------------------------------------------------------------
    // Persistence boundary
    // ------------------------------------------------------------------

    /// Snapshot the ledger into a versioned save payload.
    pub fn to_save(&mut self) -> SaveData {
        let data = self.state.to_save(self.now_ms);
        self.bus.emit(GameEvent::GameSaved {
            saved_at: data.saved_at,
        });
        self.bus.dispatch();
        data
    }

    /// Rebuild a game from a save payload: recalculate derived stats,
    /// reconcile contract state, and make sure a car is on the floor.
    pub fn from_save<R: Rng>(data: SaveData, now_ms: i64, rng: &mut R) -> Self {
        let saved_at = data.saved_at;
        let mut state = Ledger::from_save(data);
        let mut bus = EventBus::new();

        reconcile_after_load(&mut state, &mut bus, rng, now_ms);
        if state.current_car.is_none() && state.car_queue.is_empty() {
            force_spawn(&mut state, &mut bus, rng);
        } else {
            promote_next_car(&mut state, &mut bus);
        }
        bus.emit(GameEvent::GameLoaded { saved_at });

        Self {
            state,
            bus,
            combo: ComboState::new(),
            spawner: SpawnTimer::new(),
            board: JobBoard::new(),
            clock: FixedTimestep::new(),
            now_ms,
            play_time_accum_ms: 0.0,
        }
    }

    /// Settle an offline gap in one closed-form step and credit the
    /// result. The estimate is called with a unit income multiplier
    /// because `add_currency` applies income and prestige itself.
    pub fn apply_offline_progress(&mut self, elapsed_ms: f64) -> OfflineEstimate {
        let estimate = estimate_offline_progress(
            elapsed_ms,
            self.state.auto_repair_rate,
            self.state.car_value_multiplier(),
            1.0,
        );

        if estimate.cars_repaired > 0 {
            let credited = self.state.add_currency(estimate.earnings as f64, &mut self.bus);
            self.state.cars_repaired += estimate.cars_repaired;
            award_xp(
                &mut self.state,
                &mut self.bus,
                estimate.cars_repaired as f64 * OFFLINE_AVG_REPAIR_COST * XP_PER_REPAIR_COST,
            );
            self.bus.emit(GameEvent::Notification {
                message: format!(
                    "While you were away your crew repaired {} cars for {} cash",
                    estimate.cars_repaired, credited
                ),
            });
        }

        self.bus.dispatch();
        estimate
    }
}
