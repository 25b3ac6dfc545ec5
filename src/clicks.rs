//! Click handling and the decaying combo multiplier.
//!
//! Rapid consecutive clicks build the combo; it is capped by the base
//! maximum plus any meta-upgrade bonus, resets when a click lands outside
//! the timeout window, and decays continuously toward 1 every tick while
//! no clicks are landing. Combo rewards money as well as speed: a car
//! finished by a click carries a payout bonus derived from the combo.

use crate::core::constants::{
    COMBO_DECAY_PER_SECOND, COMBO_GAIN_PER_CLICK, COMBO_MAX, COMBO_PAYOUT_BONUS_RATE,
    COMBO_TIMEOUT_MS,
};
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use crate::repair::complete_repair;

/// Transient click-engine state. Not persisted; a fresh session starts
/// with a cold combo.
#[derive(Debug, Clone)]
pub struct ComboState {
    pub multiplier: f64,
    pub last_click_ms: Option<i64>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            last_click_ms: None,
        }
    }
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What one click accomplished.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub repair_applied: u64,
    pub combo: f64,
    pub completed: bool,
    /// Payment credited when this click finished the car.
    pub payment: Option<u64>,
}

/// Handle a click at screen position (x, y).
///
/// Returns `None` when there is no car on the lift: the click missed its
/// target and has no side effect at all.
pub fn handle_click(
    combo: &mut ComboState,
    state: &mut Ledger,
    bus: &mut EventBus,
    now_ms: i64,
    x: f64,
    y: f64,
) -> Option<ClickOutcome> {
    state.current_car.as_ref()?;

    let chained = combo
        .last_click_ms
        .map(|last| (now_ms - last) as f64 <= COMBO_TIMEOUT_MS)
        .unwrap_or(false);
    if chained {
        let cap = COMBO_MAX + state.combo_max_bonus;
        combo.multiplier =
            (combo.multiplier + COMBO_GAIN_PER_CLICK + state.combo_gain_bonus).min(cap);
    } else {
        combo.multiplier = 1.0;
    }
    combo.last_click_ms = Some(now_ms);

    let repair = (state.click_power * combo.multiplier).floor();
    let car = state.current_car.as_mut().expect("checked above");
    let completed = car.apply_repair(repair);
    let progress = car.repair_progress;
    let repair_cost = car.repair_cost;

    state.total_clicks += 1;
    bus.emit(GameEvent::ClickPerformed {
        x,
        y,
        repair_applied: repair as u64,
        combo: combo.multiplier,
    });
    bus.emit(GameEvent::CarProgressed {
        progress,
        repair_cost,
    });

    let mut payment = None;
    if completed {
        let payout_bonus = 1.0 + (combo.multiplier - 1.0).max(0.0) * COMBO_PAYOUT_BONUS_RATE;
        payment = complete_repair(state, bus, now_ms, false, payout_bonus);
    }

    Some(ClickOutcome {
        repair_applied: repair as u64,
        combo: combo.multiplier,
        completed,
        payment,
    })
}

/// Per-tick combo decay. Runs every simulation tick regardless of clicks;
/// while no click has landed within the timeout window the combo slides
/// toward 1 at a fixed rate per second.
pub fn decay_combo(combo: &mut ComboState, now_ms: i64, dt_ms: f64) {
    let idle = combo
        .last_click_ms
        .map(|last| (now_ms - last) as f64 > COMBO_TIMEOUT_MS)
        .unwrap_or(true);
    if idle && combo.multiplier > 1.0 {
        combo.multiplier =
            (combo.multiplier - COMBO_DECAY_PER_SECOND * dt_ms / 1000.0).max(1.0);
    }
}
