//! Repair completion service.
//!
//! The single authoritative path for finishing a repair. Both the click
//! engine and the worker engine land here when a car's progress reaches its
//! cost, so payment, XP, and the contract outcome are computed exactly
//! once, and the car-repaired event is the sole completion signal any
//! consumer observes.

use crate::contracts::logic::resolve_repaired_contract;
use crate::contracts::types::ContractOutcome;
use crate::core::constants::XP_PER_REPAIR_COST;
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use crate::progression::award_xp;

/// Finish the current car. Returns the credited payment, or `None` when
/// there is no current car (callers only invoke this on full progress, so
/// that is a logic error upstream, tolerated here without panicking).
///
/// Payment is `floor(base_value * car_value_multiplier * payout_bonus)`,
/// further scaled by the contract payout multiplier only when the car's
/// contract tag is unexpired and the deadline has not passed. Base XP is
/// proportional to the car's pre-tier-scaling repair cost; tier inflation
/// is divided back out because XP reflects base difficulty.
pub fn complete_repair(
    state: &mut Ledger,
    bus: &mut EventBus,
    now_ms: i64,
    is_auto_repair: bool,
    payout_bonus: f64,
) -> Option<u64> {
    let car = state.current_car.take()?;

    let mut payment =
        (car.base_value as f64 * state.car_value_multiplier() * payout_bonus).floor() as u64;

    let outcome = car.contract.as_ref().map(|tag| {
        if !tag.expired && now_ms <= tag.expires_at {
            payment = (payment as f64 * tag.payout_multiplier).floor() as u64;
            ContractOutcome::Completed
        } else {
            ContractOutcome::FailedLate
        }
    });

    let credited = state.add_currency(payment as f64, bus);
    state.cars_repaired += 1;
    state.last_repair_at = now_ms;

    award_xp(state, bus, car.base_repair_cost() * XP_PER_REPAIR_COST);
    if outcome == Some(ContractOutcome::Completed) {
        let bonus_xp = car.contract.as_ref().map(|tag| tag.bonus_xp).unwrap_or(0);
        award_xp(state, bus, bonus_xp as f64);
    }

    bus.emit(GameEvent::CarRepaired {
        car: Box::new(car.clone()),
        payment: credited,
        is_auto_repair,
        payout_bonus,
        contract: outcome,
    });

    resolve_repaired_contract(state, bus, &car, outcome, credited);

    Some(credited)
}
