//! Job board engine: offer generation, accept/abandon, deadline expiry,
//! completion resolution, and post-load reconciliation.

use super::types::{AcceptResult, ContractOutcome, ContractTag, JobContract};
use crate::cars::queue::promote_next_car;
use crate::cars::{car_spec, starter_spec, Car, CarSpec, CAR_CATALOG};
use crate::core::constants::{
    CONTRACT_BONUS_XP_RATE, CONTRACT_DURATION_FLOOR_MS, CONTRACT_MAX_DURATION_MS,
    CONTRACT_MAX_PAYOUT_MULT, CONTRACT_MAX_REPAIR_MULT, CONTRACT_MIN_DURATION_MS,
    CONTRACT_MIN_PAYOUT_MULT, CONTRACT_MIN_REPAIR_MULT, CONTRACT_OFFER_CAP, CONTRACT_REFRESH_MS,
    CONTRACT_RARITY_DEADLINE_COMPRESSION, CONTRACT_RARITY_PAYOUT_BONUS,
    CONTRACT_TIER_DEADLINE_COMPRESSION, CONTRACT_TIER_PAYOUT_BONUS,
};
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use rand::Rng;
use tracing::warn;
use uuid::Uuid;

/// Transient board state: the offer refresh clock. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    pub refresh_timer_ms: f64,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.refresh_timer_ms = 0.0;
    }
}

/// Generate one offer from the currently-unlocked car pool. Rarer cars and
/// higher car tiers skew the payout upward and compress the deadline.
pub fn generate_offer<R: Rng>(state: &Ledger, rng: &mut R, now_ms: i64) -> JobContract {
    let pool: Vec<&'static CarSpec> = CAR_CATALOG
        .iter()
        .filter(|spec| state.unlocked_cars.contains(spec.id))
        .collect();
    let spec = if pool.is_empty() {
        starter_spec()
    } else {
        pool[rng.gen_range(0..pool.len())]
    };

    let rarity = spec.rarity.rank() as f64;
    let tier_above = spec.tier.saturating_sub(1) as f64;

    let payout_multiplier = rng.gen_range(CONTRACT_MIN_PAYOUT_MULT..CONTRACT_MAX_PAYOUT_MULT)
        + rarity * CONTRACT_RARITY_PAYOUT_BONUS
        + tier_above * CONTRACT_TIER_PAYOUT_BONUS;
    let repair_multiplier = rng.gen_range(CONTRACT_MIN_REPAIR_MULT..CONTRACT_MAX_REPAIR_MULT);

    let base_duration = rng.gen_range(CONTRACT_MIN_DURATION_MS..CONTRACT_MAX_DURATION_MS);
    let duration_ms = (base_duration
        * (1.0 - rarity * CONTRACT_RARITY_DEADLINE_COMPRESSION)
        * (1.0 - tier_above * CONTRACT_TIER_DEADLINE_COMPRESSION))
        .max(CONTRACT_DURATION_FLOOR_MS) as i64;

    JobContract {
        id: Uuid::new_v4(),
        car_id: spec.id.to_string(),
        repair_multiplier,
        payout_multiplier,
        bonus_xp: (spec.repair_cost * CONTRACT_BONUS_XP_RATE).floor() as u64,
        duration_ms,
        created_at: now_ms,
        accepted_at: None,
        expires_at: None,
    }
}

/// Replace every open offer with a fresh set.
pub fn refresh_offers<R: Rng>(state: &mut Ledger, bus: &mut EventBus, rng: &mut R, now_ms: i64) {
    state.job_contracts = (0..CONTRACT_OFFER_CAP)
        .map(|_| generate_offer(state, rng, now_ms))
        .collect();
    bus.emit(GameEvent::JobBoardUpdated {
        offers: state.job_contracts.len(),
    });
}

/// Top the offer pool back up to size without discarding existing offers.
pub fn top_up_offers<R: Rng>(state: &mut Ledger, bus: &mut EventBus, rng: &mut R, now_ms: i64) {
    if state.job_contracts.len() >= CONTRACT_OFFER_CAP {
        return;
    }
    while state.job_contracts.len() < CONTRACT_OFFER_CAP {
        let offer = generate_offer(state, rng, now_ms);
        state.job_contracts.push(offer);
    }
    bus.emit(GameEvent::JobBoardUpdated {
        offers: state.job_contracts.len(),
    });
}

/// Build the car an accepted contract puts on the floor.
fn spawn_contract_car(state: &mut Ledger, bus: &mut EventBus, contract: &JobContract) {
    let spec = car_spec(&contract.car_id).unwrap_or_else(|| {
        warn!(car_id = %contract.car_id, "contract references unknown car, using starter");
        starter_spec()
    });
    let mut car = Car::from_spec(spec, state.current_tier, contract.repair_multiplier);
    car.contract = Some(ContractTag {
        contract_id: contract.id,
        payout_multiplier: contract.payout_multiplier,
        bonus_xp: contract.bonus_xp,
        expires_at: contract.expires_at.unwrap_or(i64::MAX),
        expired: false,
    });

    if state.current_car.is_none() {
        bus.emit(GameEvent::CarStarted {
            spec_id: car.spec_id.clone(),
            name: car.name.clone(),
        });
        state.current_car = Some(car);
    } else {
        // Contract work jumps the line. The queue cap binds the ambient
        // spawner, not contract insertion.
        bus.emit(GameEvent::CarQueued {
            spec_id: car.spec_id.clone(),
            name: car.name.clone(),
        });
        state.car_queue.push_front(car);
    }
}

/// Accept an open offer. Requires no currently-active contract; removes
/// the offer, stamps the deadline, spawns the tagged car, and immediately
/// refills the board.
pub fn accept_contract<R: Rng>(
    state: &mut Ledger,
    bus: &mut EventBus,
    rng: &mut R,
    contract_id: Uuid,
    now_ms: i64,
) -> AcceptResult {
    if state.active_contract.is_some() {
        bus.emit(GameEvent::Notification {
            message: "Finish or abandon the active contract first".to_string(),
        });
        return AcceptResult::fail("a contract is already active");
    }

    let Some(pos) = state.job_contracts.iter().position(|c| c.id == contract_id) else {
        bus.emit(GameEvent::Notification {
            message: "Contract not found".to_string(),
        });
        return AcceptResult::fail("contract not found");
    };

    let mut contract = state.job_contracts.remove(pos);
    contract.accepted_at = Some(now_ms);
    contract.expires_at = Some(now_ms + contract.duration_ms);

    spawn_contract_car(state, bus, &contract);
    bus.emit(GameEvent::ContractAccepted {
        contract_id: contract.id,
    });
    state.active_contract = Some(contract);

    top_up_offers(state, bus, rng, now_ms);
    AcceptResult::ok()
}

/// Mark every car tagged for a contract as expired, in place.
fn mark_tagged_cars_expired(state: &mut Ledger, contract_id: Uuid) {
    if let Some(car) = state.current_car.as_mut() {
        if let Some(tag) = car.contract.as_mut() {
            if tag.contract_id == contract_id {
                tag.expired = true;
            }
        }
    }
    for car in state.car_queue.iter_mut() {
        if let Some(tag) = car.contract.as_mut() {
            if tag.contract_id == contract_id {
                tag.expired = true;
            }
        }
    }
}

/// Fail the active contract because its deadline passed. The tagged car
/// stays in the garage but a late finish earns no bonus.
fn expire_active_contract(state: &mut Ledger, bus: &mut EventBus) {
    let Some(contract) = state.active_contract.take() else {
        return;
    };
    mark_tagged_cars_expired(state, contract.id);
    state.contracts_failed += 1;
    bus.emit(GameEvent::ContractFailed {
        contract_id: contract.id,
    });
    bus.emit(GameEvent::Notification {
        message: "Contract expired!".to_string(),
    });
}

/// Abandon the active contract: its tagged car is pulled from the floor
/// and the queue, and the contract counts as failed.
pub fn abandon_active_contract(state: &mut Ledger, bus: &mut EventBus) -> bool {
    let Some(contract) = state.active_contract.take() else {
        bus.emit(GameEvent::Notification {
            message: "No active contract to abandon".to_string(),
        });
        return false;
    };

    let was_current = state
        .current_car
        .as_ref()
        .map(|car| car.tagged_for(contract.id))
        .unwrap_or(false);
    if was_current {
        state.current_car = None;
    }
    state.car_queue.retain(|car| !car.tagged_for(contract.id));
    if was_current {
        promote_next_car(state, bus);
    }

    state.contracts_failed += 1;
    bus.emit(GameEvent::ContractFailed {
        contract_id: contract.id,
    });
    bus.emit(GameEvent::Notification {
        message: "Contract abandoned".to_string(),
    });
    true
}

/// Reactive completion path, called by the repair service after it has
/// settled payment for a contract-tagged car. Resolves the active slot
/// when the tag matches it; stale tags from older contracts are ignored.
pub fn resolve_repaired_contract(
    state: &mut Ledger,
    bus: &mut EventBus,
    car: &Car,
    outcome: Option<ContractOutcome>,
    payment: u64,
) {
    let Some(tag) = car.contract.as_ref() else {
        return;
    };
    let matches_active = state
        .active_contract
        .as_ref()
        .map(|active| active.id == tag.contract_id)
        .unwrap_or(false);
    if !matches_active {
        return;
    }

    let contract = state.active_contract.take().expect("checked above");
    match outcome {
        Some(ContractOutcome::Completed) => {
            state.contracts_completed += 1;
            bus.emit(GameEvent::ContractCompleted {
                contract_id: contract.id,
                payment,
            });
        }
        _ => {
            state.contracts_failed += 1;
            bus.emit(GameEvent::ContractFailed {
                contract_id: contract.id,
            });
        }
    }
}

/// Per-tick board update: expire a blown deadline, run the periodic full
/// refresh, and keep the pool topped up (covers the refill after a
/// click-path completion).
pub fn tick_contracts<R: Rng>(
    board: &mut JobBoard,
    state: &mut Ledger,
    bus: &mut EventBus,
    rng: &mut R,
    now_ms: i64,
    dt_ms: f64,
) {
    let deadline_passed = state
        .active_contract
        .as_ref()
        .map(|active| active.is_expired(now_ms))
        .unwrap_or(false);
    if deadline_passed {
        expire_active_contract(state, bus);
    }

    board.refresh_timer_ms += dt_ms;
    if board.refresh_timer_ms >= CONTRACT_REFRESH_MS {
        board.refresh_timer_ms -= CONTRACT_REFRESH_MS;
        refresh_offers(state, bus, rng, now_ms);
    } else {
        top_up_offers(state, bus, rng, now_ms);
    }
}

/// Reconcile contract state after a load. A save can be written at a point
/// where the active contract's tagged car was not persisted consistently,
/// and the deadline may have passed while the game was closed.
pub fn reconcile_after_load<R: Rng>(
    state: &mut Ledger,
    bus: &mut EventBus,
    _rng: &mut R,
    now_ms: i64,
) {
    let Some(active) = state.active_contract.clone() else {
        return;
    };

    if active.is_expired(now_ms) {
        warn!(contract_id = %active.id, "active contract expired while offline, failing it");
        expire_active_contract(state, bus);
        return;
    }

    let referenced = state
        .current_car
        .as_ref()
        .map(|car| car.tagged_for(active.id))
        .unwrap_or(false)
        || state.car_queue.iter().any(|car| car.tagged_for(active.id));
    if !referenced {
        warn!(contract_id = %active.id, "active contract car missing from save, respawning");
        spawn_contract_car(state, bus, &active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cars::queue::spawn_car;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn board_state() -> (Ledger, EventBus, ChaCha8Rng) {
        (Ledger::new(0), EventBus::new(), test_rng())
    }

    #[test]
    fn test_generated_offers_stay_in_tuned_ranges() {
        let (state, _bus, mut rng) = board_state();

        for _ in 0..200 {
            let offer = generate_offer(&state, &mut rng, 1_000);
            // Starter pool: hatchback only (Common, tier 1) so no skew.
            assert_eq!(offer.car_id, "hatchback");
            assert!(offer.payout_multiplier >= CONTRACT_MIN_PAYOUT_MULT);
            assert!(offer.payout_multiplier < CONTRACT_MAX_PAYOUT_MULT);
            assert!(offer.repair_multiplier >= CONTRACT_MIN_REPAIR_MULT);
            assert!(offer.repair_multiplier < CONTRACT_MAX_REPAIR_MULT);
            assert!(offer.duration_ms >= CONTRACT_DURATION_FLOOR_MS as i64);
            assert!(offer.duration_ms <= CONTRACT_MAX_DURATION_MS as i64);
            assert_eq!(offer.bonus_xp, 25); // floor(50 * 0.5)
            assert_eq!(offer.created_at, 1_000);
            assert!(offer.accepted_at.is_none());
        }
    }

    #[test]
    fn test_rarity_and_tier_skew_payout_and_deadline() {
        let (mut state, _bus, mut rng) = board_state();
        state.unlocked_cars.clear();
        state.unlocked_cars.insert("hypercar".to_string());

        for _ in 0..200 {
            let offer = generate_offer(&state, &mut rng, 0);
            // Legendary (rank 4) tier 4: +4*0.1 + 3*0.05 = +0.55 payout.
            assert!(offer.payout_multiplier >= CONTRACT_MIN_PAYOUT_MULT + 0.55);
            // Deadline compressed by (1 - 0.32) * (1 - 0.09).
            let max = CONTRACT_MAX_DURATION_MS * (1.0 - 0.32) * (1.0 - 0.09);
            assert!(offer.duration_ms as f64 <= max);
        }
    }

    #[test]
    fn test_refresh_fills_the_board() {
        let (mut state, mut bus, mut rng) = board_state();

        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        assert_eq!(state.job_contracts.len(), CONTRACT_OFFER_CAP);

        let old_ids: Vec<Uuid> = state.job_contracts.iter().map(|c| c.id).collect();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        assert_eq!(state.job_contracts.len(), CONTRACT_OFFER_CAP);
        assert!(state.job_contracts.iter().all(|c| !old_ids.contains(&c.id)));
    }

    #[test]
    fn test_accept_moves_offer_to_active_and_refills() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;

        let result = accept_contract(&mut state, &mut bus, &mut rng, id, 5_000);

        assert!(result.ok);
        let active = state.active_contract.as_ref().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.accepted_at, Some(5_000));
        assert_eq!(active.expires_at, Some(5_000 + active.duration_ms));
        // The offer left the pool and the pool was refilled.
        assert_eq!(state.job_contracts.len(), CONTRACT_OFFER_CAP);
        assert!(state.job_contracts.iter().all(|c| c.id != id));
        // The tagged car landed on the empty lift.
        let car = state.current_car.as_ref().unwrap();
        assert!(car.tagged_for(id));
    }

    #[test]
    fn test_accept_queues_at_front_when_lift_is_busy() {
        let (mut state, mut bus, mut rng) = board_state();
        state.current_car = Some(Car::from_spec(starter_spec(), 1, 1.0));
        spawn_car(&mut state, &mut bus, &mut rng);
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;

        assert!(accept_contract(&mut state, &mut bus, &mut rng, id, 0).ok);
        assert!(state.car_queue.front().unwrap().tagged_for(id));
    }

    #[test]
    fn test_accept_requires_no_active_contract() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let first = state.job_contracts[0].id;
        let second = state.job_contracts[1].id;

        assert!(accept_contract(&mut state, &mut bus, &mut rng, first, 0).ok);
        let result = accept_contract(&mut state, &mut bus, &mut rng, second, 0);
        assert!(!result.ok);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_accept_unknown_id_fails_without_mutation() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);

        let result = accept_contract(&mut state, &mut bus, &mut rng, Uuid::new_v4(), 0);
        assert!(!result.ok);
        assert!(state.active_contract.is_none());
        assert_eq!(state.job_contracts.len(), CONTRACT_OFFER_CAP);
    }

    #[test]
    fn test_deadline_expiry_fails_contract_and_marks_car() {
        let (mut state, mut bus, mut rng) = board_state();
        let mut board = JobBoard::new();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);
        let deadline = state.active_contract.as_ref().unwrap().expires_at.unwrap();

        // One tick past the deadline.
        tick_contracts(&mut board, &mut state, &mut bus, &mut rng, deadline + 1, 16.0);

        assert!(state.active_contract.is_none());
        assert_eq!(state.contracts_failed, 1);
        let car = state.current_car.as_ref().unwrap();
        assert!(car.contract.as_ref().unwrap().expired);
    }

    #[test]
    fn test_abandon_removes_tagged_car_and_promotes_next() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);
        // Something waiting behind the contract car.
        spawn_car(&mut state, &mut bus, &mut rng);

        assert!(abandon_active_contract(&mut state, &mut bus));

        assert!(state.active_contract.is_none());
        assert_eq!(state.contracts_failed, 1);
        // The waiting car was promoted; no tagged car remains anywhere.
        let car = state.current_car.as_ref().unwrap();
        assert!(car.contract.is_none());
        assert!(state.car_queue.iter().all(|c| c.contract.is_none()));
    }

    #[test]
    fn test_abandon_without_active_returns_false() {
        let (mut state, mut bus, _rng) = board_state();
        assert!(!abandon_active_contract(&mut state, &mut bus));
        assert_eq!(state.contracts_failed, 0);
    }

    #[test]
    fn test_periodic_refresh_replaces_offers() {
        let (mut state, mut bus, mut rng) = board_state();
        let mut board = JobBoard::new();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let old_ids: Vec<Uuid> = state.job_contracts.iter().map(|c| c.id).collect();

        tick_contracts(
            &mut board,
            &mut state,
            &mut bus,
            &mut rng,
            0,
            CONTRACT_REFRESH_MS,
        );

        assert!(state.job_contracts.iter().all(|c| !old_ids.contains(&c.id)));
    }

    #[test]
    fn test_reconcile_fails_contract_expired_while_offline() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);
        let deadline = state.active_contract.as_ref().unwrap().expires_at.unwrap();

        reconcile_after_load(&mut state, &mut bus, &mut rng, deadline + 60_000);

        assert!(state.active_contract.is_none());
        assert_eq!(state.contracts_failed, 1);
    }

    #[test]
    fn test_reconcile_respawns_missing_contract_car() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);

        // Simulate an inconsistent save: the tagged car vanished.
        state.current_car = None;
        state.car_queue.clear();

        reconcile_after_load(&mut state, &mut bus, &mut rng, 1_000);

        assert!(state.active_contract.is_some());
        let car = state.current_car.as_ref().unwrap();
        assert!(car.tagged_for(id));
    }

    #[test]
    fn test_reconcile_leaves_consistent_state_alone() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);
        let before = state.current_car.clone();

        reconcile_after_load(&mut state, &mut bus, &mut rng, 1_000);

        assert_eq!(state.current_car, before);
        assert!(state.active_contract.is_some());
    }

    #[test]
    fn test_stale_tag_does_not_touch_unrelated_active_contract() {
        let (mut state, mut bus, mut rng) = board_state();
        refresh_offers(&mut state, &mut bus, &mut rng, 0);
        let id = state.job_contracts[0].id;
        accept_contract(&mut state, &mut bus, &mut rng, id, 0);

        // A leftover car tagged for some older contract.
        let mut stale = Car::from_spec(starter_spec(), 1, 1.0);
        stale.contract = Some(ContractTag {
            contract_id: Uuid::new_v4(),
            payout_multiplier: 1.5,
            bonus_xp: 5,
            expires_at: i64::MAX,
            expired: false,
        });

        resolve_repaired_contract(
            &mut state,
            &mut bus,
            &stale,
            Some(ContractOutcome::Completed),
            10,
        );

        assert!(state.active_contract.is_some());
        assert_eq!(state.contracts_completed, 0);
    }
}
