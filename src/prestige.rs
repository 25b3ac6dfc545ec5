//! Prestige ("ascension"): converting lifetime earnings into permanent
//! meta-currency and performing the reset-with-carryover.

use crate::core::constants::PRESTIGE_BASE_THRESHOLD;
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use tracing::debug;

/// Nip claimable right now.
///
/// Below the base threshold nothing is claimable. Above it the lifetime
/// total converts to `floor(sqrt(lifetime / threshold))` nip, minus what
/// has already been claimed, so the result is monotonic in lifetime
/// earnings and never negative.
pub fn calculate_claimable_nip(lifetime_earnings: u64, total_prestige_earned: u64) -> u64 {
    if lifetime_earnings < PRESTIGE_BASE_THRESHOLD {
        return 0;
    }
    let total = (lifetime_earnings as f64 / PRESTIGE_BASE_THRESHOLD as f64)
        .sqrt()
        .floor() as u64;
    total.saturating_sub(total_prestige_earned)
}

/// Perform the prestige reset. No-op returning `false` when nothing is
/// claimable.
///
/// Exactly four things survive: the nip balance (plus the new claim), the
/// lifetime nip total, owned nip upgrade levels, and lifetime earnings
/// (so future claims stay cumulative). Everything else returns to
/// run-start defaults, after which a full stat recalculation re-applies
/// the nip upgrade effects to the fresh run.
pub fn perform_prestige(state: &mut Ledger, bus: &mut EventBus, now_ms: i64) -> bool {
    let claimable = calculate_claimable_nip(state.lifetime_earnings, state.total_prestige_earned);
    if claimable == 0 {
        bus.emit(GameEvent::Notification {
            message: "Nothing to claim yet - keep earning!".to_string(),
        });
        return false;
    }

    let prestige_currency = state.prestige_currency + claimable;
    let total_prestige_earned = state.total_prestige_earned + claimable;
    let nip_upgrades = std::mem::take(&mut state.nip_upgrades);
    let lifetime_earnings = state.lifetime_earnings;

    state.reset(now_ms);
    state.prestige_currency = prestige_currency;
    state.total_prestige_earned = total_prestige_earned;
    state.nip_upgrades = nip_upgrades;
    state.lifetime_earnings = lifetime_earnings;
    state.recalculate_stats();

    debug!(claimable, total_prestige_earned, "prestige reset");
    bus.emit(GameEvent::PrestigeCurrencyChanged {
        balance: state.prestige_currency,
    });
    bus.emit(GameEvent::GameReset);
    bus.emit(GameEvent::Notification {
        message: format!("Ascended! +{claimable} nip"),
    });
    true
}
