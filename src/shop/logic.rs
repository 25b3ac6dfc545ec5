//! Cost curves and purchase validation for both shops.
//!
//! Cash purchases apply their single effect incrementally; nip purchases
//! trigger a full recalculation because they move multiplier baselines.
//! Both paths must land on the same numbers a full replay would produce.

use super::data::{nip_upgrade, upgrade};
use super::types::UpgradeDef;
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;

/// Cost of the next level when `level` are already owned:
/// `floor(base_cost * cost_growth^level)`.
pub fn cost_at(def: &UpgradeDef, level: u32) -> u64 {
    (def.base_cost as f64 * def.cost_growth.powi(level as i32)).floor() as u64
}

/// Next-level cost of a cash upgrade. Unknown or maxed-out ids price at
/// `u64::MAX` so affordability checks fail without a special case.
pub fn upgrade_cost(state: &Ledger, id: &str) -> u64 {
    match upgrade(id) {
        Some(def) => {
            let level = state.upgrades.get(id).copied().unwrap_or(0);
            if level >= def.max_level {
                u64::MAX
            } else {
                cost_at(def, level)
            }
        }
        None => u64::MAX,
    }
}

/// Next-level cost of a nip upgrade, with the same sentinel rules.
pub fn nip_upgrade_cost(state: &Ledger, id: &str) -> u64 {
    match nip_upgrade(id) {
        Some(def) => {
            let level = state.nip_upgrades.get(id).copied().unwrap_or(0);
            if level >= def.max_level {
                u64::MAX
            } else {
                cost_at(def, level)
            }
        }
        None => u64::MAX,
    }
}

/// Buy one level of a cash upgrade. Atomic: spend, then increment the
/// level, then apply the effect incrementally.
pub fn purchase_upgrade(state: &mut Ledger, bus: &mut EventBus, id: &str) -> bool {
    let Some(def) = upgrade(id) else {
        bus.emit(GameEvent::Notification {
            message: format!("Unknown upgrade: {id}"),
        });
        return false;
    };

    let level = state.upgrades.get(id).copied().unwrap_or(0);
    if level >= def.max_level {
        bus.emit(GameEvent::Notification {
            message: format!("{} is already maxed out", def.name),
        });
        return false;
    }

    let cost = cost_at(def, level);
    if !state.spend_currency(cost, bus) {
        bus.emit(GameEvent::Notification {
            message: format!("Not enough cash for {}", def.name),
        });
        return false;
    }

    state.upgrades.insert(id.to_string(), level + 1);
    state.apply_upgrade_effect(def.effect);
    state.finalize_derived();

    bus.emit(GameEvent::UpgradePurchased {
        id: id.to_string(),
        level: level + 1,
        cost,
    });
    true
}

/// Buy one level of a nip upgrade with prestige currency, then rebuild
/// every derived stat.
pub fn purchase_nip_upgrade(state: &mut Ledger, bus: &mut EventBus, id: &str) -> bool {
    let Some(def) = nip_upgrade(id) else {
        bus.emit(GameEvent::Notification {
            message: format!("Unknown nip upgrade: {id}"),
        });
        return false;
    };

    let level = state.nip_upgrades.get(id).copied().unwrap_or(0);
    if level >= def.max_level {
        bus.emit(GameEvent::Notification {
            message: format!("{} is already maxed out", def.name),
        });
        return false;
    }

    let cost = cost_at(def, level);
    if !state.spend_prestige_currency(cost, bus) {
        bus.emit(GameEvent::Notification {
            message: format!("Not enough nip for {}", def.name),
        });
        return false;
    }

    state.nip_upgrades.insert(id.to_string(), level + 1);
    state.recalculate_stats();

    bus.emit(GameEvent::NipUpgradePurchased {
        id: id.to_string(),
        level: level + 1,
        cost,
    });
    true
}
