//! XP accumulation, level lookup, tier derivation, and car unlock
//! milestones.
//!
//! Level thresholds are a precomputed cumulative table: going from level N
//! to N+1 costs `floor(100 * 1.15^(N-1))` XP, so reaching level N needs the
//! sum of all cheaper steps. The table is monotonic, which makes the level
//! lookup a binary search.

use crate::cars::unlocks_for_level;
use crate::core::constants::{
    LEVELS_PER_TIER, MAX_GARAGE_LEVEL, XP_CURVE_BASE, XP_CURVE_GROWTH,
};
use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;
use std::sync::OnceLock;

/// Cumulative XP required to reach each level. `table[i]` is the threshold
/// for level `i + 1`; `table[0]` is 0.
fn xp_thresholds() -> &'static [u64] {
    static TABLE: OnceLock<Vec<u64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Vec::with_capacity(MAX_GARAGE_LEVEL as usize);
        let mut cumulative = 0u64;
        table.push(0);
        for level in 1..MAX_GARAGE_LEVEL {
            cumulative += (XP_CURVE_BASE * XP_CURVE_GROWTH.powi(level as i32 - 1)).floor() as u64;
            table.push(cumulative);
        }
        table
    })
}

/// Cumulative XP needed to reach a level. Levels past the table cap cost
/// the same as the cap.
pub fn xp_to_reach_level(level: u32) -> u64 {
    let table = xp_thresholds();
    let idx = (level.clamp(1, MAX_GARAGE_LEVEL) - 1) as usize;
    table[idx]
}

/// The largest level whose cumulative threshold is at or below `xp`.
pub fn level_for_xp(xp: u64) -> u32 {
    let table = xp_thresholds();
    // partition_point counts thresholds <= xp; table[0] = 0 guarantees >= 1.
    table.partition_point(|&threshold| threshold <= xp) as u32
}

/// Difficulty tier for a garage level: one band per ten levels.
pub fn tier_for_level(level: u32) -> u32 {
    (level.saturating_sub(1)) / LEVELS_PER_TIER + 1
}

/// Award XP, recompute the level, and unlock any newly reached cars.
///
/// The raw amount is scaled by the ledger's XP multiplier and floored.
/// Emits XP/level-up/tier-up/car-unlocked events; tier-up fires only when
/// the tier actually changes and unlock events only for ids not already in
/// the unlocked set.
pub fn award_xp(state: &mut Ledger, bus: &mut EventBus, raw_xp: f64) -> u64 {
    let gained = (raw_xp * state.xp_multiplier).floor() as u64;
    if gained == 0 {
        return 0;
    }

    state.garage_xp += gained;
    bus.emit(GameEvent::XpEarned {
        amount: gained,
        total: state.garage_xp,
    });

    let new_level = level_for_xp(state.garage_xp);
    if new_level > state.garage_level {
        let old_level = state.garage_level;
        state.garage_level = new_level;
        bus.emit(GameEvent::LevelUp { level: new_level });

        let new_tier = tier_for_level(new_level);
        if new_tier != state.current_tier {
            state.current_tier = new_tier;
            bus.emit(GameEvent::TierUp { tier: new_tier });
        }

        for level in old_level + 1..=new_level {
            unlock_cars_for_level(state, bus, level);
        }
    }

    gained
}

/// Insert the milestone cars for one level into the unlocked set,
/// announcing only genuinely new ids.
pub fn unlock_cars_for_level(state: &mut Ledger, bus: &mut EventBus, level: u32) {
    for id in unlocks_for_level(level) {
        if state.unlocked_cars.insert((*id).to_string()) {
            bus.emit(GameEvent::CarUnlocked {
                spec_id: (*id).to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventKind;

    #[test]
    fn test_thresholds_start_at_zero_then_one_hundred() {
        // Level 1 is free; level 2 costs floor(100 * 1.15^0) = 100.
        assert_eq!(xp_to_reach_level(1), 0);
        assert_eq!(xp_to_reach_level(2), 100);
        // Level 3 adds floor(100 * 1.15^1) = 115.
        assert_eq!(xp_to_reach_level(3), 215);
    }

    #[test]
    fn test_level_boundary_at_exactly_one_hundred() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(214), 2);
        assert_eq!(level_for_xp(215), 3);
    }

    #[test]
    fn test_level_caps_at_table_end() {
        assert_eq!(level_for_xp(u64::MAX), MAX_GARAGE_LEVEL);
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        for level in 2..=MAX_GARAGE_LEVEL {
            assert!(xp_to_reach_level(level) > xp_to_reach_level(level - 1));
        }
    }

    #[test]
    fn test_tier_bands() {
        assert_eq!(tier_for_level(1), 1);
        assert_eq!(tier_for_level(10), 1);
        assert_eq!(tier_for_level(11), 2);
        assert_eq!(tier_for_level(20), 2);
        assert_eq!(tier_for_level(21), 3);
    }

    #[test]
    fn test_award_xp_levels_up_and_unlocks() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();

        // 99 XP keeps level 1; 1 more flips to level 2.
        award_xp(&mut state, &mut bus, 99.0);
        assert_eq!(state.garage_level, 1);
        award_xp(&mut state, &mut bus, 1.0);
        assert_eq!(state.garage_level, 2);

        let kinds: Vec<EventKind> = bus.drain().iter().map(|e| e.kind()).collect();
        assert!(kinds.contains(&EventKind::LevelUp));
        // Level 2 crosses no tier boundary and no unlock milestone.
        assert!(!kinds.contains(&EventKind::TierUp));
        assert!(!kinds.contains(&EventKind::CarUnlocked));
    }

    #[test]
    fn test_award_xp_respects_multiplier() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();
        state.xp_multiplier = 2.0;

        let gained = award_xp(&mut state, &mut bus, 50.0);
        assert_eq!(gained, 100);
        assert_eq!(state.garage_level, 2);
    }

    #[test]
    fn test_multi_level_jump_unlocks_every_milestone() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();

        // Enough XP to blow past level 5 in one award.
        award_xp(&mut state, &mut bus, xp_to_reach_level(6) as f64);

        assert!(state.garage_level >= 5);
        assert!(state.unlocked_cars.contains("sedan"));
        assert!(state.unlocked_cars.contains("coupe"));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();

        unlock_cars_for_level(&mut state, &mut bus, 3);
        bus.drain();
        unlock_cars_for_level(&mut state, &mut bus, 3);

        // Second call announces nothing.
        assert_eq!(bus.pending(), 0);
    }
}
