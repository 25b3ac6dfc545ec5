//! Achievement definitions and unlock tracking.
//!
//! Unlocks live in the ledger as id -> timestamp; presence means unlocked.
//! Checks run after the per-tick update so a single pass sees every
//! transition the tick produced. Achievements do not survive prestige.

use crate::core::events::{EventBus, GameEvent};
use crate::core::ledger::Ledger;

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub static ACHIEVEMENT_DEFS: &[AchievementDef] = &[
    AchievementDef {
        id: "first-repair",
        name: "Grease on Your Hands",
        description: "Repair your first car",
    },
    AchievementDef {
        id: "fifty-repairs",
        name: "Production Line",
        description: "Repair 50 cars",
    },
    AchievementDef {
        id: "century-club",
        name: "Century Club",
        description: "Repair 100 cars",
    },
    AchievementDef {
        id: "click-happy",
        name: "Click Happy",
        description: "Click 1,000 times",
    },
    AchievementDef {
        id: "level-five",
        name: "Neighborhood Garage",
        description: "Reach garage level 5",
    },
    AchievementDef {
        id: "level-ten",
        name: "Main Street Garage",
        description: "Reach garage level 10",
    },
    AchievementDef {
        id: "level-twenty-five",
        name: "Regional Powerhouse",
        description: "Reach garage level 25",
    },
    AchievementDef {
        id: "first-crew",
        name: "Not Alone Anymore",
        description: "Hire your first worker",
    },
    AchievementDef {
        id: "dealmaker",
        name: "Dealmaker",
        description: "Complete 5 contracts",
    },
    AchievementDef {
        id: "hundred-grand",
        name: "Hundred Grand",
        description: "Earn 100,000 cash in one run",
    },
    AchievementDef {
        id: "ascended",
        name: "Ascended",
        description: "Prestige for the first time",
    },
];

/// Look up an achievement definition.
pub fn achievement_def(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENT_DEFS.iter().find(|def| def.id == id)
}

fn is_earned(id: &str, state: &Ledger) -> bool {
    match id {
        "first-repair" => state.cars_repaired >= 1,
        "fifty-repairs" => state.cars_repaired >= 50,
        "century-club" => state.cars_repaired >= 100,
        "click-happy" => state.total_clicks >= 1_000,
        "level-five" => state.garage_level >= 5,
        "level-ten" => state.garage_level >= 10,
        "level-twenty-five" => state.garage_level >= 25,
        "first-crew" => !state.workers.is_empty(),
        "dealmaker" => state.contracts_completed >= 5,
        "hundred-grand" => state.total_earned >= 100_000,
        "ascended" => state.total_prestige_earned >= 1,
        _ => false,
    }
}

/// Unlock anything newly earned, stamping the unlock time. Idempotent:
/// already-unlocked ids are never re-announced.
pub fn check_achievements(state: &mut Ledger, bus: &mut EventBus, now_ms: i64) {
    for def in ACHIEVEMENT_DEFS {
        if state.achievements.contains_key(def.id) {
            continue;
        }
        if is_earned(def.id, state) {
            state.achievements.insert(def.id.to_string(), now_ms);
            bus.emit(GameEvent::AchievementUnlocked {
                id: def.id.to_string(),
            });
            bus.emit(GameEvent::Notification {
                message: format!("Achievement unlocked: {}", def.name),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventKind;

    #[test]
    fn test_fresh_run_has_no_achievements() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();

        check_achievements(&mut state, &mut bus, 0);
        assert!(state.achievements.is_empty());
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_unlock_records_timestamp_and_announces_once() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();
        state.cars_repaired = 1;

        check_achievements(&mut state, &mut bus, 12_345);
        assert_eq!(state.achievements.get("first-repair"), Some(&12_345));

        let unlocks = bus
            .drain()
            .iter()
            .filter(|e| e.kind() == EventKind::AchievementUnlocked)
            .count();
        assert_eq!(unlocks, 1);

        // A second pass stays quiet.
        check_achievements(&mut state, &mut bus, 99_999);
        assert_eq!(state.achievements.get("first-repair"), Some(&12_345));
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_thresholds_cover_counters() {
        let mut state = Ledger::new(0);
        let mut bus = EventBus::new();
        state.cars_repaired = 100;
        state.total_clicks = 1_000;
        state.garage_level = 25;
        state.contracts_completed = 5;
        state.total_earned = 100_000;

        check_achievements(&mut state, &mut bus, 0);

        for id in [
            "first-repair",
            "fifty-repairs",
            "century-club",
            "click-happy",
            "level-five",
            "level-ten",
            "level-twenty-five",
            "dealmaker",
            "hundred-grand",
        ] {
            assert!(state.achievements.contains_key(id), "{id} should unlock");
        }
        assert!(!state.achievements.contains_key("first-crew"));
        assert!(!state.achievements.contains_key("ascended"));
    }

    #[test]
    fn test_every_def_has_a_condition() {
        let mut state = Ledger::new(0);
        // Saturate every counter the conditions read.
        state.cars_repaired = u64::MAX;
        state.total_clicks = u64::MAX;
        state.garage_level = u32::MAX;
        state.contracts_completed = u32::MAX;
        state.total_earned = u64::MAX;
        state.total_prestige_earned = u64::MAX;
        state.workers.push(crate::workers::Worker::new("apprentice", 0));

        for def in ACHIEVEMENT_DEFS {
            assert!(is_earned(def.id, &state), "{} has no condition", def.id);
        }
    }
}
