//! Closed-form offline progress estimate.
//!
//! Time away from the game is settled in one step, not replayed through
//! the per-tick paths: a capped duration at reduced efficiency converts
//! directly into estimated cars repaired and earnings. This is an explicit
//! approximation - it assumes a rough average car repair cost and value
//! rather than the player's actual unlocked-car distribution, and it
//! deliberately stays that way.

use crate::core::constants::{
    MAX_OFFLINE_MS, OFFLINE_AVG_CAR_VALUE, OFFLINE_AVG_REPAIR_COST, OFFLINE_EFFICIENCY,
};

/// What an offline gap was worth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfflineEstimate {
    pub earnings: u64,
    pub cars_repaired: u64,
    /// Elapsed time actually credited, after the cap and efficiency.
    pub effective_ms: f64,
}

/// Estimate progress for a gap of `elapsed_ms`.
///
/// Pure function: the persistence collaborator calls this once on load and
/// applies the earnings through the ledger's credit path. Pass
/// `income_multiplier` = 1.0 when crediting through `add_currency`, which
/// applies the income and prestige multipliers itself.
pub fn estimate_offline_progress(
    elapsed_ms: f64,
    auto_repair_rate: f64,
    car_value_multiplier: f64,
    income_multiplier: f64,
) -> OfflineEstimate {
    if elapsed_ms <= 0.0 || auto_repair_rate <= 0.0 {
        return OfflineEstimate::default();
    }

    let effective_ms = elapsed_ms.min(MAX_OFFLINE_MS) * OFFLINE_EFFICIENCY;
    let repair_points = auto_repair_rate * effective_ms / 1000.0;
    let cars_repaired = (repair_points / OFFLINE_AVG_REPAIR_COST).floor() as u64;
    let earnings = (cars_repaired as f64
        * OFFLINE_AVG_CAR_VALUE
        * car_value_multiplier
        * income_multiplier)
        .floor() as u64;

    OfflineEstimate {
        earnings,
        cars_repaired,
        effective_ms,
    }
}
