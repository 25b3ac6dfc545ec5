//! Shared balance constants for the whole engine.
//!
//! All tuning numbers live here. Change once, test everywhere. The contract
//! and spawn-interval bonus formulas are tuned values, not derived ones.

// =============================================================================
// TIMING
// =============================================================================

/// Fixed simulation step in milliseconds (60 Hz).
pub const TICK_STEP_MS: f64 = 1000.0 / 60.0;

/// Largest wall-clock slice a single frame may contribute to the
/// accumulator. Anything beyond this is dropped to avoid a catch-up spiral.
pub const MAX_FRAME_MS: f64 = 250.0;

// =============================================================================
// CLICKS & COMBO
// =============================================================================

/// Click power before any upgrades.
pub const BASE_CLICK_POWER: f64 = 1.0;

/// Combo multiplier cap before meta-upgrade bonuses.
pub const COMBO_MAX: f64 = 3.0;

/// Combo gained per rapid click before meta-upgrade bonuses.
pub const COMBO_GAIN_PER_CLICK: f64 = 0.1;

/// Two clicks further apart than this reset the combo.
pub const COMBO_TIMEOUT_MS: f64 = 2000.0;

/// Combo lost per second while no click lands inside the timeout window.
pub const COMBO_DECAY_PER_SECOND: f64 = 0.5;

/// Extra payout per combo point above 1 when a click finishes a car.
pub const COMBO_PAYOUT_BONUS_RATE: f64 = 0.5;

// =============================================================================
// CAR QUEUE
// =============================================================================

/// Maximum number of cars waiting behind the current one.
pub const CAR_QUEUE_CAP: usize = 5;

/// Spawn interval with no workers and no upgrades, in milliseconds.
pub const BASE_SPAWN_INTERVAL_MS: f64 = 30_000.0;

/// Spawn interval floor, in milliseconds.
pub const MIN_SPAWN_INTERVAL_MS: f64 = 5_000.0;

/// Spawn-interval reduction per owned worker.
pub const WORKER_SPAWN_BONUS_PER_WORKER: f64 = 0.05;

/// Cap on the total worker spawn-interval reduction (75%).
pub const WORKER_SPAWN_BONUS_CAP: f64 = 0.75;

/// Floor for the spawn-interval multiplier from upgrades.
pub const SPAWN_MULTIPLIER_FLOOR: f64 = 0.25;

/// Repair cost and value scaling per tier above the first.
pub const TIER_SCALE_PER_TIER: f64 = 0.25;

// =============================================================================
// PROGRESSION
// =============================================================================

/// XP needed for level N is `floor(XP_CURVE_BASE * XP_CURVE_GROWTH^(N-1))`,
/// summed cumulatively.
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_GROWTH: f64 = 1.15;

/// Highest garage level in the cumulative XP table.
pub const MAX_GARAGE_LEVEL: u32 = 100;

/// XP awarded per point of pre-tier-scaling repair cost.
pub const XP_PER_REPAIR_COST: f64 = 0.5;

/// Levels per tier band.
pub const LEVELS_PER_TIER: u32 = 10;

// =============================================================================
// CONTRACTS
// =============================================================================

/// Open offers held on the job board.
pub const CONTRACT_OFFER_CAP: usize = 3;

/// Full offer replacement cadence, in milliseconds.
pub const CONTRACT_REFRESH_MS: f64 = 60_000.0;

/// Contract deadline range before rarity/tier compression, in milliseconds.
pub const CONTRACT_MIN_DURATION_MS: f64 = 90_000.0;
pub const CONTRACT_MAX_DURATION_MS: f64 = 240_000.0;

/// Deadline floor after compression, in milliseconds.
pub const CONTRACT_DURATION_FLOOR_MS: f64 = 30_000.0;

/// Deadline compression per rarity rank and per tier above the first.
pub const CONTRACT_RARITY_DEADLINE_COMPRESSION: f64 = 0.08;
pub const CONTRACT_TIER_DEADLINE_COMPRESSION: f64 = 0.03;

/// Payout multiplier range before rarity/tier skew.
pub const CONTRACT_MIN_PAYOUT_MULT: f64 = 1.2;
pub const CONTRACT_MAX_PAYOUT_MULT: f64 = 2.0;

/// Payout skew per rarity rank and per tier above the first.
pub const CONTRACT_RARITY_PAYOUT_BONUS: f64 = 0.1;
pub const CONTRACT_TIER_PAYOUT_BONUS: f64 = 0.05;

/// Repair-cost multiplier range for contract cars.
pub const CONTRACT_MIN_REPAIR_MULT: f64 = 0.8;
pub const CONTRACT_MAX_REPAIR_MULT: f64 = 1.5;

/// Flat bonus XP per point of the underlying car's base repair cost.
pub const CONTRACT_BONUS_XP_RATE: f64 = 0.5;

// =============================================================================
// PRESTIGE
// =============================================================================

/// Lifetime earnings needed before the first nip becomes claimable.
pub const PRESTIGE_BASE_THRESHOLD: u64 = 1_000_000;

/// Permanent income multiplier per lifetime nip earned.
pub const PRESTIGE_MULT_PER_NIP: f64 = 0.1;

// =============================================================================
// OFFLINE PROGRESS
// =============================================================================

/// Offline credit is capped at this many milliseconds (8 hours).
pub const MAX_OFFLINE_MS: f64 = 8.0 * 60.0 * 60.0 * 1000.0;

/// Offline efficiency relative to active play.
pub const OFFLINE_EFFICIENCY: f64 = 0.5;

/// Rough average repair cost and sale value across the car pool, used by the
/// closed-form offline estimate. These are deliberately static assumptions,
/// not the player's actual unlocked-car distribution.
pub const OFFLINE_AVG_REPAIR_COST: f64 = 75.0;
pub const OFFLINE_AVG_CAR_VALUE: f64 = 40.0;

// =============================================================================
// SAVE FORMAT
// =============================================================================

/// Current save payload version.
pub const SAVE_VERSION: u32 = 1;

/// "CHOPSHOP" magic for the binary save envelope.
pub const SAVE_MAGIC: u64 = 0x43484F5053484F50;
