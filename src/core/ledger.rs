//! The economy ledger: the single mutable aggregate owning all progress
//! data.
//!
//! Every sub-engine mutates state through the methods here (or through the
//! pub fields, within this crate). Derived fields (multipliers, click
//! power, the aggregate auto-repair rate) are never authoritative: they
//! are rebuilt from upgrade levels by [`Ledger::recalculate_stats`], which
//! is idempotent and safe to call at any time. Persisting them would
//! invite drift, so the save payload excludes them.

use crate::cars::{Car, STARTER_CAR_ID};
use crate::contracts::types::JobContract;
use crate::core::constants::{
    BASE_CLICK_POWER, PRESTIGE_MULT_PER_NIP, SPAWN_MULTIPLIER_FLOOR,
};
use crate::core::events::{EventBus, GameEvent};
use crate::shop;
use crate::shop::UpgradeEffect;
use crate::workers::{worker_kind, Worker};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone)]
pub struct Ledger {
    // -- Currency --
    pub currency: u64,
    pub total_earned: u64,
    pub total_spent: u64,
    /// Monotonic across the whole profile; survives prestige.
    pub lifetime_earnings: u64,

    // -- Clicks --
    pub total_clicks: u64,

    // -- Derived stats (rebuilt by recalculate_stats, never persisted) --
    pub click_power: f64,
    pub car_value_bonus: f64,
    pub income_multiplier: f64,
    pub click_power_multiplier: f64,
    pub auto_repair_multiplier: f64,
    pub queue_spawn_multiplier: f64,
    pub xp_multiplier: f64,
    pub combo_max_bonus: f64,
    pub combo_gain_bonus: f64,
    /// Additive click power from upgrades, before the multiplier.
    pub click_power_base_bonus: f64,
    /// Aggregate worker throughput per second, multiplier included.
    pub auto_repair_rate: f64,
    pub prestige_multiplier: f64,

    // -- Upgrades (two independent namespaces) --
    pub upgrades: BTreeMap<String, u32>,
    pub nip_upgrades: BTreeMap<String, u32>,

    // -- Achievements: id -> unlock timestamp (unix ms) --
    pub achievements: BTreeMap<String, i64>,

    // -- Workers --
    pub workers: Vec<Worker>,
    /// Owned count per worker kind, kept alongside the roster for cost
    /// lookups.
    pub worker_counts: BTreeMap<String, u32>,

    // -- Cars --
    pub current_car: Option<Car>,
    pub car_queue: VecDeque<Car>,

    // -- Contracts --
    pub job_contracts: Vec<JobContract>,
    pub active_contract: Option<JobContract>,
    pub contracts_completed: u32,
    pub contracts_failed: u32,

    // -- Progression --
    pub garage_xp: u64,
    pub garage_level: u32,
    pub current_tier: u32,
    pub unlocked_cars: BTreeSet<String>,
    pub cars_repaired: u64,
    /// Unix ms of the most recent completed repair.
    pub last_repair_at: i64,

    // -- Prestige --
    pub prestige_currency: u64,
    /// Lifetime nip ever claimed; survives prestige and drives the
    /// permanent multiplier.
    pub total_prestige_earned: u64,

    // -- Timing --
    pub session_start: i64,
    pub play_time_seconds: u64,
}

impl Ledger {
    /// A fresh run: no money, level 1, only the starter car unlocked.
    pub fn new(now_ms: i64) -> Self {
        let mut unlocked = BTreeSet::new();
        unlocked.insert(STARTER_CAR_ID.to_string());

        let mut state = Self {
            currency: 0,
            total_earned: 0,
            total_spent: 0,
            lifetime_earnings: 0,
            total_clicks: 0,
            click_power: BASE_CLICK_POWER,
            car_value_bonus: 0.0,
            income_multiplier: 1.0,
            click_power_multiplier: 1.0,
            auto_repair_multiplier: 1.0,
            queue_spawn_multiplier: 1.0,
            xp_multiplier: 1.0,
            combo_max_bonus: 0.0,
            combo_gain_bonus: 0.0,
            click_power_base_bonus: 0.0,
            auto_repair_rate: 0.0,
            prestige_multiplier: 1.0,
            upgrades: BTreeMap::new(),
            nip_upgrades: BTreeMap::new(),
            achievements: BTreeMap::new(),
            workers: Vec::new(),
            worker_counts: BTreeMap::new(),
            current_car: None,
            car_queue: VecDeque::new(),
            job_contracts: Vec::new(),
            active_contract: None,
            contracts_completed: 0,
            contracts_failed: 0,
            garage_xp: 0,
            garage_level: 1,
            current_tier: 1,
            unlocked_cars: unlocked,
            cars_repaired: 0,
            last_repair_at: 0,
            prestige_currency: 0,
            total_prestige_earned: 0,
            session_start: now_ms,
            play_time_seconds: 0,
        };
        state.recalculate_stats();
        state
    }

    /// Reinitialize every field to new-run defaults. The prestige engine
    /// calls this and then restores the fields that survive.
    pub fn reset(&mut self, now_ms: i64) {
        *self = Ledger::new(now_ms);
    }

    // ------------------------------------------------------------------
    // Currency
    // ------------------------------------------------------------------

    /// Pure affordability predicate for the spendable currency.
    pub fn can_afford(&self, amount: u64) -> bool {
        self.currency >= amount
    }

    /// Credit income. The amount is scaled by the income and prestige
    /// multipliers and floored to whole currency.
    ///
    /// Returns the credited amount; callers with amount-dependent follow-up
    /// logic (contract bonus tracking, offline reports) must use the return
    /// value, not their input.
    pub fn add_currency(&mut self, amount: f64, bus: &mut EventBus) -> u64 {
        let credited = (amount * self.income_multiplier * self.prestige_multiplier).floor() as u64;
        self.currency += credited;
        self.total_earned += credited;
        self.lifetime_earnings += credited;

        bus.emit(GameEvent::CurrencyEarned { amount: credited });
        bus.emit(GameEvent::CurrencyChanged {
            balance: self.currency,
        });
        credited
    }

    /// Atomic spend: fails without mutation when the balance is short.
    pub fn spend_currency(&mut self, amount: u64, bus: &mut EventBus) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.currency -= amount;
        self.total_spent += amount;

        bus.emit(GameEvent::CurrencySpent {
            amount,
            balance: self.currency,
        });
        bus.emit(GameEvent::CurrencyChanged {
            balance: self.currency,
        });
        true
    }

    /// Atomic spend from the prestige balance.
    pub fn spend_prestige_currency(&mut self, amount: u64, bus: &mut EventBus) -> bool {
        if self.prestige_currency < amount {
            return false;
        }
        self.prestige_currency -= amount;
        bus.emit(GameEvent::PrestigeCurrencyChanged {
            balance: self.prestige_currency,
        });
        true
    }

    // ------------------------------------------------------------------
    // Derived stats
    // ------------------------------------------------------------------

    /// Effective sale multiplier from the additive car-value bonus.
    pub fn car_value_multiplier(&self) -> f64 {
        1.0 + self.car_value_bonus
    }

    /// Total owned workers across all kinds.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Apply a single upgrade effect to the accumulators. Used by the full
    /// recalculation and by incremental cash purchases; both paths must
    /// stay equivalent, so this is the only place effects are interpreted.
    pub fn apply_upgrade_effect(&mut self, effect: UpgradeEffect) {
        match effect {
            UpgradeEffect::ClickPowerAdd(v) => self.click_power_base_bonus += v,
            UpgradeEffect::CarValueBonus(v) => self.car_value_bonus += v,
            UpgradeEffect::IncomeMultiplier(v) => self.income_multiplier *= v,
            UpgradeEffect::ClickPowerMultiplier(v) => self.click_power_multiplier *= v,
            UpgradeEffect::AutoRepairMultiplier(v) => self.auto_repair_multiplier *= v,
            UpgradeEffect::ComboMaxAdd(v) => self.combo_max_bonus += v,
            UpgradeEffect::ComboGainAdd(v) => self.combo_gain_bonus += v,
            UpgradeEffect::SpawnIntervalMultiplier(v) => self.queue_spawn_multiplier *= v,
            UpgradeEffect::XpMultiplier(v) => self.xp_multiplier *= v,
        }
    }

    /// Recompute the values that depend on the accumulators: click power,
    /// the prestige multiplier, the aggregate worker rate, and the
    /// spawn-interval floor.
    pub fn finalize_derived(&mut self) {
        self.queue_spawn_multiplier = self.queue_spawn_multiplier.max(SPAWN_MULTIPLIER_FLOOR);
        self.click_power =
            (BASE_CLICK_POWER + self.click_power_base_bonus) * self.click_power_multiplier;
        self.prestige_multiplier =
            1.0 + PRESTIGE_MULT_PER_NIP * self.total_prestige_earned as f64;

        let base_rate: f64 = self
            .workers
            .iter()
            .filter_map(|w| worker_kind(&w.kind_id))
            .map(|kind| kind.repair_rate)
            .sum();
        self.auto_repair_rate = base_rate * self.auto_repair_multiplier;
    }

    /// Rebuild every derived stat from scratch: reset each accumulator to
    /// its baseline, then replay every owned upgrade level: cash upgrades
    /// first, then nip upgrades, each effect applied exactly `level` times.
    ///
    /// Idempotent, and the single source of truth for derived numbers:
    /// called after any load, any prestige, and any nip purchase.
    pub fn recalculate_stats(&mut self) {
        self.car_value_bonus = 0.0;
        self.income_multiplier = 1.0;
        self.click_power_multiplier = 1.0;
        self.auto_repair_multiplier = 1.0;
        self.queue_spawn_multiplier = 1.0;
        self.xp_multiplier = 1.0;
        self.combo_max_bonus = 0.0;
        self.combo_gain_bonus = 0.0;
        self.click_power_base_bonus = 0.0;

        for def in shop::UPGRADE_CATALOG {
            let level = self.upgrades.get(def.id).copied().unwrap_or(0);
            for _ in 0..level {
                self.apply_upgrade_effect(def.effect);
            }
        }
        for def in shop::NIP_UPGRADE_CATALOG {
            let level = self.nip_upgrades.get(def.id).copied().unwrap_or(0);
            for _ in 0..level {
                self.apply_upgrade_effect(def.effect);
            }
        }

        self.finalize_derived();
    }
}
