use crate::contracts::types::ContractTag;
use crate::core::constants::TIER_SCALE_PER_TIER;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Rarity {
    /// Returns the display name for this rarity.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Numeric rank used by contract skew formulas.
    pub fn rank(&self) -> u32 {
        *self as u32
    }

    /// Relative weight in the spawn roll. Rarer cars appear less often.
    pub fn spawn_weight(&self) -> u32 {
        match self {
            Rarity::Common => 100,
            Rarity::Uncommon => 60,
            Rarity::Rare => 30,
            Rarity::Epic => 12,
            Rarity::Legendary => 5,
        }
    }
}

/// Static catalog entry: the un-scaled identity of a car model.
#[derive(Debug, Clone, Copy)]
pub struct CarSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub repair_cost: f64,
    pub base_value: u64,
    pub rarity: Rarity,
    pub tier: u32,
}

/// Repair cost and value scaling for a garage tier.
pub fn tier_scale(tier: u32) -> f64 {
    1.0 + (tier.saturating_sub(1)) as f64 * TIER_SCALE_PER_TIER
}

/// A car in the garage: catalog identity plus mutable repair progress and
/// an optional contract tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub instance_id: Uuid,
    pub spec_id: String,
    pub name: String,
    /// Effective repair cost after tier and contract scaling.
    pub repair_cost: f64,
    /// Effective sale value after tier scaling.
    pub base_value: u64,
    pub rarity: Rarity,
    pub tier: u32,
    /// Scaling that was applied to `repair_cost` at spawn time. Divided back
    /// out for XP awards, which reflect base difficulty.
    pub tier_scale: f64,
    pub repair_progress: f64,
    pub contract: Option<ContractTag>,
}

impl Car {
    /// Spawn a car from a catalog spec, scaled for the player's tier and an
    /// optional contract repair multiplier.
    pub fn from_spec(spec: &CarSpec, player_tier: u32, repair_multiplier: f64) -> Self {
        let scale = tier_scale(player_tier);
        Self {
            instance_id: Uuid::new_v4(),
            spec_id: spec.id.to_string(),
            name: spec.name.to_string(),
            repair_cost: spec.repair_cost * scale * repair_multiplier,
            base_value: (spec.base_value as f64 * scale).floor() as u64,
            rarity: spec.rarity,
            tier: spec.tier,
            tier_scale: scale,
            repair_progress: 0.0,
            contract: None,
        }
    }

    /// Apply repair work, clamped to the repair cost.
    /// Returns true when the car is now fully repaired.
    pub fn apply_repair(&mut self, amount: f64) -> bool {
        self.repair_progress = (self.repair_progress + amount).min(self.repair_cost);
        self.is_repaired()
    }

    pub fn is_repaired(&self) -> bool {
        self.repair_progress >= self.repair_cost
    }

    /// Repair cost with tier scaling divided back out, for XP awards.
    pub fn base_repair_cost(&self) -> f64 {
        self.repair_cost / self.tier_scale
    }

    /// True if this car belongs to the given contract.
    pub fn tagged_for(&self, contract_id: Uuid) -> bool {
        self.contract
            .as_ref()
            .map(|tag| tag.contract_id == contract_id)
            .unwrap_or(false)
    }
}
