//! Static upgrade catalogs for both currencies.

use super::types::{UpgradeDef, UpgradeEffect};

/// Cash upgrades. Lost on prestige.
pub static UPGRADE_CATALOG: &[UpgradeDef] = &[
    UpgradeDef {
        id: "better-wrench",
        name: "Better Wrench",
        base_cost: 50,
        cost_growth: 1.35,
        max_level: 50,
        effect: UpgradeEffect::ClickPowerAdd(1.0),
    },
    UpgradeDef {
        id: "premium-parts",
        name: "Premium Parts",
        base_cost: 150,
        cost_growth: 1.4,
        max_level: 30,
        effect: UpgradeEffect::CarValueBonus(0.10),
    },
    UpgradeDef {
        id: "hydraulic-lift",
        name: "Hydraulic Lift",
        base_cost: 200,
        cost_growth: 1.5,
        max_level: 25,
        effect: UpgradeEffect::AutoRepairMultiplier(1.25),
    },
    UpgradeDef {
        id: "training-manuals",
        name: "Training Manuals",
        base_cost: 250,
        cost_growth: 1.45,
        max_level: 20,
        effect: UpgradeEffect::XpMultiplier(1.10),
    },
    UpgradeDef {
        id: "power-tools",
        name: "Power Tools",
        base_cost: 300,
        cost_growth: 1.5,
        max_level: 25,
        effect: UpgradeEffect::ClickPowerMultiplier(1.20),
    },
    UpgradeDef {
        id: "dispatch-radio",
        name: "Dispatch Radio",
        base_cost: 400,
        cost_growth: 1.55,
        max_level: 15,
        effect: UpgradeEffect::SpawnIntervalMultiplier(0.92),
    },
    UpgradeDef {
        id: "marketing",
        name: "Marketing Campaign",
        base_cost: 500,
        cost_growth: 1.6,
        max_level: 20,
        effect: UpgradeEffect::IncomeMultiplier(1.15),
    },
];

/// Nip upgrades. Survive prestige.
pub static NIP_UPGRADE_CATALOG: &[UpgradeDef] = &[
    UpgradeDef {
        id: "golden-wrench",
        name: "Golden Wrench",
        base_cost: 1,
        cost_growth: 2.0,
        max_level: 10,
        effect: UpgradeEffect::ClickPowerMultiplier(1.5),
    },
    UpgradeDef {
        id: "combo-instincts",
        name: "Combo Instincts",
        base_cost: 1,
        cost_growth: 1.6,
        max_level: 10,
        effect: UpgradeEffect::ComboMaxAdd(0.5),
    },
    UpgradeDef {
        id: "combo-mastery",
        name: "Combo Mastery",
        base_cost: 1,
        cost_growth: 1.6,
        max_level: 10,
        effect: UpgradeEffect::ComboGainAdd(0.05),
    },
    UpgradeDef {
        id: "overtime-contracts",
        name: "Overtime Contracts",
        base_cost: 2,
        cost_growth: 1.8,
        max_level: 10,
        effect: UpgradeEffect::IncomeMultiplier(1.25),
    },
    UpgradeDef {
        id: "vip-clients",
        name: "VIP Clients",
        base_cost: 2,
        cost_growth: 1.7,
        max_level: 10,
        effect: UpgradeEffect::CarValueBonus(0.25),
    },
    UpgradeDef {
        id: "robo-mechanics",
        name: "Robo-Mechanics",
        base_cost: 3,
        cost_growth: 1.9,
        max_level: 10,
        effect: UpgradeEffect::AutoRepairMultiplier(1.5),
    },
];

/// Look up a cash upgrade by id.
pub fn upgrade(id: &str) -> Option<&'static UpgradeDef> {
    UPGRADE_CATALOG.iter().find(|def| def.id == id)
}

/// Look up a nip upgrade by id.
pub fn nip_upgrade(id: &str) -> Option<&'static UpgradeDef> {
    NIP_UPGRADE_CATALOG.iter().find(|def| def.id == id)
}
