//! Static car catalog and unlock milestones.

use super::types::{CarSpec, Rarity};

/// Every new run starts with only this car unlocked.
pub const STARTER_CAR_ID: &str = "hatchback";

/// The full car pool, cheapest first.
pub static CAR_CATALOG: &[CarSpec] = &[
    CarSpec {
        id: "hatchback",
        name: "Rusty Hatchback",
        repair_cost: 50.0,
        base_value: 25,
        rarity: Rarity::Common,
        tier: 1,
    },
    CarSpec {
        id: "sedan",
        name: "Family Sedan",
        repair_cost: 80.0,
        base_value: 45,
        rarity: Rarity::Common,
        tier: 1,
    },
    CarSpec {
        id: "coupe",
        name: "Two-Door Coupe",
        repair_cost: 120.0,
        base_value: 70,
        rarity: Rarity::Uncommon,
        tier: 1,
    },
    CarSpec {
        id: "pickup",
        name: "Work Pickup",
        repair_cost: 180.0,
        base_value: 110,
        rarity: Rarity::Uncommon,
        tier: 1,
    },
    CarSpec {
        id: "van",
        name: "Delivery Van",
        repair_cost: 340.0,
        base_value: 220,
        rarity: Rarity::Rare,
        tier: 2,
    },
    CarSpec {
        id: "sports-car",
        name: "Sports Car",
        repair_cost: 500.0,
        base_value: 340,
        rarity: Rarity::Rare,
        tier: 2,
    },
    CarSpec {
        id: "classic",
        name: "Vintage Classic",
        repair_cost: 750.0,
        base_value: 520,
        rarity: Rarity::Epic,
        tier: 2,
    },
    CarSpec {
        id: "limousine",
        name: "Stretch Limousine",
        repair_cost: 1100.0,
        base_value: 800,
        rarity: Rarity::Epic,
        tier: 3,
    },
    CarSpec {
        id: "supercar",
        name: "Supercar",
        repair_cost: 1600.0,
        base_value: 1200,
        rarity: Rarity::Legendary,
        tier: 3,
    },
    CarSpec {
        id: "hypercar",
        name: "Hypercar Prototype",
        repair_cost: 2400.0,
        base_value: 1900,
        rarity: Rarity::Legendary,
        tier: 4,
    },
];

/// Look up a catalog entry by id.
pub fn car_spec(id: &str) -> Option<&'static CarSpec> {
    CAR_CATALOG.iter().find(|spec| spec.id == id)
}

/// The catalog entry every unknown id falls back to.
pub fn starter_spec() -> &'static CarSpec {
    car_spec(STARTER_CAR_ID).expect("starter car must exist in catalog")
}

/// Car ids that unlock when the garage reaches a level.
pub fn unlocks_for_level(level: u32) -> &'static [&'static str] {
    match level {
        1 => &["hatchback"],
        3 => &["sedan"],
        5 => &["coupe"],
        8 => &["pickup"],
        12 => &["van"],
        16 => &["sports-car"],
        20 => &["classic"],
        25 => &["limousine"],
        32 => &["supercar"],
        40 => &["hypercar"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        for (i, a) in CAR_CATALOG.iter().enumerate() {
            for b in &CAR_CATALOG[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate car id {}", a.id);
            }
        }
    }

    #[test]
    fn test_every_milestone_car_exists() {
        for level in 1..=50 {
            for id in unlocks_for_level(level) {
                assert!(car_spec(id).is_some(), "milestone car {} missing", id);
            }
        }
    }

    #[test]
    fn test_starter_spec() {
        let spec = starter_spec();
        assert_eq!(spec.id, "hatchback");
        assert_eq!(spec.repair_cost, 50.0);
        assert_eq!(spec.base_value, 25);
    }

    #[test]
    fn test_catalog_costs_increase() {
        for pair in CAR_CATALOG.windows(2) {
            assert!(pair[0].repair_cost < pair[1].repair_cost);
        }
    }

    #[test]
    fn test_unknown_id_returns_none() {
        assert!(car_spec("warp-drive").is_none());
    }
}
