//! Upgrade shops: cash upgrades and permanent nip (meta) upgrades.

mod data;
pub mod logic;
mod types;

pub use data::{nip_upgrade, upgrade, NIP_UPGRADE_CATALOG, UPGRADE_CATALOG};
pub use logic::{nip_upgrade_cost, upgrade_cost};
pub use types::{UpgradeDef, UpgradeEffect};
