//! Car catalog, car entities, and the spawn queue.

mod data;
pub mod queue;
mod types;

pub use data::{car_spec, starter_spec, unlocks_for_level, CAR_CATALOG, STARTER_CAR_ID};
pub use types::{tier_scale, Car, CarSpec, Rarity};
