//! chopshop - Idle Garage Progression & Economy Engine
//!
//! The simulation core of an idle garage game: currency, experience, combo
//! multipliers, worker automation, timed contracts, and a prestige loop.
//! Rendering, audio, and persistence IO live in host collaborators; this
//! crate exposes a command surface, an event surface, and a versioned
//! save payload.

pub mod achievements;
pub mod cars;
pub mod clicks;
pub mod contracts;
pub mod core;
pub mod prestige;
pub mod progression;
pub mod repair;
pub mod save;
pub mod shop;
pub mod workers;

pub use crate::core::events::{EventBus, EventKind, GameEvent};
pub use crate::core::game::Game;
pub use crate::core::ledger::Ledger;
