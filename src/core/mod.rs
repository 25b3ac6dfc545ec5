//! Core engine: ledger, event bus, tick orchestration, scheduling.

pub mod constants;
pub mod events;
pub mod game;
pub mod ledger;
pub mod offline;
pub mod scheduler;
pub mod tick;
