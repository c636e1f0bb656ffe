//! Crawler - turn-based dungeon crawler engine.
//!
//! Each floor offers a handful of rooms; the player picks one, fights or
//! loots or shops, and descends. The [`core::Engine`] drives a run; the other
//! modules hold the rules it applies.

pub mod character;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod items;
pub mod simulator;
pub mod skills;
pub mod utils;

pub use crate::core::{Engine, EngineError, RunPhase};
