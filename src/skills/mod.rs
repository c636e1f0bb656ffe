//! Combat skills and the player's skill loadout.

pub mod book;
pub mod types;

pub use book::*;
pub use types::*;
