//! Floors, rooms, and what happens inside them.

pub mod events;
pub mod generation;
pub mod types;

pub use events::*;
pub use generation::*;
pub use types::*;
