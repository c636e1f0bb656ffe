//! Item system: types, equipment, catalog, drops, and loot resolution.

pub mod catalog;
pub mod drops;
pub mod equipment;
pub mod loot;
pub mod types;

pub use catalog::*;
pub use drops::*;
pub use equipment::*;
pub use loot::*;
pub use types::*;
