//! Character state, stats, and progression.

pub mod derived_stats;
pub mod progression;
pub mod state;

pub use derived_stats::*;
pub use progression::*;
pub use state::*;
