//! Engine, tuning constants, and error types.

pub mod constants;
pub mod engine;
pub mod error;

pub use engine::*;
pub use error::*;
