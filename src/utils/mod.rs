//! Shared helpers: durable storage and id generation.

pub mod ids;
pub mod persistence;

pub use ids::random_id;
pub use persistence::*;
