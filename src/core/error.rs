//! Error types for engine operations and durable storage.

use thiserror::Error;
use uuid::Uuid;

use super::engine::RunPhase;
use crate::items::EquipmentSlot;

/// Why an engine operation was rejected.
///
/// A rejected operation never changes run state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("not allowed during {actual:?} (expected {expected:?})")]
    WrongPhase {
        expected: RunPhase,
        actual: RunPhase,
    },

    #[error("{what} index {index} out of range (len {len})")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("not enough gold: costs {price}G, have {gold}G")]
    InsufficientGold { price: u32, gold: u32 },

    #[error("no offering with id {0}")]
    UnknownOffering(Uuid),

    #[error("nothing equipped in {0:?} slot")]
    NothingEquipped(EquipmentSlot),

    #[error("cannot use item: {0}")]
    CannotUse(String),

    #[error("{0} is already known")]
    AlreadyKnown(String),

    #[error("no run in progress ({0:?})")]
    NoActiveRun(RunPhase),

    #[error("invalid room batch: {0}")]
    InvalidRoomBatch(String),
}

/// Failures reading or writing the durable key/value store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
