//! Identifiers drawn from the caller's RNG so seeded runs repeat exactly.

use rand::Rng;
use uuid::{Builder, Uuid};

/// A random (version 4) UUID built from `rng` instead of OS entropy.
pub fn random_id(rng: &mut impl Rng) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}
