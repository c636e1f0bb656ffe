use super::catalog::random_item;
use super::types::Item;
use crate::core::constants::{
    LOOT_THRESHOLD_BASE, LOOT_THRESHOLD_MIN, LOOT_THRESHOLD_PER_FLOOR, SHARD_DROP_CHANCE_ELITE,
};
use rand::Rng;

/// Unit-roll threshold an item drop must exceed on `floor`.
pub fn loot_threshold_for_floor(floor: u32) -> f64 {
    let threshold = LOOT_THRESHOLD_BASE - floor as f64 * LOOT_THRESHOLD_PER_FLOOR;
    threshold.clamp(LOOT_THRESHOLD_MIN, LOOT_THRESHOLD_BASE)
}

/// Roll for an item drop after a victory or in a treasure room.
pub fn try_drop_item(floor: u32, rng: &mut impl Rng) -> Option<Item> {
    if rng.gen::<f64>() > loot_threshold_for_floor(floor) {
        Some(random_item(rng))
    } else {
        None
    }
}

/// Roll for a rare-currency shard. Only elites can drop one.
pub fn roll_shard_drop(is_elite: bool, rng: &mut impl Rng) -> bool {
    is_elite && rng.gen::<f64>() < SHARD_DROP_CHANCE_ELITE
}
