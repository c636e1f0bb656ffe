//! Deciding what happens to a newly acquired item.

use super::types::Item;
use crate::character::Character;
use serde::{Deserialize, Serialize};

/// Player choice for an item whose slot is already occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootAction {
    /// Equip the new item; the old one goes to the inventory.
    Swap,
    /// Keep current gear; the new item goes to the inventory.
    Take,
    /// Drop the new item.
    Discard,
}

/// What happened to an item handed to [`resolve_acquired_item`].
#[derive(Debug, Clone, PartialEq)]
pub enum LootResolution {
    /// Consumable stored in the inventory.
    Stored(String),
    /// Equipment went straight into an empty slot.
    AutoEquipped(String),
    /// Slot occupied: the player has to pick a [`LootAction`].
    Pending(Item),
}

/// Settles an item without player input whenever possible.
pub fn resolve_acquired_item(character: &mut Character, item: Item) -> LootResolution {
    let slot = match item.slot() {
        Some(slot) => slot,
        None => {
            let name = item.name.clone();
            character.inventory.push(item);
            return LootResolution::Stored(name);
        }
    };

    if !character.equipment.is_empty(slot) {
        return LootResolution::Pending(item);
    }

    let name = item.name.clone();
    // Slot is empty, so nothing is displaced.
    if let Err(item) = character.equip(item) {
        character.inventory.push(item);
        return LootResolution::Stored(name);
    }
    LootResolution::AutoEquipped(name)
}

/// Applies the player's decision on a pending item. Returns a log line.
pub fn apply_loot_action(character: &mut Character, item: Item, action: LootAction) -> String {
    match action {
        LootAction::Swap => {
            let name = item.name.clone();
            match character.equip(item) {
                Ok(Some(old)) => {
                    let msg = format!("Equipped {}, stowed {}.", name, old.name);
                    character.inventory.push(old);
                    msg
                }
                Ok(None) => format!("Equipped {}.", name),
                Err(item) => {
                    character.inventory.push(item);
                    format!("Stowed {}.", name)
                }
            }
        }
        LootAction::Take => {
            let msg = format!("Stowed {}.", item.name);
            character.inventory.push(item);
            msg
        }
        LootAction::Discard => format!("Left {} behind.", item.name),
    }
}
