use super::derived_stats::{BaseStats, DerivedStats};
use crate::core::constants::{STARTING_FLOOR, STARTING_GOLD, XP_TO_NEXT_LEVEL};
use crate::items::{Equipment, EquipmentSlot, Item};
use crate::skills::SkillBook;
use serde::{Deserialize, Serialize};

/// The player's state for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub base: BaseStats,
    /// Current HP, kept within `[0, stats().max_hp]`.
    pub hp: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub gold: u32,
    pub floor: u32,
    pub inventory: Vec<Item>,
    pub equipment: Equipment,
    pub skills: SkillBook,
}

impl Character {
    /// Fresh baseline character for a new run.
    pub fn new() -> Self {
        let base = BaseStats::default();
        Self {
            hp: base.max_hp,
            base,
            level: 1,
            xp: 0,
            xp_to_next: XP_TO_NEXT_LEVEL,
            gold: STARTING_GOLD,
            floor: STARTING_FLOOR,
            inventory: Vec::new(),
            equipment: Equipment::new(),
            skills: SkillBook::new(),
        }
    }

    /// Effective stats, always recomputed from base and equipment.
    pub fn stats(&self) -> DerivedStats {
        DerivedStats::calculate_derived_stats(&self.base, &self.equipment)
    }

    pub fn max_hp(&self) -> u32 {
        self.stats().max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Restores up to `amount` HP. Returns how much was actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
        self.hp - before
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Re-applies the HP ceiling after max HP may have dropped.
    pub fn clamp_hp(&mut self) {
        let max = self.max_hp();
        if self.hp > max {
            self.hp = max;
        }
    }

    /// Puts an equipment item in its slot, returning the displaced item.
    ///
    /// Consumables are handed back untouched as `Err`.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let slot = match item.slot() {
            Some(slot) => slot,
            None => return Err(item),
        };
        let displaced = self.equipment.replace(slot, item);
        self.clamp_hp();
        Ok(displaced)
    }

    /// Moves the item in `slot` to the inventory.
    pub fn unequip(&mut self, slot: EquipmentSlot) -> bool {
        match self.equipment.take(slot) {
            Some(item) => {
                self.inventory.push(item);
                self.clamp_hp();
                true
            }
            None => false,
        }
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{BASE_ATTACK, BASE_MAX_HP};
    use crate::items::catalog::catalog_item;

    #[test]
    fn test_new_character_baseline() {
        let c = Character::new();
        assert_eq!(c.hp, BASE_MAX_HP);
        assert_eq!(c.level, 1);
        assert_eq!(c.xp, 0);
        assert_eq!(c.floor, 1);
        assert_eq!(c.gold, 0);
        assert!(c.inventory.is_empty());
        assert_eq!(c.skills.active().len(), 2);
        assert_eq!(c.stats().attack, BASE_ATTACK);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut c = Character::new();
        c.hp = 90;
        assert_eq!(c.heal(50), 10);
        assert_eq!(c.hp, c.max_hp());
    }

    #[test]
    fn test_take_damage_saturates() {
        let mut c = Character::new();
        c.take_damage(500);
        assert_eq!(c.hp, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_equip_returns_displaced() {
        let mut c = Character::new();
        let rusty = catalog_item("sword-1");
        let iron = catalog_item("sword-2");

        assert_eq!(c.equip(rusty.clone()), Ok(None));
        assert_eq!(c.equip(iron), Ok(Some(rusty)));
        assert_eq!(c.stats().attack, BASE_ATTACK + 5);
    }

    #[test]
    fn test_equip_rejects_consumable() {
        let mut c = Character::new();
        let potion = catalog_item("potion-1");
        assert_eq!(c.equip(potion.clone()), Err(potion));
    }

    #[test]
    fn test_unequip_clamps_hp() {
        let mut c = Character::new();
        c.equip(catalog_item("armor-2")).unwrap();
        c.hp = c.max_hp();
        assert_eq!(c.hp, BASE_MAX_HP + 20);

        assert!(c.unequip(EquipmentSlot::Armor));
        assert_eq!(c.hp, BASE_MAX_HP);
        assert_eq!(c.inventory.len(), 1);
        assert!(!c.unequip(EquipmentSlot::Armor));
    }
}
