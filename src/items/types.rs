use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Accessory,
    Consumable,
}

impl ItemCategory {
    /// Equipment slot this category occupies, or `None` for consumables.
    pub fn slot(&self) -> Option<EquipmentSlot> {
        match self {
            ItemCategory::Weapon => Some(EquipmentSlot::Weapon),
            ItemCategory::Armor => Some(EquipmentSlot::Armor),
            ItemCategory::Accessory => Some(EquipmentSlot::Accessory),
            ItemCategory::Consumable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Legendary = 3,
}

impl Rarity {
    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Flat stat contributions of an item. Percent fields are whole percents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifiers {
    #[serde(default)]
    pub max_hp: u32,
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub crit: u32,
    #[serde(default)]
    pub dodge: u32,
    #[serde(default)]
    pub lifesteal: u32,
    #[serde(default)]
    pub reflect: u32,
    #[serde(default)]
    pub pierce: u32,
    /// HP restored when a consumable is used.
    #[serde(default)]
    pub heal: u32,
}

impl StatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field-wise sum.
    pub fn combine(&self, other: &StatModifiers) -> StatModifiers {
        StatModifiers {
            max_hp: self.max_hp + other.max_hp,
            attack: self.attack + other.attack,
            defense: self.defense + other.defense,
            crit: self.crit + other.crit,
            dodge: self.dodge + other.dodge,
            lifesteal: self.lifesteal + other.lifesteal,
            reflect: self.reflect + other.reflect,
            pierce: self.pierce + other.pierce,
            heal: self.heal + other.heal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub modifiers: StatModifiers,
    pub description: String,
    /// Gold value, also the merchant price.
    pub value: u32,
}

impl Item {
    pub fn is_consumable(&self) -> bool {
        self.category == ItemCategory::Consumable
    }

    pub fn slot(&self) -> Option<EquipmentSlot> {
        self.category.slot()
    }
}
