//! Fixed item templates. Every drop or merchant offering is a fresh instance.

use super::types::{Item, ItemCategory, Rarity, StatModifiers};
use crate::utils::random_id;
use rand::Rng;

pub struct ItemTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub modifiers: StatModifiers,
    pub description: &'static str,
    pub value: u32,
}

const NONE: StatModifiers = StatModifiers {
    max_hp: 0,
    attack: 0,
    defense: 0,
    crit: 0,
    dodge: 0,
    lifesteal: 0,
    reflect: 0,
    pierce: 0,
    heal: 0,
};

pub const ITEM_TEMPLATES: &[ItemTemplate] = &[
    ItemTemplate {
        key: "sword-1",
        name: "Rusted Sword",
        category: ItemCategory::Weapon,
        rarity: Rarity::Common,
        modifiers: StatModifiers { attack: 2, ..NONE },
        description: "Better than nothing.",
        value: 15,
    },
    ItemTemplate {
        key: "sword-2",
        name: "Iron Sword",
        category: ItemCategory::Weapon,
        rarity: Rarity::Uncommon,
        modifiers: StatModifiers { attack: 5, ..NONE },
        description: "A reliable blade.",
        value: 40,
    },
    ItemTemplate {
        key: "dagger-1",
        name: "Vampiric Dagger",
        category: ItemCategory::Weapon,
        rarity: Rarity::Rare,
        modifiers: StatModifiers {
            attack: 3,
            lifesteal: 15,
            ..NONE
        },
        description: "Drinks what it cuts.",
        value: 70,
    },
    ItemTemplate {
        key: "spear-1",
        name: "Piercing Spear",
        category: ItemCategory::Weapon,
        rarity: Rarity::Rare,
        modifiers: StatModifiers {
            attack: 4,
            pierce: 3,
            ..NONE
        },
        description: "Finds the gaps in any armor.",
        value: 65,
    },
    ItemTemplate {
        key: "armor-1",
        name: "Leather Tunic",
        category: ItemCategory::Armor,
        rarity: Rarity::Common,
        modifiers: StatModifiers {
            defense: 1,
            max_hp: 10,
            ..NONE
        },
        description: "Light protection.",
        value: 15,
    },
    ItemTemplate {
        key: "armor-2",
        name: "Chainmail",
        category: ItemCategory::Armor,
        rarity: Rarity::Uncommon,
        modifiers: StatModifiers {
            defense: 3,
            max_hp: 20,
            ..NONE
        },
        description: "Sturdy rings.",
        value: 45,
    },
    ItemTemplate {
        key: "armor-3",
        name: "Spiked Mail",
        category: ItemCategory::Armor,
        rarity: Rarity::Rare,
        modifiers: StatModifiers {
            defense: 2,
            reflect: 20,
            ..NONE
        },
        description: "Hurts to hit.",
        value: 70,
    },
    ItemTemplate {
        key: "ring-1",
        name: "Ring of Power",
        category: ItemCategory::Accessory,
        rarity: Rarity::Common,
        modifiers: StatModifiers {
            attack: 1,
            max_hp: 5,
            ..NONE
        },
        description: "Slightly magical.",
        value: 20,
    },
    ItemTemplate {
        key: "charm-1",
        name: "Lucky Charm",
        category: ItemCategory::Accessory,
        rarity: Rarity::Uncommon,
        modifiers: StatModifiers { crit: 10, ..NONE },
        description: "Fortune favors the bold.",
        value: 35,
    },
    ItemTemplate {
        key: "cloak-1",
        name: "Shadow Cloak",
        category: ItemCategory::Accessory,
        rarity: Rarity::Legendary,
        modifiers: StatModifiers {
            dodge: 15,
            crit: 5,
            ..NONE
        },
        description: "Hard to pin down.",
        value: 120,
    },
    ItemTemplate {
        key: "potion-1",
        name: "Health Potion",
        category: ItemCategory::Consumable,
        rarity: Rarity::Common,
        modifiers: StatModifiers { heal: 50, ..NONE },
        description: "Restores 50 HP.",
        value: 25,
    },
    ItemTemplate {
        key: "potion-2",
        name: "Greater Potion",
        category: ItemCategory::Consumable,
        rarity: Rarity::Uncommon,
        modifiers: StatModifiers { heal: 100, ..NONE },
        description: "Restores 100 HP.",
        value: 50,
    },
];

impl ItemTemplate {
    /// Creates a new item instance. The id comes from `rng`.
    pub fn instantiate(&self, rng: &mut impl Rng) -> Item {
        Item {
            id: random_id(rng),
            name: self.name.to_string(),
            category: self.category,
            rarity: self.rarity,
            modifiers: self.modifiers,
            description: self.description.to_string(),
            value: self.value,
        }
    }
}

pub fn find_template(key: &str) -> Option<&'static ItemTemplate> {
    ITEM_TEMPLATES.iter().find(|t| t.key == key)
}

/// Instantiates a catalog item by key.
pub fn create_item(key: &str, rng: &mut impl Rng) -> Option<Item> {
    find_template(key).map(|template| template.instantiate(rng))
}

/// Uniform pick over the whole catalog.
pub fn random_item(rng: &mut impl Rng) -> Item {
    let template = &ITEM_TEMPLATES[rng.gen_range(0..ITEM_TEMPLATES.len())];
    template.instantiate(rng)
}

/// Catalog item for hand-built test fixtures.
#[cfg(test)]
pub(crate) fn catalog_item(key: &str) -> Item {
    create_item(key, &mut rand::thread_rng()).unwrap_or_else(|| panic!("no catalog item {key}"))
}
