//! Floor encounter data structures.

use crate::combat::Enemy;
use crate::items::Item;
use crate::skills::Skill;
use crate::utils::random_id;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of encounter a room holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Common enemy fight
    Enemy,
    /// Stronger enemy with bigger rewards
    Elite,
    /// Gold and a loot roll, no combat
    Treasure,
    /// Recover a share of max HP
    Rest,
    /// Buy items or skills
    Merchant,
    /// Random event from a small table
    Event,
}

impl RoomType {
    /// Returns the display label for this room type
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Enemy => "Enemy",
            RoomType::Elite => "Elite",
            RoomType::Treasure => "Treasure",
            RoomType::Rest => "Rest",
            RoomType::Merchant => "Merchant",
            RoomType::Event => "Event",
        }
    }

    pub fn is_combat(&self) -> bool {
        matches!(self, RoomType::Enemy | RoomType::Elite)
    }
}

/// Something a merchant sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Goods {
    Item(Item),
    Skill(Skill),
}

impl Goods {
    pub fn name(&self) -> &str {
        match self {
            Goods::Item(item) => &item.name,
            Goods::Skill(skill) => &skill.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub id: Uuid,
    pub goods: Goods,
    pub price: u32,
}

impl Offering {
    pub fn item(item: Item, rng: &mut impl Rng) -> Self {
        Self {
            id: random_id(rng),
            price: item.value,
            goods: Goods::Item(item),
        }
    }

    pub fn skill(skill: Skill, rng: &mut impl Rng) -> Self {
        Self {
            id: random_id(rng),
            price: skill.cost,
            goods: Goods::Skill(skill),
        }
    }
}

/// One encounter option on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub room_type: RoomType,
    pub description: String,
    pub enemy: Option<Enemy>,
    #[serde(default)]
    pub offerings: Vec<Offering>,
}

impl Room {
    pub fn new(room_type: RoomType, description: impl Into<String>, rng: &mut impl Rng) -> Self {
        Self {
            id: random_id(rng),
            room_type,
            description: description.into(),
            enemy: None,
            offerings: Vec::new(),
        }
    }

    pub fn with_enemy(mut self, enemy: Enemy) -> Self {
        self.enemy = Some(enemy);
        self
    }

    pub fn with_offerings(mut self, offerings: Vec<Offering>) -> Self {
        self.offerings = offerings;
        self
    }

    /// Short title for room lists: the enemy's name for fights.
    pub fn title(&self) -> &str {
        match &self.enemy {
            Some(enemy) => &enemy.name,
            None => self.room_type.label(),
        }
    }
}
