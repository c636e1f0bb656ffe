//! Procedural generation of room batches, enemies, and merchant stock.

use super::types::{Offering, Room, RoomType};
use crate::combat::Enemy;
use crate::core::constants::*;
use crate::items::random_item;
use crate::skills::{Skill, LEARNABLE_SKILLS};
use rand::Rng;

/// Common enemy roster entry. Multipliers apply to the floor baseline.
pub struct EnemyArchetype {
    pub name: &'static str,
    pub hp_mult: f64,
    pub attack_mult: f64,
    pub defense: u32,
    pub dodge: u32,
    pub crit: u32,
    pub lifesteal: u32,
    pub description: &'static str,
}

pub const ENEMY_ARCHETYPES: [EnemyArchetype; 5] = [
    EnemyArchetype {
        name: "Skeleton",
        hp_mult: 1.0,
        attack_mult: 1.0,
        defense: 1,
        dodge: 5,
        crit: 5,
        lifesteal: 0,
        description: "Bones rattle in the dark.",
    },
    EnemyArchetype {
        name: "Goblin",
        hp_mult: 0.8,
        attack_mult: 0.9,
        defense: 0,
        dodge: 15,
        crit: 10,
        lifesteal: 0,
        description: "Something small and quick giggles.",
    },
    EnemyArchetype {
        name: "Orc Brute",
        hp_mult: 1.3,
        attack_mult: 1.2,
        defense: 3,
        dodge: 0,
        crit: 5,
        lifesteal: 0,
        description: "Heavy footsteps. Calculate the risk.",
    },
    EnemyArchetype {
        name: "Vampire Bat",
        hp_mult: 0.7,
        attack_mult: 0.8,
        defense: 0,
        dodge: 20,
        crit: 5,
        lifesteal: 20,
        description: "Leathery wings overhead.",
    },
    EnemyArchetype {
        name: "Slime",
        hp_mult: 1.5,
        attack_mult: 0.7,
        defense: 2,
        dodge: 0,
        crit: 0,
        lifesteal: 0,
        description: "The floor is oddly sticky.",
    },
];

pub const ELITE_NAME: &str = "Dark Knight";

/// Floor baseline before archetype multipliers: (hp, attack).
pub fn floor_baseline(floor: u32) -> (u32, u32) {
    (
        ENEMY_BASE_HP + ENEMY_HP_PER_FLOOR * floor,
        ENEMY_BASE_ATTACK + ENEMY_ATTACK_PER_FLOOR * floor,
    )
}

/// Builds a common enemy of the given archetype for `floor`.
pub fn create_enemy(archetype: &EnemyArchetype, floor: u32) -> Enemy {
    let (base_hp, base_attack) = floor_baseline(floor);
    let discount = if floor <= EARLY_FLOOR_LIMIT {
        EARLY_FLOOR_DISCOUNT
    } else {
        1.0
    };

    let hp = ((base_hp as f64 * archetype.hp_mult * discount) as u32).max(1);
    let attack = ((base_attack as f64 * archetype.attack_mult * discount) as u32).max(1);
    let defense = archetype.defense + floor / ENEMY_DEFENSE_FLOOR_DIVISOR;

    Enemy::new(archetype.name.to_string(), hp, attack)
        .with_defense(defense)
        .with_chances(archetype.dodge, archetype.crit, archetype.lifesteal)
}

/// Builds the elite enemy for `floor`. Elites get no early-floor discount.
pub fn create_elite(floor: u32) -> Enemy {
    Enemy::new(
        ELITE_NAME.to_string(),
        ELITE_BASE_HP + ELITE_HP_PER_FLOOR * floor,
        ELITE_BASE_ATTACK + ELITE_ATTACK_PER_FLOOR * floor,
    )
    .with_defense(ELITE_BASE_DEFENSE + floor / ELITE_DEFENSE_FLOOR_DIVISOR)
    .with_chances(
        ELITE_DODGE_PERCENT,
        ELITE_CRIT_PERCENT,
        ELITE_LIFESTEAL_PERCENT,
    )
    .elite()
}

/// Maps a unit roll to a room type using the cumulative thresholds.
pub fn room_type_for_roll(roll: f64) -> RoomType {
    if roll < ROOM_ENEMY_THRESHOLD {
        RoomType::Enemy
    } else if roll < ROOM_ELITE_THRESHOLD {
        RoomType::Elite
    } else if roll < ROOM_TREASURE_THRESHOLD {
        RoomType::Treasure
    } else if roll < ROOM_REST_THRESHOLD {
        RoomType::Rest
    } else if roll < ROOM_MERCHANT_THRESHOLD {
        RoomType::Merchant
    } else {
        RoomType::Event
    }
}

/// Generates the 2–4 room options for `floor`.
///
/// At most one Rest room appears per batch; a second Rest roll becomes a
/// common enemy fight.
pub fn generate_rooms(floor: u32, rng: &mut impl Rng) -> Vec<Room> {
    let count = rng.gen_range(MIN_ROOMS_PER_FLOOR..=MAX_ROOMS_PER_FLOOR);
    let mut rooms = Vec::with_capacity(count);
    let mut rest_used = false;

    for _ in 0..count {
        let mut room_type = room_type_for_roll(rng.gen::<f64>());
        if room_type == RoomType::Rest {
            if rest_used {
                room_type = RoomType::Enemy;
            } else {
                rest_used = true;
            }
        }
        rooms.push(generate_room(room_type, floor, rng));
    }

    rooms
}

/// Builds a single room of a known type.
pub fn generate_room(room_type: RoomType, floor: u32, rng: &mut impl Rng) -> Room {
    match room_type {
        RoomType::Enemy => {
            let archetype = &ENEMY_ARCHETYPES[rng.gen_range(0..ENEMY_ARCHETYPES.len())];
            Room::new(RoomType::Enemy, archetype.description, rng)
                .with_enemy(create_enemy(archetype, floor))
        }
        RoomType::Elite => {
            Room::new(RoomType::Elite, "Dangerous aura!", rng).with_enemy(create_elite(floor))
        }
        RoomType::Treasure => Room::new(RoomType::Treasure, "Something shiny?", rng),
        RoomType::Rest => Room::new(RoomType::Rest, "A safe spot.", rng),
        RoomType::Merchant => {
            let offerings = generate_offerings(rng);
            Room::new(RoomType::Merchant, "A hooded figure waves you over.", rng)
                .with_offerings(offerings)
        }
        RoomType::Event => Room::new(RoomType::Event, "Unknown...", rng),
    }
}

/// Merchant stock: 2–3 offerings, each an item or a learnable skill.
pub fn generate_offerings(rng: &mut impl Rng) -> Vec<Offering> {
    let count = rng.gen_range(MIN_MERCHANT_OFFERINGS..=MAX_MERCHANT_OFFERINGS);
    (0..count)
        .map(|_| {
            if rng.gen_bool(MERCHANT_ITEM_CHANCE) {
                let item = random_item(rng);
                Offering::item(item, rng)
            } else {
                let id = LEARNABLE_SKILLS[rng.gen_range(0..LEARNABLE_SKILLS.len())];
                Offering::skill(Skill::from_id(id), rng)
            }
        })
        .collect()
}
