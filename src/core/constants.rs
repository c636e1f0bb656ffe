// Starting character
pub const BASE_MAX_HP: u32 = 100;
pub const BASE_ATTACK: u32 = 10;
pub const BASE_DEFENSE: u32 = 0;
pub const BASE_CRIT_CHANCE_PERCENT: u32 = 5;
pub const BASE_DODGE_CHANCE_PERCENT: u32 = 5;
pub const STARTING_GOLD: u32 = 0;
pub const STARTING_FLOOR: u32 = 1;

// XP and leveling
pub const XP_TO_NEXT_LEVEL: u32 = 100;
pub const LEVEL_UP_MAX_HP: u32 = 10;
pub const LEVEL_UP_ATTACK: u32 = 2;
pub const XP_REWARD_COMMON: u32 = 20;
pub const XP_REWARD_ELITE: u32 = 50;

// Skills
pub const MAX_ACTIVE_SKILLS: usize = 4;

// Combat
pub const PLAYER_CRIT_MULTIPLIER: u32 = 2;
pub const ENEMY_CRIT_MULTIPLIER: f64 = 1.5;
pub const HEAL_CRIT_MULTIPLIER: f64 = 1.5;
pub const COUNTER_ATTACK_RATIO: f64 = 0.5;
pub const FLEE_SUCCESS_CHANCE: f64 = 0.5;
pub const PERCENT_DIVISOR: f64 = 100.0;

// Victory rewards
pub const VICTORY_HEAL: u32 = 20;
pub const VICTORY_GOLD_BASE: u32 = 5;
pub const VICTORY_GOLD_PER_FLOOR: u32 = 2;
pub const ELITE_GOLD_MULTIPLIER: u32 = 2;
pub const SHARD_DROP_CHANCE_ELITE: f64 = 0.05;
pub const SKILL_REWARD_CHANCE_ELITE: f64 = 0.25;

// Loot: an item drops when a unit roll exceeds the threshold.
// The threshold shrinks by LOOT_THRESHOLD_PER_FLOOR per floor, clamped to [MIN, BASE].
pub const LOOT_THRESHOLD_BASE: f64 = 0.30;
pub const LOOT_THRESHOLD_PER_FLOOR: f64 = 0.01;
pub const LOOT_THRESHOLD_MIN: f64 = 0.05;

// Room batches
pub const MIN_ROOMS_PER_FLOOR: usize = 2;
pub const MAX_ROOMS_PER_FLOOR: usize = 4;

// Room type cumulative thresholds on a unit roll
pub const ROOM_ENEMY_THRESHOLD: f64 = 0.50;
pub const ROOM_ELITE_THRESHOLD: f64 = 0.60;
pub const ROOM_TREASURE_THRESHOLD: f64 = 0.70;
pub const ROOM_REST_THRESHOLD: f64 = 0.80;
pub const ROOM_MERCHANT_THRESHOLD: f64 = 0.90;

// Common enemy scaling: hp = base + step * floor, attack = base + step * floor
pub const ENEMY_BASE_HP: u32 = 30;
pub const ENEMY_HP_PER_FLOOR: u32 = 5;
pub const ENEMY_BASE_ATTACK: u32 = 5;
pub const ENEMY_ATTACK_PER_FLOOR: u32 = 1;
pub const ENEMY_DEFENSE_FLOOR_DIVISOR: u32 = 5;
pub const EARLY_FLOOR_DISCOUNT: f64 = 0.85;
pub const EARLY_FLOOR_LIMIT: u32 = 15;

// Elite scaling
pub const ELITE_BASE_HP: u32 = 60;
pub const ELITE_HP_PER_FLOOR: u32 = 10;
pub const ELITE_BASE_ATTACK: u32 = 10;
pub const ELITE_ATTACK_PER_FLOOR: u32 = 2;
pub const ELITE_BASE_DEFENSE: u32 = 4;
pub const ELITE_DEFENSE_FLOOR_DIVISOR: u32 = 4;
pub const ELITE_DODGE_PERCENT: u32 = 5;
pub const ELITE_CRIT_PERCENT: u32 = 10;
pub const ELITE_LIFESTEAL_PERCENT: u32 = 10;

// Merchant
pub const MIN_MERCHANT_OFFERINGS: usize = 2;
pub const MAX_MERCHANT_OFFERINGS: usize = 3;
pub const MERCHANT_ITEM_CHANCE: f64 = 0.5;

// Non-combat rooms
pub const TREASURE_GOLD_MIN: u32 = 10;
pub const TREASURE_GOLD_MAX: u32 = 59;
pub const REST_HEAL_RATIO: f64 = 0.3;

// Random events: cumulative thresholds on a unit roll
pub const EVENT_NOTHING_THRESHOLD: f64 = 0.40;
pub const EVENT_GOLD_THRESHOLD: f64 = 0.65;
pub const EVENT_SHRINE_THRESHOLD: f64 = 0.85;
pub const EVENT_GOLD_MIN: u32 = 5;
pub const EVENT_GOLD_MAX: u32 = 20;
pub const EVENT_SHRINE_HEAL: u32 = 15;
pub const EVENT_TRAP_RATIO: f64 = 0.10;

// Message log
pub const MESSAGE_LOG_CAPACITY: usize = 8;

// Durable storage
pub const RARE_CURRENCY_KEY: &str = "crawler.shards";
pub const STORE_FILENAME: &str = "store.json";
pub const STORE_DIR_NAME: &str = ".crawler";
pub const STORE_DIR_ENV: &str = "CRAWLER_HOME";
