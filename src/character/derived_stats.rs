use crate::core::constants::*;
use crate::items::Equipment;
use serde::{Deserialize, Serialize};

/// Stats the character has before equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub crit_chance_percent: u32,
    pub dodge_chance_percent: u32,
    pub lifesteal_percent: u32,
    pub reflect_percent: u32,
    pub pierce: u32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            max_hp: BASE_MAX_HP,
            attack: BASE_ATTACK,
            defense: BASE_DEFENSE,
            crit_chance_percent: BASE_CRIT_CHANCE_PERCENT,
            dodge_chance_percent: BASE_DODGE_CHANCE_PERCENT,
            lifesteal_percent: 0,
            reflect_percent: 0,
            pierce: 0,
        }
    }
}

/// Effective stats: base plus the sum of all equipped item modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub crit_chance_percent: u32,
    pub dodge_chance_percent: u32,
    pub lifesteal_percent: u32,
    pub reflect_percent: u32,
    pub pierce: u32,
}

impl DerivedStats {
    /// Calculates effective stats from base stats and equipment.
    ///
    /// Contributions are summed, so the result is independent of the order
    /// in which items were equipped.
    pub fn calculate_derived_stats(base: &BaseStats, equipment: &Equipment) -> Self {
        let bonus = equipment.total_modifiers();
        Self {
            max_hp: (base.max_hp + bonus.max_hp).max(1),
            attack: base.attack + bonus.attack,
            defense: base.defense + bonus.defense,
            crit_chance_percent: base.crit_chance_percent + bonus.crit,
            dodge_chance_percent: base.dodge_chance_percent + bonus.dodge,
            lifesteal_percent: base.lifesteal_percent + bonus.lifesteal,
            reflect_percent: base.reflect_percent + bonus.reflect,
            pierce: base.pierce + bonus.pierce,
        }
    }

    pub fn from_base(base: &BaseStats) -> Self {
        Self::calculate_derived_stats(base, &Equipment::new())
    }
}
