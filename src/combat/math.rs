//! Pure combat formulas.
//!
//! Everything random goes through [`roll_chance`] with a caller-supplied RNG,
//! so a seeded generator reproduces a fight exactly.

use crate::core::constants::{
    COUNTER_ATTACK_RATIO, ENEMY_CRIT_MULTIPLIER, HEAL_CRIT_MULTIPLIER, PERCENT_DIVISOR,
    PLAYER_CRIT_MULTIPLIER,
};
use rand::Rng;

/// Rolls 0..100 and succeeds when the roll is below `chance_percent`.
///
/// 0 never succeeds, 100 or more always does.
pub fn roll_chance(chance_percent: u32, rng: &mut impl Rng) -> bool {
    let roll = rng.gen_range(0..100);
    roll < chance_percent
}

/// Enemy defense after the attacker's pierce, never below zero.
pub fn effective_defense(defense: u32, pierce: u32) -> u32 {
    defense.saturating_sub(pierce)
}

/// Damage before defense: `attack × power`, doubled on a critical hit.
pub fn raw_skill_damage(attack: u32, power: f64, is_crit: bool) -> u32 {
    let damage = (attack as f64 * power).floor() as u32;
    if is_crit {
        damage * PLAYER_CRIT_MULTIPLIER
    } else {
        damage
    }
}

/// Damage a player hit lands after defense. Always at least 1.
pub fn mitigated_player_damage(raw: u32, enemy_defense: u32, pierce: u32) -> u32 {
    raw.saturating_sub(effective_defense(enemy_defense, pierce)).max(1)
}

/// HP the attacker recovers from `damage`, rounded up.
pub fn lifesteal_heal(damage: u32, lifesteal_percent: u32) -> u32 {
    if damage == 0 || lifesteal_percent == 0 {
        return 0;
    }
    (damage as f64 * lifesteal_percent as f64 / PERCENT_DIVISOR).ceil() as u32
}

/// Share of `damage` for enemy lifesteal or player reflect, rounded down.
pub fn percent_share(damage: u32, percent: u32) -> u32 {
    if damage == 0 || percent == 0 {
        return 0;
    }
    (damage as f64 * percent as f64 / PERCENT_DIVISOR).floor() as u32
}

/// Counter-attack dealt by a defend skill. Ignores enemy defense.
pub fn counter_damage(attack: u32) -> u32 {
    ((attack as f64 * COUNTER_ATTACK_RATIO).floor() as u32).max(1)
}

/// Damage an enemy hit lands on the player.
///
/// `guard` is the defend skill's reduction factor for this turn (0 when not
/// defending). The enemy crit multiplier applies last.
pub fn enemy_hit_damage(attack: u32, player_defense: u32, guard: f64, is_crit: bool) -> u32 {
    let mut damage = attack.saturating_sub(player_defense);
    if guard > 0.0 {
        let reduction = (damage as f64 * guard.min(1.0)).floor() as u32;
        damage -= reduction;
    }
    if is_crit {
        damage = (damage as f64 * ENEMY_CRIT_MULTIPLIER).floor() as u32;
    }
    damage
}

/// HP restored by a heal skill, +50% on a critical heal.
pub fn heal_amount(power: f64, is_crit: bool) -> u32 {
    let base = power.max(0.0).floor();
    if is_crit {
        (base * HEAL_CRIT_MULTIPLIER).floor() as u32
    } else {
        base as u32
    }
}
