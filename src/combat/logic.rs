//! Turn resolution: one player action followed by the enemy's retaliation.

use super::math::{
    counter_damage, enemy_hit_damage, heal_amount, lifesteal_heal, mitigated_player_damage,
    percent_share, raw_skill_damage, roll_chance,
};
use super::types::{Enemy, TurnOutcome, TurnResolution};
use crate::character::Character;
use crate::core::constants::FLEE_SUCCESS_CHANCE;
use crate::skills::{Skill, SkillKind};
use rand::Rng;
use tracing::debug;

/// Resolves one full turn for `skill`.
///
/// The enemy only retaliates if it survives the player's action. On
/// `GameOver` no post-hit effects (enemy lifesteal, reflect) are applied.
pub fn resolve_turn(
    character: &mut Character,
    enemy: &mut Enemy,
    skill: &Skill,
    rng: &mut impl Rng,
) -> TurnResolution {
    let mut log = Vec::new();
    let mut guard = 0.0;

    match skill.kind {
        SkillKind::Damage => player_strike(character, enemy, skill, &mut log, rng),
        SkillKind::Defend => {
            guard = skill.power;
            let counter = counter_damage(character.stats().attack);
            enemy.take_damage(counter);
            log.push(format!(
                "You brace with {} and counter for {}!",
                skill.name, counter
            ));
        }
        SkillKind::Heal => {
            let is_crit = roll_chance(character.stats().crit_chance_percent, rng);
            let restored = character.heal(heal_amount(skill.power, is_crit));
            if is_crit {
                log.push(format!("Critical {}! Restored {} HP.", skill.name, restored));
            } else {
                log.push(format!("{} restored {} HP.", skill.name, restored));
            }
        }
        SkillKind::Buff => {
            log.push(format!("You use {}. Nothing seems to change.", skill.name));
        }
    }

    if !enemy.is_alive() {
        log.push(format!("{} is defeated!", enemy.name));
        debug!(enemy = %enemy.name, "enemy defeated by player action");
        return TurnResolution {
            outcome: TurnOutcome::Victory,
            log,
        };
    }

    let outcome = enemy_retaliation(character, enemy, guard, &mut log, rng);
    TurnResolution { outcome, log }
}

/// Attempts to escape. Success ends the encounter; failure lets the enemy hit.
pub fn resolve_flee(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> TurnResolution {
    let mut log = Vec::new();
    if rng.gen_bool(FLEE_SUCCESS_CHANCE) {
        log.push("Escaped successfully!".to_string());
        return TurnResolution {
            outcome: TurnOutcome::Fled,
            log,
        };
    }
    log.push("Failed to escape!".to_string());
    let outcome = enemy_retaliation(character, enemy, 0.0, &mut log, rng);
    TurnResolution { outcome, log }
}

fn player_strike(
    character: &mut Character,
    enemy: &mut Enemy,
    skill: &Skill,
    log: &mut Vec<String>,
    rng: &mut impl Rng,
) {
    if roll_chance(enemy.dodge_chance_percent, rng) {
        log.push(format!("{} dodges your {}!", enemy.name, skill.name));
        return;
    }

    let stats = character.stats();
    let is_crit = roll_chance(stats.crit_chance_percent, rng);
    let raw = raw_skill_damage(stats.attack, skill.power, is_crit);
    let damage = mitigated_player_damage(raw, enemy.defense, stats.pierce);
    enemy.take_damage(damage);

    if is_crit {
        log.push(format!("Critical {}! You hit for {}!", skill.name, damage));
    } else {
        log.push(format!("{} hits for {}!", skill.name, damage));
    }
    debug!(skill = %skill.name, damage, is_crit, enemy_hp = enemy.hp, "player hit");

    let stolen = lifesteal_heal(damage, stats.lifesteal_percent);
    if stolen > 0 {
        let restored = character.heal(stolen);
        if restored > 0 {
            log.push(format!("You drain {} HP.", restored));
        }
    }
}

/// Enemy attacks the player. Returns `Victory` if reflected damage kills it.
fn enemy_retaliation(
    character: &mut Character,
    enemy: &mut Enemy,
    guard: f64,
    log: &mut Vec<String>,
    rng: &mut impl Rng,
) -> TurnOutcome {
    let stats = character.stats();

    if roll_chance(stats.dodge_chance_percent, rng) {
        log.push(format!("You dodge {}'s attack!", enemy.name));
        return TurnOutcome::Continuing;
    }

    let is_crit = roll_chance(enemy.crit_chance_percent, rng);
    let damage = enemy_hit_damage(enemy.attack, stats.defense, guard, is_crit);
    character.take_damage(damage);

    if is_crit {
        log.push(format!("{} lands a critical hit for {}!", enemy.name, damage));
    } else {
        log.push(format!("{} hits you for {}!", enemy.name, damage));
    }
    debug!(enemy = %enemy.name, damage, is_crit, player_hp = character.hp, "enemy hit");

    if !character.is_alive() {
        log.push("You have fallen...".to_string());
        return TurnOutcome::GameOver;
    }

    let drained = percent_share(damage, enemy.lifesteal_percent);
    if drained > 0 {
        enemy.restore(drained);
        log.push(format!("{} drains {} HP.", enemy.name, drained));
    }

    let reflected = percent_share(damage, stats.reflect_percent);
    if reflected > 0 {
        enemy.take_damage(reflected);
        log.push(format!("{} damage is reflected back!", reflected));
        if !enemy.is_alive() {
            log.push(format!("{} is defeated!", enemy.name));
            return TurnOutcome::Victory;
        }
    }

    TurnOutcome::Continuing
}
