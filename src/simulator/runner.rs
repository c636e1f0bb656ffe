//! Plays whole runs through the real [`Engine`] with a simple bot policy.
//!
//! Statistics are read back from the reports the engine returns, so the
//! simulation exercises exactly the rules the game uses.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::character::Character;
use crate::combat::TurnOutcome;
use crate::core::{Engine, EngineError, RunPhase};
use crate::dungeon::{Goods, Room, RoomType};
use crate::items::{Item, LootAction, StatModifiers};
use crate::skills::SkillKind;
use crate::utils::persistence::MemoryStore;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// HP share below which the bot heals instead of attacking.
const LOW_HP_RATIO: f64 = 0.4;
/// HP share below which the bot avoids elites.
const ELITE_HP_RATIO: f64 = 0.7;

/// Seed for run `run_idx` of a seeded batch. Wraps near `u64::MAX`.
fn run_seed(base: u64, run_idx: u64) -> u64 {
    base.wrapping_add(run_idx)
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(run_seed(seed, run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(config, rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Floor {}, Level {}, Kills {} ({} elite), Gold {}, {}",
                run_idx + 1,
                config.num_runs,
                stats.final_floor,
                stats.final_level,
                stats.kills,
                stats.elite_kills,
                stats.final_gold,
                if stats.died { "died" } else { "survived" }
            );
        }
        all_runs.push(stats);
    }

    SimReport::from_runs(all_runs, config.max_floor)
}

/// Play one run to death or to `config.max_floor`.
pub fn simulate_single_run<R: Rng>(config: &SimConfig, rng: R) -> RunStats {
    let mut engine = Engine::new(rng, MemoryStore::new());
    let mut stats = RunStats::default();
    let mut fight_turns = 0;
    engine.start_run();

    loop {
        let result = match engine.phase() {
            RunPhase::RoomSelection => {
                let index = choose_room(engine.character(), engine.rooms());
                engine.select_room(index).map(|encounter| {
                    if encounter.room.room_type == RoomType::Rest {
                        stats.rests += 1;
                    }
                })
            }
            RunPhase::Combat => fight_one_turn(&mut engine, config, &mut fight_turns, &mut stats),
            RunPhase::LootDecision => {
                let action = match engine.pending_loot() {
                    Some(pending) => choose_loot_action(engine.character(), &pending.item),
                    None => LootAction::Take,
                };
                stats.items_found += 1;
                engine.resolve_loot_decision(action).map(|_| ())
            }
            RunPhase::Merchant => shop(&mut engine, &mut stats),
            RunPhase::Cleared => {
                if engine.character().floor >= config.max_floor {
                    stats.reached_target = true;
                    break;
                }
                engine.advance_floor().map(|_| ())
            }
            RunPhase::GameOver => {
                stats.died = true;
                break;
            }
            RunPhase::Idle => {
                engine.start_run();
                Ok(())
            }
        };

        if let Err(e) = result {
            // The bot only issues legal actions; bail rather than spin.
            debug!(error = %e, "simulated action rejected");
            break;
        }
    }

    let character = engine.character();
    stats.final_floor = character.floor;
    stats.final_level = character.level;
    stats.final_gold = character.gold;
    stats.shards = engine.rare_currency();
    stats
}

fn hp_ratio(character: &Character) -> f64 {
    character.hp as f64 / character.max_hp().max(1) as f64
}

/// Rest when hurt, skip elites when not healthy, otherwise take the first room.
fn choose_room(character: &Character, rooms: &[Room]) -> usize {
    let ratio = hp_ratio(character);
    let position = |room_type: RoomType| rooms.iter().position(|r| r.room_type == room_type);

    if ratio < LOW_HP_RATIO {
        if let Some(index) = position(RoomType::Rest) {
            return index;
        }
    }
    if ratio < ELITE_HP_RATIO {
        if let Some(index) = rooms.iter().position(|r| r.room_type != RoomType::Elite) {
            return index;
        }
    }
    0
}

fn fight_one_turn<R: Rng>(
    engine: &mut Engine<R, MemoryStore>,
    config: &SimConfig,
    fight_turns: &mut u32,
    stats: &mut RunStats,
) -> Result<(), EngineError> {
    *fight_turns += 1;
    let character = engine.character();
    let low = hp_ratio(character) < LOW_HP_RATIO;

    if low {
        if let Some(index) = character.inventory.iter().position(Item::is_consumable) {
            engine.use_item(index)?;
            return Ok(());
        }
    }

    let report = if *fight_turns > config.max_turns_per_fight {
        engine.flee()?
    } else {
        let skill_index = choose_skill(engine.character(), low);
        engine.resolve_combat_turn(skill_index)?
    };

    if report.outcome.is_terminal() {
        *fight_turns = 0;
    }
    match report.outcome {
        TurnOutcome::Victory => {
            stats.kills += 1;
            if report.enemy.is_elite {
                stats.elite_kills += 1;
            }
            if let Some(rewards) = report.rewards {
                if rewards.item.is_some() && report.phase != RunPhase::LootDecision {
                    stats.items_found += 1;
                }
                if rewards.skill.is_some() {
                    stats.skills_learned += 1;
                }
            }
        }
        TurnOutcome::Fled => stats.flees += 1,
        TurnOutcome::GameOver | TurnOutcome::Continuing => {}
    }
    Ok(())
}

/// Heal when low, otherwise the hardest-hitting damage skill.
fn choose_skill(character: &Character, low: bool) -> usize {
    let active = character.skills.active();
    if low {
        if let Some(index) = active.iter().position(|s| s.kind == SkillKind::Heal) {
            return index;
        }
    }
    active
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind == SkillKind::Damage)
        .max_by(|(_, a), (_, b)| a.power.total_cmp(&b.power))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

fn gear_score(modifiers: &StatModifiers) -> u32 {
    modifiers.attack * 3
        + modifiers.defense * 3
        + modifiers.max_hp / 5
        + modifiers.crit
        + modifiers.dodge
        + modifiers.lifesteal
        + modifiers.reflect / 2
        + modifiers.pierce * 2
}

fn choose_loot_action(character: &Character, item: &Item) -> LootAction {
    let current = item
        .slot()
        .and_then(|slot| character.equipment.get(slot).as_ref())
        .map(|equipped| gear_score(&equipped.modifiers))
        .unwrap_or(0);
    if gear_score(&item.modifiers) > current {
        LootAction::Swap
    } else {
        LootAction::Discard
    }
}

/// Buy the first affordable offering the bot wants, then leave.
fn shop<R: Rng>(
    engine: &mut Engine<R, MemoryStore>,
    stats: &mut RunStats,
) -> Result<(), EngineError> {
    let character = engine.character();
    let wanted = engine.current_offerings().iter().find(|o| {
        o.price <= character.gold
            && match &o.goods {
                Goods::Skill(skill) => !character.skills.knows(skill.id),
                Goods::Item(item) => {
                    item.is_consumable()
                        || choose_loot_action(character, item) == LootAction::Swap
                }
            }
    });

    match wanted.map(|o| o.id) {
        Some(id) => {
            engine.purchase(id)?;
            stats.purchases += 1;
            Ok(())
        }
        None => engine.leave_merchant(),
    }
}
