//! Random event rooms and the non-combat room effects.

use crate::character::Character;
use crate::core::constants::*;
use crate::items::{try_drop_item, Item};
use rand::Rng;

/// Result of an event room roll, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Nothing,
    GoldCache(u32),
    Shrine(u32),
    /// Trap damage as a share of max HP.
    Trap,
}

pub fn roll_event(floor: u32, rng: &mut impl Rng) -> EventOutcome {
    let roll = rng.gen::<f64>();
    if roll < EVENT_NOTHING_THRESHOLD {
        EventOutcome::Nothing
    } else if roll < EVENT_GOLD_THRESHOLD {
        EventOutcome::GoldCache(rng.gen_range(EVENT_GOLD_MIN..=EVENT_GOLD_MAX) + floor)
    } else if roll < EVENT_SHRINE_THRESHOLD {
        EventOutcome::Shrine(EVENT_SHRINE_HEAL)
    } else {
        EventOutcome::Trap
    }
}

/// Applies an event to the character and returns the log line.
///
/// A trap never takes the character below 1 HP.
pub fn apply_event(character: &mut Character, outcome: EventOutcome) -> String {
    match outcome {
        EventOutcome::Nothing => "The room is empty. Nothing happens.".to_string(),
        EventOutcome::GoldCache(gold) => {
            character.gold += gold;
            format!("You find a hidden cache: +{}G.", gold)
        }
        EventOutcome::Shrine(amount) => {
            let restored = character.heal(amount);
            format!("A shrine glows. Healed {} HP.", restored)
        }
        EventOutcome::Trap => {
            let damage = trap_damage(character.max_hp());
            let before = character.hp;
            character.hp = character.hp.saturating_sub(damage).max(1);
            format!("A trap springs! -{} HP.", before - character.hp)
        }
    }
}

fn trap_damage(max_hp: u32) -> u32 {
    ((max_hp as f64 * EVENT_TRAP_RATIO).floor() as u32).max(1)
}

/// Treasure room: gold plus an item roll at the floor's drop rate.
pub fn open_treasure(
    character: &mut Character,
    rng: &mut impl Rng,
) -> (String, Option<Item>) {
    let gold = rng.gen_range(TREASURE_GOLD_MIN..=TREASURE_GOLD_MAX);
    character.gold += gold;
    let item = try_drop_item(character.floor, rng);
    (format!("Found {} gold!", gold), item)
}

/// Rest room: recover a share of effective max HP.
pub fn take_rest(character: &mut Character) -> String {
    let amount = (character.max_hp() as f64 * REST_HEAL_RATIO).floor() as u32;
    let restored = character.heal(amount);
    format!("Rested. Recovered {} HP.", restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_event_distribution_covers_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut counts = [0u32; 4];
        for _ in 0..2000 {
            match roll_event(3, &mut rng) {
                EventOutcome::Nothing => counts[0] += 1,
                EventOutcome::GoldCache(g) => {
                    assert!((8..=23).contains(&g));
                    counts[1] += 1;
                }
                EventOutcome::Shrine(h) => {
                    assert_eq!(h, EVENT_SHRINE_HEAL);
                    counts[2] += 1;
                }
                EventOutcome::Trap => counts[3] += 1,
            }
        }
        assert!(counts.iter().all(|&c| c > 0));
        // Nothing is the most common outcome
        assert!(counts[0] > counts[3]);
    }

    #[test]
    fn test_gold_cache_adds_gold() {
        let mut c = Character::new();
        apply_event(&mut c, EventOutcome::GoldCache(12));
        assert_eq!(c.gold, 12);
    }

    #[test]
    fn test_shrine_caps_at_max() {
        let mut c = Character::new();
        c.hp = c.max_hp() - 5;
        let msg = apply_event(&mut c, EventOutcome::Shrine(15));
        assert_eq!(c.hp, c.max_hp());
        assert!(msg.contains("5 HP"));
    }

    #[test]
    fn test_trap_never_kills() {
        let mut c = Character::new();
        c.hp = 3;
        apply_event(&mut c, EventOutcome::Trap);
        assert_eq!(c.hp, 1);

        c.hp = 1;
        apply_event(&mut c, EventOutcome::Trap);
        assert_eq!(c.hp, 1);
    }

    #[test]
    fn test_trap_takes_tenth_of_max() {
        let mut c = Character::new();
        apply_event(&mut c, EventOutcome::Trap);
        assert_eq!(c.hp, 90);
    }

    #[test]
    fn test_treasure_gold_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let mut c = Character::new();
            let _ = open_treasure(&mut c, &mut rng);
            assert!((TREASURE_GOLD_MIN..=TREASURE_GOLD_MAX).contains(&c.gold));
        }
    }

    #[test]
    fn test_rest_heals_thirty_percent() {
        let mut c = Character::new();
        c.hp = 10;
        take_rest(&mut c);
        assert_eq!(c.hp, 40);

        c.hp = 95;
        take_rest(&mut c);
        assert_eq!(c.hp, 100);
    }
}
