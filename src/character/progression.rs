//! Experience and level-ups.

use super::state::Character;
use crate::core::constants::{LEVEL_UP_ATTACK, LEVEL_UP_MAX_HP};

/// Adds experience and resolves every level-up it pays for.
///
/// The threshold stays fixed across levels. Returns the number of levels gained.
pub fn gain_xp(character: &mut Character, amount: u32) -> u32 {
    character.xp += amount;
    let mut levels = 0;
    while character.xp_to_next > 0 && character.xp >= character.xp_to_next {
        character.xp -= character.xp_to_next;
        character.level += 1;
        character.base.max_hp += LEVEL_UP_MAX_HP;
        character.base.attack += LEVEL_UP_ATTACK;
        levels += 1;
    }
    levels
}
