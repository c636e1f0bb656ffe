//! Run engine: the state machine that drives one dungeon run.
//!
//! The engine owns the character, the current room batch, the active enemy,
//! and any loot decision or merchant visit in progress. Every operation checks
//! the phase first and returns an [`EngineError`] without touching run state
//! when called at the wrong time.
//!
//! Randomness comes from the injected `R`, and the rare-currency counter is
//! read from and written to the injected [`ValueStore`].

use super::constants::*;
use super::error::EngineError;
use crate::character::{gain_xp, Character};
use crate::combat::{resolve_flee, resolve_turn, Enemy, TurnOutcome, TurnResolution};
use crate::dungeon::{
    apply_event, create_elite, create_enemy, generate_rooms, open_treasure, roll_event, take_rest,
    Goods, Offering, Room, RoomType, ENEMY_ARCHETYPES,
};
use crate::items::{
    apply_loot_action, resolve_acquired_item, roll_shard_drop, try_drop_item, EquipmentSlot, Item,
    LootAction, LootResolution,
};
use crate::skills::{LearnOutcome, Skill, SkillId, LEARNABLE_SKILLS};
use crate::utils::persistence::ValueStore;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where the run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run started yet.
    Idle,
    /// Waiting for the player to pick one of the floor's rooms.
    RoomSelection,
    Combat,
    /// An acquired item needs a swap/take/discard decision.
    LootDecision,
    Merchant,
    /// The encounter is resolved; the next floor can be entered.
    Cleared,
    GameOver,
}

impl RunPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, RunPhase::Idle | RunPhase::GameOver)
    }
}

/// State handed back when a run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSnapshot {
    pub character: Character,
    pub rooms: Vec<Room>,
}

/// What entering a room did.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterResult {
    pub room: Room,
    pub phase: RunPhase,
    pub character: Character,
    pub log: Vec<String>,
}

/// Everything a victory paid out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VictoryRewards {
    pub xp: u32,
    pub levels_gained: u32,
    pub gold: u32,
    pub healed: u32,
    pub item: Option<String>,
    pub shard: bool,
    pub skill: Option<String>,
}

/// Result of one combat action (a skill or a flee attempt).
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub character: Character,
    pub enemy: Enemy,
    pub log: Vec<String>,
    pub rewards: Option<VictoryRewards>,
    pub phase: RunPhase,
}

/// An item waiting on a [`LootAction`] because its slot is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoot {
    pub item: Item,
    resume: RunPhase,
}

pub struct Engine<R: Rng, S: ValueStore> {
    rng: R,
    store: S,
    character: Character,
    rooms: Vec<Room>,
    current_room: Option<usize>,
    enemy: Option<Enemy>,
    pending_loot: Option<PendingLoot>,
    phase: RunPhase,
    rare_currency: u64,
    messages: VecDeque<String>,
}

impl<R: Rng, S: ValueStore> Engine<R, S> {
    /// Creates an idle engine and loads the shard counter from `store`.
    pub fn new(rng: R, store: S) -> Self {
        let rare_currency = match store.read(RARE_CURRENCY_KEY) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "could not read shard counter, starting from 0");
                0
            }
        };

        Self {
            rng,
            store,
            character: Character::new(),
            rooms: Vec::new(),
            current_room: None,
            enemy: None,
            pending_loot: None,
            phase: RunPhase::Idle,
            rare_currency,
            messages: VecDeque::with_capacity(MESSAGE_LOG_CAPACITY),
        }
    }

    // ---- accessors ----

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Applies `edit` to the character, then pulls HP back under the
    /// effective max.
    pub fn edit_character(&mut self, edit: impl FnOnce(&mut Character)) -> &Character {
        edit(&mut self.character);
        self.character.clamp_hp();
        &self.character
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn pending_loot(&self) -> Option<&PendingLoot> {
        self.pending_loot.as_ref()
    }

    /// Stock of the merchant being visited, empty outside a merchant room.
    pub fn current_offerings(&self) -> &[Offering] {
        match (self.phase, self.current_room) {
            (RunPhase::Merchant, Some(index)) => self
                .rooms
                .get(index)
                .map(|room| room.offerings.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn rare_currency(&self) -> u64 {
        self.rare_currency
    }

    /// The most recent player-facing messages, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    // ---- run flow ----

    /// Starts a fresh run on floor 1, discarding any run in progress.
    pub fn start_run(&mut self) -> RunSnapshot {
        self.character = Character::new();
        self.enemy = None;
        self.pending_loot = None;
        self.current_room = None;
        self.rooms = generate_rooms(self.character.floor, &mut self.rng);
        self.phase = RunPhase::RoomSelection;
        self.messages.clear();
        self.log("You enter the dungeon.");
        info!(rooms = self.rooms.len(), shards = self.rare_currency, "run started");

        RunSnapshot {
            character: self.character.clone(),
            rooms: self.rooms.clone(),
        }
    }

    /// Replaces the room batch on offer with a scripted one.
    ///
    /// The batch must look like a generated one: 2 to 4 rooms, at most one
    /// of them a Rest.
    pub fn override_rooms(&mut self, rooms: Vec<Room>) -> Result<(), EngineError> {
        self.require(RunPhase::RoomSelection)?;
        if !(MIN_ROOMS_PER_FLOOR..=MAX_ROOMS_PER_FLOOR).contains(&rooms.len()) {
            return Err(EngineError::InvalidRoomBatch(format!(
                "{} rooms, expected {} to {}",
                rooms.len(),
                MIN_ROOMS_PER_FLOOR,
                MAX_ROOMS_PER_FLOOR
            )));
        }
        let rests = rooms
            .iter()
            .filter(|room| room.room_type == RoomType::Rest)
            .count();
        if rests > 1 {
            return Err(EngineError::InvalidRoomBatch(format!(
                "{} rest rooms, at most 1 allowed",
                rests
            )));
        }
        self.rooms = rooms;
        Ok(())
    }

    /// Enters the room at `index` and resolves whatever does not need input.
    pub fn select_room(&mut self, index: usize) -> Result<EncounterResult, EngineError> {
        self.require(RunPhase::RoomSelection)?;
        let room = self
            .rooms
            .get(index)
            .cloned()
            .ok_or(EngineError::InvalidIndex {
                what: "room",
                index,
                len: self.rooms.len(),
            })?;

        self.current_room = Some(index);
        let floor = self.character.floor;
        let mut log = Vec::new();

        match room.room_type {
            RoomType::Enemy | RoomType::Elite => {
                let enemy = room.enemy.clone().unwrap_or_else(|| {
                    if room.room_type == RoomType::Elite {
                        create_elite(floor)
                    } else {
                        create_enemy(&ENEMY_ARCHETYPES[0], floor)
                    }
                });
                log.push(format!("Encountered {}!", enemy.name));
                self.enemy = Some(enemy);
                self.phase = RunPhase::Combat;
            }
            RoomType::Treasure => {
                let (line, item) = open_treasure(&mut self.character, &mut self.rng);
                log.push(line);
                self.phase = RunPhase::Cleared;
                if let Some(item) = item {
                    self.hand_over_item(item, RunPhase::Cleared, &mut log);
                }
            }
            RoomType::Rest => {
                log.push(take_rest(&mut self.character));
                self.phase = RunPhase::Cleared;
            }
            RoomType::Merchant => {
                log.push("A merchant shows their wares.".to_string());
                self.phase = RunPhase::Merchant;
            }
            RoomType::Event => {
                let outcome = roll_event(floor, &mut self.rng);
                log.push(apply_event(&mut self.character, outcome));
                self.phase = RunPhase::Cleared;
            }
        }

        self.log_all(&log);
        debug!(
            room = room.room_type.label(),
            title = room.title(),
            phase = ?self.phase,
            "room selected"
        );

        Ok(EncounterResult {
            room,
            phase: self.phase,
            character: self.character.clone(),
            log,
        })
    }

    /// Uses the active skill at `skill_index` against the current enemy.
    pub fn resolve_combat_turn(&mut self, skill_index: usize) -> Result<TurnReport, EngineError> {
        self.require(RunPhase::Combat)?;
        let skill: Skill = self
            .character
            .skills
            .get(skill_index)
            .cloned()
            .ok_or(EngineError::InvalidIndex {
                what: "skill",
                index: skill_index,
                len: self.character.skills.active().len(),
            })?;
        let mut enemy = self.take_enemy()?;

        let resolution = resolve_turn(&mut self.character, &mut enemy, &skill, &mut self.rng);
        Ok(self.finish_turn(resolution, enemy))
    }

    /// Tries to escape the current fight.
    pub fn flee(&mut self) -> Result<TurnReport, EngineError> {
        self.require(RunPhase::Combat)?;
        let mut enemy = self.take_enemy()?;

        let resolution = resolve_flee(&mut self.character, &mut enemy, &mut self.rng);
        Ok(self.finish_turn(resolution, enemy))
    }

    /// Settles the pending item and returns to the phase it interrupted.
    pub fn resolve_loot_decision(&mut self, action: LootAction) -> Result<Character, EngineError> {
        self.require(RunPhase::LootDecision)?;
        let pending = self.pending_loot.take().ok_or(EngineError::WrongPhase {
            expected: RunPhase::LootDecision,
            actual: self.phase,
        })?;

        let line = apply_loot_action(&mut self.character, pending.item, action);
        self.phase = pending.resume;
        self.log(line);
        Ok(self.character.clone())
    }

    /// Buys an offering from the merchant being visited.
    ///
    /// Not enough gold leaves everything but the message log untouched.
    pub fn purchase(&mut self, offering_id: Uuid) -> Result<Character, EngineError> {
        self.require(RunPhase::Merchant)?;
        let room_index = self
            .current_room
            .ok_or(EngineError::UnknownOffering(offering_id))?;
        let (position, offering) = self
            .rooms
            .get(room_index)
            .and_then(|room| {
                room.offerings
                    .iter()
                    .position(|o| o.id == offering_id)
                    .map(|pos| (pos, room.offerings[pos].clone()))
            })
            .ok_or(EngineError::UnknownOffering(offering_id))?;

        let name = offering.goods.name().to_string();
        let gold = self.character.gold;
        if offering.price > gold {
            self.log(format!("Not enough gold for {} ({}G).", name, offering.price));
            return Err(EngineError::InsufficientGold {
                price: offering.price,
                gold,
            });
        }
        if let Goods::Skill(skill) = &offering.goods {
            if self.character.skills.knows(skill.id) {
                self.log(format!("You already know {}.", name));
                return Err(EngineError::AlreadyKnown(name));
            }
        }

        self.character.gold -= offering.price;
        if let Some(room) = self.rooms.get_mut(room_index) {
            room.offerings.remove(position);
        }

        let mut log = vec![format!("Bought {} for {}G.", name, offering.price)];
        match offering.goods {
            Goods::Item(item) => {
                self.hand_over_item(item, RunPhase::Merchant, &mut log);
            }
            Goods::Skill(skill) => log.push(self.learn_skill(skill)),
        }
        self.log_all(&log);
        Ok(self.character.clone())
    }

    pub fn leave_merchant(&mut self) -> Result<(), EngineError> {
        self.require(RunPhase::Merchant)?;
        self.phase = RunPhase::Cleared;
        self.log("You leave the merchant behind.");
        Ok(())
    }

    /// Descends one floor and generates the next room batch.
    pub fn advance_floor(&mut self) -> Result<Vec<Room>, EngineError> {
        self.require(RunPhase::Cleared)?;
        self.character.floor += 1;
        self.current_room = None;
        self.rooms = generate_rooms(self.character.floor, &mut self.rng);
        self.phase = RunPhase::RoomSelection;

        let floor = self.character.floor;
        self.log(format!("Descended to floor {}.", floor));
        info!(floor, "floor advanced");
        Ok(self.rooms.clone())
    }

    // ---- inventory and skills ----

    /// Drinks the consumable at `index` in the inventory.
    pub fn use_item(&mut self, index: usize) -> Result<Character, EngineError> {
        self.require_active()?;
        let item = self.inventory_item(index)?;
        if !item.is_consumable() {
            return Err(EngineError::CannotUse(format!(
                "{} is not a consumable",
                item.name
            )));
        }

        let item = self.character.inventory.remove(index);
        let restored = self.character.heal(item.modifiers.heal);
        self.log(format!("Used {}. Healed {} HP.", item.name, restored));
        Ok(self.character.clone())
    }

    /// Equips the inventory item at `index`, stowing whatever it displaces.
    pub fn equip_from_inventory(&mut self, index: usize) -> Result<Character, EngineError> {
        self.require_active()?;
        let item = self.inventory_item(index)?;
        if item.slot().is_none() {
            return Err(EngineError::CannotUse(format!(
                "{} cannot be equipped",
                item.name
            )));
        }

        let item = self.character.inventory.remove(index);
        let name = item.name.clone();
        let line = match self.character.equip(item) {
            Ok(Some(old)) => {
                let line = format!("Equipped {}, stowed {}.", name, old.name);
                self.character.inventory.push(old);
                line
            }
            Ok(None) => format!("Equipped {}.", name),
            Err(item) => {
                self.character.inventory.insert(index, item);
                return Err(EngineError::CannotUse(format!("{} cannot be equipped", name)));
            }
        };
        self.log(line);
        Ok(self.character.clone())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Character, EngineError> {
        self.require_active()?;
        if !self.character.unequip(slot) {
            return Err(EngineError::NothingEquipped(slot));
        }
        self.log(format!("Unequipped {:?}.", slot));
        Ok(self.character.clone())
    }

    /// Exchanges an active skill with one from storage.
    pub fn swap_skill(&mut self, active: usize, stored: usize) -> Result<Character, EngineError> {
        self.require_active()?;
        let skills = &self.character.skills;
        if active >= skills.active().len() {
            return Err(EngineError::InvalidIndex {
                what: "active skill",
                index: active,
                len: skills.active().len(),
            });
        }
        if stored >= skills.stored().len() {
            return Err(EngineError::InvalidIndex {
                what: "stored skill",
                index: stored,
                len: skills.stored().len(),
            });
        }

        self.character.skills.swap(active, stored);
        self.log("Skills rearranged.");
        Ok(self.character.clone())
    }

    // ---- internals ----

    fn require(&self, expected: RunPhase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn require_active(&self) -> Result<(), EngineError> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(EngineError::NoActiveRun(self.phase))
        }
    }

    fn take_enemy(&mut self) -> Result<Enemy, EngineError> {
        self.enemy.take().ok_or(EngineError::WrongPhase {
            expected: RunPhase::Combat,
            actual: self.phase,
        })
    }

    fn inventory_item(&self, index: usize) -> Result<&Item, EngineError> {
        self.character
            .inventory
            .get(index)
            .ok_or(EngineError::InvalidIndex {
                what: "inventory",
                index,
                len: self.character.inventory.len(),
            })
    }

    fn log(&mut self, message: impl Into<String>) {
        if self.messages.len() == MESSAGE_LOG_CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    fn log_all(&mut self, lines: &[String]) {
        for line in lines {
            self.log(line.clone());
        }
    }

    fn finish_turn(&mut self, resolution: TurnResolution, enemy: Enemy) -> TurnReport {
        let TurnResolution { outcome, mut log } = resolution;
        let mut rewards = None;

        match outcome {
            TurnOutcome::Continuing => {
                self.enemy = Some(enemy.clone());
            }
            TurnOutcome::Victory => {
                self.phase = RunPhase::Cleared;
                rewards = Some(self.grant_victory_rewards(enemy.is_elite, &mut log));
                info!(enemy = %enemy.name, floor = self.character.floor, "victory");
            }
            TurnOutcome::GameOver => {
                self.phase = RunPhase::GameOver;
                info!(
                    floor = self.character.floor,
                    level = self.character.level,
                    "game over"
                );
            }
            TurnOutcome::Fled => {
                self.phase = RunPhase::Cleared;
            }
        }

        self.log_all(&log);
        TurnReport {
            outcome,
            character: self.character.clone(),
            enemy,
            log,
            rewards,
            phase: self.phase,
        }
    }

    fn grant_victory_rewards(&mut self, is_elite: bool, log: &mut Vec<String>) -> VictoryRewards {
        let floor = self.character.floor;

        let xp = if is_elite {
            XP_REWARD_ELITE
        } else {
            XP_REWARD_COMMON
        };
        let levels_gained = gain_xp(&mut self.character, xp);

        let mut gold = VICTORY_GOLD_BASE + VICTORY_GOLD_PER_FLOOR * floor;
        if is_elite {
            gold *= ELITE_GOLD_MULTIPLIER;
        }
        self.character.gold += gold;
        log.push(format!("+{} XP, +{}G.", xp, gold));

        if levels_gained > 0 {
            let level = self.character.level;
            log.push(format!("Level up! You are now level {}.", level));
            info!(level, "level up");
        }

        let healed = self.character.heal(VICTORY_HEAL);
        if healed > 0 {
            log.push(format!("Recovered {} HP.", healed));
        }

        let shard = roll_shard_drop(is_elite, &mut self.rng);
        if shard {
            self.add_rare_currency(1);
            log.push("A shard glimmers among the remains.".to_string());
        }

        let skill = if is_elite && self.rng.gen_bool(SKILL_REWARD_CHANCE_ELITE) {
            self.random_unknown_skill().map(|skill| {
                let name = skill.name.clone();
                log.push(self.learn_skill(skill));
                name
            })
        } else {
            None
        };

        let item = try_drop_item(floor, &mut self.rng)
            .map(|item| self.hand_over_item(item, RunPhase::Cleared, log));

        VictoryRewards {
            xp,
            levels_gained,
            gold,
            healed,
            item,
            shard,
            skill,
        }
    }

    /// Routes a new item through loot resolution. `resume` is the phase to
    /// land in once it is settled. Returns the item name.
    fn hand_over_item(&mut self, item: Item, resume: RunPhase, log: &mut Vec<String>) -> String {
        match resolve_acquired_item(&mut self.character, item) {
            LootResolution::Stored(name) => {
                log.push(format!("{} added to inventory.", name));
                self.phase = resume;
                name
            }
            LootResolution::AutoEquipped(name) => {
                log.push(format!("Found and equipped {}.", name));
                self.phase = resume;
                name
            }
            LootResolution::Pending(item) => {
                let name = item.name.clone();
                log.push(format!(
                    "Found {} ({}). Swap, take, or discard?",
                    name,
                    item.rarity.name()
                ));
                self.pending_loot = Some(PendingLoot { item, resume });
                self.phase = RunPhase::LootDecision;
                name
            }
        }
    }

    fn random_unknown_skill(&mut self) -> Option<Skill> {
        let candidates: Vec<SkillId> = LEARNABLE_SKILLS
            .iter()
            .copied()
            .filter(|id| !self.character.skills.knows(*id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let id = candidates[self.rng.gen_range(0..candidates.len())];
        Some(Skill::from_id(id))
    }

    fn learn_skill(&mut self, skill: Skill) -> String {
        let name = skill.name.clone();
        match self.character.skills.learn(skill) {
            LearnOutcome::Active => format!("Learned {}!", name),
            LearnOutcome::Stored => format!("Learned {}. It waits in storage.", name),
            LearnOutcome::AlreadyKnown => format!("You already know {}.", name),
        }
    }

    fn add_rare_currency(&mut self, amount: u64) {
        self.rare_currency += amount;
        if let Err(e) = self.store.write(RARE_CURRENCY_KEY, self.rare_currency) {
            warn!(error = %e, shards = self.rare_currency, "failed to persist shard counter");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PersistenceError;
    use crate::items::catalog::catalog_item;
    use crate::utils::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestEngine = Engine<ChaCha8Rng, MemoryStore>;

    fn room(room_type: RoomType, description: &str) -> Room {
        Room::new(room_type, description, &mut rand::thread_rng())
    }

    fn engine() -> TestEngine {
        Engine::new(ChaCha8Rng::seed_from_u64(42), MemoryStore::new())
    }

    /// Character whose chance rolls never fire.
    fn steady(engine: &mut TestEngine) {
        engine.edit_character(|c| {
            c.base.crit_chance_percent = 0;
            c.base.dodge_chance_percent = 0;
        });
    }

    fn fight(enemy: Enemy) -> Room {
        let room_type = if enemy.is_elite {
            RoomType::Elite
        } else {
            RoomType::Enemy
        };
        room(room_type, "test").with_enemy(enemy)
    }

    /// Pads `scripted` into a legal batch; it stays at index 0.
    fn batch(scripted: Room) -> Vec<Room> {
        vec![scripted, room(RoomType::Treasure, "filler")]
    }

    /// Starts a fresh run and kills a one-hit elite. `prepare` runs on the
    /// new character first.
    fn elite_kill(e: &mut TestEngine, prepare: impl Fn(&mut Character)) -> VictoryRewards {
        e.start_run();
        e.edit_character(|c| {
            c.base.crit_chance_percent = 0;
            c.base.dodge_chance_percent = 0;
            c.base.attack = 10_000;
            prepare(c);
        });
        e.override_rooms(batch(fight(Enemy::new("Knight".to_string(), 10, 1).elite())))
            .unwrap();
        e.select_room(0).unwrap();
        let report = e.resolve_combat_turn(0).unwrap();
        assert_eq!(report.outcome, TurnOutcome::Victory);
        report.rewards.unwrap()
    }

    struct BrokenStore;

    impl ValueStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<u64>, PersistenceError> {
            Err(PersistenceError::NoHomeDir)
        }
        fn write(&mut self, _key: &str, _value: u64) -> Result<(), PersistenceError> {
            Err(PersistenceError::NoHomeDir)
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let e = engine();
        assert_eq!(e.phase(), RunPhase::Idle);
        assert_eq!(e.rare_currency(), 0);
        assert!(e.rooms().is_empty());
    }

    #[test]
    fn test_shards_loaded_from_store() {
        let store = MemoryStore::new().with_value(RARE_CURRENCY_KEY, 7);
        let e = Engine::new(ChaCha8Rng::seed_from_u64(1), store);
        assert_eq!(e.rare_currency(), 7);
    }

    #[test]
    fn test_unreadable_store_starts_at_zero() {
        let e = Engine::new(ChaCha8Rng::seed_from_u64(1), BrokenStore);
        assert_eq!(e.rare_currency(), 0);
    }

    #[test]
    fn test_start_run() {
        let mut e = engine();
        let snapshot = e.start_run();
        assert_eq!(e.phase(), RunPhase::RoomSelection);
        assert_eq!(snapshot.character.floor, 1);
        assert_eq!(snapshot.character.hp, 100);
        assert!((2..=4).contains(&snapshot.rooms.len()));
        assert_eq!(snapshot.rooms, e.rooms());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Engine::new(ChaCha8Rng::seed_from_u64(9), MemoryStore::new());
        let mut b = Engine::new(ChaCha8Rng::seed_from_u64(9), MemoryStore::new());
        assert_eq!(a.start_run(), b.start_run());

        for index in 0..a.rooms().len() {
            let mut a2 = Engine::new(ChaCha8Rng::seed_from_u64(9), MemoryStore::new());
            let mut b2 = Engine::new(ChaCha8Rng::seed_from_u64(9), MemoryStore::new());
            a2.start_run();
            b2.start_run();
            assert_eq!(a2.select_room(index), b2.select_room(index));
            assert_eq!(a2.current_offerings(), b2.current_offerings());
        }
    }

    #[test]
    fn test_wrong_phase_is_rejected() {
        let mut e = engine();
        assert_eq!(
            e.select_room(0),
            Err(EngineError::WrongPhase {
                expected: RunPhase::RoomSelection,
                actual: RunPhase::Idle
            })
        );
        assert!(matches!(e.use_item(0), Err(EngineError::NoActiveRun(_))));

        e.start_run();
        assert_eq!(
            e.resolve_combat_turn(0).unwrap_err(),
            EngineError::WrongPhase {
                expected: RunPhase::Combat,
                actual: RunPhase::RoomSelection
            }
        );
        assert!(e.advance_floor().is_err());
        assert_eq!(e.phase(), RunPhase::RoomSelection);
    }

    #[test]
    fn test_invalid_room_index_changes_nothing() {
        let mut e = engine();
        e.start_run();
        let rooms = e.rooms().to_vec();
        let err = e.select_room(99).unwrap_err();
        assert!(matches!(err, EngineError::InvalidIndex { what: "room", .. }));
        assert_eq!(e.phase(), RunPhase::RoomSelection);
        assert_eq!(e.rooms(), rooms.as_slice());
    }

    #[test]
    fn test_override_rejects_malformed_batches() {
        let mut e = engine();
        e.start_run();
        let rooms = e.rooms().to_vec();
        let rest = || room(RoomType::Rest, "safe");
        let treasure = || room(RoomType::Treasure, "shiny");

        for bad in [
            vec![],
            vec![treasure()],
            vec![treasure(), treasure(), treasure(), treasure(), treasure()],
            vec![rest(), rest()],
            vec![rest(), treasure(), rest()],
        ] {
            assert!(matches!(
                e.override_rooms(bad),
                Err(EngineError::InvalidRoomBatch(_))
            ));
            assert_eq!(e.rooms(), rooms.as_slice());
        }

        // The run is still playable
        assert_eq!(e.phase(), RunPhase::RoomSelection);
        e.override_rooms(vec![rest(), treasure(), treasure(), treasure()])
            .unwrap();
        assert_eq!(e.select_room(0).unwrap().phase, RunPhase::Cleared);
        assert!(e.advance_floor().is_ok());
    }

    #[test]
    fn test_edit_character_clamps_hp() {
        let mut e = engine();
        e.start_run();
        let c = e.edit_character(|c| c.hp = 100_000);
        assert_eq!(c.hp, c.max_hp());
        assert_eq!(c.hp, 100);

        e.edit_character(|c| {
            c.equip(catalog_item("armor-2")).unwrap();
            c.hp = 500;
        });
        assert_eq!(e.character().hp, 120);
    }

    #[test]
    fn test_combat_victory_pays_rewards() {
        let mut e = engine();
        e.start_run();
        steady(&mut e);
        e.override_rooms(batch(fight(Enemy::new("Dummy".to_string(), 5, 1))))
            .unwrap();

        let encounter = e.select_room(0).unwrap();
        assert_eq!(encounter.phase, RunPhase::Combat);
        assert_eq!(e.enemy().map(|en| en.name.as_str()), Some("Dummy"));

        let report = e.resolve_combat_turn(0).unwrap();
        assert_eq!(report.outcome, TurnOutcome::Victory);
        let rewards = report.rewards.unwrap();
        assert_eq!(rewards.xp, XP_REWARD_COMMON);
        assert_eq!(rewards.gold, 7);
        assert!(!rewards.shard);
        assert!(rewards.skill.is_none());
        assert_eq!(e.character().xp, 20);
        assert!(e.enemy().is_none());
        assert!(matches!(
            e.phase(),
            RunPhase::Cleared | RunPhase::LootDecision
        ));
    }

    #[test]
    fn test_elite_victory_doubles_gold() {
        let mut e = engine();
        e.start_run();
        steady(&mut e);
        e.override_rooms(batch(fight(Enemy::new("Knight".to_string(), 5, 1).elite())))
            .unwrap();
        e.select_room(0).unwrap();
        let report = e.resolve_combat_turn(0).unwrap();
        let rewards = report.rewards.unwrap();
        assert_eq!(rewards.xp, XP_REWARD_ELITE);
        assert_eq!(rewards.gold, 14);
    }

    #[test]
    fn test_elite_victory_can_teach_skill() {
        let mut e = engine();
        for _ in 0..200 {
            let rewards = elite_kill(&mut e, |_| {});
            if let Some(name) = rewards.skill {
                let skills = &e.character().skills;
                assert_eq!(skills.active().len(), 3);
                assert_eq!(skills.active()[2].name, name);
                assert!(LEARNABLE_SKILLS.contains(&skills.active()[2].id));
                assert!(e.messages().any(|m| m == format!("Learned {}!", name)));
                return;
            }
        }
        panic!("no skill taught in 200 elite kills");
    }

    #[test]
    fn test_elite_skill_goes_to_storage_when_slots_full() {
        let mut e = engine();
        let fill = |c: &mut Character| {
            c.skills.learn(Skill::from_id(SkillId::HeavyBlow));
            c.skills.learn(Skill::from_id(SkillId::Cleave));
        };
        for _ in 0..200 {
            let rewards = elite_kill(&mut e, fill);
            if let Some(name) = rewards.skill {
                let skills = &e.character().skills;
                assert_eq!(skills.active().len(), MAX_ACTIVE_SKILLS);
                assert_eq!(skills.stored().len(), 1);
                assert_eq!(skills.stored()[0].name, name);
                assert!(e.messages().any(|m| m.contains("waits in storage")));
                return;
            }
        }
        panic!("no skill taught in 200 elite kills");
    }

    #[test]
    fn test_no_skill_reward_once_everything_is_known() {
        let mut e = engine();
        let learn_all = |c: &mut Character| {
            for id in LEARNABLE_SKILLS {
                c.skills.learn(Skill::from_id(id));
            }
        };
        for _ in 0..100 {
            let rewards = elite_kill(&mut e, learn_all);
            assert_eq!(rewards.skill, None);
            let skills = &e.character().skills;
            assert_eq!(
                skills.active().len() + skills.stored().len(),
                2 + LEARNABLE_SKILLS.len()
            );
        }
    }

    #[test]
    fn test_continuing_fight_keeps_enemy() {
        let mut e = engine();
        e.start_run();
        steady(&mut e);
        e.override_rooms(batch(fight(Enemy::new("Wall".to_string(), 1000, 1))))
            .unwrap();
        e.select_room(0).unwrap();

        let report = e.resolve_combat_turn(0).unwrap();
        assert_eq!(report.outcome, TurnOutcome::Continuing);
        assert_eq!(report.enemy.hp, 990);
        assert_eq!(e.enemy().map(|en| en.hp), Some(990));
        assert_eq!(e.character().hp, 99);
        assert_eq!(e.phase(), RunPhase::Combat);
    }

    #[test]
    fn test_invalid_skill_index_keeps_enemy() {
        let mut e = engine();
        e.start_run();
        e.override_rooms(batch(fight(Enemy::new("Wall".to_string(), 1000, 1))))
            .unwrap();
        e.select_room(0).unwrap();
        assert!(matches!(
            e.resolve_combat_turn(9),
            Err(EngineError::InvalidIndex { what: "skill", .. })
        ));
        assert_eq!(e.enemy().map(|en| en.hp), Some(1000));
        assert_eq!(e.phase(), RunPhase::Combat);
    }

    #[test]
    fn test_game_over() {
        let mut e = engine();
        e.start_run();
        steady(&mut e);
        e.edit_character(|c| c.hp = 1);
        e.override_rooms(batch(fight(Enemy::new("Ogre".to_string(), 1000, 50))))
            .unwrap();
        e.select_room(0).unwrap();

        let report = e.resolve_combat_turn(0).unwrap();
        assert_eq!(report.outcome, TurnOutcome::GameOver);
        assert_eq!(e.phase(), RunPhase::GameOver);
        assert_eq!(e.character().hp, 0);
        assert!(e.advance_floor().is_err());
        assert!(matches!(e.use_item(0), Err(EngineError::NoActiveRun(_))));
    }

    #[test]
    fn test_flee_ends_in_cleared_or_continues() {
        let mut e = engine();
        e.start_run();
        steady(&mut e);
        e.override_rooms(batch(fight(Enemy::new("Wall".to_string(), 1000, 1))))
            .unwrap();
        e.select_room(0).unwrap();

        for _ in 0..50 {
            let report = e.flee().unwrap();
            match report.outcome {
                TurnOutcome::Fled => {
                    assert_eq!(e.phase(), RunPhase::Cleared);
                    assert!(report.rewards.is_none());
                    assert_eq!(e.character().xp, 0);
                    return;
                }
                TurnOutcome::Continuing => assert_eq!(e.phase(), RunPhase::Combat),
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        panic!("never escaped in 50 attempts");
    }

    #[test]
    fn test_rest_room_heals() {
        let mut e = engine();
        e.start_run();
        e.edit_character(|c| c.hp = 10);
        e.override_rooms(batch(room(RoomType::Rest, "safe")))
            .unwrap();
        let result = e.select_room(0).unwrap();
        assert_eq!(result.phase, RunPhase::Cleared);
        assert_eq!(e.character().hp, 40);
    }

    #[test]
    fn test_advance_floor_increments_once() {
        let mut e = engine();
        e.start_run();
        e.override_rooms(batch(room(RoomType::Rest, "safe")))
            .unwrap();
        e.select_room(0).unwrap();

        let rooms = e.advance_floor().unwrap();
        assert_eq!(e.character().floor, 2);
        assert_eq!(e.phase(), RunPhase::RoomSelection);
        assert!((2..=4).contains(&rooms.len()));
        assert!(e.advance_floor().is_err());
        assert_eq!(e.character().floor, 2);
    }

    #[test]
    fn test_merchant_purchase() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut e = engine();
        e.start_run();
        let potion = Offering::item(catalog_item("potion-1"), &mut rng);
        let mend = Offering::skill(Skill::from_id(SkillId::Mend), &mut rng);
        let (potion_id, mend_id) = (potion.id, mend.id);
        e.override_rooms(batch(
            room(RoomType::Merchant, "shop").with_offerings(vec![potion.clone(), mend.clone()]),
        ))
        .unwrap();
        e.select_room(0).unwrap();
        assert_eq!(e.current_offerings().len(), 2);

        // Broke: nothing changes
        let before = e.character().clone();
        assert_eq!(
            e.purchase(potion_id),
            Err(EngineError::InsufficientGold {
                price: potion.price,
                gold: 0
            })
        );
        assert_eq!(e.character(), &before);
        assert_eq!(e.current_offerings().len(), 2);

        e.edit_character(|c| c.gold = 500);
        let after = e.purchase(potion_id).unwrap();
        assert_eq!(after.gold, 500 - potion.price);
        assert_eq!(after.inventory.len(), 1);
        assert_eq!(e.current_offerings().len(), 1);
        assert_eq!(
            e.purchase(potion_id),
            Err(EngineError::UnknownOffering(potion_id))
        );

        let after = e.purchase(mend_id).unwrap();
        assert!(after.skills.knows(SkillId::Mend));
        assert!(e.current_offerings().is_empty());

        e.leave_merchant().unwrap();
        assert_eq!(e.phase(), RunPhase::Cleared);
        assert!(e.current_offerings().is_empty());
    }

    #[test]
    fn test_known_skill_not_sold_twice() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut e = engine();
        e.start_run();
        e.edit_character(|c| {
            c.gold = 500;
            c.skills.learn(Skill::from_id(SkillId::Mend));
        });
        let mend = Offering::skill(Skill::from_id(SkillId::Mend), &mut rng);
        let id = mend.id;
        e.override_rooms(batch(
            room(RoomType::Merchant, "shop").with_offerings(vec![mend]),
        ))
        .unwrap();
        e.select_room(0).unwrap();
        assert!(matches!(e.purchase(id), Err(EngineError::AlreadyKnown(_))));
        assert_eq!(e.character().gold, 500);
    }

    #[test]
    fn test_purchase_into_occupied_slot_asks_for_decision() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut e = engine();
        e.start_run();
        e.edit_character(|c| {
            c.gold = 500;
            c.equip(catalog_item("sword-1")).unwrap();
        });
        let sword = Offering::item(catalog_item("sword-2"), &mut rng);
        let id = sword.id;
        e.override_rooms(batch(
            room(RoomType::Merchant, "shop").with_offerings(vec![sword]),
        ))
        .unwrap();
        e.select_room(0).unwrap();

        e.purchase(id).unwrap();
        assert_eq!(e.phase(), RunPhase::LootDecision);
        assert_eq!(
            e.pending_loot().map(|p| p.item.name.as_str()),
            Some("Iron Sword")
        );
        assert!(e
            .messages()
            .any(|m| m == "Found Iron Sword (Uncommon). Swap, take, or discard?"));

        let c = e.resolve_loot_decision(LootAction::Swap).unwrap();
        assert_eq!(e.phase(), RunPhase::Merchant);
        assert_eq!(c.stats().attack, BASE_ATTACK + 5);
        assert_eq!(c.inventory[0].name, "Rusted Sword");
        assert!(e.pending_loot().is_none());
    }

    #[test]
    fn test_use_and_equip_from_inventory() {
        let mut e = engine();
        e.start_run();
        e.edit_character(|c| {
            c.hp = 20;
            c.inventory.push(catalog_item("potion-1"));
            c.inventory.push(catalog_item("armor-2"));
        });

        assert!(matches!(e.use_item(1), Err(EngineError::CannotUse(_))));
        let c = e.use_item(0).unwrap();
        assert_eq!(c.hp, 70);
        assert_eq!(c.inventory.len(), 1);

        assert!(matches!(
            e.equip_from_inventory(5),
            Err(EngineError::InvalidIndex { .. })
        ));
        let c = e.equip_from_inventory(0).unwrap();
        assert_eq!(c.max_hp(), 120);
        assert!(c.inventory.is_empty());

        e.edit_character(|c| c.hp = 120);
        let c = e.unequip(EquipmentSlot::Armor).unwrap();
        assert_eq!(c.hp, 100);
        assert_eq!(c.inventory.len(), 1);
        assert_eq!(
            e.unequip(EquipmentSlot::Armor),
            Err(EngineError::NothingEquipped(EquipmentSlot::Armor))
        );
    }

    #[test]
    fn test_swap_skill() {
        let mut e = engine();
        e.start_run();
        e.edit_character(|c| {
            for id in [SkillId::HeavyBlow, SkillId::Cleave, SkillId::Mend] {
                c.skills.learn(Skill::from_id(id));
            }
        });
        assert_eq!(e.character().skills.stored().len(), 1);

        assert!(e.swap_skill(0, 3).is_err());
        let c = e.swap_skill(0, 0).unwrap();
        assert_eq!(c.skills.active()[0].id, SkillId::Mend);
        assert_eq!(c.skills.stored()[0].id, SkillId::Strike);
    }

    #[test]
    fn test_shard_counter_persists() {
        let mut e = engine();
        e.add_rare_currency(1);
        e.add_rare_currency(1);
        assert_eq!(e.rare_currency(), 2);
        assert_eq!(e.store.read(RARE_CURRENCY_KEY).unwrap(), Some(2));
    }

    #[test]
    fn test_failed_shard_write_keeps_count() {
        let mut e = Engine::new(ChaCha8Rng::seed_from_u64(3), BrokenStore);
        e.add_rare_currency(1);
        assert_eq!(e.rare_currency(), 1);
    }

    #[test]
    fn test_message_log_is_bounded() {
        let mut e = engine();
        e.start_run();
        for i in 0..20 {
            e.log(format!("line {}", i));
        }
        let messages: Vec<&str> = e.messages().collect();
        assert_eq!(messages.len(), MESSAGE_LOG_CAPACITY);
        assert_eq!(messages.first(), Some(&"line 12"));
        assert_eq!(messages.last(), Some(&"line 19"));
    }
}
