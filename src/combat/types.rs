use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    /// May exceed `max_hp` through lifesteal.
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub dodge_chance_percent: u32,
    #[serde(default)]
    pub crit_chance_percent: u32,
    #[serde(default)]
    pub lifesteal_percent: u32,
    #[serde(default)]
    pub is_elite: bool,
}

impl Enemy {
    pub fn new(name: String, max_hp: u32, attack: u32) -> Self {
        Self {
            name,
            hp: max_hp,
            max_hp,
            attack,
            defense: 0,
            dodge_chance_percent: 0,
            crit_chance_percent: 0,
            lifesteal_percent: 0,
            is_elite: false,
        }
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_chances(mut self, dodge: u32, crit: u32, lifesteal: u32) -> Self {
        self.dodge_chance_percent = dodge;
        self.crit_chance_percent = crit;
        self.lifesteal_percent = lifesteal;
        self
    }

    pub fn elite(mut self) -> Self {
        self.is_elite = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn restore(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount);
    }
}

/// How a resolved turn left the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Continuing,
    Victory,
    GameOver,
    Fled,
}

impl TurnOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnOutcome::Continuing)
    }
}

/// Result of one resolved exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResolution {
    pub outcome: TurnOutcome,
    pub log: Vec<String>,
}
