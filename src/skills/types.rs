use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillId {
    Strike,
    Guard,
    HeavyBlow,
    Cleave,
    Riposte,
    Mend,
    BattleCry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    /// Hits the enemy for attack × power.
    Damage,
    /// Cuts incoming damage by `power` (0..1) and counter-attacks.
    Defend,
    /// Restores `power` HP.
    Heal,
    /// Consumes the turn. Has no mechanical effect yet.
    Buff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub kind: SkillKind,
    pub power: f64,
    pub description: String,
    pub cost: u32,
}

struct SkillInfo {
    name: &'static str,
    kind: SkillKind,
    power: f64,
    description: &'static str,
    cost: u32,
}

fn skill_info(id: SkillId) -> SkillInfo {
    match id {
        SkillId::Strike => SkillInfo {
            name: "Strike",
            kind: SkillKind::Damage,
            power: 1.0,
            description: "A plain, honest hit.",
            cost: 0,
        },
        SkillId::Guard => SkillInfo {
            name: "Guard",
            kind: SkillKind::Defend,
            power: 0.5,
            description: "Halve the next blow and strike back.",
            cost: 0,
        },
        SkillId::HeavyBlow => SkillInfo {
            name: "Heavy Blow",
            kind: SkillKind::Damage,
            power: 1.5,
            description: "Put your weight behind it.",
            cost: 60,
        },
        SkillId::Cleave => SkillInfo {
            name: "Cleave",
            kind: SkillKind::Damage,
            power: 1.8,
            description: "A wide, brutal swing.",
            cost: 110,
        },
        SkillId::Riposte => SkillInfo {
            name: "Riposte",
            kind: SkillKind::Defend,
            power: 0.7,
            description: "Turn most of a blow aside.",
            cost: 80,
        },
        SkillId::Mend => SkillInfo {
            name: "Mend",
            kind: SkillKind::Heal,
            power: 30.0,
            description: "Bind your wounds for 30 HP.",
            cost: 70,
        },
        SkillId::BattleCry => SkillInfo {
            name: "Battle Cry",
            kind: SkillKind::Buff,
            power: 0.0,
            description: "A fearsome shout.",
            cost: 40,
        },
    }
}

pub const STARTING_SKILLS: [SkillId; 2] = [SkillId::Strike, SkillId::Guard];

/// Skills that can be bought or earned; never includes the starting set.
pub const LEARNABLE_SKILLS: [SkillId; 5] = [
    SkillId::HeavyBlow,
    SkillId::Cleave,
    SkillId::Riposte,
    SkillId::Mend,
    SkillId::BattleCry,
];

impl Skill {
    pub fn from_id(id: SkillId) -> Self {
        let info = skill_info(id);
        Self {
            id,
            name: info.name.to_string(),
            kind: info.kind,
            power: info.power,
            description: info.description.to_string(),
            cost: info.cost,
        }
    }
}

pub fn starting_skills() -> Vec<Skill> {
    STARTING_SKILLS.iter().map(|&id| Skill::from_id(id)).collect()
}
