use super::types::{starting_skills, Skill, SkillId};
use crate::core::constants::MAX_ACTIVE_SKILLS;
use serde::{Deserialize, Serialize};

/// Where a newly learned skill ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    Active,
    Stored,
    AlreadyKnown,
}

/// Active combat skills (at most `MAX_ACTIVE_SKILLS`) plus overflow storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBook {
    active: Vec<Skill>,
    #[serde(default)]
    stored: Vec<Skill>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self {
            active: starting_skills(),
            stored: Vec::new(),
        }
    }

    pub fn active(&self) -> &[Skill] {
        &self.active
    }

    pub fn stored(&self) -> &[Skill] {
        &self.stored
    }

    pub fn get(&self, index: usize) -> Option<&Skill> {
        self.active.get(index)
    }

    pub fn knows(&self, id: SkillId) -> bool {
        self.active.iter().chain(self.stored.iter()).any(|s| s.id == id)
    }

    pub fn learn(&mut self, skill: Skill) -> LearnOutcome {
        if self.knows(skill.id) {
            LearnOutcome::AlreadyKnown
        } else if self.active.len() < MAX_ACTIVE_SKILLS {
            self.active.push(skill);
            LearnOutcome::Active
        } else {
            self.stored.push(skill);
            LearnOutcome::Stored
        }
    }

    /// Exchanges an active skill with a stored one. Returns false on bad indices.
    pub fn swap(&mut self, active_index: usize, stored_index: usize) -> bool {
        if active_index >= self.active.len() || stored_index >= self.stored.len() {
            return false;
        }
        std::mem::swap(
            &mut self.active[active_index],
            &mut self.stored[stored_index],
        );
        true
    }
}

impl Default for SkillBook {
    fn default() -> Self {
        Self::new()
    }
}
