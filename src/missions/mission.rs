//! Mission definitions and completion rules

use serde::{Deserialize, Serialize};

use crate::save::PlayerProfile;

/// What a mission asks of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionGoal {
    /// Kill this many enemies, across any levels
    Kills { target: u32 },
    /// Clear a level (0-based index) without taking damage
    NoDamage { level_index: usize },
}

/// Static description of a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionDef {
    pub description: String,
    pub goal: MissionGoal,
    pub gold_reward: u32,
}

impl MissionDef {
    fn kills(target: u32, gold_reward: u32) -> Self {
        Self {
            description: format!("Kill {} enemies for {} gold", target, gold_reward),
            goal: MissionGoal::Kills { target },
            gold_reward,
        }
    }

    fn no_damage(level_index: usize, gold_reward: u32) -> Self {
        Self {
            description: format!(
                "Defeat level {} without losing any health for {} gold",
                level_index + 1,
                gold_reward
            ),
            goal: MissionGoal::NoDamage { level_index },
            gold_reward,
        }
    }

    /// Kill target, zero for no-damage missions
    pub fn kill_target(&self) -> u32 {
        match self.goal {
            MissionGoal::Kills { target } => target,
            MissionGoal::NoDamage { .. } => 0,
        }
    }
}

/// The built-in mission list
pub fn default_missions() -> Vec<MissionDef> {
    vec![
        MissionDef::kills(10, 15),
        MissionDef::kills(50, 100),
        MissionDef::kills(200, 100),
        MissionDef::no_damage(0, 10),
        MissionDef::no_damage(4, 30),
        MissionDef::no_damage(9, 50),
    ]
}

/// Lifecycle of a mission. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MissionState {
    Incomplete,
    Complete,
    Claimed,
}

/// A mission with its progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub def: MissionDef,
    pub current_kills: u32,
    pub claimed: bool,
}

impl Mission {
    pub fn new(def: MissionDef) -> Self {
        Self {
            def,
            current_kills: 0,
            claimed: false,
        }
    }

    /// Progress for slot `index` as stored on a profile
    pub fn from_profile(def: &MissionDef, index: usize, profile: &PlayerProfile) -> Self {
        let stored_kills = profile.mission_current_kills.get(index).copied().unwrap_or(0);
        Self {
            current_kills: stored_kills.min(def.kill_target()),
            claimed: profile.mission_is_claimed.get(index).copied().unwrap_or(false),
            def: def.clone(),
        }
    }

    /// Whether a kill event should advance this mission
    pub fn accepts_kill(&self) -> bool {
        match self.def.goal {
            MissionGoal::Kills { target } => !self.claimed && self.current_kills < target,
            MissionGoal::NoDamage { .. } => false,
        }
    }

    pub fn is_complete(&self, profile: &PlayerProfile) -> bool {
        match self.def.goal {
            MissionGoal::Kills { target } => self.current_kills >= target,
            MissionGoal::NoDamage { level_index } => {
                let completed = profile.levels_completed.get(level_index).copied();
                let damaged = profile.took_damage_in_level.get(level_index).copied();
                match (completed, damaged) {
                    (Some(completed), Some(damaged)) => completed && !damaged,
                    _ => {
                        log::warn!(
                            "Invalid level index {} for '{}', assuming incomplete",
                            level_index,
                            self.def.description
                        );
                        false
                    }
                }
            }
        }
    }

    pub fn state(&self, profile: &PlayerProfile) -> MissionState {
        if self.claimed {
            MissionState::Claimed
        } else if self.is_complete(profile) {
            MissionState::Complete
        } else {
            MissionState::Incomplete
        }
    }
}
