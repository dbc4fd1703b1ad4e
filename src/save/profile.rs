//! Player profile and persistent progression
//!
//! One `PlayerProfile` per named save. Tracks the level frontier, star
//! ratings, gold, upgrades, consumables and mission progress.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current profile version for compatibility
pub const PROFILE_VERSION: u32 = 1;

/// Number of playable levels
pub const LEVEL_COUNT: usize = 20;

/// Number of mission progress slots stored per profile
pub const MISSION_SLOTS: usize = 6;

/// Frontier value once every level is cleared
pub const MAX_FRONTIER: u32 = LEVEL_COUNT as u32 + 1;

/// Highest star rating a single level can hold
pub const MAX_STARS: u8 = 3;

/// Playable hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    Archer,
    DragonWarrior,
    /// Used for profile files that predate the character field
    #[default]
    Ninja,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Archer, Character::DragonWarrior, Character::Ninja];

    /// Character for a selection-screen button index
    pub fn from_index(index: usize) -> Option<Character> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Character::Archer => "Archer",
            Character::DragonWarrior => "DragonWarrior",
            Character::Ninja => "Ninja",
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Character {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown character '{}'", s))
    }
}

/// Persistent player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    /// Version for compatibility checking
    pub version: u32,
    /// Unique name, also the storage key
    pub name: String,
    pub character: Character,
    /// Highest level (1-based) the player may start
    pub current_level: u32,

    // Movement and attack stats
    pub speed: f32,
    pub jump_power: f32,
    pub attack_cooldown: f32,
    pub extra_jumps: u32,
    pub wall_jump_x: f32,
    pub wall_jump_y: f32,

    pub upgrade_points: f32,
    pub gold: u32,

    // Unlocks
    pub double_jump_unlocked: bool,
    pub wall_jump_unlocked: bool,
    pub armor1_unlocked: bool,
    pub armor2_unlocked: bool,
    pub armor3_unlocked: bool,
    /// Defense granted by the best armor owned
    pub defense: f32,

    // Consumables
    pub health_potions: u32,
    pub timer_potions: u32,
    pub invulnerability_potions: u32,

    /// Stars per level, 0..=3
    pub level_stars: Vec<u8>,
    pub ten_star_reward_claimed: bool,
    pub thirty_star_reward_claimed: bool,
    pub forty_star_reward_claimed: bool,

    // Mission progress
    pub mission_current_kills: Vec<u32>,
    pub mission_is_claimed: Vec<bool>,
    pub took_damage_in_level: Vec<bool>,
    pub levels_completed: Vec<bool>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            name: String::new(),
            character: Character::default(),
            current_level: 1,
            speed: 5.0,
            jump_power: 20.0,
            attack_cooldown: 1.0,
            extra_jumps: 0,
            wall_jump_x: 0.0,
            wall_jump_y: 0.0,
            upgrade_points: 0.0,
            gold: 0,
            double_jump_unlocked: false,
            wall_jump_unlocked: false,
            armor1_unlocked: false,
            armor2_unlocked: false,
            armor3_unlocked: false,
            defense: 0.0,
            health_potions: 0,
            timer_potions: 0,
            invulnerability_potions: 0,
            level_stars: vec![0; LEVEL_COUNT],
            ten_star_reward_claimed: false,
            thirty_star_reward_claimed: false,
            forty_star_reward_claimed: false,
            mission_current_kills: vec![0; MISSION_SLOTS],
            mission_is_claimed: vec![false; MISSION_SLOTS],
            took_damage_in_level: vec![false; LEVEL_COUNT],
            levels_completed: vec![false; LEVEL_COUNT],
        }
    }
}

impl PlayerProfile {
    /// Create a fresh profile at level 1 with no gold or stars
    pub fn new(name: impl Into<String>, character: Character) -> Self {
        Self {
            name: name.into(),
            character,
            ..Self::default()
        }
    }

    /// Bring fixed-length arrays back to their expected sizes.
    ///
    /// A mismatched array is replaced wholesale rather than padded, so a
    /// profile written with a different layout starts that section fresh.
    pub fn normalize(&mut self) {
        reset_if_mismatched(&mut self.level_stars, LEVEL_COUNT, 0);
        reset_if_mismatched(&mut self.mission_current_kills, MISSION_SLOTS, 0);
        reset_if_mismatched(&mut self.mission_is_claimed, MISSION_SLOTS, false);
        reset_if_mismatched(&mut self.took_damage_in_level, LEVEL_COUNT, false);
        reset_if_mismatched(&mut self.levels_completed, LEVEL_COUNT, false);

        for stars in &mut self.level_stars {
            *stars = (*stars).min(MAX_STARS);
        }
        self.current_level = self.current_level.clamp(1, MAX_FRONTIER);
    }

    /// Sum of stars across every level
    pub fn total_stars(&self) -> u32 {
        self.level_stars.iter().map(|&s| s as u32).sum()
    }

    /// Whether the player has finished any level yet
    pub fn has_completed_any_level(&self) -> bool {
        self.levels_completed.iter().any(|&c| c)
    }
}

fn reset_if_mismatched<T: Clone>(values: &mut Vec<T>, len: usize, fill: T) {
    if values.len() != len {
        *values = vec![fill; len];
    }
}
