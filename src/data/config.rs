//! Configuration types and their built-in defaults

use serde::{Deserialize, Serialize};

use crate::economy::PotionKind;
use crate::missions::{default_missions, MissionDef};
use crate::progression::{MilestoneReward, MilestoneTier, StarThresholds};

/// All tunable numbers for progression, economy and missions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Time-ratio cut-offs for 3/2/1 stars
    pub stars: StarThresholds,
    /// One-time gold rewards unlocked by cumulative stars
    pub milestones: Vec<MilestoneReward>,
    /// Upgrade points granted for every completed level
    pub level_reward_points: f32,
    pub shop: ShopConfig,
    pub upgrades: UpgradeConfig,
    pub missions: Vec<MissionDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stars: StarThresholds::default(),
            milestones: MilestoneTier::ALL.iter().map(|t| t.default_reward()).collect(),
            level_reward_points: 0.1,
            shop: ShopConfig::default(),
            upgrades: UpgradeConfig::default(),
            missions: default_missions(),
        }
    }
}

impl GameConfig {
    /// Reward for a milestone tier, falling back to the built-in value
    /// when the config file does not list it
    pub fn milestone(&self, tier: MilestoneTier) -> MilestoneReward {
        self.milestones
            .iter()
            .find(|m| m.tier == tier)
            .copied()
            .unwrap_or_else(|| tier.default_reward())
    }
}

/// One purchasable armor tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorTier {
    pub cost: u32,
    pub defense: f32,
}

/// Price and stack cap of a potion kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionConfig {
    pub cost: u32,
    pub cap: u32,
}

/// Shop prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Tiers 1..=3, in order
    pub armor: [ArmorTier; 3],
    pub health_potion: PotionConfig,
    pub timer_potion: PotionConfig,
    pub invulnerability_potion: PotionConfig,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            armor: [
                ArmorTier { cost: 50, defense: 0.5 },
                ArmorTier { cost: 100, defense: 1.0 },
                ArmorTier { cost: 150, defense: 1.5 },
            ],
            health_potion: PotionConfig { cost: 10, cap: 3 },
            timer_potion: PotionConfig { cost: 30, cap: 3 },
            invulnerability_potion: PotionConfig { cost: 50, cap: 1 },
        }
    }
}

impl ShopConfig {
    pub fn potion(&self, kind: PotionKind) -> PotionConfig {
        match kind {
            PotionKind::Health => self.health_potion,
            PotionKind::Timer => self.timer_potion,
            PotionKind::Invulnerability => self.invulnerability_potion,
        }
    }
}

/// Stat upgrade and movement unlock prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Amount a stat moves per upgrade
    pub stat_step: f32,
    /// Upgrade points consumed per upgrade
    pub point_cost: f32,
    /// Attack cooldown never drops below this
    pub min_attack_cooldown: f32,
    pub double_jump_cost: u32,
    pub wall_jump_cost: u32,
    /// Horizontal and vertical wall-jump force granted on unlock
    pub wall_jump_force: (f32, f32),
    /// Gold price of one batch of upgrade points
    pub gold_per_point_unit: u32,
    /// Upgrade points in one batch
    pub points_per_unit: f32,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            stat_step: 0.1,
            point_cost: 0.1,
            min_attack_cooldown: 0.1,
            double_jump_cost: 1,
            wall_jump_cost: 300,
            wall_jump_force: (1500.0, 750.0),
            gold_per_point_unit: 5,
            points_per_unit: 0.1,
        }
    }
}
