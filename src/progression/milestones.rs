//! Star milestone rewards
//!
//! One-time gold bonuses unlocked by cumulative stars. Claiming does not
//! spend stars, so every tier can be claimed once the total is reached.

use serde::{Deserialize, Serialize};

use crate::data::GameConfig;
use crate::economy::GoldLedger;
use crate::error::{ProfileError, Result};
use crate::save::PlayerProfile;
use crate::session::SessionContext;

/// Milestone tiers, each with its own claimed flag on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneTier {
    Ten,
    Thirty,
    Forty,
}

impl MilestoneTier {
    pub const ALL: [MilestoneTier; 3] = [MilestoneTier::Ten, MilestoneTier::Thirty, MilestoneTier::Forty];

    pub fn default_reward(&self) -> MilestoneReward {
        let (stars_required, gold) = match self {
            MilestoneTier::Ten => (10, 20),
            MilestoneTier::Thirty => (30, 50),
            MilestoneTier::Forty => (40, 100),
        };
        MilestoneReward {
            tier: *self,
            stars_required,
            gold,
        }
    }

    pub fn is_claimed(&self, profile: &PlayerProfile) -> bool {
        match self {
            MilestoneTier::Ten => profile.ten_star_reward_claimed,
            MilestoneTier::Thirty => profile.thirty_star_reward_claimed,
            MilestoneTier::Forty => profile.forty_star_reward_claimed,
        }
    }

    fn mark_claimed(&self, profile: &mut PlayerProfile) {
        match self {
            MilestoneTier::Ten => profile.ten_star_reward_claimed = true,
            MilestoneTier::Thirty => profile.thirty_star_reward_claimed = true,
            MilestoneTier::Forty => profile.forty_star_reward_claimed = true,
        }
    }
}

/// Star requirement and gold payout of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneReward {
    pub tier: MilestoneTier,
    pub stars_required: u32,
    pub gold: u32,
}

/// Display state of one milestone for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneStatus {
    pub reward: MilestoneReward,
    pub reached: bool,
    pub claimed: bool,
}

impl MilestoneStatus {
    pub fn claimable(&self) -> bool {
        self.reached && !self.claimed
    }
}

/// Milestone table bound to a config
#[derive(Debug, Clone)]
pub struct Milestones {
    rewards: Vec<MilestoneReward>,
}

impl Milestones {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            rewards: MilestoneTier::ALL.iter().map(|&t| config.milestone(t)).collect(),
        }
    }

    pub fn reward(&self, tier: MilestoneTier) -> MilestoneReward {
        self.rewards
            .iter()
            .find(|r| r.tier == tier)
            .copied()
            .unwrap_or_else(|| tier.default_reward())
    }

    /// Tier whose configured star requirement equals `stars`
    pub fn tier_for_stars(&self, stars: u32) -> Option<MilestoneTier> {
        self.rewards
            .iter()
            .find(|r| r.stars_required == stars)
            .map(|r| r.tier)
    }

    pub fn status(&self, profile: &PlayerProfile) -> Vec<MilestoneStatus> {
        let total = profile.total_stars();
        self.rewards
            .iter()
            .map(|&reward| MilestoneStatus {
                reward,
                reached: total >= reward.stars_required,
                claimed: reward.tier.is_claimed(profile),
            })
            .collect()
    }

    /// Tiers the profile could claim right now
    pub fn claimable(&self, profile: &PlayerProfile) -> Vec<MilestoneTier> {
        self.status(profile)
            .into_iter()
            .filter(MilestoneStatus::claimable)
            .map(|s| s.reward.tier)
            .collect()
    }

    /// Pay out a milestone and set its flag. Returns the gold awarded.
    pub fn claim(
        &self,
        ctx: &SessionContext,
        ledger: &mut GoldLedger,
        tier: MilestoneTier,
    ) -> Result<u32> {
        let reward = self.reward(tier);
        ledger.reward(ctx, reward.gold, |profile| {
            if tier.is_claimed(profile) {
                return Err(ProfileError::PreconditionNotMet(format!(
                    "{}-star reward already claimed",
                    reward.stars_required
                )));
            }
            let total = profile.total_stars();
            if total < reward.stars_required {
                return Err(ProfileError::PreconditionNotMet(format!(
                    "{}-star reward needs {} stars, have {}",
                    reward.stars_required, reward.stars_required, total
                )));
            }
            tier.mark_claimed(profile);
            Ok(())
        })?;

        log::info!(
            "Claimed {} gold for {} stars",
            reward.gold,
            reward.stars_required
        );
        Ok(reward.gold)
    }
}
