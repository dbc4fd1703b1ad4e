//! Stat upgrades and movement unlocks
//!
//! Stats are bought with upgrade points earned from levels; movement
//! unlocks and extra points are bought with gold.

use std::fmt;
use std::str::FromStr;

use crate::data::UpgradeConfig;
use crate::economy::GoldLedger;
use crate::error::{ProfileError, Result};
use crate::session::SessionContext;

/// Tolerance for accumulated float point balances
const POINT_EPSILON: f32 = 1e-4;

/// Upgradeable stat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Speed,
    JumpPower,
    AttackCooldown,
}

impl Stat {
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Speed => "speed",
            Stat::JumpPower => "jump",
            Stat::AttackCooldown => "cooldown",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "speed" => Ok(Stat::Speed),
            "jump" | "jump-power" => Ok(Stat::JumpPower),
            "cooldown" | "attack-cooldown" => Ok(Stat::AttackCooldown),
            _ => Err(format!("unknown stat '{}'", s)),
        }
    }
}

/// Upgrade shop bound to its prices
#[derive(Debug, Clone)]
pub struct Upgrades {
    config: UpgradeConfig,
}

impl Upgrades {
    pub fn new(config: &UpgradeConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Spend upgrade points on a stat. Returns the stat's new value.
    pub fn upgrade(&self, ctx: &SessionContext, stat: Stat) -> Result<f32> {
        let cfg = &self.config;
        let value = ctx.update_active(|profile| {
            if profile.upgrade_points + POINT_EPSILON < cfg.point_cost {
                return Err(ProfileError::PreconditionNotMet(format!(
                    "not enough upgrade points: need {:.1}, have {:.1}",
                    cfg.point_cost, profile.upgrade_points
                )));
            }

            let value = match stat {
                Stat::Speed => {
                    profile.speed += cfg.stat_step;
                    profile.speed
                }
                Stat::JumpPower => {
                    profile.jump_power += cfg.stat_step;
                    profile.jump_power
                }
                Stat::AttackCooldown => {
                    profile.attack_cooldown =
                        (profile.attack_cooldown - cfg.stat_step).max(cfg.min_attack_cooldown);
                    profile.attack_cooldown
                }
            };
            profile.upgrade_points = (profile.upgrade_points - cfg.point_cost).max(0.0);
            Ok(value)
        })?;

        log::info!("Upgraded {} to {:.1}", stat, value);
        Ok(value)
    }

    pub fn unlock_double_jump(&self, ctx: &SessionContext, ledger: &mut GoldLedger) -> Result<()> {
        ledger.purchase(ctx, self.config.double_jump_cost, |profile| {
            if profile.double_jump_unlocked {
                return Err(ProfileError::AlreadyOwned("double jump"));
            }
            profile.double_jump_unlocked = true;
            profile.extra_jumps = 1;
            Ok(())
        })?;
        log::info!("Double jump unlocked");
        Ok(())
    }

    pub fn unlock_wall_jump(&self, ctx: &SessionContext, ledger: &mut GoldLedger) -> Result<()> {
        let (force_x, force_y) = self.config.wall_jump_force;
        ledger.purchase(ctx, self.config.wall_jump_cost, |profile| {
            if profile.wall_jump_unlocked {
                return Err(ProfileError::AlreadyOwned("wall jump"));
            }
            profile.wall_jump_unlocked = true;
            profile.wall_jump_x = force_x;
            profile.wall_jump_y = force_y;
            Ok(())
        })?;
        log::info!("Wall jump unlocked");
        Ok(())
    }

    /// Convert gold into upgrade points. Returns the new point balance.
    pub fn buy_points(&self, ctx: &SessionContext, ledger: &mut GoldLedger) -> Result<f32> {
        let points = self.config.points_per_unit;
        ledger.purchase(ctx, self.config.gold_per_point_unit, |profile| {
            profile.upgrade_points += points;
            Ok(profile.upgrade_points)
        })
    }
}
