//! Level completion and the level frontier

use crate::data::GameConfig;
use crate::error::{ProfileError, Result};
use crate::save::{PlayerProfile, LEVEL_COUNT, MAX_FRONTIER};
use crate::session::SessionContext;

use super::stars::{time_ratio, StarThresholds};

/// Damage tracking for one attempt at a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelAttempt {
    pub level_index: usize,
    took_damage: bool,
}

impl LevelAttempt {
    pub fn start(level_index: usize) -> Self {
        log::debug!("Started tracking level {}", level_index);
        Self {
            level_index,
            took_damage: false,
        }
    }

    pub fn record_damage(&mut self) {
        self.took_damage = true;
    }

    pub fn took_damage(&self) -> bool {
        self.took_damage
    }
}

/// What a level completion changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelOutcome {
    pub level_index: usize,
    pub stars: u8,
    /// Whether this completion unlocked the next level
    pub frontier_advanced: bool,
    pub current_level: u32,
    pub upgrade_points: f32,
}

/// Applies level results to the active profile
#[derive(Debug, Clone)]
pub struct LevelProgression {
    thresholds: StarThresholds,
    reward_points: f32,
}

impl LevelProgression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            thresholds: config.stars,
            reward_points: config.level_reward_points,
        }
    }

    pub fn thresholds(&self) -> &StarThresholds {
        &self.thresholds
    }

    /// Record a finished level on the active profile.
    ///
    /// Overwrites the level's star rating, grants upgrade points, stores the
    /// damage flag for no-damage missions and unlocks the next level when
    /// the frontier level was the one cleared. The result is also written
    /// to the session store for the reward screen.
    pub fn on_level_complete(
        &self,
        ctx: &mut SessionContext,
        level_index: usize,
        time_remaining: f32,
        time_limit: f32,
        took_damage: bool,
    ) -> Result<LevelOutcome> {
        if level_index >= LEVEL_COUNT {
            log::error!("Invalid level index: {}", level_index);
            return Err(ProfileError::InvalidIndex {
                what: "level",
                index: level_index,
                len: LEVEL_COUNT,
            });
        }
        let ratio = time_ratio(time_remaining, time_limit).ok_or_else(|| {
            log::error!("Level {} has invalid time limit {}", level_index + 1, time_limit);
            ProfileError::PreconditionNotMet(format!("time limit must be positive, got {}", time_limit))
        })?;
        let stars = self.thresholds.stars_for(ratio);

        let reward_points = self.reward_points;
        let outcome = ctx.update_active(|profile| {
            profile.level_stars[level_index] = stars;
            profile.upgrade_points += reward_points;
            profile.levels_completed[level_index] = true;
            profile.took_damage_in_level[level_index] = took_damage;
            let frontier_advanced = advance_frontier(profile, level_index);

            Ok(LevelOutcome {
                level_index,
                stars,
                frontier_advanced,
                current_level: profile.current_level,
                upgrade_points: profile.upgrade_points,
            })
        })?;

        log::info!(
            "Level {} completed with {} stars ({:.0}% time left), frontier now {}",
            level_index + 1,
            stars,
            ratio * 100.0,
            outcome.current_level
        );

        ctx.record_level_result(stars, level_index as u32 + 1, time_limit)?;
        Ok(outcome)
    }

    /// Complete a level using a tracked attempt's damage flag
    pub fn complete_attempt(
        &self,
        ctx: &mut SessionContext,
        attempt: &LevelAttempt,
        time_remaining: f32,
        time_limit: f32,
    ) -> Result<LevelOutcome> {
        self.on_level_complete(
            ctx,
            attempt.level_index,
            time_remaining,
            time_limit,
            attempt.took_damage(),
        )
    }
}

/// Unlock the next level if `level_index` is the current frontier.
/// Replays of earlier levels leave the frontier alone.
pub fn advance_frontier(profile: &mut PlayerProfile, level_index: usize) -> bool {
    let completed_level = level_index as u32 + 1;
    if completed_level == profile.current_level && profile.current_level < MAX_FRONTIER {
        profile.current_level += 1;
        true
    } else {
        false
    }
}

/// Whether a 1-based level number may be started
pub fn is_level_unlocked(profile: &PlayerProfile, level_number: u32) -> bool {
    level_number >= 1 && level_number <= LEVEL_COUNT as u32 && level_number <= profile.current_level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{keys, Character};
    use crate::session::test_support::*;

    #[test]
    fn test_three_stars_and_frontier_advance() {
        let (_dir, mut ctx) = context_with_profile("Alice", Character::Archer);
        let levels = LevelProgression::new(&GameConfig::default());

        let outcome = levels.on_level_complete(&mut ctx, 0, 210.0, 300.0, false).unwrap();
        assert_eq!(outcome.stars, 3);
        assert!(outcome.frontier_advanced);
        assert_eq!(outcome.current_level, 2);

        let profile = ctx.load_active().unwrap();
        assert_eq!(profile.level_stars[0], 3);
        assert_eq!(profile.current_level, 2);
        assert!(profile.levels_completed[0]);
        assert!(!profile.took_damage_in_level[0]);
        assert!((profile.upgrade_points - 0.1).abs() < 1e-6);

        assert_eq!(ctx.prefs().get_int(keys::STARS_EARNED), Some(3));
        assert_eq!(ctx.prefs().get_int(keys::LEVEL_COMPLETED), Some(1));
        assert_eq!(ctx.prefs().get_float(keys::TIME_LIMIT), Some(300.0));
    }

    #[test]
    fn test_replay_does_not_advance_frontier() {
        let (_dir, mut ctx) = context_with_profile("Bob", Character::Ninja);
        let levels = LevelProgression::new(&GameConfig::default());

        levels.on_level_complete(&mut ctx, 0, 200.0, 300.0, false).unwrap();
        let replay = levels.on_level_complete(&mut ctx, 0, 10.0, 300.0, true).unwrap();
        assert!(!replay.frontier_advanced);
        assert_eq!(replay.current_level, 2);

        let profile = ctx.load_active().unwrap();
        assert_eq!(profile.level_stars[0], 0);
        assert!(profile.took_damage_in_level[0]);
    }

    #[test]
    fn test_skipping_ahead_does_not_advance() {
        let mut profile = PlayerProfile::new("Cleo", Character::Archer);
        assert!(!advance_frontier(&mut profile, 4));
        assert_eq!(profile.current_level, 1);
    }

    #[test]
    fn test_frontier_caps_after_last_level() {
        let mut profile = PlayerProfile::new("Dee", Character::Archer);
        profile.current_level = LEVEL_COUNT as u32;
        assert!(advance_frontier(&mut profile, LEVEL_COUNT - 1));
        assert_eq!(profile.current_level, MAX_FRONTIER);
        assert!(!advance_frontier(&mut profile, LEVEL_COUNT - 1));
        assert_eq!(profile.current_level, MAX_FRONTIER);
    }

    #[test]
    fn test_invalid_inputs_change_nothing() {
        let (_dir, mut ctx) = context_with_profile("Eve", Character::Archer);
        let levels = LevelProgression::new(&GameConfig::default());

        let bad_index = levels.on_level_complete(&mut ctx, LEVEL_COUNT, 100.0, 300.0, false);
        assert!(matches!(bad_index, Err(ProfileError::InvalidIndex { .. })));
        let bad_limit = levels.on_level_complete(&mut ctx, 0, 100.0, 0.0, false);
        assert!(matches!(bad_limit, Err(ProfileError::PreconditionNotMet(_))));

        let profile = ctx.load_active().unwrap();
        assert_eq!(profile.current_level, 1);
        assert_eq!(profile.upgrade_points, 0.0);
    }

    #[test]
    fn test_attempt_tracks_damage() {
        let (_dir, mut ctx) = context_with_profile("Fay", Character::Ninja);
        let levels = LevelProgression::new(&GameConfig::default());

        let mut attempt = LevelAttempt::start(0);
        attempt.record_damage();
        levels.complete_attempt(&mut ctx, &attempt, 150.0, 300.0).unwrap();
        let profile = ctx.load_active().unwrap();
        assert!(profile.took_damage_in_level[0]);
        assert_eq!(profile.level_stars[0], 2);
    }

    #[test]
    fn test_is_level_unlocked() {
        let mut profile = PlayerProfile::new("Gus", Character::Archer);
        assert!(is_level_unlocked(&profile, 1));
        assert!(!is_level_unlocked(&profile, 2));
        assert!(!is_level_unlocked(&profile, 0));
        profile.current_level = MAX_FRONTIER;
        assert!(is_level_unlocked(&profile, 20));
        assert!(!is_level_unlocked(&profile, 21));
    }
}
