//! RON config loader
//!
//! Loads `GameConfig` from an external RON file, with fallback to the
//! hardcoded defaults.

use std::fs;
use std::path::Path;

use super::config::GameConfig;
use crate::error::{ProfileError, Result};
use crate::save::MISSION_SLOTS;

impl GameConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
        let mut config: GameConfig =
            ron::from_str(&content).map_err(|e| ProfileError::Config(e.to_string()))?;
        config.validate();
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    /// Load a config file if present, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Write the default config so it can be edited by hand
    pub fn export_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProfileError::io(parent, e))?;
        }
        let text = ron::ser::to_string_pretty(&Self::default(), ron::ser::PrettyConfig::default())
            .map_err(|e| ProfileError::Config(e.to_string()))?;
        fs::write(path, text).map_err(|e| ProfileError::io(path, e))?;
        Ok(())
    }

    /// Repair values that would break profile invariants
    fn validate(&mut self) {
        if self.missions.len() > MISSION_SLOTS {
            log::warn!(
                "Config lists {} missions but profiles track {}, extra missions dropped",
                self.missions.len(),
                MISSION_SLOTS
            );
            self.missions.truncate(MISSION_SLOTS);
        }

        let s = &self.stars;
        let ordered = s.three >= s.two && s.two >= s.one && s.one >= 0.0;
        if !ordered {
            log::warn!("Star thresholds {:?} are not descending, using defaults", s);
            self.stars = Default::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::MilestoneTier;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(&dir.path().join("nope.ron"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("game.ron");
        GameConfig::export_default(&path).unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.missions.len(), 6);
        assert_eq!(config.milestone(MilestoneTier::Thirty).gold, 50);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, "(level_reward_points: 50.0)").unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.level_reward_points, 50.0);
        assert_eq!(config.shop.timer_potion.cost, 30);
    }

    #[test]
    fn test_bad_thresholds_are_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, "(stars: (three: 0.2, two: 0.5, one: 0.1))").unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.stars, Default::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, "this is not ron").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ProfileError::Config(_))));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
    }
}
