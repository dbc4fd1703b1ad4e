//! File-backed profile storage
//!
//! One pretty-printed JSON file per profile, named `{name}_profile.json`.
//! Files are left read-only after every write.

use std::fs;
use std::path::{Path, PathBuf};

use super::profile::{Character, PlayerProfile};
use crate::error::{ProfileError, Result};

const PROFILE_SUFFIX: &str = "_profile.json";

/// Reads and writes profiles under a single directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Store rooted at an explicit directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the per-user application data directory
    pub fn open_default() -> Self {
        Self::new(default_profile_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backing file for a profile name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, PROFILE_SUFFIX))
    }

    /// Whether a profile file exists, without parsing it
    pub fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.path_for(name).is_file()
    }

    /// Write a profile to disk
    pub fn save(&self, profile: &PlayerProfile) -> Result<()> {
        validate_name(&profile.name)?;
        let path = self.path_for(&profile.name);

        let result = self.write_file(&path, profile);
        match &result {
            Ok(()) => log::info!(
                "Saved profile '{}' to {:?} (gold: {})",
                profile.name,
                path,
                profile.gold
            ),
            Err(e) => log::error!("Failed to save profile '{}': {}", profile.name, e),
        }
        result
    }

    fn write_file(&self, path: &Path, profile: &PlayerProfile) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ProfileError::io(&self.dir, e))?;

        let json = serde_json::to_string_pretty(profile).map_err(|e| ProfileError::Corrupt {
            name: profile.name.clone(),
            reason: e.to_string(),
        })?;

        if path.exists() {
            set_readonly(path, false)?;
        }
        fs::write(path, json).map_err(|e| ProfileError::io(path, e))?;
        set_readonly(path, true)
    }

    /// Read a profile, normalizing its fixed-length arrays
    pub fn load(&self, name: &str) -> Result<PlayerProfile> {
        validate_name(name)?;
        let path = self.path_for(name);

        if !path.is_file() {
            log::warn!("Profile '{}' not found at {:?}", name, path);
            return Err(ProfileError::NotFound {
                name: name.to_string(),
            });
        }

        let data = fs::read_to_string(&path).map_err(|e| {
            log::error!("Failed to read profile '{}': {}", name, e);
            ProfileError::io(&path, e)
        })?;

        let corrupt = |e: serde_json::Error| {
            log::error!("Failed to parse profile '{}': {}", name, e);
            ProfileError::Corrupt {
                name: name.to_string(),
                reason: e.to_string(),
            }
        };
        let value: serde_json::Value = serde_json::from_str(&data).map_err(corrupt)?;
        if value.get("character").is_none() {
            log::warn!(
                "Profile '{}' has no character, defaulting to {}",
                name,
                Character::default()
            );
        }
        let mut profile: PlayerProfile = serde_json::from_value(value).map_err(corrupt)?;

        // The file name is authoritative
        profile.name = name.to_string();
        profile.normalize();
        log::debug!("Loaded profile '{}' (gold: {})", name, profile.gold);
        Ok(profile)
    }

    /// Remove a profile file. Deleting a missing profile is a no-op.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let path = self.path_for(name);

        if !path.exists() {
            log::warn!("Profile '{}' not found for deletion at {:?}", name, path);
            return Ok(());
        }

        set_readonly(&path, false)?;
        fs::remove_file(&path).map_err(|e| {
            log::error!("Failed to delete profile '{}': {}", name, e);
            ProfileError::io(&path, e)
        })?;
        log::info!("Deleted profile '{}'", name);
        Ok(())
    }

    /// Names of every profile file in the store directory
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| ProfileError::io(&self.dir, e))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                file_name.strip_suffix(PROFILE_SUFFIX).map(str::to_string)
            })
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Reject names that cannot safely become a file name
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ProfileError::InvalidName("name is empty".to_string()));
    }
    if name.trim() != name {
        return Err(ProfileError::InvalidName(format!(
            "'{}' has leading or trailing whitespace",
            name
        )));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ProfileError::InvalidName(format!(
            "'{}' contains a path separator",
            name
        )));
    }
    Ok(())
}

fn set_readonly(path: &Path, readonly: bool) -> Result<()> {
    let mut perms = fs::metadata(path)
        .map_err(|e| ProfileError::io(path, e))?
        .permissions();
    if perms.readonly() == readonly {
        return Ok(());
    }
    perms.set_readonly(readonly);
    fs::set_permissions(path, perms).map_err(|e| ProfileError::io(path, e))
}

/// Per-user application data directory, or the working directory when
/// the platform has none
pub fn data_dir() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "platformer", "PlatformerProgress") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

fn default_profile_dir() -> PathBuf {
    data_dir().join("profiles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::profile::{Character, LEVEL_COUNT, MAX_FRONTIER, MAX_STARS, MISSION_SLOTS};
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn temp_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        (dir, store)
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let mut profile = PlayerProfile::new("Alice", Character::Archer);
        profile.gold = 77;
        profile.speed = 5.3;
        profile.level_stars[3] = 2;
        profile.mission_current_kills[1] = 12;
        profile.took_damage_in_level[7] = true;
        profile.thirty_star_reward_claimed = true;

        store.save(&profile).unwrap();
        assert_eq!(store.load("Alice").unwrap(), profile);
    }

    #[test]
    fn test_file_is_readonly_after_save_and_can_be_overwritten() {
        let (_dir, store) = temp_store();
        let mut profile = PlayerProfile::new("Bob", Character::Ninja);
        store.save(&profile).unwrap();

        let path = store.path_for("Bob");
        assert!(fs::metadata(&path).unwrap().permissions().readonly());

        profile.gold = 5;
        store.save(&profile).unwrap();
        assert_eq!(store.load("Bob").unwrap().gold, 5);
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load("ghost"), Err(ProfileError::NotFound { .. })));
        assert!(!store.exists("ghost"));
    }

    #[test]
    fn test_load_corrupt_file() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for("broken"), "{ not json").unwrap();
        assert!(store.exists("broken"));
        assert!(matches!(store.load("broken"), Err(ProfileError::Corrupt { .. })));
    }

    #[test]
    fn test_load_normalizes_short_arrays() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.path_for("old"),
            r#"{"name":"old","character":"Ninja","level_stars":[3,3],"mission_current_kills":[]}"#,
        )
        .unwrap();

        let profile = store.load("old").unwrap();
        assert_eq!(profile.level_stars, vec![0; LEVEL_COUNT]);
        assert_eq!(profile.mission_current_kills, vec![0; MISSION_SLOTS]);
    }

    #[test]
    fn test_missing_character_loads_as_default() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for("nohero"), r#"{"gold":12,"current_level":4}"#).unwrap();

        let profile = store.load("nohero").unwrap();
        assert_eq!(profile.character, Character::Ninja);
        assert_eq!(profile.gold, 12);
        assert_eq!(profile.current_level, 4);
    }

    #[test]
    fn test_delete_twice_is_safe() {
        let (_dir, store) = temp_store();
        store.save(&PlayerProfile::new("Cleo", Character::DragonWarrior)).unwrap();
        assert!(store.exists("Cleo"));

        store.delete("Cleo").unwrap();
        assert!(!store.exists("Cleo"));
        store.delete("Cleo").unwrap();
    }

    #[test]
    fn test_rejects_path_like_names() {
        let (_dir, store) = temp_store();
        let profile = PlayerProfile::new("../escape", Character::Archer);
        assert!(matches!(store.save(&profile), Err(ProfileError::InvalidName(_))));
        assert!(matches!(store.load(""), Err(ProfileError::InvalidName(_))));
        assert!(!store.exists("a/b"));
    }

    #[test]
    fn test_list_profiles() {
        let (_dir, store) = temp_store();
        assert!(store.list().unwrap().is_empty());
        store.save(&PlayerProfile::new("Zed", Character::Ninja)).unwrap();
        store.save(&PlayerProfile::new("Amy", Character::Archer)).unwrap();
        assert_eq!(store.list().unwrap(), vec!["Amy".to_string(), "Zed".to_string()]);
    }

    fn stat() -> impl Strategy<Value = f32> {
        0.0f32..100.0
    }

    prop_compose! {
        fn valid_profile()(
            character in 0usize..3,
            current_level in 1u32..=MAX_FRONTIER,
            (speed, jump_power, attack_cooldown, upgrade_points) in (stat(), stat(), stat(), stat()),
            (wall_jump_x, wall_jump_y, defense) in (stat(), stat(), stat()),
            (gold, extra_jumps) in (any::<u32>(), 0u32..3),
            potions in (0u32..=3, 0u32..=3, 0u32..=1),
            unlocks in any::<[bool; 5]>(),
            milestones in any::<[bool; 3]>(),
            level_stars in vec(0u8..=MAX_STARS, LEVEL_COUNT),
            kills in vec(0u32..500, MISSION_SLOTS),
            claimed in vec(any::<bool>(), MISSION_SLOTS),
            damaged in vec(any::<bool>(), LEVEL_COUNT),
            completed in vec(any::<bool>(), LEVEL_COUNT),
        ) -> PlayerProfile {
            let mut p = PlayerProfile::new("Prop", Character::ALL[character]);
            p.current_level = current_level;
            p.speed = speed;
            p.jump_power = jump_power;
            p.attack_cooldown = attack_cooldown;
            p.upgrade_points = upgrade_points;
            p.wall_jump_x = wall_jump_x;
            p.wall_jump_y = wall_jump_y;
            p.defense = defense;
            p.gold = gold;
            p.extra_jumps = extra_jumps;
            (p.health_potions, p.timer_potions, p.invulnerability_potions) = potions;
            [
                p.double_jump_unlocked,
                p.wall_jump_unlocked,
                p.armor1_unlocked,
                p.armor2_unlocked,
                p.armor3_unlocked,
            ] = unlocks;
            [
                p.ten_star_reward_claimed,
                p.thirty_star_reward_claimed,
                p.forty_star_reward_claimed,
            ] = milestones;
            p.level_stars = level_stars;
            p.mission_current_kills = kills;
            p.mission_is_claimed = claimed;
            p.took_damage_in_level = damaged;
            p.levels_completed = completed;
            p
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_save_then_load_is_identity(profile in valid_profile()) {
            let (_dir, store) = temp_store();
            store.save(&profile).unwrap();
            prop_assert_eq!(store.load("Prop").unwrap(), profile);
        }
    }
}
