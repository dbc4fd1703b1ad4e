//! Session context
//!
//! Holds the profile store and the key/value session store, and knows
//! which profile is active. Every gameplay system takes one of these
//! instead of reaching for global state.

pub mod slots;

pub use slots::{ProfileSlots, SlotAction, SlotStatus, MAX_SLOTS};

use crate::error::{ProfileError, Result};
use crate::save::{keys, MemorySessionStore, PlayerProfile, ProfileStore, SessionStore};

/// Active-profile pointer plus handles to both stores
pub struct SessionContext {
    store: ProfileStore,
    prefs: Box<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: ProfileStore, prefs: impl SessionStore + 'static) -> Self {
        Self {
            store,
            prefs: Box::new(prefs),
        }
    }

    /// Context whose session values are not persisted
    pub fn in_memory(store: ProfileStore) -> Self {
        Self::new(store, MemorySessionStore::new())
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn prefs(&self) -> &dyn SessionStore {
        self.prefs.as_ref()
    }

    pub fn prefs_mut(&mut self) -> &mut dyn SessionStore {
        self.prefs.as_mut()
    }

    /// Name of the active profile, if one is set
    pub fn active_profile_name(&self) -> Option<String> {
        self.prefs
            .get_string(keys::ACTIVE_PROFILE)
            .filter(|name| !name.is_empty())
    }

    pub fn require_active(&self) -> Result<String> {
        self.active_profile_name().ok_or(ProfileError::NoActiveProfile)
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<()> {
        self.prefs.set_string(keys::ACTIVE_PROFILE, name);
        self.prefs.save()?;
        log::info!("Active profile set to '{}'", name);
        Ok(())
    }

    pub fn clear_active_profile(&mut self) -> Result<()> {
        self.prefs.set_string(keys::ACTIVE_PROFILE, "");
        self.prefs.save()?;
        log::info!("Active profile cleared");
        Ok(())
    }

    /// Load the active profile from disk
    pub fn load_active(&self) -> Result<PlayerProfile> {
        let name = self.require_active()?;
        self.store.load(&name)
    }

    /// Load the active profile, apply `f`, and persist the result.
    ///
    /// When `f` fails nothing is written.
    pub fn update_active<R>(
        &self,
        f: impl FnOnce(&mut PlayerProfile) -> Result<R>,
    ) -> Result<R> {
        let mut profile = self.load_active()?;
        let value = f(&mut profile)?;
        self.store.save(&profile)?;
        Ok(value)
    }

    /// Hand the result of a finished level to the reward screen
    pub fn record_level_result(&mut self, stars: u8, level_number: u32, time_limit: f32) -> Result<()> {
        self.prefs.set_int(keys::STARS_EARNED, stars as i64);
        self.prefs.set_int(keys::LEVEL_COMPLETED, level_number as i64);
        self.prefs.set_float(keys::TIME_LIMIT, time_limit);
        self.prefs.save()
    }
}
