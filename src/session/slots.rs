//! Profile selection slots
//!
//! Three slots on the title screen, each remembering a profile name in
//! the session store. The profile files themselves are the only catalog,
//! so a slot whose file has gone missing simply reads as empty.

use crate::error::{ProfileError, Result};
use crate::save::{keys, validate_name, Character, PlayerProfile};

use super::SessionContext;

pub const MAX_SLOTS: usize = 3;

/// What a slot shows on the selection screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Occupied {
        name: String,
        character: Character,
        gold: u32,
    },
}

/// Where selecting a slot leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAction {
    /// An existing profile was made active
    Load(String),
    /// The slot is free; a new profile should be created for it
    Create,
}

/// Slot operations over a session context
pub struct ProfileSlots<'a> {
    ctx: &'a mut SessionContext,
}

impl<'a> ProfileSlots<'a> {
    pub fn new(ctx: &'a mut SessionContext) -> Self {
        Self { ctx }
    }

    fn check_slot(slot: usize) -> Result<()> {
        if slot >= MAX_SLOTS {
            return Err(ProfileError::InvalidIndex {
                what: "slot",
                index: slot,
                len: MAX_SLOTS,
            });
        }
        Ok(())
    }

    /// Profile name mapped to a slot, if its file still exists
    pub fn profile_in(&self, slot: usize) -> Option<String> {
        let name = self.ctx.prefs().get_string(&keys::profile_slot(slot))?;
        if name.is_empty() {
            return None;
        }
        if !self.ctx.store().exists(&name) {
            log::warn!("Slot {} points at missing profile '{}'", slot, name);
            return None;
        }
        Some(name)
    }

    pub fn status(&self, slot: usize) -> Result<SlotStatus> {
        Self::check_slot(slot)?;
        let Some(name) = self.profile_in(slot) else {
            return Ok(SlotStatus::Empty);
        };
        match self.ctx.store().load(&name) {
            Ok(profile) => Ok(SlotStatus::Occupied {
                name: profile.name,
                character: profile.character,
                gold: profile.gold,
            }),
            Err(e) => {
                log::warn!("Slot {} profile unreadable: {}", slot, e);
                Ok(SlotStatus::Empty)
            }
        }
    }

    pub fn statuses(&self) -> Vec<SlotStatus> {
        (0..MAX_SLOTS)
            .map(|slot| self.status(slot).unwrap_or(SlotStatus::Empty))
            .collect()
    }

    /// Pick a slot: load its profile, or ask for a new one
    pub fn select(&mut self, slot: usize) -> Result<SlotAction> {
        Self::check_slot(slot)?;
        let existing = self.profile_in(slot);

        let prefs = self.ctx.prefs_mut();
        prefs.set_int(keys::SELECTED_PROFILE_SLOT, slot as i64);
        prefs.set_string(keys::SELECTED_PROFILE_NAME, existing.as_deref().unwrap_or(""));
        prefs.save()?;

        match existing {
            Some(name) => {
                self.ctx.set_active_profile(&name)?;
                log::info!("Loading existing profile '{}' from slot {}", name, slot);
                Ok(SlotAction::Load(name))
            }
            None => Ok(SlotAction::Create),
        }
    }

    /// Create a profile in a slot and make it active.
    ///
    /// The name is trimmed. It may reuse the slot's current name (which
    /// starts that profile over) but not any other existing profile's.
    pub fn create(&mut self, slot: usize, name: &str, character: Character) -> Result<PlayerProfile> {
        Self::check_slot(slot)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::InvalidName("Please enter a profile name.".to_string()));
        }
        validate_name(name)?;

        let existing = self.profile_in(slot);
        if existing.as_deref() != Some(name) && self.ctx.store().exists(name) {
            log::warn!("Profile name '{}' already taken", name);
            return Err(ProfileError::InvalidName(format!("'{}' is already taken", name)));
        }

        let profile = PlayerProfile::new(name, character);
        self.ctx.store().save(&profile)?;

        let prefs = self.ctx.prefs_mut();
        prefs.set_string(&keys::profile_slot(slot), name);
        prefs.set_string(keys::SELECTED_CHARACTER, character.name());
        self.ctx.set_active_profile(name)?;

        log::info!("Created profile '{}' ({}) in slot {}", name, character, slot);
        Ok(profile)
    }

    /// Delete a slot's profile and free the slot.
    /// Clears the active profile if it was this one.
    pub fn delete(&mut self, slot: usize) -> Result<()> {
        Self::check_slot(slot)?;
        let key = keys::profile_slot(slot);
        let Some(name) = self.ctx.prefs().get_string(&key).filter(|n| !n.is_empty()) else {
            log::warn!("Slot {} is already empty", slot);
            return Ok(());
        };

        self.ctx.store().delete(&name)?;
        self.ctx.prefs_mut().delete_key(&key);
        self.ctx.prefs_mut().save()?;

        if self.ctx.active_profile_name().as_deref() == Some(name.as_str()) {
            self.ctx.clear_active_profile()?;
        }
        log::info!("Deleted profile '{}' from slot {}", name, slot);
        Ok(())
    }
}
