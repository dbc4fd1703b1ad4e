//! Mission tracker
//!
//! Mirrors the active profile's mission progress. The profile file stays
//! the source of truth: every change is applied to a freshly loaded
//! profile, persisted, then copied back into the tracker.

use crate::economy::GoldLedger;
use crate::error::{ProfileError, Result};
use crate::save::{PlayerProfile, MISSION_SLOTS};
use crate::session::SessionContext;

use super::mission::{Mission, MissionDef, MissionState};

#[derive(Debug, Clone)]
pub struct MissionTracker {
    defs: Vec<MissionDef>,
    missions: Vec<Mission>,
    /// Profile the current progress belongs to
    profile_name: Option<String>,
}

impl MissionTracker {
    pub fn new(mut defs: Vec<MissionDef>) -> Self {
        if defs.len() > MISSION_SLOTS {
            log::warn!("Only {} missions can be tracked, dropping {}", MISSION_SLOTS, defs.len() - MISSION_SLOTS);
            defs.truncate(MISSION_SLOTS);
        }
        let missions = defs.iter().cloned().map(Mission::new).collect();
        Self {
            defs,
            missions,
            profile_name: None,
        }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn mission(&self, index: usize) -> Result<&Mission> {
        self.missions.get(index).ok_or(ProfileError::InvalidIndex {
            what: "mission",
            index,
            len: self.missions.len(),
        })
    }

    /// Mirror the active profile's stored progress
    pub fn load(&mut self, ctx: &SessionContext) -> Result<()> {
        let profile = ctx.load_active()?;
        self.profile_name = Some(profile.name.clone());
        self.sync_from(&profile);
        Ok(())
    }

    /// Rebuild every mission from scratch, then pick up whatever progress
    /// the active profile has stored. Without an active profile all
    /// missions stay at zero.
    pub fn force_reset(&mut self, ctx: &SessionContext) {
        log::info!("Resetting missions");
        self.missions = self.defs.iter().cloned().map(Mission::new).collect();
        self.profile_name = ctx.active_profile_name();

        if let Err(e) = self.load(ctx) {
            log::warn!("No mission progress loaded: {}", e);
        }
    }

    /// Reset if the active profile is not the one this progress belongs to.
    /// Returns whether a reset happened.
    pub fn on_profile_changed(&mut self, ctx: &SessionContext) -> bool {
        let active = ctx.active_profile_name();
        if active == self.profile_name {
            return false;
        }
        log::info!(
            "Active profile changed from {:?} to {:?}, resetting missions",
            self.profile_name,
            active
        );
        self.force_reset(ctx);
        true
    }

    /// Count one kill toward every unclaimed kill mission below its target.
    /// Returns the indices of missions that became complete.
    pub fn record_kill(&mut self, ctx: &SessionContext) -> Result<Vec<usize>> {
        self.on_profile_changed(ctx);
        let defs = &self.defs;

        let profile = ctx.update_active(|profile| {
            for (i, def) in defs.iter().enumerate() {
                let mission = Mission::from_profile(def, i, profile);
                if mission.accepts_kill() {
                    profile.mission_current_kills[i] = mission.current_kills + 1;
                }
            }
            Ok(profile.clone())
        })?;

        let before: Vec<u32> = self.missions.iter().map(|m| m.current_kills).collect();
        self.sync_from(&profile);

        let completed: Vec<usize> = self
            .missions
            .iter()
            .enumerate()
            .filter(|(i, m)| m.current_kills != before[*i] && m.is_complete(&profile))
            .map(|(i, _)| i)
            .collect();
        for &i in &completed {
            log::info!("Mission '{}' is now complete", self.missions[i].def.description);
        }
        Ok(completed)
    }

    /// Whether mission `index` is complete for the active profile
    pub fn is_complete(&self, ctx: &SessionContext, index: usize) -> Result<bool> {
        let mission = self.mission(index)?;
        let profile = ctx.load_active()?;
        Ok(mission.is_complete(&profile))
    }

    /// Current state of every mission for the active profile
    pub fn states(&self, ctx: &SessionContext) -> Result<Vec<MissionState>> {
        let profile = ctx.load_active()?;
        Ok(self.missions.iter().map(|m| m.state(&profile)).collect())
    }

    /// Claim a completed mission's gold. Returns the gold awarded.
    pub fn claim(&mut self, ctx: &SessionContext, ledger: &mut GoldLedger, index: usize) -> Result<u32> {
        self.on_profile_changed(ctx);
        let def = self.mission(index)?.def.clone();

        let result = ledger.reward(ctx, def.gold_reward, |profile| {
            let mission = Mission::from_profile(&def, index, profile);
            match mission.state(profile) {
                MissionState::Claimed => Err(ProfileError::PreconditionNotMet(format!(
                    "mission '{}' already claimed",
                    def.description
                ))),
                MissionState::Incomplete => Err(ProfileError::PreconditionNotMet(format!(
                    "mission '{}' is not complete",
                    def.description
                ))),
                MissionState::Complete => {
                    profile.mission_is_claimed[index] = true;
                    Ok(profile.clone())
                }
            }
        });

        match result {
            Ok(profile) => {
                self.sync_from(&profile);
                log::info!("Mission claimed! +{} gold", def.gold_reward);
                Ok(def.gold_reward)
            }
            Err(e) => {
                log::info!("Mission '{}' not claimed: {}", def.description, e);
                Err(e)
            }
        }
    }

    fn sync_from(&mut self, profile: &PlayerProfile) {
        for (i, def) in self.defs.iter().enumerate() {
            self.missions[i] = Mission::from_profile(def, i, profile);
        }
    }
}
