//! Platformer Progress - save profiles and progression for a 2D platformer
//!
//! Named player profiles on disk, star ratings from level times, a gold
//! ledger, a shop, stat upgrades and side missions.

pub mod data;
pub mod economy;
pub mod error;
pub mod missions;
pub mod progression;
pub mod save;
pub mod session;

// Re-export commonly used types
pub use data::GameConfig;
pub use economy::{GoldLedger, Shop};
pub use error::{ProfileError, Result};
pub use missions::MissionTracker;
pub use progression::{LevelProgression, Milestones, Upgrades};
pub use save::{Character, PlayerProfile, ProfileStore};
pub use session::{ProfileSlots, SessionContext};
