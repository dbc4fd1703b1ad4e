//! Progression systems

pub mod levels;
pub mod milestones;
pub mod stars;
pub mod upgrades;

pub use levels::{advance_frontier, is_level_unlocked, LevelAttempt, LevelOutcome, LevelProgression};
pub use milestones::{MilestoneReward, MilestoneStatus, MilestoneTier, Milestones};
pub use stars::{
    format_clock, star_requirements, stars_for, time_ratio, StarRequirements, StarThresholds,
};
pub use upgrades::{Stat, Upgrades};
