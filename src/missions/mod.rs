//! Side missions with one-time gold rewards

pub mod mission;
pub mod tracker;

pub use mission::{default_missions, Mission, MissionDef, MissionGoal, MissionState};
pub use tracker::MissionTracker;
