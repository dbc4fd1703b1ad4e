//! Tunable game data
//!
//! Every reward amount, price and threshold lives in one `GameConfig`
//! that can be overridden from a RON file.

pub mod config;
pub mod loader;

pub use config::{ArmorTier, GameConfig, PotionConfig, ShopConfig, UpgradeConfig};
