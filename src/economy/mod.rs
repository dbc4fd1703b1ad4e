//! Gold economy
//!
//! The ledger mirrors the active profile's gold; the shop spends it.

pub mod ledger;
pub mod shop;

pub use ledger::GoldLedger;
pub use shop::{consume_potion, Armor, PotionKind, Shop};
