//! Save system
//!
//! Profile model, file-backed profile storage and the key/value
//! session store.

pub mod profile;
pub mod session_store;
pub mod store;

pub use profile::{
    Character, PlayerProfile, LEVEL_COUNT, MAX_FRONTIER, MAX_STARS, MISSION_SLOTS, PROFILE_VERSION,
};
pub use session_store::{keys, FileSessionStore, MemorySessionStore, SessionStore, SessionValue};
pub use store::{data_dir, validate_name, ProfileStore};
