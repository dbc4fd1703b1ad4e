//! Error types shared by the profile, economy and mission systems

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading or mutating a profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile '{name}' not found")]
    NotFound { name: String },

    #[error("no active profile selected")]
    NoActiveProfile,

    #[error("profile '{name}' is corrupt: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} index {index} out of range (0..{len})")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    #[error("{0}")]
    PreconditionNotMet(String),

    #[error("invalid profile name: {0}")]
    InvalidName(String),

    #[error("{item} is already at its stack limit of {cap}")]
    StackFull { item: &'static str, cap: u32 },

    #[error("{0} is already owned")]
    AlreadyOwned(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
