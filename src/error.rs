//! Error taxonomy. None of these are fatal: validation errors become
//! `ValidationFailed` events, unlock errors are swallowed, and storage/config
//! errors fall back to defaults.

use thiserror::Error;

/// A guess the engine refuses to process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{guess} is outside {min}-{max}")]
    OutOfRange { guess: i64, min: u32, max: u32 },
}

/// Why a skill purchase was a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("skill already unlocked")]
    AlreadyUnlocked,
    #[error("not enough xp: have {have}, need {cost}")]
    InsufficientXp { have: u32, cost: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage unavailable")]
    Unavailable,
    #[error("failed to write key '{0}'")]
    Write(String),
}

/// Unknown identifier coming from the page or from storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseIdError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(&'static str),
}
