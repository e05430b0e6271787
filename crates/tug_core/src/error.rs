use thiserror::Error;

use crate::save::SaveError;

/// Errors surfaced by the crate's public entry points.
///
/// Match resolution itself never fails (invalid submissions are ignored or
/// treated as incorrect); errors only arise at the persistence and JSON
/// boundaries.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No active match")]
    NoActiveMatch,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            GameError::Deserialization(err.to_string())
        } else {
            GameError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
