use std::path::PathBuf;

use ndformal::error::LogicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NdError {
    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML file '{}': {source}", file.display())]
    TomlParse {
        source: toml::de::Error,
        file: PathBuf,
    },

    #[error("Failed to serialize TOML for '{}': {source}", file.display())]
    TomlSerialize {
        source: toml::ser::Error,
        file: PathBuf,
    },

    #[error("Law with name '{0}' not found")]
    LawNotFound(String),

    #[error("Exercise with name '{0}' not found")]
    ExerciseNotFound(String),

    #[error("Exercise '{0}' has not been unlocked yet")]
    ExerciseLocked(String),

    #[error("No exercise is being attempted")]
    NoActiveExercise,
}

pub type NdResult<T> = Result<T, NdError>;
