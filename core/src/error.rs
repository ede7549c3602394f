use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("A match is already in progress")]
    MatchInProgress,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
