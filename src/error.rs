use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("campaign {0} not found")]
    NotFound(i64),

    #[error("`from` date must be before `to` date")]
    InvalidRange,

    #[error("invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
