use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DiaryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
