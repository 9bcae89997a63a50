use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("invalid post id: {0:?}")]
    InvalidPostId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
