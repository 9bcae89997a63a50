use thiserror::Error;

/// Errors from validating render settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid date format {pattern:?}")]
    InvalidDateFormat { pattern: String },

    #[error("snippet length must be at least 1")]
    ZeroSnippetLength,
}
