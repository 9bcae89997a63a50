use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid render settings: {0}")]
    Render(#[from] ink_render::RenderError),

    #[error("invalid route {name}: {reason}")]
    InvalidRoute { name: &'static str, reason: String },
}

/// Errors from controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("store error: {0}")]
    Store(#[from] ink_store::StoreError),

    #[error("invalid location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },
}

pub type ControllerResult<T> = Result<T, ControllerError>;
