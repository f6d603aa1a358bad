use std::io;
use std::path::PathBuf;

use jellyfx_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write trace: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid script: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }

    /// Process exit code for the replay binary.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReadScript { .. } | Self::Io(_) => 74,
            Self::Json(_) | Self::Script(_) => 65,
            Self::Config(_) => 78,
        }
    }
}
