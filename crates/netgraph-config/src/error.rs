//! Configuration loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error in {document}: {source}")]
    Yaml {
        document: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn yaml(document: &'static str, source: serde_yaml::Error) -> Self {
        Self::Yaml { document, source }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
