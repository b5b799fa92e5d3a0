//! # Evee Configuration Errors
//!
//! Errors raised while reading, parsing or writing subscription manifests.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Deserialization from '{format}' failed: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConfigError {
    pub(crate) fn deserialization(format: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConfigError::Deserialization {
            format: format.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn serialization(format: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConfigError::Serialization {
            format: format.to_string(),
            source: Box::new(source),
        }
    }
}
