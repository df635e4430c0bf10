/// Common types and utilities for the binding generator
use std::path::PathBuf;

/// Error type for binding generation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Build artifact missing at the resolved path
    #[error("Artifact not found for contract {contract}: {}", .path.display())]
    ArtifactNotFound { contract: String, path: PathBuf },

    /// Build artifact present but malformed or missing its `abi` field
    #[error("Failed to parse artifact for contract {contract}: {reason}")]
    ArtifactParse { contract: String, reason: String },

    /// Every configured contract was skipped
    #[error("No contracts processed: all {attempted} configured contracts were skipped")]
    NoContractsProcessed { attempted: usize },

    /// Destination directory could not be created or written
    #[error("Failed to write {}: {source}", .path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template registration or rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other error with its source
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a new artifact-not-found error
    pub fn artifact_not_found<S: Into<String>, P: Into<PathBuf>>(contract: S, path: P) -> Self {
        Error::ArtifactNotFound {
            contract: contract.into(),
            path: path.into(),
        }
    }

    /// Create a new artifact parse error
    pub fn artifact_parse<S: Into<String>, R: Into<String>>(contract: S, reason: R) -> Self {
        Error::ArtifactParse {
            contract: contract.into(),
            reason: reason.into(),
        }
    }

    /// Create a new destination write error
    pub fn destination_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::DestinationWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Error::Template(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }

    /// Per-contract errors are downgraded to warnings by the export pipeline.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ArtifactNotFound { .. } | Error::ArtifactParse { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}

/// Result type for binding generation
pub type Result<T> = std::result::Result<T, Error>;
