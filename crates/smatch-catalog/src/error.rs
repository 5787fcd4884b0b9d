//! Error types for schema retrieval.

use std::path::PathBuf;

use smatch_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Errors that can occur while retrieving a schema from a catalog or a
/// local dataset directory.
///
/// Every retrieval failure is terminal: no partially populated
/// [`Database`](smatch_model::Database) is ever returned alongside one.
#[derive(Debug, Error)]
pub enum CatalogError {
    // === Lookup Errors ===
    /// Identifier does not resolve to a known entity.
    #[error("entity not found: {id}")]
    NotFound { id: String },

    // === Transport Errors ===
    /// Request could not be sent or timed out.
    #[error("catalog request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Catalog answered with a non-success status.
    #[error("catalog returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A retrieval stage failed for a reason other than HTTP transport.
    #[error("catalog unreachable while {stage}: {reason}")]
    Unreachable { stage: String, reason: String },

    // === Payload Errors ===
    /// Body could not be decoded.
    #[error("invalid catalog response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Payload decoded but does not have the expected shape.
    #[error("unexpected payload for entity {entity}: {reason}")]
    InvalidPayload { entity: String, reason: String },

    // === Local Dataset Errors ===
    /// Dataset directory or file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV file could not be parsed.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Configuration Errors ===
    /// Catalog base URL could not be turned into a request URL.
    #[error("invalid catalog URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Retrieval settings are out of range.
    #[error("invalid retrieval setting {name} = {value}: {reason}")]
    InvalidConfig {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// Worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CatalogError {
    /// Stable classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport { .. } | Self::Status { .. } | Self::Unreachable { .. } => {
                ErrorKind::CatalogUnreachable
            }
            Self::Io { .. } | Self::WorkerPool(_) => ErrorKind::CatalogUnreachable,
            Self::Decode { .. } | Self::InvalidPayload { .. } | Self::Csv { .. } => {
                ErrorKind::CatalogResponseInvalid
            }
            Self::InvalidConfig { .. } | Self::InvalidUrl { .. } => ErrorKind::InvalidParameters,
            Self::Model(err) => err.kind(),
        }
    }

    pub(crate) fn invalid_payload(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let not_found = CatalogError::NotFound { id: "x".into() };
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(not_found.kind().is_client_error());

        let status = CatalogError::Status {
            url: "http://atlas".into(),
            status: 503,
        };
        assert_eq!(status.kind(), ErrorKind::CatalogUnreachable);
        assert!(!status.kind().is_client_error());

        let payload = CatalogError::invalid_payload("db", "missing tables");
        assert_eq!(payload.kind(), ErrorKind::CatalogResponseInvalid);
    }
}
