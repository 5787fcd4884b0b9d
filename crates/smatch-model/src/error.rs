//! Error taxonomy shared across the workspace.

use thiserror::Error;

use crate::EntityId;

/// Stable classification of every failure the engine can surface.
///
/// Adapter and matcher errors carry richer context, but callers at the API
/// boundary only need the kind to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An identifier does not resolve in the catalog.
    NotFound,
    /// The catalog answered with a payload of unexpected shape.
    CatalogResponseInvalid,
    /// Network or timeout failure while talking to the catalog.
    CatalogUnreachable,
    /// A database or table has no usable children.
    EmptySchema,
    /// Tuning or retrieval parameters are out of range.
    InvalidParameters,
}

impl ErrorKind {
    /// Returns true if the failure was caused by the caller's input rather
    /// than by the catalog or the network.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::EmptySchema | Self::InvalidParameters
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::CatalogResponseInvalid => "catalog_response_invalid",
            Self::CatalogUnreachable => "catalog_unreachable",
            Self::EmptySchema => "empty_schema",
            Self::InvalidParameters => "invalid_parameters",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by schema model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Identifier was blank after trimming.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// Table identifier is not part of the database.
    #[error("table {table} not found in database {database}")]
    TableNotFound { table: EntityId, database: EntityId },

    /// Table has no columns and cannot be matched.
    #[error("table {name} ({table}) has no columns")]
    EmptyTable { table: EntityId, name: String },

    /// Database has no table with at least one column.
    #[error("database {name} ({database}) has no usable tables")]
    EmptyDatabase { database: EntityId, name: String },
}

impl ModelError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId(_) => ErrorKind::InvalidParameters,
            Self::TableNotFound { .. } => ErrorKind::NotFound,
            Self::EmptyTable { .. } | Self::EmptyDatabase { .. } => ErrorKind::EmptySchema,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
