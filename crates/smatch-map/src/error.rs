//! Error types for matching requests.

use smatch_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Errors from preparing or running a matching request.
///
/// The similarity computation itself is total; every variant here is a
/// precondition failure detected before it runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Schema precondition failed (empty table, empty database, unknown table).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A tuning parameter is out of range.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl MatchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Model(err) => err.kind(),
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameters,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
