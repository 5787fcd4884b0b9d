//! Retrieval settings.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Worker-pool size and bulk chunk size for one retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of parallel workers for both fan-out stages.
    pub parallelism: usize,
    /// Table identifiers per bulk request.
    pub chunk_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            chunk_size: 100,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(CatalogError::InvalidConfig {
                name: "parallelism",
                value: self.parallelism,
                reason: "must be at least 1",
            });
        }
        if self.chunk_size == 0 {
            return Err(CatalogError::InvalidConfig {
                name: "chunk_size",
                value: self.chunk_size,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use smatch_model::ErrorKind;

    use super::*;

    #[test]
    fn zero_values_are_rejected() {
        assert!(RetrievalConfig::default().validate().is_ok());
        let err = RetrievalConfig {
            chunk_size: 0,
            ..RetrievalConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }
}
