//! Match configuration file.
//!
//! ```toml
//! max_matches = 20
//!
//! [cupid]
//! th_accept = 0.65
//!
//! [retrieval]
//! parallelism = 8
//! chunk_size = 50
//!
//! [atlas]
//! url = "http://atlas:21000"
//! user = "admin"
//! timeout_secs = 60
//! database_types = ["mssql_db"]
//! ```
//!
//! Every table and key is optional; missing values take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smatch_catalog::RetrievalConfig;
use smatch_map::CupidParams;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection settings for an Atlas catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtlasSettings {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Entity types enumerated by holistic matching.
    pub database_types: Option<Vec<String>>,
}

/// Everything a matching run can be tuned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub cupid: CupidParams,
    pub retrieval: RetrievalConfig,
    pub atlas: AtlasSettings,
    /// Cutoff applied to the ranked output.
    pub max_matches: Option<usize>,
}

impl MatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = MatchConfig::parse(
            r#"
            max_matches = 5

            [cupid]
            th_accept = 0.65

            [retrieval]
            chunk_size = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.max_matches, Some(5));
        assert_eq!(config.cupid.th_accept, 0.65);
        assert_eq!(config.cupid.c_inc, CupidParams::default().c_inc);
        assert_eq!(config.retrieval.chunk_size, 10);
        assert_eq!(config.retrieval.parallelism, 4);
        assert!(config.atlas.url.is_none());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(MatchConfig::parse("").unwrap(), MatchConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(MatchConfig::parse("[atlas]\nhost = \"x\"").is_err());
    }
}
