//! Schema retrieval for the matching engine.
//!
//! This crate turns external schema descriptions into populated
//! [`Database`](smatch_model::Database)s.
//!
//! # Features
//!
//! - **Catalog adapter**: loads a database from a metadata catalog with a
//!   bounded worker pool, in chunked bulk requests
//! - **Technology dispatch**: relational and search-index catalog shapes;
//!   unknown shapes load as empty databases
//! - **Atlas client**: blocking HTTP implementation of the catalog contract
//! - **Dataset source**: directories of CSV files as databases
//!
//! # Example
//!
//! ```ignore
//! use smatch_catalog::{AtlasClient, CatalogAdapter, RetrievalConfig, SchemaSource};
//!
//! let client = AtlasClient::new("http://atlas:21000", None, DEFAULT_TIMEOUT)?;
//! let adapter = CatalogAdapter::new(client, RetrievalConfig::default())?;
//! let db = adapter.get_db("5b2c…")?;
//! ```

#![deny(unsafe_code)]

mod adapter;
mod atlas;
mod catalog;
mod chunk;
mod config;
mod dataset;
mod error;
mod payload;
mod technology;

// === Error Types ===
pub use error::{CatalogError, Result};

// === Contracts ===
pub use catalog::{Catalog, SchemaSource};

// === Catalog Retrieval ===
pub use adapter::{CatalogAdapter, DEFAULT_DATABASE_TYPES};
pub use atlas::{AtlasClient, AtlasCredentials, DEFAULT_TIMEOUT};
pub use chunk::chunk_ids;
pub use config::RetrievalConfig;
pub use payload::{BulkResponse, Entity, EntityResponse, RelatedRef};
pub use technology::Technology;

// === Local Datasets ===
pub use dataset::{DEFAULT_SAMPLE_ROWS, DatasetSource, infer_type};
