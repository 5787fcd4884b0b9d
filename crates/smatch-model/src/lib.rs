//! Canonical schema model shared by the catalog adapters and the matcher.
//!
//! A [`Database`] owns its [`Table`]s, a table owns its [`Column`]s. Every
//! entity carries a stable, catalog-scoped [`EntityId`].

#![deny(unsafe_code)]

pub mod column;
pub mod database;
pub mod error;
pub mod ids;
pub mod matching;
pub mod table;

pub use column::Column;
pub use database::Database;
pub use error::{ErrorKind, ModelError, Result};
pub use ids::EntityId;
pub use matching::{ColumnRef, Match};
pub use table::Table;
