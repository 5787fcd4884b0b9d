//! Catalog shapes supported by the adapter.

use std::fmt;

use crate::error::Result;
use crate::payload::{Entity, RelatedRef};

/// Structural shape of a catalog database entity, read from its
/// `technologyPlatform` attribute.
///
/// Each supported technology names the relationship that lists its tables
/// and the one that lists a table's columns. Anything else is carried as
/// [`Technology::Unsupported`] and yields no tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Technology {
    /// Relational: tables and columns.
    Mssql,
    /// Search index: indices and fields.
    Elasticsearch,
    Unsupported(String),
}

impl Technology {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "mssql" => Self::Mssql,
            "Elasticsearch" => Self::Elasticsearch,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Technology declared on a database entity. A missing tag is treated as
    /// an unsupported (empty) technology.
    pub fn of(entity: &Entity) -> Self {
        Self::parse(entity.attribute_str("technologyPlatform").unwrap_or_default())
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    fn table_key(&self) -> Option<&'static str> {
        match self {
            Self::Mssql => Some("tables"),
            Self::Elasticsearch => Some("indices"),
            Self::Unsupported(_) => None,
        }
    }

    fn column_key(&self) -> Option<&'static str> {
        match self {
            Self::Mssql => Some("columns"),
            Self::Elasticsearch => Some("fields"),
            Self::Unsupported(_) => None,
        }
    }

    /// Child-table references of a database entity.
    pub fn table_refs(&self, db: &Entity) -> Result<Vec<RelatedRef>> {
        match self.table_key() {
            Some(key) => db.related(key),
            None => Ok(Vec::new()),
        }
    }

    /// Column references of a table entity.
    pub fn column_refs(&self, table: &Entity) -> Result<Vec<RelatedRef>> {
        match self.column_key() {
            Some(key) => table.related(key),
            None => Ok(Vec::new()),
        }
    }

    /// Declared data type of a column entity.
    pub fn column_type<'a>(&self, column: &'a Entity) -> Option<&'a str> {
        match self {
            Self::Elasticsearch => column
                .attribute_str("data_type")
                .or_else(|| column.attribute_str("type")),
            _ => column.attribute_str("data_type"),
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mssql => f.write_str("mssql"),
            Self::Elasticsearch => f.write_str("Elasticsearch"),
            Self::Unsupported(tag) => write!(f, "unsupported({tag})"),
        }
    }
}
