//! Output unit of the matcher.

use serde::{Deserialize, Serialize};

use crate::{Column, EntityId, Table};

/// Identifies one column together with its owning table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table_id: EntityId,
    pub table_name: String,
    pub column_id: EntityId,
    pub column_name: String,
}

impl ColumnRef {
    pub fn new(table: &Table, column: &Column) -> Self {
        Self {
            table_id: table.id().clone(),
            table_name: table.name().to_string(),
            column_id: column.id().clone(),
            column_name: column.name().to_string(),
        }
    }

    /// `table.column` display name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_name, self.column_name)
    }
}

/// An accepted column correspondence with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub source: ColumnRef,
    pub target: ColumnRef,
    pub score: f64,
}
