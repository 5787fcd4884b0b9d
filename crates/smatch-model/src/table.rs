use serde::{Deserialize, Serialize};

use crate::{Column, EntityId, ModelError};

/// A table and its columns, in retrieval order.
///
/// Column identifiers are unique within a table: pushing a column whose
/// identifier is already present is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: EntityId,
    name: String,
    database_id: EntityId,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(id: EntityId, name: impl Into<String>, database_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            database_id,
            columns: Vec::new(),
        }
    }

    /// Builds a table from an already resolved column list.
    pub fn with_columns(
        id: EntityId,
        name: impl Into<String>,
        database_id: EntityId,
        columns: impl IntoIterator<Item = Column>,
    ) -> Self {
        let mut table = Self::new(id, name, database_id);
        for column in columns {
            table.push_column(column);
        }
        table
    }

    /// Appends a column. Returns false if a column with the same identifier
    /// already exists.
    pub fn push_column(&mut self, column: Column) -> bool {
        if self.columns.iter().any(|c| c.id() == column.id()) {
            return false;
        }
        self.columns.push(column);
        true
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the database this table belongs to.
    pub fn database_id(&self) -> &EntityId {
        &self.database_id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fails with [`ModelError::EmptyTable`] when the table has no columns.
    pub fn ensure_has_columns(&self) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::EmptyTable {
                table: self.id.clone(),
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).unwrap()
    }

    #[test]
    fn duplicate_column_ids_are_ignored() {
        let mut table = Table::new(id("t"), "users", id("db"));
        assert!(table.push_column(Column::new(id("c1"), "id", "int")));
        assert!(!table.push_column(Column::new(id("c1"), "other", "varchar")));
        assert_eq!(table.number_of_columns(), 1);
        assert_eq!(table.columns()[0].name(), "id");
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = Table::new(id("t"), "users", id("db"));
        assert!(table.ensure_has_columns().is_err());
    }
}
