use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EntityId, ModelError, Table};

/// A database schema: its tables keyed by identifier.
///
/// Tables are kept in a `BTreeMap` so that every traversal is ordered by
/// identifier, independent of the order in which adapters inserted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    id: EntityId,
    name: String,
    tables: BTreeMap<EntityId, Table>,
}

impl Database {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tables: BTreeMap::new(),
        }
    }

    pub fn with_tables(
        id: EntityId,
        name: impl Into<String>,
        tables: impl IntoIterator<Item = Table>,
    ) -> Self {
        let mut db = Self::new(id, name);
        for table in tables {
            db.add_table(table);
        }
        db
    }

    /// Wraps a single table into a database of its own, so it can be
    /// compared as a schema.
    pub fn from_table(table: Table, name: impl Into<String>) -> Self {
        let id = table.database_id().clone();
        Self::with_tables(id, name, [table])
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables that have at least one column, keyed by table name.
    ///
    /// Tables with zero columns are structurally incomplete and never handed
    /// to the matcher. If two tables share a name, the one with the greater
    /// identifier wins.
    pub fn get_tables(&self) -> BTreeMap<&str, &Table> {
        self.tables
            .values()
            .filter(|table| !table.is_empty())
            .map(|table| (table.name(), table))
            .collect()
    }

    /// All tables, including empty ones, ordered by identifier.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table(&self, id: &EntityId) -> Option<&Table> {
        self.tables.get(id)
    }

    pub fn contains_table(&self, id: &EntityId) -> bool {
        self.tables.contains_key(id)
    }

    /// Removes a table and hands it back to the caller.
    pub fn remove_table(&mut self, id: &EntityId) -> Result<Table, ModelError> {
        self.tables
            .remove(id)
            .ok_or_else(|| ModelError::TableNotFound {
                table: id.clone(),
                database: self.id.clone(),
            })
    }

    /// Inserts a table, replacing any table with the same identifier.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.id().clone(), table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the database has zero tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Fails with [`ModelError::EmptyDatabase`] unless at least one table has
    /// columns. Matching against such a database is not meaningful.
    pub fn ensure_not_empty(&self) -> Result<(), ModelError> {
        if self.tables.values().all(Table::is_empty) {
            return Err(ModelError::EmptyDatabase {
                database: self.id.clone(),
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).unwrap()
    }

    fn table(table_id: &str, name: &str, columns: &[&str]) -> Table {
        Table::with_columns(
            id(table_id),
            name,
            id("db"),
            columns
                .iter()
                .map(|c| Column::new(id(&format!("{table_id}.{c}")), *c, "int")),
        )
    }

    #[test]
    fn get_tables_skips_empty_tables() {
        let db = Database::with_tables(
            id("db"),
            "sales",
            [table("t1", "orders", &["id"]), table("t2", "empty", &[])],
        );
        let tables = db.get_tables();
        assert_eq!(tables.len(), 1);
        assert!(tables.contains_key("orders"));
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn remove_missing_table_fails() {
        let mut db = Database::new(id("db"), "sales");
        let err = db.remove_table(&id("nope")).unwrap_err();
        assert!(matches!(err, ModelError::TableNotFound { .. }));
    }

    #[test]
    fn add_table_overwrites_same_id() {
        let mut db = Database::with_tables(id("db"), "sales", [table("t1", "orders", &["id"])]);
        db.add_table(table("t1", "orders", &["id", "total"]));
        assert_eq!(db.len(), 1);
        assert_eq!(db.table(&id("t1")).unwrap().number_of_columns(), 2);
    }

    #[test]
    fn database_with_only_empty_tables_is_empty_schema() {
        let db = Database::with_tables(id("db"), "sales", [table("t1", "empty", &[])]);
        assert!(!db.is_empty());
        assert!(db.ensure_not_empty().is_err());
    }
}
