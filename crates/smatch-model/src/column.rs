use serde::{Deserialize, Serialize};

use crate::EntityId;

/// A single column of a table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: EntityId,
    name: String,
    data_type: String,
}

impl Column {
    pub fn new(id: EntityId, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared data type as reported by the catalog (e.g. "int", "varchar").
    pub fn data_type(&self) -> &str {
        &self.data_type
    }
}
