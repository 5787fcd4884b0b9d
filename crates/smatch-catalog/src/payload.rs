//! Typed views over catalog entity documents.
//!
//! Only the fields the adapter reads are modelled; everything else is kept
//! as raw JSON so unknown attributes never break decoding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

/// A single catalog entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub guid: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationship_attributes: Map<String, Value>,
}

/// Reference from one entity to another inside `relationshipAttributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRef {
    pub guid: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub display_text: Option<String>,
}

/// Response of a single-entity lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResponse {
    #[serde(default)]
    pub entity: Option<Entity>,
    #[serde(default)]
    pub referred_entities: HashMap<String, Entity>,
}

/// Response of a bulk lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub referred_entities: HashMap<String, Entity>,
}

impl Entity {
    /// String attribute, if present and a string.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// `qualifiedName`, falling back to `name`.
    pub fn qualified_name(&self) -> Option<&str> {
        self.attribute_str("qualifiedName")
            .or_else(|| self.attribute_str("name"))
    }

    /// Decodes the reference list stored under `relationshipAttributes[key]`.
    ///
    /// A missing or `null` key is an empty list; any other non-list value is
    /// a malformed payload.
    pub fn related(&self, key: &str) -> Result<Vec<RelatedRef>> {
        match self.relationship_attributes.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|err| {
                CatalogError::invalid_payload(&self.guid, format!("{key}: {err}"))
            }),
        }
    }

    /// Decodes a single reference stored under `relationshipAttributes[key]`.
    pub fn related_one(&self, key: &str) -> Result<Option<RelatedRef>> {
        match self.relationship_attributes.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| CatalogError::invalid_payload(&self.guid, format!("{key}: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_atlas_entity() {
        let response: EntityResponse = serde_json::from_value(json!({
            "entity": {
                "guid": "db-1",
                "typeName": "mssql_db",
                "attributes": {"qualifiedName": "sales@prod", "technologyPlatform": "mssql"},
                "relationshipAttributes": {
                    "tables": [{"guid": "t-1", "typeName": "mssql_table", "displayText": "orders"}],
                    "schema": null
                }
            }
        }))
        .unwrap();
        let entity = response.entity.unwrap();
        assert_eq!(entity.qualified_name(), Some("sales@prod"));
        let tables = entity.related("tables").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].display_text.as_deref(), Some("orders"));
        assert!(entity.related("schema").unwrap().is_empty());
        assert!(entity.related("missing").unwrap().is_empty());
    }

    #[test]
    fn non_list_reference_is_invalid() {
        let entity: Entity = serde_json::from_value(json!({
            "guid": "db-1",
            "relationshipAttributes": {"tables": "oops"}
        }))
        .unwrap();
        assert!(entity.related("tables").is_err());
    }
}
