//! Catalog adapter scenarios against an in-memory catalog.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;
use smatch_catalog::{
    BulkResponse, Catalog, CatalogAdapter, CatalogError, Entity, EntityResponse, Result,
    RetrievalConfig, SchemaSource,
};
use smatch_model::ErrorKind;

#[derive(Default)]
struct MemoryCatalog {
    entities: HashMap<String, Entity>,
    failing_guid: Option<String>,
    bulk_requests: Mutex<Vec<Vec<String>>>,
}

impl MemoryCatalog {
    fn insert(&mut self, value: serde_json::Value) {
        let entity: Entity = serde_json::from_value(value).expect("valid entity");
        self.entities.insert(entity.guid.clone(), entity);
    }

    fn referred_for(&self, entity: &Entity) -> HashMap<String, Entity> {
        let mut referred = HashMap::new();
        for key in ["columns", "fields"] {
            for column in entity.related(key).expect("valid refs") {
                if let Some(found) = self.entities.get(&column.guid) {
                    referred.insert(column.guid.clone(), found.clone());
                }
            }
        }
        referred
    }
}

impl Catalog for MemoryCatalog {
    fn get_entity(&self, guid: &str) -> Result<EntityResponse> {
        let entity = self
            .entities
            .get(guid)
            .ok_or_else(|| CatalogError::NotFound { id: guid.into() })?;
        Ok(EntityResponse {
            entity: Some(entity.clone()),
            referred_entities: self.referred_for(entity),
        })
    }

    fn get_bulk_entities(&self, guids: &[String]) -> Result<BulkResponse> {
        self.bulk_requests.lock().unwrap().push(guids.to_vec());
        if let Some(failing) = &self.failing_guid {
            if guids.contains(failing) {
                return Err(CatalogError::Status {
                    url: "memory://bulk".into(),
                    status: 503,
                });
            }
        }
        let mut response = BulkResponse::default();
        for guid in guids {
            if let Some(entity) = self.entities.get(guid) {
                response.referred_entities.extend(self.referred_for(entity));
                response.entities.push(entity.clone());
            }
        }
        Ok(response)
    }

    fn search_guids(&self, type_name: &str) -> Result<Vec<String>> {
        Ok(self
            .entities
            .values()
            .filter(|e| e.type_name.as_deref() == Some(type_name))
            .map(|e| e.guid.clone())
            .collect())
    }
}

/// A relational database `db` with `tables` tables of two columns each.
fn mssql_catalog(db: &str, tables: usize) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::default();
    let refs: Vec<_> = (1..=tables)
        .map(|t| json!({"guid": format!("{db}-t{t}"), "displayText": format!("table{t}")}))
        .collect();
    catalog.insert(json!({
        "guid": db,
        "typeName": "mssql_db",
        "attributes": {"qualifiedName": format!("{db}@prod"), "technologyPlatform": "mssql"},
        "relationshipAttributes": {"tables": refs}
    }));
    for t in 1..=tables {
        let table = format!("{db}-t{t}");
        catalog.insert(json!({
            "guid": table,
            "typeName": "mssql_table",
            "attributes": {"name": format!("table{t}")},
            "relationshipAttributes": {
                "db": {"guid": db},
                "columns": [
                    {"guid": format!("{table}-id"), "displayText": "id"},
                    {"guid": format!("{table}-email"), "displayText": "email"}
                ]
            }
        }));
        catalog.insert(json!({
            "guid": format!("{table}-id"),
            "attributes": {"name": "id", "data_type": "int"}
        }));
        catalog.insert(json!({
            "guid": format!("{table}-email"),
            "attributes": {"name": "email", "data_type": "varchar"}
        }));
    }
    catalog
}

fn config(parallelism: usize, chunk_size: usize) -> RetrievalConfig {
    RetrievalConfig {
        parallelism,
        chunk_size,
    }
}

#[test]
fn loads_every_table_with_columns() {
    let catalog = mssql_catalog("sales", 5);
    let adapter = CatalogAdapter::new(&catalog, config(3, 2)).expect("adapter");

    let db = adapter.get_db("sales").expect("database loads");

    assert_eq!(db.name(), "sales@prod");
    assert_eq!(db.len(), 5);
    assert!(db.tables().all(|t| t.number_of_columns() == 2));
    let table = db.tables().next().expect("a table");
    assert_eq!(table.database_id().as_str(), "sales");
    assert_eq!(table.columns()[0].data_type(), "int");

    let requests = catalog.bulk_requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    let mut sizes: Vec<_> = requests.iter().map(Vec::len).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2, 2]);
}

#[test]
fn result_does_not_depend_on_parallelism() {
    let catalog = mssql_catalog("sales", 7);
    let serial = CatalogAdapter::new(&catalog, config(1, 1))
        .expect("adapter")
        .get_db("sales")
        .expect("serial");
    let parallel = CatalogAdapter::new(&catalog, config(8, 3))
        .expect("adapter")
        .get_db("sales")
        .expect("parallel");
    assert_eq!(serial, parallel);
}

#[test]
fn failed_chunk_aborts_whole_retrieval() {
    let mut catalog = mssql_catalog("sales", 6);
    // chunk size 2: [t1, t2] [t3, t4] [t5, t6]
    catalog.failing_guid = Some("sales-t3".into());
    let adapter = CatalogAdapter::new(&catalog, config(2, 2)).expect("adapter");

    let err = adapter.get_db("sales").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CatalogUnreachable);
}

#[test]
fn unknown_database_is_not_found() {
    let catalog = mssql_catalog("sales", 1);
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default()).expect("adapter");
    let err = adapter.get_db("nope").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn unsupported_technology_yields_empty_database() {
    let mut catalog = MemoryCatalog::default();
    catalog.insert(json!({
        "guid": "lake",
        "attributes": {"qualifiedName": "lake", "technologyPlatform": "hive"},
        "relationshipAttributes": {"tables": [{"guid": "x"}]}
    }));
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default()).expect("adapter");

    let db = adapter.get_db("lake").expect("degrades to empty");

    assert!(db.is_empty());
    assert!(catalog.bulk_requests.lock().unwrap().is_empty());
}

#[test]
fn elasticsearch_indices_and_fields() {
    let mut catalog = MemoryCatalog::default();
    catalog.insert(json!({
        "guid": "es",
        "attributes": {"qualifiedName": "search", "technologyPlatform": "Elasticsearch"},
        "relationshipAttributes": {"indices": [{"guid": "idx", "displayText": "people"}]}
    }));
    catalog.insert(json!({
        "guid": "idx",
        "relationshipAttributes": {"fields": [{"guid": "f1", "displayText": "mail"}]}
    }));
    catalog.insert(json!({"guid": "f1", "attributes": {"type": "keyword"}}));
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default()).expect("adapter");

    let db = adapter.get_db("es").expect("loads");

    let tables = db.get_tables();
    let people = tables.get("people").expect("index as table");
    assert_eq!(people.columns()[0].name(), "mail");
    assert_eq!(people.columns()[0].data_type(), "keyword");
}

#[test]
fn column_missing_from_bulk_response_is_invalid() {
    let mut catalog = mssql_catalog("sales", 1);
    catalog.entities.remove("sales-t1-email");
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default()).expect("adapter");

    let err = adapter.get_db("sales").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CatalogResponseInvalid);
}

#[test]
fn table_lookup_resolves_owning_database() {
    let catalog = mssql_catalog("sales", 2);
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default()).expect("adapter");

    let table = adapter.get_db_table("sales-t2").expect("table loads");

    assert_eq!(table.name(), "table2");
    assert_eq!(table.database_id().as_str(), "sales");
    assert_eq!(table.number_of_columns(), 2);
}

#[test]
fn all_databases_are_enumerated_by_type() {
    let mut catalog = mssql_catalog("sales", 1);
    let other = mssql_catalog("hr", 2);
    catalog.entities.extend(other.entities);
    let adapter = CatalogAdapter::new(&catalog, RetrievalConfig::default())
        .expect("adapter")
        .with_database_types(["mssql_db"]);

    let dbs = adapter.get_all_dbs().expect("all load");

    let names: Vec<_> = dbs.iter().map(|db| db.name().to_string()).collect();
    assert_eq!(names, vec!["hr@prod", "sales@prod"]);
}

#[test]
fn zero_parallelism_is_rejected() {
    let catalog = MemoryCatalog::default();
    let err = CatalogAdapter::new(&catalog, config(0, 10)).err().expect("rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
}
