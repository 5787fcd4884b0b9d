//! Contracts between the adapter and the systems it reads schemas from.

use smatch_model::{Database, Table};

use crate::error::Result;
use crate::payload::{BulkResponse, EntityResponse};

/// Entity lookups against a metadata catalog.
///
/// Implementations are shared across worker threads during bulk retrieval,
/// hence the `Sync` bound.
pub trait Catalog: Sync {
    /// Fetches one entity and the entities it refers to.
    ///
    /// Fails with `NotFound` when the identifier is unknown.
    fn get_entity(&self, guid: &str) -> Result<EntityResponse>;

    /// Fetches many entities in one request.
    fn get_bulk_entities(&self, guids: &[String]) -> Result<BulkResponse>;

    /// Identifiers of every entity of the given type.
    fn search_guids(&self, type_name: &str) -> Result<Vec<String>>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn get_entity(&self, guid: &str) -> Result<EntityResponse> {
        (**self).get_entity(guid)
    }

    fn get_bulk_entities(&self, guids: &[String]) -> Result<BulkResponse> {
        (**self).get_bulk_entities(guids)
    }

    fn search_guids(&self, type_name: &str) -> Result<Vec<String>> {
        (**self).search_guids(type_name)
    }
}

/// Anything that can hand out fully populated schemas.
pub trait SchemaSource {
    /// Loads one database with all of its tables.
    fn get_db(&self, id: &str) -> Result<Database>;

    /// Loads one table; its owning database is [`Table::database_id`].
    fn get_db_table(&self, id: &str) -> Result<Table>;

    /// Loads every database known to the source.
    fn get_all_dbs(&self) -> Result<Vec<Database>>;
}
