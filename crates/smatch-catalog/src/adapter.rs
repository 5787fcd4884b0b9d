//! Catalog-backed schema retrieval.
//!
//! A database is loaded in two fan-out stages on a bounded worker pool:
//! bulk retrieval of table entities in chunks, then construction of one
//! [`Table`] per table reference. Each stage is joined before the next one
//! starts, and any failure aborts the whole retrieval.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use smatch_model::{Column, Database, EntityId, ErrorKind, Table};
use tracing::{debug, info_span, warn};

use crate::catalog::{Catalog, SchemaSource};
use crate::chunk::chunk_ids;
use crate::config::RetrievalConfig;
use crate::error::{CatalogError, Result};
use crate::payload::{BulkResponse, Entity, RelatedRef};
use crate::technology::Technology;

/// Column type recorded when the catalog does not declare one.
const UNKNOWN_TYPE: &str = "unknown";

/// Default entity types enumerated by [`CatalogAdapter::get_all_dbs`].
pub const DEFAULT_DATABASE_TYPES: &[&str] = &["mssql_db", "elasticsearch_cluster"];

/// Builds [`Database`]s from a [`Catalog`].
pub struct CatalogAdapter<C> {
    catalog: C,
    config: RetrievalConfig,
    database_types: Vec<String>,
    pool: ThreadPool,
}

impl<C: Catalog> CatalogAdapter<C> {
    /// Creates an adapter with a worker pool of `config.parallelism` threads.
    pub fn new(catalog: C, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|idx| format!("smatch-catalog-{idx}"))
            .build()?;
        Ok(Self {
            catalog,
            config,
            database_types: DEFAULT_DATABASE_TYPES
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            pool,
        })
    }

    /// Replaces the entity types enumerated by holistic retrieval.
    #[must_use]
    pub fn with_database_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.database_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    fn fetch_entity(&self, guid: &str) -> Result<(Entity, HashMap<String, Entity>)> {
        let response = self.catalog.get_entity(guid)?;
        let entity = response
            .entity
            .ok_or_else(|| CatalogError::NotFound { id: guid.to_string() })?;
        Ok((entity, response.referred_entities))
    }

    /// Stage 1: one bulk request per chunk, joined before returning.
    fn fetch_table_entities(&self, guids: &[String]) -> Result<BulkResponse> {
        let chunks = chunk_ids(guids, self.config.chunk_size);
        debug!(
            tables = guids.len(),
            chunks = chunks.len(),
            "fetching table entities"
        );

        let responses: Vec<BulkResponse> = self.pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(idx, chunk)| {
                    self.catalog
                        .get_bulk_entities(chunk)
                        .map_err(|err| chunk_failure(idx, err))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut merged = BulkResponse::default();
        for response in responses {
            merged.entities.extend(response.entities);
            merged.referred_entities.extend(response.referred_entities);
        }
        Ok(merged)
    }
}

/// Failures of a bulk chunk surface as unreachable, except for payload
/// faults which keep their own kind.
fn chunk_failure(idx: usize, err: CatalogError) -> CatalogError {
    match err.kind() {
        ErrorKind::CatalogUnreachable | ErrorKind::CatalogResponseInvalid => err,
        _ => CatalogError::Unreachable {
            stage: format!("fetching table chunk {}", idx + 1),
            reason: err.to_string(),
        },
    }
}

/// Builds one table from its entity and the column entities it refers to.
fn build_table(
    name: &str,
    entity: &Entity,
    referred: &HashMap<String, Entity>,
    technology: &Technology,
    database_id: &EntityId,
) -> Result<Table> {
    let mut table = Table::new(EntityId::new(&entity.guid)?, name, database_id.clone());
    for column_ref in technology.column_refs(entity)? {
        let column = referred.get(&column_ref.guid).ok_or_else(|| {
            CatalogError::invalid_payload(
                &entity.guid,
                format!("column {} missing from referred entities", column_ref.guid),
            )
        })?;
        let column_name = column
            .attribute_str("name")
            .or(column_ref.display_text.as_deref())
            .ok_or_else(|| CatalogError::invalid_payload(&column.guid, "column has no name"))?;
        let data_type = technology.column_type(column).unwrap_or(UNKNOWN_TYPE);
        table.push_column(Column::new(
            EntityId::new(&column_ref.guid)?,
            column_name,
            data_type,
        ));
    }
    Ok(table)
}

fn table_name<'a>(reference: Option<&'a RelatedRef>, entity: &'a Entity) -> &'a str {
    reference
        .and_then(|r| r.display_text.as_deref())
        .or_else(|| entity.attribute_str("name"))
        .or_else(|| entity.qualified_name())
        .unwrap_or(&entity.guid)
}

impl<C: Catalog> SchemaSource for CatalogAdapter<C> {
    fn get_db(&self, id: &str) -> Result<Database> {
        let _span = info_span!("get_db", guid = id).entered();

        let (entity, _) = self.fetch_entity(id)?;
        let technology = Technology::of(&entity);
        let database_id = EntityId::new(&entity.guid)?;
        let name = entity.qualified_name().unwrap_or(id).to_string();
        if !technology.is_supported() {
            warn!(database = %name, %technology, "unsupported catalog technology, no tables loaded");
        }

        let table_refs = technology.table_refs(&entity)?;
        if table_refs.is_empty() {
            debug!(database = %name, "database has no tables");
            return Ok(Database::new(database_id, name));
        }
        let guids: Vec<String> = table_refs.iter().map(|r| r.guid.clone()).collect();

        let bulk = self.fetch_table_entities(&guids)?;
        let entities: HashMap<&str, &Entity> = bulk
            .entities
            .iter()
            .map(|e| (e.guid.as_str(), e))
            .collect();

        // Stage 2: every chunk has joined, build tables in parallel.
        let tables: Vec<Table> = self.pool.install(|| {
            table_refs
                .par_iter()
                .map(|reference| {
                    let entity = entities.get(reference.guid.as_str()).ok_or_else(|| {
                        CatalogError::invalid_payload(
                            &reference.guid,
                            "table missing from bulk response",
                        )
                    })?;
                    build_table(
                        table_name(Some(reference), entity),
                        entity,
                        &bulk.referred_entities,
                        &technology,
                        &database_id,
                    )
                })
                .collect::<Result<Vec<_>>>()
        })?;

        debug!(database = %name, tables = tables.len(), "database loaded");
        Ok(Database::with_tables(database_id, name, tables))
    }

    fn get_db_table(&self, id: &str) -> Result<Table> {
        let (entity, referred) = self.fetch_entity(id)?;
        let owner = match entity.related_one("db")? {
            Some(owner) => owner,
            None => entity.related_one("database")?.ok_or_else(|| {
                CatalogError::invalid_payload(&entity.guid, "table has no owning database")
            })?,
        };
        let (db_entity, _) = self.fetch_entity(&owner.guid)?;
        let technology = Technology::of(&db_entity);
        build_table(
            table_name(None, &entity),
            &entity,
            &referred,
            &technology,
            &EntityId::new(&owner.guid)?,
        )
    }

    fn get_all_dbs(&self) -> Result<Vec<Database>> {
        let mut guids = BTreeSet::new();
        for type_name in &self.database_types {
            guids.extend(self.catalog.search_guids(type_name)?);
        }
        debug!(databases = guids.len(), "enumerated catalog databases");
        guids.iter().map(|guid| self.get_db(guid)).collect()
    }
}
