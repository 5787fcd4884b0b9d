//! Execution of one matching request against a schema source.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use smatch_catalog::{
    AtlasClient, AtlasCredentials, CatalogAdapter, CatalogError, DEFAULT_TIMEOUT, DatasetSource,
    SchemaSource,
};
use smatch_map::{Cupid, MatchError, MatchScope, RankedMatch, match_table, to_ranked};
use smatch_model::{ErrorKind, ModelError};
use tracing::{debug, info_span};

use crate::config::MatchConfig;

/// What a table is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// The rest of the table's own database.
    WithinDb { table: String },
    /// One other database.
    OtherDb { table: String, database: String },
    /// Every database the source knows.
    Holistic { table: String },
}

impl Request {
    pub fn table(&self) -> &str {
        match self {
            Self::WithinDb { table } | Self::OtherDb { table, .. } | Self::Holistic { table } => {
                table
            }
        }
    }
}

/// Opens the schema source selected by the configuration.
///
/// A dataset directory takes precedence over an Atlas URL.
pub fn open_source(config: &MatchConfig, datasets: Option<&Path>) -> Result<Box<dyn SchemaSource>> {
    if let Some(root) = datasets {
        let source = DatasetSource::new(root)
            .with_context(|| format!("open dataset directory {}", root.display()))?;
        return Ok(Box::new(source));
    }

    let Some(url) = config.atlas.url.as_deref() else {
        bail!("no schema source: pass --datasets <DIR> or --atlas-url <URL>");
    };
    let credentials = match (&config.atlas.user, &config.atlas.password) {
        (Some(user), Some(password)) => Some(AtlasCredentials {
            user: user.clone(),
            password: password.clone(),
        }),
        (None, None) => None,
        _ => bail!("Atlas credentials need both a user and a password"),
    };
    let timeout = config
        .atlas
        .timeout_secs
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
    let client = AtlasClient::new(url, credentials, timeout).context("create Atlas client")?;
    let mut adapter =
        CatalogAdapter::new(client, config.retrieval).context("create catalog adapter")?;
    if let Some(types) = &config.atlas.database_types {
        adapter = adapter.with_database_types(types.iter().cloned());
    }
    Ok(Box::new(adapter))
}

/// Loads the schemas a request needs, matches and ranks the result.
pub fn execute(
    source: &dyn SchemaSource,
    config: &MatchConfig,
    request: &Request,
) -> Result<Vec<RankedMatch>> {
    let _span = info_span!("request", table = request.table()).entered();
    let cupid = Cupid::new(config.cupid).context("invalid matcher parameters")?;

    let table = source
        .get_db_table(request.table())
        .with_context(|| format!("load table {}", request.table()))?;
    debug!(columns = table.number_of_columns(), "source table loaded");

    let matches = match request {
        Request::WithinDb { .. } => {
            let database = table.database_id().as_str();
            let mut db = source
                .get_db(database)
                .with_context(|| format!("load database {database}"))?;
            match_table(&cupid, &table, MatchScope::WithinDatabase(&mut db))
        }
        Request::OtherDb { database, .. } => {
            let db = source
                .get_db(database)
                .with_context(|| format!("load database {database}"))?;
            match_table(&cupid, &table, MatchScope::OtherDatabase(&db))
        }
        Request::Holistic { .. } => {
            let mut dbs = source.get_all_dbs().context("load all databases")?;
            match_table(&cupid, &table, MatchScope::Holistic(&mut dbs))
        }
    }
    .with_context(|| format!("match table {}", request.table()))?;

    Ok(to_ranked(matches, config.max_matches))
}

/// Stable kind of the first library error in the chain, if any.
pub fn error_kind(error: &anyhow::Error) -> Option<ErrorKind> {
    error.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<CatalogError>() {
            Some(err.kind())
        } else if let Some(err) = cause.downcast_ref::<MatchError>() {
            Some(err.kind())
        } else {
            cause.downcast_ref::<ModelError>().map(ModelError::kind)
        }
    })
}

/// Process exit code for a failed request: 2 for caller mistakes, 1 for
/// everything else.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error_kind(error) {
        Some(kind) if kind.is_client_error() => 2,
        _ => 1,
    }
}
