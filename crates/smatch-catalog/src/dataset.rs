//! Local dataset directories as a schema source.
//!
//! Layout: every sub-directory of the root is a database, every `.csv` file
//! inside it is a table whose header row names the columns. Column types are
//! inferred from a sample of the data rows.
//!
//! Identifiers are paths relative to the root: `db` for a database,
//! `db/table` for a table (file stem) and `db/table/column` for a column.

use std::path::{Component, Path, PathBuf};

use smatch_model::{Column, Database, EntityId, Table};
use tracing::debug;

use crate::catalog::SchemaSource;
use crate::error::{CatalogError, Result};

/// Data rows inspected per file when inferring column types.
pub const DEFAULT_SAMPLE_ROWS: usize = 100;

/// Schema source backed by a directory of CSV files.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    root: PathBuf,
    sample_rows: usize,
}

impl DatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::NotFound {
                id: root.display().to_string(),
            });
        }
        Ok(Self {
            root,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        })
    }

    /// Sets how many data rows are read per file for type inference.
    #[must_use]
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of database `db`, which must name a direct child of the root.
    fn database_dir(&self, db: &str) -> Result<PathBuf> {
        let mut components = Path::new(db).components();
        let is_child = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        let dir = self.root.join(db);
        if !is_child || db.contains(['/', '\\']) || !dir.is_dir() {
            return Err(CatalogError::NotFound { id: db.to_string() });
        }
        Ok(dir)
    }

    fn load_table(&self, db: &str, path: &Path) -> Result<Table> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| CatalogError::NotFound {
                id: path.display().to_string(),
            })?;
        let table_id = format!("{db}/{name}");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| CatalogError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| CatalogError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut samples: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records().take(self.sample_rows) {
            let record = record.map_err(|source| CatalogError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            for (idx, value) in record.iter().enumerate().take(headers.len()) {
                samples[idx].push(value.trim().to_string());
            }
        }

        let mut table = Table::new(EntityId::new(&table_id)?, name, EntityId::new(db)?);
        for (header, values) in headers.iter().zip(&samples) {
            if header.is_empty() {
                continue;
            }
            table.push_column(Column::new(
                EntityId::new(format!("{table_id}/{header}"))?,
                header,
                infer_type(values),
            ));
        }
        Ok(table)
    }
}

/// `.csv` files directly inside `dir`, sorted by file name.
fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Narrowest type that every non-empty sample value fits.
///
/// Checked in order: `int`, `float`, `boolean`, `date` (ISO `YYYY-MM-DD`),
/// otherwise `varchar`. A column without values is `varchar`.
pub fn infer_type(values: &[String]) -> &'static str {
    let present: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect();
    if present.is_empty() {
        return "varchar";
    }
    if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        "int"
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        "float"
    } else if present.iter().all(|v| is_boolean(v)) {
        "boolean"
    } else if present.iter().all(|v| is_iso_date(v)) {
        "date"
    } else {
        "varchar"
    }
}

fn is_boolean(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    )
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !(digits(0..4) && digits(5..7) && digits(8..10)) {
        return false;
    }
    let month = (bytes[5] - b'0') * 10 + (bytes[6] - b'0');
    let day = (bytes[8] - b'0') * 10 + (bytes[9] - b'0');
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

impl SchemaSource for DatasetSource {
    fn get_db(&self, id: &str) -> Result<Database> {
        let dir = self.database_dir(id)?;
        let tables = list_csv_files(&dir)?
            .iter()
            .map(|path| self.load_table(id, path))
            .collect::<Result<Vec<_>>>()?;
        debug!(database = id, tables = tables.len(), "dataset directory loaded");
        Ok(Database::with_tables(EntityId::new(id)?, id, tables))
    }

    fn get_db_table(&self, id: &str) -> Result<Table> {
        let (db, table) = id
            .split_once('/')
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
        let dir = self.database_dir(db)?;
        let path = list_csv_files(&dir)?
            .into_iter()
            .find(|path| path.file_stem().and_then(|s| s.to_str()) == Some(table))
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
        self.load_table(db, &path)
    }

    fn get_all_dbs(&self) -> Result<Vec<Database>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| CatalogError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: self.root.clone(),
                source,
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        names.iter().map(|name| self.get_db(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn infers_narrowest_type() {
        assert_eq!(infer_type(&values(&["1", "42", ""])), "int");
        assert_eq!(infer_type(&values(&["1", "4.5"])), "float");
        assert_eq!(infer_type(&values(&["true", "No"])), "boolean");
        assert_eq!(infer_type(&values(&["2024-01-31", "1999-12-01"])), "date");
        assert_eq!(infer_type(&values(&["2024-13-01"])), "varchar");
        assert_eq!(infer_type(&values(&["alice", "1"])), "varchar");
        assert_eq!(infer_type(&values(&["", ""])), "varchar");
    }
}
