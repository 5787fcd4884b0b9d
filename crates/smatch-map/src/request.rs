//! Matching requests: which candidate schemas a table is compared against,
//! and how the results are ranked for presentation.

use serde::{Deserialize, Serialize};
use smatch_model::{Database, ErrorKind, Match, Table};
use tracing::{debug, info};

use crate::cupid::Cupid;
use crate::error::Result;

/// Candidate set for a matching request.
#[derive(Debug)]
pub enum MatchScope<'a> {
    /// The table's own database, minus the table itself.
    WithinDatabase(&'a mut Database),
    /// One other named database.
    OtherDatabase(&'a Database),
    /// Every known database.
    Holistic(&'a mut [Database]),
}

impl MatchScope<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WithinDatabase(_) => "within_db",
            Self::OtherDatabase(_) => "other_db",
            Self::Holistic(_) => "holistic",
        }
    }
}

/// Matches `table` against the candidates described by `scope`.
///
/// In every returned [`Match`] the source side is a column of `table`.
pub fn match_table(cupid: &Cupid, table: &Table, scope: MatchScope<'_>) -> Result<Vec<Match>> {
    let label = scope.label();
    let matches = match scope {
        MatchScope::WithinDatabase(db) => match_within_database(cupid, table, db),
        MatchScope::OtherDatabase(db) => match_other_database(cupid, table, db),
        MatchScope::Holistic(dbs) => match_holistic(cupid, table, dbs),
    }?;
    info!(
        scope = label,
        table = table.name(),
        matches = matches.len(),
        "matching request finished"
    );
    Ok(matches)
}

/// Fails with an empty-schema error when `table` has no columns.
pub fn ensure_table_has_columns(table: &Table) -> Result<()> {
    Ok(table.ensure_has_columns()?)
}

/// Fails with an empty-schema error unless some table of `db` has columns.
pub fn ensure_database_not_empty(db: &Database) -> Result<()> {
    Ok(db.ensure_not_empty()?)
}

fn as_schema(table: &Table) -> Database {
    Database::from_table(table.clone(), table.name())
}

/// Matches a table against another database.
pub fn match_other_database(cupid: &Cupid, table: &Table, db: &Database) -> Result<Vec<Match>> {
    ensure_table_has_columns(table)?;
    ensure_database_not_empty(db)?;
    Ok(cupid.get_matches(&as_schema(table), db))
}

/// Matches a table against the rest of its own database.
///
/// The table is removed from `db` for the duration of the comparison and
/// put back before returning, on success and on failure alike.
pub fn match_within_database(
    cupid: &Cupid,
    table: &Table,
    db: &mut Database,
) -> Result<Vec<Match>> {
    ensure_table_has_columns(table)?;
    let removed = db.remove_table(table.id())?;
    let result = match_other_database(cupid, table, db);
    db.add_table(removed);
    result
}

/// Matches a table against every database in `dbs` and unions the results.
///
/// The table's own database is compared without the table. Databases with
/// no usable tables are skipped.
pub fn match_holistic(cupid: &Cupid, table: &Table, dbs: &mut [Database]) -> Result<Vec<Match>> {
    ensure_table_has_columns(table)?;
    let mut matches = Vec::new();
    for db in dbs.iter_mut() {
        let result = if db.contains_table(table.id()) {
            match_within_database(cupid, table, db)
        } else {
            match_other_database(cupid, table, db)
        };
        match result {
            Ok(found) => matches.extend(found),
            Err(err) if err.kind() == ErrorKind::EmptySchema => {
                debug!(database = db.name(), "skipping database without usable tables");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(matches)
}

/// Sorts matches by descending score and keeps at most `max_results`.
///
/// The sort is stable: equal scores keep their original relative order.
pub fn rank_matches(mut matches: Vec<Match>, max_results: Option<usize>) -> Vec<Match> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(limit) = max_results {
        matches.truncate(limit);
    }
    matches
}

/// One side of a ranked match in its presentation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSide {
    /// `table.column`
    pub name: String,
    pub guid: String,
}

/// Presentation form of a match: `{"source": …, "target": …, "sim": …}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub source: RankedSide,
    pub target: RankedSide,
    pub sim: f64,
}

impl From<&Match> for RankedMatch {
    fn from(m: &Match) -> Self {
        Self {
            source: RankedSide {
                name: m.source.qualified_name(),
                guid: m.source.column_id.to_string(),
            },
            target: RankedSide {
                name: m.target.qualified_name(),
                guid: m.target.column_id.to_string(),
            },
            sim: m.score,
        }
    }
}

/// Ranks matches and converts them to their presentation form.
pub fn to_ranked(matches: Vec<Match>, max_results: Option<usize>) -> Vec<RankedMatch> {
    rank_matches(matches, max_results)
        .iter()
        .map(RankedMatch::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use smatch_model::{ColumnRef, EntityId};

    use super::*;

    fn side(name: &str) -> ColumnRef {
        ColumnRef {
            table_id: EntityId::new("t").unwrap(),
            table_name: "t".to_string(),
            column_id: EntityId::new(name).unwrap(),
            column_name: name.to_string(),
        }
    }

    fn scored(name: &str, score: f64) -> Match {
        Match {
            source: side(name),
            target: side(name),
            score,
        }
    }

    #[test]
    fn ranks_by_score_and_truncates() {
        let ranked = rank_matches(
            vec![scored("a", 0.7), scored("b", 0.9), scored("c", 0.8)],
            Some(2),
        );
        let names: Vec<_> = ranked.iter().map(|m| m.source.column_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn presentation_uses_qualified_names() {
        let ranked = to_ranked(vec![scored("a", 0.7)], None);
        assert_eq!(ranked[0].source.name, "t.a");
        assert_eq!(ranked[0].target.guid, "a");
    }
}
