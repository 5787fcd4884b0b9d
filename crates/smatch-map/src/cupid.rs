//! The Cupid matcher.

use smatch_model::{Database, Match};
use tracing::{debug, info_span};

use crate::category::CategorySet;
use crate::error::Result;
use crate::mapping::mapping_generation_leaves;
use crate::params::CupidParams;
use crate::similarity::{SimilarityMatrix, recompute_wsim, tree_match};
use crate::tree::SchemaTree;

/// Structural and linguistic schema matcher.
///
/// # Example
///
/// ```ignore
/// use smatch_map::{Cupid, CupidParams};
///
/// let cupid = Cupid::new(CupidParams::default())?;
/// let matches = cupid.get_matches(&source_db, &target_db);
/// ```
#[derive(Debug, Clone)]
pub struct Cupid {
    params: CupidParams,
}

impl Cupid {
    /// Creates a matcher after validating its parameters.
    pub fn new(params: CupidParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CupidParams {
        &self.params
    }

    /// Final (post-recompute) similarity matrix of two trees.
    pub fn similarity(&self, source: &SchemaTree, target: &SchemaTree) -> SimilarityMatrix {
        let mut categories = CategorySet::new();
        source.collect_categories(&mut categories);
        target.collect_categories(&mut categories);

        let mut matrix = tree_match(source, target, &categories, &self.params);
        recompute_wsim(source, target, &mut matrix, &self.params);
        matrix
    }

    /// Matches the columns of `source` against the columns of `target`.
    ///
    /// Both databases are expected to contain at least one table with
    /// columns; an empty side simply yields no matches.
    pub fn get_matches(&self, source: &Database, target: &Database) -> Vec<Match> {
        let _span = info_span!("cupid", source = source.name(), target = target.name()).entered();

        let source_tree = SchemaTree::from_database(source);
        let target_tree = SchemaTree::from_database(target);
        let matrix = self.similarity(&source_tree, &target_tree);
        let matches =
            mapping_generation_leaves(&source_tree, &target_tree, &matrix, self.params.th_accept);
        debug!(
            source_leaves = source_tree.leaves().len(),
            target_leaves = target_tree.leaves().len(),
            matches = matches.len(),
            "cupid matching finished"
        );
        matches
    }
}

impl Default for Cupid {
    fn default() -> Self {
        Self {
            params: CupidParams::default(),
        }
    }
}
