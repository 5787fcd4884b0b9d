//! Schema matching engine.
//!
//! Builds a [`SchemaTree`] per database, scores every node pair with the
//! Cupid algorithm (linguistic leaf similarity, bottom-up structural
//! propagation, weighted recompute) and reduces the result to one-to-one
//! column [`Match`](smatch_model::Match)es.

#![deny(unsafe_code)]

pub mod category;
pub mod cupid;
pub mod error;
pub mod linguistic;
pub mod mapping;
pub mod params;
pub mod request;
pub mod similarity;
pub mod tree;

pub use category::{CategorySet, TypeFamily};
pub use cupid::Cupid;
pub use error::{MatchError, Result};
pub use linguistic::{name_similarity, tokenize};
pub use mapping::{mapping_generation_leaves, select_one_to_one};
pub use params::CupidParams;
pub use request::{
    MatchScope, RankedMatch, RankedSide, ensure_database_not_empty, ensure_table_has_columns,
    match_holistic, match_other_database,
    match_table, match_within_database, rank_matches, to_ranked,
};
pub use similarity::{PairSimilarity, SimilarityMatrix};
pub use tree::{NodeId, NodeKind, SchemaTree, TreeNode};
