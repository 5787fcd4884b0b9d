//! Reduction of the final leaf matrix to one-to-one column matches.

use std::collections::HashSet;
use std::hash::Hash;

use smatch_model::Match;

use crate::similarity::SimilarityMatrix;
use crate::tree::SchemaTree;

/// Greedy one-to-one selection over scored pairs.
///
/// Pairs below `th_accept` are discarded. The rest are ranked by descending
/// score with a stable sort, so among equal scores the pair that came first
/// in `candidates` wins. A pair is kept only if neither its source nor its
/// target has been taken by a better-ranked pair.
pub fn select_one_to_one<S, T>(
    candidates: impl IntoIterator<Item = (S, T, f64)>,
    th_accept: f64,
) -> Vec<(S, T, f64)>
where
    S: Eq + Hash + Clone,
    T: Eq + Hash + Clone,
{
    let mut ranked: Vec<(S, T, f64)> = candidates
        .into_iter()
        .filter(|(_, _, score)| *score >= th_accept)
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut taken_sources = HashSet::new();
    let mut taken_targets = HashSet::new();
    let mut selected = Vec::new();
    for (source, target, score) in ranked {
        if taken_sources.contains(&source) || taken_targets.contains(&target) {
            continue;
        }
        taken_sources.insert(source.clone());
        taken_targets.insert(target.clone());
        selected.push((source, target, score));
    }
    selected
}

/// Accepted column matches from a final similarity matrix.
///
/// Candidates are enumerated target leaf first (column-major), then source
/// leaf (row), each in tree order; that enumeration order breaks score ties.
pub fn mapping_generation_leaves(
    source: &SchemaTree,
    target: &SchemaTree,
    matrix: &SimilarityMatrix,
    th_accept: f64,
) -> Vec<Match> {
    let source_leaves = source.leaves();
    let target_leaves = target.leaves();

    let candidates = target_leaves.iter().flat_map(|t| {
        source_leaves
            .iter()
            .filter_map(move |s| matrix.leaf(*s, *t).map(|pair| (*s, *t, pair.wsim)))
    });

    select_one_to_one(candidates, th_accept)
        .into_iter()
        .filter_map(|(s, t, score)| {
            Some(Match {
                source: source.column_ref(s)?,
                target: target.column_ref(t)?,
                score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use smatch_model::{Column, Database, EntityId, Table};

    use super::*;
    use crate::cupid::Cupid;

    fn schema(db: &str, columns: &[&str]) -> SchemaTree {
        let id = |value: String| EntityId::new(value).unwrap();
        let table = Table::with_columns(
            id(format!("{db}/t")),
            "codes",
            id(db.to_string()),
            columns
                .iter()
                .enumerate()
                .map(|(idx, name)| Column::new(id(format!("{db}/t/{idx}")), *name, "varchar")),
        );
        SchemaTree::from_database(&Database::with_tables(id(db.to_string()), db, [table]))
    }

    fn matched(source: &SchemaTree, target: &SchemaTree) -> Vec<(String, String)> {
        let matrix = Cupid::default().similarity(source, target);
        mapping_generation_leaves(source, target, &matrix, 0.7)
            .into_iter()
            .map(|m| (m.source.column_id.to_string(), m.target.column_id.to_string()))
            .collect()
    }

    #[test]
    fn tied_sources_resolve_to_first_in_tree_order() {
        let source = schema("a", &["code", "code"]);
        let target = schema("b", &["code"]);
        assert_eq!(matched(&source, &target), vec![("a/t/0".into(), "b/t/0".into())]);
    }

    #[test]
    fn tied_targets_resolve_to_first_in_tree_order() {
        let source = schema("a", &["code"]);
        let target = schema("b", &["code", "code"]);
        assert_eq!(matched(&source, &target), vec![("a/t/0".into(), "b/t/0".into())]);
    }

    #[test]
    fn drops_pairs_below_threshold() {
        let selected = select_one_to_one([("a", "x", 0.69), ("b", "y", 0.7)], 0.7);
        assert_eq!(selected, vec![("b", "y", 0.7)]);
    }

    #[test]
    fn best_pair_wins_conflict() {
        let selected = select_one_to_one(
            [("a", "x", 0.8), ("b", "x", 0.95), ("a", "y", 0.75)],
            0.7,
        );
        assert_eq!(selected, vec![("b", "x", 0.95), ("a", "y", 0.75)]);
    }

    #[test]
    fn ties_go_to_first_enumerated() {
        let selected = select_one_to_one([("b", "x", 0.9), ("a", "x", 0.9)], 0.5);
        assert_eq!(selected, vec![("b", "x", 0.9)]);
    }
}
