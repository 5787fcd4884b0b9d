//! Pairwise similarity between the nodes of two schema trees.
//!
//! Three stages fill one [`SimilarityMatrix`]:
//!
//! 1. [`leaf_similarities`]: linguistic similarity of every type-compatible
//!    leaf pair. Incompatible pairs are never inserted.
//! 2. [`tree_match`]: bottom-up structural propagation over internal node
//!    pairs, boosting or penalising the leaf pairs beneath them depending on
//!    how many of those leaves are strongly or weakly linked.
//! 3. [`recompute_wsim`]: final leaf scores, scaled by how well the owning
//!    tables align.

use std::collections::HashMap;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use crate::category::CategorySet;
use crate::linguistic::{token_list_similarity, tokenize};
use crate::params::CupidParams;
use crate::tree::{NodeId, SchemaTree};

/// Scores of one (source node, target node) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairSimilarity {
    /// Linguistic similarity of the two names.
    pub lsim: f64,
    /// Structural similarity.
    pub ssim: f64,
    /// Weighted combination of the two.
    pub wsim: f64,
}

impl PairSimilarity {
    fn weighted(lsim: f64, ssim: f64, w_struct: f64) -> Self {
        Self {
            lsim,
            ssim,
            wsim: w_struct * ssim + (1.0 - w_struct) * lsim,
        }
    }
}

/// Sparse score matrix keyed by (source node, target node).
///
/// Leaf pairs and internal pairs are stored separately; leaf pairs with
/// incompatible categories have no entry at all.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    leaves: HashMap<(NodeId, NodeId), PairSimilarity>,
    internal: HashMap<(NodeId, NodeId), PairSimilarity>,
}

impl SimilarityMatrix {
    /// Scores of a compatible leaf pair.
    pub fn leaf(&self, source: NodeId, target: NodeId) -> Option<&PairSimilarity> {
        self.leaves.get(&(source, target))
    }

    /// Scores of an internal (root or table) pair.
    pub fn internal(&self, source: NodeId, target: NodeId) -> Option<&PairSimilarity> {
        self.internal.get(&(source, target))
    }

    /// Weighted similarity of a leaf pair, 0 for incompatible pairs.
    pub fn leaf_wsim(&self, source: NodeId, target: NodeId) -> f64 {
        self.leaf(source, target).map_or(0.0, |p| p.wsim)
    }

    pub fn leaf_pair_count(&self) -> usize {
        self.leaves.len()
    }

    /// All compatible leaf pairs, in unspecified order.
    pub fn leaf_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId, &PairSimilarity)> {
        self.leaves.iter().map(|((s, t), sim)| (*s, *t, sim))
    }

    /// Multiplies the structural similarity of every compatible leaf pair
    /// under (`sources` × `targets`) by `factor`, capped at 1.
    fn scale_leaf_ssim(
        &mut self,
        sources: &[NodeId],
        targets: &[NodeId],
        factor: f64,
        leaf_w_struct: f64,
    ) {
        for s in sources {
            for t in targets {
                if let Some(pair) = self.leaves.get_mut(&(*s, *t)) {
                    let ssim = (pair.ssim * factor).min(1.0);
                    *pair = PairSimilarity::weighted(pair.lsim, ssim, leaf_w_struct);
                }
            }
        }
    }
}

/// Stage A: linguistic similarity of every compatible leaf pair.
///
/// A leaf's structural similarity starts equal to its linguistic score.
/// Pairs are scored in parallel; the result does not depend on scheduling.
pub fn leaf_similarities(
    source: &SchemaTree,
    target: &SchemaTree,
    categories: &CategorySet,
    params: &CupidParams,
) -> HashMap<(NodeId, NodeId), PairSimilarity> {
    let target_leaves: Vec<(NodeId, Vec<String>, &str)> = target
        .leaves()
        .into_iter()
        .map(|t| {
            let node = target.node(t);
            (t, tokenize(&node.name), node.category.as_deref().unwrap_or_default())
        })
        .collect();
    let source_leaves = source.leaves();

    source_leaves
        .par_iter()
        .flat_map_iter(|s| {
            let node = source.node(*s);
            let tokens = tokenize(&node.name);
            let category = node.category.as_deref().unwrap_or_default();
            target_leaves
                .iter()
                .filter(move |(_, _, t_category)| categories.compatible(category, t_category))
                .map(move |(t, t_tokens, _)| {
                    let lsim = token_list_similarity(&tokens, t_tokens);
                    (
                        (*s, *t),
                        PairSimilarity::weighted(lsim, lsim, params.leaf_w_struct),
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// How the leaves under a node pair are linked across the pair.
///
/// Each leaf is classified by its best weighted similarity to any leaf under
/// the other node: strong at or above `th_high`, weak below `th_low`. Leaves
/// with no compatible counterpart count as weak.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LinkProfile {
    /// Share of leaves with a strong link.
    strong: f64,
    /// Share of leaves whose every link is weak.
    weak: f64,
}

impl LinkProfile {
    /// More than half of the leaves are strongly linked.
    fn mostly_strong(&self) -> bool {
        self.strong > 0.5
    }

    /// More than half of the leaves are weakly linked.
    fn mostly_weak(&self) -> bool {
        self.weak > 0.5
    }
}

fn link_profile(
    matrix: &SimilarityMatrix,
    s_leaves: &[NodeId],
    t_leaves: &[NodeId],
    params: &CupidParams,
) -> LinkProfile {
    let total = s_leaves.len() + t_leaves.len();
    if total == 0 {
        return LinkProfile::default();
    }
    let mut best_t = vec![0.0f64; t_leaves.len()];
    let mut best_s = Vec::with_capacity(s_leaves.len());
    for s in s_leaves {
        let mut best = 0.0f64;
        for (idx, t) in t_leaves.iter().enumerate() {
            let wsim = matrix.leaf_wsim(*s, *t);
            best = best.max(wsim);
            best_t[idx] = best_t[idx].max(wsim);
        }
        best_s.push(best);
    }

    let (mut strong, mut weak) = (0usize, 0usize);
    for best in best_s.iter().chain(&best_t) {
        if *best >= params.th_high {
            strong += 1;
        } else if *best < params.th_low {
            weak += 1;
        }
    }
    LinkProfile {
        strong: strong as f64 / total as f64,
        weak: weak as f64 / total as f64,
    }
}

/// Stages A and B: builds the raw similarity matrix of two trees.
///
/// Internal pairs are visited in post-order on both sides, so a pair is
/// scored only after every pair of its descendants. The structural
/// similarity of an internal pair is the share of its leaves with a strong
/// link. When most of those leaves are strongly linked, the leaf pairs
/// beneath it are multiplied by `c_inc`; when most are weakly linked, by
/// `c_dec`.
pub fn tree_match(
    source: &SchemaTree,
    target: &SchemaTree,
    categories: &CategorySet,
    params: &CupidParams,
) -> SimilarityMatrix {
    let mut matrix = SimilarityMatrix {
        leaves: leaf_similarities(source, target, categories, params),
        internal: HashMap::new(),
    };
    debug!(
        compatible_leaf_pairs = matrix.leaves.len(),
        "leaf linguistic similarity computed"
    );

    let s_internal = source.internal_post_order();
    let t_internal = target.internal_post_order();
    let t_prepared: Vec<(NodeId, Vec<NodeId>, Vec<String>)> = t_internal
        .iter()
        .map(|t| (*t, target.leaves_under(*t), tokenize(&target.node(*t).name)))
        .collect();

    let mut boosted = 0usize;
    let mut penalised = 0usize;
    for s in &s_internal {
        let s_leaves = source.leaves_under(*s);
        let s_tokens = tokenize(&source.node(*s).name);
        for (t, t_leaves, t_tokens) in &t_prepared {
            let links = link_profile(&matrix, &s_leaves, t_leaves, params);
            let lsim = token_list_similarity(&s_tokens, t_tokens);
            let pair = PairSimilarity::weighted(lsim, links.strong, params.w_struct);
            matrix.internal.insert((*s, *t), pair);

            if links.mostly_strong() {
                matrix.scale_leaf_ssim(&s_leaves, t_leaves, params.c_inc, params.leaf_w_struct);
                boosted += 1;
            } else if links.mostly_weak() {
                matrix.scale_leaf_ssim(&s_leaves, t_leaves, params.c_dec, params.leaf_w_struct);
                penalised += 1;
            }
        }
    }
    debug!(
        internal_pairs = matrix.internal.len(),
        boosted, penalised, "structural similarity propagated"
    );
    matrix
}

/// Stage C: recomputes leaf scores against the alignment of their tables.
///
/// Each leaf pair's structural similarity is scaled by
/// `ssim(table_s, table_t) / th_ns` (clamped to `[0, 1]`) and recombined with
/// its linguistic similarity using `w_struct`.
pub fn recompute_wsim(
    source: &SchemaTree,
    target: &SchemaTree,
    matrix: &mut SimilarityMatrix,
    params: &CupidParams,
) {
    let internal = &matrix.internal;
    for ((s, t), pair) in matrix.leaves.iter_mut() {
        let alignment = match (source.parent(*s), target.parent(*t)) {
            (Some(ps), Some(pt)) => internal.get(&(ps, pt)).map_or(0.0, |p| p.ssim),
            _ => 0.0,
        };
        let ssim = (pair.ssim * alignment / params.th_ns).clamp(0.0, 1.0);
        *pair = PairSimilarity::weighted(pair.lsim, ssim, params.w_struct);
    }
}
