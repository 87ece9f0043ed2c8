/*!
# Edge Pruner

Reduces a dense weighted DAG down to a sparse one, never deleting the minimum-weight
in-edge of any non-seed node (so pruning cannot create new sources). Component C of the
pipeline — pluggable via the `Pruner` trait and the `PrunerKind` selector.
*/

use rand::Rng;
use std::str::FromStr;

use crate::error::GendagError;
use crate::triangulate::Dag;

/// Which pruning strategy to run, selectable by name (case-insensitive) from the CLI or
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunerKind {
    Null,
    UniformThroughFour,
    GlobalCutoff,
    MinimalistFraction,
    BigDelta,
}

impl FromStr for PrunerKind {
    type Err = GendagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(PrunerKind::Null),
            "uniformthroughfour" => Ok(PrunerKind::UniformThroughFour),
            "globalcutoff" => Ok(PrunerKind::GlobalCutoff),
            "minimalistfraction" => Ok(PrunerKind::MinimalistFraction),
            "bigdelta" => Ok(PrunerKind::BigDelta),
            other => Err(GendagError::UnknownPruner(other.to_string())),
        }
    }
}

impl PrunerKind {
    pub fn name(self) -> &'static str {
        match self {
            PrunerKind::Null => "null",
            PrunerKind::UniformThroughFour => "uniformThroughFour",
            PrunerKind::GlobalCutoff => "globalCutoff",
            PrunerKind::MinimalistFraction => "minimalistFraction",
            PrunerKind::BigDelta => "bigDelta",
        }
    }
}

/// Prunes `dag` in place according to `kind`. Never removes a non-seed node's
/// minimum-weight in-edge.
pub fn prune(dag: &mut Dag, kind: PrunerKind, rng: &mut impl Rng) {
    tracing::debug!(pruner = kind.name(), "pruning DAG");
    match kind {
        PrunerKind::Null => {}
        PrunerKind::UniformThroughFour => prune_uniform_through_four(dag, rng),
        PrunerKind::GlobalCutoff => prune_global_cutoff(dag),
        PrunerKind::MinimalistFraction => prune_minimalist_fraction(dag),
        PrunerKind::BigDelta => prune_big_delta(dag),
    }
}

fn sorted_in_edges(dag: &Dag, node: usize) -> Vec<(usize, f64)> {
    let mut edges = dag.in_edges(node);
    edges.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    edges
}

fn prune_uniform_through_four(dag: &mut Dag, rng: &mut impl Rng) {
    let n = dag.node_count();
    for node in 0..n {
        let edges = sorted_in_edges(dag, node);
        if edges.is_empty() {
            continue;
        }
        let keep: usize = rng.random_range(1..=4);
        for &(src, _) in edges.iter().skip(keep) {
            dag.graph.remove_edge(src, node);
        }
    }
}

fn prune_global_cutoff(dag: &mut Dag) {
    let n = dag.node_count();
    let mut threshold = 0.0_f64;
    for node in 0..n {
        let edges = dag.in_edges(node);
        if let Some(min_w) = edges.iter().map(|&(_, w)| w).fold(None, |acc: Option<f64>, w| {
            Some(acc.map_or(w, |m| m.min(w)))
        }) {
            threshold = threshold.max(min_w);
        }
    }
    let to_drop: Vec<(usize, usize)> = dag
        .graph
        .all_edges()
        .filter(|&(_, _, &w)| w > threshold)
        .map(|(s, d, _)| (s, d))
        .collect();
    for (s, d) in to_drop {
        dag.graph.remove_edge(s, d);
    }
}

fn prune_minimalist_fraction(dag: &mut Dag) {
    const FRAC: f64 = 0.65;
    let mut all_weights: Vec<f64> = dag.graph.all_edges().map(|(_, _, &w)| w).collect();
    if all_weights.is_empty() {
        return;
    }
    all_weights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let cutoff = all_weights[((all_weights.len() as f64) * FRAC) as usize];

    let n = dag.node_count();
    for node in 0..n {
        let edges = sorted_in_edges(dag, node);
        for &(src, w) in edges.iter().skip(1) {
            if w > cutoff {
                dag.graph.remove_edge(src, node);
            }
        }
    }
}

fn prune_big_delta(dag: &mut Dag) {
    let n = dag.node_count();
    for node in 0..n {
        let edges = sorted_in_edges(dag, node);
        if edges.len() < 2 {
            continue;
        }
        let mut delta_max = 0.0_f64;
        let mut delta_max_index = 1_usize;
        for i in 1..edges.len() {
            let delta = edges[i].1 - edges[i - 1].1;
            if delta >= delta_max {
                delta_max = delta;
                delta_max_index = i;
            }
        }
        for &(src, _) in &edges[delta_max_index..] {
            dag.graph.remove_edge(src, node);
        }
    }
}
