/*!
# Markov DAG Sampler

An alternative to `geometry` + `triangulate` + `prune`: builds a DAG directly by local
edit steps (Ide-Cozman-style), preserving acyclicity and a bounded source count at every
step. Component D of the pipeline.

Edge convention note (see DESIGN.md): edges run from lower-degree-of-construction node
toward the node it was built on top of, so that the node created first in the initial
path is the sole root — this keeps the sampler's "zero in-degree == root/source" notion
aligned with the rest of the pipeline (seeds are always zero-in-degree nodes), rather
than tracking the literal last-created node as described informally in the design notes.
*/

use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

use crate::triangulate::{Color, Dag};

/// Parameters bounding the Markov sampler.
#[derive(Debug, Clone, Copy)]
pub struct MarkovParams {
    pub source_low: usize,
    pub source_high: usize,
    pub in_max: usize,
    pub graph_size: usize,
    pub iterations: Option<usize>,
}

struct MarkovState {
    outputs: Vec<HashSet<usize>>,
    inputs: Vec<HashSet<usize>>,
    reachable: Vec<HashSet<usize>>,
    roots: HashSet<usize>,
}

impl MarkovState {
    fn new(n: usize) -> Self {
        MarkovState {
            outputs: vec![HashSet::new(); n],
            inputs: vec![HashSet::new(); n],
            reachable: vec![HashSet::new(); n],
            roots: HashSet::new(),
        }
    }

    fn update_reachable_single(&mut self, node: usize) {
        let mut set: HashSet<usize> = self.outputs[node].clone();
        for &child in &self.outputs[node] {
            set.extend(self.reachable[child].iter().copied());
        }
        self.reachable[node] = set;
    }

    /// Recomputes `node`'s reachable set, then propagates the recomputation upward to
    /// every ancestor (BFS over `inputs`), since their reachable sets depend on it.
    fn update_reachable(&mut self, node: usize) {
        self.update_reachable_single(node);
        let mut frontier: HashSet<usize> = self.inputs[node].iter().copied().collect();
        while !frontier.is_empty() {
            let mut next = HashSet::new();
            for n in frontier {
                self.update_reachable_single(n);
                next.extend(self.inputs[n].iter().copied());
            }
            frontier = next;
        }
    }

    fn add_edge(&mut self, s: usize, d: usize) {
        self.outputs[s].insert(d);
        self.inputs[d].insert(s);
        if self.inputs[d].len() == 1 {
            self.roots.remove(&d);
        }
        self.update_reachable(s);
    }

    fn remove_edge(&mut self, s: usize, d: usize) {
        self.outputs[s].remove(&d);
        self.inputs[d].remove(&s);
        if self.inputs[d].is_empty() {
            self.roots.insert(d);
        }
        self.update_reachable(s);
    }

    fn is_connected_without(&self, excl_s: usize, excl_d: usize) -> bool {
        let n = self.outputs.len();
        if n == 0 {
            return true;
        }
        let mut visited = vec![false; n];
        let mut stack = vec![0usize];
        visited[0] = true;
        while let Some(u) = stack.pop() {
            for &v in &self.outputs[u] {
                if u == excl_s && v == excl_d {
                    continue;
                }
                if !visited[v] {
                    visited[v] = true;
                    stack.push(v);
                }
            }
            for &v in &self.inputs[u] {
                if v == excl_s && u == excl_d {
                    continue;
                }
                if !visited[v] {
                    visited[v] = true;
                    stack.push(v);
                }
            }
        }
        visited.into_iter().all(|v| v)
    }
}

/// Builds the initial path graph plus however many extra nodes are needed to bring the
/// root count up to `source_low`.
fn initialize(params: &MarkovParams, rng: &mut impl Rng) -> MarkovState {
    let path_len = params.graph_size.saturating_sub(params.source_low) + 1;
    let mut state = MarkovState::new(path_len.max(1));

    for i in 1..path_len {
        state.outputs[i].insert(i - 1);
        state.inputs[i - 1].insert(i);
    }
    for i in 0..path_len {
        state.update_reachable_single(i);
    }
    // Recompute in index order again so every ancestor sees its descendants' closures.
    for i in (0..path_len).rev() {
        state.update_reachable_single(i);
    }
    state.roots.insert(path_len - 1);

    while state.roots.len() < params.source_low {
        let new_node = state.outputs.len();
        state.outputs.push(HashSet::new());
        state.inputs.push(HashSet::new());
        state.reachable.push(HashSet::new());

        let non_roots: Vec<usize> =
            (0..new_node).filter(|n| !state.roots.contains(n)).collect();
        let target = if non_roots.is_empty() {
            // No non-root exists yet (a single-node path); fall back to any node.
            (0..new_node).choose(rng).unwrap_or(0)
        } else {
            *non_roots.iter().choose(rng).expect("non-empty")
        };

        state.roots.insert(new_node);
        state.add_edge(new_node, target);
    }

    state
}

fn try_remove(state: &mut MarkovState, params: &MarkovParams, s: usize, d: usize) {
    if !state.outputs[s].contains(&d) {
        return;
    }
    let allowed = state.inputs[d].len() > 1 || state.roots.len() < params.source_high;
    if !allowed {
        return;
    }
    if !state.is_connected_without(s, d) {
        return;
    }
    state.remove_edge(s, d);
}

fn try_add(state: &mut MarkovState, params: &MarkovParams, s: usize, d: usize, rng: &mut impl Rng) {
    if s == d || state.outputs[s].contains(&d) {
        return;
    }
    let d_is_root = state.inputs[d].is_empty();
    let allowed = !d_is_root || state.roots.len() > params.source_low;
    if !allowed {
        return;
    }
    if state.inputs[d].len() >= params.in_max {
        return;
    }
    if state.reachable[d].contains(&s) {
        return;
    }
    let _ = rng; // reserved for future tie-breaking; kept for symmetry with try_remove's signature
    state.add_edge(s, d);
}

/// Runs the sampler and returns a DAG in the same shared representation the spatial
/// pipeline produces, so both feed the model assembler identically.
pub fn sample(params: MarkovParams, rng: &mut impl Rng, prefix: &str) -> Dag {
    let mut state = initialize(&params, rng);
    let n = state.outputs.len();
    let iterations = params.iterations.unwrap_or(params.graph_size * params.graph_size);

    for _ in 0..iterations {
        if n < 2 {
            break;
        }
        let (s, d) = {
            let s = rng.random_range(0..n);
            let mut d = rng.random_range(0..n);
            while d == s {
                d = rng.random_range(0..n);
            }
            (s, d)
        };
        try_remove(&mut state, &params, s, d);

        let (s2, d2) = {
            let s = rng.random_range(0..n);
            let mut d = rng.random_range(0..n);
            while d == s {
                d = rng.random_range(0..n);
            }
            (s, d)
        };
        try_add(&mut state, &params, s2, d2, rng);
    }

    let mut graph = petgraph::graphmap::DiGraphMap::new();
    for i in 0..n {
        graph.add_node(i);
    }
    for s in 0..n {
        for &d in &state.outputs[s] {
            graph.add_edge(s, d, 1.0);
        }
    }
    let is_root = |i: usize| state.inputs[i].is_empty();
    let colors = (0..n).map(|i| if is_root(i) { Color::Red } else { Color::Black }).collect();
    let labels = crate::triangulate::assign_labels(n, is_root, prefix);

    Dag { graph, colors, labels, n_seeds: state.roots.len() }
}
