/*!
# Model Assembler

Binds a fresh, randomly chosen behavior (plus a fresh noise behavior) to every node of a
labeled DAG, producing an arena of `ModelNode`s ready for row-by-row evaluation.
Component F of the pipeline.
*/

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::behaviors::{Behavior, BehaviorSpec};
use crate::error::GendagError;
use crate::triangulate::Dag;

/// Token identifying a row within a single run; the row index works fine.
pub type RowKey = u64;

/// One bound node in the model: its identifier, its parents (by index into `Model::nodes`,
/// in the order arguments are passed to `behavior.calculate`), its behavior, its noise
/// behavior, and a per-row memoization cache.
pub struct ModelNode {
    pub(crate) id: String,
    pub(crate) parents: Vec<usize>,
    pub(crate) behavior: Box<dyn Behavior>,
    pub(crate) noise: Box<dyn Behavior>,
    pub(crate) cache: RefCell<HashMap<RowKey, f64>>,
}

/// An assembled model: every node reachable by index, plus the subset with no parents.
pub struct Model {
    pub nodes: Vec<ModelNode>,
    pub roots: Vec<usize>,
}

fn non_noise_pool(catalogue: &[BehaviorSpec], arity: usize) -> Vec<&BehaviorSpec> {
    catalogue.iter().filter(|s| !s.is_noise && s.arity.contains(arity)).collect()
}

/// Assembles a `Model` over `dag`, drawing behaviors from `catalogue`. `bonus_identity`
/// extra copies of the `identity` behavior (if present in `catalogue`) are added to the
/// noise pool, biasing column generation toward noise-free output without removing the
/// possibility of noise entirely.
pub fn assemble(
    dag: &Dag,
    catalogue: &[BehaviorSpec],
    bonus_identity: usize,
    rng: &mut StdRng,
) -> Result<Model, GendagError> {
    let mut noise_pool: Vec<&BehaviorSpec> = catalogue.iter().filter(|s| s.is_noise).collect();
    if let Some(identity_spec) = catalogue.iter().find(|s| s.name == "identity") {
        for _ in 0..bonus_identity {
            noise_pool.push(identity_spec);
        }
    }

    let order = petgraph::algo::toposort(&dag.graph, None)
        .expect("pipeline stages never hand the assembler a cyclic DAG");

    let n = dag.node_count();
    let mut slots: Vec<Option<ModelNode>> = (0..n).map(|_| None).collect();

    for idx in order {
        let mut parents: Vec<usize> = dag.in_edges(idx).into_iter().map(|(src, _)| src).collect();
        parents.sort_unstable();
        let arity = parents.len();

        let pool = non_noise_pool(catalogue, arity);
        let spec = pool
            .choose(rng)
            .ok_or_else(|| GendagError::assembly(dag.labels[idx].clone(), arity))?;
        let behavior = (spec.make)(rng);

        let noise_spec = noise_pool
            .choose(rng)
            .ok_or_else(|| GendagError::assembly(format!("{} (noise)", dag.labels[idx]), arity))?;
        let noise = (noise_spec.make)(rng);

        slots[idx] = Some(ModelNode {
            id: dag.labels[idx].clone(),
            parents,
            behavior,
            noise,
            cache: RefCell::new(HashMap::new()),
        });
    }

    let nodes: Vec<ModelNode> =
        slots.into_iter().map(|s| s.expect("topological order visits every node")).collect();
    let roots = (0..n).filter(|&i| dag.in_degree(i) == 0).collect();

    Ok(Model { nodes, roots })
}
