/*!
# Triangulation & Weighted-DAG Builder

Converts the point cloud produced by `geometry` into a weighted directed acyclic graph:
a Delaunay triangulation supplies candidate edges, which are then oriented from
lower-indexed to higher-indexed point and filtered so seed nodes stay sources.
Component B of the pipeline.
*/

use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

use crate::geometry::Point;

/// Node color, carried only for DOT rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A weighted DAG over point indices, plus the human-readable identifier and color
/// assigned to each index by the bijective-base-26/`@n` identifier scheme below.
#[derive(Debug, Clone)]
pub struct Dag {
    /// Edges run from lower-indexed (earlier) node to higher-indexed node; weight is the
    /// Euclidean distance between endpoints (or, for Markov-sampled DAGs, an arbitrary
    /// positive placeholder — see `markov`).
    pub graph: DiGraphMap<usize, f64>,
    pub colors: Vec<Color>,
    pub labels: Vec<String>,
    pub n_seeds: usize,
}

impl Dag {
    pub fn node_count(&self) -> usize {
        self.colors.len()
    }

    pub fn in_edges(&self, node: usize) -> Vec<(usize, f64)> {
        self.graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|src| (src, *self.graph.edge_weight(src, node).expect("edge must exist")))
            .collect()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.graph.neighbors_directed(node, petgraph::Direction::Incoming).count()
    }
}

/// Assigns each node's display identifier: zero-in-degree nodes get sequential uppercase
/// letters (bijective base-26: A..Z, AA, AB, ...); the rest get `@n` with a monotonically
/// increasing counter. `prefix` (empty, or a single char for welded multi-graph runs) is
/// prepended to every identifier.
pub fn assign_labels(n_nodes: usize, is_seed: impl Fn(usize) -> bool, prefix: &str) -> Vec<String> {
    let mut letter_index: u64 = 0;
    let mut next_number: u64 = 1;
    (0..n_nodes)
        .map(|i| {
            if is_seed(i) {
                let id = bijective_base26(letter_index);
                letter_index += 1;
                format!("{}{}", prefix, id)
            } else {
                let id = format!("@{}", next_number);
                next_number += 1;
                format!("{}{}", prefix, id)
            }
        })
        .collect()
}

/// Single-character (or longer, past 26 graphs) prefix for the `index`-th graph in a
/// multi-graph run, used to keep identifiers distinct once welded: `a`, `b`, ..., `z`,
/// `aa`, `ab`, ...
pub fn graph_prefix(index: u64) -> String {
    bijective_base26(index).to_lowercase()
}

/// Bijective base-26 numeral: 0 -> A, 1 -> B, ..., 25 -> Z, 26 -> AA, 27 -> AB, ...
fn bijective_base26(mut n: u64) -> String {
    let mut chars = Vec::new();
    loop {
        let rem = n % 26;
        chars.push((b'A' + rem as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    chars.into_iter().rev().collect()
}

fn euclidean(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Builds the weighted DAG over `points`, with the first `n_seeds` marked red/seed and
/// identifiers assigned per `assign_labels`, prefixed by `prefix`.
pub fn build_dag(points: &[Point], n_seeds: usize, prefix: &str) -> Dag {
    let mut graph: DiGraphMap<usize, f64> = DiGraphMap::new();
    for i in 0..points.len() {
        graph.add_node(i);
    }

    if points.len() >= 3 {
        let dpoints: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        let triangulation = delaunator::triangulate(&dpoints);

        let mut seen: HashMap<(usize, usize), f64> = HashMap::new();
        for tri in triangulation.triangles.chunks_exact(3) {
            for &(i, j) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[0], tri[2])] {
                if i == j {
                    continue;
                }
                let (src, dst) = if i < j { (i, j) } else { (j, i) };
                if dst < n_seeds {
                    continue;
                }
                seen.entry((src, dst)).or_insert_with(|| euclidean(points[src], points[dst]));
            }
        }
        for ((src, dst), weight) in seen {
            graph.add_edge(src, dst, weight);
        }
    }

    let colors: Vec<Color> =
        (0..points.len()).map(|i| if i < n_seeds { Color::Red } else { Color::Black }).collect();
    let labels = assign_labels(points.len(), |i| i < n_seeds, prefix);

    Dag { graph, colors, labels, n_seeds }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijective_base26() {
        assert_eq!(bijective_base26(0), "A");
        assert_eq!(bijective_base26(25), "Z");
        assert_eq!(bijective_base26(26), "AA");
        assert_eq!(bijective_base26(27), "AB");
        assert_eq!(bijective_base26(51), "AZ");
        assert_eq!(bijective_base26(52), "BA");
    }

    #[test]
    fn test_seeds_have_letters_non_seeds_at_signs() {
        let labels = assign_labels(6, |i| i < 2, "");
        assert_eq!(labels[0], "A");
        assert_eq!(labels[1], "B");
        assert_eq!(labels[2], "@1");
        assert_eq!(labels[3], "@2");
    }

    #[test]
    fn test_prefix_is_prepended() {
        let labels = assign_labels(2, |i| i < 1, "a");
        assert_eq!(labels[0], "aA");
        assert_eq!(labels[1], "a@1");
    }

    #[test]
    fn test_degenerate_no_edges_when_points_equal_seeds() {
        let points = vec![
            Point { x: 1.0, y: 0.0 },
            Point { x: 0.0, y: 1.0 },
            Point { x: -1.0, y: 0.0 },
        ];
        let dag = build_dag(&points, 3, "");
        assert_eq!(dag.graph.edge_count(), 0);
        assert_eq!(dag.node_count(), 3);
    }

    #[test]
    fn test_graph_prefix_is_lowercase() {
        assert_eq!(graph_prefix(0), "a");
        assert_eq!(graph_prefix(25), "z");
        assert_eq!(graph_prefix(26), "aa");
    }

    #[test]
    fn test_seeds_have_no_incoming_edges() {
        let points = vec![
            Point { x: 1.0, y: 0.0 },
            Point { x: 0.0, y: 1.0 },
            Point { x: -1.0, y: 0.0 },
            Point { x: -0.0, y: -1.0 },
            Point { x: 2.0, y: 2.0 },
        ];
        let dag = build_dag(&points, 4, "");
        for seed in 0..4 {
            assert_eq!(dag.in_degree(seed), 0);
        }
    }
}
