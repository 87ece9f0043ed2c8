/*!
# DOT Serializer

Renders a `Model` as a Graphviz `digraph{…}` document, and welds several such
documents produced in one run into a single one. Component H (graph half).
*/

use crate::model::Model;

/// Expands `idx`'s display name: for a zero-arity node, its own `generate_name`; for a
/// node with parents, its behavior's `generate_name` applied to each parent's expansion
/// one level down `gv_recursion`'s budget.
pub(crate) fn display_name(model: &Model, idx: usize, gv_recursion: usize) -> String {
    let node = &model.nodes[idx];
    if node.parents.is_empty() {
        return node.behavior.generate_name(&[]);
    }
    let names: Vec<String> = node
        .parents
        .iter()
        .map(|&p| expand_parent(model, p, gv_recursion.saturating_sub(1)))
        .collect();
    node.behavior.generate_name(&names)
}

/// Expands a node reached as someone else's parent. Zero-arity nodes are always
/// represented by their bare id here, never their own `generate_name` — only the root
/// of a name expansion gets that treatment.
fn expand_parent(model: &Model, idx: usize, depth_left: usize) -> String {
    let node = &model.nodes[idx];
    if depth_left == 0 || node.parents.is_empty() {
        return node.id.clone();
    }
    let names: Vec<String> =
        node.parents.iter().map(|&p| expand_parent(model, p, depth_left - 1)).collect();
    node.behavior.generate_name(&names)
}

/// Renders one model as a complete `digraph{…}` document.
pub fn render(model: &Model, gv_recursion: usize) -> String {
    let mut out = String::from("digraph{");
    for (idx, node) in model.nodes.iter().enumerate() {
        let name = display_name(model, idx, gv_recursion);
        out.push_str(&format!("\"{}\" [label = \"{}:{}\"];", node.id, node.id, name));
    }
    for node in &model.nodes {
        for &parent in &node.parents {
            out.push_str(&format!("\"{}\" -> \"{}\";", model.nodes[parent].id, node.id));
        }
    }
    out.push('}');
    out
}

/// Welds several single-graph DOT documents into one. An empty slice welds to the empty
/// string; a single document is returned unchanged.
pub fn weld(docs: &[String]) -> String {
    match docs.len() {
        0 => String::new(),
        1 => docs[0].clone(),
        n => {
            let mut result = String::new();
            result.push_str(docs[0].strip_suffix('}').unwrap_or(&docs[0]));
            for doc in &docs[1..n - 1] {
                let middle = doc.strip_prefix("digraph{").unwrap_or(doc);
                let middle = middle.strip_suffix('}').unwrap_or(middle);
                result.push_str(middle);
            }
            result.push_str(docs[n - 1].strip_prefix("digraph{").unwrap_or(&docs[n - 1]));
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weld_empty() {
        assert_eq!(weld(&[]), "");
    }

    #[test]
    fn test_weld_single_is_unchanged() {
        let doc = "digraph{\"A\" [label=\"A:x\"];}".to_string();
        assert_eq!(weld(&[doc.clone()]), doc);
    }

    #[test]
    fn test_weld_three_graphs() {
        let a = "digraph{a;}".to_string();
        let b = "digraph{b;}".to_string();
        let c = "digraph{c;}".to_string();
        assert_eq!(weld(&[a, b, c]), "digraph{a;b;c;}");
    }

    #[test]
    fn test_render_contains_edge_and_label() {
        use crate::behaviors;
        use crate::geometry::Point;
        use crate::model::assemble;
        use crate::triangulate::build_dag;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let points = vec![
            Point { x: 1.0, y: 0.0 },
            Point { x: 0.0, y: 1.0 },
            Point { x: -1.0, y: 0.0 },
            Point { x: 0.0, y: -1.0 },
            Point { x: 2.0, y: 2.0 },
        ];
        let dag = build_dag(&points, 4, "");
        let mut rng = StdRng::seed_from_u64(3);
        let model = assemble(&dag, &behaviors::catalogue(), 0, &mut rng).unwrap();
        let doc = render(&model, 1);
        assert!(doc.starts_with("digraph{"));
        assert!(doc.ends_with('}'));
        assert!(doc.contains("->"));
    }
}
