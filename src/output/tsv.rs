/*!
# Tabular Output

Selects the output columns for a run and renders the clean and noisy TSV files that
share them. Component H (table half).
*/

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Model;
use crate::output::dot::display_name;

/// Picks each node independently with probability `pick_rate`, then shuffles the
/// selection. The same returned order is used for both the clean and noisy files.
pub fn select_columns(n_nodes: usize, pick_rate: f64, rng: &mut impl Rng) -> Vec<usize> {
    let mut selected: Vec<usize> = (0..n_nodes).filter(|_| rng.random_bool(pick_rate)).collect();
    selected.shuffle(rng);
    selected
}

/// Builds the clean and noisy header rows for `selected`, tab-joined.
pub fn headers(model: &Model, selected: &[usize], tsv_recursion: usize) -> (String, String) {
    let clean: Vec<String> = selected
        .iter()
        .map(|&idx| {
            let node = &model.nodes[idx];
            format!("{}:{}", node.id, display_name(model, idx, tsv_recursion))
        })
        .collect();
    let noisy: Vec<String> = selected
        .iter()
        .map(|&idx| {
            let node = &model.nodes[idx];
            let expanded = display_name(model, idx, tsv_recursion);
            let noise_desc = node.noise.generate_name(&[node.id.clone()]);
            format!("{}:{} (as {})", node.id, expanded, noise_desc)
        })
        .collect();
    (clean.join("\t"), noisy.join("\t"))
}

/// Renders `samples` data rows for `selected`, clearing the model's per-row caches
/// between rows. Returns `(clean_body, noisy_body)`, each newline-terminated.
pub fn rows(model: &Model, selected: &[usize], samples: usize) -> (String, String) {
    let mut clean = String::new();
    let mut noisy = String::new();
    for row in 0..samples as u64 {
        let clean_row: Vec<String> =
            selected.iter().map(|&idx| model.calculate(idx, row).to_string()).collect();
        let noisy_row: Vec<String> =
            selected.iter().map(|&idx| model.column_value(idx, row).to_string()).collect();
        clean.push_str(&clean_row.join("\t"));
        clean.push('\n');
        noisy.push_str(&noisy_row.join("\t"));
        noisy.push('\n');
        model.clear_caches();
    }
    (clean, noisy)
}

/// Assembles the complete clean and noisy TSV documents (header plus body) for one
/// model, given already-selected columns.
pub fn render(
    model: &Model,
    selected: &[usize],
    tsv_recursion: usize,
    samples: usize,
) -> (String, String) {
    let (clean_header, noisy_header) = headers(model, selected, tsv_recursion);
    let (clean_body, noisy_body) = rows(model, selected, samples);
    (format!("{}\n{}", clean_header, clean_body), format!("{}\n{}", noisy_header, noisy_body))
}
