//! CLI entry point: parses arguments, runs the generation pipeline for every requested
//! graph, welds the DOT output, and writes the three output files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::RngCore;
use rand::TryRngCore;
use rand::rngs::{OsRng, StdRng};
use rand::SeedableRng;

use gendag::behaviors::{self, BehaviorSpec};
use gendag::config::{Cli, RunConfig, resolve};
use gendag::error::GendagError;
use gendag::geometry::{self, GeometryParams};
use gendag::model;
use gendag::output::{dot, tsv};
use gendag::prune;
use gendag::triangulate::{self, Dag};

/// Extra `identity` instances added to the noise pool; no CLI flag exposes this (see
/// DESIGN.md), so it is kept as an internal constant alongside the other geometry
/// defaults documented in the supplemental CLI surface.
const BONUS_IDENTITY: usize = 3;

fn build_graph(config: &RunConfig, index: u64, rng: &mut StdRng) -> Result<Dag, GendagError> {
    let prefix = if config.graphs > 1 { triangulate::graph_prefix(index) } else { String::new() };
    let spread = 1.25 / (config.seeds as f64);
    let params = GeometryParams {
        n_points: config.graph_size,
        n_seeds: config.seeds,
        r0: 1.0,
        delta: 0.5,
        spread,
        lumpage: 2,
    };
    let points = geometry::spiral_point_distribution(params, rng)?;
    let mut dag = triangulate::build_dag(&points, config.seeds, &prefix);
    prune::prune(&mut dag, config.pruner, rng);
    Ok(dag)
}

fn join_row(existing: &str, addition: &str) -> String {
    if existing.is_empty() { addition.to_string() } else { format!("{}\t{}", existing, addition) }
}

fn run(config: &RunConfig, rng: &mut StdRng) -> Result<(), GendagError> {
    let catalogue: Vec<BehaviorSpec> = behaviors::catalogue();
    let mut dot_docs = Vec::with_capacity(config.graphs);
    let mut models = Vec::with_capacity(config.graphs);

    for g in 0..config.graphs {
        let dag = build_graph(config, g as u64, rng)?;
        let model = model::assemble(&dag, &catalogue, BONUS_IDENTITY, rng)?;
        dot_docs.push(dot::render(&model, config.graphviz_recursion));
        models.push(model);
    }

    let weld_doc = dot::weld(&dot_docs);

    let selected = tsv::select_columns(config.graph_size, config.pick_rate, rng);

    let mut clean_header = String::new();
    let mut noisy_header = String::new();
    let mut clean_rows = vec![String::new(); config.samples];
    let mut noisy_rows = vec![String::new(); config.samples];

    for model in &models {
        let (ch, nh) = tsv::headers(model, &selected, config.tsv_recursion);
        clean_header = join_row(&clean_header, &ch);
        noisy_header = join_row(&noisy_header, &nh);

        let (clean_body, noisy_body) = tsv::rows(model, &selected, config.samples);
        for (i, line) in clean_body.lines().enumerate() {
            clean_rows[i] = join_row(&clean_rows[i], line);
        }
        for (i, line) in noisy_body.lines().enumerate() {
            noisy_rows[i] = join_row(&noisy_rows[i], line);
        }
    }

    let mut clean_doc = format!("{}\n", clean_header);
    for row in &clean_rows {
        clean_doc.push_str(row);
        clean_doc.push('\n');
    }
    let mut noisy_doc = format!("{}\n", noisy_header);
    for row in &noisy_rows {
        noisy_doc.push_str(row);
        noisy_doc.push('\n');
    }

    write_output(&config.output, "gv", &weld_doc)?;
    write_output(&config.output, "txt", &clean_doc)?;
    write_output(&config.output, "noisy.txt", &noisy_doc)?;

    Ok(())
}

/// Writes `content` to `<stem>.<suffix>`, appending rather than replacing any extension
/// already present in `stem` (the documented default stem has none).
fn write_output(stem: &std::path::Path, suffix: &str, content: &str) -> Result<(), GendagError> {
    let mut path: PathBuf = stem.into();
    let file_name = format!(
        "{}.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("generatedData"),
        suffix
    );
    path.set_file_name(file_name);
    std::fs::write(&path, content).map_err(|e| GendagError::io(path, e))
}

fn exit_code(err: &GendagError) -> u8 {
    match err {
        GendagError::Config(_) => 2,
        GendagError::Geometry(_) => 3,
        GendagError::Assembly { .. } => 4,
        GendagError::UnknownPruner(_) => 5,
        GendagError::Io { .. } => 6,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(exit_code(&e));
        }
    };

    let seed = config.seed.unwrap_or_else(|| OsRng.unwrap_err().next_u64());
    if config.seed.is_none() {
        tracing::info!(seed, "no --seed given; drew one from the OS RNG");
    }
    let mut rng = StdRng::seed_from_u64(seed);

    if let Err(e) = run(&config, &mut rng) {
        eprintln!("{}", e);
        return ExitCode::from(exit_code(&e));
    }

    ExitCode::SUCCESS
}
