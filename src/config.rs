/*!
# CLI & Config File

Parses the command line with `clap`'s derive API, optionally merges in an INI config
file (CLI flags win on conflict), and resolves the result into a `RunConfig` the
pipeline consumes directly.
*/

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::error::GendagError;
use crate::prune::PrunerKind;

/// Command-line flags. All optional; defaults mirror the documented CLI surface.
#[derive(Debug, Parser, Clone)]
#[command(name = "gendag", about = "Generates synthetic tabular datasets from a random DAG of operations.")]
pub struct Cli {
    /// Load settings from a config file; CLI flags override its values.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Number of independent graphs per run.
    #[arg(short = 'g', long = "graphs")]
    pub graphs: Option<usize>,

    /// Nodes per graph, including seeds.
    #[arg(short = 'n', long = "graphSize")]
    pub graph_size: Option<usize>,

    /// Seeds per graph.
    #[arg(short = 's', long = "seeds")]
    pub seeds: Option<usize>,

    /// Name-expansion depth in DOT output.
    #[arg(short = 'r', long = "graphvizRecursion")]
    pub graphviz_recursion: Option<usize>,

    /// Name-expansion depth in TSV headers.
    #[arg(short = 't', long = "tsvRecursion")]
    pub tsv_recursion: Option<usize>,

    /// Per-node inclusion probability in TSV output.
    #[arg(short = 'p', long = "pickRate")]
    pub pick_rate: Option<f64>,

    /// Accepted for interface compatibility; the catalogue is a fixed in-process
    /// registry, so this is parsed and validated but otherwise unused.
    #[arg(short = 'b', long = "behaviors")]
    pub behaviors: Vec<PathBuf>,

    /// Edge pruning strategy.
    #[arg(short = 'x', long = "pruner")]
    pub pruner: Option<String>,

    /// TSV row count.
    #[arg(short = 'm', long = "samples")]
    pub samples: Option<usize>,

    /// Output path stem; `.gv`, `.txt`, `.noisy.txt` are appended.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Explicit RNG seed. Omitted: a seed is drawn from the OS CSPRNG and logged.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

/// Fully resolved settings the pipeline runs with, after merging CLI flags, an
/// optional config file, and the documented defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub graphs: usize,
    pub graph_size: usize,
    pub seeds: usize,
    pub graphviz_recursion: usize,
    pub tsv_recursion: usize,
    pub pick_rate: f64,
    pub pruner: PrunerKind,
    pub samples: usize,
    pub output: PathBuf,
    pub seed: Option<u64>,
}

/// Raw values parsed out of an INI config file, before CLI overrides are applied.
#[derive(Debug, Default, Clone)]
struct FileConfig {
    output: Option<PathBuf>,
    pick_rate: Option<f64>,
    tsv_recursion: Option<usize>,
    graphviz_recursion: Option<usize>,
    samples: Option<usize>,
    pruner: Option<String>,
    graphs: Option<usize>,
    graph_size: Option<usize>,
    seeds: Option<usize>,
}

fn parse_field<T: FromStr>(
    section: &ini::Properties,
    key: &str,
) -> Result<Option<T>, GendagError> {
    match section.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| GendagError::config(format!("could not parse \"{}\" = \"{}\"", key, raw))),
    }
}

fn load_file_config(path: &std::path::Path) -> Result<FileConfig, GendagError> {
    let ini = ini::Ini::load_from_file(path)
        .map_err(|e| GendagError::config(format!("could not read config file {}: {}", path.display(), e)))?;

    let mut cfg = FileConfig::default();
    if let Some(section) = ini.section(Some("Output")) {
        cfg.output = section.get("File").map(PathBuf::from);
        cfg.pick_rate = parse_field(section, "PickRate")?;
        cfg.tsv_recursion = parse_field(section, "TsvRecursion")?;
        cfg.graphviz_recursion = parse_field(section, "GraphvizRecursion")?;
        cfg.samples = parse_field(section, "Samples")?;
    }
    if let Some(section) = ini.section(Some("Model")) {
        cfg.pruner = section.get("Pruner").map(str::to_string);
        // `Behaviors` is accepted for interface compatibility only; see `Cli::behaviors`.
    }
    if let Some(section) = ini.section(Some("Generation")) {
        cfg.graphs = parse_field(section, "Graphs")?;
        cfg.graph_size = parse_field(section, "GraphSize")?;
        cfg.seeds = parse_field(section, "Seeds")?;
    }
    Ok(cfg)
}

/// Merges `cli` over an optional config file and the documented defaults into a
/// `RunConfig`, validating every field along the way.
pub fn resolve(cli: &Cli) -> Result<RunConfig, GendagError> {
    let file_cfg = match &cli.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };

    let graphs = cli.graphs.or(file_cfg.graphs).unwrap_or(1);
    let graph_size = cli.graph_size.or(file_cfg.graph_size).unwrap_or(50);
    let seeds = cli.seeds.or(file_cfg.seeds).unwrap_or(4);
    let graphviz_recursion = cli.graphviz_recursion.or(file_cfg.graphviz_recursion).unwrap_or(1);
    let tsv_recursion = cli.tsv_recursion.or(file_cfg.tsv_recursion).unwrap_or(3);
    let pick_rate = cli.pick_rate.or(file_cfg.pick_rate).unwrap_or(1.0);
    let samples = cli.samples.or(file_cfg.samples).unwrap_or(500);
    let output = cli
        .output
        .clone()
        .or(file_cfg.output)
        .unwrap_or_else(|| PathBuf::from("./generatedData"));
    let pruner_name = cli.pruner.clone().or(file_cfg.pruner).unwrap_or_else(|| "bigDelta".to_string());
    let pruner = PrunerKind::from_str(&pruner_name)?;

    if graph_size < seeds {
        return Err(GendagError::config(format!(
            "graphSize ({}) cannot be less than seeds ({})",
            graph_size, seeds
        )));
    }
    if seeds == 0 {
        return Err(GendagError::config("seeds must be at least 1"));
    }
    if graphs == 0 {
        return Err(GendagError::config("graphs must be at least 1"));
    }
    if !(0.0..=1.0).contains(&pick_rate) {
        return Err(GendagError::config(format!("pickRate ({}) must be within [0,1]", pick_rate)));
    }

    Ok(RunConfig {
        graphs,
        graph_size,
        seeds,
        graphviz_recursion,
        tsv_recursion,
        pick_rate,
        pruner,
        samples,
        output,
        seed: cli.seed,
    })
}
