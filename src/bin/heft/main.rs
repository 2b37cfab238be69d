//! Heft CLI - skin weight cleanup command-line tool.
//!
//! Usage: heft <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `heft --help` for available commands. Set `RUST_LOG=debug` for
//! per-pass diagnostics.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use heft::algo::limit::influence_count;
use heft::algo::normalize::{is_normalized, NORMALIZED_TOLERANCE};
use heft::io::{self, Skin};
use heft::mesh::{TargetSet, VertexId};
use heft::pipeline::{self, Outcome, SkinConfig};
use heft::weights::WeightStore;

#[derive(Parser)]
#[command(name = "heft")]
#[command(author, version, about = "Skin weight cleanup CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display skin information
    Info {
        /// Input skin file
        input: PathBuf,
    },

    /// Average weights with first-ring neighbors
    Smooth {
        /// Input skin file
        input: PathBuf,

        /// Output skin file
        output: PathBuf,

        /// Blend toward the neighbor mean (0.0 to 1.0)
        #[arg(short, long, default_value = "1.0")]
        blend: f64,

        /// Number of iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Comma-separated vertex indices to smooth (default: all)
        #[arg(long, value_delimiter = ',')]
        vertices: Vec<usize>,

        /// Grow the vertex selection by this many rings
        #[arg(long, default_value = "0", requires = "vertices")]
        grow: usize,

        /// Maximum influences per vertex (0 = unlimited)
        #[arg(short = 'm', long, default_value = "0")]
        max_influences: usize,

        /// Zero weights below this value
        #[arg(long, default_value = "0.0")]
        prune: f64,

        /// Skip normalization
        #[arg(long)]
        no_normalize: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Rescale every row to sum to one
    Normalize {
        /// Input skin file
        input: PathBuf,

        /// Output skin file
        output: PathBuf,
    },

    /// Keep only the largest influences per vertex
    Limit {
        /// Input skin file
        input: PathBuf,

        /// Output skin file
        output: PathBuf,

        /// Maximum influences per vertex
        #[arg(short = 'm', long, default_value = "4")]
        max_influences: usize,

        /// Zero weights below this value
        #[arg(long, default_value = "0.0")]
        prune: f64,

        /// Skip normalization
        #[arg(long)]
        no_normalize: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Smooth {
            input,
            output,
            blend,
            iterations,
            vertices,
            grow,
            max_influences,
            prune,
            no_normalize,
            sequential,
        } => {
            let config = SkinConfig::default()
                .with_blend_factor(blend)
                .with_iterations(iterations)
                .with_max_influences(max_influences)
                .with_prune_below(prune)
                .with_normalize(!no_normalize)
                .with_parallel(!sequential);
            cmd_smooth(&input, &output, &vertices, grow, &config)?;
        }

        Commands::Normalize { input, output } => {
            cmd_cleanup(&input, &output, &SkinConfig::cleanup())?;
        }

        Commands::Limit {
            input,
            output,
            max_influences,
            prune,
            no_normalize,
        } => {
            let config = SkinConfig::cleanup()
                .with_max_influences(max_influences)
                .with_prune_below(prune)
                .with_normalize(!no_normalize);
            cmd_cleanup(&input, &output, &config)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let skin = io::load(input)?;
    let weights = &skin.weights;

    println!("File: {}", input.display());
    println!("Vertices: {}", weights.num_vertices());
    println!("Faces: {}", skin.faces.len());
    println!("Edges: {}", skin.topology.num_edges());
    println!("Influences: {}", weights.influences().len());
    for name in weights.influences().names() {
        println!("  {}", name);
    }

    // Histogram of nonzero influences per vertex
    let mut histogram = vec![0usize; weights.influences().len() + 1];
    let mut unnormalized = 0;
    let mut empty = 0;
    for row in weights.rows() {
        let count = influence_count(row);
        histogram[count] += 1;
        if count == 0 {
            empty += 1;
        } else if !is_normalized(row, NORMALIZED_TOLERANCE) {
            unnormalized += 1;
        }
    }

    println!("\nInfluences per vertex:");
    for (count, &vertices) in histogram.iter().enumerate().filter(|&(_, &n)| n > 0) {
        println!("  {:>3}: {} vertices", count, vertices);
    }
    println!("Unweighted vertices: {}", empty);
    println!("Unnormalized vertices: {}", unnormalized);

    let isolated = skin
        .topology
        .vertex_ids()
        .filter(|&v| skin.topology.valence(v).map_or(false, |n| n == 0))
        .count();
    if isolated > 0 {
        println!("Isolated vertices: {}", isolated);
    }

    Ok(())
}

fn cmd_smooth(
    input: &PathBuf,
    output: &PathBuf,
    vertices: &[usize],
    grow: usize,
    config: &SkinConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut skin = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} influences",
        skin.weights.num_vertices(),
        skin.weights.influences().len()
    );

    let targets = if vertices.is_empty() {
        TargetSet::all(skin.weights.num_vertices())
    } else {
        TargetSet::new(vertices.iter().map(|&i| VertexId::new(i))).grow(&skin.topology, grow)?
    };

    let mode = if config.parallel { "parallel" } else { "sequential" };
    println!(
        "Smoothing {} vertices ({} iterations, blend={}, {})...",
        targets.len(),
        config.iterations,
        config.blend_factor,
        mode
    );

    apply(&mut skin, &targets, config, output)
}

fn cmd_cleanup(input: &PathBuf, output: &PathBuf, config: &SkinConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut skin = io::load(input)?;
    let targets = TargetSet::all(skin.weights.num_vertices());

    if config.max_influences > 0 {
        println!("Limiting to {} influences per vertex...", config.max_influences);
    } else {
        println!("Normalizing {} vertices...", targets.len());
    }

    apply(&mut skin, &targets, config, output)
}

fn apply(
    skin: &mut Skin,
    targets: &TargetSet,
    config: &SkinConfig,
    output: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let influences = skin.weights.influences().clone();

    let start = Instant::now();
    let outcome = pipeline::run(&skin.topology, &mut skin.weights, &influences, targets, config)?;
    let elapsed = start.elapsed();

    match outcome {
        Outcome::Applied(record) => println!("Updated {} vertices ({:.2?})", record.vertices().len(), elapsed),
        Outcome::Unchanged => println!("No changes"),
    }

    io::save(skin, output)?;
    println!("Saved: {}", output.display());

    Ok(())
}
