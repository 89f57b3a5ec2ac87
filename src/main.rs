use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use parallel_kmeans::{cluster, Dataset, KMeansConfig};

/// Data-parallel K-means clustering over generated or saved datasets.
#[derive(Parser, Debug)]
#[command(name = "parallel-kmeans", version, about)]
struct Cli {
    /// Worker threads for the parallel stages (defaults to all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Number of clusters
    #[arg(short = 'k', long, default_value_t = 3)]
    clusters: usize,

    /// Maximum refinement iterations
    #[arg(long, default_value_t = 100)]
    max_iter: usize,

    /// Number of points to generate
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    points: usize,

    /// Point dimensionality
    #[arg(short, long, default_value_t = 2)]
    dim: usize,

    /// Seed for dataset generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Load the dataset from this file instead of generating one
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Write the dataset to this file after generating it
    #[arg(long, value_name = "FILE")]
    save_data: Option<PathBuf>,

    /// Export the clustering outcome to this file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let dataset = match &cli.data {
        Some(path) => {
            println!("Loading dataset from {}...", path.display());
            Dataset::load(path)?
        }
        None => {
            println!(
                "Generating {} random points (dim {}, seed {})...",
                cli.points, cli.dim, cli.seed
            );
            Dataset::random(cli.points, cli.dim, cli.seed)?
        }
    };
    println!("Dataset: {} points, dim {}", dataset.len(), dataset.dim());

    if let Some(path) = &cli.save_data {
        dataset.save(path)?;
        println!("Dataset saved to {}", path.display());
    }

    let mut config = KMeansConfig::new(cli.clusters).with_max_iter(cli.max_iter);
    if let Some(threads) = cli.threads {
        config = config.with_workers(threads);
    }

    println!(
        "Clustering with k={}, max_iter={}, {} worker threads...",
        config.k, config.max_iter, config.workers
    );

    let started = Instant::now();
    let outcome = cluster(&dataset, &config)?;
    let elapsed = started.elapsed();

    println!(
        "K-means finished in {} iterations ({:?}).",
        outcome.iterations, outcome.termination
    );
    println!("Elapsed time: {:.6} seconds", elapsed.as_secs_f64());
    println!("Final centroids:");
    for (c, centroid) in outcome.centroids.outer_iter().enumerate() {
        let coords: Vec<String> = centroid.iter().map(|v| format!("{:.6}", v)).collect();
        println!(
            "Cluster {}: {} ({} points)",
            c,
            coords.join(" "),
            outcome.cluster_sizes[c]
        );
    }

    if let Some(path) = &cli.export {
        outcome.save_to(path)?;
        println!("Outcome exported to {}", path.display());
    }

    Ok(())
}
