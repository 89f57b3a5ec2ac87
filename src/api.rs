use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Dataset;
use crate::refine;

pub use crate::refine::Termination;

/// Error type used by operations in this crate.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Rejected before the refinement loop starts; never silently clamped.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),
    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Configuration for a clustering run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub k: usize,

    /// Iteration cap; hitting it is a normal outcome, not an error.
    pub max_iter: usize,

    /// Worker threads for the parallel stages.
    pub workers: usize,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            workers: std::thread::available_parallelism().map_or(1, |p| p.get()),
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate against a dataset of `n` points.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.k == 0 {
            return Err(ClusterError::InvalidConfig("k must be at least 1".into()));
        }
        if self.k > n {
            return Err(ClusterError::InvalidConfig(format!(
                "dataset has {} points but k = {}; add more data or decrease k",
                n, self.k
            )));
        }
        if self.max_iter == 0 {
            return Err(ClusterError::InvalidConfig(
                "max_iter must be at least 1".into(),
            ));
        }
        if self.workers == 0 {
            return Err(ClusterError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Final state of a clustering run.
///
/// Both terminal states expose the same fields; `termination` records which
/// one was reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    /// One row per cluster.
    pub centroids: Array2<f64>,
    /// Cluster index of every input point, in dataset order.
    pub labels: Vec<usize>,
    /// Number of points in each cluster.
    pub cluster_sizes: Vec<usize>,
    /// Iterations actually run.
    pub iterations: usize,
    pub termination: Termination,
}

impl ClusteringOutcome {
    /// Persist the outcome as bincode.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let encoded = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load an outcome written by [`ClusteringOutcome::save_to`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let (outcome, _bytes_read): (ClusteringOutcome, usize) =
            bincode::serde::decode_from_slice(&buffer, bincode::config::standard())?;
        Ok(outcome)
    }
}

/// Cluster `dataset` into `config.k` groups.
///
/// Builds a dedicated pool of `config.workers` threads and runs the
/// refinement loop inside it. The initial centroids are copies of the first
/// `k` dataset points; labels start at 0. Worker count affects wall-clock
/// time and floating-point summation order only, never the assignments.
pub fn cluster(dataset: &Dataset, config: &KMeansConfig) -> Result<ClusteringOutcome> {
    config.validate(dataset.len())?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;

    let refinement =
        pool.install(|| refine::run_lloyd(dataset.points(), config.k, config.max_iter));

    Ok(ClusteringOutcome {
        centroids: refinement.centroids,
        labels: refinement.labels,
        cluster_sizes: refinement.cluster_sizes,
        iterations: refinement.iterations,
        termination: refinement.termination,
    })
}
