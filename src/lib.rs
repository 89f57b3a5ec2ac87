//! Data-parallel K-means clustering.
//!
//! Each refinement iteration runs two fork-join stages: a parallel
//! nearest-centroid assignment over all points, and a reduction that
//! accumulates per-cluster sums and counts in thread-private buffers before
//! merging them into a single global accumulator under a mutex. Iterations
//! repeat until no label changes or the configured cap is reached.

pub mod api;
pub mod dataset;

pub use api::{cluster, ClusterError, ClusteringOutcome, KMeansConfig, Result, Termination};
pub use dataset::Dataset;

// Internal implementation modules (not part of the public API).
mod distance;
mod reduce;
mod refine;
