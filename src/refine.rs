use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::distance::nearest_centroid;
use crate::reduce::{reduce_partials, Accumulator};

/// Why the refinement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No label changed during the last iteration.
    Converged,
    /// The iteration cap was hit while labels were still moving.
    MaxIterReached,
}

pub(crate) struct Refinement {
    pub(crate) centroids: Array2<f64>,
    pub(crate) labels: Vec<usize>,
    pub(crate) cluster_sizes: Vec<usize>,
    pub(crate) iterations: usize,
    pub(crate) termination: Termination,
}

/// Lloyd refinement: parallel assignment, parallel partial reduction with a
/// serialized merge, centroid update, repeated until convergence or the cap.
///
/// Iterations are strictly sequential; each reads the centroids the previous
/// one produced, so the loop body is two fork-join regions with a full
/// barrier between them and another before the next iteration starts.
pub(crate) fn run_lloyd(points: &Array2<f64>, k: usize, max_iter: usize) -> Refinement {
    let n = points.nrows();

    // The first k input rows seed the centroids.
    let mut centroids = points.slice(s![..k, ..]).to_owned();
    let mut labels = vec![0usize; n];
    let mut cluster_sizes = vec![0usize; k];
    let mut iterations = 0usize;

    let termination = loop {
        let changed = assign_points(points, &centroids, &mut labels);

        let accumulator = reduce_partials(points, &labels, k);
        update_centroids(&mut centroids, &accumulator);
        cluster_sizes.copy_from_slice(&accumulator.counts);

        iterations += 1;
        tracing::debug!(iteration = iterations, changed, "refinement step complete");

        if !changed {
            break Termination::Converged;
        }
        if iterations >= max_iter {
            break Termination::MaxIterReached;
        }
    };

    tracing::info!(iterations, ?termination, "refinement finished");

    Refinement {
        centroids,
        labels,
        cluster_sizes,
        iterations,
        termination,
    }
}

/// Relabel every point with its nearest centroid under the current centroid
/// set, returning whether any label changed.
///
/// One task per point; each task writes exactly one label slot, so the stage
/// needs no locking. Per-task change flags are OR-combined into the
/// iteration's convergence flag. Centroids are read-only here, so the result
/// does not depend on task scheduling or worker count.
fn assign_points(points: &Array2<f64>, centroids: &Array2<f64>, labels: &mut [usize]) -> bool {
    labels
        .par_iter_mut()
        .enumerate()
        .map(|(i, label)| {
            let (best, _) = nearest_centroid(points.row(i).as_slice().unwrap(), centroids);
            if *label != best {
                *label = best;
                true
            } else {
                false
            }
        })
        .reduce(|| false, |a, b| a || b)
}

/// Turn global sums and counts into new centroid coordinates.
///
/// Clusters that attracted no points keep their previous coordinates.
fn update_centroids(centroids: &mut Array2<f64>, accumulator: &Accumulator) {
    let (k, dim) = centroids.dim();
    for c in 0..k {
        let count = accumulator.counts[c];
        if count == 0 {
            continue;
        }
        for d in 0..dim {
            centroids[(c, d)] = accumulator.sums[(c, d)] / count as f64;
        }
    }
}
