use std::sync::Mutex;

use ndarray::Array2;
use rayon::prelude::*;

/// Per-cluster coordinate sums and member counts for one reduction phase.
///
/// Thread-private instances live for a single chunk scan; the global instance
/// is rebuilt from zeros every iteration and only ever written inside the
/// merge's mutex region.
pub(crate) struct Accumulator {
    pub(crate) sums: Array2<f64>,
    pub(crate) counts: Vec<usize>,
}

impl Accumulator {
    pub(crate) fn zeros(k: usize, dim: usize) -> Self {
        Accumulator {
            sums: Array2::zeros((k, dim)),
            counts: vec![0; k],
        }
    }

    /// Count one point into `cluster` and add its coordinates to the sum.
    fn absorb(&mut self, cluster: usize, point: &[f64]) {
        self.counts[cluster] += 1;
        for (d, &coord) in point.iter().enumerate() {
            self.sums[(cluster, d)] += coord;
        }
    }

    /// Element-wise add of another accumulator's sums and counts.
    fn merge(&mut self, other: &Accumulator) {
        let (k, dim) = self.sums.dim();
        for c in 0..k {
            self.counts[c] += other.counts[c];
            for d in 0..dim {
                self.sums[(c, d)] += other.sums[(c, d)];
            }
        }
    }
}

/// Accumulate per-cluster sums and counts across the whole dataset.
///
/// The label range is split into one contiguous chunk per pool thread. Each
/// chunk fills a private accumulator with no synchronization, then folds it
/// into the shared global accumulator under the mutex as soon as it finishes;
/// chunks never wait for each other before merging. The critical section is
/// O(k * dim) per chunk regardless of dataset size, and is the only code that
/// touches the global accumulator.
pub(crate) fn reduce_partials(points: &Array2<f64>, labels: &[usize], k: usize) -> Accumulator {
    let n = points.nrows();
    let dim = points.ncols();
    let workers = rayon::current_num_threads();
    let chunk_len = (n + workers - 1) / workers;

    let global = Mutex::new(Accumulator::zeros(k, dim));

    labels
        .par_chunks(chunk_len)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let mut local = Accumulator::zeros(k, dim);
            let base = chunk_idx * chunk_len;
            for (offset, &cluster) in chunk.iter().enumerate() {
                let row = points.row(base + offset);
                local.absorb(cluster, row.as_slice().unwrap());
            }
            global.lock().unwrap().merge(&local);
        });

    global.into_inner().unwrap()
}
