use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::api::{ClusterError, Result};

/// Rows generated or encoded per bincode batch.
const BATCH_SIZE: usize = 1000;

/// An immutable set of fixed-dimension points.
///
/// Built once before refinement starts and shared read-only across all
/// workers; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    points: Array2<f64>,
}

impl Dataset {
    /// Wrap caller-supplied rows, validating that every row has the same
    /// width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(ClusterError::InvalidData("no points provided".into()));
        }
        let dim = rows[0].len();
        if dim == 0 {
            return Err(ClusterError::InvalidData(
                "points must have at least one dimension".into(),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(ClusterError::InvalidData(format!(
                    "row {} has width {}, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
        }

        let n = rows.len();
        let mut points = Array2::zeros((n, dim));
        for (i, row) in rows.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                points[(i, j)] = value;
            }
        }
        Ok(Dataset { points })
    }

    /// Wrap an existing matrix (rows = points).
    pub fn from_array(points: Array2<f64>) -> Result<Self> {
        if points.nrows() == 0 || points.ncols() == 0 {
            return Err(ClusterError::InvalidData(
                "dataset must have at least one point and one dimension".into(),
            ));
        }
        Ok(Dataset { points })
    }

    /// Generate `n` points with coordinates uniform in `[0, 1)`.
    ///
    /// Batches are generated in parallel, each from its own rng seeded by
    /// `seed` and the batch number, so the output depends only on `seed` and
    /// never on the thread count.
    pub fn random(n: usize, dim: usize, seed: u64) -> Result<Self> {
        if n == 0 || dim == 0 {
            return Err(ClusterError::InvalidData(
                "dataset must have at least one point and one dimension".into(),
            ));
        }

        let total_batches = (n + BATCH_SIZE - 1) / BATCH_SIZE;
        let batches: Vec<Vec<f64>> = (0..total_batches)
            .into_par_iter()
            .map(|batch_idx| {
                let start = batch_idx * BATCH_SIZE;
                let end = ((batch_idx + 1) * BATCH_SIZE).min(n);
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch_idx as u64));
                (0..(end - start) * dim)
                    .map(|_| rng.gen_range(0.0..1.0))
                    .collect()
            })
            .collect();

        let flat: Vec<f64> = batches.into_iter().flatten().collect();
        let points =
            Array2::from_shape_vec((n, dim), flat).expect("batches cover exactly n rows");
        tracing::debug!(rows = n, dim, seed, "dataset generated");
        Ok(Dataset { points })
    }

    /// Write the dataset as appended bincode batches of rows.
    ///
    /// Batches are encoded in parallel and written in order, since row order
    /// is meaningful (the first k rows seed the centroids).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let n = self.points.nrows();
        let total_batches = (n + BATCH_SIZE - 1) / BATCH_SIZE;

        let encoded: Vec<Vec<u8>> = (0..total_batches)
            .into_par_iter()
            .map(|batch_idx| {
                let start = batch_idx * BATCH_SIZE;
                let end = ((batch_idx + 1) * BATCH_SIZE).min(n);
                let rows: Vec<Vec<f64>> =
                    (start..end).map(|i| self.points.row(i).to_vec()).collect();
                bincode::encode_to_vec(&rows, bincode::config::standard())
                    .expect("Failed to encode rows")
            })
            .collect();

        let mut file = File::create(path)?;
        for batch in &encoded {
            file.write_all(batch)?;
        }
        tracing::debug!(rows = n, batches = total_batches, "dataset written");
        Ok(())
    }

    /// Read a dataset written by [`Dataset::save`] (handles the appended
    /// batch format).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut offset = 0;
        while offset < buffer.len() {
            let (batch, bytes_read) = bincode::decode_from_slice::<Vec<Vec<f64>>, _>(
                &buffer[offset..],
                bincode::config::standard(),
            )?;
            rows.extend(batch);
            offset += bytes_read;
        }

        tracing::debug!(rows = rows.len(), "dataset read");
        Self::from_rows(rows)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Dimensionality of every point.
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Dataset::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidData(_)));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        assert!(Dataset::from_rows(Vec::new()).is_err());
        assert!(Dataset::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn random_is_deterministic_for_a_seed() {
        let a = Dataset::random(2500, 3, 7).unwrap();
        let b = Dataset::random(2500, 3, 7).unwrap();
        let c = Dataset::random(2500, 3, 8).unwrap();

        assert_eq!(a.points(), b.points());
        assert_ne!(a.points(), c.points());
        assert_eq!(a.len(), 2500);
        assert_eq!(a.dim(), 3);
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let data = Dataset::random(500, 4, 11).unwrap();
        assert!(data.points().iter().all(|&v| (0.0..1.0).contains(&v)));
    }
}
