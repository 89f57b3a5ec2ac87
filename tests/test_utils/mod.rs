use ndarray::Array2;
use parallel_kmeans::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create synthetic data with well-separated clusters around spaced centers.
///
/// Points are interleaved round-robin across clusters (point `i` belongs to
/// cluster `i % num_clusters`). The first `num_clusters` points seed the
/// centroids, and interleaving puts one of them in each cluster.
/// Returns (dataset, true_labels).
#[allow(dead_code)]
pub fn create_gaussian_clusters(
    num_clusters: usize,
    points_per_cluster: usize,
    dim: usize,
    separation: f64,
    seed: u64,
) -> (Dataset, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let total = num_clusters * points_per_cluster;

    let centers: Vec<Vec<f64>> = (0..num_clusters)
        .map(|cluster_id| {
            (0..dim)
                .map(|d| cluster_id as f64 * separation + d as f64 * 0.1)
                .collect()
        })
        .collect();

    let mut rows = Vec::with_capacity(total);
    let mut true_labels = Vec::with_capacity(total);
    for i in 0..total {
        let cluster_id = i % num_clusters;
        true_labels.push(cluster_id);
        rows.push(
            centers[cluster_id]
                .iter()
                .map(|&c| c + rng.gen_range(-0.5..0.5))
                .collect(),
        );
    }

    let dataset = Dataset::from_rows(rows).expect("rows are rectangular");
    (dataset, true_labels)
}

/// Calculate squared Euclidean distance.
#[allow(dead_code)]
pub fn euclidean_distance_squared(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Calculate the within-cluster sum of squares (inertia).
#[allow(dead_code)]
pub fn calculate_inertia(dataset: &Dataset, centroids: &Array2<f64>, labels: &[usize]) -> f64 {
    let points = dataset.points();
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            euclidean_distance_squared(
                points.row(i).as_slice().unwrap(),
                centroids.row(label).as_slice().unwrap(),
            )
        })
        .sum()
}

/// Verify that each point is assigned to its nearest centroid.
#[allow(dead_code)]
pub fn verify_optimal_assignment(
    dataset: &Dataset,
    centroids: &Array2<f64>,
    labels: &[usize],
) -> bool {
    let points = dataset.points();
    for (i, &assigned) in labels.iter().enumerate() {
        let point = points.row(i);
        let assigned_dist = euclidean_distance_squared(
            point.as_slice().unwrap(),
            centroids.row(assigned).as_slice().unwrap(),
        );

        for c in 0..centroids.nrows() {
            let dist = euclidean_distance_squared(
                point.as_slice().unwrap(),
                centroids.row(c).as_slice().unwrap(),
            );
            // Small epsilon for floating point comparison.
            if dist < assigned_dist - 1e-9 {
                return false;
            }
        }
    }
    true
}

/// Assert two centroid matrices are equal within a relative tolerance.
#[allow(dead_code)]
pub fn assert_centroids_close(a: &Array2<f64>, b: &Array2<f64>, rel_tol: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        let scale = x.abs().max(y.abs()).max(1.0);
        assert!(
            (x - y).abs() <= rel_tol * scale,
            "centroid coordinate mismatch: {} vs {}",
            x,
            y
        );
    }
}
