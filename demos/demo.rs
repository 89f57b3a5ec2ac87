use parallel_kmeans::{cluster, Dataset, KMeansConfig};

fn main() {
    println!("Starting parallel-kmeans demo.");

    // A small hand-checkable dataset: three visible groups in the plane.
    let rows = vec![
        vec![1.0, 2.0],
        vec![1.5, 1.8],
        vec![5.0, 8.0],
        vec![8.0, 8.0],
        vec![1.0, 0.6],
        vec![9.0, 11.0],
        vec![8.0, 2.0],
        vec![10.0, 2.0],
        vec![9.0, 3.0],
        vec![6.0, 7.0],
    ];
    let dataset = Dataset::from_rows(rows).expect("rows are rectangular");

    let config = KMeansConfig::new(3).with_max_iter(100).with_workers(4);
    let outcome = cluster(&dataset, &config).expect("clustering failed");

    println!(
        "Finished in {} iterations ({:?}).",
        outcome.iterations, outcome.termination
    );
    for (c, centroid) in outcome.centroids.outer_iter().enumerate() {
        println!(
            "Cluster {}: ({:.2}, {:.2}) with {} points",
            c,
            centroid[0],
            centroid[1],
            outcome.cluster_sizes[c]
        );
    }
    println!("Labels: {:?}", outcome.labels);
}
