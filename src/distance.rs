use ndarray::Array2;
use wide::f64x4;

/// Squared Euclidean distance between two equal-length coordinate slices.
///
/// The square root is never taken: callers only compare distances, and sqrt
/// is monotonic, so the ordering is unchanged.
pub(crate) fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let dim = a.len();
    let mut acc = f64x4::splat(0.0);
    let mut j = 0;

    // SIMD 4-element chunks
    while j + 4 <= dim {
        let x_arr: [f64; 4] = a[j..j + 4].try_into().unwrap();
        let y_arr: [f64; 4] = b[j..j + 4].try_into().unwrap();
        let x = f64x4::from(x_arr);
        let y = f64x4::from(y_arr);
        let diff = x - y;
        acc += diff * diff;
        j += 4;
    }

    // Tail elements
    let mut tail = 0.0;
    while j < dim {
        let diff = a[j] - b[j];
        tail += diff * diff;
        j += 1;
    }

    acc.reduce_add() + tail
}

/// Index of the nearest centroid to `point`, plus its squared distance.
///
/// Comparisons are strictly-less, so an exact distance tie keeps the
/// lower-indexed centroid.
pub(crate) fn nearest_centroid(point: &[f64], centroids: &Array2<f64>) -> (usize, f64) {
    let mut best = 0usize;
    let mut best_dist = distance_sq(point, centroids.row(0).as_slice().unwrap());

    for c in 1..centroids.nrows() {
        let d = distance_sq(point, centroids.row(c).as_slice().unwrap());
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }

    (best, best_dist)
}
