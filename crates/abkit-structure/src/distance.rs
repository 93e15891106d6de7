use ndarray::Array2;

fn euclidean(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Distances between every pair of `a` x `b` coordinates, shape `(a.len(), b.len())`.
pub fn cdist(a: &[[f64; 3]], b: &[[f64; 3]]) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| euclidean(&a[i], &b[j]))
}

/// Symmetric all-pairs distance matrix.
pub fn distance_matrix(coords: &[[f64; 3]]) -> Array2<f64> {
    cdist(coords, coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdist() {
        let a = [[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]];
        let b = [[0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [3.0, 0.0, 0.0]];
        let d = cdist(&a, &b);
        assert_eq!(d.shape(), &[2, 3]);
        assert_eq!(d[[0, 1]], 2.0);
        assert_eq!(d[[1, 0]], 5.0);
        assert_eq!(d[[1, 2]], 4.0);
    }

    #[test]
    fn test_distance_matrix_is_symmetric() {
        let coords = [[0.0, 0.0, 0.0], [1.0, 2.0, 2.0], [-1.0, 0.5, 4.0]];
        let d = distance_matrix(&coords);
        assert_eq!(d[[0, 1]], 3.0);
        for i in 0..3 {
            assert_eq!(d[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(d[[i, j]], d[[j, i]]);
            }
        }
    }
}
