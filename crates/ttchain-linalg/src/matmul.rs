//! Dense matrix product via the Faer backend.

use mdarray_linalg::matmul::{MatMul, MatMulBuilder};
use mdarray_linalg_faer::Faer;

use crate::{ncols, nrows, Matrix};

/// Compute the matrix product `a · b`.
///
/// # Panics
/// Panics if the inner dimensions disagree.
pub fn matmul(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(
        ncols(a),
        nrows(b),
        "matmul shape mismatch: {}x{} times {}x{}",
        nrows(a),
        ncols(a),
        nrows(b),
        ncols(b)
    );

    Faer.matmul(a, b).eval()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_small() {
        let a = Matrix::from_fn([2, 3], |idx| (idx[0] * 3 + idx[1]) as f64 + 1.0);
        let b = Matrix::from_fn([3, 2], |idx| (idx[0] * 2 + idx[1]) as f64 + 1.0);
        let c = matmul(&a, &b);

        // [[1,2,3],[4,5,6]] * [[1,2],[3,4],[5,6]] = [[22,28],[49,64]]
        assert_eq!(c[[0, 0]], 22.0);
        assert_eq!(c[[0, 1]], 28.0);
        assert_eq!(c[[1, 0]], 49.0);
        assert_eq!(c[[1, 1]], 64.0);
    }

    #[test]
    fn test_matmul_identity() {
        let a = Matrix::from_fn([3, 3], |idx| ((idx[0] * 3 + idx[1]) as f64).sin());
        let eye = Matrix::from_fn([3, 3], |idx| if idx[0] == idx[1] { 1.0 } else { 0.0 });
        let c = matmul(&a, &eye);
        for i in 0..3 {
            for j in 0..3 {
                assert!((c[[i, j]] - a[[i, j]]).abs() < 1e-14);
            }
        }
    }
}
