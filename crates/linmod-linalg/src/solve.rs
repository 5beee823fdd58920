use linmod_core::{Matrix, MlError, MlResult};

use crate::decomposition::{det, inverse};
use crate::products::gram_matrix;

/// Solve the linear system Ax = b as `inverse(A) · b`.
///
/// A singular `A` gives a non-finite `x`; only shape problems are errors.
pub fn solve(a: &Matrix, b: &[f64]) -> MlResult<Vec<f64>> {
    if a.rows() != b.len() {
        return Err(MlError::DimensionMismatch(format!(
            "solve: b has {} elements but A is {}x{}",
            b.len(),
            a.rows(),
            a.cols()
        )));
    }
    inverse(a)?.mat_vec(b)
}

/// Moore-Penrose pseudoinverse through the normal equations.
///
/// Tall or square input uses `(AᵀA)⁻¹Aᵀ`, wide input uses `Aᵀ(AAᵀ)⁻¹`.
/// Rank-deficient input propagates NaN/inf rather than failing.
pub fn pinverse(a: &Matrix) -> MlResult<Matrix> {
    let at = a.transpose();
    if a.rows() >= a.cols() {
        let g_inv = inverse(&gram_matrix(a))?;
        g_inv.matmul(&at)
    } else {
        let g_inv = inverse(&gram_matrix(&at))?;
        at.matmul(&g_inv)
    }
}

/// `det(G) / Π G_ii` for a square Gram matrix `G`.
///
/// By Hadamard's inequality this lies in `[0, 1]` for a positive
/// semi-definite `G`; values near 0 mean nearly dependent columns. Returns
/// NaN when a column is identically zero.
pub fn gram_conditioning(g: &Matrix) -> MlResult<f64> {
    let d = det(g)?;
    let diag: f64 = (0..g.rows()).map(|i| g[(i, i)]).product();
    Ok(d / diag)
}

/// Whether the columns of `x` are linearly independent, judged from the
/// determinant of its Gram matrix.
///
/// Accepts any shape. An empty matrix is reported as dependent.
pub fn linear_independence_checker(x: &Matrix) -> bool {
    if x.is_empty() {
        return false;
    }
    match gram_conditioning(&gram_matrix(x)) {
        Ok(ratio) => ratio.is_finite() && ratio > 1e-10,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve() {
        let a = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let x = solve(&a, &[5.0, 10.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-10);
        assert!(solve(&a, &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_pinverse_square_is_inverse() {
        let a = Matrix::diag(&[3.0, 4.0]);
        let p = pinverse(&a).unwrap();
        assert_abs_diff_eq!(p[(0, 0)], 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[(1, 1)], 0.25, epsilon = 1e-12);
        assert_eq!(p[(0, 1)], 0.0);
        assert_eq!(p[(1, 0)], 0.0);
    }

    #[test]
    fn test_pinverse_tall_is_left_inverse() {
        let a = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let p = pinverse(&a).unwrap();
        assert_eq!(p.shape(), (2, 3));
        let pa = p.matmul(&a).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((pa[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_pinverse_wide_is_right_inverse() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0]]).unwrap();
        let p = pinverse(&a).unwrap();
        assert_eq!(p.shape(), (3, 2));
        let ap = a.matmul(&p).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((ap[(i, j)] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_pinverse_rank_deficient_is_non_finite() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]]).unwrap();
        assert!(!pinverse(&a).unwrap().is_finite());
    }

    #[test]
    fn test_linear_independence() {
        let indep = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
        assert!(linear_independence_checker(&indep));

        let dup = Matrix::from_rows(&[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]).unwrap();
        assert!(!linear_independence_checker(&dup));
    }

    #[test]
    fn test_linear_independence_odd_shapes_do_not_panic() {
        assert!(!linear_independence_checker(&Matrix::zeros(0, 0)));
        assert!(!linear_independence_checker(&Matrix::zeros(3, 0)));
        assert!(!linear_independence_checker(&Matrix::zeros(2, 2)));
        // Wider than tall: more columns than samples can never be independent
        let wide = Matrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(!linear_independence_checker(&wide));
    }
}
