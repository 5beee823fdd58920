use linmod_core::{Matrix, MlError, MlResult};

/// Gram matrix `XᵀX`.
pub fn gram_matrix(x: &Matrix) -> Matrix {
    let k = x.cols();
    let mut g = Matrix::zeros(k, k);
    for row in x.iter_rows() {
        for i in 0..k {
            let ri = row[i];
            for j in i..k {
                g[(i, j)] += ri * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            g[(i, j)] = g[(j, i)];
        }
    }
    g
}

/// Weighted Gram matrix `Xᵀ diag(w) X`.
pub fn weighted_gram_matrix(x: &Matrix, w: &[f64]) -> MlResult<Matrix> {
    if w.len() != x.rows() {
        return Err(MlError::DimensionMismatch(format!(
            "weighted gram: {} weights for {} rows",
            w.len(),
            x.rows()
        )));
    }
    let k = x.cols();
    let mut g = Matrix::zeros(k, k);
    for (row, &wt) in x.iter_rows().zip(w) {
        for i in 0..k {
            let ri = row[i] * wt;
            for j in 0..k {
                g[(i, j)] += ri * row[j];
            }
        }
    }
    Ok(g)
}

/// Kronecker product: block (i, j) of the result is `a[i][j] · b`.
pub fn kronecker_product(a: &Matrix, b: &Matrix) -> Matrix {
    let (ar, ac) = a.shape();
    let (br, bc) = b.shape();
    let mut out = Matrix::zeros(ar * br, ac * bc);
    for i in 0..ar {
        for j in 0..ac {
            let s = a[(i, j)];
            for p in 0..br {
                for q in 0..bc {
                    out[(i * br + p, j * bc + q)] = s * b[(p, q)];
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gram_matches_transpose_product() {
        let x = Matrix::from_rows(&[
            vec![1.0, 2.0, 0.5],
            vec![-1.0, 0.0, 3.0],
            vec![4.0, 1.0, -2.0],
            vec![0.0, 2.0, 1.0],
        ])
        .unwrap();
        let expected = x.transpose().matmul(&x).unwrap();
        let g = gram_matrix(&x);
        for (a, b) in g.data().iter().zip(expected.data()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_weighted_gram() {
        let x = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let g = weighted_gram_matrix(&x, &[1.0, 1.0]).unwrap();
        assert_eq!(g, gram_matrix(&x));
        let g2 = weighted_gram_matrix(&x, &[2.0, 0.0]).unwrap();
        assert_eq!(g2.to_rows(), vec![vec![2.0, 4.0], vec![4.0, 8.0]]);
        assert!(weighted_gram_matrix(&x, &[1.0]).is_err());
    }

    #[test]
    fn test_kronecker() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![0.0, 5.0], vec![6.0, 7.0]]).unwrap();
        let k = kronecker_product(&a, &b);
        assert_eq!(k.shape(), (4, 4));
        assert_eq!(k.row(0), &[0.0, 5.0, 0.0, 10.0]);
        assert_eq!(k.row(3), &[18.0, 21.0, 24.0, 28.0]);
    }
}
