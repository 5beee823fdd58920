use approx::assert_abs_diff_eq;
use linmod::activation::{softmax, softmax_deriv};
use linmod::core::vector::dot;
use linmod::core::{Matrix, MlError};
use linmod::data::create_mini_batches_with_output;
use linmod::linalg::{det, inverse, pinverse, qrd};
use linmod::regularization::{reg_term, RegularizationConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|_| rng.gen_range(-5.0..5.0)).collect();
    Matrix::new(data, rows, cols).unwrap()
}

fn assert_matrix_eq(a: &Matrix, b: &Matrix, eps: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.data().iter().zip(b.data()) {
        assert_abs_diff_eq!(*x, *y, epsilon = eps);
    }
}

#[test]
fn dot_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(1);
    for len in [0, 1, 5, 17] {
        let u: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let v: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
        assert_eq!(dot(&u, &v).unwrap(), dot(&v, &u).unwrap());
    }
    assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
}

#[test]
fn identity_is_right_neutral() {
    let mut rng = StdRng::seed_from_u64(2);
    for (n, k) in [(1, 1), (3, 2), (4, 6)] {
        let a = random_matrix(&mut rng, n, k);
        assert_eq!(a.matmul(&Matrix::identity(k)).unwrap(), a);
    }
    let a = Matrix::zeros(2, 3);
    assert!(matches!(a.matmul(&Matrix::zeros(2, 3)), Err(MlError::DimensionMismatch(_))));
}

#[test]
fn inverse_of_known_matrix() {
    let a = Matrix::from_rows(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
    assert_abs_diff_eq!(det(&a).unwrap(), 10.0, epsilon = 1e-12);
    let expected = Matrix::from_rows(&[vec![0.6, -0.7], vec![-0.2, 0.4]]).unwrap();
    assert_matrix_eq(&inverse(&a).unwrap(), &expected, 1e-12);
}

#[test]
fn inverse_composes_to_identity() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in 1..=4 {
        // Diagonal dominance keeps the draw well conditioned.
        let mut a = random_matrix(&mut rng, n, n);
        for i in 0..n {
            a[(i, i)] += 25.0;
        }
        let product = a.matmul(&inverse(&a).unwrap()).unwrap();
        assert_matrix_eq(&product, &Matrix::identity(n), 1e-6);
    }
}

#[test]
fn singular_inverse_is_not_finite() {
    let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
    assert!(!inverse(&a).unwrap().is_finite());
}

#[test]
fn pinverse_of_square_is_inverse() {
    let a = Matrix::diag(&[3.0, 4.0]);
    let expected = Matrix::diag(&[1.0 / 3.0, 0.25]);
    assert_matrix_eq(&pinverse(&a).unwrap(), &expected, 1e-12);
}

#[test]
fn qr_reconstructs_input() {
    let mut rng = StdRng::seed_from_u64(4);
    let a = random_matrix(&mut rng, 5, 3);
    let qr = qrd(&a).unwrap();
    assert_matrix_eq(&qr.q.matmul(&qr.r).unwrap(), &a, 1e-9);
    let qtq = qr.q.transpose().matmul(&qr.q).unwrap();
    assert_matrix_eq(&qtq, &Matrix::identity(3), 1e-9);
}

#[test]
fn regularization_terms() {
    assert_abs_diff_eq!(
        reg_term(&[1.0, 2.0, -3.0], &RegularizationConfig::ridge(0.5)),
        3.5,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        reg_term(&[1.0, -2.0, 3.0], &RegularizationConfig::lasso(2.0)),
        12.0,
        epsilon = 1e-12
    );
}

#[test]
fn mini_batch_remainder_goes_last() {
    let x = Matrix::column(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    let y = vec![10.0, 11.0, 12.0, 13.0, 14.0];
    let batches = create_mini_batches_with_output(&x, &y, 3).unwrap();
    let sizes: Vec<usize> = batches.iter().map(|(b, _)| b.rows()).collect();
    assert_eq!(sizes, vec![1, 1, 3]);

    let (last_x, last_y) = &batches[2];
    assert_eq!(last_x.col(0), vec![2.0, 3.0, 4.0]);
    assert_eq!(last_y, &vec![12.0, 13.0, 14.0]);
}

#[test]
fn softmax_is_a_distribution_with_known_jacobian() {
    let mut rng = StdRng::seed_from_u64(5);
    for len in [1, 2, 7] {
        let z: Vec<f64> = (0..len).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let p = softmax(&z);
        assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        let j = softmax_deriv(&z);
        for a in 0..len {
            for b in 0..len {
                let expected = if a == b { p[a] * (1.0 - p[a]) } else { -p[a] * p[b] };
                assert_abs_diff_eq!(j[(a, b)], expected, epsilon = 1e-12);
            }
        }
    }
}
