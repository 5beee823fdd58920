use linmod_core::{MlError, MlResult};

/// R² (coefficient of determination).
///
/// Constant targets give 0. NaN predictions give NaN.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    if y_true.len() != y_pred.len() {
        return Err(MlError::DimensionMismatch(format!(
            "{} targets but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(MlError::EmptyInput("r2_score needs at least one sample".into()));
    }
    let n = y_true.len() as f64;
    let mean_true = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean_true) * (t - mean_true)).sum();

    if ss_tot < 1e-15 {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r2_perfect() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(&y, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_mean_predictor_is_zero() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let p = [2.5; 4];
        assert!(r2_score(&y, &p).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_r2_errors() {
        assert!(r2_score(&[1.0], &[1.0, 2.0]).is_err());
        assert!(matches!(r2_score(&[], &[]), Err(MlError::EmptyInput(_))));
    }
}
