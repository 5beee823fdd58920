use linmod_core::{Matrix, MlError, MlResult};

fn check_len(y_true: &[f64], y_pred: &[f64]) -> MlResult<()> {
    if y_true.len() != y_pred.len() {
        return Err(MlError::DimensionMismatch(format!(
            "{} targets but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Fraction of predictions that round to their target.
///
/// NaN predictions never match, so a diverged model scores 0.
pub fn performance(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    check_len(y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(&t, &p)| p.round() == t)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Fraction of rows whose every rounded prediction matches its target.
pub fn performance_matrix(y_true: &Matrix, y_pred: &Matrix) -> MlResult<f64> {
    if y_true.shape() != y_pred.shape() {
        return Err(MlError::ShapeMismatch {
            expected: vec![y_true.rows(), y_true.cols()],
            got: vec![y_pred.rows(), y_pred.cols()],
        });
    }
    let correct = y_true
        .iter_rows()
        .zip(y_pred.iter_rows())
        .filter(|(t, p)| t.iter().zip(p.iter()).all(|(&t, &p)| p.round() == t))
        .count();
    Ok(correct as f64 / y_true.rows() as f64)
}

/// Binary confusion counts with class 1 as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }
}

/// Count true/false positives and negatives after rounding predictions.
pub fn tf_pn(y_true: &[f64], y_pred: &[f64]) -> MlResult<ConfusionCounts> {
    check_len(y_true, y_pred)?;
    let mut counts = ConfusionCounts::default();
    for (&t, &p) in y_true.iter().zip(y_pred) {
        let actual = t.round() == 1.0;
        let predicted = p.round() == 1.0;
        match (actual, predicted) {
            (true, true) => counts.tp += 1,
            (false, true) => counts.fp += 1,
            (false, false) => counts.tn += 1,
            (true, false) => counts.fn_ += 1,
        }
    }
    Ok(counts)
}

/// TP / (TP + FP), or 0 when nothing is predicted positive.
pub fn precision(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    let c = tf_pn(y_true, y_pred)?;
    Ok(ratio(c.tp, c.tp + c.fp))
}

/// TP / (TP + FN), or 0 when there are no positives.
pub fn recall(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    let c = tf_pn(y_true, y_pred)?;
    Ok(ratio(c.tp, c.tp + c.fn_))
}

/// (TP + TN) / total.
pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    let c = tf_pn(y_true, y_pred)?;
    Ok(ratio(c.tp + c.tn, c.total()))
}

/// Harmonic mean of precision and recall.
pub fn f1_score(y_true: &[f64], y_pred: &[f64]) -> MlResult<f64> {
    let p = precision(y_true, y_pred)?;
    let r = recall(y_true, y_pred)?;
    if p + r == 0.0 {
        Ok(0.0)
    } else {
        Ok(2.0 * p * r / (p + r))
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
