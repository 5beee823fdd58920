use std::ops::Range;

use linmod_core::{Matrix, MlError, MlResult};

/// Contiguous row ranges for `n_batches` mini-batches over `n` samples.
///
/// Every batch holds `⌊n / n_batches⌋` samples except the last, which also
/// takes the `n mod n_batches` leftovers: `n = 5, n_batches = 3` gives sizes
/// `[1, 1, 3]`.
pub fn batch_ranges(n: usize, n_batches: usize) -> MlResult<Vec<Range<usize>>> {
    if n_batches == 0 {
        return Err(MlError::InvalidParameter(
            "number of mini-batches must be positive".into(),
        ));
    }
    if n_batches > n {
        return Err(MlError::InvalidParameter(format!(
            "cannot split {} samples into {} non-empty mini-batches",
            n, n_batches
        )));
    }
    let base = n / n_batches;
    let mut ranges: Vec<Range<usize>> = (0..n_batches).map(|i| i * base..(i + 1) * base).collect();
    if let Some(last) = ranges.last_mut() {
        last.end = n;
    }
    Ok(ranges)
}

/// Split the rows of `input` into mini-batches.
pub fn create_mini_batches(input: &Matrix, n_batches: usize) -> MlResult<Vec<Matrix>> {
    Ok(batch_ranges(input.rows(), n_batches)?
        .into_iter()
        .map(|r| input.slice_rows(r.start, r.end))
        .collect())
}

fn check_rows(input: &Matrix, outputs: usize) -> MlResult<()> {
    if input.rows() != outputs {
        return Err(MlError::DimensionMismatch(format!(
            "mini-batches: {} input rows but {} outputs",
            input.rows(),
            outputs
        )));
    }
    Ok(())
}

/// Split inputs and their scalar targets into aligned mini-batches.
pub fn create_mini_batches_with_output(
    input: &Matrix,
    output: &[f64],
    n_batches: usize,
) -> MlResult<Vec<(Matrix, Vec<f64>)>> {
    check_rows(input, output.len())?;
    Ok(batch_ranges(input.rows(), n_batches)?
        .into_iter()
        .map(|r| (input.slice_rows(r.start, r.end), output[r].to_vec()))
        .collect())
}

/// Split inputs and their target rows into aligned mini-batches.
pub fn create_mini_batches_with_matrix_output(
    input: &Matrix,
    output: &Matrix,
    n_batches: usize,
) -> MlResult<Vec<(Matrix, Matrix)>> {
    check_rows(input, output.rows())?;
    Ok(batch_ranges(input.rows(), n_batches)?
        .into_iter()
        .map(|r| {
            (
                input.slice_rows(r.start, r.end),
                output.slice_rows(r.start, r.end),
            )
        })
        .collect())
}
