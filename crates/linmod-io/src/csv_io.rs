use std::path::Path;

use linmod_core::Matrix;

use crate::error::IoError;

/// Read a numeric CSV file with a header row into a matrix.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<(Matrix, Vec<String>), IoError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = record
            .iter()
            .map(|field| {
                field.trim().parse::<f64>().map_err(|_| {
                    IoError::Format(format!("record {}: '{}' is not a number", i + 1, field))
                })
            })
            .collect::<Result<Vec<f64>, IoError>>()?;
        rows.push(row);
    }

    let matrix = Matrix::from_rows(&rows)?;
    Ok((matrix, headers))
}

/// Read a CSV file and split off the column named `target` as the outputs.
pub fn read_dataset<P: AsRef<Path>>(path: P, target: &str) -> Result<(Matrix, Vec<f64>), IoError> {
    let (data, headers) = read_csv(path)?;
    let t = headers
        .iter()
        .position(|h| h == target)
        .ok_or_else(|| IoError::Format(format!("no column named '{}'", target)))?;

    let y = data.col(t);
    let features: Vec<Vec<f64>> = data
        .iter_rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(j, _)| j != t)
                .map(|(_, &v)| v)
                .collect()
        })
        .collect();
    Ok((Matrix::from_rows(&features)?, y))
}

/// Write a matrix to a CSV file with optional headers.
pub fn write_csv<P: AsRef<Path>>(path: P, data: &Matrix, headers: Option<&[String]>) -> Result<(), IoError> {
    let mut wtr = csv::Writer::from_path(path)?;

    if let Some(h) = headers {
        wtr.write_record(h)?;
    }

    for row in data.iter_rows() {
        let record: Vec<String> = row.iter().map(|v| format!("{}", v)).collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
