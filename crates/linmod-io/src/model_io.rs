use std::fs;
use std::path::Path;

use linmod_core::Parameters;

use crate::error::IoError;

/// Save parameters as plain text: one weight per line, then the bias.
///
/// Values are written in Rust's shortest round-trip form, so
/// [`load_parameters`] recovers them exactly.
pub fn save_parameters<P: AsRef<Path>>(path: P, params: &Parameters) -> Result<(), IoError> {
    let mut out = String::new();
    for w in &params.weights {
        out.push_str(&format!("{}\n", w));
    }
    out.push_str(&format!("{}\n", params.bias));
    fs::write(path, out)?;
    Ok(())
}

/// Load parameters written by [`save_parameters`].
///
/// Blank lines are ignored; the last value is the bias.
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<Parameters, IoError> {
    let text = fs::read_to_string(path)?;
    let mut values = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v: f64 = line.parse().map_err(|_| {
            IoError::Format(format!("line {}: '{}' is not a number", lineno + 1, line))
        })?;
        values.push(v);
    }
    let bias = values
        .pop()
        .ok_or_else(|| IoError::Format("no bias found".into()))?;
    Ok(Parameters::new(values, bias))
}

/// Save parameters as pretty-printed JSON.
pub fn save_json<P: AsRef<Path>>(path: P, params: &Parameters) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(params)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load parameters from JSON.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Parameters, IoError> {
    let json = fs::read_to_string(path)?;
    let params: Parameters = serde_json::from_str(&json)?;
    Ok(params)
}
