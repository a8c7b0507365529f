use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::parse::extract_numbers;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a series of step densities from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, an `od` column and an optional `step` column
/// * `.json` – `[3.08, ...]`, `{ "od": [...] }` or `[{ "step": 1, "od": 3.08 }, ...]`
/// * `.txt`  – free text, every number in it is a reading
///
/// Readings come back in entry order (step 1 first).
pub fn load_file(path: &Path) -> Result<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let values = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "txt" => {
            let text = std::fs::read_to_string(path).context("reading text file")?;
            extract_numbers(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    if values.is_empty() {
        bail!("No readings found in {}", path.display());
    }
    Ok(values)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

const OD_HEADERS: [&str; 3] = ["od", "density", "optical_density"];

/// CSV layout: header row with column names.
/// The density column is the first one named like [`OD_HEADERS`], else the last
/// column. A `step` column, when present, decides the order.
fn read_csv<R: Read>(source: R) -> Result<Vec<f64>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no columns");
    }
    let od_idx = headers
        .iter()
        .position(|h| OD_HEADERS.contains(&h.as_str()))
        .unwrap_or(headers.len() - 1);
    let step_idx = headers.iter().position(|h| h == "step");

    let mut rows: Vec<(Option<f64>, f64)> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let od = parse_cell(record.get(od_idx), row_no, &headers[od_idx])?;
        let step = match step_idx {
            Some(idx) => Some(parse_cell(record.get(idx), row_no, "step")?),
            None => None,
        };
        rows.push((step, od));
    }

    if step_idx.is_some() {
        rows.sort_by(|a, b| a.0.unwrap_or(0.0).total_cmp(&b.0.unwrap_or(0.0)));
    }
    Ok(rows.into_iter().map(|(_, od)| od).collect())
}

fn parse_cell(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = cell.unwrap_or("").trim();
    let value = tok
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))?;
    if !value.is_finite() {
        bail!("Row {row}, {col}: '{tok}' is not a finite number");
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn read_json(text: &str) -> Result<Vec<f64>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match &root {
        JsonValue::Object(obj) => {
            let arr = obj
                .get("od")
                .and_then(|v| v.as_array())
                .context("Expected an \"od\" array")?;
            json_numbers(arr)
        }
        JsonValue::Array(arr) if arr.iter().all(|v| v.is_object()) && !arr.is_empty() => {
            json_records(arr)
        }
        JsonValue::Array(arr) => json_numbers(arr),
        _ => bail!("Expected a JSON array or object"),
    }
}

fn json_numbers(arr: &[JsonValue]) -> Result<Vec<f64>> {
    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .filter(|od| od.is_finite())
                .with_context(|| format!("od[{j}]: not a finite number"))
        })
        .collect()
}

/// `[{ "step": 1, "od": 3.08 }, ...]`, sorted by step when every record has one.
fn json_records(arr: &[JsonValue]) -> Result<Vec<f64>> {
    let mut rows = Vec::with_capacity(arr.len());
    for (i, rec) in arr.iter().enumerate() {
        let od = rec
            .get("od")
            .and_then(|v| v.as_f64())
            .filter(|od| od.is_finite())
            .with_context(|| format!("Record {i}: missing or invalid 'od'"))?;
        let step = rec.get("step").and_then(|v| v.as_f64());
        rows.push((step, od));
    }

    if rows.iter().all(|(step, _)| step.is_some()) {
        rows.sort_by(|a, b| a.0.unwrap_or(0.0).total_cmp(&b.0.unwrap_or(0.0)));
    }
    Ok(rows.into_iter().map(|(_, od)| od).collect())
}
