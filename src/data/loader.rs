use std::path::Path;

use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// RawTable – untyped cells straight from the source file
// ---------------------------------------------------------------------------

/// Source headers and cells as text, before any normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one record per line
/// * `.json`    – `[{ "Retailer": "...", "Total Sales": 600.0, ... }, ...]`
/// * `.parquet` – one column per field, any scalar Arrow type
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DashboardError::UnsupportedFormat(other.to_string())),
    };

    log::debug!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows with a different field count than the header make the file malformed.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| DashboardError::file_access(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::file_access(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DashboardError::file_access(path, e))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Keys missing from a record read as empty cells.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).map_err(|e| DashboardError::file_access(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DashboardError::file_access(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| DashboardError::file_access(path, "expected top-level JSON array"))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            DashboardError::file_access(path, format!("row {i} is not a JSON object"))
        })?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Dates come out as `YYYY-MM-DD`,
/// timestamps as `YYYY-MM-DDTHH:MM:SS`, nulls as empty cells.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| DashboardError::file_access(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DashboardError::file_access(path, e))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| DashboardError::file_access(path, e))?;

    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| DashboardError::file_access(path, e))?;
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DashboardError::file_access(path, e))?;

        for row in 0..batch.num_rows() {
            rows.push(
                formatters
                    .iter()
                    .map(|f| f.value(row).to_string())
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}
