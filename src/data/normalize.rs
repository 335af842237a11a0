use chrono::{NaiveDate, NaiveDateTime};

use super::classify::classify;
use super::loader::RawTable;
use super::model::{Dataset, SalesRecord};
use crate::error::{DashboardError, Result};

/// Columns every source file must provide, by normalised name.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "retailer",
    "region",
    "city",
    "product",
    "invoice_date",
    "total_sales",
    "sales_method",
];

// `%y` before `%Y`: chrono reads "20" as year 20 under `%Y`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// `" Invoice Date "` → `"invoice_date"`.
pub fn normalize_column_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Parse an invoice date in any of the accepted layouts.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a currency amount such as `600`, `1200.5` or `$1,200.50`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_prefix('$').unwrap_or(s).replace(',', "");
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turn a raw table into the classified dataset.
///
/// The first unparsable date or amount aborts the whole load; rows are never
/// skipped. Row numbers in errors are 1-based data rows.
pub fn normalize(table: &RawTable) -> Result<Dataset> {
    let names: Vec<String> = table
        .headers
        .iter()
        .map(|h| normalize_column_name(h))
        .collect();

    for (i, name) in names.iter().enumerate() {
        if let Some(j) = names[..i].iter().position(|earlier| earlier == name) {
            return Err(DashboardError::DuplicateColumn {
                first: table.headers[j].clone(),
                second: table.headers[i].clone(),
                normalized: name.clone(),
            });
        }
    }

    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = names
            .iter()
            .position(|n| n == column)
            .ok_or(DashboardError::MissingColumn(column))?;
    }
    let [retailer, region, city, product, invoice_date, total_sales, sales_method] = idx;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let cell = |col: usize| row.get(col).map(String::as_str).unwrap_or("");

        let date_raw = cell(invoice_date);
        let date = parse_invoice_date(date_raw).ok_or_else(|| DashboardError::Parse {
            row: row_no,
            column: "invoice_date",
            value: date_raw.to_string(),
            reason: "not a recognised date".to_string(),
        })?;

        let sales_raw = cell(total_sales);
        let amount = parse_amount(sales_raw).ok_or_else(|| DashboardError::Parse {
            row: row_no,
            column: "total_sales",
            value: sales_raw.to_string(),
            reason: "not a finite number".to_string(),
        })?;

        let product_text = cell(product).to_string();
        let (category, gender) = classify(&product_text);

        records.push(SalesRecord {
            retailer: cell(retailer).trim().to_string(),
            region: cell(region).trim().to_string(),
            city: cell(city).trim().to_string(),
            product: product_text,
            invoice_date: date,
            total_sales: amount,
            sales_method: cell(sales_method).trim().to_string(),
            category,
            gender,
        });
    }

    let dataset = Dataset::from_records(records);
    let summary = dataset.summary();
    if summary.unknown_category > 0 || summary.unassigned_gender > 0 {
        log::warn!(
            "{} records with unknown category, {} with no gender",
            summary.unknown_category,
            summary.unassigned_gender
        );
    }
    Ok(dataset)
}
