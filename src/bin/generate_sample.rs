use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// One row in the layout of the US retail sales export.
#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Retailer")]
    retailer: &'static str,
    #[serde(rename = "Retailer ID")]
    retailer_id: i64,
    #[serde(rename = "Invoice Date")]
    invoice_date: NaiveDate,
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "Product")]
    product: &'static str,
    #[serde(rename = "Units Sold")]
    units_sold: i64,
    #[serde(rename = "Total Sales")]
    total_sales: f64,
    #[serde(rename = "Sales Method")]
    sales_method: &'static str,
}

const RETAILERS: [(&str, i64); 6] = [
    ("Foot Locker", 1185732),
    ("Walmart", 1128299),
    ("Sports Direct", 1197831),
    ("West Gear", 1128299),
    ("Kohl's", 1189833),
    ("Amazon", 1185732),
];

const CITIES: [(&str, &str); 10] = [
    ("Northeast", "New York"),
    ("Northeast", "Boston"),
    ("South", "Houston"),
    ("South", "Miami"),
    ("West", "San Francisco"),
    ("West", "Seattle"),
    ("Midwest", "Chicago"),
    ("Midwest", "Detroit"),
    ("Southeast", "Charlotte"),
    ("Southeast", "Atlanta"),
];

/// Product lines with their unit price. The last entry matches no category.
const PRODUCTS: [(&str, f64); 7] = [
    ("Men's Street Footwear", 50.0),
    ("Men's Athletic Footwear", 45.0),
    ("Women's Street Footwear", 40.0),
    ("Women's Athletic Footwear", 42.0),
    ("Men's Apparel", 48.0),
    ("Women's Apparel", 52.0),
    ("Unisex Socks", 12.0),
];

const METHODS: [&str; 3] = ["In-store", "Online", "Outlet"];

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn generate_rows(n: usize, rng: &mut StdRng) -> Vec<Row> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid start date");
    (0..n)
        .map(|_| {
            let &(retailer, retailer_id) = pick(rng, &RETAILERS);
            let &(region, city) = pick(rng, &CITIES);
            let &(product, price) = pick(rng, &PRODUCTS);
            let units_sold: i64 = rng.gen_range(50..550);
            Row {
                retailer,
                retailer_id,
                invoice_date: start + Duration::days(rng.gen_range(0..731)),
                region,
                city,
                product,
                units_sold,
                total_sales: price * units_sold as f64,
                sales_method: *pick(rng, &METHODS),
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    let text = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Retailer", DataType::Utf8, false),
        Field::new("Retailer ID", DataType::Int64, false),
        Field::new("Invoice Date", DataType::Date32, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
        Field::new("Units Sold", DataType::Int64, false),
        Field::new("Total Sales", DataType::Float64, false),
        Field::new("Sales Method", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.retailer),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.retailer_id))),
        Arc::new(Date32Array::from_iter_values(
            rows.iter()
                .map(|r| (r.invoice_date - epoch).num_days() as i32),
        )),
        text(|r| r.region),
        text(|r| r.city),
        text(|r| r.product),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.units_sold))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.total_sales))),
        text(|r| r.sales_method),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Adidas US Sales Datasets.csv".to_string());
    let path = Path::new(&output_path);

    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate_rows(5000, &mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(path, &rows)?,
        _ => write_csv(path, &rows)?,
    }

    println!("Wrote {} sales records to {output_path}", rows.len());
    Ok(())
}
