use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Category / Gender – labels derived from the product text
// ---------------------------------------------------------------------------

/// Product category derived from the free-text `product` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Street Footwear")]
    StreetFootwear,
    Apparel,
    #[serde(rename = "Athletic Footwear")]
    AthleticFootwear,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::StreetFootwear,
        Category::Apparel,
        Category::AthleticFootwear,
        Category::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::StreetFootwear => "Street Footwear",
            Category::Apparel => "Apparel",
            Category::AthleticFootwear => "Athletic Footwear",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket label used wherever a record carries no gender.
pub const UNASSIGNED_GENDER: &str = "Unassigned";

// ---------------------------------------------------------------------------
// SalesRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One normalised and classified sales row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub retailer: String,
    pub region: String,
    pub city: String,
    pub product: String,
    pub invoice_date: NaiveDate,
    pub total_sales: f64,
    pub sales_method: String,
    pub category: Category,
    /// `None` when the product names neither men's nor women's lines.
    pub gender: Option<Gender>,
}

impl SalesRecord {
    /// Gender as shown in charts and tables, with the explicit unassigned bucket.
    pub fn gender_label(&self) -> &'static str {
        self.gender.map_or(UNASSIGNED_GENDER, Gender::label)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Counts of records the classifier could not fully label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub unknown_category: usize,
    pub unassigned_gender: usize,
}

/// The full normalised dataset with pre-computed filter options.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records in source order.
    pub records: Vec<SalesRecord>,
    regions: Vec<String>,
    categories: Vec<Category>,
    summary: ClassificationSummary,
}

impl Dataset {
    /// Build the distinct-value indices from classified records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut categories: Vec<Category> = Vec::new();
        let mut summary = ClassificationSummary::default();

        for rec in &records {
            if !regions.contains(&rec.region) {
                regions.push(rec.region.clone());
            }
            if !categories.contains(&rec.category) {
                categories.push(rec.category);
            }
            if rec.category == Category::Unknown {
                summary.unknown_category += 1;
            }
            if rec.gender.is_none() {
                summary.unassigned_gender += 1;
            }
        }

        Dataset {
            records,
            regions,
            categories,
            summary,
        }
    }

    /// Distinct regions in first-seen order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn summary(&self) -> ClassificationSummary {
        self.summary
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(
    region: &str,
    product: &str,
    date: (i32, u32, u32),
    total_sales: f64,
) -> SalesRecord {
    let (category, gender) = super::classify::classify(product);
    SalesRecord {
        retailer: "Foot Locker".to_string(),
        region: region.to_string(),
        city: "New York".to_string(),
        product: product.to_string(),
        invoice_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .expect("valid test date"),
        total_sales,
        sales_method: "Online".to_string(),
        category,
        gender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = Dataset::from_records(vec![
            record("West", "Men's Apparel", (2020, 1, 1), 1.0),
            record("Northeast", "Women's Street Footwear", (2020, 1, 2), 1.0),
            record("West", "Kids Hoodie", (2020, 1, 3), 1.0),
        ]);
        assert_eq!(ds.regions(), ["West", "Northeast"]);
        assert_eq!(
            ds.categories(),
            [Category::Apparel, Category::StreetFootwear, Category::Unknown]
        );
    }

    #[test]
    fn summary_counts_unclassified_records() {
        let ds = Dataset::from_records(vec![
            record("West", "Men's Apparel", (2020, 1, 1), 1.0),
            record("West", "Kids Hoodie", (2020, 1, 3), 1.0),
            record("West", "Unisex Apparel", (2020, 1, 3), 1.0),
        ]);
        assert_eq!(
            ds.summary(),
            ClassificationSummary {
                unknown_category: 1,
                unassigned_gender: 2,
            }
        );
    }

    #[test]
    fn missing_gender_renders_as_unassigned() {
        let rec = record("West", "Kids Hoodie", (2020, 1, 1), 1.0);
        assert_eq!(rec.gender_label(), UNASSIGNED_GENDER);
    }
}
