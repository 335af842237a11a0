use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::filter::WorkingSubset;
use super::model::SalesRecord;

// ---------------------------------------------------------------------------
// Dimension – a categorical field to group by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Product,
    City,
    Retailer,
    Region,
    Category,
    SalesMethod,
    Gender,
}

impl Dimension {
    /// Group key of a record. Missing gender maps to its own bucket.
    pub fn key_of(self, record: &SalesRecord) -> &str {
        match self {
            Dimension::Product => &record.product,
            Dimension::City => &record.city,
            Dimension::Retailer => &record.retailer,
            Dimension::Region => &record.region,
            Dimension::Category => record.category.label(),
            Dimension::SalesMethod => &record.sales_method,
            Dimension::Gender => record.gender_label(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Product => "Product",
            Dimension::City => "City",
            Dimension::Retailer => "Retailer",
            Dimension::Region => "Region",
            Dimension::Category => "Category",
            Dimension::SalesMethod => "Sales Method",
            Dimension::Gender => "Gender",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

pub fn total_sales(subset: &WorkingSubset<'_>) -> f64 {
    subset.iter().map(|r| r.total_sales).sum()
}

/// Sum of sales invoiced in `year`.
pub fn total_sales_by_year(subset: &WorkingSubset<'_>, year: i32) -> f64 {
    subset
        .iter()
        .filter(|r| r.invoice_date.year() == year)
        .map(|r| r.total_sales)
        .sum()
}

/// Daily totals, ascending by date.
pub fn total_sales_over_time(subset: &WorkingSubset<'_>) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in subset.iter() {
        *by_date.entry(r.invoice_date).or_default() += r.total_sales;
    }
    by_date.into_iter().collect()
}

/// Totals per calendar month (1..=12) across all years.
pub fn total_sales_by_month(subset: &WorkingSubset<'_>) -> BTreeMap<u32, f64> {
    let mut by_month = BTreeMap::new();
    for r in subset.iter() {
        *by_month.entry(r.invoice_date.month()).or_default() += r.total_sales;
    }
    by_month
}

pub fn sum_by_dimension(subset: &WorkingSubset<'_>, dimension: Dimension) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in subset.iter() {
        let key = dimension.key_of(r);
        match sums.get_mut(key) {
            Some(sum) => *sum += r.total_sales,
            None => {
                sums.insert(key.to_string(), r.total_sales);
            }
        }
    }
    sums
}

/// Totals keyed by `(primary, secondary)`, e.g. city split by region.
pub fn sum_by_dimensions(
    subset: &WorkingSubset<'_>,
    primary: Dimension,
    secondary: Dimension,
) -> BTreeMap<(String, String), f64> {
    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    for r in subset.iter() {
        let key = (primary.key_of(r).to_string(), secondary.key_of(r).to_string());
        *sums.entry(key).or_default() += r.total_sales;
    }
    sums
}

/// Highest-selling value of a dimension. Ties go to the first key in sort order.
pub fn top_by_dimension(subset: &WorkingSubset<'_>, dimension: Dimension) -> Option<(String, f64)> {
    sum_by_dimension(subset, dimension)
        .into_iter()
        .fold(None, |best, (key, sum)| match best {
            Some((_, top)) if top >= sum => best,
            _ => Some((key, sum)),
        })
}

// ---------------------------------------------------------------------------
// DashboardView – everything the presentation layer draws
// ---------------------------------------------------------------------------

/// Years shown as KPI tiles, newest first.
pub const KPI_YEARS: [i32; 2] = [2021, 2020];

/// Pre-aggregated inputs for every tile and chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub record_count: usize,
    pub total_sales: f64,
    pub sales_by_year: Vec<(i32, f64)>,
    pub top_product: Option<(String, f64)>,
    pub top_city: Option<(String, f64)>,
    pub over_time: Vec<(NaiveDate, f64)>,
    pub by_month: BTreeMap<u32, f64>,
    pub by_product: BTreeMap<String, f64>,
    pub by_city_region: BTreeMap<(String, String), f64>,
    pub by_retailer_category: BTreeMap<(String, String), f64>,
    pub by_category: BTreeMap<String, f64>,
    pub by_channel: BTreeMap<String, f64>,
    pub by_gender: BTreeMap<String, f64>,
}

impl DashboardView {
    pub fn compute(subset: &WorkingSubset<'_>) -> Self {
        DashboardView {
            record_count: subset.len(),
            total_sales: total_sales(subset),
            sales_by_year: KPI_YEARS
                .iter()
                .map(|&y| (y, total_sales_by_year(subset, y)))
                .collect(),
            top_product: top_by_dimension(subset, Dimension::Product),
            top_city: top_by_dimension(subset, Dimension::City),
            over_time: total_sales_over_time(subset),
            by_month: total_sales_by_month(subset),
            by_product: sum_by_dimension(subset, Dimension::Product),
            by_city_region: sum_by_dimensions(subset, Dimension::City, Dimension::Region),
            by_retailer_category: sum_by_dimensions(
                subset,
                Dimension::Retailer,
                Dimension::Category,
            ),
            by_category: sum_by_dimension(subset, Dimension::Category),
            by_channel: sum_by_dimension(subset, Dimension::SalesMethod),
            by_gender: sum_by_dimension(subset, Dimension::Gender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};
    use crate::data::model::{record, Dataset, UNASSIGNED_GENDER};

    fn two_rows() -> Dataset {
        Dataset::from_records(vec![
            record("West", "Men's Street Footwear", (2020, 1, 1), 100.0),
            record("South", "Women's Apparel", (2021, 6, 1), 50.0),
        ])
    }

    fn mixed() -> Dataset {
        Dataset::from_records(vec![
            record("West", "Men's Street Footwear", (2020, 1, 1), 100.0),
            record("South", "Women's Apparel", (2021, 6, 1), 50.0),
            record("West", "Kids Hoodie", (2021, 6, 1), 25.0),
            record("South", "Men's Street Footwear", (2020, 1, 1), 12.5),
            record("West", "Women's Athletic Footwear", (2021, 12, 31), 7.5),
        ])
    }

    #[test]
    fn totals_per_year() {
        let ds = two_rows();
        let all = WorkingSubset::full(&ds);
        assert_eq!(total_sales_by_year(&all, 2020), 100.0);
        assert_eq!(total_sales_by_year(&all, 2021), 50.0);
        assert_eq!(total_sales_by_year(&all, 2019), 0.0);
    }

    #[test]
    fn sums_by_gender() {
        let ds = two_rows();
        let by_gender = sum_by_dimension(&WorkingSubset::full(&ds), Dimension::Gender);
        assert_eq!(
            by_gender,
            BTreeMap::from([("Men".to_string(), 100.0), ("Women".to_string(), 50.0)])
        );
    }

    #[test]
    fn unassigned_gender_gets_its_own_bucket() {
        let ds = mixed();
        let all = WorkingSubset::full(&ds);
        let by_gender = sum_by_dimension(&all, Dimension::Gender);
        assert_eq!(by_gender.get(UNASSIGNED_GENDER), Some(&25.0));
        assert_eq!(by_gender.values().sum::<f64>(), total_sales(&all));
    }

    #[test]
    fn unknown_category_is_counted() {
        let ds = mixed();
        let by_cat = sum_by_dimension(&WorkingSubset::full(&ds), Dimension::Category);
        assert_eq!(by_cat.get("Unknown"), Some(&25.0));
        assert_eq!(by_cat.get("Street Footwear"), Some(&112.5));
    }

    #[test]
    fn over_time_is_sorted_and_conserves_total() {
        let ds = mixed();
        let all = WorkingSubset::full(&ds);
        let series = total_sales_over_time(&all);
        let dates: Vec<NaiveDate> = series.iter().map(|(d, _)| *d).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].1, 112.5);
        let sum: f64 = series.iter().map(|(_, v)| v).sum();
        assert_eq!(sum, total_sales(&all));
    }

    #[test]
    fn conservation_holds_for_filtered_subsets() {
        let ds = mixed();
        for region in ["West", "South"] {
            let sel = FilterSelection {
                regions: [region.to_string()].into(),
                ..FilterSelection::all(&ds)
            };
            let subset = filter(&ds, &sel);
            let sum: f64 = total_sales_over_time(&subset).iter().map(|(_, v)| v).sum();
            assert_eq!(sum, total_sales(&subset));
        }
    }

    #[test]
    fn months_merge_across_years() {
        let ds = mixed();
        let by_month = total_sales_by_month(&WorkingSubset::full(&ds));
        assert_eq!(
            by_month,
            BTreeMap::from([(1, 112.5), (6, 75.0), (12, 7.5)])
        );
    }

    #[test]
    fn split_by_second_dimension() {
        let ds = mixed();
        let split = sum_by_dimensions(
            &WorkingSubset::full(&ds),
            Dimension::Product,
            Dimension::Region,
        );
        assert_eq!(
            split.get(&("Men's Street Footwear".to_string(), "West".to_string())),
            Some(&100.0)
        );
        assert_eq!(
            split.get(&("Men's Street Footwear".to_string(), "South".to_string())),
            Some(&12.5)
        );
        assert_eq!(split.len(), 5);
    }

    #[test]
    fn top_value_wins() {
        let ds = mixed();
        let all = WorkingSubset::full(&ds);
        assert_eq!(
            top_by_dimension(&all, Dimension::Product),
            Some(("Men's Street Footwear".to_string(), 112.5))
        );
        assert_eq!(
            top_by_dimension(&all, Dimension::Region),
            Some(("West".to_string(), 132.5))
        );
    }

    #[test]
    fn empty_subset_degrades_to_empty_outputs() {
        let ds = mixed();
        let mut sel = FilterSelection::all(&ds);
        sel.regions.clear();
        let empty = filter(&ds, &sel);

        assert_eq!(total_sales_by_year(&empty, 2020), 0.0);
        assert!(total_sales_over_time(&empty).is_empty());
        assert!(total_sales_by_month(&empty).is_empty());
        assert!(sum_by_dimension(&empty, Dimension::Gender).is_empty());
        assert!(sum_by_dimensions(&empty, Dimension::City, Dimension::Region).is_empty());
        assert_eq!(top_by_dimension(&empty, Dimension::City), None);

        let view = DashboardView::compute(&empty);
        assert_eq!(view.record_count, 0);
        assert_eq!(view.total_sales, 0.0);
        assert_eq!(view.sales_by_year, vec![(2021, 0.0), (2020, 0.0)]);
    }

    #[test]
    fn view_collects_every_series() {
        let ds = mixed();
        let view = DashboardView::compute(&WorkingSubset::full(&ds));
        assert_eq!(view.record_count, 5);
        assert_eq!(view.sales_by_year, vec![(2021, 82.5), (2020, 112.5)]);
        assert_eq!(view.top_city, Some(("New York".to_string(), 195.0)));
        assert_eq!(view.by_channel.get("Online"), Some(&195.0));
        assert_eq!(view.by_gender.len(), 3);
    }
}
