/// Data layer: core types, loading, classification, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable (text cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  column names, dates, amounts; classify each product
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<Dataset>, held until invalidated
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region × category selection → WorkingSubset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  reducers → DashboardView
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
