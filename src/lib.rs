//! Retail sales dashboard: load a sales table, classify products, filter by
//! region and category, and chart the aggregates with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
