use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::kpi::format_currency;

const HEADERS: [&str; 9] = [
    "Retailer",
    "Region",
    "City",
    "Product",
    "Invoice Date",
    "Total Sales",
    "Sales Method",
    "Category",
    "Gender",
];

/// "Display data" / "Hide" toggle with the raw visible records underneath.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    let label = if state.show_table { "Hide" } else { "Display data" };
    if ui.button(label).clicked() {
        state.show_table = !state.show_table;
    }
    if !state.show_table {
        return;
    }

    let Some(subset) = state.working_subset() else {
        return;
    };
    let records: Vec<_> = subset.iter().collect();

    TableBuilder::new(ui)
        .id_salt("raw_records")
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(70.0), HEADERS.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(320.0)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = records[row.index()];
                let cells = [
                    rec.retailer.clone(),
                    rec.region.clone(),
                    rec.city.clone(),
                    rec.product.clone(),
                    rec.invoice_date.format("%Y-%m-%d").to_string(),
                    format_currency(rec.total_sales),
                    rec.sales_method.clone(),
                    rec.category.to_string(),
                    rec.gender_label().to_string(),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
