use eframe::egui::{self, RichText, Ui};

use crate::data::aggregate::DashboardView;

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

/// Render the row of headline tiles above the charts.
pub fn kpi_row(ui: &mut Ui, view: &DashboardView) {
    let mut tiles: Vec<(String, String)> = view
        .sales_by_year
        .iter()
        .map(|(year, total)| (format!("Total Sales in {year}"), format_currency(*total)))
        .collect();
    tiles.push((
        "Most Valuable Product".to_string(),
        top_label(view.top_product.as_ref()),
    ));
    tiles.push((
        "Most Valuable Market".to_string(),
        top_label(view.top_city.as_ref()),
    ));

    ui.columns(tiles.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(&tiles) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(title).strong());
                ui.label(RichText::new(value).size(22.0));
            });
        }
    });
}

fn top_label(top: Option<&(String, f64)>) -> String {
    top.map_or_else(|| "–".to_string(), |(name, _)| name.clone())
}

/// `1234567.891` → `$1,234,567.89`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
