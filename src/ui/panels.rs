use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::write_csv;
use crate::data::model::Category;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Regions ----
            let header_text = format!(
                "Region  ({}/{})",
                state.selection.regions.len(),
                dataset.regions().len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("region_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_regions();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_regions();
                        }
                    });

                    for region in dataset.regions() {
                        let mut checked = state.selection.regions.contains(region);
                        let text = RichText::new(region).color(state.region_colors.color_for(region));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_region(region);
                        }
                    }
                });

            // ---- Categories ----
            let header_text = format!(
                "Product Category  ({}/{})",
                state.selection.categories.len(),
                dataset.categories().len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("category_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_categories();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_categories();
                        }
                    });

                    for &category in dataset.categories() {
                        category_checkbox(ui, state, category);
                    }
                });
        });
}

fn category_checkbox(ui: &mut Ui, state: &mut AppState, category: Category) {
    let mut checked = state.selection.categories.contains(&category);
    let text = RichText::new(category.label())
        .color(state.category_colors.color_for(category.label()));
    if ui.checkbox(&mut checked, text).changed() {
        state.toggle_category(category);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = !state.visible_indices.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export visible rows…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui.button("Reload").clicked() {
            state.reload();
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));

            let summary = ds.summary();
            if summary.unknown_category > 0 || summary.unassigned_gender > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "{} unknown category, {} unassigned gender",
                        summary.unknown_category, summary.unassigned_gender
                    ))
                    .color(Color32::YELLOW),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export visible rows")
        .add_filter("CSV", &["csv"])
        .set_file_name("sales_selection.csv")
        .save_file();

    let Some(path) = file else {
        return;
    };
    let result = match state.working_subset() {
        Some(subset) => write_csv(&path, &subset),
        None => return,
    };
    match result {
        Ok(_) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
