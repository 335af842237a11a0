use std::collections::BTreeMap;
use std::f32::consts::TAU;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::ColorMap;
use crate::data::aggregate::DashboardView;
use crate::state::AppState;
use crate::ui::kpi::format_currency;

const CHART_HEIGHT: f32 = 260.0;
const BAR_COLOR: Color32 = Color32::LIGHT_BLUE;
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render every chart from the precomputed view.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    ui.heading("Total Sales Over Time");
    sales_over_time(ui, view);
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("Sales by Product");
        category_bars(&mut cols[0], "by_product", &view.by_product);
        cols[1].heading("Sales by City");
        stacked_bars(&mut cols[1], "by_city", &view.by_city_region, &state.region_colors);
    });
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("Sales by Retailer");
        stacked_bars(
            &mut cols[0],
            "by_retailer",
            &view.by_retailer_category,
            &state.category_colors,
        );
        cols[1].heading("Monthly Trend in Sales");
        monthly_trend(&mut cols[1], &view.by_month);
    });
    ui.separator();

    ui.columns(3, |cols: &mut [Ui]| {
        cols[0].heading("Sales by Category");
        let colors = &state.category_colors;
        pie_chart(&mut cols[0], &view.by_category, |label| colors.color_for(label), false);
        cols[1].heading("Sales by Channel");
        let channel_colors = ColorMap::new(view.by_channel.keys().map(String::as_str));
        pie_chart(
            &mut cols[1],
            &view.by_channel,
            |label| channel_colors.color_for(label),
            true,
        );
        cols[2].heading("Sales by Gender");
        let gender_colors = ColorMap::new(view.by_gender.keys().map(String::as_str));
        pie_chart(
            &mut cols[2],
            &view.by_gender,
            |label| gender_colors.color_for(label),
            false,
        );
    });
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

fn sales_over_time(ui: &mut Ui, view: &DashboardView) {
    let points: PlotPoints = view
        .over_time
        .iter()
        .map(|(date, total)| [date.num_days_from_ce() as f64, *total])
        .collect();

    Plot::new("over_time")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .y_axis_label("Total Sales")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Total Sales").color(BAR_COLOR).width(1.5));
        });
}

fn date_label(days_from_ce: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days_from_ce.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Label for an integer tick; off-grid or out-of-range ticks stay blank.
fn tick_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if value < 0.0 || (value - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn category_bars(ui: &mut Ui, id: &str, sums: &BTreeMap<String, f64>) {
    let labels: Vec<String> = sums.keys().cloned().collect();
    let bars: Vec<Bar> = sums
        .iter()
        .enumerate()
        .map(|(i, (label, total))| Bar::new(i as f64, *total).name(label).width(0.7))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Total Sales"));
        });
}

fn monthly_trend(ui: &mut Ui, by_month: &BTreeMap<u32, f64>) {
    let bars: Vec<Bar> = by_month
        .iter()
        .map(|(&month, total)| {
            Bar::new(month as f64, *total)
                .name(MONTHS[(month as usize - 1) % 12])
                .width(0.7)
        })
        .collect();

    Plot::new("by_month")
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_label("Month")
        .y_axis_label("Total Sales")
        .x_axis_formatter(|mark, _range| {
            let m = mark.value.round();
            if (1.0..=12.0).contains(&m) && (mark.value - m).abs() < 1e-6 {
                MONTHS[m as usize - 1].to_string()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Total Sales"));
        });
}

/// Primary keys in order plus one value column per secondary key.
pub fn stack_series(
    split: &BTreeMap<(String, String), f64>,
) -> (Vec<String>, Vec<(String, Vec<f64>)>) {
    let mut primaries: Vec<String> = Vec::new();
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for (primary, _) in split.keys() {
        if primaries.last() != Some(primary) {
            primaries.push(primary.clone());
        }
    }
    for ((primary, secondary), total) in split {
        let Ok(pos) = primaries.binary_search(primary) else {
            continue;
        };
        series
            .entry(secondary.clone())
            .or_insert_with(|| vec![0.0; primaries.len()])[pos] += total;
    }
    (primaries, series.into_iter().collect())
}

fn stacked_bars(
    ui: &mut Ui,
    id: &str,
    split: &BTreeMap<(String, String), f64>,
    colors: &ColorMap,
) {
    let (labels, series) = stack_series(split);

    let mut charts: Vec<BarChart> = Vec::with_capacity(series.len());
    for (name, values) in &series {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Bar::new(i as f64, *v).width(0.7))
            .collect();
        let mut chart = BarChart::new(bars).name(name).color(colors.color_for(name));
        {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart = chart.stack_on(&below);
        }
        charts.push(chart);
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Pie / donut
// ---------------------------------------------------------------------------

/// Slices as `(label, fraction)`; zero and negative totals are left out.
pub fn pie_slices(sums: &BTreeMap<String, f64>) -> Vec<(String, f64)> {
    let total: f64 = sums.values().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    sums.iter()
        .filter(|(_, v)| **v > 0.0)
        .map(|(label, v)| (label.clone(), v / total))
        .collect()
}

fn pie_chart(
    ui: &mut Ui,
    sums: &BTreeMap<String, f64>,
    color_for: impl Fn(&str) -> Color32,
    donut: bool,
) {
    let slices = pie_slices(sums);
    if slices.is_empty() {
        ui.label("No sales in the current selection.");
        return;
    }

    let side = ui.available_width().min(CHART_HEIGHT * 0.7);
    let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = side * 0.48;

    let mut start = -TAU / 4.0;
    for (label, fraction) in &slices {
        let sweep = *fraction as f32 * TAU;
        let steps = ((fraction * 96.0).ceil() as usize).max(2);
        let color = color_for(label);
        let point = |a: f32| Pos2::new(center.x + radius * a.cos(), center.y + radius * a.sin());

        // Thin wedges keep every polygon convex.
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point(a0), point(a1)],
                color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }

    if donut {
        painter.circle_filled(center, radius * 0.5, ui.visuals().panel_fill);
    }

    let _ = response.on_hover_ui(|ui: &mut Ui| {
        for (label, total) in sums {
            ui.label(format!("{label}: {}", format_currency(*total)));
        }
    });

    for (label, fraction) in &slices {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("■").color(color_for(label)));
            ui.label(format!("{label}  {:.1}%", fraction * 100.0));
        });
    }
}
