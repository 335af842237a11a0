use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::DashboardView;
use crate::data::cache::DatasetCache;
use crate::data::filter::{filtered_indices, FilterSelection, WorkingSubset};
use crate::data::model::{Category, Dataset};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Source of the dataset; owns the only read of the file.
    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Current region / category selection.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates for the visible records, recomputed on every change.
    pub view: DashboardView,

    /// Stable colours for regions and categories across charts.
    pub region_colors: ColorMap,
    pub category_colors: ColorMap,

    /// Whether the raw-table view is expanded.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    last_stale_check: Instant,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        Self {
            config,
            cache,
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            view: DashboardView::default(),
            region_colors: ColorMap::default(),
            category_colors: ColorMap::default(),
            show_table: false,
            status_message: None,
            last_stale_check: Instant::now(),
        }
    }

    pub fn data_path(&self) -> &Path {
        self.cache.path()
    }

    /// Load the configured file through the cache and show everything.
    pub fn load(&mut self) {
        match self.cache.get() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report_error(&e),
        }
    }

    /// Switch to another file with the same schema. The current file and
    /// dataset stay in place unless the new one loads.
    pub fn open(&mut self, path: PathBuf) {
        let mut cache = DatasetCache::new(path);
        match cache.get() {
            Ok(dataset) => {
                self.cache = cache;
                self.set_dataset(dataset);
            }
            Err(e) => self.report_error_for(cache.path(), &e),
        }
    }

    /// Re-read the current file regardless of its modification time.
    pub fn reload(&mut self) {
        match self.cache.reload() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report_error(&e),
        }
    }

    /// Poll the source file; reload it if it changed since the last load.
    pub fn check_for_changes(&mut self) {
        if self.last_stale_check.elapsed() < self.config.stale_check_interval {
            return;
        }
        self.last_stale_check = Instant::now();
        match self.cache.reload_if_changed() {
            Ok(None) => {}
            Ok(Some(dataset)) => self.set_dataset(dataset),
            Err(e) => self.report_error(&e),
        }
    }

    fn report_error(&mut self, e: &DashboardError) {
        let path = self.cache.path().to_path_buf();
        self.report_error_for(&path, e);
    }

    fn report_error_for(&mut self, path: &Path, e: &DashboardError) {
        log::error!("Failed to load {}: {e}", path.display());
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.region_colors = ColorMap::new(dataset.regions().iter().map(String::as_str));
        self.category_colors = ColorMap::new(dataset.categories().iter().map(|c| c.label()));
        self.selection = FilterSelection::all(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Replace the whole selection and redraw from it.
    pub fn on_filter_change(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.recompute();
    }

    /// Run filter → aggregate once for the current selection.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible_indices.clear();
            self.view = DashboardView::default();
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.selection);
        let subset = WorkingSubset::from_indices(ds, &self.visible_indices);
        self.view = DashboardView::compute(&subset);
        log::debug!(
            "Recomputed view: {} of {} records, total {:.2}",
            self.view.record_count,
            ds.len(),
            self.view.total_sales
        );
    }

    /// The records currently shown, in dataset order.
    pub fn working_subset(&self) -> Option<WorkingSubset<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| WorkingSubset::from_indices(ds, &self.visible_indices))
    }

    /// Toggle a single region in the selection.
    pub fn toggle_region(&mut self, region: &str) {
        let mut selection = self.selection.clone();
        if !selection.regions.remove(region) {
            selection.regions.insert(region.to_string());
        }
        self.on_filter_change(selection);
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: Category) {
        let mut selection = self.selection.clone();
        if !selection.categories.remove(&category) {
            selection.categories.insert(category);
        }
        self.on_filter_change(selection);
    }

    /// Select every region and keep categories as they are.
    pub fn select_all_regions(&mut self) {
        if let Some(ds) = &self.dataset {
            let selection = FilterSelection {
                regions: FilterSelection::all(ds).regions,
                ..self.selection.clone()
            };
            self.on_filter_change(selection);
        }
    }

    pub fn select_no_regions(&mut self) {
        let mut selection = self.selection.clone();
        selection.regions.clear();
        self.on_filter_change(selection);
    }

    pub fn select_all_categories(&mut self) {
        if let Some(ds) = &self.dataset {
            let selection = FilterSelection {
                categories: FilterSelection::all(ds).categories,
                ..self.selection.clone()
            };
            self.on_filter_change(selection);
        }
    }

    pub fn select_no_categories(&mut self) {
        let mut selection = self.selection.clone();
        selection.categories.clear();
        self.on_filter_change(selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn state_with_data() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Arc::new(Dataset::from_records(vec![
            record("West", "Men's Street Footwear", (2020, 1, 1), 100.0),
            record("South", "Women's Apparel", (2021, 6, 1), 50.0),
            record("West", "Kids Hoodie", (2021, 6, 2), 25.0),
        ])));
        state
    }

    #[test]
    fn new_dataset_shows_everything() {
        let state = state_with_data();
        assert_eq!(state.visible_indices, [0, 1, 2]);
        assert_eq!(state.view.total_sales, 175.0);
        assert_eq!(state.working_subset().map(|s| s.len()), Some(3));
    }

    #[test]
    fn toggling_a_region_recomputes() {
        let mut state = state_with_data();
        state.toggle_region("West");
        assert_eq!(state.visible_indices, [1]);
        assert_eq!(state.view.total_sales, 50.0);

        state.toggle_region("West");
        assert_eq!(state.visible_indices, [0, 1, 2]);
    }

    #[test]
    fn toggling_a_category_recomputes() {
        let mut state = state_with_data();
        state.toggle_category(Category::Unknown);
        assert_eq!(state.visible_indices, [0, 1]);
        assert!(!state.view.by_gender.contains_key("Unassigned"));
    }

    #[test]
    fn deselecting_all_gives_an_empty_view() {
        let mut state = state_with_data();
        state.select_no_categories();
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.view.record_count, 0);
        assert!(state.view.over_time.is_empty());

        state.select_all_categories();
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn region_buttons_leave_categories_alone() {
        let mut state = state_with_data();
        state.toggle_category(Category::Apparel);
        state.select_no_regions();
        state.select_all_regions();
        assert!(!state.selection.categories.contains(&Category::Apparel));
        assert_eq!(state.visible_indices, [0, 2]);
    }

    #[test]
    fn failed_load_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(DashboardConfig {
            data_path: dir.path().join("missing.csv"),
            ..DashboardConfig::default()
        });
        state.load();
        assert!(state.dataset.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error:")));
    }

    const CSV: &str = "Retailer,Region,City,Product,Invoice Date,Total Sales,Sales Method\n\
        Foot Locker,Northeast,New York,Men's Street Footwear,1/1/2020,100,In-store\n";

    #[test]
    fn failed_open_keeps_current_file_and_data() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("sales.csv");
        std::fs::write(&good, CSV).unwrap();
        let mut state = AppState::new(DashboardConfig {
            data_path: good.clone(),
            ..DashboardConfig::default()
        });
        state.load();
        let loaded = state.dataset.clone().expect("loaded");

        state.open(dir.path().join("other.csv"));

        assert_eq!(state.data_path(), good.as_path());
        assert!(state
            .dataset
            .as_ref()
            .is_some_and(|ds| Arc::ptr_eq(ds, &loaded)));
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error:")));

        let other = dir.path().join("other.csv");
        std::fs::write(&other, CSV).unwrap();
        state.open(other.clone());
        assert_eq!(state.data_path(), other.as_path());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_reload_keeps_showing_old_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = AppState::new(DashboardConfig {
            data_path: path.clone(),
            ..DashboardConfig::default()
        });
        state.load();

        let broken = "Walmart,South,Houston,Women's Apparel,never,5,Online\n";
        std::fs::write(&path, format!("{CSV}{broken}")).unwrap();
        state.reload();

        assert_eq!(state.view.record_count, 1);
        assert!(state.status_message.is_some());
    }
}
