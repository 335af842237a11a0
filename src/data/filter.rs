use std::collections::BTreeSet;

use super::model::{Category, Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Filter selection: which regions and categories are shown
// ---------------------------------------------------------------------------

/// Selected values per filter dimension.
///
/// An empty set means nothing is selected and filters everything out;
/// there is no implicit "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<Category>,
}

impl FilterSelection {
    /// Every distinct region and category of the dataset (the default view).
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            regions: dataset.regions().iter().cloned().collect(),
            categories: dataset.categories().iter().copied().collect(),
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.regions.contains(&record.region) && self.categories.contains(&record.category)
    }
}

// ---------------------------------------------------------------------------
// Working subset
// ---------------------------------------------------------------------------

/// Borrowed view of the records passing the current selection, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct WorkingSubset<'a> {
    records: Vec<&'a SalesRecord>,
}

impl<'a> WorkingSubset<'a> {
    /// The whole dataset, unfiltered.
    pub fn full(dataset: &'a Dataset) -> Self {
        WorkingSubset {
            records: dataset.records.iter().collect(),
        }
    }

    /// Rebuild a subset from indices previously returned by [`filtered_indices`].
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        WorkingSubset {
            records: indices
                .iter()
                .filter_map(|&i| dataset.records.get(i))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Return indices of records that pass the selection.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    if selection.regions.is_empty() || selection.categories.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Apply the selection to the dataset without touching it.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> WorkingSubset<'a> {
    WorkingSubset::from_indices(dataset, &filtered_indices(dataset, selection))
}
