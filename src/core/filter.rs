use crate::core::record_store::RecordStore;
use std::collections::BTreeSet;

/// Case-insensitive substring match on hospital names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.needle)
    }

    pub fn apply(&self, store: &RecordStore) -> BTreeSet<usize> {
        store
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(&record.name))
            .map(|(row, _)| row)
            .collect()
    }

    /// Shown/hidden flag per row, in row order.
    pub fn visibility(&self, store: &RecordStore) -> Vec<bool> {
        store
            .records()
            .iter()
            .map(|record| self.matches(&record.name))
            .collect()
    }
}

pub fn filter(store: &RecordStore, query: &str) -> BTreeSet<usize> {
    NameFilter::new(query).apply(store)
}
