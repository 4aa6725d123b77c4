//! The top-level dashboard session.
//!
//! A [`DashboardSession`] owns the loaded dataset and the selection store
//! and exposes the one derivation surface the presentation layer needs:
//! recompute the [`AggregatedSeries`] for the current selection. Everything
//! here is single-threaded and event-driven; mutations arrive through
//! [`DashboardSession::apply`] and recomputation is a pure re-derivation.

use std::path::Path;

use crate::aggregate::AggregatedSeries;
use crate::dataset::ImpactDataset;
use crate::selection::SelectionState;
use crate::store::{SelectionAction, SelectionStore, SelectionWatch};

/// Owns the dataset and selection for one page load.
#[derive(Debug)]
pub struct DashboardSession {
    dataset: ImpactDataset,
    store: SelectionStore,
}

impl DashboardSession {
    /// Creates a session over an already-loaded dataset and initial state.
    ///
    /// Runs the one-time constituency resolution so a provisional ref from
    /// the URL picks up its display name immediately.
    #[must_use]
    pub fn new(dataset: ImpactDataset, state: SelectionState) -> Self {
        let mut store = SelectionStore::new(state);
        store.resolve_constituency(&dataset);
        Self { dataset, store }
    }

    /// Boots a session from a dataset path and the page's query string.
    ///
    /// A failed load degrades to an empty dataset (logged, not fatal); the
    /// query string decodes through the usual tolerance rules.
    #[must_use]
    pub fn boot(dataset_path: impl AsRef<Path>, query: &str) -> Self {
        Self::new(
            ImpactDataset::load_or_empty(dataset_path),
            SelectionState::from_query(query),
        )
    }

    /// The loaded dataset.
    #[must_use]
    pub const fn dataset(&self) -> &ImpactDataset {
        &self.dataset
    }

    /// The current selection.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        self.store.state()
    }

    /// The canonical query string for the current selection. The caller
    /// writes this back to the URL, replacing it in place.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.store.query_string()
    }

    /// Subscribes to selection changes.
    #[must_use]
    pub fn subscribe(&mut self) -> SelectionWatch {
        self.store.subscribe()
    }

    /// Applies a selection mutation. Returns the freshly derived series if
    /// the state changed, `None` for a no-op.
    pub fn apply(&mut self, action: SelectionAction) -> Option<AggregatedSeries> {
        if self.store.apply(action) {
            Some(self.series())
        } else {
            None
        }
    }

    /// Replaces the dataset (e.g. after a late fetch completes), re-running
    /// the one-time constituency resolution against the new rows.
    pub fn replace_dataset(&mut self, dataset: ImpactDataset) {
        self.dataset = dataset;
        self.store.resolve_constituency(&self.dataset);
    }

    /// Derives the full series bundle for the current selection.
    ///
    /// Pure and idempotent; calling it redundantly is safe.
    #[must_use]
    pub fn series(&self) -> AggregatedSeries {
        AggregatedSeries::compute(&self.dataset, self.store.state())
    }
}
