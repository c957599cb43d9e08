//! The grid session: one owner for all mutable grid state.
//!
//! Records, column catalog, active filters, and sort state live here, and
//! every mutating operation funnels through [`GridSession::refresh`] - no
//! caller recomputes visibility on its own. The visible set is a list of
//! indices into the record snapshot, recomputed as filter -> sort on each
//! refresh.

use tracing::debug;

use crate::delimited::{self, Delimiter};
use crate::error::Result;
use crate::grid::columns::ColumnCatalog;
use crate::grid::filter::{self, FilterRule, FilterSet};
use crate::grid::sort::{self, SortState};
use crate::model::{ColumnKey, TrackRecord};

/// In-memory grid over one snapshot of records.
#[derive(Debug, Default)]
pub struct GridSession {
    records: Vec<TrackRecord>,
    catalog: ColumnCatalog,
    filters: FilterSet,
    sort: SortState,
    visible: Vec<usize>,
}

impl GridSession {
    pub fn new(records: Vec<TrackRecord>) -> Self {
        let mut session = Self {
            records,
            catalog: ColumnCatalog::default(),
            filters: FilterSet::default(),
            sort: SortState::default(),
            visible: Vec::new(),
        };
        session.refresh();
        session
    }

    /// Recompute the visible set: filter, then sort.
    ///
    /// The single control point; every mutating operation below ends here.
    pub fn refresh(&mut self) {
        self.visible = filter::apply(&self.records, &self.filters);
        sort::apply(&self.records, &mut self.visible, &self.sort);
        debug!(
            target: "grid::session",
            total = self.records.len(),
            visible = self.visible.len(),
            rules = self.filters.rule_count(),
            "refreshed"
        );
    }

    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    /// The filtered, sorted records in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &TrackRecord> {
        self.visible.iter().map(|&index| &self.records[index])
    }

    /// Displayed item count.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    // ------------------------------------------------------------------
    // Mutating operations - each one re-enters refresh()
    // ------------------------------------------------------------------

    /// Add a filter rule to a column.
    pub fn push_rule(&mut self, key: ColumnKey, rule: FilterRule) {
        self.filters.push(key, rule);
        self.refresh();
    }

    /// Drop all rules on one column.
    pub fn clear_rules(&mut self, key: ColumnKey) {
        self.filters.clear_column(key);
        self.refresh();
    }

    /// Drop every rule.
    pub fn clear_all_rules(&mut self) {
        self.filters.clear();
        self.refresh();
    }

    /// Sort-header click: new column sorts ascending, same column toggles.
    pub fn sort_on(&mut self, key: ColumnKey) {
        self.sort.select(key);
        self.refresh();
    }

    /// Set the sort state outright (CLI path).
    pub fn set_sort(&mut self, state: SortState) {
        self.sort = state;
        self.refresh();
    }

    pub fn toggle_column(&mut self, key: ColumnKey) -> bool {
        let found = self.catalog.toggle_visibility(key);
        self.refresh();
        found
    }

    pub fn reorder_columns(&mut self, ordered_keys: &[ColumnKey]) {
        self.catalog.reorder(ordered_keys);
        self.refresh();
    }

    /// Confirm a customization draft (see [`ColumnCatalog::snapshot`]).
    pub fn commit_columns(&mut self, new_catalog: ColumnCatalog) {
        self.catalog.commit(new_catalog);
        self.refresh();
    }

    /// Export the visible set for the selected columns.
    pub fn export(&self, selected: &[ColumnKey], delimiter: Delimiter) -> Result<String> {
        let visible: Vec<&TrackRecord> = self.visible_records().collect();
        delimited::export(&visible, selected, delimiter)
    }

    /// Parse delimited text and replace the record set wholesale.
    ///
    /// On error the session is untouched; on success the pipeline re-runs
    /// and the imported count is returned.
    pub fn import(&mut self, text: &str, delimiter: Delimiter) -> Result<usize> {
        let records = delimited::import(text, delimiter)?;
        let count = records.len();
        self.records = records;
        self.refresh();
        Ok(count)
    }
}
