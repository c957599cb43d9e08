//! Stable, type-aware ordering of the visible set.
//!
//! One column is active at a time. Cells that both parse as numbers compare
//! numerically, everything else compares case-insensitively; ties keep
//! their original relative order (the sort is stable, no tie-break key).

use std::cmp::Ordering;

use crate::model::{ColumnKey, TrackRecord};

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<ColumnKey>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Header-click semantics: a new column starts ascending, re-selecting
    /// the active column flips the direction.
    pub fn select(&mut self, key: ColumnKey) {
        if self.key == Some(key) {
            self.ascending = !self.ascending;
        } else {
            self.key = Some(key);
            self.ascending = true;
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.ascending = true;
    }
}

/// Order `visible` (indices into `records`) by the active sort column.
///
/// No-op when no column is selected.
pub fn apply(records: &[TrackRecord], visible: &mut [usize], state: &SortState) {
    let Some(key) = state.key else {
        return;
    };
    visible.sort_by(|&a, &b| {
        let ordering = compare_cells(&records[a].sort_value(key), &records[b].sort_value(key));
        if state.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Numeric when both operands parse as numbers, otherwise case-insensitive.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
