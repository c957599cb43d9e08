//! Column catalog: which attributes are shown, in what order.
//!
//! The ordered column list is both the render order and the customization
//! state. Mutations go through the three controller operations
//! (`toggle_visibility`, `reorder`, `commit`); UI surfaces that need an
//! independent working copy take a `snapshot` and commit it back atomically.

use crate::model::{ColumnKey, ValueType};

/// A display/behavior descriptor bound to one record attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: ColumnKey,
    pub label: String,
    pub visible: bool,
}

impl Column {
    pub fn new(key: ColumnKey, visible: bool) -> Self {
        Self {
            key,
            label: key.label().to_string(),
            visible,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.key.value_type()
    }
}

/// The ordered, mutable set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCatalog {
    columns: Vec<Column>,
}

impl Default for ColumnCatalog {
    /// The fixed default catalog: cover through rating visible, the
    /// technical tail (length, BPM, bitrate, sample rate, copyright, ISRC)
    /// hidden until the user asks for it.
    fn default() -> Self {
        let columns = ColumnKey::ALL
            .into_iter()
            .map(|key| {
                let visible = !matches!(
                    key,
                    ColumnKey::Length
                        | ColumnKey::Bpm
                        | ColumnKey::Bitrate
                        | ColumnKey::SampleRate
                        | ColumnKey::Copyright
                        | ColumnKey::Isrc
                );
                Column::new(key, visible)
            })
            .collect();
        Self { columns }
    }
}

impl ColumnCatalog {
    /// All columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Only the visible columns, in display order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn get(&self, key: ColumnKey) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Flip one column's visibility. Returns false for a key not in the
    /// catalog.
    pub fn toggle_visibility(&mut self, key: ColumnKey) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.visible = !column.visible;
                true
            }
            None => false,
        }
    }

    /// Reorder the catalog: listed keys come first in the given order,
    /// unlisted columns keep their relative order after them.
    pub fn reorder(&mut self, ordered_keys: &[ColumnKey]) {
        let mut reordered = Vec::with_capacity(self.columns.len());
        for key in ordered_keys {
            if let Some(pos) = self.columns.iter().position(|c| c.key == *key) {
                reordered.push(self.columns.remove(pos));
            }
        }
        reordered.append(&mut self.columns);
        self.columns = reordered;
    }

    /// Atomically replace the catalog, as when a customization dialog is
    /// confirmed. Abandoning the draft instead leaves the catalog untouched.
    pub fn commit(&mut self, new_columns: ColumnCatalog) {
        self.columns = new_columns.columns;
    }

    /// Independent working copy for a dialog; edits do not leak back until
    /// passed to `commit`.
    pub fn snapshot(&self) -> ColumnCatalog {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order_and_visibility() {
        let catalog = ColumnCatalog::default();
        assert_eq!(catalog.columns().len(), 21);
        assert_eq!(catalog.columns()[0].key, ColumnKey::Cover);
        assert_eq!(catalog.columns()[1].key, ColumnKey::TrackName);

        let visible: Vec<ColumnKey> = catalog.visible_columns().map(|c| c.key).collect();
        assert_eq!(visible.len(), 15);
        assert!(visible.contains(&ColumnKey::Rating));
        assert!(!visible.contains(&ColumnKey::Length));
        assert!(!visible.contains(&ColumnKey::Isrc));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut catalog = ColumnCatalog::default();
        assert!(catalog.toggle_visibility(ColumnKey::Length));
        assert!(catalog.get(ColumnKey::Length).unwrap().visible);
        assert!(catalog.toggle_visibility(ColumnKey::Length));
        assert!(!catalog.get(ColumnKey::Length).unwrap().visible);
    }

    #[test]
    fn test_reorder_listed_first_rest_keep_relative_order() {
        let mut catalog = ColumnCatalog::default();
        catalog.reorder(&[ColumnKey::Year, ColumnKey::Artist]);

        let keys: Vec<ColumnKey> = catalog.columns().iter().map(|c| c.key).collect();
        assert_eq!(keys[0], ColumnKey::Year);
        assert_eq!(keys[1], ColumnKey::Artist);
        // The rest keep their default relative order.
        assert_eq!(keys[2], ColumnKey::Cover);
        assert_eq!(keys[3], ColumnKey::TrackName);
        assert_eq!(keys.len(), 21);
    }

    #[test]
    fn test_snapshot_is_independent_until_commit() {
        let mut catalog = ColumnCatalog::default();
        let mut draft = catalog.snapshot();
        draft.toggle_visibility(ColumnKey::Bpm);
        draft.reorder(&[ColumnKey::Bpm]);

        // The live catalog is untouched while the draft is edited.
        assert!(!catalog.get(ColumnKey::Bpm).unwrap().visible);
        assert_eq!(catalog.columns()[0].key, ColumnKey::Cover);

        catalog.commit(draft);
        assert!(catalog.get(ColumnKey::Bpm).unwrap().visible);
        assert_eq!(catalog.columns()[0].key, ColumnKey::Bpm);
    }

    #[test]
    fn test_visible_order_follows_catalog_order() {
        let mut catalog = ColumnCatalog::default();
        catalog.reorder(&[ColumnKey::Artist, ColumnKey::TrackName]);
        let visible: Vec<ColumnKey> = catalog.visible_columns().map(|c| c.key).collect();
        assert_eq!(visible[0], ColumnKey::Artist);
        assert_eq!(visible[1], ColumnKey::TrackName);
    }
}
