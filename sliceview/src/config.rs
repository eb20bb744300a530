// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View policy and the per-row column layout derived from it.

/// Behaviour switches for a [`SliceView`](crate::SliceView).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SliceViewConfig {
    /// Browse-only: single selection, no editing, no structural changes.
    pub read_only: bool,
    /// Show the logical index next to each row.
    pub show_index: bool,
    /// Allow keyboard navigation while read-only.
    pub inactive_key_nav: bool,
    /// Offer adding but not deleting rows.
    pub add_only: bool,
    /// Offer deleting but not adding rows.
    pub delete_only: bool,
    /// Append the standard Copy/Cut/Paste/Duplicate entries to element menus.
    pub show_view_context_menu: bool,
}

impl Default for SliceViewConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            show_index: true,
            inactive_key_nav: true,
            add_only: false,
            delete_only: false,
            show_view_context_menu: false,
        }
    }
}

/// Columns making up one displayed row.
///
/// Every row has a value widget; the index label and the per-row add and
/// delete actions are optional.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RowLayout {
    /// Leading index label.
    pub index_label: bool,
    /// Trailing "insert after this row" action.
    pub add_action: bool,
    /// Trailing "delete this row" action.
    pub delete_action: bool,
}

impl RowLayout {
    /// Layout for `config` over a collection that is (or is not) resizable.
    #[must_use]
    pub fn new(config: &SliceViewConfig, resizable: bool) -> Self {
        let editable = !config.read_only && resizable;
        Self {
            index_label: config.show_index,
            add_action: editable && !config.delete_only,
            delete_action: editable && !config.add_only,
        }
    }

    /// Number of widgets per row.
    #[must_use]
    pub fn columns(&self) -> usize {
        1 + usize::from(self.index_label)
            + usize::from(self.add_action)
            + usize::from(self.delete_action)
    }

    /// Column of the value widget.
    #[must_use]
    pub fn value_column(&self) -> usize {
        usize::from(self.index_label)
    }
}

#[cfg(test)]
mod tests {
    use super::{RowLayout, SliceViewConfig};

    #[test]
    fn editable_rows_get_both_actions() {
        let layout = RowLayout::new(&SliceViewConfig::default(), true);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.value_column(), 1);
    }

    #[test]
    fn fixed_or_read_only_rows_have_no_actions() {
        let config = SliceViewConfig::default();
        assert_eq!(RowLayout::new(&config, false).columns(), 2);
        let read_only = SliceViewConfig {
            read_only: true,
            show_index: false,
            ..config
        };
        let layout = RowLayout::new(&read_only, true);
        assert_eq!(layout.columns(), 1);
        assert_eq!(layout.value_column(), 0);
    }

    #[test]
    fn add_only_and_delete_only() {
        let add_only = SliceViewConfig {
            add_only: true,
            ..SliceViewConfig::default()
        };
        let layout = RowLayout::new(&add_only, true);
        assert!(layout.add_action && !layout.delete_action);
        let delete_only = SliceViewConfig {
            delete_only: true,
            ..SliceViewConfig::default()
        };
        let layout = RowLayout::new(&delete_only, true);
        assert!(!layout.add_action && layout.delete_action);
    }
}
