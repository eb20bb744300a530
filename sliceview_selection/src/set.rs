// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection set and its update rules.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::SelectMode;

/// Outcome of a selection update, for the host to act on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Index to report in a selection-changed notification, if one is due.
    pub notify: Option<usize>,
    /// Index that should be scrolled into view and receive focus, if any.
    pub focus: Option<usize>,
}

impl SelectionChange {
    /// No notification and no focus change.
    pub const NONE: Self = Self {
        notify: None,
        focus: None,
    };

    const fn user(index: usize) -> Self {
        Self {
            notify: Some(index),
            focus: Some(index),
        }
    }
}

/// Set of selected logical indices plus one active index.
///
/// Membership is unordered; use [`SelectionSet::sorted`] or
/// [`SelectionSet::sorted_descending`] for a deterministic listing.
/// The active index is the keyboard-navigation cursor and need not be a member.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    selected: HashSet<usize>,
    active: Option<usize>,
}

impl SelectionSet {
    /// Creates an empty selection with no active index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `index` is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Number of selected indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The active index, if any.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Sets the active index without touching membership.
    pub fn set_active(&mut self, active: Option<usize>) {
        self.active = active;
    }

    /// Iterates over the selected indices in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.iter().collect();
        out.sort_unstable();
        out
    }

    /// Selected indices in descending order, convenient for deleting back to front.
    #[must_use]
    pub fn sorted_descending(&self) -> Vec<usize> {
        let mut out = self.sorted();
        out.reverse();
        out
    }

    /// Lowest and highest selected index.
    #[must_use]
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let min = self.iter().min()?;
        let max = self.iter().max()?;
        Some((min, max))
    }

    /// Adds `index` to the set. Returns `true` if it was not selected before.
    pub fn insert(&mut self, index: usize) -> bool {
        self.selected.insert(index)
    }

    /// Removes `index` from the set. Returns `true` if it was selected.
    pub fn remove(&mut self, index: usize) -> bool {
        self.selected.remove(&index)
    }

    /// Unselects everything. The active index is kept.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selects every index in `0..len`.
    pub fn select_all(&mut self, len: usize) {
        self.selected.clear();
        self.selected.extend(0..len);
    }

    /// Applies a multi-select update for `index` in a collection of `len` items.
    ///
    /// `index` is clamped into `0..len`. Nothing happens for an empty
    /// collection or [`SelectMode::NoSelect`].
    pub fn apply(&mut self, index: usize, mode: SelectMode, len: usize) -> SelectionChange {
        if len == 0 || mode == SelectMode::NoSelect {
            return SelectionChange::NONE;
        }
        let index = index.min(len - 1);
        match mode {
            SelectMode::NoSelect => SelectionChange::NONE,
            SelectMode::SelectOne => {
                self.selected.clear();
                self.selected.insert(index);
                self.active = Some(index);
                SelectionChange::user(index)
            }
            SelectMode::ExtendContinuous => {
                match self.bounds() {
                    None => {
                        self.selected.insert(index);
                    }
                    Some((min, _)) if index < min => self.selected.extend(index..=min),
                    Some((_, max)) if index > max => self.selected.extend(max..=index),
                    Some(_) => {
                        self.selected.insert(index);
                    }
                }
                self.active = Some(index);
                SelectionChange::user(index)
            }
            SelectMode::ExtendOne => {
                if self.selected.remove(&index) {
                    SelectionChange::NONE
                } else {
                    self.selected.insert(index);
                    self.active = Some(index);
                    SelectionChange::user(index)
                }
            }
            SelectMode::Unselect | SelectMode::UnselectQuiet => {
                self.active = Some(index);
                self.selected.remove(&index);
                SelectionChange::NONE
            }
            SelectMode::SelectQuiet => {
                self.active = Some(index);
                self.selected.insert(index);
                SelectionChange::NONE
            }
        }
    }

    /// Single-select update for read-only browsing.
    ///
    /// Selecting the already active index is a no-op: a browse selection
    /// never becomes empty through a click. Otherwise the selection becomes
    /// exactly `{index}` and a notification is requested.
    pub fn browse_select(&mut self, index: usize, len: usize) -> SelectionChange {
        if len == 0 {
            return SelectionChange::NONE;
        }
        let index = index.min(len - 1);
        if self.active == Some(index) && self.selected.contains(&index) {
            return SelectionChange::NONE;
        }
        self.selected.clear();
        self.selected.insert(index);
        self.active = Some(index);
        SelectionChange {
            notify: Some(index),
            focus: None,
        }
    }

    /// Renumbers after `count` elements were inserted at `at`.
    ///
    /// Every index at or after `at` moves up by `count`.
    pub fn on_inserted(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let shift = |i: usize| if i >= at { i + count } else { i };
        self.selected = self.selected.drain().map(shift).collect();
        self.active = self.active.map(shift);
    }

    /// Renumbers after the element at `at` was removed.
    ///
    /// `at` leaves the set and every index after it moves down by one. An
    /// active index equal to `at` stays put and now refers to the next element.
    pub fn on_removed(&mut self, at: usize) {
        self.selected.remove(&at);
        let shift = |i: usize| if i > at { i - 1 } else { i };
        self.selected = self.selected.drain().map(shift).collect();
        self.active = self.active.map(shift);
    }

    /// Drops indices at or beyond `len` and clamps the active index into range.
    pub fn retain_below(&mut self, len: usize) {
        self.selected.retain(|&i| i < len);
        self.active = match self.active {
            Some(a) if a >= len => len.checked_sub(1),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{SelectionChange, SelectionSet};
    use crate::SelectMode;

    fn set_of(indices: &[usize]) -> SelectionSet {
        let mut sel = SelectionSet::new();
        for &i in indices {
            sel.insert(i);
        }
        sel
    }

    #[test]
    fn select_one_replaces_everything() {
        let mut sel = set_of(&[1, 4, 7]);
        sel.set_active(Some(7));
        let change = sel.apply(3, SelectMode::SelectOne, 10);
        assert_eq!(sel.sorted(), vec![3]);
        assert_eq!(sel.active(), Some(3));
        assert_eq!(change.notify, Some(3));
        assert_eq!(change.focus, Some(3));

        // Reselecting the only selected index keeps it.
        sel.apply(3, SelectMode::SelectOne, 10);
        assert_eq!(sel.sorted(), vec![3]);
    }

    #[test]
    fn extend_continuous_fills_the_run() {
        let mut sel = SelectionSet::new();
        sel.apply(2, SelectMode::SelectOne, 10);
        sel.apply(5, SelectMode::ExtendContinuous, 10);
        assert_eq!(sel.sorted(), vec![2, 3, 4, 5]);
        assert_eq!(sel.active(), Some(5));

        // Extending below the run.
        sel.apply(0, SelectMode::ExtendContinuous, 10);
        assert_eq!(sel.sorted(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(sel.active(), Some(0));
    }

    #[test]
    fn extend_continuous_on_empty_selects_target() {
        let mut sel = SelectionSet::new();
        let change = sel.apply(4, SelectMode::ExtendContinuous, 10);
        assert_eq!(sel.sorted(), vec![4]);
        assert_eq!(change.notify, Some(4));
    }

    #[test]
    fn extend_continuous_inside_run_only_moves_active() {
        let mut sel = SelectionSet::new();
        sel.apply(1, SelectMode::SelectOne, 10);
        sel.apply(3, SelectMode::ExtendContinuous, 10);
        sel.apply(2, SelectMode::ExtendContinuous, 10);
        assert_eq!(sel.sorted(), vec![1, 2, 3]);
        assert_eq!(sel.active(), Some(2));
    }

    #[test]
    fn extend_one_toggles() {
        let mut sel = SelectionSet::new();
        sel.apply(1, SelectMode::SelectOne, 10);
        let change = sel.apply(4, SelectMode::ExtendOne, 10);
        assert_eq!(sel.sorted(), vec![1, 4]);
        assert_eq!(change.notify, Some(4));

        let change = sel.apply(1, SelectMode::ExtendOne, 10);
        assert_eq!(sel.sorted(), vec![4]);
        assert_eq!(change, SelectionChange::NONE);
    }

    #[test]
    fn quiet_modes_do_not_notify() {
        let mut sel = SelectionSet::new();
        assert_eq!(
            sel.apply(2, SelectMode::SelectQuiet, 5),
            SelectionChange::NONE
        );
        assert!(sel.contains(2));
        assert_eq!(sel.active(), Some(2));
        assert_eq!(
            sel.apply(2, SelectMode::UnselectQuiet, 5),
            SelectionChange::NONE
        );
        assert!(sel.is_empty());
        assert_eq!(sel.apply(9, SelectMode::NoSelect, 5), SelectionChange::NONE);
        assert_eq!(sel.active(), Some(2));
    }

    #[test]
    fn indices_are_clamped_into_range() {
        let mut sel = SelectionSet::new();
        sel.apply(42, SelectMode::SelectOne, 5);
        assert_eq!(sel.sorted(), vec![4]);
        assert_eq!(
            sel.apply(0, SelectMode::SelectOne, 0),
            SelectionChange::NONE
        );
    }

    #[test]
    fn browse_select_never_empties() {
        let mut sel = SelectionSet::new();
        let change = sel.browse_select(3, 10);
        assert_eq!(change.notify, Some(3));
        assert_eq!(change.focus, None);

        // Clicking the current row again keeps it selected and is quiet.
        assert_eq!(sel.browse_select(3, 10), SelectionChange::NONE);
        assert_eq!(sel.sorted(), vec![3]);

        sel.browse_select(6, 10);
        assert_eq!(sel.sorted(), vec![6]);
        assert_eq!(sel.active(), Some(6));
    }

    #[test]
    fn delete_renumbers_members() {
        let mut sel = set_of(&[1, 3, 5]);
        sel.on_removed(2);
        assert_eq!(sel.sorted(), vec![1, 2, 4]);

        let mut sel = set_of(&[1, 3, 5]);
        sel.set_active(Some(5));
        sel.on_removed(3);
        assert_eq!(sel.sorted(), vec![1, 4]);
        assert_eq!(sel.active(), Some(4));
    }

    #[test]
    fn insert_then_delete_is_identity() {
        let original = [0, 2, 5, 9];
        for at in 0..11 {
            let mut sel = set_of(&original);
            sel.on_inserted(at, 1);
            assert!(!sel.contains(at), "inserted index {at} must not be selected");
            sel.on_removed(at);
            assert_eq!(sel.sorted(), original.to_vec(), "insert/delete at {at}");
        }
    }

    #[test]
    fn insert_shifts_run_by_count() {
        let mut sel = set_of(&[1, 3, 5]);
        sel.set_active(Some(3));
        sel.on_inserted(3, 2);
        assert_eq!(sel.sorted(), vec![1, 5, 7]);
        assert_eq!(sel.active(), Some(5));
    }

    #[test]
    fn retain_below_prunes_and_clamps_active() {
        let mut sel = set_of(&[0, 4, 8]);
        sel.set_active(Some(8));
        sel.retain_below(5);
        assert_eq!(sel.sorted(), vec![0, 4]);
        assert_eq!(sel.active(), Some(4));

        sel.retain_below(0);
        assert!(sel.is_empty());
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn select_all_and_sorting() {
        let mut sel = SelectionSet::new();
        sel.select_all(4);
        assert_eq!(sel.sorted(), vec![0, 1, 2, 3]);
        assert_eq!(sel.sorted_descending(), vec![3, 2, 1, 0]);
        assert_eq!(sel.bounds(), Some((0, 3)));
        sel.clear();
        assert_eq!(sel.bounds(), None);
    }
}
