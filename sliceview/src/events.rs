// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications and update batching.
//!
//! A view never calls back into the host to report what happened. It queues
//! [`SliceViewEvent`]s which the host drains after dispatching input.
//!
//! Mutations run inside an [`UpdateBatch`]. Batches nest; when the outermost
//! one is released the view runs the persist hook once, marks itself changed,
//! queues a single [`SliceViewEvent::Changed`] and re-syncs its rows once.

use std::ops::{Deref, DerefMut};

use crate::{DropMod, SliceView};

/// Something the host may want to react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliceViewEvent {
    /// The user changed the selection; carries the newly active index.
    Selected(usize),
    /// A row was activated by double click or Enter; carries the active index.
    DoubleClicked(Option<usize>),
    /// The collection was modified through the view.
    Changed,
    /// A drop this view accepted finished with the given action.
    ///
    /// The host forwards it to the drag source's
    /// [`SliceView::drop_from_source`].
    DropFinalized(DropMod),
    /// A custom context menu entry was chosen.
    CustomAction {
        /// Index the menu was opened for.
        index: usize,
        /// Identifier from [`MenuCommand::Custom`](crate::MenuCommand::Custom).
        id: u32,
    },
}

/// Scoped update bracket around one or more mutations.
///
/// Dereferences to the [`SliceView`], so mutations are issued through the guard.
#[must_use = "the batch flushes when dropped"]
#[derive(Debug)]
pub struct UpdateBatch<'a> {
    view: &'a mut SliceView,
}

impl<'a> UpdateBatch<'a> {
    pub(crate) fn new(view: &'a mut SliceView) -> Self {
        view.batch_depth += 1;
        Self { view }
    }
}

impl Deref for UpdateBatch<'_> {
    type Target = SliceView;

    fn deref(&self) -> &SliceView {
        self.view
    }
}

impl DerefMut for UpdateBatch<'_> {
    fn deref_mut(&mut self) -> &mut SliceView {
        self.view
    }
}

impl Drop for UpdateBatch<'_> {
    fn drop(&mut self) {
        self.view.end_update();
    }
}

impl SliceView {
    /// Opens an update batch.
    pub fn batch(&mut self) -> UpdateBatch<'_> {
        UpdateBatch::new(self)
    }

    /// Returns `true` while a batch is open.
    #[must_use]
    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Removes and returns all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SliceViewEvent> + '_ {
        self.events.drain(..)
    }

    pub(crate) fn push_event(&mut self, event: SliceViewEvent) {
        self.events.push_back(event);
    }

    /// Records that the collection changed; flushed when the batch closes.
    pub(crate) fn mark_mutated(&mut self) {
        self.pending_mutation = true;
    }

    /// Requests a re-sync without reporting a change.
    pub(crate) fn mark_resync(&mut self) {
        self.pending_resync = true;
    }

    fn end_update(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth > 0 {
            return;
        }
        let mutated = std::mem::take(&mut self.pending_mutation);
        let resync = std::mem::take(&mut self.pending_resync);
        if mutated {
            if let Some(persist) = self.persist.as_mut() {
                persist();
            }
            self.changed = true;
            self.push_event(SliceViewEvent::Changed);
        }
        if mutated || resync {
            let stats = self.sync();
            log::trace!("batch flushed: mutated={mutated} {stats:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::SliceViewEvent;
    use crate::test_util::int_view;

    #[test]
    fn nested_batches_flush_once() {
        let (mut view, items) = int_view(&[1, 2, 3], 10);
        let saves = Rc::new(Cell::new(0));
        let counter = Rc::clone(&saves);
        view.set_persist_hook(move || counter.set(counter.get() + 1));
        {
            let mut outer = view.batch();
            outer.insert_at(0).unwrap();
            {
                let mut inner = outer.batch();
                inner.insert_at(0).unwrap();
                assert!(inner.in_batch());
            }
            outer.delete_at(0).unwrap();
            assert_eq!(outer.drain_events().count(), 0);
        }
        assert!(!view.in_batch());
        assert_eq!(saves.get(), 1);
        assert!(view.is_changed());
        let events: Vec<_> = view.drain_events().collect();
        assert_eq!(events, vec![SliceViewEvent::Changed]);
        assert_eq!(items.borrow().len(), 4);
        assert_eq!(view.window().len(), 4);
    }

    #[test]
    fn empty_batch_is_silent() {
        let (mut view, _items) = int_view(&[1], 10);
        drop(view.batch());
        assert!(!view.is_changed());
        assert_eq!(view.drain_events().count(), 0);
    }
}
