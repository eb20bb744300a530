// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop between views.
//!
//! The host drives the protocol:
//!
//! 1. [`SliceView::drag_start`] on the source captures the selection and
//!    returns the payload to carry.
//! 2. [`SliceView::drop_on_target`] on the view under the cursor opens the
//!    drop menu for the row there.
//! 3. Choosing an entry inserts or assigns the payload. When the payload
//!    was dragged out of the target itself the move is completed immediately;
//!    otherwise the target queues [`SliceViewEvent::DropFinalized`] and the
//!    host passes it on to the source's [`SliceView::drop_from_source`].
//!
//! The payload ends with a [`MIME_DRAG_SOURCE`] record naming the view the
//! drag started in. Hosts carry it along unchanged.

use kurbo::Point;
use sliceview_selection::{Modifiers, SelectMode};

use crate::menu::{Menu, MenuCommand, MenuKind, drop_entries};
use crate::mutate::{encode_indices, shift_for_insert};
use crate::{MimeData, Payload, SliceError, SliceView, SliceViewEvent};

/// Format of the payload record identifying the view a drag started in.
pub const MIME_DRAG_SOURCE: &str = "application/x-sliceview-drag-source";

fn source_record(view_id: u64) -> MimeData {
    MimeData {
        mime: MIME_DRAG_SOURCE.to_owned(),
        data: view_id.to_le_bytes().to_vec(),
    }
}

fn drag_source(payload: &[MimeData]) -> Option<u64> {
    let record = payload.iter().find(|r| r.mime == MIME_DRAG_SOURCE)?;
    let bytes = record.data.as_slice().try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// What a drop does to the dragged elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropMod {
    /// Insert copies; the source keeps its elements.
    Copy,
    /// Insert copies; the source removes its elements.
    Move,
    /// Link drops are not supported and behave like [`DropMod::Copy`].
    Link,
    /// The drop was cancelled.
    Ignore,
}

impl DropMod {
    /// Move when Shift is held, copy otherwise.
    #[must_use]
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::SHIFT) {
            Self::Move
        } else {
            Self::Copy
        }
    }

    fn resolve(self) -> Self {
        match self {
            Self::Link => Self::Copy,
            other => other,
        }
    }
}

/// Indices a view is dragging, kept current across inserts into the same view.
#[derive(Clone, Debug, Default)]
pub(crate) struct DragSession {
    indices: Vec<usize>,
}

/// Coarse interaction state of a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing in progress.
    Idle,
    /// A drag of these indices started here and has not finished.
    Dragging(Vec<usize>),
    /// A menu is open for this index.
    MenuOpen(MenuKind, usize),
}

impl SliceView {
    /// The current interaction state.
    #[must_use]
    pub fn interaction_state(&self) -> InteractionState {
        if let Some(menu) = &self.menu {
            InteractionState::MenuOpen(menu.kind(), menu.index())
        } else if let Some(drag) = &self.drag {
            InteractionState::Dragging(drag.indices.clone())
        } else {
            InteractionState::Idle
        }
    }

    /// Starts dragging the selection.
    ///
    /// Returns one record per selected element in ascending index order,
    /// followed by the [`MIME_DRAG_SOURCE`] record, or `None` when nothing is
    /// selected or the view is read-only.
    pub fn drag_start(&mut self) -> Option<Payload> {
        if self.config.read_only {
            return None;
        }
        let shared = self.collection().ok()?;
        let indices = self.selection.sorted();
        if indices.is_empty() {
            return None;
        }
        let mut payload = encode_indices(&shared, &indices);
        payload.push(source_record(self.id));
        log::debug!("drag start: {indices:?}");
        self.drag = Some(DragSession { indices });
        Some(payload)
    }

    /// Handles a drop at `position` by opening the drop menu for the row there.
    ///
    /// Returns `false` when the position is not over a row.
    pub fn drop_on_target(&mut self, payload: Payload, mode: DropMod, position: Point) -> bool {
        if self.config.read_only || !self.is_attached() {
            return false;
        }
        let Some(index) = self
            .window
            .row_at_point(position)
            .and_then(|row| self.window.index_of_row(row))
        else {
            return false;
        };
        let mode = mode.resolve();
        let from_self = drag_source(&payload) == Some(self.id);
        let elements = payload
            .into_iter()
            .filter(|r| r.mime != MIME_DRAG_SOURCE)
            .collect();
        self.open_menu(MenuKind::Drop, index, drop_entries(mode), elements, mode, from_self);
        true
    }

    /// Completes a drag on the source side once the target reported `mode`.
    ///
    /// After a move the dragged elements are removed and the element that
    /// followed the highest of them is selected. Any other mode just ends the
    /// drag.
    pub fn drop_from_source(&mut self, mode: DropMod) -> Result<(), SliceError> {
        let Some(session) = self.drag.take() else {
            return Ok(());
        };
        if mode != DropMod::Move || session.indices.is_empty() {
            return Ok(());
        }
        let highest = session.indices.iter().copied().max().unwrap_or_default();
        {
            let mut batch = self.batch();
            for &index in session.indices.iter().rev() {
                batch.delete_at(index)?;
            }
        }
        self.select_with(highest, SelectMode::SelectOne);
        Ok(())
    }

    /// Abandons any drag and drop menu without touching the collection.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
        if self.menu.as_ref().is_some_and(|m| m.kind() == MenuKind::Drop) {
            self.menu = None;
        }
    }

    pub(crate) fn finish_drop(
        &mut self,
        command: MenuCommand,
        menu: &Menu,
    ) -> Result<(), SliceError> {
        let index = menu.index();
        let from_self = menu.from_self();
        let mut batch = self.batch();
        if command == MenuCommand::DropAssign {
            if let Some(drag) = batch.drag.as_mut().filter(|_| from_self) {
                drag.indices.clear();
            }
            let result = batch.paste_assign(menu.payload(), index);
            let mode = if result.is_ok() {
                DropMod::Copy
            } else {
                DropMod::Ignore
            };
            batch.finalize_drop(mode, from_self);
            return result;
        }
        let at = if command == MenuCommand::DropAfter {
            index + 1
        } else {
            index
        };
        match batch.paste_insert(menu.payload(), at) {
            Ok(run) => {
                if let Some(drag) = batch.drag.as_mut().filter(|_| from_self) {
                    drag.indices = shift_for_insert(&drag.indices, run.start, run.len());
                }
                batch.finalize_drop(menu.drop_mod(), from_self);
                Ok(())
            }
            Err(err) => {
                batch.finalize_drop(DropMod::Ignore, from_self);
                Err(err)
            }
        }
    }

    /// Ends a drop on this view. A drag that started here is completed in
    /// place; any other drop is reported for the source to finish, and a
    /// leftover local drag session is discarded.
    pub(crate) fn finalize_drop(&mut self, mode: DropMod, from_self: bool) {
        self.selection.clear();
        self.apply_row_states();
        if from_self {
            if let Err(err) = self.drop_from_source(mode) {
                log::warn!("removing moved elements failed: {err}");
            }
        } else {
            if let Some(stale) = self.drag.take() {
                log::debug!("discarding unfinished drag of {:?}", stale.indices);
            }
            self.push_event(SliceViewEvent::DropFinalized(mode));
        }
    }
}
