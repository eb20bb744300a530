// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural edits of the attached collection.
//!
//! Every public entry point here runs inside an [`UpdateBatch`](crate::UpdateBatch),
//! renumbers the selection for the indices it shifted and reports one
//! [`SliceViewEvent::Changed`](crate::SliceViewEvent::Changed) when the
//! outermost batch closes.

use std::any::Any;
use std::ops::Range;

use sliceview_selection::SelectMode;

use crate::view::SharedCollection;
use crate::{MIME_DRAG_SOURCE, MimeData, Payload, SliceError, SliceView};

impl SliceView {
    /// Inserts a default element at `index`, or appends when `index` is past the end.
    ///
    /// Returns the index of the new element.
    pub fn insert_at(&mut self, index: usize) -> Result<usize, SliceError> {
        let shared = self.collection()?;
        let mut batch = self.batch();
        let at = shared.borrow_mut().insert_default(index)?;
        batch.selection.on_inserted(at, 1);
        batch.mark_mutated();
        Ok(at)
    }

    /// Removes the element at `index`.
    pub fn delete_at(&mut self, index: usize) -> Result<(), SliceError> {
        let shared = self.collection()?;
        let mut batch = self.batch();
        shared.borrow_mut().remove(index)?;
        batch.selection.on_removed(index);
        batch.mark_mutated();
        Ok(())
    }

    /// Inserts a default element at display `row`.
    ///
    /// A row's add action passes `row + 1` to insert after itself.
    pub fn insert_at_row(&mut self, row: usize) -> Result<usize, SliceError> {
        self.insert_at(self.window.start_index() + row)
    }

    /// Removes the element shown in display `row`.
    pub fn delete_at_row(&mut self, row: usize) -> Result<(), SliceError> {
        let index = self
            .window
            .index_of_row(row)
            .ok_or(SliceError::OutOfRange {
                index: row,
                len: self.window.displayed_rows(),
            })?;
        self.delete_at(index)
    }

    /// Appends a default element. Returns its index.
    pub fn append(&mut self) -> Result<usize, SliceError> {
        self.insert_at(self.slice_len())
    }

    /// Overwrites the element at `index` with the first decodable record of `payload`.
    pub fn paste_assign(&mut self, payload: &[MimeData], index: usize) -> Result<(), SliceError> {
        let shared = self.collection()?;
        let value = decode_payload(&shared, payload)
            .into_iter()
            .next()
            .ok_or(SliceError::EmptyPayload)?;
        let mut batch = self.batch();
        shared.borrow_mut().assign(index, value)?;
        batch.mark_mutated();
        Ok(())
    }

    /// Inserts every decodable record of `payload` as a contiguous run at `index`.
    ///
    /// Records that fail to decode are logged and skipped. Returns the
    /// indices the run occupies.
    pub fn paste_insert(
        &mut self,
        payload: &[MimeData],
        index: usize,
    ) -> Result<Range<usize>, SliceError> {
        let shared = self.collection()?;
        let values = decode_payload(&shared, payload);
        if values.is_empty() {
            return Err(SliceError::EmptyPayload);
        }
        let mut batch = self.batch();
        let start = index.min(shared.borrow().len());
        let mut inserted = 0;
        let mut result = Ok(());
        {
            let mut collection = shared.borrow_mut();
            for value in values {
                match collection.insert(start + inserted, value) {
                    Ok(at) => {
                        batch.selection.on_inserted(at, 1);
                        inserted += 1;
                    }
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                }
            }
        }
        if inserted > 0 {
            batch.mark_mutated();
        }
        result.map(|()| start..start + inserted)
    }

    /// Inserts copies of the selected elements right after the lowest selected one.
    ///
    /// The copies keep their relative order. Returns the lowest selected index.
    pub fn duplicate(&mut self) -> Result<usize, SliceError> {
        let shared = self.collection()?;
        let indices = self.selection.sorted();
        let lowest = *indices.first().ok_or(SliceError::NothingSelected)?;
        let payload = encode_indices(&shared, &indices);
        self.paste_insert(&payload, lowest + 1)?;
        Ok(lowest)
    }

    /// Inserts serialized copies of `dragged` at `destination`, then removes
    /// the originals when `is_move` is set.
    ///
    /// Originals at or after the insertion point are found at their shifted
    /// positions. Indices that cannot be copied, such as out-of-range ones,
    /// are logged and left out of both steps.
    pub fn move_via_drop(
        &mut self,
        dragged: &[usize],
        destination: usize,
        is_move: bool,
    ) -> Result<(), SliceError> {
        let shared = self.collection()?;
        let mut sorted = dragged.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let (copied, payload) = encode_present(&shared, &sorted);
        if copied.is_empty() {
            log::warn!("nothing to move from {dragged:?}");
            return Ok(());
        }
        let mut batch = self.batch();
        let run = batch.paste_insert(&payload, destination)?;
        if is_move {
            let shifted = shift_for_insert(&copied, run.start, run.len());
            for &index in shifted.iter().rev() {
                batch.delete_at(index)?;
            }
        }
        Ok(())
    }

    /// Removes every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> Result<usize, SliceError> {
        if !self.is_resizable() {
            return Err(SliceError::FixedSize);
        }
        let indices = self.selection.sorted_descending();
        if indices.is_empty() {
            return Err(SliceError::NothingSelected);
        }
        let mut batch = self.batch();
        for &index in &indices {
            batch.delete_at(index)?;
        }
        Ok(indices.len())
    }

    /// Writes the selected elements to the clipboard in ascending order.
    ///
    /// With `reset` the selection is cleared afterwards. Returns the number
    /// of records written.
    pub fn copy_selected(&mut self, reset: bool) -> Result<usize, SliceError> {
        let shared = self.collection()?;
        let indices = self.selection.sorted();
        if indices.is_empty() {
            return Err(SliceError::NothingSelected);
        }
        let payload = encode_indices(&shared, &indices);
        let written = payload.len();
        self.clipboard.borrow_mut().write(payload);
        log::debug!("copied {written} element(s) to the clipboard");
        if reset {
            self.selection.clear();
            self.apply_row_states();
        }
        Ok(written)
    }

    /// Copies the selected elements to the clipboard and removes them.
    ///
    /// Afterwards the element that followed the highest removed index is selected.
    pub fn cut_selected(&mut self) -> Result<(), SliceError> {
        if !self.is_resizable() {
            return Err(SliceError::FixedSize);
        }
        self.copy_selected(false)?;
        let indices = self.selection.sorted_descending();
        let Some(&highest) = indices.first() else {
            return Err(SliceError::NothingSelected);
        };
        self.selection.clear();
        {
            let mut batch = self.batch();
            for &index in &indices {
                batch.delete_at(index)?;
            }
        }
        self.select_with(highest, SelectMode::SelectOne);
        Ok(())
    }
}

/// Shifts `indices` (ascending) for `count` elements inserted at `at`.
pub(crate) fn shift_for_insert(indices: &[usize], at: usize, count: usize) -> Vec<usize> {
    indices
        .iter()
        .map(|&i| if i >= at { i + count } else { i })
        .collect()
}

pub(crate) fn encode_indices(shared: &SharedCollection, indices: &[usize]) -> Payload {
    encode_present(shared, indices).1
}

/// Encodes `indices`, returning the ones that succeeded alongside their records.
fn encode_present(shared: &SharedCollection, indices: &[usize]) -> (Vec<usize>, Payload) {
    let collection = shared.borrow();
    let mut copied = Vec::with_capacity(indices.len());
    let mut payload = Payload::with_capacity(indices.len());
    for &index in indices {
        match collection.encode(index) {
            Ok(record) => {
                copied.push(index);
                payload.push(record);
            }
            Err(err) => log::warn!("element {index} not copied: {err}"),
        }
    }
    (copied, payload)
}

fn decode_payload(shared: &SharedCollection, payload: &[MimeData]) -> Vec<Box<dyn Any>> {
    let collection = shared.borrow();
    payload
        .iter()
        .enumerate()
        .filter(|(_, record)| record.mime != MIME_DRAG_SOURCE)
        .filter_map(|(i, record)| match collection.decode(record) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("clipboard record {i} skipped: {err}");
                None
            }
        })
        .collect()
}
