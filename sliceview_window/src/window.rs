// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The row window: which logical indices are materialized as display rows.

use core::ops::Range;

use kurbo::{Point, Rect};

use crate::RowExtent;

/// Page step reported to scrollbars before any rows are displayed.
const FALLBACK_PAGE_STEP: usize = 10;

/// Projection of a collection of `len` items onto a fixed number of display rows.
///
/// This type tracks:
/// - the number of rows that fit into the available height (`visible_rows`),
/// - the number of rows actually displayed, `min(len, visible_rows)`,
/// - the logical index shown in the first row (`start_index`),
/// - the layout height and rendered row count from the previous pass, so the
///   host can tell a pure scroll (rebind only) from a structural change.
///
/// The invariant `start_index <= len - displayed_rows` holds after every
/// public call. When no rows are displayed, `start_index` is `0`.
///
/// It does *not* own any widgets; hosts read [`RowWindow::visible_indices`]
/// and bind their row widgets to those indices.
#[derive(Debug, Clone)]
pub struct RowWindow {
    rows: RowExtent,
    bounds: Rect,
    len: usize,
    visible_rows: usize,
    start_index: usize,
    layout_height: Option<f64>,
    rendered_rows: Option<usize>,
}

impl Default for RowWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RowWindow {
    /// Creates an empty window with no available height.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: RowExtent::new(0, 0.0),
            bounds: Rect::ZERO,
            len: 0,
            visible_rows: 0,
            start_index: 0,
            layout_height: None,
            rendered_rows: None,
        }
    }

    /// Number of items in the projected collection, as of the last [`RowWindow::reindex`].
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the projected collection is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First logical index shown in the window.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.start_index
    }

    /// Number of rows that fit into the available height.
    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Number of rows actually displayed: `min(len, visible_rows)`.
    #[must_use]
    pub const fn displayed_rows(&self) -> usize {
        self.rows.len()
    }

    /// Height of a single row.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.rows.extent()
    }

    /// Area occupied by the rows in host coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Recomputes the number of visible rows for a new available height.
    ///
    /// Returns the new `visible_rows`. A non-positive row height yields zero rows.
    pub fn resize(&mut self, available_height: f64, row_height: f64) -> usize {
        self.rows.set_extent(row_height);
        self.visible_rows = self.rows.rows_in(available_height);
        self.layout_height = Some(available_height);
        self.clamp();
        self.visible_rows
    }

    /// Places the rows inside `bounds` and recomputes visible rows from its height.
    pub fn layout(&mut self, bounds: Rect, row_height: f64) -> usize {
        self.bounds = bounds;
        self.resize(bounds.height(), row_height)
    }

    /// Updates the collection size and reclamps the window.
    ///
    /// Returns `(start_index, displayed_rows)`.
    pub fn reindex(&mut self, len: usize) -> (usize, usize) {
        self.len = len;
        self.clamp();
        (self.start_index, self.displayed_rows())
    }

    /// Scrolls the minimum amount needed to bring `index` into the window.
    ///
    /// An index before the window becomes the first row; an index after it
    /// becomes the last row. Returns `true` if `start_index` changed.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        let displayed = self.displayed_rows();
        if displayed == 0 {
            return false;
        }
        let old = self.start_index;
        if index < self.start_index {
            self.start_index = index;
        } else if index >= self.start_index + displayed {
            self.start_index = index.saturating_sub(displayed - 1);
        } else {
            return false;
        }
        self.clamp();
        self.start_index != old
    }

    /// Sets the first displayed index directly (for example from a scrollbar), clamped.
    ///
    /// Returns `true` if `start_index` changed.
    pub fn set_start_index(&mut self, index: usize) -> bool {
        let old = self.start_index;
        self.start_index = index;
        self.clamp();
        self.start_index != old
    }

    /// Returns `true` if the row slots need to be laid out again.
    ///
    /// That is the case when the available height differs from the last
    /// layout, or when the displayed row count differs from the last
    /// [`RowWindow::mark_rendered`]. A pure scroll never requires re-layout.
    #[must_use]
    pub fn needs_layout(&self, available_height: f64) -> bool {
        self.layout_height != Some(available_height)
            || self.rendered_rows != Some(self.displayed_rows())
    }

    /// Records that the current displayed row count has been rendered.
    pub fn mark_rendered(&mut self) {
        self.rendered_rows = Some(self.displayed_rows());
    }

    /// Returns `true` if `row` is a displayed row.
    #[must_use]
    pub const fn is_row_in_bounds(&self, row: usize) -> bool {
        row < self.displayed_rows()
    }

    /// Returns `true` if logical `index` is currently displayed.
    #[must_use]
    pub const fn is_index_visible(&self, index: usize) -> bool {
        self.row_of(index).is_some()
    }

    /// Display row showing logical `index`, if any.
    #[must_use]
    pub const fn row_of(&self, index: usize) -> Option<usize> {
        match index.checked_sub(self.start_index) {
            Some(row) if row < self.displayed_rows() => Some(row),
            _ => None,
        }
    }

    /// Logical index shown in display `row`, if any.
    #[must_use]
    pub const fn index_of_row(&self, row: usize) -> Option<usize> {
        if self.is_row_in_bounds(row) {
            Some(self.start_index + row)
        } else {
            None
        }
    }

    /// Logical indices currently displayed.
    #[must_use]
    pub const fn visible_indices(&self) -> Range<usize> {
        self.start_index..self.start_index + self.displayed_rows()
    }

    /// Rectangle of display `row` within [`RowWindow::bounds`].
    #[must_use]
    pub fn row_rect(&self, row: usize) -> Option<Rect> {
        if !self.is_row_in_bounds(row) {
            return None;
        }
        let y0 = self.bounds.y0 + self.rows.offset_of(row);
        Some(Rect::new(
            self.bounds.x0,
            y0,
            self.bounds.x1,
            y0 + self.rows.extent(),
        ))
    }

    /// Display row under `point`, considering only its vertical position.
    #[must_use]
    pub fn row_at_point(&self, point: Point) -> Option<usize> {
        self.rows.row_at_offset(point.y - self.bounds.y0)
    }

    /// Anchor point for popups attached to logical `index`.
    ///
    /// Indices outside the window are clamped to the first or last displayed
    /// row. Returns `None` when nothing is displayed.
    #[must_use]
    pub fn anchor_point(&self, index: usize) -> Option<Point> {
        let last = self.displayed_rows().checked_sub(1)?;
        let row = index.saturating_sub(self.start_index).min(last);
        self.row_rect(row).map(|r| r.center())
    }

    /// Scrollbar parameters for the current window.
    #[must_use]
    pub const fn scrollbar(&self) -> ScrollbarState {
        let displayed = self.displayed_rows();
        let page = if displayed > 0 {
            displayed
        } else {
            FALLBACK_PAGE_STEP
        };
        ScrollbarState {
            max: self.len,
            value: self.start_index,
            page_step: page,
            thumb: page,
            off: displayed == self.len,
        }
    }

    fn clamp(&mut self) {
        let displayed = self.len.min(self.visible_rows);
        self.rows.set_len(displayed);
        if displayed == 0 {
            self.start_index = 0;
        } else {
            self.start_index = self.start_index.min(self.len - displayed);
        }
    }
}

/// Scrollbar configuration derived from a [`RowWindow`], in row units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarState {
    /// Upper end of the scroll range (the collection size).
    pub max: usize,
    /// Current position (the window's start index).
    pub value: usize,
    /// Amount moved by a page step.
    pub page_step: usize,
    /// Size of the thumb.
    pub thumb: usize,
    /// Whether the scrollbar should be hidden because everything fits.
    pub off: bool,
}
