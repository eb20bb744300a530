// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform row extents.

/// A strip of `len` rows that all share the same extent.
///
/// Extents and offsets are in the host's layout space (typically logical
/// pixels) and are expected to be finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowExtent {
    len: usize,
    extent: f64,
}

impl RowExtent {
    /// Creates a new strip of `len` rows of uniform `extent`.
    #[must_use]
    pub const fn new(len: usize, extent: f64) -> Self {
        Self {
            len,
            // Clamp finite negative values to `0.0`. NaNs are preserved here;
            // callers are expected to avoid them and `set_extent` debug-asserts.
            extent: if extent.is_sign_negative() {
                0.0
            } else {
                extent
            },
        }
    }

    /// Returns the number of rows in the strip.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the strip has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the number of rows in the strip.
    pub const fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Sets the uniform extent for all rows.
    pub fn set_extent(&mut self, extent: f64) {
        debug_assert!(
            extent.is_finite(),
            "RowExtent extents must be finite; got {extent:?}"
        );
        self.extent = if extent.is_sign_negative() {
            0.0
        } else {
            extent
        };
    }

    /// Returns the uniform extent of a row.
    #[must_use]
    pub const fn extent(&self) -> f64 {
        self.extent
    }

    /// Total extent of the strip.
    #[must_use]
    pub fn total_extent(&self) -> f64 {
        self.extent * self.len as f64
    }

    /// Offset of the start of row `row` from the start of the strip.
    #[must_use]
    pub fn offset_of(&self, row: usize) -> f64 {
        row as f64 * self.extent
    }

    /// Number of whole rows that fit into `available`.
    ///
    /// Returns `0` for a degenerate (zero or negative) row extent.
    #[must_use]
    pub fn rows_in(&self, available: f64) -> usize {
        if self.extent <= 0.0 || available.is_nan() || available <= 0.0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Truncation of a non-negative ratio is the floor; overflow saturates"
        )]
        let rows = (available / self.extent) as usize;
        rows
    }

    /// Row containing `offset`, or `None` if the offset lies outside the strip.
    #[must_use]
    pub fn row_at_offset(&self, offset: f64) -> Option<usize> {
        if self.len == 0 || self.extent <= 0.0 || offset < 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Truncation of a non-negative ratio is the floor; bounds are checked right after"
        )]
        let row = (offset / self.extent) as usize;
        (row < self.len).then_some(row)
    }
}
