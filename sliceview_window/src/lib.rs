// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SliceView Window: row projection for virtualized list views.
//!
//! This crate maps a logical collection of `len` items onto a bounded set of
//! display rows of uniform height. It answers three questions for a host list
//! view:
//!
//! - How many rows fit, and how many are displayed? See [`RowWindow::resize`]
//!   and [`RowWindow::reindex`].
//! - Which logical index does each row show? Rows map to indices as
//!   `index = start_index + row`; [`RowWindow::scroll_to`] moves the window the
//!   minimum amount needed to bring an index into view.
//! - Does the host need to rebuild its row widgets, or only rebind them?
//!   [`RowWindow::needs_layout`] is `true` only when the available height or
//!   the displayed row count changed. Scrolling alone never requires it.
//!
//! Row geometry ([`RowWindow::row_rect`], [`RowWindow::row_at_point`]) is
//! expressed with [`kurbo`] types so drop targets and popup anchors can be
//! resolved from pointer positions.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use sliceview_window::RowWindow;
//!
//! let mut window = RowWindow::new();
//! // 200px of height, 20px rows: 10 visible rows.
//! window.layout(Rect::new(0.0, 0.0, 300.0, 200.0), 20.0);
//! window.reindex(100);
//!
//! assert!(window.scroll_to(95));
//! assert_eq!(window.start_index(), 86);
//! assert_eq!(window.visible_indices(), 86..96);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

mod extent;
mod window;

pub use extent::RowExtent;
pub use window::{RowWindow, ScrollbarState};
