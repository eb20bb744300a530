// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SliceView Selection: index-based selection state for list views.
//!
//! A [`SelectionSet`] holds a set of selected logical indices plus a single
//! *active* index used for keyboard navigation. Updates are driven by a
//! [`SelectMode`], usually resolved from pointer or keyboard [`Modifiers`]:
//!
//! - [`SelectMode::SelectOne`]: plain click, selects only the target.
//! - [`SelectMode::ExtendContinuous`]: Shift, extends the contiguous run to the target.
//! - [`SelectMode::ExtendOne`]: Ctrl/Cmd, toggles the target.
//! - [`SelectMode::Unselect`], [`SelectMode::SelectQuiet`], [`SelectMode::UnselectQuiet`]:
//!   membership edits without a selection-changed notification.
//!
//! Every update returns a [`SelectionChange`] telling the host whether to emit
//! a notification and which index should receive focus. The set never emits
//! anything itself.
//!
//! When the underlying collection changes, call [`SelectionSet::on_inserted`]
//! and [`SelectionSet::on_removed`] so the indices keep pointing at the same
//! elements.
//!
//! ## Minimal example
//!
//! ```rust
//! use sliceview_selection::{Modifiers, SelectMode, SelectionSet};
//!
//! let mut sel = SelectionSet::new();
//! sel.apply(2, SelectMode::SelectOne, 10);
//! let change = sel.apply(5, SelectMode::from_modifiers(Modifiers::SHIFT), 10);
//!
//! assert_eq!(sel.sorted(), vec![2, 3, 4, 5]);
//! assert_eq!(sel.active(), Some(5));
//! assert_eq!(change.notify, Some(5));
//!
//! // Deleting index 3 drops it and shifts the rest down.
//! sel.on_removed(3);
//! assert_eq!(sel.sorted(), vec![2, 3, 4]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod mode;
mod set;

pub use mode::{Modifiers, SelectMode};
pub use set::{SelectionChange, SelectionSet};
