// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SliceView: a virtualized, editable list view over a host collection.
//!
//! A [`SliceView`] projects a collection owned by the host onto a small set of
//! row widgets, one per visible row, and keeps them consistent while the
//! user scrolls, selects, edits, copies, pastes and drags elements around.
//!
//! The pieces:
//!
//! - **Collection access** ([`Collection`], [`SliceElement`]): type-erased
//!   reads and writes. `Vec<T>` and `[T; N]` are supported out of the box.
//!   Elements travel through the clipboard as JSON [`MimeData`] records.
//! - **Adapters** ([`AdapterRegistry`], [`ValueAdapter`], [`RowWidget`]): the
//!   host registers one factory per [`ElementKind`]. During [`SliceView::sync`]
//!   each displayed row gets an adapter for its element's kind; widgets are
//!   rebound in place while scrolling and only rebuilt on structural change.
//! - **Row projection** ([`RowWindow`], from `sliceview_window`) and
//!   **selection** ([`SelectionSet`], from `sliceview_selection`).
//! - **Mutations** such as [`SliceView::insert_at`], [`SliceView::paste_insert`],
//!   [`SliceView::duplicate`] and [`SliceView::move_via_drop`], each run in an
//!   [`UpdateBatch`] that persists, reports and re-syncs once.
//! - **Interaction**: [`SliceView::handle_key`], [`SliceView::handle_pointer`],
//!   menus ([`Menu`]) and drag and drop ([`SliceView::drag_start`],
//!   [`SliceView::drop_on_target`]).
//!
//! The view reports back through a queue of [`SliceViewEvent`]s drained with
//! [`SliceView::drain_events`]. Diagnostics go through the [`log`] facade;
//! install a logger in the host to see them.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::any::Any;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Rect;
//! use sliceview::{
//!     AdapterRegistry, KeyFunction, KeyInput, MemoryClipboard, RowWidget, SliceView,
//!     SliceViewConfig, SliceViewEvent, ValueAdapter, WidgetKind,
//! };
//!
//! #[derive(Default)]
//! struct Text(String);
//!
//! impl RowWidget for Text {
//!     fn set_selected(&mut self, _selected: bool) {}
//!     fn set_read_only(&mut self, _read_only: bool) {}
//! }
//!
//! struct ShowInt;
//!
//! impl ValueAdapter for ShowInt {
//!     fn widget_kind(&self) -> WidgetKind {
//!         WidgetKind("text")
//!     }
//!     fn build_widget(&self) -> Box<dyn RowWidget> {
//!         Box::new(Text::default())
//!     }
//!     fn bind(&self, widget: &mut dyn RowWidget, value: &dyn Any, _index: usize) {
//!         if let (Some(text), Some(v)) = (
//!             (widget as &mut dyn Any).downcast_mut::<Text>(),
//!             value.downcast_ref::<i32>(),
//!         ) {
//!             text.0 = v.to_string();
//!         }
//!     }
//! }
//!
//! let mut registry = AdapterRegistry::new();
//! registry.register_fn::<i32>(|| Box::new(ShowInt));
//!
//! let clipboard = Rc::new(RefCell::new(MemoryClipboard::new()));
//! let mut view = SliceView::new(Rc::new(registry), clipboard, SliceViewConfig::default());
//! view.layout(Rect::new(0.0, 0.0, 200.0, 100.0), 20.0);
//!
//! let numbers = Rc::new(RefCell::new((0..100).collect::<Vec<i32>>()));
//! view.set_slice(&numbers);
//! assert_eq!(view.row_count(), 5);
//!
//! // Select 2, then insert a new element after it.
//! view.select_index(2);
//! view.handle_key(KeyInput::new(KeyFunction::InsertAfter));
//! assert_eq!(numbers.borrow()[..4], [0, 1, 2, 0]);
//! assert_eq!(view.selected_indices(), vec![3]);
//!
//! let events: Vec<_> = view.drain_events().collect();
//! assert!(events.contains(&SliceViewEvent::Changed));
//! ```

mod adapter;
mod clipboard;
mod collection;
mod config;
mod dnd;
mod error;
mod events;
mod interact;
mod menu;
mod mutate;
mod view;

#[cfg(test)]
mod test_util;

pub use adapter::{AdapterFactory, AdapterRegistry, RowWidget, ValueAdapter, WidgetKind};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use collection::{Collection, ElementKind, MIME_JSON, MimeData, Payload, SliceElement};
pub use config::{RowLayout, SliceViewConfig};
pub use dnd::{DropMod, InteractionState, MIME_DRAG_SOURCE};
pub use error::SliceError;
pub use events::{SliceViewEvent, UpdateBatch};
pub use interact::{KeyFunction, KeyInput, PointerAction, PointerButton, PointerInput};
pub use menu::{Menu, MenuCommand, MenuEntry, MenuKind};
pub use view::{SliceView, SyncStats, ToolbarAction};

pub use sliceview_selection::{Modifiers, SelectMode, SelectionChange, SelectionSet};
pub use sliceview_window::{RowWindow, ScrollbarState};
