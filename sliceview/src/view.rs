// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`SliceView`] controller and its row sync.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::Rect;
use sliceview_selection::{SelectMode, SelectionChange, SelectionSet};
use sliceview_window::{RowWindow, ScrollbarState};
use smallvec::SmallVec;

use crate::dnd::DragSession;
use crate::menu::Menu;
use crate::{
    AdapterRegistry, Clipboard, Collection, ElementKind, RowLayout, RowWidget, SliceElement,
    SliceError, SliceViewConfig, SliceViewEvent, ValueAdapter,
};

pub(crate) type SharedCollection = Rc<RefCell<dyn Collection>>;

type StyleHook = Box<dyn FnMut(&mut dyn RowWidget, usize)>;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// One materialized row: the adapter for the element kind it shows and the
/// widget that adapter bound.
struct RowSlot {
    kind: ElementKind,
    adapter: Box<dyn ValueAdapter>,
    widget: Box<dyn RowWidget>,
}

/// What a [`SliceView::sync`] pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Rows bound onto a widget that already existed.
    pub rebound: usize,
    /// Rows that needed a newly built widget.
    pub built: usize,
    /// Rows left empty because no adapter is registered for their element.
    pub skipped: usize,
}

/// Toolbar entries a host should offer above the rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Append a default element.
    Add,
    /// The element kind provides its own toolbar.
    Element(ElementKind),
}

/// A virtualized, editable view over a host collection.
///
/// The view holds a weak handle to the collection, materializes one row
/// widget per displayed row and keeps selection, scrolling and widget
/// bindings consistent as the collection is edited through it.
pub struct SliceView {
    pub(crate) id: u64,
    pub(crate) registry: Rc<AdapterRegistry>,
    pub(crate) clipboard: Rc<RefCell<dyn Clipboard>>,
    pub(crate) config: SliceViewConfig,
    pub(crate) layout: RowLayout,

    slice: Option<Weak<RefCell<dyn Collection>>>,
    resizable: bool,
    pub(crate) window: RowWindow,
    rows: Vec<Option<RowSlot>>,
    pending_value: Option<Box<dyn Any>>,

    pub(crate) selection: SelectionSet,
    pub(crate) select_mode: bool,
    in_focus_grab: bool,
    focused_row: Option<usize>,

    pub(crate) drag: Option<DragSession>,
    pub(crate) menu: Option<Menu>,

    pub(crate) persist: Option<Box<dyn FnMut()>>,
    style_hook: Option<StyleHook>,
    pub(crate) changed: bool,
    pub(crate) events: VecDeque<SliceViewEvent>,
    pub(crate) batch_depth: usize,
    pub(crate) pending_mutation: bool,
    pub(crate) pending_resync: bool,
}

impl fmt::Debug for SliceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceView")
            .field("config", &self.config)
            .field("attached", &self.is_attached())
            .field("window", &self.window)
            .field("selection", &self.selection)
            .field("rows", &self.rows.len())
            .field("changed", &self.changed)
            .finish_non_exhaustive()
    }
}

impl SliceView {
    /// Creates a detached view.
    pub fn new(
        registry: Rc<AdapterRegistry>,
        clipboard: Rc<RefCell<dyn Clipboard>>,
        config: SliceViewConfig,
    ) -> Self {
        Self {
            id: NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed),
            registry,
            clipboard,
            layout: RowLayout::new(&config, false),
            config,
            slice: None,
            resizable: false,
            window: RowWindow::new(),
            rows: Vec::new(),
            pending_value: None,
            selection: SelectionSet::new(),
            select_mode: false,
            in_focus_grab: false,
            focused_row: None,
            drag: None,
            menu: None,
            persist: None,
            style_hook: None,
            changed: false,
            events: VecDeque::new(),
            batch_depth: 0,
            pending_mutation: false,
            pending_resync: false,
        }
    }

    /// Attaches `slice`.
    ///
    /// Attaching a different collection than the current one resets the
    /// selection, the select-mode toggle and the scroll position, and rebuilds
    /// every row. Re-attaching the same collection only re-syncs.
    pub fn set_slice<C: Collection + 'static>(&mut self, slice: &Rc<RefCell<C>>) {
        let shared: SharedCollection = slice.clone();
        let handle = Rc::downgrade(&shared);
        let same = self
            .slice
            .as_ref()
            .is_some_and(|old| Weak::ptr_eq(old, &handle));
        self.resizable = shared.borrow().is_resizable();
        self.layout = RowLayout::new(&self.config, self.resizable);
        self.slice = Some(handle);
        if !same {
            self.selection = SelectionSet::new();
            self.select_mode = false;
            self.focused_row = None;
            self.drag = None;
            self.menu = None;
            self.changed = false;
            self.pending_value = None;
            self.rows.clear();
            self.window.set_start_index(0);
        }
        self.sync();
    }

    /// Drops the collection handle and releases all row widgets.
    pub fn detach(&mut self) {
        self.slice = None;
        self.pending_value = None;
        self.rows.clear();
        self.selection = SelectionSet::new();
        self.focused_row = None;
        self.drag = None;
        self.menu = None;
        self.window.reindex(0);
    }

    /// Returns `true` if a live collection is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.collection().is_ok()
    }

    /// Whether the attached collection can grow and shrink.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.is_attached() && self.resizable
    }

    pub(crate) fn collection(&self) -> Result<SharedCollection, SliceError> {
        self.slice
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(SliceError::Detached)
    }

    /// Current collection size, zero when detached.
    pub(crate) fn slice_len(&self) -> usize {
        self.collection().map_or(0, |c| c.borrow().len())
    }

    /// Places the view in `bounds` with rows of `row_height` and syncs.
    pub fn layout(&mut self, bounds: Rect, row_height: f64) -> SyncStats {
        if self.window.needs_layout(bounds.height()) {
            log::trace!("layout: {bounds:?} rows of {row_height}");
        }
        self.window.layout(bounds, row_height);
        self.sync()
    }

    /// Reconciles the row slots with the visible part of the collection.
    ///
    /// Rows whose element kind is unchanged are rebound in place. A row is
    /// only built anew when the number of displayed rows changed or its
    /// element kind maps to a different widget.
    pub fn sync(&mut self) -> SyncStats {
        let mut stats = SyncStats::default();
        let Ok(shared) = self.collection() else {
            self.rows.clear();
            self.window.reindex(0);
            self.window.mark_rendered();
            return stats;
        };
        let len = shared.borrow().len();
        self.window.reindex(len);
        self.selection.retain_below(len);
        self.resolve_pending_value(&shared, len);

        let displayed = self.window.displayed_rows();
        if self.rows.len() != displayed {
            self.rows.clear();
            self.rows.resize_with(displayed, || None);
        }
        let start = self.window.start_index();
        {
            let collection = shared.borrow();
            for (row, slot) in self.rows.iter_mut().enumerate() {
                let index = start + row;
                let (Some(kind), Some(value)) =
                    (collection.kind_at(index), collection.element(index))
                else {
                    *slot = None;
                    stats.skipped += 1;
                    continue;
                };
                if let Some(bound) = slot.as_mut().filter(|b| b.kind == kind) {
                    bound.adapter.bind(&mut *bound.widget, value, index);
                    stats.rebound += 1;
                    continue;
                }
                let adapter = match self.registry.adapter_for(kind) {
                    Ok(adapter) => adapter,
                    Err(err) => {
                        log::warn!("row {row} (index {index}) left empty: {err}");
                        *slot = None;
                        stats.skipped += 1;
                        continue;
                    }
                };
                let widget = match slot.take() {
                    Some(old) if old.adapter.widget_kind() == adapter.widget_kind() => {
                        stats.rebound += 1;
                        old.widget
                    }
                    _ => {
                        stats.built += 1;
                        adapter.build_widget()
                    }
                };
                let bound = slot.insert(RowSlot {
                    kind,
                    adapter,
                    widget,
                });
                bound.adapter.bind(&mut *bound.widget, value, index);
            }
        }
        self.apply_row_states();
        self.window.mark_rendered();
        log::trace!("sync {start}..{}: {stats:?}", start + displayed);
        stats
    }

    /// Refreshes the bound widgets from their elements without rebinding.
    pub fn update_values(&mut self) {
        let Ok(shared) = self.collection() else {
            return;
        };
        let collection = shared.borrow();
        let start = self.window.start_index();
        for (row, slot) in self.rows.iter_mut().enumerate() {
            let Some(bound) = slot else {
                continue;
            };
            if let Some(value) = collection.element(start + row) {
                bound.adapter.refresh(&mut *bound.widget, value, start + row);
            }
        }
    }

    fn resolve_pending_value(&mut self, shared: &SharedCollection, len: usize) {
        let Some(value) = self.pending_value.take() else {
            return;
        };
        let found = shared.borrow().position_of(&*value);
        match found {
            Some(index) => {
                self.selection.apply(index, SelectMode::SelectOne, len);
                self.window.scroll_to(index);
            }
            None => self.pending_value = Some(value),
        }
    }

    /// Pushes selection, read-only state and the style hook onto every row.
    pub(crate) fn apply_row_states(&mut self) {
        let start = self.window.start_index();
        let read_only = self.config.read_only;
        for (row, slot) in self.rows.iter_mut().enumerate() {
            let Some(bound) = slot else {
                continue;
            };
            let index = start + row;
            bound.widget.set_selected(self.selection.contains(index));
            bound.widget.set_read_only(read_only);
            if let Some(hook) = self.style_hook.as_mut() {
                hook(&mut *bound.widget, index);
            }
        }
    }

    /// Scrolls the minimum amount to show `index`. Returns `true` if the view moved.
    ///
    /// Inside an [`UpdateBatch`](crate::UpdateBatch) the rows are rebound when
    /// the batch closes.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        if self.in_batch() {
            self.window.reindex(self.slice_len());
        }
        let moved = self.window.scroll_to(index);
        if moved {
            self.resync();
        }
        moved
    }

    /// Sets the first displayed index, as a scrollbar would.
    pub fn set_scroll_value(&mut self, start_index: usize) -> bool {
        if self.in_batch() {
            self.window.reindex(self.slice_len());
        }
        let moved = self.window.set_start_index(start_index);
        if moved {
            self.resync();
        }
        moved
    }

    fn resync(&mut self) {
        if self.in_batch() {
            self.mark_resync();
        } else {
            self.sync();
        }
    }

    /// Scrollbar parameters for the host.
    #[must_use]
    pub fn scrollbar(&self) -> ScrollbarState {
        self.window.scrollbar()
    }

    /// Selects the first element equal to `value` and scrolls to it.
    ///
    /// When no attached element matches yet, the value stays pending and is
    /// looked up again on every sync. Returns `true` once it has been found.
    pub fn select_value<T: SliceElement>(&mut self, value: T) -> bool {
        self.pending_value = Some(Box::new(value));
        if self.is_attached() {
            self.sync();
        }
        self.pending_value.is_none()
    }

    /// Selects exactly `index` and scrolls to it, without a notification.
    pub fn select_index(&mut self, index: usize) {
        let len = self.slice_len();
        self.selection.apply(index, SelectMode::SelectOne, len);
        if let Some(active) = self.selection.active() {
            self.scroll_to(active);
        }
        self.apply_row_states();
    }

    /// Applies a user selection update and reports it.
    ///
    /// Read-only views use single browse selection and ignore `mode`.
    pub(crate) fn select_with(&mut self, index: usize, mode: SelectMode) -> SelectionChange {
        let len = self.slice_len();
        let change = if self.config.read_only {
            self.selection.browse_select(index, len)
        } else {
            self.selection.apply(index, mode, len)
        };
        if let Some(focus) = change.focus {
            self.grab_index_focus(focus);
        }
        if let Some(index) = change.notify {
            self.push_event(SliceViewEvent::Selected(index));
        }
        self.apply_row_states();
        change
    }

    /// Scrolls to `index` and gives its row widget keyboard focus.
    ///
    /// Returns the focused row. Does nothing while a focus grab is already
    /// in progress.
    pub fn grab_index_focus(&mut self, index: usize) -> Option<usize> {
        if self.in_focus_grab {
            return None;
        }
        self.in_focus_grab = true;
        self.scroll_to(index);
        let row = self.window.row_of(index);
        if let Some(row) = row {
            if let Some(Some(bound)) = self.rows.get_mut(row) {
                bound.widget.grab_focus();
            }
            self.focused_row = Some(row);
        }
        self.in_focus_grab = false;
        row
    }

    /// Host notification that the widget in `row` received focus.
    ///
    /// Selects the row's index unless it is already active, or the focus
    /// change was caused by [`SliceView::grab_index_focus`].
    pub fn on_row_focused(&mut self, row: usize) {
        if self.in_focus_grab {
            return;
        }
        let Some(index) = self.window.index_of_row(row) else {
            return;
        };
        self.focused_row = Some(row);
        if self.selection.active() == Some(index) && self.selection.contains(index) {
            return;
        }
        self.in_focus_grab = true;
        self.select_with(index, SelectMode::SelectOne);
        self.in_focus_grab = false;
    }

    /// Row that last received focus.
    #[must_use]
    pub fn focused_row(&self) -> Option<usize> {
        self.focused_row
    }

    /// Toolbar entries for the current collection and policy.
    #[must_use]
    pub fn toolbar_actions(&self) -> SmallVec<[ToolbarAction; 2]> {
        let mut actions = SmallVec::new();
        let Ok(shared) = self.collection() else {
            return actions;
        };
        if self.config.read_only {
            return actions;
        }
        if self.resizable && !self.config.delete_only {
            actions.push(ToolbarAction::Add);
        }
        if let Some(kind) = shared.borrow().kind_at(0) {
            if self.registry.has_toolbar(kind) {
                actions.push(ToolbarAction::Element(kind));
            }
        }
        actions
    }

    /// Widget shown in display `row`.
    #[must_use]
    pub fn row_widget(&self, row: usize) -> Option<&dyn RowWidget> {
        self.rows.get(row)?.as_ref().map(|b| &*b.widget)
    }

    /// Element kind display `row` was built for.
    #[must_use]
    pub fn row_kind(&self, row: usize) -> Option<ElementKind> {
        self.rows.get(row)?.as_ref().map(|b| b.kind)
    }

    /// Number of materialized row slots.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Writes an edit made in the widget of display `row` back to its element.
    ///
    /// Returns `true` and reports a change if the element was modified.
    pub fn commit_row(&mut self, row: usize) -> Result<bool, SliceError> {
        let shared = self.collection()?;
        let index = self
            .window
            .index_of_row(row)
            .ok_or(SliceError::OutOfRange {
                index: row,
                len: self.window.displayed_rows(),
            })?;
        let Some(Some(bound)) = self.rows.get(row) else {
            return Ok(false);
        };
        let written = {
            let mut collection = shared.borrow_mut();
            let len = collection.len();
            let value = collection
                .element_mut(index)
                .ok_or(SliceError::OutOfRange { index, len })?;
            bound.adapter.write_back(&*bound.widget, value)
        };
        if written {
            self.batch().mark_mutated();
        }
        Ok(written)
    }

    /// Installs the hook run after every mutation, before the change is reported.
    pub fn set_persist_hook(&mut self, hook: impl FnMut() + 'static) {
        self.persist = Some(Box::new(hook));
    }

    /// Installs a hook run on each row widget after binding, with its logical index.
    pub fn set_style_hook(&mut self, hook: impl FnMut(&mut dyn RowWidget, usize) + 'static) {
        self.style_hook = Some(Box::new(hook));
        self.apply_row_states();
    }

    /// The view policy.
    #[must_use]
    pub fn config(&self) -> &SliceViewConfig {
        &self.config
    }

    /// Replaces the view policy and refreshes row state.
    pub fn set_config(&mut self, config: SliceViewConfig) {
        if config.read_only && !self.config.read_only {
            // Browse selection holds at most the active index.
            let active = self.selection.active();
            self.selection.clear();
            if let Some(active) = active {
                self.selection.insert(active);
            }
            self.select_mode = false;
        }
        self.config = config;
        self.layout = RowLayout::new(&self.config, self.resizable);
        self.apply_row_states();
    }

    /// Columns of each row under the current policy.
    #[must_use]
    pub fn row_layout(&self) -> RowLayout {
        self.layout
    }

    /// The adapter registry this view resolves element kinds with.
    #[must_use]
    pub fn registry(&self) -> &Rc<AdapterRegistry> {
        &self.registry
    }

    /// Row projection state.
    #[must_use]
    pub fn window(&self) -> &RowWindow {
        &self.window
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.sorted()
    }

    /// The keyboard-navigation cursor.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.selection.active()
    }

    /// Whether plain moves currently extend the selection.
    #[must_use]
    pub fn select_mode(&self) -> bool {
        self.select_mode
    }

    /// Whether the collection was modified through this view.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Clears the changed flag, typically after the host saved.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }
}
