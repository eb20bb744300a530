// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard and pointer input.
//!
//! Hosts translate their native events into [`KeyInput`] and
//! [`PointerInput`] and hand them to [`SliceView::handle_key`] and
//! [`SliceView::handle_pointer`]. Both return whether the input was consumed.
//!
//! Editable views navigate a multi-selection: modifiers pick the
//! [`SelectMode`], and the select-mode toggle turns plain moves into
//! continuous extension. Read-only views browse a single selection and, if
//! [`SliceViewConfig::inactive_key_nav`](crate::SliceViewConfig) is set,
//! report Enter, Accept and Space as activation.

use kurbo::Point;
use sliceview_selection::{Modifiers, SelectMode};

use crate::{SliceError, SliceView, SliceViewEvent};

/// Key bindings resolved by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyFunction {
    /// Previous element.
    MoveUp,
    /// Next element.
    MoveDown,
    /// One page back.
    PageUp,
    /// One page forward.
    PageDown,
    /// Toggle select mode.
    SelectMode,
    /// Select everything.
    SelectAll,
    /// Clear the selection.
    CancelSelect,
    /// Duplicate the selection.
    Duplicate,
    /// Insert before the active element.
    Insert,
    /// Insert after the active element.
    InsertAfter,
    /// Copy the selection.
    Copy,
    /// Cut the selection.
    Cut,
    /// Paste at the active element.
    Paste,
    /// Enter.
    Enter,
    /// Accept, e.g. Ctrl+Enter.
    Accept,
    /// Anything else; see [`KeyInput::ch`].
    Other,
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// The bound function.
    pub function: KeyFunction,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// The typed character, if any.
    pub ch: Option<char>,
}

impl KeyInput {
    /// A key with no modifiers.
    #[must_use]
    pub fn new(function: KeyFunction) -> Self {
        Self {
            function,
            modifiers: Modifiers::empty(),
            ch: None,
        }
    }

    /// A plain typed character.
    #[must_use]
    pub fn char(ch: char) -> Self {
        Self {
            function: KeyFunction::Other,
            modifiers: Modifiers::empty(),
            ch: Some(ch),
        }
    }

    /// Adds `modifiers`.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// Pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary.
    Left,
    /// Middle.
    Middle,
    /// Secondary.
    Right,
}

/// Pointer button transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerAction {
    /// Button went down.
    Press,
    /// Button went up.
    Release,
    /// Second press of a double click.
    DoubleClick,
}

/// A pointer button event in the view's coordinate space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Which button.
    pub button: PointerButton,
    /// What it did.
    pub action: PointerAction,
    /// Where.
    pub position: Point,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

fn report<T>(what: &str, result: Result<T, SliceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("{what}: {err}");
            None
        }
    }
}

impl SliceView {
    /// Handles a key press. Returns `true` if it was consumed.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        if !self.is_attached() {
            return false;
        }
        if self.config.read_only {
            self.config.inactive_key_nav && self.browse_key(key)
        } else {
            self.edit_key(key)
        }
    }

    /// Handles a pointer event. Returns `true` if it was consumed.
    pub fn handle_pointer(&mut self, pointer: PointerInput) -> bool {
        if !self.is_attached() {
            return false;
        }
        match (pointer.button, pointer.action) {
            (PointerButton::Left, PointerAction::DoubleClick) => {
                let active = self.selection.active();
                self.push_event(SliceViewEvent::DoubleClicked(active));
                true
            }
            (PointerButton::Right, PointerAction::Release) => self
                .selection
                .active()
                .is_some_and(|active| self.open_context_menu(active)),
            (PointerButton::Left, PointerAction::Press) => {
                let Some(index) = self
                    .window
                    .row_at_point(pointer.position)
                    .and_then(|row| self.window.index_of_row(row))
                else {
                    return false;
                };
                self.select_with(index, SelectMode::from_modifiers(pointer.modifiers));
                true
            }
            _ => false,
        }
    }

    fn edit_key(&mut self, key: KeyInput) -> bool {
        let mut mode = SelectMode::from_modifiers(key.modifiers);
        if mode == SelectMode::SelectOne && self.select_mode {
            mode = SelectMode::ExtendContinuous;
        }
        let active = self.selection.active();
        let len = self.slice_len();
        let page = self.window.visible_rows().max(1);
        log::debug!("key {:?}: mode {mode:?}, active {active:?}", key.function);
        match key.function {
            KeyFunction::MoveDown => {
                self.move_down(1, mode);
            }
            KeyFunction::MoveUp => {
                self.move_up(1, mode);
            }
            KeyFunction::PageDown => {
                self.move_down(page, mode);
            }
            KeyFunction::PageUp => {
                self.move_up(page, mode);
            }
            KeyFunction::SelectMode => self.select_mode = !self.select_mode,
            KeyFunction::SelectAll => {
                self.selection.select_all(len);
                self.select_mode = false;
                self.apply_row_states();
            }
            KeyFunction::CancelSelect => {
                self.selection.clear();
                self.select_mode = false;
                self.apply_row_states();
            }
            KeyFunction::Duplicate => {
                self.select_mode = false;
                if let Some(lowest) = report("duplicate", self.duplicate()) {
                    self.select_with(lowest + 1, SelectMode::SelectOne);
                }
            }
            KeyFunction::Insert | KeyFunction::InsertAfter => {
                self.select_mode = false;
                let at = match (key.function, active) {
                    (KeyFunction::Insert, Some(active)) => active,
                    (KeyFunction::Insert, None) => len,
                    (_, Some(active)) => active + 1,
                    (_, None) => 0,
                };
                if let Some(at) = report("insert", self.insert_at(at)) {
                    self.select_with(at, SelectMode::SelectOne);
                }
            }
            KeyFunction::Copy => {
                self.select_mode = false;
                report("copy", self.copy_selected(true));
                if let Some(active) = active {
                    self.select_with(active, SelectMode::SelectOne);
                }
            }
            KeyFunction::Cut => {
                self.select_mode = false;
                report("cut", self.cut_selected());
            }
            KeyFunction::Paste => {
                self.select_mode = false;
                self.paste_from_clipboard(active.unwrap_or(len));
            }
            KeyFunction::Enter | KeyFunction::Accept | KeyFunction::Other => return false,
        }
        true
    }

    fn browse_key(&mut self, key: KeyInput) -> bool {
        let len = self.slice_len();
        let Some(last) = len.checked_sub(1) else {
            return false;
        };
        let active = self.selection.active();
        let page = self.window.visible_rows().saturating_sub(1);
        let target = match key.function {
            KeyFunction::MoveDown => match active.map_or(0, |a| a + 1) {
                next if next <= last => next,
                _ => return false,
            },
            KeyFunction::MoveUp => match active {
                Some(a) if a > 0 => a - 1,
                _ => return false,
            },
            KeyFunction::PageDown => active
                .map_or(page.saturating_sub(1), |a| a + page)
                .min(last),
            KeyFunction::PageUp => active.map_or(0, |a| a.saturating_sub(page)),
            KeyFunction::Enter | KeyFunction::Accept => {
                self.push_event(SliceViewEvent::DoubleClicked(active));
                return true;
            }
            _ if key.ch == Some(' ') => {
                self.push_event(SliceViewEvent::DoubleClicked(active));
                return true;
            }
            _ => return false,
        };
        log::debug!("browse {:?} to {target}", key.function);
        self.scroll_to(target);
        self.select_with(target, SelectMode::SelectOne);
        true
    }

    fn move_down(&mut self, step: usize, mode: SelectMode) -> Option<usize> {
        let last = self.slice_len().checked_sub(1)?;
        let next = match self.selection.active() {
            Some(active) if active >= last => {
                self.selection.set_active(Some(last));
                return None;
            }
            Some(active) => (active + step).min(last),
            None => (step - 1).min(last),
        };
        self.move_to(next, mode)
    }

    fn move_up(&mut self, step: usize, mode: SelectMode) -> Option<usize> {
        let last = self.slice_len().checked_sub(1)?;
        let next = match self.selection.active() {
            None | Some(0) => {
                self.selection.set_active(Some(0));
                return None;
            }
            Some(active) => active.saturating_sub(step).min(last),
        };
        self.move_to(next, mode)
    }

    fn move_to(&mut self, index: usize, mode: SelectMode) -> Option<usize> {
        self.select_with(index, mode);
        self.selection.set_active(Some(index));
        self.scroll_to(index);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{KeyFunction, KeyInput, PointerAction, PointerButton, PointerInput};
    use crate::test_util::{ROW_HEIGHT, fixture, int_view, label};
    use crate::{MenuKind, Modifiers, SliceViewConfig, SliceViewEvent};

    fn key(function: KeyFunction) -> KeyInput {
        KeyInput::new(function)
    }

    fn click(row: usize, modifiers: Modifiers) -> PointerInput {
        PointerInput {
            button: PointerButton::Left,
            action: PointerAction::Press,
            position: Point::new(5.0, row as f64 * ROW_HEIGHT + 1.0),
            modifiers,
        }
    }

    fn read_only() -> SliceViewConfig {
        SliceViewConfig {
            read_only: true,
            ..SliceViewConfig::default()
        }
    }

    #[test]
    fn arrows_move_and_scroll() {
        let items: Vec<i32> = (0..30).collect();
        let (mut view, _items) = int_view(&items, 10);
        assert!(view.handle_key(key(KeyFunction::MoveDown)));
        assert_eq!(view.selected_indices(), vec![0]);
        for _ in 0..12 {
            view.handle_key(key(KeyFunction::MoveDown));
        }
        assert_eq!(view.active_index(), Some(12));
        assert!(view.window().is_index_visible(12));
        assert_eq!(view.window().start_index(), 3);

        view.handle_key(key(KeyFunction::PageDown));
        assert_eq!(view.active_index(), Some(22));
        view.handle_key(key(KeyFunction::PageDown));
        assert_eq!(view.active_index(), Some(29));
        view.handle_key(key(KeyFunction::PageDown));
        assert_eq!(view.active_index(), Some(29));
        view.handle_key(key(KeyFunction::PageUp));
        assert_eq!(view.active_index(), Some(19));
        assert_eq!(view.selected_indices(), vec![19]);
    }

    #[test]
    fn shift_and_select_mode_extend() {
        let items: Vec<i32> = (0..10).collect();
        let (mut view, _items) = int_view(&items, 10);
        view.handle_pointer(click(2, Modifiers::empty()));
        for _ in 0..3 {
            view.handle_key(key(KeyFunction::MoveDown).with_modifiers(Modifiers::SHIFT));
        }
        assert_eq!(view.selected_indices(), vec![2, 3, 4, 5]);

        view.handle_key(key(KeyFunction::CancelSelect));
        assert!(view.selection().is_empty());
        view.handle_key(key(KeyFunction::SelectMode));
        assert!(view.select_mode());
        view.handle_key(key(KeyFunction::MoveUp));
        view.handle_key(key(KeyFunction::MoveUp));
        assert_eq!(view.selected_indices(), vec![3, 4]);
        view.handle_key(key(KeyFunction::SelectAll));
        assert_eq!(view.selection().len(), 10);
        assert!(!view.select_mode());
    }

    #[test]
    fn control_click_toggles() {
        let (mut view, _items) = int_view(&[1, 2, 3, 4], 10);
        view.handle_pointer(click(0, Modifiers::empty()));
        view.handle_pointer(click(2, Modifiers::CONTROL));
        assert_eq!(view.selected_indices(), vec![0, 2]);
        assert!(label(&view, 2).selected);
        view.handle_pointer(click(2, Modifiers::CONTROL));
        assert_eq!(view.selected_indices(), vec![0]);
        assert!(!label(&view, 2).selected);
        assert!(!view.handle_pointer(click(7, Modifiers::empty())));
    }

    #[test]
    fn insert_keys_select_the_new_element() {
        let (mut view, items) = int_view(&[5, 6, 7], 10);
        view.select_index(1);
        view.handle_key(key(KeyFunction::Insert));
        assert_eq!(*items.borrow(), vec![5, 0, 6, 7]);
        assert_eq!(view.selected_indices(), vec![1]);
        view.handle_key(key(KeyFunction::InsertAfter));
        assert_eq!(*items.borrow(), vec![5, 0, 0, 6, 7]);
        assert_eq!(view.selected_indices(), vec![2]);
    }

    #[test]
    fn clipboard_keys() {
        let mut fx = fixture(vec![1, 2, 3], 10, SliceViewConfig::default());
        fx.view.select_index(0);
        fx.view.handle_key(key(KeyFunction::Copy));
        assert_eq!(fx.clipboard.borrow().contents().len(), 1);
        assert_eq!(fx.view.selected_indices(), vec![0]);

        fx.view.handle_key(key(KeyFunction::Paste));
        assert_eq!(fx.view.menu().map(|m| m.kind()), Some(MenuKind::Paste));
        fx.view.dismiss_menu();

        fx.view.select_index(2);
        fx.view.handle_key(key(KeyFunction::Cut));
        assert_eq!(*fx.items.borrow(), vec![1, 2]);

        fx.view.select_index(0);
        fx.view.handle_key(key(KeyFunction::Duplicate));
        assert_eq!(*fx.items.borrow(), vec![1, 1, 2]);
        assert_eq!(fx.view.selected_indices(), vec![1]);
    }

    #[test]
    fn fixed_size_insert_is_a_no_op() {
        let mut fx = fixture([1, 2], 10, SliceViewConfig::default());
        fx.view.select_index(0);
        assert!(fx.view.handle_key(key(KeyFunction::Insert)));
        assert_eq!(*fx.items.borrow(), [1, 2]);
        assert!(!fx.view.is_changed());
    }

    #[test]
    fn browse_keys_and_activation() {
        let items: Vec<i32> = (0..20).collect();
        let mut fx = fixture(items, 10, read_only());
        let view = &mut fx.view;
        assert!(!view.handle_key(key(KeyFunction::MoveUp)));
        assert!(view.handle_key(key(KeyFunction::MoveDown)));
        assert_eq!(view.active_index(), Some(0));
        view.handle_key(key(KeyFunction::PageDown));
        assert_eq!(view.active_index(), Some(9));
        view.handle_key(key(KeyFunction::PageUp));
        assert_eq!(view.active_index(), Some(0));
        // Modifiers never extend a browse selection.
        view.handle_key(key(KeyFunction::MoveDown).with_modifiers(Modifiers::SHIFT));
        assert_eq!(view.selected_indices(), vec![1]);

        view.drain_events().for_each(drop);
        assert!(view.handle_key(KeyInput::char(' ')));
        assert!(view.handle_key(key(KeyFunction::Enter)));
        assert!(!view.handle_key(key(KeyFunction::Insert)));
        let events: Vec<_> = view.drain_events().collect();
        assert_eq!(
            events,
            vec![
                SliceViewEvent::DoubleClicked(Some(1)),
                SliceViewEvent::DoubleClicked(Some(1))
            ]
        );
    }

    #[test]
    fn browse_keys_can_be_disabled() {
        let config = SliceViewConfig {
            inactive_key_nav: false,
            ..read_only()
        };
        let mut fx = fixture(vec![1, 2], 10, config);
        assert!(!fx.view.handle_key(key(KeyFunction::MoveDown)));
    }

    #[test]
    fn browse_click_never_unselects() {
        let mut fx = fixture(vec![1, 2, 3], 10, read_only());
        fx.view.handle_pointer(click(1, Modifiers::CONTROL));
        fx.view.handle_pointer(click(1, Modifiers::CONTROL));
        assert_eq!(fx.view.selected_indices(), vec![1]);
        let events: Vec<_> = fx.view.drain_events().collect();
        assert_eq!(events, vec![SliceViewEvent::Selected(1)]);
    }

    #[test]
    fn double_click_and_context_menu() {
        let (mut view, _items) = int_view(&[1, 2, 3], 10);
        let right = PointerInput {
            button: PointerButton::Right,
            action: PointerAction::Release,
            position: Point::ZERO,
            modifiers: Modifiers::empty(),
        };
        assert!(!view.handle_pointer(right));
        view.handle_pointer(click(1, Modifiers::empty()));
        assert!(view.handle_pointer(right));
        assert_eq!(view.menu().map(|m| (m.kind(), m.index())), Some((MenuKind::Context, 1)));

        view.drain_events().for_each(drop);
        view.handle_pointer(PointerInput {
            action: PointerAction::DoubleClick,
            ..click(1, Modifiers::empty())
        });
        let events: Vec<_> = view.drain_events().collect();
        assert_eq!(events, vec![SliceViewEvent::DoubleClicked(Some(1))]);
    }
}
