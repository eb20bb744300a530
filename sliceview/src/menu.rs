// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context, paste and drop menus.
//!
//! A view only describes its menus. The host renders the open [`Menu`] at
//! its position and reports the chosen entry back through
//! [`SliceView::activate_menu`].

use kurbo::Point;
use sliceview_selection::SelectMode;

use crate::{DropMod, MIME_JSON, Payload, SliceError, SliceView, SliceViewEvent};

/// Which menu is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuKind {
    /// Right-click menu for an element.
    Context,
    /// Choice of how to paste clipboard contents.
    Paste,
    /// Choice of how to apply a drop.
    Drop,
}

/// Action behind a menu entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    /// Copy the selection and clear it.
    Copy,
    /// Cut the selection.
    Cut,
    /// Paste the clipboard at the menu's index.
    Paste,
    /// Duplicate the selection.
    Duplicate,
    /// Overwrite the element at the menu's index with the first pasted one.
    PasteAssign,
    /// Insert the pasted elements before the menu's index.
    PasteBefore,
    /// Insert the pasted elements after the menu's index.
    PasteAfter,
    /// Overwrite the element at the menu's index with the first dropped one.
    DropAssign,
    /// Insert the dropped elements before the menu's index.
    DropBefore,
    /// Insert the dropped elements after the menu's index.
    DropAfter,
    /// Close the menu without doing anything.
    Cancel,
    /// An entry contributed by an element's adapter factory.
    Custom(u32),
}

/// One line of a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    /// Inert heading.
    Label(String),
    /// Divider.
    Separator,
    /// Selectable entry.
    Action {
        /// Text shown to the user.
        label: String,
        /// What choosing it does.
        command: MenuCommand,
    },
}

impl MenuEntry {
    /// Shorthand for [`MenuEntry::Action`].
    pub fn action(label: impl Into<String>, command: MenuCommand) -> Self {
        Self::Action {
            label: label.into(),
            command,
        }
    }

    /// The entry's command, if it is selectable.
    #[must_use]
    pub fn command(&self) -> Option<MenuCommand> {
        match self {
            Self::Action { command, .. } => Some(*command),
            Self::Label(_) | Self::Separator => None,
        }
    }
}

/// An open menu waiting for the user's choice.
#[derive(Clone, Debug)]
pub struct Menu {
    kind: MenuKind,
    index: usize,
    entries: Vec<MenuEntry>,
    position: Option<Point>,
    payload: Payload,
    drop_mod: DropMod,
    from_self: bool,
}

impl Menu {
    /// Which menu this is.
    #[must_use]
    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    /// Logical index the menu applies to.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Where to pop the menu up, in the view's coordinate space.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Returns `true` if some entry carries `command`.
    #[must_use]
    pub fn offers(&self, command: MenuCommand) -> bool {
        self.entries.iter().any(|e| e.command() == Some(command))
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn drop_mod(&self) -> DropMod {
        self.drop_mod
    }

    /// Whether the dropped payload was dragged out of the same view.
    pub(crate) fn from_self(&self) -> bool {
        self.from_self
    }
}

fn standard_entries(resizable: bool, read_only: bool) -> Vec<MenuEntry> {
    if !resizable {
        return Vec::new();
    }
    if read_only {
        return vec![MenuEntry::action("Copy", MenuCommand::Copy)];
    }
    vec![
        MenuEntry::action("Copy", MenuCommand::Copy),
        MenuEntry::action("Cut", MenuCommand::Cut),
        MenuEntry::action("Paste", MenuCommand::Paste),
        MenuEntry::action("Duplicate", MenuCommand::Duplicate),
    ]
}

fn paste_entries() -> Vec<MenuEntry> {
    vec![
        MenuEntry::action("Assign To", MenuCommand::PasteAssign),
        MenuEntry::action("Insert Before", MenuCommand::PasteBefore),
        MenuEntry::action("Insert After", MenuCommand::PasteAfter),
        MenuEntry::action("Cancel", MenuCommand::Cancel),
    ]
}

pub(crate) fn drop_entries(mode: DropMod) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(5);
    match mode {
        DropMod::Copy => entries.push(MenuEntry::Label(String::from("Copy (Shift=Move):"))),
        DropMod::Move => entries.push(MenuEntry::Label(String::from("Move:"))),
        DropMod::Link | DropMod::Ignore => {}
    }
    if mode == DropMod::Copy {
        entries.push(MenuEntry::action("Assign To", MenuCommand::DropAssign));
    }
    entries.push(MenuEntry::action("Insert Before", MenuCommand::DropBefore));
    entries.push(MenuEntry::action("Insert After", MenuCommand::DropAfter));
    entries.push(MenuEntry::action("Cancel", MenuCommand::Cancel));
    entries
}

impl SliceView {
    /// The open menu, if any.
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub(crate) fn open_menu(
        &mut self,
        kind: MenuKind,
        index: usize,
        entries: Vec<MenuEntry>,
        payload: Payload,
        drop_mod: DropMod,
        from_self: bool,
    ) {
        log::debug!("open {kind:?} menu at {index} ({} entries)", entries.len());
        self.menu = Some(Menu {
            kind,
            index,
            entries,
            position: self.window.anchor_point(index),
            payload,
            drop_mod,
            from_self,
        });
    }

    /// Opens the context menu for the element at `index`.
    ///
    /// Kinds with their own menu show it, followed by the standard entries
    /// when [`SliceViewConfig::show_view_context_menu`](crate::SliceViewConfig)
    /// is set. Other kinds get the standard entries, which fixed-size
    /// collections do not have. Returns `true` if a menu opened.
    pub fn open_context_menu(&mut self, index: usize) -> bool {
        let Ok(shared) = self.collection() else {
            return false;
        };
        let read_only = self.config.read_only;
        let custom = {
            let collection = shared.borrow();
            let (Some(kind), Some(value)) = (collection.kind_at(index), collection.element(index))
            else {
                log::warn!("no context menu: index {index} out of range");
                return false;
            };
            self.registry.context_menu(kind, value, read_only)
        };
        let standard = standard_entries(self.is_resizable(), read_only);
        let entries = match custom {
            Some(mut entries) => {
                if self.config.show_view_context_menu && !standard.is_empty() {
                    entries.push(MenuEntry::Separator);
                    entries.extend(standard);
                }
                entries
            }
            None => standard,
        };
        if entries.is_empty() {
            return false;
        }
        self.open_menu(MenuKind::Context, index, entries, Payload::new(), DropMod::Ignore, false);
        true
    }

    /// Reads the clipboard and opens the paste menu for `index`.
    ///
    /// Clears the selection. Returns `false` when the clipboard holds
    /// nothing this view can paste.
    pub fn paste_from_clipboard(&mut self, index: usize) -> bool {
        let payload = self.clipboard.borrow().read(&[MIME_JSON]);
        if payload.is_empty() {
            log::debug!("nothing to paste");
            return false;
        }
        self.selection.clear();
        self.apply_row_states();
        self.open_menu(MenuKind::Paste, index, paste_entries(), payload, DropMod::Ignore, false);
        true
    }

    /// Runs the chosen entry of the open menu and closes it.
    ///
    /// Returns `false` if no menu is open or it does not offer `command`.
    /// Failures of the command itself are logged.
    pub fn activate_menu(&mut self, command: MenuCommand) -> bool {
        let Some(menu) = self.menu.take() else {
            return false;
        };
        if !menu.offers(command) {
            self.menu = Some(menu);
            return false;
        }
        log::debug!("{:?} menu: {command:?}", menu.kind);
        if let Err(err) = self.run_menu_command(command, &menu) {
            log::warn!("{command:?} failed: {err}");
        }
        true
    }

    /// Closes the open menu as if Cancel had been chosen.
    pub fn dismiss_menu(&mut self) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        if menu.kind == MenuKind::Drop {
            self.finalize_drop(DropMod::Ignore, menu.from_self);
        }
    }

    fn run_menu_command(&mut self, command: MenuCommand, menu: &Menu) -> Result<(), SliceError> {
        let index = menu.index;
        match command {
            MenuCommand::Copy => self.copy_selected(true).map(drop),
            MenuCommand::Cut => self.cut_selected(),
            MenuCommand::Paste => {
                self.paste_from_clipboard(index);
                Ok(())
            }
            MenuCommand::Duplicate => {
                let lowest = self.duplicate()?;
                self.select_with(lowest + 1, SelectMode::SelectOne);
                Ok(())
            }
            MenuCommand::PasteAssign => self.paste_assign(menu.payload(), index),
            MenuCommand::PasteBefore | MenuCommand::PasteAfter => {
                let at = if command == MenuCommand::PasteAfter {
                    index + 1
                } else {
                    index
                };
                let run = self.paste_insert(menu.payload(), at)?;
                self.select_with(run.start, SelectMode::SelectOne);
                Ok(())
            }
            MenuCommand::DropAssign | MenuCommand::DropBefore | MenuCommand::DropAfter => {
                self.finish_drop(command, menu)
            }
            MenuCommand::Cancel => {
                if menu.kind == MenuKind::Drop {
                    self.finalize_drop(DropMod::Ignore, menu.from_self);
                }
                Ok(())
            }
            MenuCommand::Custom(id) => {
                self.push_event(SliceViewEvent::CustomAction { index, id });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{MenuCommand, MenuEntry, MenuKind, drop_entries};
    use crate::test_util::{ROW_HEIGHT, TextAdapter, fixture, int_view, registry, viewport};
    use crate::{
        AdapterFactory, DropMod, MemoryClipboard, SliceView, SliceViewConfig, SliceViewEvent,
        ValueAdapter,
    };

    fn labels(entries: &[MenuEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|e| match e {
                MenuEntry::Label(text) | MenuEntry::Action { label: text, .. } => text.as_str(),
                MenuEntry::Separator => "-",
            })
            .collect()
    }

    #[test]
    fn drop_menu_labels() {
        assert_eq!(
            labels(&drop_entries(DropMod::Copy)),
            ["Copy (Shift=Move):", "Assign To", "Insert Before", "Insert After", "Cancel"]
        );
        assert_eq!(
            labels(&drop_entries(DropMod::Move)),
            ["Move:", "Insert Before", "Insert After", "Cancel"]
        );
    }

    #[test]
    fn standard_context_menu() {
        let (mut view, _items) = int_view(&[1, 2, 3], 10);
        assert!(view.open_context_menu(1));
        let menu = view.menu().unwrap();
        assert_eq!(menu.kind(), MenuKind::Context);
        assert_eq!(labels(menu.entries()), ["Copy", "Cut", "Paste", "Duplicate"]);
        assert!(menu.position().is_some());
        assert!(!view.open_context_menu(9));
    }

    #[test]
    fn fixed_size_has_no_standard_menu() {
        let mut fx = fixture([1, 2], 10, SliceViewConfig::default());
        assert!(!fx.view.open_context_menu(0));
        assert!(fx.view.menu().is_none());
    }

    struct WithMenu;

    impl AdapterFactory for WithMenu {
        fn create(&self) -> Box<dyn ValueAdapter> {
            Box::new(TextAdapter)
        }

        fn has_context_menu(&self) -> bool {
            true
        }

        fn context_menu(&self, _value: &dyn Any, _read_only: bool) -> Vec<MenuEntry> {
            vec![MenuEntry::action("Reset", MenuCommand::Custom(7))]
        }
    }

    fn custom_view(show_view_context_menu: bool) -> (SliceView, Rc<RefCell<Vec<i32>>>) {
        let mut reg = registry();
        reg.register::<i32>(WithMenu);
        let config = SliceViewConfig {
            show_view_context_menu,
            ..SliceViewConfig::default()
        };
        let clipboard = Rc::new(RefCell::new(MemoryClipboard::new()));
        let mut view = SliceView::new(Rc::new(reg), clipboard, config);
        view.layout(viewport(10), ROW_HEIGHT);
        let items = Rc::new(RefCell::new(vec![1, 2]));
        view.set_slice(&items);
        (view, items)
    }

    #[test]
    fn custom_menu_merges_with_standard() {
        let (mut view, _items) = custom_view(false);
        view.open_context_menu(0);
        assert_eq!(labels(view.menu().unwrap().entries()), ["Reset"]);
        assert!(view.activate_menu(MenuCommand::Custom(7)));
        let events: Vec<_> = view.drain_events().collect();
        assert_eq!(events, vec![SliceViewEvent::CustomAction { index: 0, id: 7 }]);

        let (mut view, _items) = custom_view(true);
        view.open_context_menu(1);
        assert_eq!(
            labels(view.menu().unwrap().entries()),
            ["Reset", "-", "Copy", "Cut", "Paste", "Duplicate"]
        );
    }

    #[test]
    fn unoffered_command_keeps_menu_open() {
        let (mut view, _items) = int_view(&[1, 2], 10);
        view.open_context_menu(0);
        assert!(!view.activate_menu(MenuCommand::DropAssign));
        assert!(view.menu().is_some());
        view.dismiss_menu();
        assert!(view.menu().is_none());
        assert!(!view.activate_menu(MenuCommand::Cancel));
    }

    #[test]
    fn paste_menu_assigns_or_inserts() {
        let mut fx = fixture(vec![1, 2, 3], 10, SliceViewConfig::default());
        assert!(!fx.view.paste_from_clipboard(0));
        fx.view.select_index(2);
        fx.view.copy_selected(true).unwrap();

        assert!(fx.view.paste_from_clipboard(0));
        assert_eq!(fx.view.menu().map(|m| m.kind()), Some(MenuKind::Paste));
        assert!(fx.view.activate_menu(MenuCommand::PasteAssign));
        assert_eq!(*fx.items.borrow(), vec![3, 2, 3]);

        fx.view.paste_from_clipboard(0);
        fx.view.activate_menu(MenuCommand::PasteAfter);
        assert_eq!(*fx.items.borrow(), vec![3, 3, 2, 3]);
        assert_eq!(fx.view.selected_indices(), vec![1]);
    }

    #[test]
    fn duplicate_from_menu_selects_first_copy() {
        let mut fx = fixture(vec![5, 6, 7], 10, SliceViewConfig::default());
        fx.view.select_index(0);
        fx.view.open_context_menu(0);
        fx.view.activate_menu(MenuCommand::Duplicate);
        assert_eq!(*fx.items.borrow(), vec![5, 5, 6, 7]);
        assert_eq!(fx.view.selected_indices(), vec![1]);
    }
}
