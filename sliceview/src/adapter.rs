// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value adapters: the binding between an element kind and a row widget.
//!
//! The host registers one [`AdapterFactory`] per [`ElementKind`] in an
//! [`AdapterRegistry`], which is then shared with every view through an
//! `Rc`. During sync each displayed row owns one [`ValueAdapter`] created by
//! the factory for its element's kind, plus the [`RowWidget`] the adapter
//! built.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::{ElementKind, MenuEntry, SliceElement, SliceError};

/// A host widget occupying one row slot.
///
/// Concrete widget types are reached by upcasting to `dyn Any`.
pub trait RowWidget: Any {
    /// Shows or hides the selection highlight.
    fn set_selected(&mut self, selected: bool);

    /// Enables or disables editing.
    fn set_read_only(&mut self, read_only: bool);

    /// Moves keyboard focus to this widget.
    fn grab_focus(&mut self) {}
}

/// Identifies the concrete widget type an adapter builds.
///
/// Two adapters with the same widget kind can share a widget instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WidgetKind(pub &'static str);

/// Binds element values of one kind to row widgets.
pub trait ValueAdapter {
    /// The kind of widget [`ValueAdapter::build_widget`] returns.
    fn widget_kind(&self) -> WidgetKind;

    /// Builds a fresh widget for a row.
    fn build_widget(&self) -> Box<dyn RowWidget>;

    /// Shows `value`, the element at logical `index`, in `widget`.
    fn bind(&self, widget: &mut dyn RowWidget, value: &dyn Any, index: usize);

    /// Refreshes `widget` after `value` changed in place.
    ///
    /// Defaults to a full [`ValueAdapter::bind`].
    fn refresh(&self, widget: &mut dyn RowWidget, value: &dyn Any, index: usize) {
        self.bind(widget, value, index);
    }

    /// Writes an edit made in `widget` back into `value`.
    ///
    /// Returns `true` if `value` changed.
    fn write_back(&self, widget: &dyn RowWidget, value: &mut dyn Any) -> bool {
        let _ = (widget, value);
        false
    }
}

/// Produces [`ValueAdapter`]s for one element kind and describes its extras.
pub trait AdapterFactory {
    /// Creates the adapter for one row.
    fn create(&self) -> Box<dyn ValueAdapter>;

    /// Whether values of this kind contribute their own context menu.
    fn has_context_menu(&self) -> bool {
        false
    }

    /// Context menu entries for `value`.
    ///
    /// Only consulted when [`AdapterFactory::has_context_menu`] is `true`.
    fn context_menu(&self, value: &dyn Any, read_only: bool) -> Vec<MenuEntry> {
        let _ = (value, read_only);
        Vec::new()
    }

    /// Whether values of this kind provide a toolbar.
    fn has_toolbar(&self) -> bool {
        false
    }
}

struct FnFactory<F>(F);

impl<F> AdapterFactory for FnFactory<F>
where
    F: Fn() -> Box<dyn ValueAdapter>,
{
    fn create(&self) -> Box<dyn ValueAdapter> {
        (self.0)()
    }
}

/// Maps element kinds to adapter factories.
///
/// Built once by the host and shared by views as `Rc<AdapterRegistry>`.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: HashMap<ElementKind, Rc<dyn AdapterFactory>>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.factories.keys().map(ElementKind::name).collect::<Vec<_>>())
            .finish()
    }
}

impl AdapterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for the default kind of `T`.
    pub fn register<T: SliceElement>(&mut self, factory: impl AdapterFactory + 'static) {
        self.register_kind(ElementKind::of::<T>(), factory);
    }

    /// Registers `factory` for `kind`, replacing any earlier registration.
    pub fn register_kind(&mut self, kind: ElementKind, factory: impl AdapterFactory + 'static) {
        self.factories.insert(kind, Rc::new(factory));
    }

    /// Registers a plain adapter constructor for the default kind of `T`.
    pub fn register_fn<T: SliceElement>(
        &mut self,
        create: impl Fn() -> Box<dyn ValueAdapter> + 'static,
    ) {
        self.register::<T>(FnFactory(create));
    }

    /// Returns `true` if `kind` has a registered factory.
    #[must_use]
    pub fn contains(&self, kind: ElementKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Creates a row adapter for `kind`.
    pub fn adapter_for(&self, kind: ElementKind) -> Result<Box<dyn ValueAdapter>, SliceError> {
        self.factory(kind).map(|f| f.create())
    }

    /// Whether values of `kind` contribute their own context menu.
    #[must_use]
    pub fn has_context_menu(&self, kind: ElementKind) -> bool {
        self.factory(kind).is_ok_and(|f| f.has_context_menu())
    }

    /// Whether values of `kind` provide a toolbar.
    #[must_use]
    pub fn has_toolbar(&self, kind: ElementKind) -> bool {
        self.factory(kind).is_ok_and(|f| f.has_toolbar())
    }

    /// Custom context menu for `value` of `kind`, if the kind has one.
    #[must_use]
    pub fn context_menu(
        &self,
        kind: ElementKind,
        value: &dyn Any,
        read_only: bool,
    ) -> Option<Vec<MenuEntry>> {
        let factory = self.factory(kind).ok()?;
        factory
            .has_context_menu()
            .then(|| factory.context_menu(value, read_only))
    }

    fn factory(&self, kind: ElementKind) -> Result<&Rc<dyn AdapterFactory>, SliceError> {
        self.factories
            .get(&kind)
            .ok_or(SliceError::NoAdapter(kind.name()))
    }
}
