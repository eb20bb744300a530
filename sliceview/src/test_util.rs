// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::{
    AdapterFactory, AdapterRegistry, Collection, ElementKind, MemoryClipboard, RowWidget,
    SliceElement, SliceView, SliceViewConfig, ValueAdapter, WidgetKind,
};

pub(crate) const ROW_HEIGHT: f64 = 20.0;

#[derive(Debug, Default)]
pub(crate) struct Label {
    pub(crate) text: String,
    pub(crate) selected: bool,
    pub(crate) read_only: bool,
    pub(crate) focused: bool,
    pub(crate) styled: Option<usize>,
}

impl RowWidget for Label {
    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn grab_focus(&mut self) {
        self.focused = true;
    }
}

#[derive(Debug, Default)]
pub(crate) struct Spin {
    pub(crate) value: i32,
}

impl RowWidget for Spin {
    fn set_selected(&mut self, _selected: bool) {}

    fn set_read_only(&mut self, _read_only: bool) {}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(i32),
}

impl SliceElement for Cell {
    fn element_kind(&self) -> ElementKind {
        match self {
            Self::Empty => ElementKind::tagged::<Self>(0, "Cell::Empty"),
            Self::Text(_) => ElementKind::tagged::<Self>(1, "Cell::Text"),
            Self::Number(_) => ElementKind::tagged::<Self>(2, "Cell::Number"),
        }
    }
}

fn describe(value: &dyn Any) -> String {
    if let Some(v) = value.downcast_ref::<i32>() {
        v.to_string()
    } else if let Some(v) = value.downcast_ref::<String>() {
        v.clone()
    } else if let Some(Cell::Text(v)) = value.downcast_ref::<Cell>() {
        v.clone()
    } else if let Some(Cell::Number(v)) = value.downcast_ref::<Cell>() {
        v.to_string()
    } else {
        String::from("?")
    }
}

/// Shows any supported value as text and parses edits back.
pub(crate) struct TextAdapter;

impl ValueAdapter for TextAdapter {
    fn widget_kind(&self) -> WidgetKind {
        WidgetKind("label")
    }

    fn build_widget(&self) -> Box<dyn RowWidget> {
        Box::new(Label::default())
    }

    fn bind(&self, widget: &mut dyn RowWidget, value: &dyn Any, _index: usize) {
        if let Some(label) = (widget as &mut dyn Any).downcast_mut::<Label>() {
            label.text = describe(value);
        }
    }

    fn write_back(&self, widget: &dyn RowWidget, value: &mut dyn Any) -> bool {
        let Some(label) = (widget as &dyn Any).downcast_ref::<Label>() else {
            return false;
        };
        if let Some(v) = value.downcast_mut::<i32>() {
            match label.text.parse() {
                Ok(parsed) if parsed != *v => {
                    *v = parsed;
                    true
                }
                _ => false,
            }
        } else if let Some(v) = value.downcast_mut::<String>() {
            if *v == label.text {
                return false;
            }
            v.clone_from(&label.text);
            true
        } else {
            false
        }
    }
}

pub(crate) struct SpinAdapter;

impl ValueAdapter for SpinAdapter {
    fn widget_kind(&self) -> WidgetKind {
        WidgetKind("spin")
    }

    fn build_widget(&self) -> Box<dyn RowWidget> {
        Box::new(Spin::default())
    }

    fn bind(&self, widget: &mut dyn RowWidget, value: &dyn Any, _index: usize) {
        if let (Some(spin), Some(Cell::Number(n))) = (
            (widget as &mut dyn Any).downcast_mut::<Spin>(),
            value.downcast_ref::<Cell>(),
        ) {
            spin.value = *n;
        }
    }
}

pub(crate) struct Factory(pub(crate) fn() -> Box<dyn ValueAdapter>);

impl AdapterFactory for Factory {
    fn create(&self) -> Box<dyn ValueAdapter> {
        (self.0)()
    }
}

fn text() -> Box<dyn ValueAdapter> {
    Box::new(TextAdapter)
}

fn spin() -> Box<dyn ValueAdapter> {
    Box::new(SpinAdapter)
}

/// Adapters for `i32`, `String`, `Cell::Text` and `Cell::Number`; `Cell::Empty` is left out.
pub(crate) fn registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register_fn::<i32>(text);
    registry.register_fn::<String>(text);
    registry.register_kind(Cell::Text(String::new()).element_kind(), Factory(text));
    registry.register_kind(Cell::Number(0).element_kind(), Factory(spin));
    registry
}

pub(crate) struct Fixture<C> {
    pub(crate) view: SliceView,
    pub(crate) items: Rc<RefCell<C>>,
    pub(crate) clipboard: Rc<RefCell<MemoryClipboard>>,
}

pub(crate) fn fixture<C: Collection + 'static>(
    items: C,
    rows: usize,
    config: SliceViewConfig,
) -> Fixture<C> {
    let clipboard = Rc::new(RefCell::new(MemoryClipboard::new()));
    let mut view = SliceView::new(Rc::new(registry()), clipboard.clone(), config);
    view.layout(viewport(rows), ROW_HEIGHT);
    let items = Rc::new(RefCell::new(items));
    view.set_slice(&items);
    Fixture {
        view,
        items,
        clipboard,
    }
}

pub(crate) fn viewport(rows: usize) -> Rect {
    Rect::new(0.0, 0.0, 200.0, rows as f64 * ROW_HEIGHT)
}

pub(crate) fn int_view(items: &[i32], rows: usize) -> (SliceView, Rc<RefCell<Vec<i32>>>) {
    let fx = fixture(items.to_vec(), rows, SliceViewConfig::default());
    (fx.view, fx.items)
}

pub(crate) fn label(view: &SliceView, row: usize) -> &Label {
    view.row_widget(row)
        .and_then(|w| (w as &dyn Any).downcast_ref::<Label>())
        .expect("row shows a label")
}
