// Copyright 2025 the SliceView Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editing a `Vec` of tasks through a `SliceView`, without a real UI.
//!
//! This example shows how to:
//! - register a value adapter for a custom element type,
//! - drive the view with key and pointer input,
//! - copy, paste and drag elements through the paste and drop menus,
//! - drain the notifications the view queues for the host.
//!
//! Run:
//! - `cargo run -p sliceview_demos --example slice_editor`

use std::any::Any;
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use sliceview::{
    AdapterFactory, AdapterRegistry, DropMod, KeyFunction, KeyInput, MemoryClipboard, MenuCommand,
    MenuEntry, Modifiers, PointerAction, PointerButton, PointerInput, RowWidget, SliceElement,
    SliceView, SliceViewConfig, SliceViewEvent, ValueAdapter, WidgetKind,
};

const ROW_HEIGHT: f64 = 24.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Task {
    title: String,
    done: bool,
}

impl Task {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            done: false,
        }
    }
}

impl SliceElement for Task {}

/// Stand-in for a row widget: remembers what it would draw.
#[derive(Debug, Default)]
struct TaskRow {
    text: String,
    selected: bool,
}

impl RowWidget for TaskRow {
    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn set_read_only(&mut self, _read_only: bool) {}
}

struct TaskAdapter;

impl ValueAdapter for TaskAdapter {
    fn widget_kind(&self) -> WidgetKind {
        WidgetKind("task-row")
    }

    fn build_widget(&self) -> Box<dyn RowWidget> {
        Box::new(TaskRow::default())
    }

    fn bind(&self, widget: &mut dyn RowWidget, value: &dyn Any, index: usize) {
        let widget: &mut dyn Any = widget;
        if let (Some(row), Some(task)) =
            (widget.downcast_mut::<TaskRow>(), value.downcast_ref::<Task>())
        {
            let mark = if task.done { 'x' } else { ' ' };
            row.text = format!("{index:>2} [{mark}] {}", task.title);
        }
    }
}

/// Tasks get a "Toggle done" entry in their context menu.
struct TaskFactory;

const TOGGLE_DONE: u32 = 1;

impl AdapterFactory for TaskFactory {
    fn create(&self) -> Box<dyn ValueAdapter> {
        Box::new(TaskAdapter)
    }

    fn has_context_menu(&self) -> bool {
        true
    }

    fn context_menu(&self, value: &dyn Any, read_only: bool) -> Vec<MenuEntry> {
        if read_only {
            return Vec::new();
        }
        let label = match value.downcast_ref::<Task>() {
            Some(task) if task.done => "Mark open",
            _ => "Mark done",
        };
        vec![MenuEntry::action(label, MenuCommand::Custom(TOGGLE_DONE))]
    }
}

fn dump(view: &SliceView, title: &str) {
    println!("-- {title}");
    for row in 0..view.row_count() {
        let widget: Option<&dyn Any> = view.row_widget(row).map(|w| w as &dyn Any);
        if let Some(row) = widget.and_then(|w| w.downcast_ref::<TaskRow>()) {
            let cursor = if row.selected { '>' } else { ' ' };
            println!("{cursor} {}", row.text);
        }
    }
    let bar = view.scrollbar();
    println!(
        "   scrollbar: value {} of {}, page {}",
        bar.value, bar.max, bar.page_step
    );
}

fn report(view: &mut SliceView) {
    for event in view.drain_events() {
        println!("   event: {event:?}");
    }
}

fn click(row: usize, modifiers: Modifiers) -> PointerInput {
    PointerInput {
        button: PointerButton::Left,
        action: PointerAction::Press,
        position: Point::new(10.0, ROW_HEIGHT * row as f64 + ROW_HEIGHT / 2.0),
        modifiers,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut registry = AdapterRegistry::new();
    registry.register::<Task>(TaskFactory);
    let clipboard = Rc::new(RefCell::new(MemoryClipboard::new()));
    let config = SliceViewConfig {
        show_view_context_menu: true,
        ..SliceViewConfig::default()
    };
    let mut view = SliceView::new(Rc::new(registry), clipboard, config);

    let saves = Rc::new(RefCell::new(0_u32));
    let counter = saves.clone();
    view.set_persist_hook(move || *counter.borrow_mut() += 1);

    let tasks = Rc::new(RefCell::new(
        ["write parser", "fix scroll", "review", "ship", "rest", "plan next"]
            .into_iter()
            .map(Task::new)
            .collect::<Vec<_>>(),
    ));

    // Room for four rows.
    view.layout(Rect::new(0.0, 0.0, 320.0, ROW_HEIGHT * 4.0), ROW_HEIGHT);
    view.set_slice(&tasks);
    dump(&view, "attached");

    // Click the second row, shift-click the third, then page down.
    view.handle_pointer(click(1, Modifiers::empty()));
    view.handle_pointer(click(2, Modifiers::SHIFT));
    dump(&view, "selected 1..=2");
    report(&mut view);

    // Copy, move to the end and paste after it.
    view.handle_key(KeyInput::new(KeyFunction::Copy));
    view.handle_key(KeyInput::new(KeyFunction::PageDown));
    view.handle_key(KeyInput::new(KeyFunction::Paste));
    if let Some(menu) = view.menu() {
        println!("   {:?} menu at {}: {:?}", menu.kind(), menu.index(), menu.entries());
    }
    view.activate_menu(MenuCommand::PasteAfter);
    dump(&view, "pasted after the last task");
    report(&mut view);

    // Toggle a task through its own context menu.
    view.select_index(0);
    view.open_context_menu(0);
    view.activate_menu(MenuCommand::Custom(TOGGLE_DONE));
    let events: Vec<_> = view.drain_events().collect();
    for event in events {
        if let SliceViewEvent::CustomAction { index, id: TOGGLE_DONE } = event {
            if let Some(task) = tasks.borrow_mut().get_mut(index) {
                task.done = !task.done;
            }
            view.update_values();
        }
    }
    view.scroll_to(0);
    dump(&view, "first task done");

    // Drag the first task onto the fourth row and move it after it.
    view.select_index(0);
    if let Some(payload) = view.drag_start() {
        let target = click(3, Modifiers::SHIFT).position;
        view.drop_on_target(payload, DropMod::Move, target);
        view.activate_menu(MenuCommand::DropAfter);
    }
    dump(&view, "moved the first task down");
    report(&mut view);

    println!("-- final order");
    for task in tasks.borrow().iter() {
        println!("   {} {}", if task.done { "[x]" } else { "[ ]" }, task.title);
    }
    println!("   persisted {} times", saves.borrow());
    Ok(())
}
