// SPDX-License-Identifier: MPL-2.0
//! Event-dispatch properties: the press/observe asymmetry, capability
//! matching and the view-handler gating.

use shutterdeck::application::port::panels::WidgetId;
use shutterdeck::config::Config;
use shutterdeck::domain::input::{Key, Modifiers, MouseButton, PressKind};
use shutterdeck::domain::ViewKind;
use shutterdeck::test_utils::{
    MemoryLibrary, RecordingPanelHost, RecordingSignalHub, RecordingSurface, ScriptedPlugin,
    ScriptedView,
};
use shutterdeck::views::manager::{SwitchTarget, ViewManager};
use shutterdeck::views::registry::{ModuleTable, MODULE_API_VERSION};
use std::cell::RefCell;
use std::rc::Rc;

fn manager_with_lighttable(log: &Rc<RefCell<Vec<String>>>) -> (ViewManager, ModuleTable) {
    let mut table = ModuleTable::new();
    {
        let log = Rc::clone(log);
        table.register("lighttable", MODULE_API_VERSION, move || {
            Box::new(ScriptedView::new(
                ViewKind::Lighttable,
                "lighttable",
                Rc::clone(&log),
            ))
        });
    }
    let manager = ViewManager::new(
        Box::new(RecordingPanelHost::new()),
        Box::new(RecordingSignalHub::new()),
        Box::new(MemoryLibrary::new()),
        Config::default(),
        false,
    );
    (manager, table)
}

fn register_plugin(
    manager: &mut ViewManager,
    name: &str,
    widget: u64,
    log: &Rc<RefCell<Vec<String>>>,
    configure: impl FnOnce(&mut ScriptedPlugin),
) {
    let mut plugin = ScriptedPlugin::new(
        name,
        Some(ViewKind::Lighttable.as_set()),
        WidgetId(widget),
        Rc::clone(log),
    );
    configure(&mut plugin);
    manager.register_plugin(Box::new(plugin));
}

#[test]
fn button_press_short_circuits_on_the_first_claiming_plugin() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    register_plugin(&mut manager, "older", 1, &log, |p| p.handles_press = true);
    register_plugin(&mut manager, "newer", 2, &log, |p| p.handles_press = true);
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    let handled = manager.button_pressed(
        10.0,
        10.0,
        0.5,
        MouseButton::PRIMARY,
        PressKind::Single,
        Modifiers::none(),
    );

    assert!(handled);
    let log = log.borrow();
    // Newest registration wins and the search stops there.
    assert!(log.iter().any(|e| e == "plugin:newer:button_pressed"));
    assert!(!log.iter().any(|e| e == "plugin:older:button_pressed"));
    assert!(!log.iter().any(|e| e == "lighttable:button_pressed"));
}

#[test]
fn unclaimed_button_press_propagates_the_view_result() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    register_plugin(&mut manager, "passive", 1, &log, |_| {});
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    // ScriptedView's handler reports handled.
    let handled = manager.button_pressed(
        10.0,
        10.0,
        0.5,
        MouseButton::PRIMARY,
        PressKind::Single,
        Modifiers::none(),
    );

    assert!(handled);
    let log = log.borrow();
    assert!(log.iter().any(|e| e == "plugin:passive:button_pressed"));
    assert!(log.iter().any(|e| e == "lighttable:button_pressed"));
}

#[test]
fn mouse_move_reaches_every_matching_plugin_even_when_claimed() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    register_plugin(&mut manager, "older", 1, &log, |p| p.handles_move = true);
    register_plugin(&mut manager, "newer", 2, &log, |p| p.handles_move = true);
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    manager.mouse_moved(5.0, 5.0, 0.0, MouseButton::PRIMARY);

    let log = log.borrow();
    // Both plugins observe the move; the view handler stays gated off.
    assert!(log.iter().any(|e| e == "plugin:newer:mouse_moved"));
    assert!(log.iter().any(|e| e == "plugin:older:mouse_moved"));
    assert!(!log.iter().any(|e| e == "lighttable:mouse_moved"));
}

#[test]
fn unclaimed_mouse_move_falls_through_to_the_view() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    register_plugin(&mut manager, "passive", 1, &log, |_| {});
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    manager.mouse_moved(5.0, 5.0, 0.0, MouseButton::PRIMARY);

    let log = log.borrow();
    assert!(log.iter().any(|e| e == "lighttable:mouse_moved"));
}

#[test]
fn scroll_is_observable_like_moves() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    register_plugin(&mut manager, "older", 1, &log, |p| p.handles_scroll = true);
    register_plugin(&mut manager, "newer", 2, &log, |p| p.handles_scroll = true);
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    manager.scrolled(0.0, 0.0, true, Modifiers::none());

    let log = log.borrow();
    assert!(log.iter().any(|e| e == "plugin:newer:scrolled"));
    assert!(log.iter().any(|e| e == "plugin:older:scrolled"));
    assert!(!log.iter().any(|e| e == "lighttable:scrolled"));
}

#[test]
fn released_ignores_the_view_result_but_still_gates_it() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    manager.button_released(1.0, 1.0, MouseButton::PRIMARY, Modifiers::none());
    let recorded = log.borrow().iter().any(|e| e == "lighttable:button_released");
    assert!(recorded);
}

#[test]
fn plugins_of_other_views_never_see_events() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    let plugin = ScriptedPlugin::new(
        "develop-only",
        Some(ViewKind::Darkroom.as_set()),
        WidgetId(6),
        Rc::clone(&log),
    );
    manager.register_plugin(Box::new(plugin));
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    manager.mouse_moved(0.0, 0.0, 0.0, MouseButton::PRIMARY);
    manager.button_pressed(
        0.0,
        0.0,
        0.0,
        MouseButton::PRIMARY,
        PressKind::Single,
        Modifiers::none(),
    );

    let log = log.borrow();
    assert!(!log.iter().any(|e| e.starts_with("plugin:develop-only")));
}

#[test]
fn dispatch_without_an_active_view_is_inert() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");

    manager.mouse_moved(0.0, 0.0, 0.0, MouseButton::PRIMARY);
    manager.scrolled(0.0, 0.0, false, Modifiers::none());
    assert!(!manager.button_pressed(
        0.0,
        0.0,
        0.0,
        MouseButton::PRIMARY,
        PressKind::Single,
        Modifiers::none(),
    ));
    assert!(!manager.key_released(Key::Escape, Modifiers::none()));
    assert!(log.borrow().is_empty());
}

#[test]
fn key_press_forwards_to_the_active_view() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    let handled = manager.key_pressed(Key::Char('f'), Modifiers::none());
    assert!(!handled);
    assert!(log.borrow().iter().any(|e| e == "lighttable:key_pressed"));
}

#[test]
fn expose_paints_background_when_no_view_is_active() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, _table) = manager_with_lighttable(&log);

    let mut surface = RecordingSurface::new();
    manager.expose(&mut surface, 800, 600, 0.0, 0.0);

    use shutterdeck::test_utils::DrawOp;
    assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::Paint)));
}

#[test]
fn expose_clips_draws_the_view_then_plugin_overlays() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (mut manager, table) = manager_with_lighttable(&log);
    manager.load_module(&table, "lighttable").expect("load");
    register_plugin(&mut manager, "overlay", 1, &log, |_| {});
    manager
        .switch_to(SwitchTarget::Index(0))
        .expect("switch to lighttable");
    log.borrow_mut().clear();

    let mut surface = RecordingSurface::new();
    manager.expose(&mut surface, 640, 480, 10.0, 10.0);

    assert!(log.borrow().iter().any(|e| e == "lighttable:expose"));

    // The descriptor picked up the exposed size.
    let slot = manager.current_slot().expect("view is active");
    assert_eq!(slot.descriptor.width, 640);
    assert_eq!(slot.descriptor.height, 480);

    use shutterdeck::test_utils::DrawOp;
    assert!(matches!(surface.ops().first(), Some(DrawOp::ClipRect(_))));
}

#[test]
fn set_scrollbar_updates_the_descriptor_and_requests_border_redraw() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let panels = RecordingPanelHost::new();
    let mut table = ModuleTable::new();
    {
        let log = Rc::clone(&log);
        table.register("lighttable", MODULE_API_VERSION, move || {
            Box::new(ScriptedView::new(
                ViewKind::Lighttable,
                "lighttable",
                Rc::clone(&log),
            ))
        });
    }
    let mut manager = ViewManager::new(
        Box::new(panels.clone()),
        Box::new(RecordingSignalHub::new()),
        Box::new(MemoryLibrary::new()),
        Config::default(),
        false,
    );
    let id = manager.load_module(&table, "lighttable").expect("load");

    manager.set_scrollbar(id, 0.25, 4.0, 1.0, 0.5, 8.0, 2.0);

    let slot = manager.registry().get(id).expect("view exists");
    assert_eq!(slot.descriptor.hscroll.pos, 0.25);
    assert_eq!(slot.descriptor.hscroll.size, 4.0);
    assert_eq!(slot.descriptor.vscroll.pos, 0.5);
    assert_eq!(slot.descriptor.vscroll.viewport, 2.0);
    assert_eq!(panels.state().borrow().border_redraws, 1);
}
