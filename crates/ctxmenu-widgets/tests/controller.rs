//! Integration tests for the menu controller.
//!
//! The controller runs against the deterministic doubles from ctxmenu-test:
//! a manual clock, a headless surface and a scripted asset loader.

use ctxmenu_core::host::{AssetLoader, AssetStatus, InstanceId, MENU_ASSET_URLS};
use ctxmenu_core::{Event, InboundMessage, MenuError, MenuPath, MouseButton, Point};
use ctxmenu_test::{fixture, HeadlessSurface, ManualTimers, ScriptedAssets};
use ctxmenu_widgets::{ControllerState, MenuController};
use proptest::prelude::*;
use serde_json::json;
use std::rc::Rc;

type TestController = MenuController<HeadlessSurface, ManualTimers>;

fn node() -> InstanceId {
    InstanceId::new(fixture::NODE_ID)
}

fn controller_with(config: ctxmenu_core::WidgetConfig) -> TestController {
    let mut ctl = MenuController::new(
        node(),
        HeadlessSurface::new(),
        ManualTimers::new(),
        Rc::new(ScriptedAssets::ready()),
    );
    ctl.init(config).expect("valid config");
    ctl
}

/// Advance the clock and deliver every timer that fired.
fn advance(ctl: &mut TestController, ms: u64) {
    for id in ctl.timers_mut().advance(ms) {
        ctl.on_timer(id);
    }
}

fn click_label(ctl: &mut TestController, label: &str) -> Option<ctxmenu_core::SelectionEvent> {
    let path = ctl
        .surface()
        .visible_view(&node())
        .and_then(|view| view.items.iter().find(|item| item.label == label))
        .map(|item| item.path.clone())
        .expect("label is shown");
    ctl.select(&path)
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn test_fixed_menu_displays_at_config_position() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());

    assert_eq!(ctl.state(), ControllerState::Displayed);
    ctl.surface().assert_showing(&node(), &["Open", "---", "Delete"]);
    let view = ctl.surface().visible_view(&node()).unwrap();
    assert_eq!(view.anchor, Point::new(100.0, 200.0));
}

#[test]
fn test_message_menu_and_position() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(fixture::menu_at(10.0, 0.0, fixture::sample_menu()));

    ctl.surface()
        .assert_showing(&node(), &["Copy", "Share", "---", "Quit"]);
    let view = ctl.surface().visible_view(&node()).unwrap();
    assert_eq!(view.anchor, Point::new(10.0, 0.0));
    assert!(view.find(&MenuPath::root(1).child(0)).is_some());
}

#[test]
fn test_next_message_replaces_items_in_same_container() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(fixture::menu_at(1.0, 1.0, json!([{"label": "A"}])));
    let first = ctl.container().cloned().unwrap();

    ctl.on_message(fixture::menu_at(5.0, 5.0, json!([{"label": "B"}, {"label": "C"}])));
    assert_eq!(ctl.container(), Some(&first));
    ctl.surface().assert_showing(&node(), &["B", "C"]);
    ctl.surface().assert_container_count(&node(), 1);
}

#[test]
fn test_stale_containers_are_purged_before_creation() {
    let surface = HeadlessSurface::new()
        .with_stale_container(&node())
        .with_stale_container(&node())
        .with_stale_container(&InstanceId::new("other"));
    let mut ctl = MenuController::new(
        node(),
        surface,
        ManualTimers::new(),
        Rc::new(ScriptedAssets::ready()),
    );
    ctl.init(fixture::fixed_config()).unwrap();
    ctl.on_message(InboundMessage::default());

    ctl.surface().assert_container_count(&node(), 1);
    ctl.surface()
        .assert_container_count(&InstanceId::new("other"), 1);
    assert_eq!(ctl.surface().purged(), 2);
}

#[test]
fn test_custom_colors_reach_the_surface() {
    let config = fixture::with_custom_colors(fixture::fixed_config(), "#000000", "#eeeeee");
    let mut ctl = controller_with(config);
    ctl.on_message(InboundMessage::default());

    let view = ctl.surface().visible_view(&node()).unwrap();
    assert_eq!(view.shadow.map(|c| c.to_hex()), Some("#333333".into()));
    let open = &view.items[0];
    let delete = &view.items[2];
    assert_eq!(open.text_color.map(|c| c.to_hex()), Some("#000000".into()));
    assert_eq!(delete.text_color.map(|c| c.to_hex()), Some("#646464".into()));
    assert_eq!(open.background.map(|c| c.to_hex()), Some("#eeeeee".into()));
}

#[test]
fn test_font_size_is_applied() {
    let config = ctxmenu_core::WidgetConfig {
        font_size: Some(20.0),
        ..fixture::fixed_config()
    };
    let mut ctl = controller_with(config);
    ctl.on_message(InboundMessage::default());
    assert_eq!(ctl.surface().visible_view(&node()).unwrap().font_size, 20.0);
}

// =============================================================================
// Validation Failures
// =============================================================================

#[test]
fn test_bad_position_records_error_and_does_not_display() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(InboundMessage::from_value(json!({
        "position": {"x": 10, "y": "bad"},
        "menu": [{"label": "A"}]
    })));

    assert_eq!(ctl.state(), ControllerState::Idle);
    assert_eq!(ctl.diagnostics(), &[MenuError::InvalidPosition]);
    ctl.surface().assert_hidden(&node());
}

#[test]
fn test_bad_menu_hides_stale_menu() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(fixture::menu_at(1.0, 1.0, json!([{"label": "A"}])));
    assert_eq!(ctl.state(), ControllerState::Displayed);

    ctl.on_message(InboundMessage::at(1.0, 1.0).with_menu(json!("A")));
    assert_eq!(ctl.state(), ControllerState::Idle);
    assert_eq!(ctl.diagnostics(), &[MenuError::InvalidMenuSource]);
    ctl.surface().assert_hidden(&node());
}

#[test]
fn test_failure_then_recovery() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(InboundMessage::default());
    ctl.on_message(fixture::menu_at(3.0, 4.0, json!({"label": "Solo"})));
    ctl.surface().assert_showing(&node(), &["Solo"]);
    assert_eq!(ctl.diagnostics().len(), 1);
}

// =============================================================================
// Auto-hide
// =============================================================================

#[test]
fn test_auto_hide_interval_from_config() {
    let config = ctxmenu_core::WidgetConfig::from_value(json!({
        "id": fixture::NODE_ID,
        "intervalLength": 2,
        "intervalUnit": "secs",
        "menuItems": [{"label": "Open"}]
    }))
    .unwrap();
    assert_eq!(config.auto_hide_ms(), 2_000);

    let mut ctl = controller_with(config);
    ctl.on_message(InboundMessage::default());
    assert_eq!(ctl.active_timer(), None);

    ctl.on_event(&Event::MouseLeave);
    assert_eq!(ctl.state(), ControllerState::AutoHideArmed);
    let id = ctl.active_timer().unwrap();
    assert_eq!(ctl.timers().deadline(id), Some(2_000));

    advance(&mut ctl, 1_999);
    ctl.surface().assert_showing(&node(), &["Open"]);
    advance(&mut ctl, 1);
    ctl.surface().assert_hidden(&node());
    assert_eq!(ctl.active_timer(), None);
    assert_eq!(ctl.state(), ControllerState::Idle);
}

#[test]
fn test_enter_cancels_and_leave_rearms_full_length() {
    let mut ctl = controller_with(fixture::with_auto_hide(fixture::fixed_config(), 500));
    ctl.on_message(InboundMessage::default());

    ctl.on_event(&Event::MouseLeave);
    advance(&mut ctl, 400);
    ctl.on_event(&Event::MouseEnter);
    assert_eq!(ctl.active_timer(), None);
    assert_eq!(ctl.timers().pending_count(), 0);
    assert_eq!(ctl.state(), ControllerState::Displayed);

    advance(&mut ctl, 400);
    ctl.on_event(&Event::MouseLeave);
    let id = ctl.active_timer().unwrap();
    assert_eq!(ctl.timers().deadline(id), Some(800 + 500));

    advance(&mut ctl, 499);
    ctl.surface().assert_showing(&node(), &["Open", "---", "Delete"]);
    advance(&mut ctl, 1);
    ctl.surface().assert_hidden(&node());
}

#[test]
fn test_repeated_leave_keeps_one_timer() {
    let mut ctl = controller_with(fixture::with_auto_hide(fixture::fixed_config(), 500));
    ctl.on_message(InboundMessage::default());
    ctl.on_event(&Event::MouseLeave);
    ctl.on_event(&Event::MouseLeave);
    ctl.on_event(&Event::MouseLeave);
    assert_eq!(ctl.timers().pending_count(), 1);
}

#[test]
fn test_no_interval_never_arms() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());
    ctl.on_event(&Event::MouseLeave);
    assert_eq!(ctl.timers().scheduled(), 0);
    assert_eq!(ctl.state(), ControllerState::Displayed);
}

#[test]
fn test_new_message_cancels_timer_and_stale_fire_is_ignored() {
    let mut ctl = controller_with(fixture::with_auto_hide(fixture::fixed_config(), 500));
    ctl.on_message(InboundMessage::default());
    ctl.on_event(&Event::MouseLeave);
    let stale = ctl.active_timer().unwrap();

    ctl.on_message(InboundMessage::default());
    assert_eq!(ctl.active_timer(), None);
    assert!(!ctl.timers().is_pending(stale));

    ctl.on_timer(stale);
    ctl.surface().assert_showing(&node(), &["Open", "---", "Delete"]);
    assert_eq!(ctl.state(), ControllerState::Displayed);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_click_emits_selection_and_closes() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());

    let selection = click_label(&mut ctl, "Open").expect("selection");
    assert_eq!(selection.menu_item.id.as_deref(), Some("0"));
    assert_eq!(selection.menu_item.index, 0);
    assert_eq!(selection.menu_item.topic.as_deref(), Some("file"));
    assert_eq!(selection.menu_item.payload, json!("open"));
    ctl.surface().assert_hidden(&node());
}

#[test]
fn test_click_disabled_and_separator_yield_nothing() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());

    assert!(click_label(&mut ctl, "Delete").is_none());
    assert!(click_label(&mut ctl, "---").is_none());
    ctl.surface().assert_showing(&node(), &["Open", "---", "Delete"]);
}

#[test]
fn test_pointer_click_on_row() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());

    // First row starts 8px below the anchor and is 32px tall.
    let selection = ctl.on_event(&Event::MouseDown {
        position: Point::new(150.0, 220.0),
        button: MouseButton::Left,
    });
    assert_eq!(selection.unwrap().menu_item.label, "Open");
}

#[test]
fn test_click_outside_dismisses_without_selection() {
    let mut ctl = controller_with(fixture::fixed_config());
    ctl.on_message(InboundMessage::default());

    let selection = ctl.on_event(&Event::MouseDown {
        position: Point::new(0.0, 0.0),
        button: MouseButton::Left,
    });
    assert!(selection.is_none());
    ctl.surface().assert_hidden(&node());
    assert_eq!(ctl.state(), ControllerState::Idle);
}

#[test]
fn test_submenu_selection_uses_path_fallbacks() {
    let mut ctl = controller_with(fixture::message_config());
    ctl.on_message(fixture::menu_at(0.0, 0.0, fixture::sample_menu()));

    assert!(ctl.select(&MenuPath::root(1)).is_none());
    let view = ctl.surface().visible_view(&node()).unwrap();
    assert_eq!(view.expanded, Some(MenuPath::root(1)));

    let selection = ctl.select(&MenuPath::root(1).child(0)).unwrap();
    assert_eq!(selection.menu_item.id.as_deref(), Some("1.0"));
    assert_eq!(selection.menu_item.topic.as_deref(), Some("share/mail"));
    assert_eq!(selection.menu_item.payload, json!("Mail"));

    assert!(ctl.select(&MenuPath::root(1).child(1)).is_none());
}

#[test]
fn test_selection_keeps_timer() {
    let mut ctl = controller_with(fixture::with_auto_hide(fixture::fixed_config(), 500));
    ctl.on_message(InboundMessage::default());
    ctl.on_event(&Event::MouseLeave);
    let id = ctl.active_timer().unwrap();

    assert!(click_label(&mut ctl, "Open").is_some());
    assert_eq!(ctl.active_timer(), Some(id));
    advance(&mut ctl, 500);
    assert_eq!(ctl.active_timer(), None);
    ctl.surface().assert_hidden(&node());
}

// =============================================================================
// Assets
// =============================================================================

#[test]
fn test_first_message_waits_for_assets() {
    let assets = Rc::new(ScriptedAssets::unloaded());
    let mut ctl = MenuController::new(
        node(),
        HeadlessSurface::new(),
        ManualTimers::new(),
        assets.clone(),
    );
    ctl.init(fixture::message_config()).unwrap();

    ctl.on_message(fixture::menu_at(1.0, 1.0, json!([{"label": "First"}])));
    ctl.on_message(fixture::menu_at(2.0, 2.0, json!([{"label": "Latest"}])));
    assert_eq!(assets.request_count(), 1);
    assert_eq!(
        assets.last_request().unwrap(),
        MENU_ASSET_URLS.map(str::to_string).to_vec()
    );
    assert!(ctl.has_pending());
    ctl.surface().assert_container_count(&node(), 0);

    assets.finish();
    ctl.on_assets_loaded(Ok(()));
    assert!(!ctl.has_pending());
    ctl.surface().assert_showing(&node(), &["Latest"]);
    assert_eq!(ctl.popup().unwrap().anchor(), Point::new(2.0, 2.0));
}

#[test]
fn test_invalid_message_drops_deferred_one() {
    let assets = Rc::new(ScriptedAssets::unloaded());
    let mut ctl = MenuController::new(
        node(),
        HeadlessSurface::new(),
        ManualTimers::new(),
        assets.clone(),
    );
    ctl.init(fixture::message_config()).unwrap();

    ctl.on_message(fixture::menu_at(1.0, 1.0, json!([{"label": "Stale"}])));
    assert!(ctl.has_pending());
    ctl.on_message(InboundMessage::from_value(json!({
        "position": {"x": 10, "y": "bad"},
        "menu": [{"label": "Newer"}]
    })));
    assert!(!ctl.has_pending());
    assert_eq!(ctl.diagnostics(), &[MenuError::InvalidPosition]);

    assets.finish();
    ctl.on_assets_loaded(Ok(()));
    assert_ne!(ctl.state(), ControllerState::Displayed);
    assert!(ctl.surface().visible_view(&node()).is_none());
}

#[test]
fn test_failed_load_is_retried_on_next_message() {
    let assets = Rc::new(ScriptedAssets::unloaded());
    let mut ctl = MenuController::new(
        node(),
        HeadlessSurface::new(),
        ManualTimers::new(),
        assets.clone(),
    );
    ctl.init(fixture::fixed_config()).unwrap();

    ctl.on_message(InboundMessage::default());
    assets.fail("404");
    ctl.on_assets_loaded(Err(MenuError::ResourceLoad("404".into())));
    assert!(!ctl.has_pending());
    assert_eq!(ctl.diagnostics(), &[MenuError::ResourceLoad("404".into())]);
    assert_eq!(assets.status(), AssetStatus::Failed("404".into()));

    ctl.on_message(InboundMessage::default());
    assert_eq!(assets.request_count(), 2);
    assets.finish();
    ctl.on_assets_loaded(Ok(()));
    ctl.surface().assert_showing(&node(), &["Open", "---", "Delete"]);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_destroy_cancels_timer_and_removes_container() {
    let mut ctl = controller_with(fixture::with_auto_hide(fixture::fixed_config(), 500));
    ctl.on_message(InboundMessage::default());
    ctl.on_event(&Event::MouseLeave);

    ctl.destroy();
    assert_eq!(ctl.state(), ControllerState::Destroyed);
    assert_eq!(ctl.timers().pending_count(), 0);
    ctl.surface().assert_container_count(&node(), 0);

    ctl.on_message(InboundMessage::default());
    assert!(ctl.on_event(&Event::MouseLeave).is_none());
    ctl.surface().assert_container_count(&node(), 0);
    assert_eq!(ctl.state(), ControllerState::Destroyed);
}

#[test]
fn test_destroy_drops_pending_message() {
    let assets = Rc::new(ScriptedAssets::unloaded());
    let mut ctl = MenuController::new(
        node(),
        HeadlessSurface::new(),
        ManualTimers::new(),
        assets.clone(),
    );
    ctl.init(fixture::fixed_config()).unwrap();
    ctl.on_message(InboundMessage::default());
    ctl.destroy();

    assets.finish();
    ctl.on_assets_loaded(Ok(()));
    ctl.surface().assert_container_count(&node(), 0);
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    Message { x: i32, y: i32, items: usize },
    BadMessage,
    Leave,
    Enter,
    Tick(u64),
    Click(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-50i32..500, -50i32..500, 0usize..4)
            .prop_map(|(x, y, items)| Step::Message { x, y, items }),
        Just(Step::BadMessage),
        Just(Step::Leave),
        Just(Step::Enter),
        (0u64..400).prop_map(Step::Tick),
        (0usize..4).prop_map(Step::Click),
    ]
}

fn run(ctl: &mut TestController, step: &Step) {
    match step {
        Step::Message { x, y, items } => {
            let menu: Vec<_> = (0..*items).map(|i| json!({"label": format!("i{i}")})).collect();
            ctl.on_message(InboundMessage::from_value(json!({
                "position": {"x": x, "y": y},
                "menu": menu
            })));
        }
        Step::BadMessage => ctl.on_message(InboundMessage::default()),
        Step::Leave => {
            ctl.on_event(&Event::MouseLeave);
        }
        Step::Enter => {
            ctl.on_event(&Event::MouseEnter);
        }
        Step::Tick(ms) => advance(ctl, *ms),
        Step::Click(i) => {
            ctl.select(&MenuPath::root(*i));
        }
    }
}

proptest! {
    #[test]
    fn prop_at_most_one_container_and_timer(steps in proptest::collection::vec(step(), 0..40)) {
        let mut ctl = controller_with(fixture::with_auto_hide(fixture::message_config(), 300));
        for s in &steps {
            run(&mut ctl, s);
            prop_assert!(ctl.surface().container_ids().len() <= 1);
            prop_assert!(ctl.timers().pending_count() <= 1);
            if let Some(id) = ctl.active_timer() {
                prop_assert!(ctl.timers().is_pending(id));
            }
        }
    }

    #[test]
    fn prop_invalid_position_never_displays(x in "[a-z]{1,5}", y in proptest::option::of(0i32..100)) {
        let mut ctl = controller_with(fixture::message_config());
        let position = match y {
            Some(y) => json!({"x": x, "y": y}),
            None => json!({"x": x}),
        };
        ctl.on_message(InboundMessage::from_value(json!({
            "position": position,
            "menu": [{"label": "A"}]
        })));
        prop_assert_ne!(ctl.state(), ControllerState::Displayed);
        prop_assert_eq!(ctl.diagnostics(), &[MenuError::InvalidPosition][..]);
    }
}
