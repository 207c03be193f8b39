//! Integration tests for ctxmenu-core.
//!
//! These tests exercise the public API the way the widget and host crates use it.

use ctxmenu_core::{
    adjust_hex, Color, ColorMode, ConfigError, InboundMessage, IntervalUnit, MenuEntry,
    MenuError, MenuItemDescriptor, MenuPath, MenuSource, PositionMode, SelectionEvent,
    WidgetConfig,
};
use serde_json::json;

// =============================================================================
// Configuration Loading
// =============================================================================

#[test]
fn test_host_json_config() {
    let config = WidgetConfig::from_value(json!({
        "id": "a1b2",
        "name": "Actions",
        "position": "msg",
        "xCoordinate": "12.9",
        "yCoordinate": 40,
        "menu": "fixed",
        "menuItems": [
            {"label": "Open", "payload": "open", "payloadType": "str", "topic": "file"},
            {"label": "--"},
            {"label": "Delete", "enabled": false, "id": "del"}
        ],
        "colors": "custom",
        "textColor": "#202020",
        "backgroundColor": "#fafafa",
        "borderColor": "#444444",
        "intervalLength": "1.5",
        "intervalUnit": "secs",
        "fontSize": "16",
        "outputField": "payload.choice",
        "group": "g1",
        "order": 2,
        "width": "4",
        "height": "1"
    }))
    .expect("valid config");

    assert_eq!(config.position, PositionMode::Message);
    assert_eq!(config.x_coordinate, 12);
    assert_eq!(config.menu, MenuSource::Fixed);
    assert_eq!(config.menu_items.len(), 3);
    assert!(config.menu_items[1].is_separator());
    assert_eq!(config.menu_items[2].id.as_deref(), Some("del"));
    assert_eq!(config.auto_hide_ms(), 1_500);
    assert_eq!(config.font_size, Some(16.0));
    assert_eq!(config.output_field.as_deref(), Some("payload.choice"));
    assert_eq!(config.width, 4);
}

#[test]
fn test_yaml_config() {
    let config = WidgetConfig::from_yaml(
        r##"
position: config
xCoordinate: 100
yCoordinate: 200
menu: msg
colors: theme
intervalLength: 2
intervalUnit: mins
"##,
    )
    .expect("valid yaml");

    assert_eq!(config.menu, MenuSource::Message);
    assert_eq!(config.colors, ColorMode::Theme);
    assert_eq!(config.interval_unit, IntervalUnit::Mins);
    assert_eq!(config.auto_hide_ms(), 120_000);
    assert_eq!(config.fixed_position().x, 100.0);
}

#[test]
fn test_unknown_mode_is_rejected() {
    let err = WidgetConfig::from_json(r#"{"position":"mouse"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));

    let err = WidgetConfig::from_json(r#"{"intervalUnit":"hours"}"#).unwrap_err();
    assert!(err.to_string().contains("hours"));
}

#[test]
fn test_custom_palette() {
    let config = WidgetConfig {
        colors: ColorMode::Custom,
        text_color: "#202020".into(),
        background_color: "#fafafa".into(),
        border_color: "#444444".into(),
        ..WidgetConfig::default()
    };
    let palette = config.palette().expect("valid colors").expect("not native");
    assert_eq!(palette.text.to_hex(), "#202020");
    assert_eq!(palette.disabled_text.to_hex(), "#848484");
    assert_eq!(palette.shadow.to_hex(), "#444444");

    let native = WidgetConfig::default();
    assert!(native.palette().unwrap().is_none());
}

#[test]
fn test_bad_palette_color() {
    let config = WidgetConfig {
        colors: ColorMode::Custom,
        background_color: "chartreuse".into(),
        ..WidgetConfig::default()
    };
    let err = config.palette().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidColor {
            field: "backgroundColor",
            ..
        }
    ));
}

// =============================================================================
// Color Adjust
// =============================================================================

#[test]
fn test_adjust_hex_clamps() {
    assert_eq!(adjust_hex("#f0f0f0", 100).unwrap(), "#ffffff");
    assert_eq!(adjust_hex("#101010", -100).unwrap(), "#000000");
    assert_eq!(adjust_hex("#000000", 100).unwrap(), "#646464");
    assert!(adjust_hex("nope", 10).is_err());
}

#[test]
fn test_adjust_keeps_alpha() {
    let c = Color::from_hex("#00000080").unwrap();
    let lighter = c.adjust(100);
    assert_eq!(lighter.to_hex_with_alpha(), "#64646480");
}

// =============================================================================
// Messages and Selection
// =============================================================================

#[test]
fn test_inbound_validation_by_mode() {
    let config = WidgetConfig {
        position: PositionMode::Message,
        ..WidgetConfig::default()
    };
    let good = InboundMessage::from_value(json!({"position": {"x": 0, "y": "7"}}));
    assert!(good.validate(&config).is_empty());

    let bad = InboundMessage::from_value(json!({"position": {"x": "left", "y": 1}}));
    assert_eq!(bad.validate(&config), vec![MenuError::InvalidPosition]);
}

#[test]
fn test_selection_from_nested_entry() {
    let mut parent = MenuItemDescriptor::new(2, "Export");
    parent.children = vec![
        MenuEntry::Item(MenuItemDescriptor::new(0, "CSV")),
        MenuEntry::separator(),
        MenuEntry::Item(MenuItemDescriptor::new(2, "JSON")),
    ];
    let entries = vec![
        MenuEntry::Item(MenuItemDescriptor::new(0, "Open")),
        MenuEntry::separator(),
        MenuEntry::Item(parent),
    ];

    let path = MenuPath::root(2).child(2);
    let item = path.lookup(&entries).and_then(MenuEntry::as_item).unwrap();
    let event = SelectionEvent::new(item, &path);

    assert_eq!(event.menu_item.id.as_deref(), Some("2.2"));
    assert_eq!(event.menu_item.topic.as_deref(), Some("2.2"));
    assert_eq!(event.menu_item.payload, json!("JSON"));
    assert!(event.menu_item.children.is_empty());
}
