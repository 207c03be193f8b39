//! Ready-made configurations and messages.

use ctxmenu_core::{
    ColorMode, FixedMenuItem, InboundMessage, IntervalUnit, MenuSource, PositionMode,
    WidgetConfig,
};
use serde_json::{json, Value};

/// Node id used by every fixture.
pub const NODE_ID: &str = "ctx1";

/// Fixed menu at (100, 200): `Open`, a separator, a disabled `Delete`.
pub fn fixed_config() -> WidgetConfig {
    WidgetConfig {
        id: NODE_ID.to_string(),
        name: "Actions".to_string(),
        x_coordinate: 100,
        y_coordinate: 200,
        menu_items: vec![
            FixedMenuItem::new("Open").payload("open", "str").topic("file"),
            FixedMenuItem::new("--"),
            FixedMenuItem::new("Delete").id("del").enabled(false),
        ],
        ..WidgetConfig::default()
    }
}

/// Message-driven position and menu.
pub fn message_config() -> WidgetConfig {
    WidgetConfig {
        id: NODE_ID.to_string(),
        position: PositionMode::Message,
        menu: MenuSource::Message,
        ..WidgetConfig::default()
    }
}

/// `config` with an auto-hide interval of `ms` milliseconds.
pub fn with_auto_hide(config: WidgetConfig, ms: u32) -> WidgetConfig {
    WidgetConfig {
        interval_length: f64::from(ms),
        interval_unit: IntervalUnit::Millis,
        ..config
    }
}

/// `config` with custom colors.
pub fn with_custom_colors(config: WidgetConfig, text: &str, background: &str) -> WidgetConfig {
    WidgetConfig {
        colors: ColorMode::Custom,
        text_color: text.to_string(),
        background_color: background.to_string(),
        border_color: "#333333".to_string(),
        ..config
    }
}

/// Message carrying only a position.
pub fn at(x: f32, y: f32) -> InboundMessage {
    InboundMessage::at(x, y)
}

/// Message carrying a position and a menu.
pub fn menu_at(x: f32, y: f32, menu: Value) -> InboundMessage {
    InboundMessage::at(x, y).with_menu(menu)
}

/// A small message menu with a submenu.
pub fn sample_menu() -> Value {
    json!([
        {"label": "Copy", "payload": "copy"},
        {"label": "Share", "items": [
            {"label": "Mail", "topic": "share/mail"},
            {"label": "Chat", "enabled": false}
        ]},
        {"label": "--"},
        {"label": "Hidden", "visible": false},
        {"label": "Quit", "id": "quit", "payload": 1, "payloadType": "num"}
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_consistent() {
        let config = with_auto_hide(fixed_config(), 250);
        assert_eq!(config.auto_hide_ms(), 250);
        assert_eq!(config.menu_items.len(), 3);

        let msg = menu_at(1.0, 2.0, sample_menu());
        assert!(msg.has_menu_object());
        assert!(msg.validate(&message_config()).is_empty());
    }

    #[test]
    fn test_custom_colors_parse() {
        let config = with_custom_colors(fixed_config(), "#111111", "#eeeeee");
        assert!(config.palette().unwrap().is_some());
    }
}
