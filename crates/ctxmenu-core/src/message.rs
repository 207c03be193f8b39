//! Inbound messages pushed to the widget.

use crate::config::{MenuSource, PositionMode, WidgetConfig};
use crate::error::MenuError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message delivered to the widget by the flow.
///
/// `position` is only consulted in message position mode and `menu` only in
/// message menu mode; every other property is carried along untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Requested anchor, `{ x, y }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    /// Menu items for message menu mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Value>,
    /// Remaining message properties
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl InboundMessage {
    /// Message with nothing but the given position.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Some(serde_json::json!({ "x": x, "y": y })),
            ..Self::default()
        }
    }

    /// Message carrying a menu value.
    #[must_use]
    pub fn with_menu(mut self, menu: Value) -> Self {
        self.menu = Some(menu);
        self
    }

    /// Interpret an arbitrary JSON value as a message.
    ///
    /// Non-object values become an empty message, `null` fields become `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let take = |map: &mut Map<String, Value>, key: &str| {
                    map.remove(key).filter(|v| !v.is_null())
                };
                let position = take(&mut map, "position");
                let menu = take(&mut map, "menu");
                Self {
                    position,
                    menu,
                    rest: map,
                }
            }
            _ => Self::default(),
        }
    }

    /// Convert back into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut map = self.rest;
        if let Some(position) = self.position {
            map.insert("position".to_string(), position);
        }
        if let Some(menu) = self.menu {
            map.insert("menu".to_string(), menu);
        }
        Value::Object(map)
    }

    /// The anchor carried by `position`.
    ///
    /// Both coordinates must be finite numbers or numeric strings; they are
    /// truncated to whole pixels.
    pub fn position_point(&self) -> Result<Point, MenuError> {
        let position = self.position.as_ref().ok_or(MenuError::InvalidPosition)?;
        let x = coordinate(position.get("x")).ok_or(MenuError::InvalidPosition)?;
        let y = coordinate(position.get("y")).ok_or(MenuError::InvalidPosition)?;
        Ok(Point::new(x, y))
    }

    /// Whether `menu` holds an object-like value (object or array).
    #[must_use]
    pub fn has_menu_object(&self) -> bool {
        matches!(self.menu, Some(Value::Object(_) | Value::Array(_)))
    }

    /// Check the fields the configuration relies on.
    ///
    /// Returns every problem found; an empty list means the message is usable.
    #[must_use]
    pub fn validate(&self, config: &WidgetConfig) -> Vec<MenuError> {
        let mut errors = Vec::new();
        if config.position == PositionMode::Message {
            if let Err(err) = self.position_point() {
                errors.push(err);
            }
        }
        if config.menu == MenuSource::Message && !self.has_menu_object() {
            errors.push(MenuError::InvalidMenuSource);
        }
        errors
    }
}

fn coordinate(value: Option<&Value>) -> Option<f32> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    #[allow(clippy::cast_possible_truncation)]
    let n = n.trunc() as f32;
    n.is_finite().then_some(n)
}
