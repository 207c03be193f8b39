//! Outbound message assembly.

use ctxmenu_core::MenuItemDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field the evaluated payload is written to when none is configured.
pub const DEFAULT_OUTPUT_FIELD: &str = "payload";

/// Write `value` at the dotted `path` of `target`.
///
/// Missing intermediate segments become empty objects, intermediate values
/// that are not objects are replaced, and only the last segment is
/// overwritten. An empty path means [`DEFAULT_OUTPUT_FIELD`].
pub fn set_result(target: &mut Map<String, Value>, path: &str, value: Value) {
    let path = if path.is_empty() {
        DEFAULT_OUTPUT_FIELD
    } else {
        path
    };
    let mut current = target;
    let mut segments = path.split('.').peekable();
    while let Some(key) = segments.next() {
        if segments.peek().is_none() {
            current.insert(key.to_string(), value);
            return;
        }
        let slot = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

/// Message sent to the flow for one selection:
/// `{ menuId, menuIndex, topic, payload }` plus the evaluated result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutboundMessage(Map<String, Value>);

impl OutboundMessage {
    /// Envelope for a selected item, with the raw payload.
    #[must_use]
    pub fn for_item(item: &MenuItemDescriptor) -> Self {
        let mut map = Map::new();
        map.insert("menuId".into(), item.id.clone().map_or(Value::Null, Value::String));
        map.insert("menuIndex".into(), Value::from(item.index));
        map.insert("topic".into(), item.topic.clone().map_or(Value::Null, Value::String));
        map.insert("payload".into(), item.payload.clone());
        Self(map)
    }

    /// Write `value` at the dotted `path`, see [`set_result`].
    pub fn set_result(&mut self, path: &str, value: Value) {
        set_result(&mut self.0, path, value);
    }

    /// Top-level property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Properties as a map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
