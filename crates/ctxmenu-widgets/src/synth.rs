//! Menu synthesizer: configuration or message in, normalized entries out.

use ctxmenu_core::{
    FixedMenuItem, MenuEntry, MenuError, MenuItemDescriptor, MenuSource, WidgetConfig,
    DEFAULT_PAYLOAD_TYPE, SEPARATOR_MARKER,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Produces the entry list for each render cycle.
///
/// Fixed items are converted once and cached for the lifetime of the
/// synthesizer; message items are converted on every call.
#[derive(Debug, Default)]
pub struct MenuSynthesizer {
    fixed: Option<Vec<MenuEntry>>,
}

impl MenuSynthesizer {
    /// Synthesizer with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for one render cycle.
    ///
    /// In message mode `menu` must be an object or array, otherwise the cycle
    /// fails with [`MenuError::InvalidMenuSource`].
    pub fn synthesize(
        &mut self,
        config: &WidgetConfig,
        menu: Option<&Value>,
    ) -> Result<Vec<MenuEntry>, MenuError> {
        match config.menu {
            MenuSource::Fixed => Ok(self.fixed(&config.menu_items).to_vec()),
            MenuSource::Message => match menu {
                Some(value @ (Value::Object(_) | Value::Array(_))) => Ok(message_entries(value)),
                _ => Err(MenuError::InvalidMenuSource),
            },
        }
    }

    /// Cached fixed entries, converting `items` on first use.
    pub fn fixed(&mut self, items: &[FixedMenuItem]) -> &[MenuEntry] {
        self.fixed.get_or_insert_with(|| {
            let entries = fixed_entries(items);
            debug!(count = entries.len(), "synthesized fixed menu");
            entries
        })
    }

    /// Whether fixed entries have been cached.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.fixed.is_some()
    }
}

/// Convert configured items.
///
/// Every item, separators included, occupies one index. Ids fall back to
/// that index.
#[must_use]
pub fn fixed_entries(items: &[FixedMenuItem]) -> Vec<MenuEntry> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.is_separator() {
                return MenuEntry::separator();
            }
            MenuEntry::Item(MenuItemDescriptor {
                index,
                id: Some(item.id.clone().unwrap_or_else(|| index.to_string())),
                icon: item.icon.clone(),
                enabled: item.enabled,
                visible: item.visible,
                label: item.label.clone(),
                payload: item.payload.clone(),
                payload_type: item
                    .payload_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PAYLOAD_TYPE.to_string()),
                topic: item.topic.clone(),
                output_field: item.output_field.clone(),
                children: Vec::new(),
            })
        })
        .collect()
}

/// Convert the `menu` value of an inbound message.
///
/// An array is a list of items, an object is a single item. Item objects use
/// the fixed-item field names plus `text` as an alias of `label` and `items`
/// for a nested submenu; bare strings become label-only items. Anything else
/// is skipped.
#[must_use]
pub fn message_entries(menu: &Value) -> Vec<MenuEntry> {
    match menu {
        Value::Array(values) => parse_level(values),
        Value::Object(_) => parse_level(std::slice::from_ref(menu)),
        _ => Vec::new(),
    }
}

fn parse_level(values: &[Value]) -> Vec<MenuEntry> {
    let mut used = HashSet::new();
    values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| parse_entry(position, value, &mut used))
        .collect()
}

fn parse_entry(position: usize, value: &Value, used: &mut HashSet<usize>) -> Option<MenuEntry> {
    let empty = Map::new();
    let (obj, label) = match value {
        Value::Object(obj) => {
            let label = text(obj, "label")
                .or_else(|| text(obj, "text"))
                .unwrap_or_default();
            (obj, label)
        }
        Value::String(label) => (&empty, label.clone()),
        other => {
            trace!(%other, "skipping non-object menu item");
            return None;
        }
    };

    let id = text(obj, "id");
    if id.is_none() && label.starts_with(SEPARATOR_MARKER) {
        used.insert(position);
        return Some(MenuEntry::separator());
    }

    let requested = obj
        .get("index")
        .and_then(Value::as_u64)
        .and_then(|i| usize::try_from(i).ok())
        .unwrap_or(position);
    let index = unique_index(requested, position, used);

    let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(true);
    let children = obj
        .get("items")
        .and_then(Value::as_array)
        .map(|items| parse_level(items))
        .unwrap_or_default();

    Some(MenuEntry::Item(MenuItemDescriptor {
        index,
        id,
        icon: text(obj, "icon"),
        enabled: flag("enabled"),
        visible: flag("visible"),
        label,
        payload: obj.get("payload").cloned().unwrap_or(Value::Null),
        payload_type: text(obj, "payloadType").unwrap_or_else(|| DEFAULT_PAYLOAD_TYPE.to_string()),
        topic: text(obj, "topic"),
        output_field: text(obj, "outputField"),
        children,
    }))
}

/// First free index: the requested one, else the item's position, else the
/// next unused number after it.
fn unique_index(requested: usize, position: usize, used: &mut HashSet<usize>) -> usize {
    let mut index = if used.contains(&requested) {
        position
    } else {
        requested
    };
    while used.contains(&index) {
        index += 1;
    }
    used.insert(index);
    index
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
