//! Normalized menu entries and the selection event.
//!
//! Every entry source (fixed configuration or inbound message) is reduced to
//! [`MenuEntry`] before anything is rendered, so the popup and the outbound
//! side only ever deal with one shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Label prefix that turns an item into a separator.
pub const SEPARATOR_MARKER: &str = "--";

/// Payload type used when an item declares none.
pub const DEFAULT_PAYLOAD_TYPE: &str = "str";

/// One entry of a displayed menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuEntry {
    /// Selectable item (possibly with a submenu)
    Item(MenuItemDescriptor),
    /// Visual separator
    Separator {
        /// Display text of the separator
        text: String,
    },
}

impl MenuEntry {
    /// Separator with the conventional text.
    #[must_use]
    pub fn separator() -> Self {
        Self::Separator {
            text: "---".to_string(),
        }
    }

    /// The item descriptor, if this is not a separator.
    #[must_use]
    pub const fn as_item(&self) -> Option<&MenuItemDescriptor> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator { .. } => None,
        }
    }

    /// Whether this is a separator.
    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Separator { .. })
    }

    /// Whether this entry takes up space in the menu.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        match self {
            Self::Item(item) => item.visible,
            Self::Separator { .. } => true,
        }
    }

    /// Whether a click on this entry produces a selection.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        match self {
            Self::Item(item) => item.enabled && item.visible,
            Self::Separator { .. } => false,
        }
    }
}

/// Normalized description of a selectable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDescriptor {
    /// Position of the item within its menu level
    pub index: usize,
    /// Stable id, `None` falls back to the item's path on selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Icon name or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the item can be clicked
    pub enabled: bool,
    /// Whether the item is shown
    pub visible: bool,
    /// Display text
    pub label: String,
    /// Raw payload
    #[serde(default)]
    pub payload: Value,
    /// Payload type tag
    pub payload_type: String,
    /// Topic, `None` falls back to the item's path on selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Dotted output path for the evaluated payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_field: Option<String>,
    /// Submenu entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl MenuItemDescriptor {
    /// Create an enabled, visible item with default payload type.
    #[must_use]
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            icon: None,
            enabled: true,
            visible: true,
            label: label.into(),
            payload: Value::Null,
            payload_type: DEFAULT_PAYLOAD_TYPE.to_string(),
            topic: None,
            output_field: None,
            children: Vec::new(),
        }
    }

    /// Whether this item opens a submenu.
    #[must_use]
    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }

    /// Copy of the descriptor with every fallback resolved.
    ///
    /// Id and topic fall back to `path`, an empty payload falls back to the
    /// label, and an empty payload type falls back to `str`. Children are not
    /// carried into the selection.
    #[must_use]
    pub fn resolved(&self, path: &MenuPath) -> Self {
        let path = path.to_string();
        let non_empty = |s: &Option<String>| s.as_ref().filter(|s| !s.is_empty()).cloned();
        let payload = match &self.payload {
            Value::Null => Value::String(self.label.clone()),
            Value::String(s) if s.is_empty() => Value::String(self.label.clone()),
            other => other.clone(),
        };
        let payload_type = if self.payload_type.is_empty() {
            DEFAULT_PAYLOAD_TYPE.to_string()
        } else {
            self.payload_type.clone()
        };

        Self {
            index: self.index,
            id: non_empty(&self.id).or_else(|| Some(path.clone())),
            icon: self.icon.clone(),
            enabled: self.enabled,
            visible: self.visible,
            label: self.label.clone(),
            payload,
            payload_type,
            topic: non_empty(&self.topic).or(Some(path)),
            output_field: non_empty(&self.output_field),
            children: Vec::new(),
        }
    }
}

/// Location of an entry in a (possibly nested) menu, e.g. `2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MenuPath(Vec<usize>);

impl MenuPath {
    /// Path of a top-level entry.
    #[must_use]
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Path of a child of this entry.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    /// Path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Look up the entry this path points at.
    #[must_use]
    pub fn lookup<'a>(&self, entries: &'a [MenuEntry]) -> Option<&'a MenuEntry> {
        let (first, rest) = self.0.split_first()?;
        let mut entry = entries.get(*first)?;
        for index in rest {
            entry = entry.as_item()?.children.get(*index)?;
        }
        Some(entry)
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for MenuPath {
    type Err = ParseIntError;

    /// Parse the dotted form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .map(Self)
    }
}

/// A user's click on a menu item, sent from the widget to the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    /// The clicked item with all fallbacks resolved
    pub menu_item: MenuItemDescriptor,
}

impl SelectionEvent {
    /// Build the event for the entry at `path`.
    #[must_use]
    pub fn new(item: &MenuItemDescriptor, path: &MenuPath) -> Self {
        Self {
            menu_item: item.resolved(path),
        }
    }
}
