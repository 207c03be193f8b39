//! Widget configuration, fixed when the node is deployed.
//!
//! The host editor stores most numeric fields as strings and has used both
//! `msg` and `message` for the message-driven modes. Numeric strings are
//! accepted; unknown modes and units are rejected.
//!
//! # Examples
//!
//! ```
//! use ctxmenu_core::{PositionMode, WidgetConfig};
//!
//! let config = WidgetConfig::from_json(
//!     r#"{"position":"msg","xCoordinate":"100","intervalLength":"2","intervalUnit":"secs"}"#,
//! )
//! .expect("valid config");
//! assert_eq!(config.position, PositionMode::Message);
//! assert_eq!(config.x_coordinate, 100);
//! assert_eq!(config.auto_hide_ms(), 2000);
//! ```

use crate::color::Color;
use crate::error::ConfigError;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Lightening applied to the text color of disabled items.
pub const DISABLED_TEXT_LIGHTEN: i32 = 100;

/// Where the menu coordinates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// Fixed coordinates from the configuration
    #[default]
    Config,
    /// `msg.position` of each inbound message
    #[serde(alias = "msg")]
    Message,
}

/// Where the menu items come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSource {
    /// Fixed items from the configuration
    #[default]
    Fixed,
    /// `msg.menu` of each inbound message
    #[serde(alias = "msg")]
    Message,
}

/// How the rendered menu is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Leave the popup's own stylesheet alone
    #[default]
    Native,
    /// Dashboard theme colors
    Theme,
    /// Colors from the configuration
    Custom,
}

/// Unit of the auto-hide interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IntervalUnit {
    /// Milliseconds
    Millis,
    /// Seconds
    #[default]
    Secs,
    /// Minutes
    Mins,
}

impl IntervalUnit {
    /// Milliseconds per unit.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Millis => 1.0,
            Self::Secs => 1_000.0,
            Self::Mins => 60_000.0,
        }
    }

    /// Convert a length in this unit to whole milliseconds.
    ///
    /// Negative, zero and non-finite lengths yield 0.
    #[must_use]
    pub fn to_millis(self, length: f64) -> u64 {
        if !length.is_finite() || length <= 0.0 {
            return 0;
        }
        (length * self.factor()).round() as u64
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Millis => "msecs",
            Self::Secs => "secs",
            Self::Mins => "mins",
        }
    }
}

impl TryFrom<String> for IntervalUnit {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "msecs" | "ms" => Ok(Self::Millis),
            // Nodes saved before auto-hide existed carry an empty unit.
            "" | "secs" | "s" => Ok(Self::Secs),
            "mins" | "min" => Ok(Self::Mins),
            other => Err(format!("unknown interval unit '{other}'")),
        }
    }
}

impl From<IntervalUnit> for String {
    fn from(unit: IntervalUnit) -> Self {
        unit.as_str().to_string()
    }
}

fn default_true() -> bool {
    true
}

/// One statically configured menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedMenuItem {
    /// Stable id; defaults to the item's position when empty
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// Icon name or URL
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub icon: Option<String>,
    /// Whether the item can be clicked
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether the item is shown
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Display text; `--` prefix marks a separator
    #[serde(default)]
    pub label: String,
    /// Raw payload, evaluated against `payload_type` on selection
    #[serde(default)]
    pub payload: Value,
    /// Payload type tag (`str`, `num`, `json`, ...)
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub payload_type: Option<String>,
    /// Topic of the outbound message
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub topic: Option<String>,
    /// Dotted output path for the evaluated payload
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub output_field: Option<String>,
}

impl FixedMenuItem {
    /// Create an enabled, visible item without payload.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            icon: None,
            enabled: true,
            visible: true,
            label: label.into(),
            payload: Value::Null,
            payload_type: None,
            topic: None,
            output_field: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the payload and its type tag.
    #[must_use]
    pub fn payload(mut self, payload: impl Into<Value>, payload_type: impl Into<String>) -> Self {
        self.payload = payload.into();
        self.payload_type = Some(payload_type.into());
        self
    }

    /// Set the topic.
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the icon.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set enabled state.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set visible state.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the output field.
    #[must_use]
    pub fn output_field(mut self, field: impl Into<String>) -> Self {
        self.output_field = Some(field.into());
        self
    }

    /// Whether the label marks a separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.label.starts_with(crate::item::SEPARATOR_MARKER)
    }
}

/// Complete widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Node id, unique per deployed widget
    pub id: String,
    /// Display name
    pub name: String,
    /// Position mode
    pub position: PositionMode,
    /// Fixed x coordinate (truncated to whole pixels)
    #[serde(deserialize_with = "lenient::int")]
    pub x_coordinate: i32,
    /// Fixed y coordinate (truncated to whole pixels)
    #[serde(deserialize_with = "lenient::int")]
    pub y_coordinate: i32,
    /// Menu source mode
    pub menu: MenuSource,
    /// Fixed items, used when `menu` is `Fixed`
    pub menu_items: Vec<FixedMenuItem>,
    /// Color mode
    pub colors: ColorMode,
    /// Item text color
    pub text_color: String,
    /// Item background color
    pub background_color: String,
    /// Panel shadow color
    pub border_color: String,
    /// Auto-hide length; 0 disables auto-hide
    #[serde(deserialize_with = "lenient::float")]
    pub interval_length: f64,
    /// Auto-hide unit
    pub interval_unit: IntervalUnit,
    /// Font size in pixels
    #[serde(deserialize_with = "lenient::opt_float")]
    pub font_size: Option<f32>,
    /// Dotted output path for selected payloads
    #[serde(deserialize_with = "lenient::opt_string")]
    pub output_field: Option<String>,
    /// Dashboard group (opaque)
    #[serde(deserialize_with = "lenient::opt_string")]
    pub group: Option<String>,
    /// Dashboard order (opaque)
    #[serde(deserialize_with = "lenient::int")]
    pub order: i32,
    /// Dashboard width (opaque)
    #[serde(deserialize_with = "lenient::int")]
    pub width: i32,
    /// Dashboard height (opaque)
    #[serde(deserialize_with = "lenient::int")]
    pub height: i32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            position: PositionMode::Config,
            x_coordinate: 0,
            y_coordinate: 0,
            menu: MenuSource::Fixed,
            menu_items: Vec::new(),
            colors: ColorMode::Native,
            text_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            border_color: "#000000".to_string(),
            interval_length: 0.0,
            interval_unit: IntervalUnit::Secs,
            font_size: None,
            output_field: None,
            group: None,
            order: 0,
            width: 0,
            height: 0,
        }
    }
}

impl WidgetConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Auto-hide interval in milliseconds; 0 when disabled.
    #[must_use]
    pub fn auto_hide_ms(&self) -> u64 {
        self.interval_unit.to_millis(self.interval_length)
    }

    /// Auto-hide interval, `None` when disabled.
    #[must_use]
    pub fn auto_hide(&self) -> Option<Duration> {
        match self.auto_hide_ms() {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// The configured fixed coordinates.
    #[must_use]
    pub fn fixed_position(&self) -> Point {
        Point::new(self.x_coordinate as f32, self.y_coordinate as f32)
    }

    /// Color overrides for the rendered menu, `None` in native mode.
    pub fn palette(&self) -> Result<Option<MenuPalette>, ConfigError> {
        if self.colors == ColorMode::Native {
            return Ok(None);
        }
        MenuPalette::parse(&self.text_color, &self.background_color, &self.border_color).map(Some)
    }
}

/// Resolved color overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPalette {
    /// Text of enabled items
    pub text: Color,
    /// Item background
    pub background: Color,
    /// Panel shadow
    pub shadow: Color,
    /// Text of disabled items
    pub disabled_text: Color,
}

impl MenuPalette {
    /// Build a palette from hex strings.
    pub fn parse(text: &str, background: &str, border: &str) -> Result<Self, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            Color::from_hex(value).map_err(|source| ConfigError::InvalidColor {
                field,
                value: value.to_string(),
                source,
            })
        };
        let text = parse("textColor", text)?;
        Ok(Self {
            text,
            background: parse("backgroundColor", background)?,
            shadow: parse("borderColor", border)?,
            disabled_text: text.adjust(DISABLED_TEXT_LIGHTEN),
        })
    }
}

mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Flag(bool),
    }

    fn number(raw: Option<Raw>) -> Result<Option<f64>, String> {
        match raw {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("'{s}' is not a number")),
            Some(Raw::Flag(b)) => Err(format!("expected a number, found {b}")),
        }
    }

    pub(super) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        let n = number(Option::<Raw>::deserialize(d)?).map_err(D::Error::custom)?;
        Ok(n.filter(|n| n.is_finite()).map_or(0, |n| n.trunc() as i32))
    }

    pub(super) fn float<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let n = number(Option::<Raw>::deserialize(d)?).map_err(D::Error::custom)?;
        Ok(n.filter(|n| n.is_finite()).unwrap_or(0.0))
    }

    pub(super) fn opt_float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
        let n = number(Option::<Raw>::deserialize(d)?).map_err(D::Error::custom)?;
        Ok(n.filter(|n| n.is_finite() && *n > 0.0).map(|n| n as f32))
    }

    pub(super) fn opt_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Raw>::deserialize(d)? {
            None => None,
            Some(Raw::Text(s)) if s.is_empty() => None,
            Some(Raw::Text(s)) => Some(s),
            Some(Raw::Number(n)) if n.fract() == 0.0 && n.is_finite() => {
                Some(format!("{}", n as i64))
            }
            Some(Raw::Number(n)) => Some(n.to_string()),
            Some(Raw::Flag(b)) => Some(b.to_string()),
        })
    }
}
