//! Dashboard theme lookup.

use ctxmenu_core::{ColorMode, WidgetConfig};
use serde_json::Value;

/// Theme key of the widget text color.
pub const TEXT_COLOR_KEY: &str = "widget-textColor";
/// Theme key of the widget background color.
pub const BACKGROUND_COLOR_KEY: &str = "widget-backgroundColor";
/// Theme key of the widget border color.
pub const BORDER_COLOR_KEY: &str = "widget-borderColor";

/// The three widget colors of a dashboard theme.
///
/// The dashboard theme is a map of `key -> { value, ... }`; missing keys and
/// empty values are kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeColors {
    /// `widget-textColor`
    pub text: Option<String>,
    /// `widget-backgroundColor`
    pub background: Option<String>,
    /// `widget-borderColor`
    pub border: Option<String>,
}

impl ThemeColors {
    /// Read the widget colors from a theme map.
    #[must_use]
    pub fn from_value(theme: &Value) -> Self {
        let lookup = |key: &str| {
            theme
                .get(key)
                .and_then(|entry| entry.get("value"))
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            text: lookup(TEXT_COLOR_KEY),
            background: lookup(BACKGROUND_COLOR_KEY),
            border: lookup(BORDER_COLOR_KEY),
        }
    }

    /// Replace the configured colors with the theme's.
    ///
    /// Only applies in theme color mode. Returns whether anything changed.
    pub fn apply_to(&self, config: &mut WidgetConfig) -> bool {
        if config.colors != ColorMode::Theme {
            return false;
        }
        let mut changed = false;
        for (theme, target) in [
            (&self.text, &mut config.text_color),
            (&self.background, &mut config.background_color),
            (&self.border, &mut config.border_color),
        ] {
            if let Some(value) = theme {
                if target != value {
                    target.clone_from(value);
                    changed = true;
                }
            }
        }
        changed
    }
}
