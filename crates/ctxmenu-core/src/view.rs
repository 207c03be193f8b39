//! Render model handed to a [`MenuSurface`](crate::host::MenuSurface).

use crate::color::Color;
use crate::geometry::Point;
use crate::item::MenuPath;
use serde::{Deserialize, Serialize};

/// Snapshot of a popup, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuView {
    /// Top-left corner of the panel
    pub anchor: Point,
    /// Font size in pixels
    pub font_size: f32,
    /// Whether the panel is shown
    pub open: bool,
    /// Panel shadow color, `None` keeps the stylesheet default
    pub shadow: Option<Color>,
    /// Visible entries in display order
    pub items: Vec<RenderedItem>,
    /// Path of the item whose submenu is expanded
    pub expanded: Option<MenuPath>,
}

impl MenuView {
    /// Labels of the top-level entries, separators included.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    /// Find a rendered entry by path, searching submenus too.
    #[must_use]
    pub fn find(&self, path: &MenuPath) -> Option<&RenderedItem> {
        fn walk<'a>(items: &'a [RenderedItem], path: &MenuPath) -> Option<&'a RenderedItem> {
            items.iter().find_map(|item| {
                if &item.path == path {
                    Some(item)
                } else {
                    walk(&item.children, path)
                }
            })
        }
        walk(&self.items, path)
    }
}

/// One visible row of the popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedItem {
    /// Location in the entry tree
    pub path: MenuPath,
    /// Display text
    pub label: String,
    /// Icon name or URL
    pub icon: Option<String>,
    /// Whether clicks are accepted
    pub enabled: bool,
    /// Separator row
    pub separator: bool,
    /// Text color override
    pub text_color: Option<Color>,
    /// Background color override
    pub background: Option<Color>,
    /// Visible submenu rows
    pub children: Vec<RenderedItem>,
}

impl RenderedItem {
    /// Whether the row opens a submenu.
    #[must_use]
    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}
