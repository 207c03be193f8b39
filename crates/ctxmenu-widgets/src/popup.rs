//! Popup menu widget.
//!
//! The popup is anchored at a point rather than below a trigger. Entries come
//! from [`MenuSynthesizer`](crate::MenuSynthesizer); the popup only knows how
//! to lay them out, paint them and turn pointer input into [`PopupAction`]s.

use ctxmenu_core::{
    widget::{LayoutResult, TextStyle},
    AccessibleRole, Canvas, Color, Constraints, Event, MenuEntry, MenuPalette, MenuPath,
    MenuView, Point, Rect, RenderedItem, Size, TypeId, Widget,
};
use std::any::Any;

/// Default panel width.
pub const DEFAULT_WIDTH: f32 = 200.0;

/// Default font size.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

const PANEL_PADDING: f32 = 8.0;
const SEPARATOR_HEIGHT: f32 = 9.0;
const ROW_EXTRA: f32 = 18.0;
const TEXT_INSET: f32 = 12.0;

/// Outcome of pointer input on the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupAction {
    /// An enabled leaf entry was clicked; the popup has closed itself.
    Activated(MenuPath),
    /// An entry with children was clicked and its submenu is now shown.
    SubmenuOpened(MenuPath),
    /// A click landed outside the popup; the popup has closed itself.
    Dismissed,
}

#[derive(Debug, Clone)]
struct Row {
    path: MenuPath,
    bounds: Rect,
    separator: bool,
}

/// Context popup for a list of [`MenuEntry`] values.
#[derive(Debug)]
pub struct PopupMenu {
    entries: Vec<MenuEntry>,
    open: bool,
    anchor: Point,
    width: f32,
    font_size: f32,
    palette: Option<MenuPalette>,
    hover_color: Color,
    test_id_value: Option<String>,
    panel_bounds: Rect,
    rows: Vec<Row>,
    submenu_bounds: Option<Rect>,
    submenu_rows: Vec<Row>,
    highlighted: Option<MenuPath>,
    open_submenu: Option<usize>,
}

impl Default for PopupMenu {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            open: false,
            anchor: Point::ORIGIN,
            width: DEFAULT_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            palette: None,
            hover_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            test_id_value: None,
            panel_bounds: Rect::default(),
            rows: Vec::new(),
            submenu_bounds: None,
            submenu_rows: Vec::new(),
            highlighted: None,
            open_submenu: None,
        }
    }
}

impl PopupMenu {
    /// Create a closed, empty popup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font size; row height follows it.
    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set color overrides.
    #[must_use]
    pub const fn palette(mut self, palette: Option<MenuPalette>) -> Self {
        self.palette = palette;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the entries. An open popup stays open at its anchor.
    pub fn reload(&mut self, entries: Vec<MenuEntry>) {
        self.entries = entries;
        self.highlighted = None;
        self.open_submenu = None;
        self.relayout();
    }

    /// Show the popup with its top-left corner at `anchor`.
    pub fn display(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.open = true;
        self.highlighted = None;
        self.open_submenu = None;
        self.relayout();
    }

    /// Close the popup.
    pub fn hide(&mut self) {
        self.open = false;
        self.highlighted = None;
        self.open_submenu = None;
        self.submenu_bounds = None;
        self.submenu_rows.clear();
    }

    /// Check if the popup is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Current entries.
    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Current anchor.
    #[must_use]
    pub const fn anchor(&self) -> Point {
        self.anchor
    }

    /// Bounds of the main panel.
    #[must_use]
    pub const fn panel_bounds(&self) -> Rect {
        self.panel_bounds
    }

    /// Path of the entry whose submenu is shown.
    #[must_use]
    pub fn open_submenu(&self) -> Option<MenuPath> {
        self.open_submenu.map(MenuPath::root)
    }

    /// Highlighted entry.
    #[must_use]
    pub const fn highlighted(&self) -> Option<&MenuPath> {
        self.highlighted.as_ref()
    }

    fn row_height(&self) -> f32 {
        self.font_size + ROW_EXTRA
    }

    fn stack_rows(
        &self,
        entries: &[MenuEntry],
        origin: Point,
        parent: Option<&MenuPath>,
    ) -> (Vec<Row>, Rect) {
        let row_height = self.row_height();
        let mut y = origin.y + PANEL_PADDING;
        let mut rows = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            if !entry.is_visible() {
                continue;
            }
            let height = if entry.is_separator() {
                SEPARATOR_HEIGHT
            } else {
                row_height
            };
            let path = parent.map_or_else(|| MenuPath::root(i), |p| p.child(i));
            rows.push(Row {
                path,
                bounds: Rect::new(origin.x, y, self.width, height),
                separator: entry.is_separator(),
            });
            y += height;
        }
        let bounds = Rect::new(origin.x, origin.y, self.width, y - origin.y + PANEL_PADDING);
        (rows, bounds)
    }

    fn relayout(&mut self) {
        let (rows, panel) = self.stack_rows(&self.entries, self.anchor, None);
        self.rows = rows;
        self.panel_bounds = panel;

        self.submenu_rows.clear();
        self.submenu_bounds = None;
        let Some(index) = self.open_submenu else {
            return;
        };
        let parent = MenuPath::root(index);
        let Some(row) = self.rows.iter().find(|row| row.path == parent) else {
            return;
        };
        let Some(item) = self.entries.get(index).and_then(MenuEntry::as_item) else {
            return;
        };
        let origin = Point::new(self.panel_bounds.right(), row.bounds.y - PANEL_PADDING);
        let (rows, bounds) = self.stack_rows(&item.children, origin, Some(&parent));
        self.submenu_rows = rows;
        self.submenu_bounds = Some(bounds);
    }

    /// Entry path under `point`, separators excluded.
    #[must_use]
    pub fn item_at(&self, point: Point) -> Option<MenuPath> {
        if !self.open {
            return None;
        }
        self.submenu_rows
            .iter()
            .chain(&self.rows)
            .find(|row| !row.separator && row.bounds.contains_point(&point))
            .map(|row| row.path.clone())
    }

    fn contains(&self, point: Point) -> bool {
        self.panel_bounds.contains_point(&point)
            || self
                .submenu_bounds
                .is_some_and(|bounds| bounds.contains_point(&point))
    }

    /// Whether every entry along `path` is shown and every ancestor enabled.
    fn reachable(&self, path: &MenuPath) -> bool {
        let mut level = self.entries.as_slice();
        let segments = path.segments();
        for (depth, index) in segments.iter().enumerate() {
            let Some(entry) = level.get(*index) else {
                return false;
            };
            if !entry.is_visible() {
                return false;
            }
            if depth + 1 < segments.len() {
                match entry.as_item() {
                    Some(item) if item.enabled => level = &item.children,
                    _ => return false,
                }
            }
        }
        !segments.is_empty()
    }

    /// Act on the entry at `path` as if it had been clicked.
    ///
    /// Separators, disabled and hidden entries yield nothing.
    pub fn activate(&mut self, path: &MenuPath) -> Option<PopupAction> {
        if !self.open || !self.reachable(path) {
            return None;
        }
        let entry = path.lookup(&self.entries)?;
        if !entry.is_selectable() {
            return None;
        }
        let opens_submenu = path.segments().len() == 1
            && entry.as_item().is_some_and(|item| item.has_submenu());
        if opens_submenu {
            self.open_submenu = path.segments().first().copied();
            self.relayout();
            return Some(PopupAction::SubmenuOpened(path.clone()));
        }
        self.hide();
        Some(PopupAction::Activated(path.clone()))
    }

    /// Render model for a surface.
    #[must_use]
    pub fn view(&self) -> MenuView {
        MenuView {
            anchor: self.anchor,
            font_size: self.font_size,
            open: self.open,
            shadow: self.palette.map(|p| p.shadow),
            items: self.rendered(&self.entries, None),
            expanded: self.open_submenu(),
        }
    }

    fn rendered(&self, entries: &[MenuEntry], parent: Option<&MenuPath>) -> Vec<RenderedItem> {
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_visible())
            .map(|(i, entry)| {
                let path = parent.map_or_else(|| MenuPath::root(i), |p| p.child(i));
                match entry {
                    MenuEntry::Separator { text } => RenderedItem {
                        path,
                        label: text.clone(),
                        icon: None,
                        enabled: false,
                        separator: true,
                        text_color: None,
                        background: self.palette.map(|p| p.background),
                        children: Vec::new(),
                    },
                    MenuEntry::Item(item) => {
                        // One submenu level is rendered.
                        let children = if parent.is_none() {
                            self.rendered(&item.children, Some(&path))
                        } else {
                            Vec::new()
                        };
                        RenderedItem {
                            label: item.label.clone(),
                            icon: item.icon.clone(),
                            enabled: item.enabled,
                            separator: false,
                            text_color: self.palette.map(|p| {
                                if item.enabled {
                                    p.text
                                } else {
                                    p.disabled_text
                                }
                            }),
                            background: self.palette.map(|p| p.background),
                            children,
                            path,
                        }
                    }
                }
            })
            .collect()
    }

    fn paint_panel(&self, canvas: &mut dyn Canvas, bounds: Rect, rows: &[Row]) {
        let shadow = self
            .palette
            .map_or(Color::rgba(0.0, 0.0, 0.0, 0.1), |p| p.shadow);
        canvas.fill_rect(
            Rect::new(bounds.x - 2.0, bounds.y - 2.0, bounds.width + 4.0, bounds.height + 4.0),
            shadow,
        );
        let background = self.palette.map_or(Color::WHITE, |p| p.background);
        canvas.fill_rect(bounds, background);

        let text_color = self.palette.map_or(Color::BLACK, |p| p.text);
        let disabled_color = self
            .palette
            .map_or(Color::rgb(0.6, 0.6, 0.6), |p| p.disabled_text);

        for row in rows {
            let Some(entry) = row.path.lookup(&self.entries) else {
                continue;
            };
            let Some(item) = entry.as_item() else {
                let line_y = row.bounds.y + SEPARATOR_HEIGHT / 2.0;
                canvas.draw_line(
                    Point::new(row.bounds.x + PANEL_PADDING, line_y),
                    Point::new(row.bounds.right() - PANEL_PADDING, line_y),
                    Color::rgb(0.9, 0.9, 0.9),
                    1.0,
                );
                continue;
            };

            if self.highlighted.as_ref() == Some(&row.path) && item.enabled {
                canvas.fill_rect(row.bounds, self.hover_color);
            }
            let style = TextStyle {
                size: self.font_size,
                color: if item.enabled { text_color } else { disabled_color },
            };
            let baseline = row.bounds.y + (self.row_height() + self.font_size) / 2.0;
            canvas.draw_text(
                &item.label,
                Point::new(row.bounds.x + TEXT_INSET, baseline),
                &style,
            );
            if item.has_submenu() && row.path.segments().len() == 1 {
                canvas.draw_text(
                    "›",
                    Point::new(row.bounds.right() - 20.0, baseline),
                    &style,
                );
            }
        }
    }
}

impl Widget for PopupMenu {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let (_, panel) = self.stack_rows(&self.entries, Point::ORIGIN, None);
        constraints.constrain(panel.size())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.anchor = bounds.origin();
        self.relayout();
        LayoutResult {
            size: self.panel_bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if !self.open {
            return;
        }
        self.paint_panel(canvas, self.panel_bounds, &self.rows);
        if let Some(bounds) = self.submenu_bounds {
            self.paint_panel(canvas, bounds, &self.submenu_rows);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if !self.open {
            return None;
        }
        match event {
            Event::MouseDown { position, .. } => {
                if let Some(path) = self.item_at(*position) {
                    return self
                        .activate(&path)
                        .map(|action| Box::new(action) as Box<dyn Any + Send>);
                }
                if !self.contains(*position) {
                    self.hide();
                    return Some(Box::new(PopupAction::Dismissed));
                }
            }
            Event::MouseMove { position } => {
                self.highlighted = self.item_at(*position);
            }
            Event::MouseLeave => {
                self.highlighted = None;
            }
            _ => {}
        }
        None
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Menu
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.panel_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxmenu_core::{MenuItemDescriptor, MouseButton, RecordingCanvas};

    fn item(index: usize, label: &str) -> MenuEntry {
        MenuEntry::Item(MenuItemDescriptor::new(index, label))
    }

    fn disabled(index: usize, label: &str) -> MenuEntry {
        let mut d = MenuItemDescriptor::new(index, label);
        d.enabled = false;
        MenuEntry::Item(d)
    }

    fn hidden(index: usize, label: &str) -> MenuEntry {
        let mut d = MenuItemDescriptor::new(index, label);
        d.visible = false;
        MenuEntry::Item(d)
    }

    fn with_children(index: usize, label: &str, children: Vec<MenuEntry>) -> MenuEntry {
        let mut d = MenuItemDescriptor::new(index, label);
        d.children = children;
        MenuEntry::Item(d)
    }

    fn popup(entries: Vec<MenuEntry>) -> PopupMenu {
        let mut menu = PopupMenu::new();
        menu.reload(entries);
        menu.display(Point::new(100.0, 50.0));
        menu
    }

    fn click(menu: &mut PopupMenu, point: Point) -> Option<PopupAction> {
        menu.event(&Event::MouseDown {
            position: point,
            button: MouseButton::Left,
        })
        .and_then(|msg| msg.downcast::<PopupAction>().ok())
        .map(|action| *action)
    }

    fn row_center(menu: &PopupMenu, path: &MenuPath) -> Point {
        menu.rows
            .iter()
            .chain(&menu.submenu_rows)
            .find(|row| &row.path == path)
            .map(|row| row.bounds.center())
            .expect("row exists")
    }

    // =========================================================================
    // Layout Tests
    // =========================================================================

    #[test]
    fn test_new_is_closed() {
        let menu = PopupMenu::new();
        assert!(!menu.is_open());
        assert!(menu.entries().is_empty());
        assert_eq!(menu.view().items.len(), 0);
    }

    #[test]
    fn test_panel_height() {
        let menu = popup(vec![item(0, "A"), MenuEntry::separator(), item(2, "B")]);
        // 8 + 32 + 9 + 32 + 8
        assert_eq!(menu.panel_bounds(), Rect::new(100.0, 50.0, 200.0, 89.0));
    }

    #[test]
    fn test_hidden_entries_take_no_space() {
        let menu = popup(vec![item(0, "A"), hidden(1, "B"), item(2, "C")]);
        assert_eq!(menu.panel_bounds().height, 8.0 + 32.0 + 32.0 + 8.0);
        let labels: Vec<String> = menu.view().items.into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_font_size_sets_row_height() {
        let mut menu = PopupMenu::new().font_size(22.0);
        menu.reload(vec![item(0, "A")]);
        menu.display(Point::ORIGIN);
        assert_eq!(menu.panel_bounds().height, 8.0 + 40.0 + 8.0);
    }

    #[test]
    fn test_measure_and_layout() {
        let mut menu = PopupMenu::new();
        menu.reload(vec![item(0, "A")]);
        let size = menu.measure(Constraints::loose(Size::new(150.0, 500.0)));
        assert_eq!(size, Size::new(150.0, 48.0));

        let result = menu.layout(Rect::new(10.0, 20.0, 150.0, 48.0));
        assert_eq!(menu.anchor(), Point::new(10.0, 20.0));
        assert_eq!(result.size.height, 48.0);
    }

    // =========================================================================
    // Interaction Tests
    // =========================================================================

    #[test]
    fn test_click_enabled_item_activates_and_closes() {
        let mut menu = popup(vec![item(0, "A"), item(1, "B")]);
        let point = row_center(&menu, &MenuPath::root(1));
        assert_eq!(
            click(&mut menu, point),
            Some(PopupAction::Activated(MenuPath::root(1)))
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_click_disabled_or_separator_does_nothing() {
        let mut menu = popup(vec![disabled(0, "A"), MenuEntry::separator()]);
        let on_disabled = row_center(&menu, &MenuPath::root(0));
        let on_separator = row_center(&menu, &MenuPath::root(1));
        assert_eq!(click(&mut menu, on_disabled), None);
        assert_eq!(click(&mut menu, on_separator), None);
        assert!(menu.is_open());
    }

    #[test]
    fn test_click_outside_dismisses() {
        let mut menu = popup(vec![item(0, "A")]);
        assert_eq!(
            click(&mut menu, Point::new(5.0, 5.0)),
            Some(PopupAction::Dismissed)
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_click_padding_keeps_open() {
        let mut menu = popup(vec![item(0, "A")]);
        assert_eq!(click(&mut menu, Point::new(150.0, 52.0)), None);
        assert!(menu.is_open());
    }

    #[test]
    fn test_submenu_opens_then_child_activates() {
        let mut menu = popup(vec![
            item(0, "A"),
            with_children(1, "More", vec![item(0, "Deep"), disabled(1, "Off")]),
        ]);
        let parent = MenuPath::root(1);
        let point = row_center(&menu, &parent);
        assert_eq!(
            click(&mut menu, point),
            Some(PopupAction::SubmenuOpened(parent.clone()))
        );
        assert!(menu.is_open());
        assert_eq!(menu.open_submenu(), Some(parent.clone()));
        assert_eq!(menu.view().expanded, Some(parent.clone()));

        let off = row_center(&menu, &parent.child(1));
        assert!(off.x > menu.panel_bounds().right());
        assert_eq!(click(&mut menu, off), None);

        let deep = row_center(&menu, &parent.child(0));
        assert_eq!(
            click(&mut menu, deep),
            Some(PopupAction::Activated(parent.child(0)))
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_activate_by_path() {
        let mut menu = popup(vec![
            hidden(0, "Gone"),
            with_children(1, "More", vec![item(0, "Deep")]),
        ]);
        assert_eq!(menu.activate(&MenuPath::root(0)), None);
        assert_eq!(menu.activate(&MenuPath::root(7)), None);
        assert_eq!(
            menu.activate(&MenuPath::root(1).child(0)),
            Some(PopupAction::Activated(MenuPath::root(1).child(0)))
        );
    }

    #[test]
    fn test_children_of_disabled_parent_unreachable() {
        let mut parent = MenuItemDescriptor::new(0, "More");
        parent.enabled = false;
        parent.children = vec![item(0, "Deep")];
        let mut menu = popup(vec![MenuEntry::Item(parent)]);
        assert_eq!(menu.activate(&MenuPath::root(0).child(0)), None);
    }

    #[test]
    fn test_closed_popup_ignores_input() {
        let mut menu = popup(vec![item(0, "A")]);
        let point = row_center(&menu, &MenuPath::root(0));
        menu.hide();
        assert!(click(&mut menu, point).is_none());
        assert!(menu.activate(&MenuPath::root(0)).is_none());
    }

    #[test]
    fn test_hover_highlight() {
        let mut menu = popup(vec![item(0, "A")]);
        let point = row_center(&menu, &MenuPath::root(0));
        menu.event(&Event::MouseMove { position: point });
        assert_eq!(menu.highlighted(), Some(&MenuPath::root(0)));
        menu.event(&Event::MouseLeave);
        assert_eq!(menu.highlighted(), None);
    }

    #[test]
    fn test_reload_keeps_open() {
        let mut menu = popup(vec![item(0, "A")]);
        menu.reload(vec![item(0, "X"), item(1, "Y")]);
        assert!(menu.is_open());
        assert_eq!(menu.view().items.len(), 2);
    }

    // =========================================================================
    // Paint Tests
    // =========================================================================

    #[test]
    fn test_paint_closed_draws_nothing() {
        let menu = PopupMenu::new();
        let mut canvas = RecordingCanvas::new();
        menu.paint(&mut canvas);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_paint_labels_and_colors() {
        let palette = MenuPalette::parse("#202020", "#fafafa", "#ff0000").unwrap();
        let mut menu = PopupMenu::new().palette(Some(palette));
        menu.reload(vec![item(0, "On"), MenuEntry::separator(), disabled(2, "Off")]);
        menu.display(Point::ORIGIN);

        let mut canvas = RecordingCanvas::new();
        menu.paint(&mut canvas);
        assert_eq!(canvas.texts(), vec!["On", "Off"]);
        assert_eq!(canvas.commands()[0].color(), palette.shadow);
        assert_eq!(canvas.commands()[1].color(), palette.background);

        let off_color = canvas
            .commands()
            .iter()
            .find(|cmd| cmd.text() == Some("Off"))
            .map(ctxmenu_core::DrawCommand::color);
        assert_eq!(off_color, Some(palette.disabled_text));
    }

    #[test]
    fn test_view_colors_follow_palette() {
        let palette = MenuPalette::parse("#000000", "#ffffff", "#123456").unwrap();
        let mut menu = PopupMenu::new().palette(Some(palette));
        menu.reload(vec![item(0, "On"), disabled(1, "Off")]);
        menu.display(Point::ORIGIN);

        let view = menu.view();
        assert_eq!(view.shadow, Some(palette.shadow));
        assert_eq!(view.items[0].text_color, Some(palette.text));
        assert_eq!(view.items[1].text_color.map(|c| c.to_hex()), Some("#646464".into()));
        assert_eq!(view.items[1].background, Some(palette.background));
    }

    #[test]
    fn test_native_view_has_no_colors() {
        let menu = popup(vec![item(0, "A")]);
        let view = menu.view();
        assert_eq!(view.shadow, None);
        assert_eq!(view.items[0].text_color, None);
    }

    #[test]
    fn test_widget_metadata() {
        let menu = PopupMenu::new().with_test_id("ctx");
        assert_eq!(Widget::type_id(&menu), TypeId::of::<PopupMenu>());
        assert_eq!(menu.test_id(), Some("ctx"));
        assert_eq!(menu.accessible_role(), AccessibleRole::Menu);
    }
}
