//! Paintable, interactive elements.
//!
//! A widget is measured against [`Constraints`], laid out into a [`Rect`],
//! painted onto a [`Canvas`] and fed pointer [`Event`]s. The popup menu is the
//! only widget; the owner downcasts what [`Widget::event`] returns.

use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Identity of a widget's concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Identity of `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Size a widget settled on during layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Final size
    pub size: Size,
}

/// An element that can be sized, painted and clicked.
pub trait Widget: Send + Sync {
    /// Concrete type of the widget.
    fn type_id(&self) -> TypeId;

    /// Preferred size within `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Place the widget at `bounds`.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Paint the current state.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// React to input; the returned message is for the owner.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Role announced to assistive technology.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Stable id for tests and DOM lookups.
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Area currently covered.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Paint target.
pub trait Canvas {
    /// Fill `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` with its baseline at `position`.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Straight line from `from` to `to`.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);
}

/// Font size and color of a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
        }
    }
}

/// Accessibility role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Menu
    Menu,
    /// Menu item
    MenuItem,
}
