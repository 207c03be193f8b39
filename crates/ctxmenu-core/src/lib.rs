//! Core types and host traits for the ctxmenu dashboard context menu.
//!
//! This crate holds everything that is independent of where the menu is drawn:
//! - Geometry and color: [`Point`], [`Rect`], [`Color`] with [`Color::adjust`]
//! - Configuration: [`WidgetConfig`] and the fixed [`FixedMenuItem`] list
//! - Normalized entries: [`MenuEntry`], [`MenuItemDescriptor`], [`SelectionEvent`]
//! - Inbound messages: [`InboundMessage`]
//! - Host services: [`host::TimerService`], [`host::MenuSurface`], [`host::AssetLoader`]

mod canvas;
mod color;
mod config;
mod constraints;
pub mod draw;
mod error;
mod event;
mod geometry;
pub mod host;
mod item;
mod message;
mod view;
pub mod widget;

pub use canvas::RecordingCanvas;
pub use color::{adjust_hex, Color, ColorParseError};
pub use config::{
    ColorMode, FixedMenuItem, IntervalUnit, MenuPalette, MenuSource, PositionMode, WidgetConfig,
    DISABLED_TEXT_LIGHTEN,
};
pub use constraints::Constraints;
pub use draw::DrawCommand;
pub use error::{ConfigError, MenuError};
pub use event::{Event, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use item::{
    MenuEntry, MenuItemDescriptor, MenuPath, SelectionEvent, DEFAULT_PAYLOAD_TYPE,
    SEPARATOR_MARKER,
};
pub use message::InboundMessage;
pub use view::{MenuView, RenderedItem};
pub use widget::{AccessibleRole, Canvas, LayoutResult, TextStyle, TypeId, Widget};
