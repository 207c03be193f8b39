//! Popup widget, menu synthesizer and controller for ctxmenu.
//!
//! - [`PopupMenu`]: anchored popup with one submenu level
//! - [`MenuSynthesizer`]: turns configuration or message items into [`MenuEntry`](ctxmenu_core::MenuEntry) lists
//! - [`MenuController`]: per-instance state machine over the host services

mod controller;
mod popup;
mod synth;

pub use controller::{ControllerState, MenuController};
pub use popup::{PopupAction, PopupMenu, DEFAULT_FONT_SIZE, DEFAULT_WIDTH};
pub use synth::{fixed_entries, message_entries, MenuSynthesizer};
