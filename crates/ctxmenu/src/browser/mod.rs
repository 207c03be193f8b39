//! Browser runtime for the context menu widget.
//!
//! Plugs DOM containers, `setTimeout` and `fetch` into the host traits of
//! the controller and exposes the widget to JavaScript.

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod timers;
#[cfg(target_arch = "wasm32")]
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub use assets::BrowserAssets;
#[cfg(target_arch = "wasm32")]
pub use dom::{DomSurface, CONTAINER_CLASS};
#[cfg(target_arch = "wasm32")]
pub use timers::{BrowserTimers, TimerSink};
#[cfg(target_arch = "wasm32")]
pub use widget::ContextMenuWidget;
