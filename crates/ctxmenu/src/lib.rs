//! ctxmenu: a context menu widget for live dashboards.
//!
//! The flow pushes messages to the node, the node validates them and hands
//! them to the browser widget, and the widget reports the selected item back
//! to the node, which turns it into an outbound flow message.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { ContextMenuWidget } from './ctxmenu.js';
//!
//! async function main() {
//!     await init();
//!     const widget = new ContextMenuWidget('ctx1');
//!     widget.init(JSON.stringify(config));
//!     widget.onSelect((json) => socket.send(json));
//!     widget.onMessage(JSON.stringify({ position: { x: 10, y: 20 } }));
//! }
//! ```
//!
//! # Node Side
//!
//! ```
//! use ctxmenu::{ContextMenuNode, MenuItemDescriptor, MenuPath, SelectionEvent};
//!
//! let node = ContextMenuNode::from_json(r#"{"outputField": "result"}"#, None).unwrap();
//! let mut item = MenuItemDescriptor::new(0, "Open");
//! item.payload = serde_json::json!("42");
//! item.payload_type = "num".into();
//!
//! let selection = SelectionEvent::new(&item, &MenuPath::root(0));
//! let msg = node.before_send(Some(&selection)).unwrap().unwrap();
//! assert_eq!(msg.get("result"), Some(&serde_json::json!(42)));
//! ```

pub use ctxmenu_core::*;
pub use ctxmenu_widgets as widgets;

pub mod browser;
mod error;
pub mod evaluate;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
mod node;
pub mod outbound;
mod theme;

pub use error::NodeError;
pub use evaluate::{PayloadEvaluator, StandardEvaluator};
pub use node::{validate_inbound, ContextMenuNode};
pub use outbound::{set_result, OutboundMessage, DEFAULT_OUTPUT_FIELD};
pub use theme::ThemeColors;

#[cfg(target_arch = "wasm32")]
pub use browser::ContextMenuWidget;
