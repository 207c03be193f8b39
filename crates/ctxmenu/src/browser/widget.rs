//! WASM entry point of the context menu widget.

use super::assets::BrowserAssets;
use super::dom::{DomSurface, CONTAINER_CLASS};
use super::timers::{BrowserTimers, TimerSink};
use ctxmenu_core::host::{AssetLoader, InstanceId, TimerId};
use ctxmenu_core::{Event, InboundMessage, MenuPath, SelectionEvent, WidgetConfig};
use ctxmenu_widgets::MenuController;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, MouseEvent};

type BrowserController = MenuController<DomSurface, BrowserTimers>;

/// Context menu widget bound to one dashboard node.
#[wasm_bindgen]
pub struct ContextMenuWidget {
    instance: InstanceId,
    controller: Rc<RefCell<BrowserController>>,
    assets: BrowserAssets,
    on_select: Rc<RefCell<Option<js_sys::Function>>>,
    document: Document,
    click_callback: Option<Closure<dyn FnMut(MouseEvent)>>,
    mousemove_callback: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[wasm_bindgen]
impl ContextMenuWidget {
    /// Create the widget for the node with id `instance_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(instance_id: &str) -> Result<ContextMenuWidget, JsValue> {
        console_error_panic_hook::set_once();

        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        let instance = InstanceId::new(instance_id);
        let assets = BrowserAssets::shared();
        let sink = TimerSink::default();

        let controller = Rc::new(RefCell::new(MenuController::new(
            instance.clone(),
            DomSurface::new(document.clone()),
            BrowserTimers::new(Rc::clone(&sink)),
            Rc::new(assets.clone()) as Rc<dyn AssetLoader>,
        )));

        let weak = Rc::downgrade(&controller);
        *sink.borrow_mut() = Some(Box::new(move |id: TimerId| {
            if let Some(controller) = weak.upgrade() {
                controller.borrow_mut().on_timer(id);
            }
        }));
        let weak = Rc::downgrade(&controller);
        assets.subscribe(&instance, move |result| {
            if let Some(controller) = weak.upgrade() {
                controller.borrow_mut().on_assets_loaded(result);
            }
        });

        let mut widget = Self {
            instance,
            controller,
            assets,
            on_select: Rc::default(),
            document,
            click_callback: None,
            mousemove_callback: None,
        };
        widget.listen();
        Ok(widget)
    }

    /// Load the node configuration (JSON).
    pub fn init(&self, config_json: &str) -> Result<(), JsValue> {
        let config = WidgetConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.controller
            .borrow_mut()
            .init(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deliver an inbound message (JSON).
    #[wasm_bindgen(js_name = onMessage)]
    pub fn on_message(&self, msg_json: &str) -> Result<(), JsValue> {
        let value: Value = serde_json::from_str(msg_json)
            .map_err(|e| JsValue::from_str(&format!("JSON parse error: {e}")))?;
        self.controller
            .borrow_mut()
            .on_message(InboundMessage::from_value(value));
        Ok(())
    }

    /// Register the handler that receives each selection as JSON.
    #[wasm_bindgen(js_name = onSelect)]
    pub fn on_select(&self, callback: js_sys::Function) {
        *self.on_select.borrow_mut() = Some(callback);
    }

    /// Errors recorded since the last call, as a JSON array of strings.
    #[wasm_bindgen(js_name = takeDiagnostics)]
    pub fn take_diagnostics(&self) -> String {
        let messages: Vec<String> = self
            .controller
            .borrow_mut()
            .take_diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect();
        serde_json::to_string(&messages).unwrap_or_default()
    }

    /// Tear the widget down.
    pub fn destroy(&mut self) {
        self.controller.borrow_mut().destroy();
        self.assets.unsubscribe(&self.instance);
        if let Some(cb) = self.click_callback.take() {
            self.document
                .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
                .ok();
        }
        if let Some(cb) = self.mousemove_callback.take() {
            self.document
                .remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref())
                .ok();
        }
    }
}

impl ContextMenuWidget {
    /// Route document pointer input to the controller.
    fn listen(&mut self) {
        let weak = Rc::downgrade(&self.controller);
        let on_select = Rc::clone(&self.on_select);
        let click = Closure::new(move |e: MouseEvent| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            // Release the controller before calling out; the handler may send messages.
            let selection = handle_click(&controller, target(&e).as_ref());
            if let Some(selection) = selection {
                deliver(&on_select, &selection);
            }
        });
        self.document
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .ok();
        self.click_callback = Some(click);

        let weak: Weak<RefCell<BrowserController>> = Rc::downgrade(&self.controller);
        let inside = Cell::new(false);
        let mousemove = Closure::new(move |e: MouseEvent| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            let now = owns(&controller, target(&e).as_ref());
            if inside.replace(now) != now {
                let event = if now { Event::MouseEnter } else { Event::MouseLeave };
                controller.borrow_mut().on_event(&event);
            }
        });
        self.document
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())
            .ok();
        self.mousemove_callback = Some(mousemove);
    }
}

fn target(e: &MouseEvent) -> Option<Element> {
    e.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Whether `target` lies inside the live popup of `controller`.
fn owns(controller: &RefCell<BrowserController>, target: Option<&Element>) -> bool {
    let Some(own) = controller.borrow().container().map(ToString::to_string) else {
        return false;
    };
    target
        .and_then(|t| t.closest(&format!(".{CONTAINER_CLASS}")).ok().flatten())
        .is_some_and(|container| container.id() == own)
}

fn handle_click(
    controller: &RefCell<BrowserController>,
    target: Option<&Element>,
) -> Option<SelectionEvent> {
    if !owns(controller, target) {
        controller.borrow_mut().dismiss();
        return None;
    }
    let path = target
        .and_then(|t| t.closest("li[data-path]").ok().flatten())
        .and_then(|li| li.get_attribute("data-path"))
        .and_then(|path| path.parse::<MenuPath>().ok())?;
    controller.borrow_mut().select(&path)
}

fn deliver(on_select: &RefCell<Option<js_sys::Function>>, selection: &SelectionEvent) {
    let Ok(json) = serde_json::to_string(selection) else {
        return;
    };
    let callback = on_select.borrow().clone();
    if let Some(callback) = callback {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            warn!(menu_index = selection.menu_item.index, error = ?err, "select handler threw");
        }
    }
}
