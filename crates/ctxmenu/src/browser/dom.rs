//! Popup containers in the page DOM.
//!
//! Every container is a `<div id="cm_<instance>_<n>" class="cm_container">`
//! appended to `body`. Rendering replaces its content with a `<ul>` whose
//! `<li>` rows carry their menu path in `data-path`.

use ctxmenu_core::host::{ContainerId, InstanceId, MenuSurface};
use ctxmenu_core::{MenuPath, MenuView, RenderedItem};
use std::collections::HashMap;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Class shared by every popup container.
pub const CONTAINER_CLASS: &str = "cm_container";

/// Surface drawing popups as DOM elements.
pub struct DomSurface {
    document: Document,
    containers: HashMap<ContainerId, HtmlElement>,
    serial: u64,
}

impl DomSurface {
    /// Surface on `document`.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            containers: HashMap::new(),
            serial: 0,
        }
    }

    /// Element of a live container.
    pub fn element(&self, id: &ContainerId) -> Option<&HtmlElement> {
        self.containers.get(id)
    }

    /// Every container element of `instance` in the document, including
    /// ones this surface did not create.
    fn instance_elements(&self, instance: &InstanceId) -> Vec<Element> {
        let Ok(nodes) = self
            .document
            .query_selector_all(&format!(".{CONTAINER_CLASS}"))
        else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|element| instance.owns_element_id(&element.id()))
            .collect()
    }

    fn create_element(&self, id: &ContainerId) -> Result<HtmlElement, JsValue> {
        let element = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()?;
        element.set_id(&id.to_string());
        element.set_class_name(CONTAINER_CLASS);
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("display", "none")?;
        style.set_property("z-index", "1000")?;
        self.document
            .body()
            .ok_or("No body")?
            .append_child(&element)?;
        Ok(element)
    }
}

impl MenuSurface for DomSurface {
    fn purge(&mut self, instance: &InstanceId) -> usize {
        let stale = self.instance_elements(instance);
        for element in &stale {
            element.remove();
        }
        self.containers.retain(|id, _| !id.belongs_to(instance));
        stale.len()
    }

    fn create_container(&mut self, instance: &InstanceId) -> ContainerId {
        self.serial += 1;
        let id = ContainerId::new(instance.clone(), self.serial);
        match self.create_element(&id) {
            Ok(element) => {
                self.containers.insert(id.clone(), element);
            }
            Err(err) => warn!(container = %id, error = ?err, "cannot create popup container"),
        }
        id
    }

    fn render(&mut self, container: &ContainerId, view: &MenuView) {
        let Some(element) = self.containers.get(container) else {
            return;
        };
        if let Err(err) = paint(&self.document, element, view) {
            warn!(container = %container, error = ?err, "popup render failed");
        }
    }

    fn hide(&mut self, container: &ContainerId) {
        if let Some(element) = self.containers.get(container) {
            element.style().set_property("display", "none").ok();
        }
    }

    fn remove(&mut self, container: &ContainerId) {
        if let Some(element) = self.containers.remove(container) {
            element.remove();
        }
    }

    fn container_count(&self, instance: &InstanceId) -> usize {
        self.instance_elements(instance).len()
    }
}

fn paint(document: &Document, element: &HtmlElement, view: &MenuView) -> Result<(), JsValue> {
    element.set_inner_html("");
    let style = element.style();
    style.set_property("left", &format!("{}px", view.anchor.x))?;
    style.set_property("top", &format!("{}px", view.anchor.y))?;
    style.set_property("font-size", &format!("{}px", view.font_size))?;
    match view.shadow {
        Some(shadow) => style.set_property("box-shadow", &format!("0 2px 6px {}", shadow.to_css()))?,
        None => {
            style.remove_property("box-shadow")?;
        }
    }
    element.append_child(&list(document, &view.items, view.expanded.as_ref())?)?;
    style.set_property("display", if view.open { "block" } else { "none" })?;
    Ok(())
}

fn list(
    document: &Document,
    items: &[RenderedItem],
    expanded: Option<&MenuPath>,
) -> Result<Element, JsValue> {
    let ul = document.create_element("ul")?;
    ul.set_class_name("cm_menu");
    for item in items {
        ul.append_child(&row(document, item, expanded)?)?;
    }
    Ok(ul)
}

fn row(
    document: &Document,
    item: &RenderedItem,
    expanded: Option<&MenuPath>,
) -> Result<Element, JsValue> {
    let li = document.create_element("li")?.dyn_into::<HtmlElement>()?;
    li.set_attribute("data-path", &item.path.to_string())?;

    let mut class = String::from("cm_item");
    if item.separator {
        class.push_str(" cm_separator");
    } else if !item.enabled {
        class.push_str(" cm_disabled");
    }
    if item.has_submenu() {
        class.push_str(" cm_submenu");
    }
    li.set_class_name(&class);

    let style = li.style();
    if let Some(color) = item.text_color {
        style.set_property("color", &color.to_css())?;
    }
    if let Some(color) = item.background {
        style.set_property("background-color", &color.to_css())?;
    }
    if item.separator {
        return Ok(li.into());
    }

    if let Some(icon) = &item.icon {
        let span = document.create_element("span")?;
        span.set_class_name("cm_icon");
        span.set_attribute("data-icon", icon)?;
        li.append_child(&span)?;
    }
    let label = document.create_element("span")?;
    label.set_class_name("cm_label");
    label.set_text_content(Some(&item.label));
    li.append_child(&label)?;

    if item.has_submenu() && expanded == Some(&item.path) {
        li.append_child(&list(document, &item.children, None)?)?;
    }
    Ok(li.into())
}
