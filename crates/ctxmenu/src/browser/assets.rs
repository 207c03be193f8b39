//! Popup stylesheet and script, loaded once per page.
//!
//! All widgets on a page share one load. Each widget subscribes with its
//! instance id and is told when the load finished or failed.

use ctxmenu_core::host::{AssetLoader, AssetStatus, InstanceId};
use ctxmenu_core::MenuError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Response};

type Listener = Rc<dyn Fn(Result<(), MenuError>)>;

#[derive(Default)]
struct Shared {
    status: AssetStatus,
    listeners: HashMap<InstanceId, Listener>,
}

thread_local! {
    static SHARED: Rc<RefCell<Shared>> = Rc::default();
}

/// Handle to the page-wide asset state.
#[derive(Clone)]
pub struct BrowserAssets {
    shared: Rc<RefCell<Shared>>,
}

impl BrowserAssets {
    /// Handle to the state shared by every widget on the page.
    pub fn shared() -> Self {
        Self {
            shared: SHARED.with(Rc::clone),
        }
    }

    /// Notify `listener` about the outcome of loads, replacing an earlier
    /// listener of the same instance.
    pub fn subscribe(
        &self,
        instance: &InstanceId,
        listener: impl Fn(Result<(), MenuError>) + 'static,
    ) {
        self.shared
            .borrow_mut()
            .listeners
            .insert(instance.clone(), Rc::new(listener));
    }

    /// Stop notifying `instance`.
    pub fn unsubscribe(&self, instance: &InstanceId) {
        self.shared.borrow_mut().listeners.remove(instance);
    }

    fn finish(shared: &Rc<RefCell<Shared>>, result: Result<(), MenuError>) {
        let listeners: Vec<Listener> = {
            let mut state = shared.borrow_mut();
            state.status = match &result {
                Ok(()) => AssetStatus::Ready,
                Err(err) => AssetStatus::Failed(err.to_string()),
            };
            state.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener(result.clone());
        }
    }
}

impl AssetLoader for BrowserAssets {
    fn status(&self) -> AssetStatus {
        self.shared.borrow().status.clone()
    }

    fn request(&self, urls: &[&str]) {
        {
            let mut state = self.shared.borrow_mut();
            if matches!(state.status, AssetStatus::Loading | AssetStatus::Ready) {
                return;
            }
            state.status = AssetStatus::Loading;
        }

        let urls: Vec<String> = urls.iter().map(|url| (*url).to_string()).collect();
        let shared = Rc::clone(&self.shared);
        spawn_local(async move {
            let result = load(&urls).await.map_err(|err| {
                let reason = err.as_string().unwrap_or_else(|| format!("{err:?}"));
                error!(reason = %reason, "context menu resources failed to load");
                MenuError::ResourceLoad(reason)
            });
            if result.is_ok() {
                debug!(count = urls.len(), "context menu resources loaded");
            }
            Self::finish(&shared, result);
        });
    }
}

async fn load(urls: &[String]) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    for url in urls {
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "{url}: HTTP {}",
                response.status()
            )));
        }
        let text = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();
        install(&document, url, &text)?;
    }
    Ok(())
}

/// Add a fetched resource to `head`: stylesheets as `<style>`, anything
/// else as `<script>`.
fn install(document: &Document, url: &str, text: &str) -> Result<(), JsValue> {
    let tag = if url.ends_with(".css") { "style" } else { "script" };
    let element = document.create_element(tag)?;
    element.set_attribute("data-src", url)?;
    element.set_text_content(Some(text));
    document.head().ok_or("No head")?.append_child(&element)?;
    Ok(())
}
