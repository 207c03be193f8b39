//! Auto-hide timers on `setTimeout`.

use ctxmenu_core::host::{TimerId, TimerService};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Receiver of fired timer ids, installed once the controller exists.
pub type TimerSink = Rc<RefCell<Option<Box<dyn Fn(TimerId)>>>>;

/// Timer service backed by the window's `setTimeout`.
pub struct BrowserTimers {
    next: u64,
    handles: Rc<RefCell<HashMap<TimerId, i32>>>,
    sink: TimerSink,
}

impl BrowserTimers {
    /// Timers delivering expiries to `sink`.
    pub fn new(sink: TimerSink) -> Self {
        Self {
            next: 0,
            handles: Rc::default(),
            sink,
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.handles.borrow().len()
    }
}

impl TimerService for BrowserTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);

        let handles = Rc::clone(&self.handles);
        let sink = Rc::clone(&self.sink);
        let callback = Closure::once_into_js(move || {
            handles.borrow_mut().remove(&id);
            if let Some(fire) = sink.borrow().as_ref() {
                fire(id);
            }
        });

        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = web_sys::window().map(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                ms,
            )
        });
        match handle {
            Some(Ok(handle)) => {
                self.handles.borrow_mut().insert(id, handle);
            }
            _ => warn!(timer = %id, "setTimeout unavailable, auto-hide disabled"),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let Some(handle) = self.handles.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle);
        }
    }
}
