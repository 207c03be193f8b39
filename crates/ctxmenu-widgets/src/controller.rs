//! Per-instance menu controller.
//!
//! The controller reconciles the configuration, inbound messages and pointer
//! input into at most one live popup per widget instance. It owns the popup,
//! its container and the auto-hide timer; clocks, documents and asset loading
//! are reached only through the host traits in [`ctxmenu_core::host`].
//!
//! ```text
//! Uninitialized --init--> Idle --message--> Displayed --leave--> AutoHideArmed
//!                          ^                   |  ^                 |
//!                          |                   |  +------enter------+
//!                          +--expiry / failure-+--------------------+
//! any --destroy--> Destroyed
//! ```

use crate::popup::{PopupAction, PopupMenu};
use crate::synth::MenuSynthesizer;
use ctxmenu_core::host::{
    AssetLoader, AssetStatus, ContainerId, InstanceId, MenuSurface, TimerId, TimerService,
    MENU_ASSET_URLS,
};
use ctxmenu_core::{
    ConfigError, Event, InboundMessage, MenuEntry, MenuError, MenuPalette, MenuPath, Point,
    PositionMode, SelectionEvent, Widget, WidgetConfig,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Oldest diagnostics are dropped beyond this many.
const MAX_DIAGNOSTICS: usize = 64;

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    /// No configuration yet
    Uninitialized,
    /// Configured, nothing shown
    Idle,
    /// Popup shown, no auto-hide timer running
    Displayed,
    /// Popup shown and the auto-hide timer running
    AutoHideArmed,
    /// Torn down; all input is ignored
    Destroyed,
}

enum Phase {
    Uninitialized,
    Ready {
        config: Box<WidgetConfig>,
        palette: Option<MenuPalette>,
        auto_hide: Option<Duration>,
    },
    Destroyed,
}

/// The live popup of an instance.
struct DisplayState {
    container: ContainerId,
    popup: PopupMenu,
    timer: Option<TimerId>,
}

/// Drives one widget instance.
pub struct MenuController<S, T> {
    instance: InstanceId,
    surface: S,
    timers: T,
    assets: Rc<dyn AssetLoader>,
    phase: Phase,
    synthesizer: MenuSynthesizer,
    display: Option<DisplayState>,
    pending: Option<InboundMessage>,
    diagnostics: Vec<MenuError>,
}

impl<S: MenuSurface, T: TimerService> MenuController<S, T> {
    /// Controller for `instance`, not yet configured.
    pub fn new(instance: InstanceId, surface: S, timers: T, assets: Rc<dyn AssetLoader>) -> Self {
        Self {
            instance,
            surface,
            timers,
            assets,
            phase: Phase::Uninitialized,
            synthesizer: MenuSynthesizer::new(),
            display: None,
            pending: None,
            diagnostics: Vec::new(),
        }
    }

    /// Load the configuration.
    ///
    /// Colors are parsed up front so a bad color fails here rather than on
    /// every render. Only the first successful call has an effect.
    pub fn init(&mut self, config: WidgetConfig) -> Result<(), ConfigError> {
        match self.phase {
            Phase::Uninitialized => {}
            Phase::Ready { .. } => {
                warn!(instance = %self.instance, "already initialized, ignoring configuration");
                return Ok(());
            }
            Phase::Destroyed => {
                trace!(instance = %self.instance, "init after destroy ignored");
                return Ok(());
            }
        }

        let palette = config.palette()?;
        let auto_hide = config.auto_hide();
        debug!(
            instance = %self.instance,
            auto_hide_ms = config.auto_hide_ms(),
            menu = ?config.menu,
            position = ?config.position,
            "context menu initialized"
        );
        self.phase = Phase::Ready {
            config: Box::new(config),
            palette,
            auto_hide,
        };
        Ok(())
    }

    /// Process one inbound message.
    pub fn on_message(&mut self, msg: InboundMessage) {
        let config = match &self.phase {
            Phase::Ready { config, .. } => config,
            Phase::Uninitialized => {
                warn!(instance = %self.instance, "message before configuration ignored");
                return;
            }
            Phase::Destroyed => {
                trace!(instance = %self.instance, "message after destroy ignored");
                return;
            }
        };

        let entries = match self.synthesizer.synthesize(config, msg.menu.as_ref()) {
            Ok(entries) => entries,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        let anchor = match config.position {
            PositionMode::Config => config.fixed_position(),
            PositionMode::Message => match msg.position_point() {
                Ok(point) => point,
                Err(err) => {
                    self.fail(err);
                    return;
                }
            },
        };

        if self.display.is_none() {
            match self.assets.status() {
                AssetStatus::Ready => self.create_display(),
                AssetStatus::Loading => {
                    debug!(instance = %self.instance, "resources loading, deferring message");
                    self.pending = Some(msg);
                    return;
                }
                AssetStatus::Unloaded | AssetStatus::Failed(_) => {
                    debug!(instance = %self.instance, "requesting menu resources");
                    self.assets.request(&MENU_ASSET_URLS);
                    self.pending = Some(msg);
                    return;
                }
            }
        }

        self.show(entries, anchor);
    }

    /// Resume after the shared asset loader finished.
    pub fn on_assets_loaded(&mut self, result: Result<(), MenuError>) {
        if matches!(self.phase, Phase::Destroyed) {
            return;
        }
        match result {
            Ok(()) => {
                if let Some(msg) = self.pending.take() {
                    debug!(instance = %self.instance, "resources ready, replaying message");
                    self.on_message(msg);
                }
            }
            Err(err) => {
                self.pending = None;
                self.record(err);
            }
        }
    }

    /// Feed pointer input to the popup.
    ///
    /// Returns the selection when the input was a click on an enabled item.
    pub fn on_event(&mut self, event: &Event) -> Option<SelectionEvent> {
        let auto_hide = match &self.phase {
            Phase::Ready { auto_hide, .. } => *auto_hide,
            _ => return None,
        };
        let display = self.display.as_mut()?;
        if !display.popup.is_open() {
            return None;
        }

        match event {
            Event::MouseEnter => {
                display.popup.event(event);
                if let Some(id) = display.timer.take() {
                    trace!(instance = %self.instance, timer = %id, "pointer entered, auto-hide cancelled");
                    self.timers.cancel(id);
                }
                None
            }
            Event::MouseLeave => {
                display.popup.event(event);
                if let Some(delay) = auto_hide {
                    if let Some(id) = display.timer.take() {
                        self.timers.cancel(id);
                    }
                    let id = self.timers.schedule(delay);
                    trace!(instance = %self.instance, timer = %id, "pointer left, auto-hide armed");
                    display.timer = Some(id);
                }
                None
            }
            _ => {
                let action = display
                    .popup
                    .event(event)
                    .and_then(|msg| msg.downcast::<PopupAction>().ok())?;
                self.apply(*action)
            }
        }
    }

    /// Act on the entry at `path` as if it had been clicked.
    pub fn select(&mut self, path: &MenuPath) -> Option<SelectionEvent> {
        if !matches!(self.phase, Phase::Ready { .. }) {
            return None;
        }
        let action = self.display.as_mut()?.popup.activate(path)?;
        self.apply(action)
    }

    /// Close the popup without a selection, as a click elsewhere on the page
    /// does. The auto-hide timer keeps running.
    pub fn dismiss(&mut self) {
        if !matches!(self.phase, Phase::Ready { .. }) {
            return;
        }
        let Some(display) = self.display.as_mut() else {
            return;
        };
        if display.popup.is_open() {
            display.popup.hide();
            self.apply(PopupAction::Dismissed);
        }
    }

    fn apply(&mut self, action: PopupAction) -> Option<SelectionEvent> {
        let display = self.display.as_mut()?;
        match action {
            PopupAction::Activated(path) => {
                self.surface.hide(&display.container);
                let item = path
                    .lookup(display.popup.entries())
                    .and_then(MenuEntry::as_item)?;
                let selection = SelectionEvent::new(item, &path);
                info!(instance = %self.instance, path = %path, label = %item.label, "menu item selected");
                Some(selection)
            }
            PopupAction::SubmenuOpened(path) => {
                trace!(instance = %self.instance, path = %path, "submenu opened");
                self.surface.render(&display.container, &display.popup.view());
                None
            }
            PopupAction::Dismissed => {
                debug!(instance = %self.instance, "menu dismissed");
                self.surface.hide(&display.container);
                None
            }
        }
    }

    /// Handle expiry of a timer scheduled by this controller.
    ///
    /// Ids other than the active auto-hide timer are stale and ignored.
    pub fn on_timer(&mut self, id: TimerId) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        if display.timer != Some(id) {
            trace!(instance = %self.instance, timer = %id, "stale timer ignored");
            return;
        }
        display.timer = None;
        display.popup.hide();
        self.surface.hide(&display.container);
        debug!(instance = %self.instance, "menu auto-hidden");
    }

    /// Tear the instance down. Further input is ignored.
    pub fn destroy(&mut self) {
        if matches!(self.phase, Phase::Destroyed) {
            return;
        }
        if let Some(display) = self.display.take() {
            if let Some(id) = display.timer {
                self.timers.cancel(id);
            }
            self.surface.remove(&display.container);
        }
        self.surface.purge(&self.instance);
        self.pending = None;
        self.phase = Phase::Destroyed;
        debug!(instance = %self.instance, "context menu destroyed");
    }

    fn create_display(&mut self) {
        let Phase::Ready {
            config, palette, ..
        } = &self.phase
        else {
            return;
        };
        let purged = self.surface.purge(&self.instance);
        let container = self.surface.create_container(&self.instance);
        let mut popup = PopupMenu::new().palette(*palette).with_test_id(container.to_string());
        if let Some(size) = config.font_size {
            popup = popup.font_size(size);
        }
        debug!(instance = %self.instance, container = %container, purged, "popup created");
        self.display = Some(DisplayState {
            container,
            popup,
            timer: None,
        });
    }

    fn show(&mut self, entries: Vec<MenuEntry>, anchor: Point) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        if let Some(id) = display.timer.take() {
            self.timers.cancel(id);
        }
        display.popup.reload(entries);
        display.popup.display(anchor);
        self.surface.render(&display.container, &display.popup.view());
        let count = display.popup.entries().len();
        trace!(
            instance = %self.instance,
            x = anchor.x,
            y = anchor.y,
            entries = count,
            "menu displayed"
        );
    }

    /// A failed cycle: record, drop any deferred message, then hide whatever
    /// is still shown.
    fn fail(&mut self, err: MenuError) {
        self.record(err);
        self.pending = None;
        if let Some(display) = self.display.as_mut() {
            if let Some(id) = display.timer.take() {
                self.timers.cancel(id);
            }
            if display.popup.is_open() {
                display.popup.hide();
                self.surface.hide(&display.container);
            }
        }
    }

    fn record(&mut self, err: MenuError) {
        error!(instance = %self.instance, error = %err, "context menu cycle failed");
        if self.diagnostics.len() == MAX_DIAGNOSTICS {
            self.diagnostics.remove(0);
        }
        self.diagnostics.push(err);
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        match self.phase {
            Phase::Uninitialized => ControllerState::Uninitialized,
            Phase::Destroyed => ControllerState::Destroyed,
            Phase::Ready { .. } => match &self.display {
                Some(d) if d.popup.is_open() && d.timer.is_some() => ControllerState::AutoHideArmed,
                Some(d) if d.popup.is_open() => ControllerState::Displayed,
                _ => ControllerState::Idle,
            },
        }
    }

    /// Instance id.
    pub const fn instance(&self) -> &InstanceId {
        &self.instance
    }

    /// Configuration, once initialized.
    pub fn config(&self) -> Option<&WidgetConfig> {
        match &self.phase {
            Phase::Ready { config, .. } => Some(config.as_ref()),
            _ => None,
        }
    }

    /// Errors recorded by failed cycles, oldest first.
    pub fn diagnostics(&self) -> &[MenuError] {
        &self.diagnostics
    }

    /// Drain recorded errors.
    pub fn take_diagnostics(&mut self) -> Vec<MenuError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// The live popup.
    pub fn popup(&self) -> Option<&PopupMenu> {
        self.display.as_ref().map(|d| &d.popup)
    }

    /// Container of the live popup.
    pub fn container(&self) -> Option<&ContainerId> {
        self.display.as_ref().map(|d| &d.container)
    }

    /// Running auto-hide timer.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.display.as_ref().and_then(|d| d.timer)
    }

    /// Whether a message is waiting for resources.
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The timer service.
    pub const fn timers(&self) -> &T {
        &self.timers
    }

    /// The timer service, mutably.
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}
