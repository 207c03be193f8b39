//! Services the controller borrows from its host.
//!
//! The controller never touches a clock, a document or the network directly.
//! A browser build plugs in `setTimeout`, DOM containers and `fetch`; tests
//! plug in a manual clock and an in-memory surface.

use crate::view::MenuView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// External resources the popup needs before the first render.
pub const MENU_ASSET_URLS: [&str; 2] = [
    "/ui_context_menu/lib/contextmenu.js",
    "/ui_context_menu/lib/contextmenu.css",
];

/// Prefix shared by every container id.
pub const CONTAINER_PREFIX: &str = "cm_";

/// Handle of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Identifier of one widget instance on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    /// Wrap a node id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix of every container id owned by this instance.
    #[must_use]
    pub fn container_prefix(&self) -> String {
        format!("{CONTAINER_PREFIX}{}_", self.0)
    }

    /// Whether a DOM element id names one of this instance's containers.
    ///
    /// The serial after the prefix must be all digits, so instance `a` does
    /// not claim `cm_a_1_3` of instance `a_1`.
    #[must_use]
    pub fn owns_element_id(&self, element_id: &str) -> bool {
        element_id
            .strip_prefix(&self.container_prefix())
            .is_some_and(|serial| !serial.is_empty() && serial.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a popup container, rendered as `cm_<instance>_<serial>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId {
    instance: InstanceId,
    serial: u64,
}

impl ContainerId {
    /// Container `serial` of `instance`.
    #[must_use]
    pub const fn new(instance: InstanceId, serial: u64) -> Self {
        Self { instance, serial }
    }

    /// Owning instance.
    #[must_use]
    pub const fn instance(&self) -> &InstanceId {
        &self.instance
    }

    /// Per-instance serial number.
    #[must_use]
    pub const fn serial(&self) -> u64 {
        self.serial
    }

    /// Whether this container belongs to `instance`.
    #[must_use]
    pub fn belongs_to(&self, instance: &InstanceId) -> bool {
        &self.instance == instance
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.instance.container_prefix(), self.serial)
    }
}

/// One-shot timers.
pub trait TimerService {
    /// Schedule a timer; expiry is reported back through the host.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a timer. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Where popups live.
pub trait MenuSurface {
    /// Remove every container of `instance`, returning how many were removed.
    fn purge(&mut self, instance: &InstanceId) -> usize;

    /// Create an empty, hidden container.
    fn create_container(&mut self, instance: &InstanceId) -> ContainerId;

    /// Draw `view` into `container`, replacing its previous contents.
    fn render(&mut self, container: &ContainerId, view: &MenuView);

    /// Hide the popup in `container` without removing it.
    fn hide(&mut self, container: &ContainerId);

    /// Remove `container` entirely.
    fn remove(&mut self, container: &ContainerId);

    /// Number of live containers owned by `instance`.
    fn container_count(&self, instance: &InstanceId) -> usize;
}

/// Load state of the popup's external resources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    /// Never requested
    #[default]
    Unloaded,
    /// Request in flight
    Loading,
    /// Installed
    Ready,
    /// Last attempt failed
    Failed(String),
}

/// Loader shared by every widget instance on a page.
///
/// Completion is reported to each controller through
/// `MenuController::on_assets_loaded`.
pub trait AssetLoader {
    /// Current status.
    fn status(&self) -> AssetStatus;

    /// Start loading `urls`; a no-op while a request is in flight.
    fn request(&self, urls: &[&str]);
}
