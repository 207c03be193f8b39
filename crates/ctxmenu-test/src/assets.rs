//! Asset loader whose outcome the test decides.

use ctxmenu_core::host::{AssetLoader, AssetStatus};
use std::cell::RefCell;

/// Loader that records requests and finishes only when told to.
#[derive(Debug, Default)]
pub struct ScriptedAssets {
    status: RefCell<AssetStatus>,
    requests: RefCell<Vec<Vec<String>>>,
}

impl ScriptedAssets {
    /// Loader that has never been asked for anything.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Loader whose assets are already installed.
    pub fn ready() -> Self {
        let assets = Self::default();
        assets.set_status(AssetStatus::Ready);
        assets
    }

    /// Force the status.
    pub fn set_status(&self, status: AssetStatus) {
        *self.status.borrow_mut() = status;
    }

    /// Mark the in-flight request as succeeded.
    pub fn finish(&self) {
        self.set_status(AssetStatus::Ready);
    }

    /// Mark the in-flight request as failed.
    pub fn fail(&self, reason: impl Into<String>) {
        self.set_status(AssetStatus::Failed(reason.into()));
    }

    /// Number of requests that started a load.
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// URLs of the most recent request.
    pub fn last_request(&self) -> Option<Vec<String>> {
        self.requests.borrow().last().cloned()
    }
}

impl AssetLoader for ScriptedAssets {
    fn status(&self) -> AssetStatus {
        self.status.borrow().clone()
    }

    fn request(&self, urls: &[&str]) {
        if matches!(*self.status.borrow(), AssetStatus::Loading | AssetStatus::Ready) {
            return;
        }
        self.requests
            .borrow_mut()
            .push(urls.iter().map(|url| (*url).to_string()).collect());
        self.set_status(AssetStatus::Loading);
    }
}
