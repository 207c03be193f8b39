//! In-memory popup surface.

use ctxmenu_core::host::{ContainerId, InstanceId, MenuSurface};
use ctxmenu_core::MenuView;
use std::collections::BTreeMap;

/// State of one container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerRecord {
    /// Last rendered view
    pub view: Option<MenuView>,
    /// Whether the popup is currently shown
    pub visible: bool,
    /// Number of renders into this container
    pub renders: usize,
}

/// Surface that records containers and views instead of drawing them.
///
/// Containers of every instance share one map, like containers of every
/// widget share one document body.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    containers: BTreeMap<ContainerId, ContainerRecord>,
    serials: BTreeMap<InstanceId, u64>,
    purged: usize,
}

impl HeadlessSurface {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leftover container for `instance`, as a previous page render
    /// would leave behind.
    pub fn with_stale_container(mut self, instance: &InstanceId) -> Self {
        let id = self.next_id(instance);
        self.containers.insert(
            id,
            ContainerRecord {
                visible: true,
                ..ContainerRecord::default()
            },
        );
        self
    }

    fn next_id(&mut self, instance: &InstanceId) -> ContainerId {
        let serial = self.serials.entry(instance.clone()).or_insert(0);
        *serial += 1;
        ContainerId::new(instance.clone(), *serial)
    }

    /// Ids of all live containers.
    pub fn container_ids(&self) -> Vec<&ContainerId> {
        self.containers.keys().collect()
    }

    /// Record of one container.
    pub fn container(&self, id: &ContainerId) -> Option<&ContainerRecord> {
        self.containers.get(id)
    }

    /// The visible popup of `instance`, if any.
    pub fn visible_view(&self, instance: &InstanceId) -> Option<&MenuView> {
        self.containers
            .iter()
            .filter(|(id, record)| id.belongs_to(instance) && record.visible)
            .find_map(|(_, record)| record.view.as_ref())
    }

    /// Whether `instance` currently shows a popup.
    pub fn is_showing(&self, instance: &InstanceId) -> bool {
        self.visible_view(instance).is_some()
    }

    /// Labels of the visible popup of `instance`.
    pub fn visible_labels(&self, instance: &InstanceId) -> Vec<String> {
        self.visible_view(instance)
            .map(|view| view.labels().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Total containers removed by `purge`.
    pub const fn purged(&self) -> usize {
        self.purged
    }

    /// Total renders across all containers.
    pub fn render_count(&self) -> usize {
        self.containers.values().map(|record| record.renders).sum()
    }

    /// Assert how many containers `instance` owns.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_container_count(&self, instance: &InstanceId, expected: usize) -> &Self {
        let actual = self.container_count(instance);
        assert_eq!(
            actual, expected,
            "Expected {expected} containers for '{instance}' but found {actual}"
        );
        self
    }

    /// Assert that `instance` shows a popup with exactly these labels.
    ///
    /// # Panics
    ///
    /// Panics if nothing is shown or the labels differ.
    pub fn assert_showing(&self, instance: &InstanceId, labels: &[&str]) -> &Self {
        assert!(
            self.is_showing(instance),
            "Expected a visible popup for '{instance}'"
        );
        let actual = self.visible_labels(instance);
        assert_eq!(actual, labels, "Unexpected popup labels for '{instance}'");
        self
    }

    /// Assert that `instance` shows nothing.
    ///
    /// # Panics
    ///
    /// Panics if a popup is visible.
    pub fn assert_hidden(&self, instance: &InstanceId) -> &Self {
        assert!(
            !self.is_showing(instance),
            "Expected no visible popup for '{instance}'"
        );
        self
    }
}

impl MenuSurface for HeadlessSurface {
    fn purge(&mut self, instance: &InstanceId) -> usize {
        let before = self.containers.len();
        self.containers.retain(|id, _| !id.belongs_to(instance));
        let removed = before - self.containers.len();
        self.purged += removed;
        removed
    }

    fn create_container(&mut self, instance: &InstanceId) -> ContainerId {
        let id = self.next_id(instance);
        self.containers.insert(id.clone(), ContainerRecord::default());
        id
    }

    fn render(&mut self, container: &ContainerId, view: &MenuView) {
        if let Some(record) = self.containers.get_mut(container) {
            record.visible = view.open;
            record.view = Some(view.clone());
            record.renders += 1;
        }
    }

    fn hide(&mut self, container: &ContainerId) {
        if let Some(record) = self.containers.get_mut(container) {
            record.visible = false;
        }
    }

    fn remove(&mut self, container: &ContainerId) {
        self.containers.remove(container);
    }

    fn container_count(&self, instance: &InstanceId) -> usize {
        self.containers
            .keys()
            .filter(|id| id.belongs_to(instance))
            .count()
    }
}
