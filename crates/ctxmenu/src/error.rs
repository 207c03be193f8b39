//! Node creation errors.

use ctxmenu_core::ConfigError;
use thiserror::Error;

/// Failure to create a [`ContextMenuNode`](crate::ContextMenuNode).
#[derive(Debug, Error)]
pub enum NodeError {
    /// The widget configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The dashboard theme is not valid JSON.
    #[error("invalid dashboard theme: {0}")]
    Theme(#[source] serde_json::Error),
}
