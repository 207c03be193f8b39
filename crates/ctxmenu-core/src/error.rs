//! Error types for the context menu.

use crate::color::ColorParseError;
use thiserror::Error;

/// Runtime failures of a single render or emit cycle.
///
/// None of these are fatal: the widget logs the condition, suppresses the
/// affected render or emit, and waits for the next message or click.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// Message based position without numeric `x` and `y`.
    #[error("when using message based position, msg.position should contain x and y numbers")]
    InvalidPosition,

    /// Message based menu without an object payload.
    #[error("when using message based menu items, msg.menu should contain an object with menu items")]
    InvalidMenuSource,

    /// The selected item's payload could not be evaluated.
    #[error("cannot evaluate payload of type '{payload_type}': {reason}")]
    PayloadEvaluation {
        /// Declared payload type tag
        payload_type: String,
        /// Evaluator message
        reason: String,
    },

    /// The popup's external resources failed to load.
    #[error("failed to load context menu resources: {0}")]
    ResourceLoad(String),
}

impl MenuError {
    /// Whether this error came from validating an inbound message.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPosition | Self::InvalidMenuSource)
    }
}

/// Load-time configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON configuration.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML configuration.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A configured color is not a hex color.
    #[error("invalid {field} '{value}': {source}")]
    InvalidColor {
        /// Configuration field name
        field: &'static str,
        /// Offending value
        value: String,
        /// Parse failure
        #[source]
        source: ColorParseError,
    },
}
