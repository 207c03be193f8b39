//! Server side of the widget.
//!
//! The node sits between the flow and the dashboard: it validates messages on
//! their way to the browser and turns selections coming back into outbound
//! flow messages.

use crate::error::NodeError;
use crate::evaluate::{PayloadEvaluator, StandardEvaluator};
use crate::outbound::{OutboundMessage, DEFAULT_OUTPUT_FIELD};
use crate::theme::ThemeColors;
use ctxmenu_core::{InboundMessage, MenuError, SelectionEvent, WidgetConfig};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, info};

/// Report and drop the fields of `msg` the configuration cannot use.
///
/// An invalid `position` (message position mode) or `menu` (message menu
/// mode) is logged and removed; the message itself is always forwarded.
pub fn validate_inbound(config: &WidgetConfig, msg: &mut InboundMessage) -> Vec<MenuError> {
    let errors = msg.validate(config);
    for err in &errors {
        error!(node = %config.id, error = %err, "invalid inbound message");
        match err {
            MenuError::InvalidPosition => msg.position = None,
            MenuError::InvalidMenuSource => msg.menu = None,
            _ => {}
        }
    }
    errors
}

/// One deployed context menu node.
pub struct ContextMenuNode {
    config: WidgetConfig,
    evaluator: Box<dyn PayloadEvaluator>,
    closed: bool,
}

impl fmt::Debug for ContextMenuNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuNode")
            .field("config", &self.config)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl ContextMenuNode {
    /// Create a node from its configuration.
    ///
    /// In theme color mode the dashboard theme colors replace the configured
    /// ones. Colors are validated here.
    pub fn new(mut config: WidgetConfig, theme: Option<&ThemeColors>) -> Result<Self, NodeError> {
        if let Some(theme) = theme {
            if theme.apply_to(&mut config) {
                debug!(node = %config.id, "theme colors applied");
            }
        }
        config.palette()?;
        info!(node = %config.id, name = %config.name, "context menu node created");
        Ok(Self {
            config,
            evaluator: Box::new(StandardEvaluator),
            closed: false,
        })
    }

    /// Create a node from the JSON configuration and optional JSON theme.
    pub fn from_json(config: &str, theme: Option<&str>) -> Result<Self, NodeError> {
        let config = WidgetConfig::from_json(config)?;
        let theme = theme
            .map(serde_json::from_str::<Value>)
            .transpose()
            .map_err(NodeError::Theme)?
            .map(|theme| ThemeColors::from_value(&theme));
        Self::new(config, theme.as_ref())
    }

    /// Replace the payload evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: impl PayloadEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Effective configuration, theme applied.
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Validate a flow message before it goes to the dashboard.
    #[must_use]
    pub fn before_emit(&self, msg: Value) -> Value {
        let mut msg = InboundMessage::from_value(msg);
        validate_inbound(&self.config, &mut msg);
        msg.into_value()
    }

    /// Build the flow message for a selection.
    ///
    /// Without a selection envelope, or after [`close`](Self::close), nothing
    /// is sent. The evaluated payload is written to the node's output field,
    /// else the item's, else `payload`.
    pub fn before_send(
        &self,
        orig: Option<&SelectionEvent>,
    ) -> Result<Option<OutboundMessage>, MenuError> {
        let Some(selection) = orig else {
            debug!(node = %self.config.id, "selection without envelope, nothing sent");
            return Ok(None);
        };
        if self.closed {
            return Ok(None);
        }

        let item = &selection.menu_item;
        let context = serde_json::to_value(selection).unwrap_or(Value::Null);
        let value = self
            .evaluator
            .evaluate(&item.payload, &item.payload_type, &context)
            .map_err(|err| {
                error!(node = %self.config.id, label = %item.label, error = %err, "payload evaluation failed");
                err
            })?;

        let field = [self.config.output_field.as_deref(), item.output_field.as_deref()]
            .into_iter()
            .flatten()
            .find(|field| !field.is_empty())
            .unwrap_or(DEFAULT_OUTPUT_FIELD);

        let mut msg = OutboundMessage::for_item(item);
        msg.set_result(field, value);
        debug!(node = %self.config.id, menu_index = item.index, field, "selection sent");
        Ok(Some(msg))
    }

    /// Deregister the node.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!(node = %self.config.id, "context menu node closed");
        }
    }

    /// Whether [`close`](Self::close) was called.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}
