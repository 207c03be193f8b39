//! Draw commands produced by painting widgets.

use crate::widget::TextStyle;
use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// One primitive of a painted popup: panel, row highlight, separator or label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Rectangle bounds
        bounds: Rect,
        /// Fill color
        color: Color,
    },
    /// Text run
    Text {
        /// Text content
        content: String,
        /// Baseline position
        position: Point,
        /// Text style
        style: TextStyle,
    },
    /// Straight line
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
}

impl DrawCommand {
    /// Text content if this is a text command.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Primary color of the command.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::FillRect { color, .. } | Self::Line { color, .. } => *color,
            Self::Text { style, .. } => style.color,
        }
    }
}
