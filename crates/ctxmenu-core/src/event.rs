//! Input events for widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
///
/// `MouseEnter`/`MouseLeave` are reported for the menu panel as a whole and
/// drive the auto-hide timer; positional events drive hover and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Mouse entered widget bounds
    MouseEnter,
    /// Mouse left widget bounds
    MouseLeave,
}

impl Event {
    /// Position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. } => Some(*position),
            Self::MouseEnter | Self::MouseLeave => None,
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left (primary)
    #[default]
    Left,
    /// Right (secondary)
    Right,
    /// Middle (wheel)
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(Event::MouseMove { position: p }.position(), Some(p));
        assert_eq!(
            Event::MouseDown {
                position: p,
                button: MouseButton::Left
            }
            .position(),
            Some(p)
        );
        assert_eq!(Event::MouseEnter.position(), None);
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let e = Event::MouseDown {
            position: Point::new(1.0, 2.0),
            button: MouseButton::Right,
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
