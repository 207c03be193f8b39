//! Size limits passed to [`Widget::measure`](crate::Widget::measure).

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// Minimum and maximum width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Minimum width
    pub min_width: f32,
    /// Maximum width
    pub max_width: f32,
    /// Minimum height
    pub min_height: f32,
    /// Maximum height
    pub max_height: f32,
}

impl Constraints {
    /// Explicit limits.
    #[must_use]
    pub const fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Anything from zero up to `size`.
    #[must_use]
    pub fn loose(size: Size) -> Self {
        Self::new(0.0, size.width, 0.0, size.height)
    }

    /// Clamp `size` into the limits.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min_width, self.max_width),
            size.height.clamp(self.min_height, self.max_height),
        )
    }
}

/// No limits at all.
impl Default for Constraints {
    fn default() -> Self {
        Self::new(0.0, f32::INFINITY, 0.0, f32::INFINITY)
    }
}
