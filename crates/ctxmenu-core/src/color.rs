//! Color representation, hex parsing and channel adjustment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color with explicit alpha.
    #[must_use]
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(r, g, b, a)
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// Supports 3-character shorthand, 6-character RGB and 8-character RGBA.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidHex);
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex);

        match hex.len() {
            3 => {
                let expand = |i: usize| channel(hex[i..=i].repeat(2).as_str());
                Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::from_rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => {
                let a = channel(&hex[6..8])?;
                let mut color =
                    Self::from_rgb8(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?);
                color.a = f32::from(a) / 255.0;
                Ok(color)
            }
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Convert to hex string with alpha.
    #[must_use]
    pub fn to_hex_with_alpha(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }

    /// Channels as 8-bit values.
    #[must_use]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    /// Shift every RGB channel by `amount` on the 0..=255 scale.
    ///
    /// Each channel is clamped to `0..=255` after the shift, so any amount is
    /// valid. Positive amounts lighten, negative amounts darken. Alpha is kept.
    #[must_use]
    pub fn adjust(&self, amount: i32) -> Self {
        let [r, g, b, _] = self.to_rgba8();
        let shift = |c: u8| (i32::from(c).saturating_add(amount)).clamp(0, 255) as u8;
        let mut adjusted = Self::from_rgb8(shift(r), shift(g), shift(b));
        adjusted.a = self.a;
        adjusted
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// CSS representation, `#rrggbb` when opaque, `rgba(..)` otherwise.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            self.to_hex()
        } else {
            let [r, g, b, _] = self.to_rgba8();
            format!("rgba({r}, {g}, {b}, {:.3})", self.a)
        }
    }

    // Common colors
    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Transparent color
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    /// Red color
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// Blue color
    pub const BLUE: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Adjust a hex color string by `amount` per channel.
///
/// The output keeps the input's shape: `#rrggbb` for RGB input and
/// `#rrggbbaa` when the input carried alpha (alpha itself is not shifted).
///
/// # Errors
///
/// Returns an error if `color` is not a valid hex color.
pub fn adjust_hex(color: &str, amount: i32) -> Result<String, ColorParseError> {
    let parsed = Color::from_hex(color)?;
    let adjusted = parsed.adjust(amount);
    if color.trim().trim_start_matches('#').len() == 8 {
        Ok(adjusted.to_hex_with_alpha())
    } else {
        Ok(adjusted.to_hex())
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 3, 6 or 8)")]
    InvalidLength,
}
